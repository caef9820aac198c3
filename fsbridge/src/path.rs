//! Path handling
//!
//! Firmware hands out backslash-separated names relative to the handle they
//! are opened from. Engines want absolute, slash-separated paths without `.`
//! or `..` components.

use alloc::string::String;
use alloc::vec::Vec;

/// Resolve `name` against the directory `base`
///
/// A name starting with a separator is absolute. `..` never climbs above the
/// root. The result starts with `/` and has no trailing separator unless it
/// is the root itself.
pub fn resolve(base: &str, name: &str) -> String {
    let name = name.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();

    let relative_to = if name.starts_with('/') { "" } else { base };
    for component in relative_to.split('/').chain(name.split('/')) {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return String::from("/");
    }
    let mut path = String::with_capacity(name.len() + base.len() + 1);
    for part in parts {
        path.push('/');
        path.push_str(part);
    }
    path
}

/// Directory containing `path`
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &trimmed[..idx],
    }
}

/// Final component of `path`, `/` for the root
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        _ if trimmed.is_empty() => "/",
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
