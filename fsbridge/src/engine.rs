//! Filesystem engine interface
//!
//! The engine owns everything filesystem specific: superblock parsing, path
//! lookup, directory walking. It sees the volume only through a [`Device`],
//! whose [`Device::read`] is the sole path to the disk.

use crate::device::Device;
use crate::error::EngineResult;
use crate::file::FileSession;
use alloc::vec::Vec;
use core::ops::ControlFlow;

/// Metadata delivered with each directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirhookInfo {
    /// Entry is a directory
    pub dir: bool,
    /// `mtime` is valid
    pub mtime_set: bool,
    /// Names in this directory compare case-insensitively
    pub case_insensitive: bool,
    /// `inode` is valid
    pub inode_set: bool,
    /// Entry is a symbolic link
    pub symlink: bool,
    /// Modification time, seconds since the Unix epoch
    pub mtime: i64,
    /// Engine-specific inode number
    pub inode: u64,
}

/// Directory walk callback
///
/// Returning [`ControlFlow::Break`] stops the walk; the engine then returns
/// success without visiting further entries.
pub type DirHook<'h> = dyn FnMut(&str, &DirhookInfo) -> ControlFlow<()> + 'h;

/// Operation table of an embedded filesystem engine
///
/// Implementations report failure through [`EngineError`](crate::EngineError)
/// results only; there is no side channel.
pub trait FsEngine: Sized {
    /// Per-open-file state owned by the engine
    type FileData;

    /// Short filesystem name, used in logs
    fn name(&self) -> &str;

    /// Look up `path` and prepare `file` for reading
    ///
    /// On success the engine must set the file size and may attach its own
    /// data with [`FileSession::set_data`].
    fn open(&self, file: &mut FileSession<'_, Self>, path: &str) -> EngineResult<()>;

    /// Release what `open` attached to `file`
    fn close(&self, file: &mut FileSession<'_, Self>);

    /// Read from the current offset into `buf`
    ///
    /// `buf` never extends past the end of the file. The engine must not move
    /// the offset; the caller advances it by the returned count.
    fn read(&self, file: &mut FileSession<'_, Self>, buf: &mut [u8]) -> EngineResult<usize>;

    /// Walk the directory at `path`, calling `hook` for each entry
    fn dir(&self, device: &Device<'_>, path: &str, hook: &mut DirHook<'_>) -> EngineResult<()>;

    /// Volume label as stored on disk, if the volume has one
    fn label(&self, device: &Device<'_>) -> EngineResult<Option<Vec<u8>>>;

    /// Volume identifier text as stored on disk, if the volume has one
    fn uuid(&self, device: &Device<'_>) -> EngineResult<Option<Vec<u8>>>;
}
