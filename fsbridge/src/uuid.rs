//! Volume identifiers
//!
//! Engines report the identifier as the text they build from on-disk
//! metadata: canonical 36-character UUIDs for most filesystems, shorter
//! serial numbers (`1234-ABCD`) for others. Firmware wants UTF-16, and the
//! identifier is capped at the canonical length.

use crate::engine::FsEngine;
use crate::fs::Filesystem;
use crate::status;
use crate::string::utf8_to_utf16;
use alloc::string::String;
use uguid::Guid;

/// Longest identifier accepted, in UTF-16 code units
pub const UUID_TEXT_LEN: usize = 36;

/// UTF-16 buffer size, terminator included
pub const UUID_BUFFER_LEN: usize = UUID_TEXT_LEN + 1;

/// Volume identifier in both encodings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeUuid {
    text: String,
    wide: [u16; UUID_BUFFER_LEN],
    len: usize,
}

impl VolumeUuid {
    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// UTF-16 form without terminator
    pub fn as_utf16(&self) -> &[u16] {
        &self.wide[..self.len]
    }

    /// UTF-16 form including the terminating NUL
    pub fn as_utf16_with_nul(&self) -> &[u16] {
        &self.wide[..=self.len]
    }

    /// The identifier as a GUID, when it is in canonical form
    pub fn to_guid(&self) -> Option<Guid> {
        Guid::try_parse(&self.text).ok()
    }
}

impl<E: FsEngine> Filesystem<'_, E> {
    /// Identifier of the mounted volume
    ///
    /// `None` when the engine has none, fails, or reports something that does
    /// not fit [`UUID_TEXT_LEN`] or is not valid UTF-8.
    pub fn volume_uuid(&self) -> Option<VolumeUuid> {
        let (engine, device) = match (self.engine(), self.device()) {
            (Ok(engine), Ok(device)) => (engine, device),
            (Err(err), _) | (_, Err(err)) => {
                log::error!("uuid: uninitialized variables: {}", err);
                return None;
            }
        };

        let raw = match engine.uuid(device) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::debug!("uuid: {}: {}", engine.name(), err);
                return None;
            }
        };

        let mut wide = [0u16; UUID_BUFFER_LEN];
        let len = match utf8_to_utf16(&raw, &mut wide) {
            Ok(len) => len,
            Err(err) => {
                log::error!("Could not convert UUID to UTF-16: {}", status::name(err));
                return None;
            }
        };

        // Validated by the conversion above
        let text = String::from_utf16_lossy(&wide[..len]);
        Some(VolumeUuid { text, wide, len })
    }
}
