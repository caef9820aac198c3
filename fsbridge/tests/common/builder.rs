//! Table filesystem image builder for tests

use super::{MemoryDisk, ENTRY_SIZE, MAGIC, SECTOR};

struct PendingEntry {
    path: String,
    dir: bool,
    content: Vec<u8>,
    mtime: u32,
}

/// Builder for creating table filesystem images
pub struct TableFsBuilder {
    label: Vec<u8>,
    uuid: Vec<u8>,
    entries: Vec<PendingEntry>,
}

impl TableFsBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self {
            label: Vec::new(),
            uuid: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Set volume label (max 32 bytes)
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.as_bytes().to_vec();
        self
    }

    /// Set raw identifier bytes (max 64 bytes)
    pub fn uuid_bytes(mut self, uuid: &[u8]) -> Self {
        self.uuid = uuid.to_vec();
        self
    }

    /// Set identifier text
    pub fn uuid(self, uuid: &str) -> Self {
        self.uuid_bytes(uuid.as_bytes())
    }

    /// Add a regular file (absolute path, max 40 bytes)
    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        self.entries.push(PendingEntry {
            path: path.to_string(),
            dir: false,
            content: content.to_vec(),
            mtime: 1_700_000_000,
        });
        self
    }

    /// Add a directory
    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push(PendingEntry {
            path: path.to_string(),
            dir: true,
            content: Vec::new(),
            mtime: 1_600_000_000,
        });
        self
    }

    /// Build the image bytes
    pub fn build(self) -> Vec<u8> {
        let table_sectors = (self.entries.len() * ENTRY_SIZE).div_ceil(SECTOR).max(1);
        let mut image = vec![0u8; (1 + table_sectors) * SECTOR];

        image[0..8].copy_from_slice(MAGIC);
        image[8..12].copy_from_slice(&(self.entries.len() as u32).to_le_bytes());
        image[12..16].copy_from_slice(&1u32.to_le_bytes());
        image[16..16 + self.label.len()].copy_from_slice(&self.label);
        image[48..48 + self.uuid.len()].copy_from_slice(&self.uuid);

        for (i, entry) in self.entries.iter().enumerate() {
            let start_sector = image.len() / SECTOR;
            if !entry.dir {
                let padded = entry.content.len().div_ceil(SECTOR) * SECTOR;
                image.extend_from_slice(&entry.content);
                image.resize(start_sector * SECTOR + padded, 0);
            }

            let at = SECTOR + i * ENTRY_SIZE;
            let raw = &mut image[at..at + ENTRY_SIZE];
            raw[..entry.path.len()].copy_from_slice(entry.path.as_bytes());
            raw[40] = entry.dir as u8;
            raw[48..56].copy_from_slice(&(entry.content.len() as u64).to_le_bytes());
            raw[56..60].copy_from_slice(&(start_sector as u32).to_le_bytes());
            raw[60..64].copy_from_slice(&entry.mtime.to_le_bytes());
        }

        // spare sector so reads near the end of the last file stay on disk
        image.extend_from_slice(&[0u8; SECTOR]);
        image
    }

    /// Build straight into an in-memory disk
    pub fn build_disk(self) -> MemoryDisk {
        MemoryDisk::new(self.build())
    }
}

impl Default for TableFsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic file contents
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
