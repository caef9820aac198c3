//! Common test utilities: in-memory disks and a tiny table-based engine

#![allow(dead_code)]

pub mod builder;
pub use builder::TableFsBuilder;

use fsbridge::status::{self, Status};
use fsbridge::{
    Device, DirHook, DirhookInfo, DiskIo, EngineError, EngineResult, ErrorCode, FileSession,
    FsEngine,
};
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::cell::Cell;
use std::io;
use std::ops::ControlFlow;

/// Engine sector size
pub const SECTOR: usize = 512;

/// Superblock magic
pub const MAGIC: &[u8; 8] = b"TABLEFS1";

/// Bytes per table entry
pub const ENTRY_SIZE: usize = 64;

/// Byte-addressed in-memory disk
#[derive(Debug)]
pub struct MemoryDisk {
    pub data: Vec<u8>,
    pub media_id: u32,
    pub reads: Cell<usize>,
    pub fail: Cell<bool>,
}

impl MemoryDisk {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            media_id: 1,
            reads: Cell::new(0),
            fail: Cell::new(false),
        }
    }

    /// Disk of `sectors` zeroed sectors (no filesystem)
    pub fn blank(sectors: usize) -> Self {
        Self::new(vec![0u8; sectors * SECTOR])
    }
}

impl DiskIo for MemoryDisk {
    fn media_id(&self) -> u32 {
        self.media_id
    }

    fn read_disk(&self, media_id: u32, offset: u64, buf: &mut [u8]) -> Result<(), Status> {
        self.reads.set(self.reads.get() + 1);
        if self.fail.get() {
            return Err(status::DEVICE_ERROR);
        }
        if media_id != self.media_id {
            return Err(status::MEDIA_CHANGED);
        }
        let start = offset as usize;
        let end = start + buf.len();
        if end > self.data.len() {
            return Err(status::DEVICE_ERROR);
        }
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    pub fn new(data: Vec<u8>, block_size: usize) -> Self {
        Self { data, block_size }
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        assert_eq!(dst.len() % self.block_size, 0, "unaligned block read");
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<(), Self::Error> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// One parsed table entry
#[derive(Debug, Clone)]
pub struct TableEntry {
    pub path: String,
    pub dir: bool,
    pub size: u64,
    pub start: u64,
    pub mtime: u32,
}

/// Per-file engine data
#[derive(Debug)]
pub struct TableFile {
    pub start: u64,
}

/// Minimal engine for a flat table of paths
///
/// Layout (512-byte sectors): superblock in sector 0 with magic, entry count,
/// table sector, label and identifier; 64-byte entries from the table sector
/// on; file data anywhere after.
#[derive(Debug, Default)]
pub struct TableFs {
    pub opens: Cell<usize>,
    pub closes: Cell<usize>,
    pub dir_walks: Cell<usize>,
    pub fail_reads: Cell<bool>,
    pub short_read: Cell<Option<usize>>,
    pub over_report: Cell<usize>,
    pub dot_entries: Cell<bool>,
}

struct Superblock {
    count: u32,
    table: u64,
    label: Vec<u8>,
    uuid: Vec<u8>,
}

fn trim_nul(bytes: &[u8]) -> Vec<u8> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end].to_vec()
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl TableFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn superblock(&self, device: &Device<'_>) -> EngineResult<Superblock> {
        let mut sb = [0u8; 112];
        device.read(0, 0, &mut sb)?;
        if &sb[0..8] != MAGIC {
            return Err(EngineError::with_message(ErrorCode::UnknownFs, "not a tablefs volume"));
        }
        Ok(Superblock {
            count: u32::from_le_bytes(sb[8..12].try_into().unwrap()),
            table: u32::from_le_bytes(sb[12..16].try_into().unwrap()) as u64,
            label: trim_nul(&sb[16..48]),
            uuid: trim_nul(&sb[48..112]),
        })
    }

    fn entries(&self, device: &Device<'_>) -> EngineResult<Vec<TableEntry>> {
        let sb = self.superblock(device)?;
        let mut entries = Vec::new();
        for i in 0..sb.count as u64 {
            let mut raw = [0u8; ENTRY_SIZE];
            // offset may run past the first table sector; the shim adds it up
            device.read(sb.table, i * ENTRY_SIZE as u64, &mut raw)?;
            let path = String::from_utf8(trim_nul(&raw[0..40]))
                .map_err(|_| EngineError::with_message(ErrorCode::BadFs, "bad entry name"))?;
            entries.push(TableEntry {
                path,
                dir: raw[40] & 1 != 0,
                size: u64::from_le_bytes(raw[48..56].try_into().unwrap()),
                start: u32::from_le_bytes(raw[56..60].try_into().unwrap()) as u64,
                mtime: u32::from_le_bytes(raw[60..64].try_into().unwrap()),
            });
        }
        Ok(entries)
    }
}

impl FsEngine for TableFs {
    type FileData = TableFile;

    fn name(&self) -> &str {
        "tablefs"
    }

    fn open(&self, file: &mut FileSession<'_, Self>, path: &str) -> EngineResult<()> {
        let entries = self.entries(file.device())?;
        let entry = entries
            .iter()
            .find(|e| e.path == path)
            .ok_or(EngineError::new(ErrorCode::FileNotFound))?;
        if entry.dir {
            return Err(EngineError::with_message(ErrorCode::BadFileType, "not a regular file"));
        }
        file.set_size(entry.size);
        file.set_data(TableFile { start: entry.start });
        self.opens.set(self.opens.get() + 1);
        Ok(())
    }

    fn close(&self, file: &mut FileSession<'_, Self>) {
        if file.take_data().is_some() {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn read(&self, file: &mut FileSession<'_, Self>, buf: &mut [u8]) -> EngineResult<usize> {
        if self.fail_reads.get() {
            return Err(EngineError::read_error());
        }
        let start = file.data().ok_or(EngineError::new(ErrorCode::BadArgument))?.start;
        let len = self.short_read.get().map_or(buf.len(), |n| n.min(buf.len()));
        file.device().read(start, file.offset(), &mut buf[..len])?;
        Ok(len + self.over_report.get())
    }

    fn dir(&self, device: &Device<'_>, path: &str, hook: &mut DirHook<'_>) -> EngineResult<()> {
        self.dir_walks.set(self.dir_walks.get() + 1);
        let entries = self.entries(device)?;
        if path != "/" {
            match entries.iter().find(|e| e.path == path) {
                Some(e) if e.dir => {}
                Some(_) => return Err(EngineError::new(ErrorCode::BadFileType)),
                None => return Err(EngineError::new(ErrorCode::FileNotFound)),
            }
        }

        if self.dot_entries.get() {
            let info = DirhookInfo { dir: true, ..Default::default() };
            for dot in [".", ".."] {
                if hook(dot, &info).is_break() {
                    return Ok(());
                }
            }
        }

        for (inode, entry) in entries.iter().enumerate() {
            if parent_of(&entry.path) != path {
                continue;
            }
            let info = DirhookInfo {
                dir: entry.dir,
                mtime_set: true,
                mtime: entry.mtime as i64,
                inode_set: true,
                inode: inode as u64,
                ..Default::default()
            };
            if let ControlFlow::Break(()) = hook(name_of(&entry.path), &info) {
                break;
            }
        }
        Ok(())
    }

    fn label(&self, device: &Device<'_>) -> EngineResult<Option<Vec<u8>>> {
        let sb = self.superblock(device)?;
        Ok((!sb.label.is_empty()).then_some(sb.label))
    }

    fn uuid(&self, device: &Device<'_>) -> EngineResult<Option<Vec<u8>>> {
        let sb = self.superblock(device)?;
        Ok((!sb.uuid.is_empty()).then_some(sb.uuid))
    }
}

/// Little-endian UTF-16 with terminator
pub fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}
