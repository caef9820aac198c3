//! Block transport
//!
//! Engines address the disk as (sector, offset-in-sector, length) with a
//! fixed 512-byte sector, whatever the medium really uses. The host side is a
//! byte-addressed [`DiskIo`], so the shim here is a single multiply-and-add.
//!
//! [`BlockIoDisk`] provides a [`DiskIo`] on top of any `gpt_disk_io::BlockIo`,
//! the same trait the rest of the workspace reads disks through.

use crate::device::Device;
use crate::error::{EngineError, EngineResult};
use crate::status::{self, Status};
use alloc::vec;
use core::cell::RefCell;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Sector size engines address the disk with
///
/// Not the medium's block size: engines compute every on-disk
/// location in these units.
pub const SECTOR_SIZE: u64 = 512;

/// Byte-addressed read access to a host block device (UEFI Disk I/O)
pub trait DiskIo {
    /// Identifier of the medium currently in the device
    fn media_id(&self) -> u32;

    /// Read `buf.len()` bytes starting at `offset`
    fn read_disk(&self, media_id: u32, offset: u64, buf: &mut [u8]) -> Result<(), Status>;
}

/// One engine read, as issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReadRequest {
    /// Sector index in [`SECTOR_SIZE`] units
    pub sector: u64,
    /// Byte offset from the start of the sector (may exceed a sector)
    pub offset: u64,
    /// Bytes requested
    pub len: usize,
}

impl BlockReadRequest {
    /// Absolute byte offset on the device, `None` on overflow
    pub fn byte_offset(&self) -> Option<u64> {
        self.sector.checked_mul(SECTOR_SIZE)?.checked_add(self.offset)
    }
}

impl Device<'_> {
    /// Read `buf.len()` bytes at `offset` bytes into `sector`
    ///
    /// Any transport failure comes back as the engine read-error sentinel.
    pub fn read(&self, sector: u64, offset: u64, buf: &mut [u8]) -> EngineResult<()> {
        let request = BlockReadRequest {
            sector,
            offset,
            len: buf.len(),
        };
        let Some(byte_offset) = request.byte_offset() else {
            log::error!("disk: sector {:#x} + {:#x} overflows the device address", sector, offset);
            return Err(EngineError::read_error());
        };

        #[cfg(feature = "trace")]
        log::trace!(
            "disk: read {} bytes at {:#x} (sector {:#x})",
            request.len,
            byte_offset,
            sector
        );

        let context = self.context();
        context
            .read_disk(context.media_id(), byte_offset, buf)
            .map_err(|status| {
                log::error!(
                    "disk: could not read block at address {:08x}: {}",
                    sector,
                    status::name(status)
                );
                EngineError::read_error()
            })
    }
}

/// [`DiskIo`] over a block-granular device
///
/// Aligned requests go straight to the device; anything else is served
/// through a bounce buffer covering the touched blocks.
pub struct BlockIoDisk<B: BlockIo> {
    block_io: RefCell<B>,
    media_id: u32,
}

impl<B: BlockIo> BlockIoDisk<B> {
    /// Wrap `block_io`, reporting `media_id` as the current medium
    pub fn new(block_io: B, media_id: u32) -> Self {
        Self {
            block_io: RefCell::new(block_io),
            media_id,
        }
    }

    /// Give the device back
    pub fn into_inner(self) -> B {
        self.block_io.into_inner()
    }
}

impl<B: BlockIo> DiskIo for BlockIoDisk<B> {
    fn media_id(&self) -> u32 {
        self.media_id
    }

    fn read_disk(&self, media_id: u32, offset: u64, buf: &mut [u8]) -> Result<(), Status> {
        if media_id != self.media_id {
            return Err(status::MEDIA_CHANGED);
        }
        if buf.is_empty() {
            return Ok(());
        }

        let mut block_io = self.block_io.try_borrow_mut().map_err(|_| status::NOT_READY)?;
        let block_size = u64::from(block_io.block_size().to_u32());
        let len = buf.len() as u64;
        let end = offset.checked_add(len).ok_or(status::INVALID_PARAMETER)?;

        if offset % block_size == 0 && len % block_size == 0 {
            return block_io.read_blocks(Lba(offset / block_size), buf).map_err(|err| {
                log::error!("disk: block read at byte {:#x} failed: {}", offset, err);
                status::DEVICE_ERROR
            });
        }

        let first = offset / block_size;
        let last = (end - 1) / block_size;
        let span = usize::try_from((last - first + 1) * block_size)
            .map_err(|_| status::BAD_BUFFER_SIZE)?;
        let mut bounce = vec![0u8; span];
        block_io.read_blocks(Lba(first), &mut bounce).map_err(|err| {
            log::error!("disk: block read at LBA {} failed: {}", first, err);
            status::DEVICE_ERROR
        })?;

        let start = (offset - first * block_size) as usize;
        buf.copy_from_slice(&bounce[start..start + buf.len()]);
        Ok(())
    }
}
