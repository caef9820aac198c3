//! Filesystem Driver Bridge
//!
//! A `no_std` adapter that turns an embedded, read-only filesystem engine into
//! a UEFI-style filesystem driver.
//!
//! # Overview
//!
//! The engine knows how to parse one filesystem and nothing about firmware.
//! This crate supplies everything around it:
//! - Engine registration (exactly one engine per driver image)
//! - Device and file handle lifecycle
//! - Sector reads from the engine mapped onto host Disk I/O
//! - Reads clamped to the file size, with the offset kept by the bridge
//! - Directory enumeration, volume label and identifier
//! - Probing a volume for a filesystem the engine understands
//! - Translation of engine errors into host status codes
//!
//! # Architecture
//!
//! ```text
//!   host ──► FileDispatch ──► FileHandle ──► FileSession ──► FsEngine
//!                                                              │
//!   host ◄── DiskIo ◄──────────── Device::read ◄───────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use fsbridge::{FsConfig, Filesystem, Registry};
//!
//! static REGISTRY: Registry<MyEngine> = Registry::new();
//! REGISTRY.register(MyEngine::new())?;
//!
//! let mut fs = Filesystem::new(&REGISTRY, &disk_io, FsConfig::default());
//! fs.init_device()?;
//! if fs.probe() {
//!     let root = fs.open_volume()?;
//!     let kernel = root.open_child(&path_utf16)?;
//! }
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod disk;
pub mod engine;
pub mod error;
pub mod file;
pub mod fs;
pub mod logger;
pub mod path;
mod pool;
pub mod probe;
pub mod registry;
pub mod status;
pub mod string;
pub mod uuid;

pub use config::{FsConfig, LogLevel};
pub use device::{close_device, open_device, Device};
pub use disk::{BlockIoDisk, BlockReadRequest, DiskIo, SECTOR_SIZE};
pub use engine::{DirHook, DirhookInfo, FsEngine};
pub use error::{EngineError, EngineResult, ErrorCode, FsError, Result};
pub use file::{
    create_file, destroy_file, DirEntry, FileDispatch, FileHandle, FileInfo, FileSession,
};
pub use fs::Filesystem;
pub use registry::Registry;
pub use status::Status;
pub use uuid::VolumeUuid;
