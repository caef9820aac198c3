//! Filesystem instances
//!
//! One [`Filesystem`] exists per block device the driver is bound to. It ties
//! together the engine registry, the host block transport, the [`Device`] the
//! engine reads through and the dispatch table installed on the root file.

use crate::config::FsConfig;
use crate::device::{close_device, open_device, Device};
use crate::disk::DiskIo;
use crate::engine::FsEngine;
use crate::error::{FsError, Result};
use crate::file::{create_file, FileDispatch, FileHandle};
use crate::registry::Registry;
use alloc::boxed::Box;
use alloc::string::String;

/// A volume the driver is bound to
pub struct Filesystem<'a, E: FsEngine> {
    registry: &'a Registry<E>,
    context: &'a dyn DiskIo,
    device: Option<Box<Device<'a>>>,
    dispatch: FileDispatch<E>,
    config: FsConfig,
}

impl<'a, E: FsEngine> Filesystem<'a, E> {
    /// Instance for the block transport `context`
    ///
    /// No device exists until [`Filesystem::init_device`] is called.
    pub fn new(registry: &'a Registry<E>, context: &'a dyn DiskIo, config: FsConfig) -> Self {
        Self {
            registry,
            context,
            device: None,
            dispatch: FileDispatch::standard(),
            config,
        }
    }

    /// Create the engine device for this volume
    pub fn init_device(&mut self) -> Result<()> {
        if self.device.is_none() {
            self.device = Some(open_device(self.context)?);
        }
        Ok(())
    }

    /// Drop the engine device
    ///
    /// Every file of this instance must already be gone; the borrow checker
    /// holds callers to that.
    pub fn exit_device(&mut self) {
        if let Some(device) = self.device.take() {
            close_device(device);
        }
    }

    /// The registered engine
    pub fn engine(&self) -> Result<&'a E> {
        self.registry.current()
    }

    /// The engine device, once created
    pub fn device(&self) -> Result<&Device<'a>> {
        self.device.as_deref().ok_or(FsError::NoDevice)
    }

    /// Whether a device is open
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Dispatch table of the root file
    pub fn dispatch(&self) -> FileDispatch<E> {
        self.dispatch
    }

    /// Instance settings
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// New, unopened file on this volume
    pub fn create_file(&self) -> Result<Box<FileHandle<'_, E>>> {
        create_file(self)
    }

    /// Handle on the root directory
    pub fn open_volume(&self) -> Result<Box<FileHandle<'_, E>>> {
        let mut root = self.create_file()?;
        root.mark_directory("/");
        Ok(root)
    }

    /// Volume label, lossily decoded
    pub fn label(&self) -> Result<Option<String>> {
        let engine = self.engine()?;
        let label = engine.label(self.device()?)?;
        Ok(label.map(|raw| String::from_utf8_lossy(&raw).into_owned()))
    }
}
