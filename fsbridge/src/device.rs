//! Device lifecycle
//!
//! A [`Device`] is what the engine knows a volume as. It carries nothing but
//! a reference back to the host's block transport; geometry and naming stay
//! with the host.

use crate::disk::DiskIo;
use crate::error::Result;
use crate::pool::try_box;
use alloc::boxed::Box;
use core::fmt;

/// Engine-side handle on a host block device
pub struct Device<'a> {
    context: &'a dyn DiskIo,
}

impl<'a> Device<'a> {
    /// Host block transport this device reads through
    pub fn context(&self) -> &'a dyn DiskIo {
        self.context
    }
}

impl fmt::Debug for Device<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("media_id", &self.context.media_id())
            .finish()
    }
}

/// Create a device for the host block transport `context`
///
/// The context is stored as-is and remains owned by the host.
pub fn open_device(context: &dyn DiskIo) -> Result<Box<Device<'_>>> {
    try_box(Device { context })
}

/// Release a device created by [`open_device`]
///
/// Only the device itself is freed; the host context is untouched.
pub fn close_device(device: Box<Device<'_>>) {
    drop(device);
}
