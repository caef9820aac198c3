//! Fallible allocation helpers
//!
//! Firmware pools run out. `Box::new` aborts when that happens; the driver
//! has to answer `OUT_OF_RESOURCES` instead.

use crate::error::{FsError, Result};
use alloc::alloc::{alloc, Layout};
use alloc::boxed::Box;

/// Move `value` to the heap, reporting exhaustion instead of aborting
pub(crate) fn try_box<T>(value: T) -> Result<Box<T>> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    // SAFETY: layout has a non-zero size
    let ptr = unsafe { alloc(layout) } as *mut T;
    if ptr.is_null() {
        log::error!("pool: allocation of {} bytes failed", layout.size());
        return Err(FsError::OutOfResources);
    }

    // SAFETY: ptr is non-null, aligned for T and was obtained from the global
    // allocator with T's layout, which is what Box expects to free.
    unsafe {
        ptr.write(value);
        Ok(Box::from_raw(ptr))
    }
}
