//! Host status codes.
//!
//! The driver framework reports every outcome as a UEFI `EFI_STATUS`. Errors
//! have the high bit set; the low bits carry the error number from the UEFI
//! specification (Appendix D).

/// UEFI Status code.
pub type Status = usize;

const ERROR_BIT: Status = 1 << (usize::BITS - 1);

const fn error(code: usize) -> Status {
    ERROR_BIT | code
}

/// Operation completed successfully.
pub const SUCCESS: Status = 0;

/// The image failed to load.
pub const LOAD_ERROR: Status = error(1);

/// Invalid parameter was passed.
pub const INVALID_PARAMETER: Status = error(2);

/// The operation is not supported.
pub const UNSUPPORTED: Status = error(3);

/// The buffer was not the proper size for the request.
pub const BAD_BUFFER_SIZE: Status = error(4);

/// The buffer is not large enough to hold the requested data.
pub const BUFFER_TOO_SMALL: Status = error(5);

/// There is no data pending upon return, or the driver is not set up.
pub const NOT_READY: Status = error(6);

/// The physical device reported an error while attempting the operation.
pub const DEVICE_ERROR: Status = error(7);

/// Out of resources.
pub const OUT_OF_RESOURCES: Status = error(9);

/// An inconsistency was detected on the file system.
pub const VOLUME_CORRUPTED: Status = error(10);

/// The device does not contain any medium.
pub const NO_MEDIA: Status = error(12);

/// The medium in the device has changed since the last access.
pub const MEDIA_CHANGED: Status = error(13);

/// The item was not found.
pub const NOT_FOUND: Status = error(14);

/// Access was denied.
pub const ACCESS_DENIED: Status = error(15);

/// The operation was aborted.
pub const ABORTED: Status = error(21);

/// An attempt was made to read past the end of a file.
pub const END_OF_FILE: Status = error(31);

/// Check if status indicates success.
#[inline]
pub const fn is_success(status: Status) -> bool {
    status == SUCCESS
}

/// Check if status indicates an error.
#[inline]
pub const fn is_error(status: Status) -> bool {
    (status & ERROR_BIT) != 0
}

/// Short name for a status, used in log lines.
pub const fn name(status: Status) -> &'static str {
    match status {
        SUCCESS => "Success",
        LOAD_ERROR => "Load Error",
        INVALID_PARAMETER => "Invalid Parameter",
        UNSUPPORTED => "Unsupported",
        BAD_BUFFER_SIZE => "Bad Buffer Size",
        BUFFER_TOO_SMALL => "Buffer Too Small",
        NOT_READY => "Not Ready",
        DEVICE_ERROR => "Device Error",
        OUT_OF_RESOURCES => "Out of Resources",
        VOLUME_CORRUPTED => "Volume Corrupt",
        NO_MEDIA => "No Media",
        MEDIA_CHANGED => "Media changed",
        NOT_FOUND => "Not Found",
        ACCESS_DENIED => "Access Denied",
        ABORTED => "Aborted",
        END_OF_FILE => "End of File",
        _ => "Unknown Error",
    }
}
