//! Error types for bridge operations
//!
//! Two domains meet here. The engine reports [`EngineError`]s carrying its own
//! fine-grained [`ErrorCode`]; the host only understands [`Status`] values.
//! Translation is lossy: several engine codes share one status.

use crate::status::{self, Status};
use alloc::string::String;
use core::fmt;

/// Result type for engine operations
pub type EngineResult<T> = core::result::Result<T, EngineError>;

/// Result type for bridge operations
pub type Result<T> = core::result::Result<T, FsError>;

/// Engine error numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Internal self-check failed
    TestFailure,
    /// Out of memory
    OutOfMemory,
    /// Wrong kind of file (e.g. opening a directory for reading)
    BadFileType,
    /// File or directory not found
    FileNotFound,
    /// Read failed while fetching file data
    FileReadError,
    /// Malformed path
    BadFilename,
    /// Structure not recognised as this filesystem
    UnknownFs,
    /// Structure recognised but inconsistent
    BadFs,
    /// Offset or length out of range
    OutOfRange,
    /// Block read failed
    ReadError,
    /// Bad argument to an engine call
    BadArgument,
    /// Too many symbolic link levels
    SymlinkLoop,
    /// Feature present on disk but not handled
    NotImplemented,
    /// Generic I/O failure
    Io,
    /// Anything else
    Other,
}

impl ErrorCode {
    /// Get a human-readable description of the error code
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TestFailure => "test failure",
            Self::OutOfMemory => "out of memory",
            Self::BadFileType => "bad file type",
            Self::FileNotFound => "file not found",
            Self::FileReadError => "file read error",
            Self::BadFilename => "bad filename",
            Self::UnknownFs => "unknown filesystem",
            Self::BadFs => "bad filesystem",
            Self::OutOfRange => "out of range",
            Self::ReadError => "read error",
            Self::BadArgument => "bad argument",
            Self::SymlinkLoop => "too deep nesting of symlinks",
            Self::NotImplemented => "not implemented yet",
            Self::Io => "I/O error",
            Self::Other => "unknown error",
        }
    }

    /// Host status for this code
    pub const fn status(&self) -> Status {
        match self {
            Self::OutOfMemory => status::OUT_OF_RESOURCES,
            Self::FileNotFound => status::NOT_FOUND,
            Self::BadFilename | Self::BadArgument => status::INVALID_PARAMETER,
            Self::BadFileType => status::ACCESS_DENIED,
            Self::UnknownFs | Self::NotImplemented => status::UNSUPPORTED,
            Self::BadFs => status::VOLUME_CORRUPTED,
            Self::ReadError | Self::FileReadError | Self::Io => status::DEVICE_ERROR,
            Self::OutOfRange => status::END_OF_FILE,
            Self::SymlinkLoop => status::ABORTED,
            Self::TestFailure | Self::Other => status::NOT_FOUND,
        }
    }
}

/// Error raised by the filesystem engine
///
/// The optional message is the engine's own diagnostic (for instance
/// "not an ext2 filesystem") and only ends up in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    code: ErrorCode,
    message: Option<String>,
}

impl EngineError {
    /// Error with no diagnostic text
    pub const fn new(code: ErrorCode) -> Self {
        Self { code, message: None }
    }

    /// Error with a diagnostic message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// The sentinel the block shim returns when the host transport fails
    pub const fn read_error() -> Self {
        Self::new(ErrorCode::ReadError)
    }

    /// Engine error number
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Engine diagnostic, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Translate into the host status domain
    pub const fn status(&self) -> Status {
        self.code.status()
    }
}

impl From<ErrorCode> for EngineError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code.as_str(), message),
            None => f.write_str(self.code.as_str()),
        }
    }
}

/// Errors reported by the bridge to its callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// No engine has been registered
    NotRegistered,
    /// An engine is already registered
    AlreadyRegistered,
    /// The filesystem instance has no open device
    NoDevice,
    /// An adapter allocation failed
    OutOfResources,
    /// The file has no open engine session
    NotOpen,
    /// Directory operation on a regular file
    NotADirectory,
    /// The engine failed
    Engine(EngineError),
}

impl FsError {
    /// Host status for this error
    pub const fn status(&self) -> Status {
        match self {
            Self::NotRegistered | Self::NoDevice => status::NOT_READY,
            Self::AlreadyRegistered => status::ACCESS_DENIED,
            Self::OutOfResources => status::OUT_OF_RESOURCES,
            Self::NotOpen => status::INVALID_PARAMETER,
            Self::NotADirectory => status::INVALID_PARAMETER,
            Self::Engine(err) => err.status(),
        }
    }
}

impl From<EngineError> for FsError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered => write!(f, "No filesystem engine registered"),
            Self::AlreadyRegistered => write!(f, "A filesystem engine is already registered"),
            Self::NoDevice => write!(f, "Filesystem has no open device"),
            Self::OutOfResources => write!(f, "Out of resources"),
            Self::NotOpen => write!(f, "File is not open"),
            Self::NotADirectory => write!(f, "Not a directory"),
            Self::Engine(err) => write!(f, "Engine error: {}", err),
        }
    }
}

/// Collapse a bridge result into a host status
pub fn to_status<T>(result: &Result<T>) -> Status {
    match result {
        Ok(_) => status::SUCCESS,
        Err(err) => err.status(),
    }
}
