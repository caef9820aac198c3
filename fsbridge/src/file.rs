//! File sessions and the operation bridge
//!
//! A [`FileHandle`] is the host-facing object: a dispatch table plus a boxed
//! [`FileSession`], which is the engine-facing half (device, engine, size,
//! offset and whatever the engine attached on open).
//!
//! # Reading
//!
//! The engine never moves the offset. [`FileHandle::read`] clamps each request
//! to what is left of the file, lets the engine fill that much, then advances
//! the offset by what the engine reports:
//!
//! ```ignore
//! let mut file = fs.open_volume()?.open_child(&name)?;
//! let mut buf = [0u8; 4096];
//! while file.read(&mut buf)? != 0 {
//!     // ...
//! }
//! ```

use crate::device::Device;
use crate::engine::{DirHook, DirhookInfo, FsEngine};
use crate::error::{EngineError, ErrorCode, FsError, Result};
use crate::fs::Filesystem;
use crate::path;
use crate::pool::try_box;
use crate::status::{self, Status};
use crate::string;
use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use core::ops::ControlFlow;

/// Revision reported in every dispatch table
pub const FILE_PROTOCOL_REVISION: u64 = 0x0001_0000;

/// Position value that means "end of file" for [`FileDispatch::set_position`]
pub const POSITION_END_OF_FILE: u64 = u64::MAX;

/// Engine-facing state of one open file
pub struct FileSession<'f, E: FsEngine> {
    device: &'f Device<'f>,
    driver: &'f E,
    size: u64,
    offset: u64,
    path: String,
    data: Option<E::FileData>,
    open: bool,
    directory: bool,
    dir_index: usize,
}

impl<'f, E: FsEngine> FileSession<'f, E> {
    fn new(device: &'f Device<'f>, driver: &'f E) -> Self {
        Self {
            device,
            driver,
            size: 0,
            offset: 0,
            path: String::new(),
            data: None,
            open: false,
            directory: false,
            dir_index: 0,
        }
    }

    /// Device this file lives on
    pub fn device(&self) -> &'f Device<'f> {
        self.device
    }

    /// Engine serving this file
    pub fn driver(&self) -> &'f E {
        self.driver
    }

    /// File size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Set the file size; engines call this from `open`
    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// Current read offset
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Path last passed to open
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Engine data attached on open
    pub fn data(&self) -> Option<&E::FileData> {
        self.data.as_ref()
    }

    /// Mutable access to the engine data
    pub fn data_mut(&mut self) -> Option<&mut E::FileData> {
        self.data.as_mut()
    }

    /// Attach engine data, replacing any previous value
    pub fn set_data(&mut self, data: E::FileData) {
        self.data = Some(data);
    }

    /// Detach the engine data
    pub fn take_data(&mut self) -> Option<E::FileData> {
        self.data.take()
    }

    fn release(&mut self) {
        if self.open {
            let driver = self.driver;
            driver.close(self);
            self.open = false;
        }
        self.data = None;
    }
}

impl<E: FsEngine> Drop for FileSession<'_, E> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Directory entry returned by [`FileHandle::next_entry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name
    pub name: String,
    /// Entry metadata
    pub info: DirhookInfo,
}

/// Summary of a file, as needed for a host file-info query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Final path component, `/` for the root
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Whether this is a directory
    pub directory: bool,
    /// Modification time, if the engine knows it
    pub mtime: Option<i64>,
}

/// Host-facing operation table of a file
///
/// Every file opened from a filesystem carries a copy of the table installed
/// on its root, so all handles expose the same operations.
pub struct FileDispatch<E: FsEngine> {
    /// Interface revision
    pub revision: u64,
    /// Open `name` relative to the given handle
    pub open: for<'f> fn(
        &FileHandle<'f, E>,
        &[u16],
    ) -> core::result::Result<Box<FileHandle<'f, E>>, Status>,
    /// Close and free the handle
    pub close: fn(Box<FileHandle<'_, E>>) -> Status,
    /// Read into the buffer; the length is updated with the bytes read
    pub read: fn(&mut FileHandle<'_, E>, &mut [u8], &mut usize) -> Status,
    /// Current position
    pub get_position: fn(&FileHandle<'_, E>, &mut u64) -> Status,
    /// Move the position
    pub set_position: fn(&mut FileHandle<'_, E>, u64) -> Status,
}

impl<E: FsEngine> FileDispatch<E> {
    /// Table wired to the bridge operations in this module
    pub fn standard() -> Self {
        Self {
            revision: FILE_PROTOCOL_REVISION,
            open: dispatch_open::<E>,
            close: dispatch_close::<E>,
            read: dispatch_read::<E>,
            get_position: dispatch_get_position::<E>,
            set_position: dispatch_set_position::<E>,
        }
    }
}

impl<E: FsEngine> Clone for FileDispatch<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: FsEngine> Copy for FileDispatch<E> {}

fn dispatch_open<'f, E: FsEngine>(
    file: &FileHandle<'f, E>,
    name: &[u16],
) -> core::result::Result<Box<FileHandle<'f, E>>, Status> {
    file.open_child(name).map_err(|err| err.status())
}

fn dispatch_close<E: FsEngine>(file: Box<FileHandle<'_, E>>) -> Status {
    destroy_file(file);
    status::SUCCESS
}

fn dispatch_read<E: FsEngine>(
    file: &mut FileHandle<'_, E>,
    buf: &mut [u8],
    len: &mut usize,
) -> Status {
    if file.is_directory() {
        *len = 0;
        return status::UNSUPPORTED;
    }
    let requested = (*len).min(buf.len());
    match file.read(&mut buf[..requested]) {
        Ok(read) => {
            *len = read;
            status::SUCCESS
        }
        Err(err) => {
            *len = 0;
            err.status()
        }
    }
}

fn dispatch_get_position<E: FsEngine>(file: &FileHandle<'_, E>, position: &mut u64) -> Status {
    if file.is_directory() {
        return status::UNSUPPORTED;
    }
    *position = file.offset();
    status::SUCCESS
}

fn dispatch_set_position<E: FsEngine>(file: &mut FileHandle<'_, E>, position: u64) -> Status {
    if file.is_directory() {
        // Only rewinding is defined for directories
        if position != 0 {
            return status::UNSUPPORTED;
        }
        file.set_offset(0);
        return status::SUCCESS;
    }
    let position = if position == POSITION_END_OF_FILE { file.size() } else { position };
    file.set_offset(position);
    status::SUCCESS
}

/// Host-level file object
pub struct FileHandle<'f, E: FsEngine> {
    dispatch: FileDispatch<E>,
    session: Box<FileSession<'f, E>>,
}

/// Create an unopened file on `fs`
///
/// The file is bound to the instance's device and registered engine and gets
/// a copy of the instance's root dispatch table. Nothing stays allocated if
/// any step fails.
pub fn create_file<'f, E: FsEngine>(fs: &'f Filesystem<'_, E>) -> Result<Box<FileHandle<'f, E>>> {
    let driver = fs.engine()?;
    let device = fs.device()?;
    FileHandle::create(device, driver, fs.dispatch())
}

/// Tear down a file
///
/// Engine resources go first (the engine is asked to close an open session),
/// then the session, then the handle itself.
pub fn destroy_file<E: FsEngine>(file: Box<FileHandle<'_, E>>) {
    drop(file);
}

impl<'f, E: FsEngine> FileHandle<'f, E> {
    fn create(
        device: &'f Device<'f>,
        driver: &'f E,
        dispatch: FileDispatch<E>,
    ) -> Result<Box<Self>> {
        let session = try_box(FileSession::new(device, driver))?;
        try_box(Self { dispatch, session })
    }

    /// Operation table of this handle
    pub fn dispatch(&self) -> &FileDispatch<E> {
        &self.dispatch
    }

    /// Engine-facing session
    pub fn session(&self) -> &FileSession<'f, E> {
        &self.session
    }

    /// File size in bytes
    pub fn size(&self) -> u64 {
        self.session.size
    }

    /// Current read offset
    pub fn offset(&self) -> u64 {
        self.session.offset
    }

    /// Move the read offset
    ///
    /// No bounds check: an offset past the end simply makes the next read
    /// return nothing. On a directory this restarts enumeration.
    pub fn set_offset(&mut self, offset: u64) {
        self.session.offset = offset;
        if self.session.directory && offset == 0 {
            self.session.dir_index = 0;
        }
    }

    /// Path this handle refers to
    pub fn path(&self) -> &str {
        &self.session.path
    }

    /// Whether this handle is a directory
    pub fn is_directory(&self) -> bool {
        self.session.directory
    }

    /// Whether the engine holds an open session for this file
    pub fn is_open(&self) -> bool {
        self.session.open
    }

    pub(crate) fn mark_directory(&mut self, path: &str) {
        self.session.path = path.to_owned();
        self.session.directory = true;
        self.session.dir_index = 0;
    }

    /// Open `path` through the engine
    ///
    /// Path resolution is entirely the engine's business.
    pub fn open(&mut self, path: &str) -> Result<()> {
        self.session.release();
        self.session.path = path.to_owned();
        self.session.offset = 0;
        self.session.size = 0;
        self.session.directory = false;
        self.session.dir_index = 0;

        let driver = self.session.driver;
        match driver.open(&mut self.session, path) {
            Ok(()) => {
                self.session.open = true;
                log::debug!("open: '{}' ({} bytes)", path, self.session.size);
                Ok(())
            }
            Err(err) => {
                log::debug!("open: '{}' failed: {}", path, err);
                self.session.data = None;
                Err(err.into())
            }
        }
    }

    /// Release the engine session; the handle itself stays valid
    pub fn close(&mut self) {
        self.session.release();
    }

    /// Read from the current offset
    ///
    /// Never reads past the end of the file. On failure nothing is consumed.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.session.open {
            return Err(FsError::NotOpen);
        }

        let session = &mut *self.session;
        let remaining = session.size.saturating_sub(session.offset);
        let len = usize::try_from(remaining)
            .map_or(buf.len(), |remaining| remaining.min(buf.len()));
        // Nothing left (or nothing asked for): the engine is not called for
        // an empty read, and the offset stays where it is.
        if len == 0 {
            return Ok(0);
        }

        let driver = session.driver;
        match driver.read(session, &mut buf[..len]) {
            Ok(read) => {
                // an engine cannot hand back more than it was given
                let read = read.min(len);
                session.offset += read as u64;
                Ok(read)
            }
            Err(err) => {
                log::debug!("read: '{}' at {} failed: {}", session.path, session.offset, err);
                Err(err.into())
            }
        }
    }

    /// Walk the directory `path` on this file's device
    pub fn dir(&self, path: &str, hook: &mut DirHook<'_>) -> Result<()> {
        self.session
            .driver
            .dir(self.session.device, path, hook)
            .map_err(FsError::from)
    }

    /// Volume label of this file's device
    pub fn label(&self) -> Result<Option<String>> {
        let label = self.session.driver.label(self.session.device)?;
        Ok(label.map(|raw| String::from_utf8_lossy(&raw).into_owned()))
    }

    /// Next entry of a directory handle, `None` once exhausted
    ///
    /// `.` and `..` are never returned.
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        if !self.session.directory {
            return Err(FsError::NotADirectory);
        }

        let target = self.session.dir_index;
        let mut index = 0usize;
        let mut found = None;
        let mut hook = |name: &str, info: &DirhookInfo| {
            if name == "." || name == ".." {
                return ControlFlow::Continue(());
            }
            if index == target {
                found = Some(DirEntry {
                    name: String::from(name),
                    info: *info,
                });
                return ControlFlow::Break(());
            }
            index += 1;
            ControlFlow::Continue(())
        };
        self.dir(&self.session.path, &mut hook)?;

        if found.is_some() {
            self.session.dir_index += 1;
        }
        Ok(found)
    }

    /// Name, size, type and timestamp of this file
    pub fn info(&self) -> Result<FileInfo> {
        let file_path = self.path();
        if file_path == "/" {
            return Ok(FileInfo {
                name: String::from("/"),
                size: 0,
                directory: true,
                mtime: None,
            });
        }

        let wanted = path::basename(file_path);
        let mut found = None;
        let mut hook = |name: &str, info: &DirhookInfo| {
            let matches = if info.case_insensitive {
                name.eq_ignore_ascii_case(wanted)
            } else {
                name == wanted
            };
            if matches {
                found = Some(*info);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        };
        self.dir(path::parent(file_path), &mut hook)?;

        let info = found.ok_or(FsError::Engine(EngineError::new(ErrorCode::FileNotFound)))?;
        Ok(FileInfo {
            name: String::from(wanted),
            size: if info.dir { 0 } else { self.size() },
            directory: info.dir,
            mtime: info.mtime_set.then_some(info.mtime),
        })
    }

    /// Open `name` (UTF-16, backslash separated) relative to this handle
    ///
    /// Relative names resolve against this handle if it is a directory, or
    /// against its parent otherwise. Directories cannot be opened through the
    /// engine; when the engine reports a wrong file type the path is walked
    /// instead and, if that works, a directory handle is returned.
    pub fn open_child(&self, name: &[u16]) -> Result<Box<FileHandle<'f, E>>> {
        let name = string::utf16_to_narrow(name)
            .map_err(|_| FsError::Engine(EngineError::new(ErrorCode::BadFilename)))?;
        let base = if self.session.directory {
            self.path()
        } else {
            path::parent(self.path())
        };
        let target = path::resolve(base, &name);

        let mut file = Self::create(self.session.device, self.session.driver, self.dispatch)?;
        if target == "/" {
            file.mark_directory(&target);
            return Ok(file);
        }

        match file.open(&target) {
            Ok(()) => Ok(file),
            Err(FsError::Engine(err)) if err.code() == ErrorCode::BadFileType => {
                let mut stop =
                    |_: &str, _: &DirhookInfo| -> ControlFlow<()> { ControlFlow::Break(()) };
                file.dir(&target, &mut stop)?;
                file.mark_directory(&target);
                Ok(file)
            }
            Err(err) => {
                destroy_file(file);
                Err(err)
            }
        }
    }
}
