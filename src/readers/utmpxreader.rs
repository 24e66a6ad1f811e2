// src/readers/utmpxreader.rs

//! Implements the [`RecordReader`] trait and its two implementations,
//! [`UtmpxApiReader`] and [`UtmpxFileReader`].
//!
//! A `RecordReader` yields [`RawRecord`]s from the login accounting log,
//! front to back, once. After the end of the log or after an error, a
//! `RecordReader` only returns [`ResultS3::Done`].
//!
//! The handle to the accounting log is released exactly once, by an
//! explicit call to [`RecordReader::close`] or when the reader is dropped.
//!
//! _XXX: not rust "Readers"; these do not implement trait [`Read`]._
//!
//! [`RecordReader`]: self::RecordReader
//! [`UtmpxApiReader`]: self::UtmpxApiReader
//! [`UtmpxFileReader`]: self::UtmpxFileReader
//! [`RawRecord`]: crate::data::utmpx::RawRecord
//! [`ResultS3::Done`]: crate::common::ResultS3::Done
//! [`Read`]: std::io::Read

use crate::{de_err, de_wrn};
use crate::common::{Count, FPath, FileOpenOptions, ResultS3};
use crate::data::utmpx::{buffer_to_rawrecord, RawRecord, UTMPX_SZ};
use crate::libload::utmpx_dlopen2::{
    load_library_system,
    utmpx_api,
    LoadLibraryError,
    UtmpxApiPtr,
    LIB_NAME_SYSTEM,
};

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Error, ErrorKind, Read, Result};

use ::nix::errno::Errno;
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of [`RecordReader::next`].
pub type ResultS3RawRecord = ResultS3<RawRecord, Error>;

/// The path of the macOS login accounting log.
pub const WTMPX_PATH: &str = "/var/log/utmpx";

/// A lazy, finite, non-restartable source of [`RawRecord`]s.
pub trait RecordReader {
    /// Return the next record, [`ResultS3::Done`] at the end of the log,
    /// or [`ResultS3::Err`] for an error while reading.
    ///
    /// After `Done` or `Err` every later call returns `Done`.
    #[allow(clippy::should_implement_trait)]
    fn next(&mut self) -> ResultS3RawRecord;

    /// Release the handle to the accounting log. Idempotent.
    fn close(&mut self);

    /// `Count` of records returned as `Found`.
    fn records_read(&self) -> Count;

    /// Where the records come from, for messages.
    fn source(&self) -> String;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UtmpxApiReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Is a NULL return of `getutxent_wtmp` with `errno` a read failure?
///
/// Only `EIO` is. Any other `errno` is left over from calls inside
/// `libSystem` and the NULL is the end of the log.
pub fn null_is_error(errno: i32) -> bool {
    errno == Errno::EIO as i32
}

/// Reads the login accounting log using the native `libSystem` functions
/// `setutxent_wtmp`, `getutxent_wtmp`, and `endutxent_wtmp`.
///
/// The native functions iterate process-global state so only one
/// `UtmpxApiReader` should be open at a time.
pub struct UtmpxApiReader {
    api: UtmpxApiPtr,
    /// `setutxent_wtmp` was called and `endutxent_wtmp` was not.
    is_open: bool,
    /// `Done` or `Err` was returned.
    is_done: bool,
    records_read: Count,
}

impl fmt::Debug for UtmpxApiReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("UtmpxApiReader")
            .field("is_open", &self.is_open)
            .field("is_done", &self.is_done)
            .field("records_read", &self.records_read)
            .finish()
    }
}

impl UtmpxApiReader {
    /// Load the native library and begin iteration of the accounting log.
    ///
    /// A missing library or a missing function is an `Error` of kind
    /// `ErrorKind::NotFound`.
    pub fn open() -> Result<UtmpxApiReader> {
        defn!();
        match load_library_system() {
            LoadLibraryError::Ok => {}
            err @ LoadLibraryError::Err(_) | err @ LoadLibraryError::PrevErr => {
                de_err!("{}", err);
                defx!("return Err");
                return Err(Error::new(ErrorKind::NotFound, err.to_string()));
            }
        }
        let api: UtmpxApiPtr = match utmpx_api() {
            Some(api) => api,
            None => {
                defx!("return Err; utmpx_api() is None");
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("{} interface is not available", LIB_NAME_SYSTEM),
                ));
            }
        };
        defo!("setutxent_wtmp(0)");
        unsafe { api.setutxent_wtmp(0) };
        defx!("return Ok");

        Ok(UtmpxApiReader {
            api,
            is_open: true,
            is_done: false,
            records_read: 0,
        })
    }
}

impl RecordReader for UtmpxApiReader {
    fn next(&mut self) -> ResultS3RawRecord {
        if !self.is_open || self.is_done {
            defñ!("return Done; is_open {}, is_done {}", self.is_open, self.is_done);
            return ResultS3::Done;
        }
        // `getutxent_wtmp` returns NULL at the end of the log. `errno` is
        // undefined then, except for a failed read of the log file
        Errno::clear();
        let entry = unsafe { self.api.getutxent_wtmp() };
        if entry.is_null() {
            self.is_done = true;
            let errno: i32 = Errno::last_raw();
            if !null_is_error(errno) {
                if errno != 0 {
                    de_wrn!("getutxent_wtmp() returned NULL with errno {}; treated as end of log", errno);
                }
                defñ!("return Done; errno {}", errno);
                return ResultS3::Done;
            }
            let err = Error::from_raw_os_error(errno);
            de_err!("getutxent_wtmp() failed: {}", err);
            defñ!("return Err {:?}", err);
            return ResultS3::Err(Error::new(
                err.kind(),
                format!("getutxent_wtmp failed after {} records: {}", self.records_read, err),
            ));
        }
        // copy out of the static buffer before the next call overwrites it
        let record = RawRecord::from(unsafe { &*entry });
        self.records_read += 1;
        defñ!("return Found {:?}", record);

        ResultS3::Found(record)
    }

    fn close(&mut self) {
        if !self.is_open {
            return;
        }
        defñ!("endutxent_wtmp()");
        unsafe { self.api.endutxent_wtmp() };
        self.is_open = false;
        self.is_done = true;
    }

    fn records_read(&self) -> Count {
        self.records_read
    }

    fn source(&self) -> String {
        format!("{} ({})", WTMPX_PATH, LIB_NAME_SYSTEM)
    }
}

impl Drop for UtmpxApiReader {
    fn drop(&mut self) {
        self.close();
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UtmpxFileReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reads consecutive [`UTMPX_SZ`] byte records from a file, e.g. a copy
/// of `/var/log/utmpx`.
///
/// A trailing partial record is an `Error` of kind
/// `ErrorKind::UnexpectedEof`.
pub struct UtmpxFileReader {
    path: FPath,
    reader: Option<BufReader<File>>,
    is_done: bool,
    records_read: Count,
    bytes_read: u64,
}

impl fmt::Debug for UtmpxFileReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("UtmpxFileReader")
            .field("path", &self.path)
            .field("is_open", &self.reader.is_some())
            .field("is_done", &self.is_done)
            .field("records_read", &self.records_read)
            .field("bytes_read", &self.bytes_read)
            .finish()
    }
}

impl UtmpxFileReader {
    /// Open the file at `path`.
    pub fn open(path: &FPath) -> Result<UtmpxFileReader> {
        defn!("({:?})", path);
        let file: File = match FileOpenOptions::new().read(true).open(path) {
            Ok(file) => file,
            Err(err) => {
                defx!("return Err {}", err);
                return Err(Error::new(err.kind(), format!("{} for file {:?}", err, path)));
            }
        };
        match file.metadata() {
            Ok(metadata) if !metadata.is_file() => {
                defx!("return Err; not a file");
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("not a regular file {:?}", path),
                ));
            }
            Ok(_) => {}
            Err(err) => {
                defx!("return Err {}", err);
                return Err(Error::new(err.kind(), format!("{} for file {:?}", err, path)));
            }
        }
        defx!("return Ok");

        Ok(UtmpxFileReader {
            path: path.clone(),
            reader: Some(BufReader::new(file)),
            is_done: false,
            records_read: 0,
            bytes_read: 0,
        })
    }

    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Fill `buffer` as much as possible. Returns the number of bytes read,
    /// less than `buffer.len()` only at the end of the file.
    fn read_record_bytes(
        reader: &mut BufReader<File>,
        buffer: &mut [u8],
    ) -> Result<usize> {
        let mut at: usize = 0;
        while at < buffer.len() {
            match reader.read(&mut buffer[at..]) {
                Ok(0) => break,
                Ok(len) => at += len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(at)
    }
}

impl RecordReader for UtmpxFileReader {
    fn next(&mut self) -> ResultS3RawRecord {
        if self.is_done {
            return ResultS3::Done;
        }
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => {
                self.is_done = true;
                return ResultS3::Done;
            }
        };
        let mut buffer: [u8; UTMPX_SZ] = [0; UTMPX_SZ];
        let len: usize = match UtmpxFileReader::read_record_bytes(reader, &mut buffer) {
            Ok(len) => len,
            Err(err) => {
                self.is_done = true;
                de_err!("read failed {}; file {:?}", err, self.path);
                return ResultS3::Err(Error::new(
                    err.kind(),
                    format!("{} at byte {} of file {:?}", err, self.bytes_read, self.path),
                ));
            }
        };
        if len == 0 {
            self.is_done = true;
            defñ!("return Done; {} records", self.records_read);
            return ResultS3::Done;
        }
        if len < UTMPX_SZ {
            self.is_done = true;
            de_err!("partial record of {} bytes; file {:?}", len, self.path);
            return ResultS3::Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "partial record of {} bytes (expected {}) at byte {} of file {:?}",
                    len, UTMPX_SZ, self.bytes_read, self.path,
                ),
            ));
        }
        self.bytes_read += len as u64;
        let record: RawRecord = match buffer_to_rawrecord(&buffer) {
            Some(record) => record,
            None => {
                self.is_done = true;
                return ResultS3::Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("failed to decode record at byte {} of file {:?}", self.bytes_read, self.path),
                ));
            }
        };
        self.records_read += 1;
        defñ!("return Found {:?}", record);

        ResultS3::Found(record)
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            defñ!("closed {:?}", self.path);
        }
        self.is_done = true;
    }

    fn records_read(&self) -> Count {
        self.records_read
    }

    fn source(&self) -> String {
        self.path.clone()
    }
}

impl Drop for UtmpxFileReader {
    fn drop(&mut self) {
        self.close();
    }
}
