// src/data/utmpx.rs

//! Implement [`RawRecord`] for the Darwin [`utmpx`] C struct, the
//! fixed-size user accounting record stored in the login accounting log
//! (`wtmpx`).
//!
//! A `RawRecord` is an owned, safe copy of one `utmpx`. Byte fields are
//! kept verbatim; decoding them to `String` happens in
//! [`RawRecord::user`], [`RawRecord::line`], and [`RawRecord::host`].
//!
//! [`RawRecord`]: self::RawRecord
//! [`utmpx`]: https://github.com/apple-oss-distributions/Libc/blob/Libc-1592.100.35/include/utmpx.h#L100-L111

#[doc(hidden)]
use crate::de_err;
use crate::common::EpochSeconds;
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;

use ::bstr::ByteSlice;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `utmpx` definitions found on macOS (Darwin), both x86_64 and arm64.
#[allow(non_camel_case_types, unused)]
pub mod macos {
    use std::mem::size_of;
    use ::memoffset::offset_of;
    use ::const_format::assertcp_eq;

    pub type c_char = std::ffi::c_char;
    pub type c_short = std::ffi::c_short;
    pub type pid_t = std::ffi::c_int;
    pub type time_t = i64;
    pub type suseconds_t = i32;

    /// From [`sys/_types/_timeval.h`]
    ///
    /// ```C
    /// _STRUCT_TIMEVAL
    /// {
    ///     __darwin_time_t         tv_sec;         /* seconds */
    ///     __darwin_suseconds_t    tv_usec;        /* and microseconds */
    /// };
    /// ```
    ///
    /// [`sys/_types/_timeval.h`]: https://github.com/apple-oss-distributions/xnu/blob/xnu-10002.1.13/bsd/sys/_types/_timeval.h
    #[derive(Clone, Copy)]
    #[repr(C)]
    pub struct timeval {
        pub tv_sec: time_t,
        pub tv_usec: suseconds_t,
    }

    pub const TIMEVAL_SZ: usize = size_of::<timeval>();
    assertcp_eq!(TIMEVAL_SZ, 16);
    assertcp_eq!(offset_of!(timeval, tv_sec), 0);
    assertcp_eq!(offset_of!(timeval, tv_usec), 8);

    pub const UT_USERSIZE: usize = 256;
    pub const UT_IDSIZE: usize = 4;
    pub const UT_LINESIZE: usize = 32;
    pub const UT_HOSTSIZE: usize = 256;
    pub const UT_PADSIZE: usize = 16;

    /// From [`include/utmpx.h`]
    ///
    /// ```C
    /// struct utmpx {
    ///     char ut_user[_UTX_USERSIZE];    /* login name */
    ///     char ut_id[_UTX_IDSIZE];        /* id */
    ///     char ut_line[_UTX_LINESIZE];    /* tty name */
    ///     pid_t ut_pid;                   /* process id creating the entry */
    ///     short ut_type;                  /* type of this entry */
    ///     struct timeval ut_tv;           /* time entry was created */
    ///     char ut_host[_UTX_HOSTSIZE];    /* host name */
    ///     __uint32_t ut_pad[16];          /* reserved for future use */
    /// };
    /// ```
    ///
    /// ---
    ///
    /// ```text
    /// utmpx                    sizeof 640
    /// utmpx.ut_user       @  0 sizeof 256
    /// utmpx.ut_id         @256 sizeof   4
    /// utmpx.ut_line       @260 sizeof  32
    /// utmpx.ut_pid        @292 sizeof   4
    /// utmpx.ut_type       @296 sizeof   2
    /// utmpx.ut_tv         @304 sizeof  16
    /// utmpx.ut_tv.tv_sec  @304 sizeof   8
    /// utmpx.ut_tv.tv_usec @312 sizeof   4
    /// utmpx.ut_host       @320 sizeof 256
    /// utmpx.ut_pad        @576 sizeof  64
    /// ```
    ///
    /// [`include/utmpx.h`]: https://github.com/apple-oss-distributions/Libc/blob/Libc-1592.100.35/include/utmpx.h#L100-L111
    #[derive(Clone, Copy)]
    #[repr(C)]
    pub struct utmpx {
        pub ut_user: [c_char; UT_USERSIZE],
        pub ut_id: [c_char; UT_IDSIZE],
        pub ut_line: [c_char; UT_LINESIZE],
        pub ut_pid: pid_t,
        pub ut_type: c_short,
        pub ut_tv: timeval,
        pub ut_host: [c_char; UT_HOSTSIZE],
        pub ut_pad: [u32; UT_PADSIZE],
    }

    pub const UTMPX_SZ: usize = size_of::<utmpx>();
    pub const UTMPX_OFFSET_USER: usize = offset_of!(utmpx, ut_user);
    pub const UTMPX_OFFSET_ID: usize = offset_of!(utmpx, ut_id);
    pub const UTMPX_OFFSET_LINE: usize = offset_of!(utmpx, ut_line);
    pub const UTMPX_OFFSET_PID: usize = offset_of!(utmpx, ut_pid);
    pub const UTMPX_OFFSET_TYPE: usize = offset_of!(utmpx, ut_type);
    pub const UTMPX_OFFSET_TV_SEC: usize = offset_of!(utmpx, ut_tv) + offset_of!(timeval, tv_sec);
    pub const UTMPX_OFFSET_TV_USEC: usize = offset_of!(utmpx, ut_tv) + offset_of!(timeval, tv_usec);
    pub const UTMPX_OFFSET_HOST: usize = offset_of!(utmpx, ut_host);
    assertcp_eq!(UTMPX_SZ, 640);
    assertcp_eq!(UTMPX_OFFSET_USER, 0);
    assertcp_eq!(UTMPX_OFFSET_ID, 256);
    assertcp_eq!(UTMPX_OFFSET_LINE, 260);
    assertcp_eq!(UTMPX_OFFSET_PID, 292);
    assertcp_eq!(UTMPX_OFFSET_TYPE, 296);
    assertcp_eq!(UTMPX_OFFSET_TV_SEC, 304);
    assertcp_eq!(UTMPX_OFFSET_TV_USEC, 312);
    assertcp_eq!(UTMPX_OFFSET_HOST, 320);
    assertcp_eq!(offset_of!(utmpx, ut_pad), 576);

    /// From [`include/utmpx.h`]
    ///
    /// ```C
    /// #define EMPTY           0
    /// #define RUN_LVL         1
    /// #define BOOT_TIME       2
    /// #define OLD_TIME        3
    /// #define NEW_TIME        4
    /// #define INIT_PROCESS    5
    /// #define LOGIN_PROCESS   6
    /// #define USER_PROCESS    7
    /// #define DEAD_PROCESS    8
    /// #define ACCOUNTING      9
    /// #define SIGNATURE       10
    /// #define SHUTDOWN_TIME   11
    /// ```
    ///
    /// [`include/utmpx.h`]: https://github.com/apple-oss-distributions/Libc/blob/Libc-1592.100.35/include/utmpx.h#L74-L88
    pub const EMPTY: c_short = 0;
    pub const BOOT_TIME: c_short = 2;
    pub const USER_PROCESS: c_short = 7;
    pub const DEAD_PROCESS: c_short = 8;
    pub const SHUTDOWN_TIME: c_short = 11;
}

pub use macos::{
    BOOT_TIME,
    DEAD_PROCESS,
    SHUTDOWN_TIME,
    USER_PROCESS,
    UTMPX_SZ,
    UT_HOSTSIZE,
    UT_LINESIZE,
    UT_USERSIZE,
};

#[allow(non_camel_case_types)]
pub type ut_type_type = i16;
#[allow(non_camel_case_types)]
pub type tv_sec_type = EpochSeconds;
#[allow(non_camel_case_types)]
pub type tv_usec_type = i32;

/// Map [`.ut_type`] value, implied in the index offset, to a `str`
/// representation.
///
/// [`.ut_type`]: self::macos::utmpx#structfield.ut_type
pub const UT_TYPE_VAL_TO_STR: &[&str] = &[
    "EMPTY",
    "RUN_LVL",
    "BOOT_TIME",
    "OLD_TIME",
    "NEW_TIME",
    "INIT_PROCESS",
    "LOGIN_PROCESS",
    "USER_PROCESS",
    "DEAD_PROCESS",
    "ACCOUNTING",
    "SIGNATURE",
    "SHUTDOWN_TIME",
];

/// Return the `str` name of a `ut_type` value, or `"UNKNOWN"`.
pub fn ut_type_to_str(ut_type: ut_type_type) -> &'static str {
    match usize::try_from(ut_type) {
        Ok(index) => UT_TYPE_VAL_TO_STR.get(index).copied().unwrap_or("UNKNOWN"),
        Err(_) => "UNKNOWN",
    }
}

/// Decode a NUL-padded C `char` byte field.
///
/// Bytes at and after the first NUL are ignored. Invalid UTF-8 sequences
/// are replaced with `U+FFFD`. Trailing whitespace is trimmed.
pub fn decode_field(field: &[u8]) -> String {
    let end: usize = field.find_byte(0).unwrap_or(field.len());
    let s = field[..end].to_str_lossy();

    s.trim_end().to_string()
}

/// Copy `src` into a NUL-padded fixed buffer, truncating if too long.
fn str_to_field<const N: usize>(src: &str) -> [u8; N] {
    let mut field: [u8; N] = [0; N];
    let len = std::cmp::min(src.len(), N);
    field[..len].copy_from_slice(&src.as_bytes()[..len]);

    field
}

/// C `char` array to `u8` array.
fn c_chars_to_bytes<const N: usize>(src: &[macos::c_char; N]) -> [u8; N] {
    let mut field: [u8; N] = [0; N];
    for (b, c) in field.iter_mut().zip(src.iter()) {
        *b = *c as u8;
    }

    field
}

/// One user accounting record, copied from a [`utmpx`].
///
/// Only the fields used for session event derivation are retained.
///
/// [`utmpx`]: self::macos::utmpx
#[derive(Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// `ut_type`, e.g. [`USER_PROCESS`].
    pub ut_type: ut_type_type,
    /// `ut_user`, NUL-padded.
    pub ut_user: [u8; UT_USERSIZE],
    /// `ut_line`, NUL-padded.
    pub ut_line: [u8; UT_LINESIZE],
    /// `ut_host`, NUL-padded.
    pub ut_host: [u8; UT_HOSTSIZE],
    /// `ut_tv.tv_sec`
    pub tv_sec: tv_sec_type,
    /// `ut_tv.tv_usec`
    pub tv_usec: tv_usec_type,
    /// `ut_pid`
    pub ut_pid: i32,
}

impl From<&macos::utmpx> for RawRecord {
    fn from(entry: &macos::utmpx) -> Self {
        RawRecord {
            ut_type: entry.ut_type,
            ut_user: c_chars_to_bytes(&entry.ut_user),
            ut_line: c_chars_to_bytes(&entry.ut_line),
            ut_host: c_chars_to_bytes(&entry.ut_host),
            tv_sec: entry.ut_tv.tv_sec,
            tv_usec: entry.ut_tv.tv_usec,
            ut_pid: entry.ut_pid,
        }
    }
}

impl fmt::Debug for RawRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        let mut ds = f.debug_struct("RawRecord");
        ds.field("ut_type", &ut_type_to_str(self.ut_type));
        #[cfg(any(debug_assertions, test))]
        {
            ds.field("ut_user", &buffer_to_String_noraw(self.user_bytes()))
                .field("ut_line", &buffer_to_String_noraw(self.line_bytes()))
                .field("ut_host", &buffer_to_String_noraw(self.host_bytes()));
        }
        #[cfg(not(any(debug_assertions, test)))]
        {
            ds.field("ut_user", &self.user())
                .field("ut_line", &self.line())
                .field("ut_host", &self.host());
        }
        ds.field("tv_sec", &self.tv_sec)
            .field("tv_usec", &self.tv_usec)
            .field("ut_pid", &self.ut_pid)
            .finish()
    }
}

/// Field bytes up to the first NUL.
fn field_until_nul(field: &[u8]) -> &[u8] {
    let end: usize = field.find_byte(0).unwrap_or(field.len());

    &field[..end]
}

impl RawRecord {
    /// Create a new `RawRecord` from decoded values.
    ///
    /// Strings longer than the field size are truncated.
    pub fn new(
        ut_type: ut_type_type,
        user: &str,
        line: &str,
        host: &str,
        tv_sec: tv_sec_type,
    ) -> RawRecord {
        RawRecord {
            ut_type,
            ut_user: str_to_field::<UT_USERSIZE>(user),
            ut_line: str_to_field::<UT_LINESIZE>(line),
            ut_host: str_to_field::<UT_HOSTSIZE>(host),
            tv_sec,
            tv_usec: 0,
            ut_pid: 0,
        }
    }

    /// Decoded `ut_user`.
    pub fn user(&self) -> String {
        decode_field(&self.ut_user)
    }

    /// Decoded `ut_line`.
    pub fn line(&self) -> String {
        decode_field(&self.ut_line)
    }

    /// Decoded `ut_host`.
    pub fn host(&self) -> String {
        decode_field(&self.ut_host)
    }

    pub fn user_bytes(&self) -> &[u8] {
        field_until_nul(&self.ut_user)
    }

    pub fn line_bytes(&self) -> &[u8] {
        field_until_nul(&self.ut_line)
    }

    pub fn host_bytes(&self) -> &[u8] {
        field_until_nul(&self.ut_host)
    }

    /// Serialize to the bytes of a [`utmpx`] in native byte order.
    /// The inverse of [`buffer_to_rawrecord`].
    ///
    /// `ut_id` and `ut_pad` are zeroed.
    ///
    /// [`utmpx`]: self::macos::utmpx
    pub fn as_bytes(&self) -> [u8; UTMPX_SZ] {
        let mut buffer: [u8; UTMPX_SZ] = [0; UTMPX_SZ];
        buffer[macos::UTMPX_OFFSET_USER..macos::UTMPX_OFFSET_USER + UT_USERSIZE]
            .copy_from_slice(&self.ut_user);
        buffer[macos::UTMPX_OFFSET_LINE..macos::UTMPX_OFFSET_LINE + UT_LINESIZE]
            .copy_from_slice(&self.ut_line);
        buffer[macos::UTMPX_OFFSET_PID..macos::UTMPX_OFFSET_PID + 4]
            .copy_from_slice(&self.ut_pid.to_ne_bytes());
        buffer[macos::UTMPX_OFFSET_TYPE..macos::UTMPX_OFFSET_TYPE + 2]
            .copy_from_slice(&self.ut_type.to_ne_bytes());
        buffer[macos::UTMPX_OFFSET_TV_SEC..macos::UTMPX_OFFSET_TV_SEC + 8]
            .copy_from_slice(&self.tv_sec.to_ne_bytes());
        buffer[macos::UTMPX_OFFSET_TV_USEC..macos::UTMPX_OFFSET_TV_USEC + 4]
            .copy_from_slice(&self.tv_usec.to_ne_bytes());
        buffer[macos::UTMPX_OFFSET_HOST..macos::UTMPX_OFFSET_HOST + UT_HOSTSIZE]
            .copy_from_slice(&self.ut_host);

        buffer
    }
}

/// Convert `[u8]` bytes to a [`RawRecord`].
///
/// Returns `None` if the buffer is smaller than [`UTMPX_SZ`]. Bytes past
/// `UTMPX_SZ` are ignored.
pub fn buffer_to_rawrecord(buffer: &[u8]) -> Option<RawRecord> {
    defn!("(buffer len {:?})", buffer.len());
    if buffer.len() < UTMPX_SZ {
        de_err!("buffer too small; {}, require {}", buffer.len(), UTMPX_SZ);
        defx!("return None");
        return None;
    }
    let slice_ = &buffer[..UTMPX_SZ];
    // `read_unaligned` as a `[u8]` has no alignment guarantee
    let entry: macos::utmpx = unsafe {
        std::ptr::read_unaligned(slice_.as_ptr().cast::<macos::utmpx>())
    };
    let record = RawRecord::from(&entry);
    defx!("return {:?}", record);

    Some(record)
}
