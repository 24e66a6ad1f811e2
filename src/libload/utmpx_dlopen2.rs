// src/libload/utmpx_dlopen2.rs

//! Functions to dynamically load the macOS `libSystem` accounting log
//! iteration functions using [`dlopen2`].
//!
//! The `*_wtmp` functions are private to Darwin. They iterate the
//! `wtmpx` login accounting log the same way `setutxent`, `getutxent`, and
//! `endutxent` iterate the `utmpx` database.
//!
//! [`dlopen2`]: https://docs.rs/dlopen2/0.7.0/dlopen2/index.html

use crate::data::utmpx::macos::utmpx;

use std::fmt;
use std::sync::{Arc, RwLock};

use ::cfg_if::cfg_if;
use ::dlopen2::wrapper::{Container, WrapperApi};
use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

cfg_if! {
    if #[cfg(target_os = "macos")] {
        /// User-friendly name for the system C library, used in error messages.
        pub const LIB_NAME_SYSTEM: &str = "libSystem.dylib";
        const LIB_NAME_SYSTEM_NAMES_LEN: usize = 3;
        /// All possible names for the system C library
        /// used in [`load_library_system`].
        ///
        /// Since macOS 11 the library is not on disk; it is in the
        /// dyld shared cache. `dlopen` still succeeds for these paths.
        pub const LIB_NAME_SYSTEM_NAMES: [&str; LIB_NAME_SYSTEM_NAMES_LEN] = [
            "/usr/lib/libSystem.B.dylib",
            "libSystem.B.dylib",
            LIB_NAME_SYSTEM,
        ];
    } else {
        /// User-friendly name for the system C library, used in error messages.
        ///
        /// Other platforms do not export the `*_wtmp` functions so loading
        /// will fail at symbol resolution.
        pub const LIB_NAME_SYSTEM: &str = "libc.so.6";
        const LIB_NAME_SYSTEM_NAMES_LEN: usize = 2;
        pub const LIB_NAME_SYSTEM_NAMES: [&str; LIB_NAME_SYSTEM_NAMES_LEN] = [
            LIB_NAME_SYSTEM,
            "libc.so",
        ];
    }
}

/// [`dlopen2`] API wrapper for the `wtmpx` iteration functions of
/// [`utmpx.h`].
///
/// [`dlopen2`]: https://docs.rs/dlopen2/0.7.0/dlopen2/index.html
/// [`utmpx.h`]: https://github.com/apple-oss-distributions/Libc/blob/Libc-1592.100.35/include/utmpx.h#L141-L143
#[derive(WrapperApi)]
pub struct UtmpxWtmpApi {
    /// Function signature for `setutxent_wtmp`.
    ///
    /// Rewind to the first record. `forward` of `0` iterates oldest to
    /// newest.
    setutxent_wtmp: unsafe extern "C" fn(
        forward: ::std::os::raw::c_int,
    ),

    /// Function signature for `getutxent_wtmp`.
    ///
    /// Returns a pointer to a static buffer that is overwritten by the
    /// next call, or NULL when there are no more records or on error.
    getutxent_wtmp: unsafe extern "C" fn() -> *mut utmpx,

    /// Function signature for `endutxent_wtmp`.
    endutxent_wtmp: unsafe extern "C" fn(),
}

/// `dlopen2` container for the `wtmpx` interface.
pub type UtmpxApiContainer = Container<UtmpxWtmpApi>;

/// Multi-threaded pointer to the `wtmpx` interface.
pub type UtmpxApiPtr = Arc<UtmpxApiContainer>;

lazy_static! {
    /// The interface for the `wtmpx` functions of the system C library.
    ///
    /// `None` until [`load_library_system`] succeeds.
    pub static ref UTMPX_WTMP_API: RwLock<Option<UtmpxApiPtr>> = {
        RwLock::new(None)
    };

    /// None means `load_library_system()` has not been called yet.
    /// Some(false) means `load_library_system()` was called but failed.
    /// Some(true) means `load_library_system()` was called and succeeded.
    pub static ref LOAD_LIBRARY_SYSTEM_OK: RwLock<Option<bool>> = {
        RwLock::new(None)
    };
}

/// Accessor for lazy_static [`UTMPX_WTMP_API`].
///
/// Returns `None` if [`load_library_system`] has not succeeded.
///
/// [`UTMPX_WTMP_API`]: static@UTMPX_WTMP_API
pub fn utmpx_api() -> Option<UtmpxApiPtr> {
    match UTMPX_WTMP_API.read() {
        Ok(guard) => guard.as_ref().cloned(),
        Err(_) => None,
    }
}

/// Return values for [`load_library_system`].
pub enum LoadLibraryError {
    /// The library was successfully loaded.
    Ok,
    /// The library failed to load and this was the error.
    Err(::dlopen2::Error),
    /// A previous attempt to load the library failed (the previous attempt
    /// returned `Err`). No more attempts will be made to load the library.
    PrevErr,
}

impl PartialEq for LoadLibraryError {
    /// allow `Err` == `PrevErr`
    fn eq(&self, other: &LoadLibraryError) -> bool {
        matches!(
            (self, other),
            (LoadLibraryError::Ok, LoadLibraryError::Ok)
                | (LoadLibraryError::Err(_), LoadLibraryError::Err(_))
                | (LoadLibraryError::Err(_), LoadLibraryError::PrevErr)
                | (LoadLibraryError::PrevErr, LoadLibraryError::Err(_))
                | (LoadLibraryError::PrevErr, LoadLibraryError::PrevErr)
        )
    }
}
impl Eq for LoadLibraryError {}

impl fmt::Debug for LoadLibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadLibraryError::Ok => f.debug_struct("LoadLibraryError::Ok").finish(),
            LoadLibraryError::Err(err) => f
                .debug_struct("LoadLibraryError::Err")
                .field("error", &err.to_string())
                .finish(),
            LoadLibraryError::PrevErr => f.debug_struct("LoadLibraryError::PrevErr").finish(),
        }
    }
}

impl fmt::Display for LoadLibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadLibraryError::Ok => write!(f, "loaded {}", LIB_NAME_SYSTEM),
            LoadLibraryError::Err(err) => write!(f, "failed to load {}: {}", LIB_NAME_SYSTEM, err),
            LoadLibraryError::PrevErr => write!(f, "failed to load {} (previous attempt)", LIB_NAME_SYSTEM),
        }
    }
}

/// Record the outcome of a load attempt. A poisoned lock is ignored; the
/// next call will attempt the load again.
fn set_load_library_system_ok(ok: bool) {
    if let Ok(mut guard) = LOAD_LIBRARY_SYSTEM_OK.write() {
        *guard = Some(ok);
    }
}

/// Wrapper to set the global static variables.
fn set_utmpx_api(container: UtmpxApiContainer) {
    defñ!();
    if let Ok(mut guard) = UTMPX_WTMP_API.write() {
        *guard = Some(Arc::new(container));
    }
    set_load_library_system_ok(true);
}

/// Load the system C library and resolve the `wtmpx` iteration functions.
/// Store in the global static variable `UTMPX_WTMP_API` the
/// [`dlopen2::Container`] object.
///
/// Only attempts to load the library once.
///
/// If the load library attempt fails the first time then that call will
/// return `LoadLibraryError::Err`. All subsequent calls to
/// `load_library_system` will return `LoadLibraryError::PrevErr`.
/// A library that loads but lacks any one of the three functions is a
/// failure.
///
/// If the load library succeeds in the current call or in a previous call
/// then return `LoadLibraryError::Ok`.
///
/// [`dlopen2::Container`]: https://docs.rs/dlopen2/0.7.0/dlopen2/wrapper/struct.Container.html
pub fn load_library_system() -> LoadLibraryError {
    // only attempt to load the library once. if that fails don't try again.
    if let Ok(guard) = LOAD_LIBRARY_SYSTEM_OK.read() {
        match *guard {
            Some(true) => return LoadLibraryError::Ok,
            Some(false) => return LoadLibraryError::PrevErr,
            None => {}
        }
    }

    defn!();

    let mut err_last: Option<::dlopen2::Error> = None;
    for libname in LIB_NAME_SYSTEM_NAMES.iter() {
        defo!("Container::load({:?})", libname);
        match unsafe { UtmpxApiContainer::load(libname) } {
            Ok(container) => {
                defx!("loaded library {:?}", libname);
                set_utmpx_api(container);
                return LoadLibraryError::Ok;
            }
            Err(err) => {
                defo!("failed to load library {:?}: {}", libname, err);
                err_last = Some(err);
            }
        }
    }
    set_load_library_system_ok(false);

    match err_last {
        Some(err) => {
            defx!("return Err({})", err);
            LoadLibraryError::Err(err)
        }
        None => {
            defx!("return PrevErr");
            LoadLibraryError::PrevErr
        }
    }
}
