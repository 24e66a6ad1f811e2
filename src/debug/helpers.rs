// src/debug/helpers.rs

//! Miscellaneous helper functions for testing.

use crate::common::FPath;

use std::fs::create_dir;
use std::io::Write; // for `NamedTempFile.write_all`
use std::path::PathBuf;

use ::lazy_static::lazy_static;
use ::si_trace_print::{defñ, defo};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-lastlogins-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    defo!("wrote {} bytes to {:?}", data.len(), ntf.path());

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    ::tempfile::tempdir().unwrap()
}

/// Create each of `names` as an empty directory within `tempdir`.
pub fn create_dirs_in_tmpdir(
    names: &[&str],
    tempdir: &TempDir,
) {
    for name in names.iter() {
        let pathb: PathBuf = tempdir.path().join(name);
        defñ!("create_dir({:?})", pathb);
        match create_dir(&pathb) {
            Ok(_) => {}
            Err(err) => panic!("create_dir({:?}) Error {:?}", pathb, err),
        }
    }
}

/// Create each of `names` as an empty regular file within `tempdir`.
pub fn create_files_in_tmpdir(
    names: &[&str],
    tempdir: &TempDir,
) {
    for name in names.iter() {
        let pathb: PathBuf = tempdir.path().join(name);
        defñ!("File::create({:?})", pathb);
        match std::fs::File::create(&pathb) {
            Ok(_) => {}
            Err(err) => panic!("File::create({:?}) Error {:?}", pathb, err),
        }
    }
}
