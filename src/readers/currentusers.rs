// src/readers/currentusers.rs

//! Enumerate the users considered current, i.e. valid for the
//! [`LastLoginIndex`].
//!
//! [`LastLoginIndex`]: crate::readers::lastloginaggregator::LastLoginIndex

use crate::common::{FPath, Username};
use crate::readers::exclusionfilter::SetUsernames;

use std::io::{Error, ErrorKind, Result};

use ::si_trace_print::{defn, defo, defx};
use ::walkdir::WalkDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default directory of user home directories.
pub const USERS_DIR: &str = "/Users";

/// Entries of the users directory beginning with this are not users.
pub const USERS_DIR_SKIP_PREFIX: char = '_';

/// Source of the set of current usernames.
pub trait CurrentUsers {
    fn current_users(&self) -> Result<SetUsernames>;
}

/// A fixed set is its own source.
impl CurrentUsers for SetUsernames {
    fn current_users(&self) -> Result<SetUsernames> {
        Ok(self.clone())
    }
}

/// Current users are the subdirectories of a directory, [`USERS_DIR`] by
/// default, except those beginning with `_`.
///
/// Symbolic links to directories count as directories. Other entries are
/// ignored.
#[derive(Clone, Debug)]
pub struct UsersDirectory {
    path: FPath,
}

impl Default for UsersDirectory {
    fn default() -> Self {
        UsersDirectory::new(FPath::from(USERS_DIR))
    }
}

impl UsersDirectory {
    pub fn new(path: FPath) -> UsersDirectory {
        UsersDirectory { path }
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }
}

impl CurrentUsers for UsersDirectory {
    fn current_users(&self) -> Result<SetUsernames> {
        defn!("({:?})", self.path);
        let mut users = SetUsernames::new();
        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // the users directory itself is unreadable or missing
                    if err.depth() == 0 {
                        let kind: ErrorKind = err
                            .io_error()
                            .map_or(ErrorKind::Other, |e| e.kind());
                        defx!("return Err {}", err);
                        return Err(Error::new(kind, format!("{} for directory {:?}", err, self.path)));
                    }
                    // e.g. a dangling symbolic link
                    defo!("skip entry error {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                defo!("skip not a directory {:?}", entry.path());
                continue;
            }
            let name: &str = match entry.file_name().to_str() {
                Some(name) => name,
                None => {
                    defo!("skip non-UTF-8 name {:?}", entry.file_name());
                    continue;
                }
            };
            if name.starts_with(USERS_DIR_SKIP_PREFIX) {
                defo!("skip {:?}", name);
                continue;
            }
            users.insert(Username::from(name));
        }
        defx!("return {} users", users.len());

        Ok(users)
    }
}
