// src/readers/identity.rs

//! Resolve a username to a numeric [`Uid`].
//!
//! Implementations of [`IdentityResolver`]:
//!
//! * [`PasswdResolver`] looks up the user database.
//! * [`IdCommandResolver`] runs `/usr/bin/id -u`.
//! * [`NoResolver`] never resolves.
//! * [`CachingResolver`] memoises another resolver.
//!
//! A failed lookup is never an error; the event is left without a `Uid`.
//!
//! [`Uid`]: crate::data::sessionevent::Uid

use crate::de_wrn;
use crate::common::{FPath, Username};
use crate::data::sessionevent::Uid;

use std::collections::HashMap;
use std::fmt;
use std::process::{Command, Output, Stdio};
use std::str::FromStr;

use ::nix::unistd::User;
use ::si_trace_print::{defn, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Given a username, return a numeric identifier or nothing.
pub trait IdentityResolver {
    fn resolve(&mut self, username: &str) -> Option<Uid>;
}

/// Choice of [`IdentityResolver`] for the command-line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ::clap::ValueEnum)]
pub enum UidLookup {
    /// [`PasswdResolver`]
    #[default]
    Passwd,
    /// [`IdCommandResolver`]
    IdCommand,
    /// [`NoResolver`]
    None,
}

impl fmt::Display for UidLookup {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            UidLookup::Passwd => write!(f, "passwd"),
            UidLookup::IdCommand => write!(f, "id-command"),
            UidLookup::None => write!(f, "none"),
        }
    }
}

impl FromStr for UidLookup {
    type Err = ();
    fn from_str(input: &str) -> std::result::Result<UidLookup, Self::Err> {
        match input {
            "passwd" => Ok(UidLookup::Passwd),
            "id-command" | "id_command" => Ok(UidLookup::IdCommand),
            "none" => Ok(UidLookup::None),
            _ => Err(()),
        }
    }
}

/// Create the boxed resolver for `lookup`, memoised for the run.
pub fn new_resolver(lookup: UidLookup) -> Box<dyn IdentityResolver> {
    match lookup {
        UidLookup::Passwd => Box::new(CachingResolver::new(PasswdResolver::new())),
        UidLookup::IdCommand => Box::new(CachingResolver::new(IdCommandResolver::default())),
        UidLookup::None => Box::new(NoResolver {}),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Look up the user database (`getpwnam_r`).
#[derive(Debug, Default)]
pub struct PasswdResolver {}

impl PasswdResolver {
    pub fn new() -> PasswdResolver {
        PasswdResolver {}
    }
}

impl IdentityResolver for PasswdResolver {
    fn resolve(&mut self, username: &str) -> Option<Uid> {
        match User::from_name(username) {
            Ok(Some(user)) => {
                defñ!("{:?} → {}", username, user.uid);
                Some(user.uid.as_raw())
            }
            Ok(None) => {
                defñ!("{:?} not found", username);
                None
            }
            Err(err) => {
                de_wrn!("getpwnam_r({:?}) failed: {}", username, err);
                None
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default path of the `id` program.
pub const ID_COMMAND_PATH: &str = "/usr/bin/id";

/// Run `id -u -- <username>` and parse its standard output.
///
/// Failure to spawn, a non-zero exit status, or output that is not an
/// unsigned integer resolves nothing.
#[derive(Debug)]
pub struct IdCommandResolver {
    command: FPath,
}

impl Default for IdCommandResolver {
    fn default() -> Self {
        IdCommandResolver::new(FPath::from(ID_COMMAND_PATH))
    }
}

impl IdCommandResolver {
    /// `command` is the path of an `id`-compatible program.
    pub fn new(command: FPath) -> IdCommandResolver {
        IdCommandResolver { command }
    }

    /// Parse the standard output of `id -u`.
    pub fn parse_output(stdout: &[u8]) -> Option<Uid> {
        let s = std::str::from_utf8(stdout).ok()?;

        s.trim().parse::<Uid>().ok()
    }
}

impl IdentityResolver for IdCommandResolver {
    fn resolve(&mut self, username: &str) -> Option<Uid> {
        defn!("({:?})", username);
        let output: Output = match Command::new(&self.command)
            .arg("-u")
            .arg("--")
            .arg(username)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                de_wrn!("{:?} failed to run: {}", self.command, err);
                defx!("return None");
                return None;
            }
        };
        if !output.status.success() {
            defx!("return None; exit status {:?}", output.status);
            return None;
        }
        let uid = IdCommandResolver::parse_output(&output.stdout);
        defx!("return {:?}", uid);

        uid
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Never resolves.
#[derive(Debug, Default)]
pub struct NoResolver {}

impl IdentityResolver for NoResolver {
    fn resolve(&mut self, _username: &str) -> Option<Uid> {
        None
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Memoise the answers of resolver `R`, including misses.
#[derive(Debug)]
pub struct CachingResolver<R: IdentityResolver> {
    resolver: R,
    cache: HashMap<Username, Option<Uid>>,
    /// lookups answered from `cache`
    hits: u64,
    /// lookups passed to `resolver`
    misses: u64,
}

impl<R: IdentityResolver> CachingResolver<R> {
    pub fn new(resolver: R) -> CachingResolver<R> {
        CachingResolver {
            resolver,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub const fn hits(&self) -> u64 {
        self.hits
    }

    pub const fn misses(&self) -> u64 {
        self.misses
    }
}

impl<R: IdentityResolver> IdentityResolver for CachingResolver<R> {
    fn resolve(&mut self, username: &str) -> Option<Uid> {
        if let Some(uid) = self.cache.get(username) {
            self.hits += 1;
            return *uid;
        }
        self.misses += 1;
        let uid = self.resolver.resolve(username);
        self.cache.insert(Username::from(username), uid);

        uid
    }
}
