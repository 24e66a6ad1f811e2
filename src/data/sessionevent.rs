// src/data/sessionevent.rs

//! Implement [`SessionEvent`], a typed event derived from a
//! [`RawRecord`], and [`SessionMode`], the policy of which
//! login lines qualify as interactive sessions.
//!
//! [`RawRecord`]: crate::data::utmpx::RawRecord

use crate::common::{EpochSeconds, Username};

use std::fmt;
use std::slice::Iter;
use std::str::FromStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Numeric user identifier.
pub type Uid = u32;

/// The `ut_line` value of a local graphical login.
pub const LINE_CONSOLE: &str = "console";

/// The user half of a [`SessionEvent::Login`] or [`SessionEvent::Logout`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserSession {
    /// never empty
    pub username: Username,
    pub timestamp: EpochSeconds,
    /// `Some` only if the record `ut_host` was non-empty
    pub remote_host: Option<String>,
    /// set by an [`IdentityResolver`]
    ///
    /// [`IdentityResolver`]: crate::readers::identity::IdentityResolver
    pub uid: Option<Uid>,
}

impl UserSession {
    pub fn new(
        username: Username,
        timestamp: EpochSeconds,
        remote_host: Option<String>,
    ) -> UserSession {
        debug_assert!(!username.is_empty(), "UserSession username must not be empty");

        UserSession {
            username,
            timestamp,
            remote_host,
            uid: None,
        }
    }
}

/// A session event derived from one accounting record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// `BOOT_TIME`
    Reboot { timestamp: EpochSeconds },
    /// `SHUTDOWN_TIME`
    Shutdown { timestamp: EpochSeconds },
    /// `USER_PROCESS`
    Login(UserSession),
    /// `DEAD_PROCESS`
    Logout(UserSession),
}

impl SessionEvent {
    pub const fn timestamp(&self) -> EpochSeconds {
        match self {
            SessionEvent::Reboot { timestamp } | SessionEvent::Shutdown { timestamp } => *timestamp,
            SessionEvent::Login(session) | SessionEvent::Logout(session) => session.timestamp,
        }
    }

    /// The username of a `Login` or `Logout`.
    pub fn username(&self) -> Option<&str> {
        self.user_session()
            .map(|session| session.username.as_str())
    }

    pub const fn user_session(&self) -> Option<&UserSession> {
        match self {
            SessionEvent::Login(session) | SessionEvent::Logout(session) => Some(session),
            SessionEvent::Reboot { .. } | SessionEvent::Shutdown { .. } => None,
        }
    }

    pub fn user_session_mut(&mut self) -> Option<&mut UserSession> {
        match self {
            SessionEvent::Login(session) | SessionEvent::Logout(session) => Some(session),
            SessionEvent::Reboot { .. } | SessionEvent::Shutdown { .. } => None,
        }
    }

    pub const fn kind(&self) -> SessionEventKind {
        match self {
            SessionEvent::Reboot { .. } => SessionEventKind::Reboot,
            SessionEvent::Shutdown { .. } => SessionEventKind::Shutdown,
            SessionEvent::Login(_) => SessionEventKind::Login,
            SessionEvent::Logout(_) => SessionEventKind::Logout,
        }
    }

    pub const fn is_login(&self) -> bool {
        matches!(self, SessionEvent::Login(_))
    }
}

/// The kind of a [`SessionEvent`], without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionEventKind {
    Reboot,
    Shutdown,
    Login,
    Logout,
}

impl SessionEventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionEventKind::Reboot => "reboot",
            SessionEventKind::Shutdown => "shutdown",
            SessionEventKind::Login => "login",
            SessionEventKind::Logout => "logout",
        }
    }

    pub fn iterator() -> Iter<'static, SessionEventKind> {
        static KINDS: [SessionEventKind; 4] = [
            SessionEventKind::Reboot,
            SessionEventKind::Shutdown,
            SessionEventKind::Login,
            SessionEventKind::Logout,
        ];
        KINDS.iter()
    }
}

impl fmt::Display for SessionEventKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which user records qualify as interactive sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ::clap::ValueEnum)]
pub enum SessionMode {
    /// Only logins on the `console` line.
    #[value(alias = "console_only", alias = "gui")]
    ConsoleOnly,
    /// Logins on the `console` line or from a remote host.
    #[default]
    #[value(alias = "console_or_remote", alias = "gui_ssh")]
    ConsoleOrRemote,
}

impl fmt::Display for SessionMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            SessionMode::ConsoleOnly => write!(f, "console-only"),
            SessionMode::ConsoleOrRemote => write!(f, "console-or-remote"),
        }
    }
}

impl FromStr for SessionMode {
    type Err = ();
    fn from_str(input: &str) -> std::result::Result<SessionMode, Self::Err> {
        match input {
            "console-only" | "console_only" | "gui" => Ok(SessionMode::ConsoleOnly),
            "console-or-remote" | "console_or_remote" | "gui_ssh" => Ok(SessionMode::ConsoleOrRemote),
            _ => Err(()),
        }
    }
}

impl SessionMode {
    pub fn iterator() -> Iter<'static, SessionMode> {
        static SESSION_MODES: [SessionMode; 2] = [
            SessionMode::ConsoleOnly,
            SessionMode::ConsoleOrRemote,
        ];
        SESSION_MODES.iter()
    }

    /// Does a record with this `line` and `host` qualify under this mode?
    pub fn qualifies(
        &self,
        line: &str,
        host: &str,
    ) -> bool {
        match self {
            SessionMode::ConsoleOnly => line == LINE_CONSOLE,
            SessionMode::ConsoleOrRemote => line == LINE_CONSOLE || !host.is_empty(),
        }
    }
}
