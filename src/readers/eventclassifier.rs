// src/readers/eventclassifier.rs

//! Classify a [`RawRecord`] into a [`SessionEvent`] or a [`Discard`].
//!
//! [`RawRecord`]: crate::data::utmpx::RawRecord
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent
//! [`Discard`]: self::Discard

use crate::data::sessionevent::{SessionEvent, SessionMode, UserSession};
use crate::data::utmpx::{
    ut_type_type,
    RawRecord,
    BOOT_TIME,
    DEAD_PROCESS,
    SHUTDOWN_TIME,
    USER_PROCESS,
};

use std::fmt;

use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Why a [`RawRecord`] did not become a [`SessionEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Discard {
    /// `ut_type` is not one of the four session types.
    OtherType(ut_type_type),
    /// the `ut_line` and `ut_host` do not qualify under the [`SessionMode`]
    SessionMode,
    /// the `ut_user` is empty after decoding
    EmptyUsername,
}

impl fmt::Display for Discard {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Discard::OtherType(ut_type) => write!(f, "other type {}", ut_type),
            Discard::SessionMode => write!(f, "session mode"),
            Discard::EmptyUsername => write!(f, "empty username"),
        }
    }
}

pub type ResultClassify = std::result::Result<SessionEvent, Discard>;

/// Classify one `record` under `mode`.
///
/// 1. `BOOT_TIME` is a `Reboot`.
/// 2. `SHUTDOWN_TIME` is a `Shutdown`.
/// 3. `USER_PROCESS` is a `Login` and `DEAD_PROCESS` is a `Logout` if the
///    line and host qualify under `mode` and the username is not empty.
///    The remote host is set if `ut_host` is not empty.
/// 4. Anything else is discarded.
pub fn classify(
    record: &RawRecord,
    mode: SessionMode,
) -> ResultClassify {
    let timestamp = record.tv_sec;
    match record.ut_type {
        BOOT_TIME => Ok(SessionEvent::Reboot { timestamp }),
        SHUTDOWN_TIME => Ok(SessionEvent::Shutdown { timestamp }),
        USER_PROCESS | DEAD_PROCESS => {
            let line: String = record.line();
            let host: String = record.host();
            if !mode.qualifies(&line, &host) {
                defñ!("discard; line {:?} host {:?} mode {}", line, host, mode);
                return Err(Discard::SessionMode);
            }
            let username: String = record.user();
            if username.is_empty() {
                defñ!("discard; empty username");
                return Err(Discard::EmptyUsername);
            }
            let remote_host: Option<String> = match host.is_empty() {
                true => None,
                false => Some(host),
            };
            let session = UserSession::new(username, timestamp, remote_host);
            match record.ut_type {
                USER_PROCESS => Ok(SessionEvent::Login(session)),
                _ => Ok(SessionEvent::Logout(session)),
            }
        }
        ut_type => {
            defñ!("discard; ut_type {}", ut_type);
            Err(Discard::OtherType(ut_type))
        }
    }
}
