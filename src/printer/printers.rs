// src/printer/printers.rs

//! Printer functions for a [`SessionReport`] and its [`SessionEvent`s].
//!
//! All functions write to a [`WriteColor`] so the caller chooses the
//! stream and whether color is used.
//!
//! [`SessionReport`]: crate::readers::sessionprocessor::SessionReport
//! [`SessionEvent`s]: crate::data::sessionevent::SessionEvent
//! [`WriteColor`]: https://docs.rs/termcolor/1.4.1/termcolor/trait.WriteColor.html

use crate::common::EpochSeconds;
use crate::data::sessionevent::{SessionEvent, SessionEventKind};
use crate::debug::printers::de_err;
use crate::readers::sessionprocessor::SessionReport;

use std::io::Result;

use ::chrono::{FixedOffset, TimeZone};
#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing usernames.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_USER: Color = Color::Cyan;

/// [`Color`] for printing datetimes.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_DATETIME: Color = Color::Green;

/// [`Color`] for printing some user-facing error messages.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

/// Datetime format of printed timestamps, e.g. `2024-01-02 15:04:05 -0800`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Column widths of [`print_events`].
const EVENT_KIND_WIDTH: usize = 8;
const EVENT_USER_WIDTH: usize = 16;
const EVENT_UID_WIDTH: usize = 6;
const EVENT_HOST_WIDTH: usize = 24;

/// Printed in place of an absent value.
pub const ABSENT: &str = "-";

/// [`Color`] of each [`SessionEventKind`].
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const fn color_event_kind(kind: SessionEventKind) -> Color {
    match kind {
        SessionEventKind::Reboot => Color::Yellow,
        SessionEventKind::Shutdown => Color::Magenta,
        SessionEventKind::Login => Color::Cyan,
        SessionEventKind::Logout => Color::Blue,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Format `timestamp` in timezone `tz` using [`DATETIME_FORMAT`].
///
/// A timestamp out of `chrono` range is printed as the number.
pub fn epoch_to_string(
    timestamp: EpochSeconds,
    tz: &FixedOffset,
) -> String {
    match tz.timestamp_opt(timestamp, 0).single() {
        Some(dt) => dt.format(DATETIME_FORMAT).to_string(),
        None => format!("@{}", timestamp),
    }
}

/// Print `value` in `color` if `out` supports color, otherwise print
/// plain output.
pub fn print_colored<W: WriteColor>(
    color: Color,
    value: &[u8],
    out: &mut W,
) -> Result<()> {
    if let Err(err) = out.set_color(ColorSpec::new().set_fg(Some(color))) {
        de_err!("print_colored: out.set_color({:?}) returned error {}", color, err);
        return Err(err);
    }
    if let Err(err) = out.write_all(value) {
        de_err!("print_colored: out.write_all(…) returned error {}", err);
        return Err(err);
    }
    if let Err(err) = out.reset() {
        de_err!("print_colored: out.reset() returned error {}", err);
        return Err(err);
    }

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// report and events
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print the last login of each user, one per line,
/// `USER<TAB>EPOCH<TAB>DATETIME`, in username order. Then print the
/// custom exclusions.
///
/// ```text
/// alice	1700000000	2023-11-14 22:13:20 +0000
/// bob	1690000000	2023-07-22 04:26:40 +0000
/// Exclusions: admin, guest
/// ```
pub fn print_report<W: WriteColor>(
    report: &SessionReport,
    tz: &FixedOffset,
    out: &mut W,
) -> Result<()> {
    for (username, timestamp) in report.last_logins.iter() {
        print_colored(COLOR_USER, username.as_bytes(), out)?;
        write!(out, "\t{}\t", timestamp)?;
        print_colored(COLOR_DATETIME, epoch_to_string(*timestamp, tz).as_bytes(), out)?;
        writeln!(out)?;
    }
    match report.exclusions.is_empty() {
        true => writeln!(out, "Exclusions: {}", ABSENT)?,
        false => writeln!(out, "Exclusions: {}", report.exclusions.join(", "))?,
    }
    out.flush()?;

    Ok(())
}

/// Print one event in the manner of `last`.
///
/// ```text
/// login    alice               501 office.example.com       2023-11-14 22:13:20 +0000
/// reboot   ~                     - -                        2023-11-14 22:00:00 +0000
/// ```
pub fn print_event<W: WriteColor>(
    event: &SessionEvent,
    tz: &FixedOffset,
    out: &mut W,
) -> Result<()> {
    let kind = event.kind();
    let kind_s = format!("{:<width$} ", kind.as_str(), width = EVENT_KIND_WIDTH);
    print_colored(color_event_kind(kind), kind_s.as_bytes(), out)?;
    match event.user_session() {
        Some(session) => {
            let user_s = format!("{:<width$} ", session.username, width = EVENT_USER_WIDTH);
            print_colored(COLOR_USER, user_s.as_bytes(), out)?;
            let uid_s: String = match session.uid {
                Some(uid) => uid.to_string(),
                None => String::from(ABSENT),
            };
            let host_s: &str = session.remote_host.as_deref().unwrap_or(ABSENT);
            write!(
                out,
                "{:>uid_w$} {:<host_w$} ",
                uid_s,
                host_s,
                uid_w = EVENT_UID_WIDTH,
                host_w = EVENT_HOST_WIDTH,
            )?;
        }
        None => {
            // `last` prints system events with user `~`
            write!(
                out,
                "{:<user_w$} {:>uid_w$} {:<host_w$} ",
                "~",
                ABSENT,
                ABSENT,
                user_w = EVENT_USER_WIDTH,
                uid_w = EVENT_UID_WIDTH,
                host_w = EVENT_HOST_WIDTH,
            )?;
        }
    }
    print_colored(COLOR_DATETIME, epoch_to_string(event.timestamp(), tz).as_bytes(), out)?;
    writeln!(out)?;

    Ok(())
}

/// Print every event, in the order given.
pub fn print_events<W: WriteColor>(
    events: &[SessionEvent],
    tz: &FixedOffset,
    out: &mut W,
) -> Result<()> {
    for event in events.iter() {
        print_event(event, tz, out)?;
    }
    out.flush()?;

    Ok(())
}
