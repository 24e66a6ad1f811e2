// src/printer/summary.rs

//! CLI option `--summary` printing functions.
//! Only used by `lastlogins.rs`.

use crate::common::Count;
use crate::data::sessionevent::SessionEventKind;
use crate::printer::printers::{
    epoch_to_string,
    print_colored,
    WriteColor,
    COLOR_ERROR,
};
use crate::readers::summary::SummarySessionProcessor;

use std::io::Result;

use ::chrono::FixedOffset;
use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print the `summary` of one run.
///
/// ```text
/// Summary:
///   source            : /var/log/utmpx (libSystem.dylib)
///   records read      : 120
///   events            : 31
///     reboot          : 4
///     shutdown        : 3
///     login           : 12
///     logout          : 12
///   discards          : 85
///     other type 6    : 40
///     session mode    : 45
///   excluded          : 4
///   uid resolved      : 24
///   uid unresolved    : 0
///   first event       : 2023-01-01 00:00:00 +0000
///   last event        : 2023-11-14 22:13:20 +0000
/// ```
pub fn print_summary<W: WriteColor>(
    summary: &SummarySessionProcessor,
    tz: &FixedOffset,
    out: &mut W,
) -> Result<()> {
    defñ!();
    writeln!(out, "Summary:")?;
    writeln!(out, "  source            : {}", summary.source)?;
    writeln!(out, "  records read      : {}", summary.records_read)?;
    writeln!(out, "  events            : {}", summary.events_total())?;
    for kind in SessionEventKind::iterator() {
        let count: Count = summary.events_of(*kind);
        writeln!(out, "    {:<16}: {}", kind.as_str(), count)?;
    }
    writeln!(out, "  discards          : {}", summary.discards_total())?;
    for (discard, count) in summary.discards.iter() {
        writeln!(out, "    {:<16}: {}", discard.to_string(), count)?;
    }
    writeln!(out, "  excluded          : {}", summary.excluded)?;
    writeln!(out, "  uid resolved      : {}", summary.uid_resolved)?;
    writeln!(out, "  uid unresolved    : {}", summary.uid_unresolved)?;
    match summary.timestamp_first {
        Some(ts) => writeln!(out, "  first event       : {}", epoch_to_string(ts, tz))?,
        None => writeln!(out, "  first event       :")?,
    }
    match summary.timestamp_last {
        Some(ts) => writeln!(out, "  last event        : {}", epoch_to_string(ts, tz))?,
        None => writeln!(out, "  last event        :")?,
    }
    if let Some(error) = &summary.error {
        write!(out, "  error             : ")?;
        print_colored(COLOR_ERROR, error.as_bytes(), out)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}
