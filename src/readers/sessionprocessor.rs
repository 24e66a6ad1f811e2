// src/readers/sessionprocessor.rs

//! Implements a [`SessionProcessor`], the driver of deriving a
//! [`SessionReport`] from a [`RecordReader`].
//!
//! A `SessionProcessor` pulls each [`RawRecord`] from the reader,
//! [`classify`]s it, drops excluded accounts with an [`ExclusionFilter`],
//! sets the `Uid` with an [`IdentityResolver`], and finally reduces the
//! surviving events to a [`LastLoginIndex`].
//!
//! Records are processed one at a time, in the order the reader returns
//! them. The order does not matter to the `LastLoginIndex`.
//!
//! [`RecordReader`]: crate::readers::utmpxreader::RecordReader
//! [`RawRecord`]: crate::data::utmpx::RawRecord
//! [`classify`]: crate::readers::eventclassifier::classify
//! [`ExclusionFilter`]: crate::readers::exclusionfilter::ExclusionFilter
//! [`IdentityResolver`]: crate::readers::identity::IdentityResolver
//! [`LastLoginIndex`]: crate::readers::lastloginaggregator::LastLoginIndex

use crate::de_err;
use crate::common::{ResultS3, Username};
use crate::data::sessionevent::{SessionEvent, SessionMode};
use crate::data::utmpx::RawRecord;
use crate::readers::eventclassifier::classify;
use crate::readers::exclusionfilter::{ExclusionConfig, ExclusionFilter, SetUsernames};
use crate::readers::identity::IdentityResolver;
use crate::readers::lastloginaggregator::{LastLoginAggregator, LastLoginIndex};
use crate::readers::summary::SummarySessionProcessor;
use crate::readers::utmpxreader::RecordReader;

use std::fmt;
use std::io::{Error, Result};

use ::si_trace_print::{defn, defo, defx};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The combined result of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// latest login of each current user
    pub last_logins: LastLoginIndex,
    /// the custom exclusions in effect, without the system exclusions
    pub exclusions: Vec<Username>,
    /// every event that passed classification and exclusion, in read order
    pub events: Vec<SessionEvent>,
}

/// Enum return value for [`SessionProcessor::run`].
#[derive(Debug)]
pub enum ResultSessionRun<E> {
    /// The log was read to the end.
    Ok(SessionReport),
    /// Reading stopped at an error. The report holds everything processed
    /// before the error.
    Partial(SessionReport, E),
    /// The log could not be opened. Nothing was processed.
    ErrOpen(E),
}

pub type ResultSessionRunError = ResultSessionRun<Error>;

impl<E> ResultSessionRun<E> {
    pub const fn is_ok(&self) -> bool {
        matches!(self, ResultSessionRun::Ok(_))
    }

    pub const fn is_partial(&self) -> bool {
        matches!(self, ResultSessionRun::Partial(_, _))
    }

    pub const fn is_err_open(&self) -> bool {
        matches!(self, ResultSessionRun::ErrOpen(_))
    }

    /// The report of `Ok` or `Partial`.
    pub const fn report(&self) -> Option<&SessionReport> {
        match self {
            ResultSessionRun::Ok(report) | ResultSessionRun::Partial(report, _) => Some(report),
            ResultSessionRun::ErrOpen(_) => None,
        }
    }

    /// The error of `Partial` or `ErrOpen`.
    pub const fn error(&self) -> Option<&E> {
        match self {
            ResultSessionRun::Ok(_) => None,
            ResultSessionRun::Partial(_, err) | ResultSessionRun::ErrOpen(err) => Some(err),
        }
    }
}

impl<E> fmt::Display for ResultSessionRun<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSessionRun::Ok(_) => write!(f, "ResultSessionRun::Ok"),
            ResultSessionRun::Partial(_, err) => write!(f, "ResultSessionRun::Partial({})", err),
            ResultSessionRun::ErrOpen(err) => write!(f, "ResultSessionRun::ErrOpen({})", err),
        }
    }
}

/// Drives one or more runs over [`RecordReader`]s with a fixed
/// [`SessionMode`], [`ExclusionFilter`], and [`IdentityResolver`].
///
/// [`RecordReader`]: crate::readers::utmpxreader::RecordReader
pub struct SessionProcessor {
    mode: SessionMode,
    filter: ExclusionFilter,
    resolver: Box<dyn IdentityResolver>,
    /// statistics of the most recent run
    summary: SummarySessionProcessor,
}

impl fmt::Debug for SessionProcessor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("SessionProcessor")
            .field("mode", &self.mode)
            .field("filter", &self.filter)
            .field("summary", &self.summary)
            .finish()
    }
}

impl SessionProcessor {
    pub fn new(
        mode: SessionMode,
        exclusions: ExclusionConfig,
        resolver: Box<dyn IdentityResolver>,
    ) -> SessionProcessor {
        SessionProcessor {
            mode,
            filter: ExclusionFilter::new(exclusions),
            resolver,
            summary: SummarySessionProcessor::default(),
        }
    }

    pub const fn mode(&self) -> SessionMode {
        self.mode
    }

    pub const fn exclusions(&self) -> &ExclusionConfig {
        self.filter.config()
    }

    /// Statistics of the most recent run.
    pub fn summary(&self) -> &SummarySessionProcessor {
        &self.summary
    }

    /// Classify, filter, and enrich one `record`.
    ///
    /// Returns `None` if the record was discarded or excluded.
    pub fn process_record(&mut self, record: &RawRecord) -> Option<SessionEvent> {
        let mut event: SessionEvent = match classify(record, self.mode) {
            Ok(event) => event,
            Err(discard) => {
                self.summary.count_discard(discard);
                return None;
            }
        };
        if !self.filter.pass(&event) {
            self.summary.excluded += 1;
            return None;
        }
        if let Some(session) = event.user_session_mut() {
            match self.resolver.resolve(&session.username) {
                Some(uid) => {
                    session.uid = Some(uid);
                    self.summary.uid_resolved += 1;
                }
                None => {
                    defo!("no uid for {:?}", session.username);
                    self.summary.uid_unresolved += 1;
                }
            }
        }
        self.summary.count_event(event.kind());
        self.summary.update_timestamp(event.timestamp());

        Some(event)
    }

    /// Read every record of `reader` and return the report.
    ///
    /// `reader` is closed before returning, also after an error.
    /// An error while reading returns `Partial` with the events processed
    /// before the error.
    pub fn run(
        &mut self,
        reader: &mut dyn RecordReader,
        current_users: &SetUsernames,
    ) -> ResultSessionRunError {
        defn!("source {:?}, {} current users", reader.source(), current_users.len());
        self.summary = SummarySessionProcessor::new(reader.source());
        let mut events: Vec<SessionEvent> = Vec::new();
        let mut error: Option<Error> = None;
        loop {
            match reader.next() {
                ResultS3::Found(record) => {
                    if let Some(event) = self.process_record(&record) {
                        events.push(event);
                    }
                }
                ResultS3::Done => break,
                ResultS3::Err(err) => {
                    de_err!("{} after {} records; {}", err, reader.records_read(), reader.source());
                    error = Some(err);
                    break;
                }
            }
        }
        reader.close();
        self.summary.records_read = reader.records_read();

        let mut aggregator = LastLoginAggregator::new(current_users.clone());
        aggregator.extend(events.iter());
        let report = SessionReport {
            last_logins: aggregator.finish(),
            exclusions: self.filter.config().custom().to_vec(),
            events,
        };

        match error {
            None => {
                defx!("return Ok; {} events", report.events.len());
                ResultSessionRun::Ok(report)
            }
            Some(err) => {
                self.summary.error = Some(err.to_string());
                defx!("return Partial; {} events", report.events.len());
                ResultSessionRun::Partial(report, err)
            }
        }
    }

    /// Open a reader with `open` and then [`run`] it.
    ///
    /// An `Err` from `open` returns `ErrOpen`.
    ///
    /// [`run`]: SessionProcessor::run
    pub fn open_and_run<R, F>(
        &mut self,
        open: F,
        current_users: &SetUsernames,
    ) -> ResultSessionRunError
    where
        R: RecordReader,
        F: FnOnce() -> Result<R>,
    {
        let mut reader: R = match open() {
            Ok(reader) => reader,
            Err(err) => {
                de_err!("open failed: {}", err);
                self.summary = SummarySessionProcessor::default();
                self.summary.error = Some(err.to_string());
                return ResultSessionRun::ErrOpen(err);
            }
        };

        self.run(&mut reader, current_users)
    }
}
