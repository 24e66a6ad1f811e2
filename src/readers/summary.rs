// src/readers/summary.rs

//! Implements [`SummarySessionProcessor`], statistics of one run of a
//! [`SessionProcessor`].
//!
//! [`SessionProcessor`]: crate::readers::sessionprocessor::SessionProcessor

use crate::common::{Count, EpochSeconds};
use crate::data::sessionevent::SessionEventKind;
use crate::readers::eventclassifier::Discard;

use std::collections::BTreeMap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub type MapEventKindCount = BTreeMap<SessionEventKind, Count>;
pub type MapDiscardCount = BTreeMap<Discard, Count>;

/// Statistics of one [`SessionProcessor::run`].
///
/// Intended for `--summary`.
///
/// [`SessionProcessor::run`]: crate::readers::sessionprocessor::SessionProcessor#method.run
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct SummarySessionProcessor {
    /// [`RecordReader::source`] of the records.
    ///
    /// [`RecordReader::source`]: crate::readers::utmpxreader::RecordReader#tymethod.source
    pub source: String,
    /// records returned by the reader
    pub records_read: Count,
    /// events that passed the exclusion filter, by kind
    pub events: MapEventKindCount,
    /// records that did not classify, by reason
    pub discards: MapDiscardCount,
    /// events dropped by the exclusion filter
    pub excluded: Count,
    pub uid_resolved: Count,
    pub uid_unresolved: Count,
    /// soonest event timestamp (not necessarily the first record)
    pub timestamp_first: Option<EpochSeconds>,
    /// latest event timestamp (not necessarily the last record)
    pub timestamp_last: Option<EpochSeconds>,
    /// The reader `Error`, if any, as a `String`.
    pub error: Option<String>,
}

impl SummarySessionProcessor {
    pub fn new(source: String) -> SummarySessionProcessor {
        SummarySessionProcessor {
            source,
            ..Default::default()
        }
    }

    pub fn count_event(&mut self, kind: SessionEventKind) {
        *self.events.entry(kind).or_insert(0) += 1;
    }

    pub fn count_discard(&mut self, discard: Discard) {
        *self.discards.entry(discard).or_insert(0) += 1;
    }

    pub fn update_timestamp(&mut self, timestamp: EpochSeconds) {
        match self.timestamp_first {
            Some(first) if first <= timestamp => {}
            _ => self.timestamp_first = Some(timestamp),
        }
        match self.timestamp_last {
            Some(last) if last >= timestamp => {}
            _ => self.timestamp_last = Some(timestamp),
        }
    }

    /// `Count` of events of `kind`.
    pub fn events_of(&self, kind: SessionEventKind) -> Count {
        self.events.get(&kind).copied().unwrap_or(0)
    }

    pub fn events_total(&self) -> Count {
        self.events.values().sum()
    }

    pub fn discards_total(&self) -> Count {
        self.discards.values().sum()
    }
}
