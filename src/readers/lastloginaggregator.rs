// src/readers/lastloginaggregator.rs

//! Reduce [`SessionEvent`]s to the [`LastLoginIndex`], the latest login
//! time of each current user.
//!
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent

use crate::common::{EpochSeconds, Username};
use crate::data::sessionevent::SessionEvent;
use crate::readers::exclusionfilter::SetUsernames;

use std::collections::BTreeMap;

use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Username to the maximum `Login` timestamp of that user.
pub type LastLoginIndex = BTreeMap<Username, EpochSeconds>;

/// Builds a [`LastLoginIndex`] restricted to a set of current users.
///
/// Only `Login` events count. The result does not depend on the order of
/// events.
#[derive(Debug)]
pub struct LastLoginAggregator {
    current_users: SetUsernames,
    index: LastLoginIndex,
}

impl LastLoginAggregator {
    pub fn new(current_users: SetUsernames) -> LastLoginAggregator {
        LastLoginAggregator {
            current_users,
            index: LastLoginIndex::new(),
        }
    }

    /// Add one event. Returns `true` if the index changed.
    pub fn add(&mut self, event: &SessionEvent) -> bool {
        let session = match event {
            SessionEvent::Login(session) => session,
            _ => return false,
        };
        if !self.current_users.contains(&session.username) {
            defñ!("not a current user {:?}", session.username);
            return false;
        }
        match self.index.get_mut(&session.username) {
            Some(timestamp) => {
                if session.timestamp > *timestamp {
                    *timestamp = session.timestamp;
                    return true;
                }
                false
            }
            None => {
                self.index.insert(session.username.clone(), session.timestamp);
                true
            }
        }
    }

    /// Add each of `events`.
    pub fn extend<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a SessionEvent>,
    {
        for event in events.into_iter() {
            self.add(event);
        }
    }

    pub fn index(&self) -> &LastLoginIndex {
        &self.index
    }

    /// Consume the aggregator and return the final index.
    pub fn finish(self) -> LastLoginIndex {
        self.index
    }
}

/// Build a [`LastLoginIndex`] from `events` in one call.
pub fn aggregate<'a, I>(
    events: I,
    current_users: SetUsernames,
) -> LastLoginIndex
where
    I: IntoIterator<Item = &'a SessionEvent>,
{
    let mut aggregator = LastLoginAggregator::new(current_users);
    aggregator.extend(events);

    aggregator.finish()
}
