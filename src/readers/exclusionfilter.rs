// src/readers/exclusionfilter.rs

//! Drop [`SessionEvent`]s of excluded accounts.
//!
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent

use crate::common::Username;
use crate::data::sessionevent::SessionEvent;

use std::collections::BTreeSet;

use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// System accounts that are always excluded.
pub const SYSTEM_EXCLUDE_USERS: [&str; 2] = ["_mbsetupuser", "root"];

pub type SetUsernames = BTreeSet<Username>;

/// The set of excluded usernames: [`SYSTEM_EXCLUDE_USERS`] merged with a
/// custom list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionConfig {
    /// custom usernames in the order given, without duplicates
    custom: Vec<Username>,
    merged: SetUsernames,
}

impl ExclusionConfig {
    /// Create an `ExclusionConfig` from `custom` usernames. Empty names are
    /// ignored.
    pub fn new<I, S>(custom: I) -> ExclusionConfig
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut custom_: Vec<Username> = Vec::new();
        for name in custom.into_iter() {
            let name: &str = name.as_ref().trim();
            if name.is_empty() || custom_.iter().any(|c| c == name) {
                continue;
            }
            custom_.push(Username::from(name));
        }
        let mut merged: SetUsernames = SYSTEM_EXCLUDE_USERS
            .iter()
            .map(|s| Username::from(*s))
            .collect();
        merged.extend(custom_.iter().cloned());

        ExclusionConfig {
            custom: custom_,
            merged,
        }
    }

    /// Only the [`SYSTEM_EXCLUDE_USERS`].
    pub fn system_only() -> ExclusionConfig {
        ExclusionConfig::new(std::iter::empty::<&str>())
    }

    /// The custom usernames, as given.
    pub fn custom(&self) -> &[Username] {
        self.custom.as_slice()
    }

    /// The system and custom usernames.
    pub fn merged(&self) -> &SetUsernames {
        &self.merged
    }

    pub fn is_excluded(&self, username: &str) -> bool {
        self.merged.contains(username)
    }
}

/// Filter of [`SessionEvent`]s using an [`ExclusionConfig`].
#[derive(Clone, Debug)]
pub struct ExclusionFilter {
    config: ExclusionConfig,
}

impl ExclusionFilter {
    pub fn new(config: ExclusionConfig) -> ExclusionFilter {
        ExclusionFilter { config }
    }

    pub const fn config(&self) -> &ExclusionConfig {
        &self.config
    }

    /// Does `event` pass the filter?
    ///
    /// `Reboot` and `Shutdown` always pass. `Login` and `Logout` pass if
    /// the username is not excluded.
    pub fn pass(&self, event: &SessionEvent) -> bool {
        match event.username() {
            Some(username) => {
                let excluded = self.config.is_excluded(username);
                if excluded {
                    defñ!("excluded {:?}", username);
                }
                !excluded
            }
            None => true,
        }
    }
}
