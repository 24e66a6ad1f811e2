// src/lib.rs

//! _lllib_ reads the login accounting log (`utmpx` records of `wtmpx`) and
//! reports the last interactive login time of each current user.
//!
//! The pipeline, leaf-first:
//!
//! 1. a [`RecordReader`] yields [`RawRecord`s] from the log
//! 2. [`classify`] derives a [`SessionEvent`] from each record
//! 3. an [`ExclusionFilter`] drops events of excluded accounts
//! 4. an [`IdentityResolver`] sets the `Uid` of user events
//! 5. a [`LastLoginAggregator`] reduces the events to a [`LastLoginIndex`]
//!
//! A [`SessionProcessor`] drives all of it and returns a
//! [`SessionReport`].
//!
//! The binary program _lastlogins_ is in `src/bin/lastlogins.rs`.
//!
//! [`RecordReader`]: crate::readers::utmpxreader::RecordReader
//! [`RawRecord`s]: crate::data::utmpx::RawRecord
//! [`classify`]: crate::readers::eventclassifier::classify
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent
//! [`ExclusionFilter`]: crate::readers::exclusionfilter::ExclusionFilter
//! [`IdentityResolver`]: crate::readers::identity::IdentityResolver
//! [`LastLoginAggregator`]: crate::readers::lastloginaggregator::LastLoginAggregator
//! [`LastLoginIndex`]: crate::readers::lastloginaggregator::LastLoginIndex
//! [`SessionProcessor`]: crate::readers::sessionprocessor::SessionProcessor
//! [`SessionReport`]: crate::readers::sessionprocessor::SessionReport

pub mod common;
pub mod data;
pub mod debug;
pub mod libload;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
