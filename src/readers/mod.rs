// src/readers/mod.rs

//! "Readers" for _lllib_.
//!
//! ## Overview of readers
//!
//! * A [`SessionProcessor`] drives a [`RecordReader`] to derive
//!   [`RawRecord`s].
//! * Each `RawRecord` is passed to [`classify`] to derive a
//!   [`SessionEvent`], then to an [`ExclusionFilter`], then to an
//!   [`IdentityResolver`].
//! * The surviving `SessionEvent`s are reduced by a
//!   [`LastLoginAggregator`] restricted to the [`CurrentUsers`].
//!
//! <br/>
//!
//! The _lastlogins_ binary program uses one `SessionProcessor` per run.
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`RawRecord`s]: crate::data::utmpx::RawRecord
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent
//! [`RecordReader`]: crate::readers::utmpxreader::RecordReader
//! [`classify`]: crate::readers::eventclassifier::classify
//! [`ExclusionFilter`]: crate::readers::exclusionfilter::ExclusionFilter
//! [`IdentityResolver`]: crate::readers::identity::IdentityResolver
//! [`LastLoginAggregator`]: crate::readers::lastloginaggregator::LastLoginAggregator
//! [`CurrentUsers`]: crate::readers::currentusers::CurrentUsers
//! [`SessionProcessor`]: crate::readers::sessionprocessor::SessionProcessor

pub mod currentusers;
pub mod eventclassifier;
pub mod exclusionfilter;
pub mod identity;
pub mod lastloginaggregator;
pub mod sessionprocessor;
pub mod summary;
pub mod utmpxreader;
