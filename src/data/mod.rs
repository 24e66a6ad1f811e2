// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`RawRecord`]s and [`SessionEvent`]s.
//!
//! ## Definitions of data
//!
//! ### RawRecord
//!
//! A [`RawRecord`] is one [`utmpx`] structure read verbatim from the
//! login accounting log. It is read by a [`RecordReader`].
//!
//! ### SessionEvent
//!
//! A [`SessionEvent`] is a typed boot, shutdown, login, or logout derived
//! from one `RawRecord` by the [`classify`] function.
//!
//! [`RawRecord`]: crate::data::utmpx::RawRecord
//! [`utmpx`]: crate::data::utmpx::macos::utmpx
//! [`SessionEvent`]: crate::data::sessionevent::SessionEvent
//! [`RecordReader`]: crate::readers::utmpxreader::RecordReader
//! [`classify`]: crate::readers::eventclassifier::classify

pub mod sessionevent;
pub mod utmpx;
