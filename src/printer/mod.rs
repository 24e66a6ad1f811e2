// src/printer/mod.rs

//! The `printer` module is for printing user-facing results
//! ([`SessionReport`s] and [`SessionEvent`s]) and the `--summary`
//! statistics, with optional color.
//!
//! [`SessionReport`s]: crate::readers::sessionprocessor::SessionReport
//! [`SessionEvent`s]: crate::data::sessionevent::SessionEvent

pub mod printers;
pub mod summary;
