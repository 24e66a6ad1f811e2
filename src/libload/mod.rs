// src/libload/mod.rs

//! Dynamic loading of native libraries.

pub mod utmpx_dlopen2;
