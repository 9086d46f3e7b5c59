//! Built-in format backends

pub mod csv;
