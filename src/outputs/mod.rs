//! Output generation.
//!
//! # Submodules
//!
//! - [`csv`]: Writes the normalized dataset as comma-separated text
//!
//! Export is opt-in and runs only after normalization succeeded, so a failed
//! run never leaves a partial file behind.

pub mod csv;
