//! EVE Echoes starmap CLI library.
//!
//! This crate provides command-line interface utilities for the starmap
//! engine, including terminal styling and report formatting.

pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
