//! aircalc CLI - command line front end for the planning calculators.
//!
//! The binary parses arguments, loads the sensor catalog, and hands off to
//! [`commands::run`], which prints each result record as JSON.

pub mod commands;

pub use commands::{run, Command};
