//! lastci - publish CI kernel builds as GitHub releases.
//!
//! The binary is a thin shell over this library:
//! - [`cli`] - argument parsing, error types, exit codes, JSON envelopes
//! - [`commands`] - `publish` and `cleanup`
//! - [`tracing`] - subscriber setup

pub mod cli;
pub mod commands;
pub mod tracing;
