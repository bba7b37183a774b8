//! Command-line front end for the `huffcode` binary.

pub mod args;
pub mod commands;
