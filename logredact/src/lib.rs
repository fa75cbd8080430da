// logredact/src/lib.rs
//! # logredact CLI Application
//!
//! Command-line front end for `logredact-core`: redacts log streams from
//! stdin or a file, and validates rule sources before they are deployed.

pub mod cli;
pub mod commands;
pub mod logger;
