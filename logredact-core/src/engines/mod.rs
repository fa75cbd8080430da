// logredact-core/src/engines/mod.rs
//! Concrete `RedactionEngine` implementations and the per-thread state they run on.
//!
//! `trigger_engine` holds the engine itself. `working_set` holds the
//! thread-local matcher cache the engine draws its mutable state from.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod trigger_engine;
pub mod working_set;
