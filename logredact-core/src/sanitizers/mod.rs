//! Rule compilation for logredact.
//!
//! This module turns rule sources into the immutable `RuleTable` the engines
//! consume. It holds the policy and triple front-ends, the shared compile
//! path, and the replacement template parser used to validate back-references
//! at load time.

pub mod compiler;
pub mod template;
pub mod triples;
