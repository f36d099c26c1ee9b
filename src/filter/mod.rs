//! Filter module
//!
//! Regex-based name exclusion over streamed contacts.

mod pattern;
mod pipeline;

pub use pattern::{NameMatcher, PatternCompiler, PatternError, DEFAULT_SIZE_LIMIT};
pub use pipeline::exclude_matching;
