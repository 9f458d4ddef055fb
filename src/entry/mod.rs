//! Directive entries and the line grammar.
//!
//! This module handles:
//! - Single directives and multi-valued collections
//! - Duplicate resolution between entries for the same key
//! - Parsing raw text lines, permissive and strict

pub mod parser;
pub mod types;

pub use parser::{LineError, ParseDiagnostic, parse_line, parse_line_strict};
pub use types::{Entry, MultiValueEntry, Record};
