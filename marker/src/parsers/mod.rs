//! # Parsers
//!
//! Parsers that turn free-text model answers into structured values.
//!
//! - [`grade_parser`]: extracts a grade out of 20 from a comparison answer.

pub mod grade_parser;
