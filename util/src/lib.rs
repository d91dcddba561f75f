//! Shared utilities for the assessment workspace.

pub mod config;
