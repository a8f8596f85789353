//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the pipeline:
//! - Fixed-size matrix value types
//! - Native and caller-owned buffer storage
//! - Logging utilities

pub mod buffer;
pub mod logging;
pub mod math;
