//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod analyze;
pub mod predict;
pub mod replay;
