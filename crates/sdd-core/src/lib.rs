//! sdd-core - Shared functionality for the sdd helper
//!
//! Filesystem probes, finders, listings and git queries for a
//! spec-driven development workspace. Every operation takes the
//! workspace root explicitly and writes its text result to a sink.

pub mod finders;
pub mod git;
pub mod layout;
pub mod listing;
pub mod probes;
pub mod walk;

pub use layout::{Layout, Workspace};
