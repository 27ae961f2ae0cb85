//! Test utilities for console-assert.
//!
//! This module provides a scripted [`Harness`](crate::Harness) for testing
//! verifiers and reports without running a real program.

mod scripted;

pub use scripted::{HarnessCall, ScriptedHarness};
