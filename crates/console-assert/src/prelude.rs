//! Convenient re-exports for common console-assert usage.
//!
//! # Example
//!
//! ```
//! use console_assert::prelude::*;
//!
//! let expected = lines!["Hintertupfingen:3", Matcher::starts_with("Error,")];
//! assert_eq!(expected.shape(), Shape::Ordered);
//! ```

// Building expectations
pub use crate::expectation::{Expectation, Shape};
pub use crate::lines;
pub use crate::matcher::Matcher;
pub use crate::session::{Session, add_quit};

// Running them
pub use crate::harness::{
    Console, Exit, ExitPolicy, Harness, InProcessHarness, ProcessHarness, Program,
};
pub use crate::verify::Verifier;

// Configuration
pub use crate::config::VerifyConfig;

// Error handling
pub use crate::error::{HarnessError, VerifyError};
