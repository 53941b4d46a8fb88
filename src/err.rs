//! Error types used throughout this crate.
//!
//! All of the translation errors this crate produces come from classifying
//! source lines, so the concrete types here are re-exported from [`parse`]:
//! - [`ParseErr`]: an error and the line it occurred on,
//! - [`ParseErrKind`]: the kinds of errors that can occur.
//!
//! The [`Error`] trait ties them together for consumers (such as the
//! command-line front end) that render diagnostics without caring which
//! stage produced them.
//!
//! [`parse`]: crate::parse

use std::borrow::Cow;

pub use crate::parse::{ParseErr, ParseErrKind};

/// A common interface over this crate's error types.
pub trait Error: std::error::Error {
    /// The 1-based source line this error points at, if there is one.
    fn line(&self) -> Option<usize> {
        None
    }

    /// A short note describing how to resolve the error, if one applies.
    fn help(&self) -> Option<Cow<str>> {
        None
    }
}
