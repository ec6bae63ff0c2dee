// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only configuration problems are errors.
//! Selectors that match nothing and sections that cannot be found are logged and
//! degrade to "no highlighting" instead; see [`ScrollSpy`](crate::engine::ScrollSpy).

use alloc::string::String;

use thiserror::Error;

use crate::config::OptionKey;

/// Top-level error returned by [`ScrollSpy`](crate::engine::ScrollSpy) construction and reconfiguration.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The navigation link selector is empty.
    #[error("navigation link selector must not be empty")]
    EmptySelector,
    /// An option name that is not part of the recognized set.
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// A value of the wrong kind was supplied for an option.
    #[error("option `{key}` expects {expected}")]
    TypeMismatch {
        /// Option being set.
        key: OptionKey,
        /// Human readable kind the option accepts.
        expected: &'static str,
    },
    /// A numeric option received NaN.
    #[error("option `{key}` must be a number")]
    InvalidNumber {
        /// Option being set.
        key: OptionKey,
    },
    /// An `allowedPaths` entry is not a valid regular expression.
    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPathPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser message.
        reason: String,
    },
}

/// A host selector lookup failed, as opposed to matching nothing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("lookup of `{selector}` failed: {reason}")]
pub struct LookupError {
    /// Selector that was being resolved.
    pub selector: String,
    /// Host supplied reason (for example a selector syntax error).
    pub reason: String,
}

impl LookupError {
    /// Create a lookup error for `selector`.
    pub fn new(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

/// A user callback reported failure.
///
/// Failures are contained to the callback that produced them; the remaining
/// callbacks of the same cycle still run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("callback failed: {0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    /// Create a callback error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
