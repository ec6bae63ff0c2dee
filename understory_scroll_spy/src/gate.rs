// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Location path gating for `allowedPaths`.
//!
//! An empty pattern list allows every path.
//! Otherwise the scroll-spy only arms itself when the trimmed location path matches
//! at least one pattern (unanchored regular expression search).
//!
//! Pattern matching needs the `path_filter` feature. Without it, patterns are
//! ignored with a warning and every path is allowed.

#[cfg(feature = "path_filter")]
use alloc::string::ToString;
use alloc::string::String;
#[cfg(feature = "path_filter")]
use alloc::vec::Vec;

use crate::error::ConfigError;

/// Compiled `allowedPaths` patterns.
#[derive(Clone, Debug, Default)]
pub struct PathGate {
    #[cfg(feature = "path_filter")]
    patterns: Vec<regex::Regex>,
}

impl PathGate {
    /// Compile `patterns`. Surrounding whitespace in each pattern is ignored.
    #[cfg(feature = "path_filter")]
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                regex::Regex::new(p.trim()).map_err(|e| ConfigError::InvalidPathPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Accept every path; `patterns` cannot be evaluated without `path_filter`.
    #[cfg(not(feature = "path_filter"))]
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        if !patterns.is_empty() {
            tracing::warn!(
                count = patterns.len(),
                "allowedPaths needs the `path_filter` feature; ignoring patterns"
            );
        }
        Ok(Self {})
    }

    /// Whether the scroll-spy may run on `path`.
    pub fn allows(&self, path: &str) -> bool {
        #[cfg(feature = "path_filter")]
        {
            let path = path.trim();
            self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(path))
        }
        #[cfg(not(feature = "path_filter"))]
        {
            let _ = path;
            true
        }
    }
}
