// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position resolver: trigger line and section selection policies.
//!
//! ## Trigger line
//!
//! The trigger line is a single document coordinate,
//! `scroll offset + viewport height * change_offset / 100`.
//! A section becomes a candidate by its relation to that line.
//!
//! ## Policies
//!
//! - [`Policy::NearestPreceding`]: the section's top is strictly above the line.
//! - [`Policy::ExactContainment`]: the line is strictly inside `top..top + height`.
//!   Whitespace between sections therefore resolves to no section (a gap).
//!
//! In both cases the last candidate in document order wins, which only matters
//! for overlapping or zero-height sections.
//! Sections without geometry never qualify.
//!
//! The resolver does not sort: callers pass sections in top-to-bottom document order.

use kurbo::Rect;

/// Section selection policy.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Policy {
    /// Last section whose top has been passed by the trigger line.
    #[default]
    NearestPreceding,
    /// Last section that strictly contains the trigger line.
    ExactContainment,
}

impl Policy {
    /// Whether a section with `bounds` qualifies for the trigger `line`.
    pub fn qualifies(self, line: f64, bounds: Rect) -> bool {
        match self {
            Self::NearestPreceding => bounds.y0 < line,
            Self::ExactContainment => bounds.y0 < line && line < bounds.y0 + bounds.height(),
        }
    }

    /// Index of the selected section, if any.
    ///
    /// `bounds` yields each section's document-space bounds in document order,
    /// `None` for sections that are not laid out.
    pub fn resolve<I>(self, line: f64, bounds: I) -> Option<usize>
    where
        I: IntoIterator<Item = Option<Rect>>,
    {
        let mut best = None;
        for (i, b) in bounds.into_iter().enumerate() {
            if let Some(b) = b
                && self.qualifies(line, b)
            {
                best = Some(i);
            }
        }
        best
    }
}

/// Trigger line for a viewport given in document coordinates.
///
/// `change_offset` is a percentage of the viewport height.
pub fn trigger_line(viewport: Rect, change_offset: f64) -> f64 {
    viewport.y0 + viewport.height() * (change_offset / 100.0)
}

/// Index of the last section whose top lies above `line`.
///
/// Same as [`Policy::NearestPreceding`] regardless of the configured policy.
pub fn last_passed<I>(line: f64, bounds: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<Rect>>,
{
    Policy::NearestPreceding.resolve(line, bounds)
}

/// Whether `line` lies below the top of the first section.
///
/// `false` when the first section has no geometry.
pub fn passed_first(line: f64, first: Option<Rect>) -> bool {
    first.is_some_and(|b| line > b.y0)
}
