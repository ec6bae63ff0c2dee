// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment synchronization.
//!
//! Decides what the location fragment should become after a transition.
//! Under exact containment with `saveHashBetweenSections`, a gap between sections keeps the
//! fragment on the last section the trigger line passed instead of clearing it.
//! Before the first section the fragment is cleared as usual.

use kurbo::Rect;

use crate::config::Behavior;
use crate::host::Location;
use crate::registry::Section;
use crate::resolve::{last_passed, passed_first};

/// What to do with the location fragment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FragmentAction<'a> {
    /// Leave the fragment alone (hash updates disabled).
    Keep,
    /// Point the fragment at this section identifier.
    Set(&'a str),
    /// Clear the fragment.
    Clear,
}

impl FragmentAction<'_> {
    /// Perform the action on `location`.
    pub fn apply<L: Location + ?Sized>(self, location: &mut L) {
        match self {
            Self::Keep => {}
            Self::Set(id) => location.replace_fragment(Some(id)),
            Self::Clear => location.replace_fragment(None),
        }
    }
}

/// Decide the fragment for the active section `current`.
///
/// `sections` and `bounds` are parallel, in document order.
pub fn fragment_action<'a, E>(
    flags: Behavior,
    current: Option<&'a Section<E>>,
    line: f64,
    sections: &'a [Section<E>],
    bounds: &[Option<Rect>],
) -> FragmentAction<'a> {
    if !flags.contains(Behavior::UPDATE_HASH) {
        return FragmentAction::Keep;
    }
    let in_gap = current.is_none()
        && flags.contains(Behavior::EXACT_MATCH | Behavior::SAVE_HASH_BETWEEN_SECTIONS)
        && passed_first(line, bounds.first().copied().flatten());
    let target = if in_gap {
        last_passed(line, bounds.iter().copied()).and_then(|i| sections.get(i))
    } else {
        current
    };
    match target {
        Some(section) => FragmentAction::Set(&section.id),
        None => FragmentAction::Clear,
    }
}
