// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: element lookup, geometry, class mutation, location, and scroll binding.
//!
//! ## Overview
//!
//! The scroll-spy never touches a document directly.
//! Every capability it needs is expressed as a small trait, and a toolkit (a browser binding,
//! a native document viewer, or a test double) implements them over its own element handles.
//! [`Host`] bundles all of them and is implemented automatically.
//!
//! Lookups return `Result<_, LookupError>` so that "the selector matched nothing"
//! (`Ok(None)` / `Ok(vec![])`) stays distinguishable from "the lookup itself failed".

use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::Rect;

use crate::error::LookupError;

/// Resolve selectors and identifiers to element handles.
pub trait ElementLookup {
    /// Handle to an element in the host document.
    ///
    /// Equality must be identity: two handles are equal when they refer to the same element.
    type Element: Clone + Eq + core::fmt::Debug;

    /// Returns all elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, LookupError>;

    /// Returns the first element matching `selector`, if any.
    fn query(&self, selector: &str) -> Result<Option<Self::Element>, LookupError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Returns the element whose identifier is `id`, if any.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Returns the raw fragment of a link's target (for example `"#intro"` or `"intro"`).
    ///
    /// `None` when the link has no fragment.
    fn fragment_of(&self, link: &Self::Element) -> Option<String>;

    /// Returns the closest inclusive ancestor of `element` matching `selector`.
    fn closest(
        &self,
        element: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, LookupError>;
}

/// Viewport and element geometry in document coordinates.
pub trait Geometry<E> {
    /// The visible part of the document.
    ///
    /// `y0` is the vertical scroll offset and `height()` the viewport height.
    fn viewport(&self) -> Rect;

    /// Bounds of `element` relative to the top of the document.
    ///
    /// `None` when the element is no longer laid out (for example detached).
    fn bounds_of(&self, element: &E) -> Option<Rect>;
}

/// Class list mutation.
pub trait ClassList<E> {
    /// Add `class` to `element`. Adding a present class is a no-op.
    fn add_class(&mut self, element: &E, class: &str);
    /// Remove `class` from `element`. Removing an absent class is a no-op.
    fn remove_class(&mut self, element: &E, class: &str);
}

/// Address bar access.
pub trait Location {
    /// Path component of the current location, used by path gating.
    fn pathname(&self) -> String;

    /// Replace the current history entry's fragment.
    ///
    /// `Some(id)` points the fragment at `#id`; `None` clears it.
    fn replace_fragment(&mut self, fragment: Option<&str>);
}

/// Scroll event subscription.
///
/// The host delivers scroll events by calling
/// [`ScrollSpy::on_scroll`](crate::engine::ScrollSpy::on_scroll) for every listener it has bound.
pub trait ScrollEvents {
    /// Start delivering scroll events to `listener`.
    fn bind_scroll(&mut self, listener: ListenerId);
    /// Stop delivering scroll events to `listener`.
    fn unbind_scroll(&mut self, listener: ListenerId);
}

/// Visual debug line drawn at the trigger height.
pub trait DebugOverlay {
    /// Show the line at `change_offset` percent of the viewport height, or hide it on `None`.
    fn set_debug_line(&mut self, change_offset: Option<f64>) {
        let _ = change_offset;
    }
}

/// Everything the scroll-spy needs from its environment.
pub trait Host:
    ElementLookup
    + Geometry<<Self as ElementLookup>::Element>
    + ClassList<<Self as ElementLookup>::Element>
    + Location
    + ScrollEvents
    + DebugOverlay
{
}

impl<T> Host for T where
    T: ElementLookup
        + Geometry<<T as ElementLookup>::Element>
        + ClassList<<T as ElementLookup>::Element>
        + Location
        + ScrollEvents
        + DebugOverlay
{
}

/// Stable identity of one scroll-spy's scroll listener.
///
/// Allocated once per instance and reused for every bind/unbind, so a host can
/// match the two calls by value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u32);

impl ListenerId {
    /// Allocate a process-unique listener id.
    ///
    /// Uses 32-bit atomics so targets without `AtomicU64` are supported.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u32 {
        self.0
    }
}
