// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_spy --heading-base-level=0

//! Understory Scroll Spy: a deterministic, `no_std` active-section tracker for navigation.
//!
//! ## Overview
//!
//! Given navigation links that point at content sections through fragment identifiers, this crate
//! decides which section is active for the current scroll position and keeps link highlighting,
//! section highlighting, and the location fragment in sync with that decision.
//! Side effects happen exactly once per transition; re-running with an unchanged position is a no-op.
//!
//! It does not own a document.
//! The toolkit implements the [`host`] traits (selector lookup, geometry, class lists, location,
//! scroll subscription) over its own element handles and forwards scroll events.
//!
//! ## Resolution
//!
//! The trigger line sits `changeOffset` percent down the viewport, in document coordinates.
//! [`Policy::NearestPreceding`](resolve::Policy::NearestPreceding) (default) picks the last section whose
//! top is above the line; [`Policy::ExactContainment`](resolve::Policy::ExactContainment) (`exactMatch`)
//! picks the last section strictly containing the line and leaves gaps between sections unresolved.
//! When nothing is active the default element (or the first link) can be highlighted instead.
//!
//! ## Workflow
//!
//! 1) Build a [`Config`](config::Config) from defaults and partial [`Options`](config::Options).
//! 2) Create a [`ScrollSpy`](engine::ScrollSpy); it resolves links and sections, binds its scroll
//!    listener, and runs one forced cycle.
//! 3) Call [`ScrollSpy::on_scroll`](engine::ScrollSpy::on_scroll) for each scroll event.
//! 4) Change options with [`ScrollSpy::set`](engine::ScrollSpy::set); every change re-runs initialization.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_scroll_spy::config::{Config, Options};
//! use understory_scroll_spy::engine::ScrollSpy;
//! use understory_scroll_spy::error::LookupError;
//! use understory_scroll_spy::host::{
//!     ClassList, DebugOverlay, ElementLookup, Geometry, ListenerId, Location, ScrollEvents,
//! };
//!
//! // Element 0 and 1 are links, 2 and 3 are the sections "intro" and "usage".
//! struct Page {
//!     scroll_y: f64,
//!     active: Vec<usize>,
//!     fragment: Option<String>,
//! }
//!
//! impl ElementLookup for Page {
//!     type Element = usize;
//!     fn query_all(&self, selector: &str) -> Result<Vec<usize>, LookupError> {
//!         Ok(if selector == "nav a" { vec![0, 1] } else { vec![] })
//!     }
//!     fn element_by_id(&self, id: &str) -> Option<usize> {
//!         match id {
//!             "intro" => Some(2),
//!             "usage" => Some(3),
//!             _ => None,
//!         }
//!     }
//!     fn fragment_of(&self, link: &usize) -> Option<String> {
//!         Some(if *link == 0 { "#intro" } else { "#usage" }.to_string())
//!     }
//!     fn closest(&self, _: &usize, _: &str) -> Result<Option<usize>, LookupError> {
//!         Ok(None)
//!     }
//! }
//!
//! impl Geometry<usize> for Page {
//!     fn viewport(&self) -> Rect {
//!         Rect::new(0.0, self.scroll_y, 800.0, self.scroll_y + 600.0)
//!     }
//!     fn bounds_of(&self, el: &usize) -> Option<Rect> {
//!         let top = (*el as f64 - 2.0) * 1000.0;
//!         Some(Rect::new(0.0, top, 800.0, top + 1000.0))
//!     }
//! }
//!
//! impl ClassList<usize> for Page {
//!     fn add_class(&mut self, el: &usize, _: &str) {
//!         if !self.active.contains(el) {
//!             self.active.push(*el);
//!         }
//!     }
//!     fn remove_class(&mut self, el: &usize, _: &str) {
//!         self.active.retain(|e| e != el);
//!     }
//! }
//!
//! impl Location for Page {
//!     fn pathname(&self) -> String {
//!         "/".to_string()
//!     }
//!     fn replace_fragment(&mut self, fragment: Option<&str>) {
//!         self.fragment = fragment.map(str::to_string);
//!     }
//! }
//!
//! impl ScrollEvents for Page {
//!     fn bind_scroll(&mut self, _: ListenerId) {}
//!     fn unbind_scroll(&mut self, _: ListenerId) {}
//! }
//!
//! impl DebugOverlay for Page {}
//!
//! let mut page = Page { scroll_y: 0.0, active: vec![], fragment: None };
//! let options = Options { update_hash: Some(true), ..Options::default() };
//! let mut spy = ScrollSpy::new(Config::from_options(options).unwrap(), &mut page).unwrap();
//! assert_eq!(page.active, vec![0]);
//! assert_eq!(page.fragment.as_deref(), Some("intro"));
//!
//! // Trigger line: 1000 + 600 * 50% = 1300, inside "usage".
//! page.scroll_y = 1000.0;
//! assert!(spy.on_scroll(&mut page).pipeline_ran);
//! assert_eq!(page.active, vec![1]);
//! assert_eq!(page.fragment.as_deref(), Some("usage"));
//!
//! // Nothing changed: no side effects.
//! assert!(spy.on_scroll(&mut page).is_noop());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo, `thiserror`, and `tracing`.
//! - `libm`: Kurbo's `no_std` math backend.
//! - `path_filter`: honor `allowedPaths` regular expressions (requires `std`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod hash;
pub mod host;
pub mod registry;
pub mod resolve;

#[cfg(test)]
mod testing;
