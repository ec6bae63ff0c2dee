// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link/section registry: navigation links and the sections they point at.
//!
//! ## Derivation
//!
//! 1) [`Registry::resolve`] looks up every element matching the link selector.
//!    A failing lookup is logged and treated like "no match".
//! 2) [`Registry::derive_sections`] takes the distinct, non-empty fragments of those links
//!    in order of first occurrence and resolves each to an element by identifier.
//!    Fragments without a matching element are dropped; sections are never fabricated.
//!
//! Links without a fragment stay in the registry: they never match a section, but
//! they can still be the default-active element.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::host::ElementLookup;

/// A navigation link and its target fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink<E> {
    /// Link element.
    pub element: E,
    /// Normalized fragment identifier (no leading `#`), if the link has one.
    pub fragment: Option<String>,
}

/// A content section targeted by at least one navigation link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<E> {
    /// Section element.
    pub element: E,
    /// Identifier the links refer to.
    pub id: String,
}

/// Strip a leading `#` and surrounding whitespace; empty fragments become `None`.
pub fn normalize_fragment(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let id = trimmed.strip_prefix('#').unwrap_or(trimmed);
    (!id.is_empty()).then_some(id)
}

/// Navigation links and their sections, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry<E> {
    links: Vec<NavLink<E>>,
    sections: Vec<Section<E>>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            sections: Vec::new(),
        }
    }
}

impl<E: Clone + Eq> Registry<E> {
    /// Resolve links for `selector` and derive their sections.
    pub fn build<H>(host: &H, selector: &str) -> Self
    where
        H: ElementLookup<Element = E> + ?Sized,
    {
        let links = Self::resolve(host, selector);
        let sections = Self::derive_sections(host, &links);
        if links.is_empty() {
            debug!(selector, "link selector did not match any elements");
        } else if sections.is_empty() {
            debug!(selector, links = links.len(), "no sections found for links");
        }
        Self { links, sections }
    }

    /// Look up the navigation links matching `selector`.
    ///
    /// Fails softly: a lookup error is logged and yields an empty list.
    pub fn resolve<H>(host: &H, selector: &str) -> Vec<NavLink<E>>
    where
        H: ElementLookup<Element = E> + ?Sized,
    {
        let elements = match host.query_all(selector) {
            Ok(elements) => elements,
            Err(err) => {
                warn!(%err, "navigation link lookup failed");
                return Vec::new();
            }
        };
        elements
            .into_iter()
            .map(|element| {
                let fragment = host
                    .fragment_of(&element)
                    .as_deref()
                    .and_then(normalize_fragment)
                    .map(ToString::to_string);
                NavLink { element, fragment }
            })
            .collect()
    }

    /// Resolve one section per distinct fragment, in order of first occurrence.
    pub fn derive_sections<H>(host: &H, links: &[NavLink<E>]) -> Vec<Section<E>>
    where
        H: ElementLookup<Element = E> + ?Sized,
    {
        let mut seen = BTreeSet::new();
        let mut sections = Vec::new();
        for id in links.iter().filter_map(|l| l.fragment.as_deref()) {
            if !seen.insert(id) {
                continue;
            }
            match host.element_by_id(id) {
                Some(element) => sections.push(Section {
                    element,
                    id: id.to_string(),
                }),
                None => debug!(id, "fragment does not match any element"),
            }
        }
        sections
    }

    /// Resolve the fallback element: the `selector` match, else the first link.
    ///
    /// A selector that matches nothing (or fails) falls back to the first link.
    pub fn default_active<H>(&self, host: &H, selector: Option<&str>) -> Option<E>
    where
        H: ElementLookup<Element = E> + ?Sized,
    {
        if let Some(selector) = selector {
            match host.query(selector) {
                Ok(Some(element)) => return Some(element),
                Ok(None) => debug!(selector, "default active element not found"),
                Err(err) => warn!(%err, "default active element lookup failed"),
            }
        }
        self.links.first().map(|l| l.element.clone())
    }
}

impl<E> Registry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// All navigation links.
    pub fn links(&self) -> &[NavLink<E>] {
        &self.links
    }

    /// All sections.
    pub fn sections(&self) -> &[Section<E>] {
        &self.sections
    }

    /// Whether there are no sections to track.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Links whose fragment equals `id`.
    pub fn links_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NavLink<E>> + 'a {
        self.links
            .iter()
            .filter(move |l| l.fragment.as_deref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;
    use alloc::vec;

    #[test]
    fn normalize_strips_hash_and_rejects_empty() {
        assert_eq!(normalize_fragment("#intro"), Some("intro"));
        assert_eq!(normalize_fragment("intro"), Some("intro"));
        assert_eq!(normalize_fragment(" #a "), Some("a"));
        assert_eq!(normalize_fragment("#"), None);
        assert_eq!(normalize_fragment(""), None);
    }

    #[test]
    fn sections_follow_first_occurrence_and_skip_missing() {
        let mut doc = FakeDocument::new();
        let a = doc.section("a", 0.0, 100.0);
        let b = doc.section("b", 100.0, 100.0);
        doc.link("nav a", Some("#b"));
        doc.link("nav a", Some("#a"));
        doc.link("nav a", Some("#b"));
        doc.link("nav a", Some("#ghost"));
        doc.link("nav a", None);

        let reg = Registry::build(&doc, "nav a");
        assert_eq!(reg.links().len(), 5);
        let ids: Vec<&str> = reg.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(reg.sections()[0].element, b);
        assert_eq!(reg.sections()[1].element, a);
        assert_eq!(reg.links_to("b").count(), 2);
        assert_eq!(reg.links_to("ghost").count(), 1);
    }

    #[test]
    fn unmatched_selector_yields_empty_registry() {
        let doc = FakeDocument::new();
        let reg = Registry::build(&doc, "nav a");
        assert!(reg.links().is_empty());
        assert!(reg.is_empty());
    }

    #[test]
    fn failing_lookup_degrades_to_empty() {
        let mut doc = FakeDocument::new();
        doc.link("nav a", Some("#a"));
        doc.fail_selector("nav a");
        assert!(Registry::resolve(&doc, "nav a").is_empty());
    }

    #[test]
    fn default_active_falls_back_to_first_link() {
        let mut doc = FakeDocument::new();
        doc.section("a", 0.0, 100.0);
        let first = doc.link("nav a", Some("#a"));
        let home = doc.element(".home");
        let reg = Registry::build(&doc, "nav a");

        assert_eq!(reg.default_active(&doc, None), Some(first));
        assert_eq!(reg.default_active(&doc, Some(".home")), Some(home));
        assert_eq!(reg.default_active(&doc, Some(".missing")), Some(first));
        doc.fail_selector(".home");
        assert_eq!(reg.default_active(&doc, Some(".home")), Some(first));
    }
}
