// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document used by unit tests.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::error::LookupError;
use crate::host::{
    ClassList, DebugOverlay, ElementLookup, Geometry, ListenerId, Location, ScrollEvents,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct El(pub(crate) u32);

#[derive(Clone, Debug, Default)]
struct Node {
    selectors: Vec<String>,
    id: Option<String>,
    href: Option<String>,
    bounds: Option<Rect>,
    parent: Option<El>,
    classes: BTreeSet<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeDocument {
    nodes: Vec<Node>,
    failing: BTreeSet<String>,
    pub(crate) scroll_y: f64,
    pub(crate) viewport_height: f64,
    pub(crate) pathname: String,
    pub(crate) fragment: Option<String>,
    pub(crate) fragment_writes: usize,
    pub(crate) class_writes: usize,
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) debug_line: Option<f64>,
}

impl FakeDocument {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            failing: BTreeSet::new(),
            scroll_y: 0.0,
            viewport_height: 100.0,
            pathname: "/".to_string(),
            fragment: None,
            fragment_writes: 0,
            class_writes: 0,
            listeners: Vec::new(),
            debug_line: None,
        }
    }

    fn push(&mut self, node: Node) -> El {
        let el = El(u32::try_from(self.nodes.len()).unwrap());
        self.nodes.push(node);
        el
    }

    fn node(&self, el: El) -> &Node {
        &self.nodes[el.0 as usize]
    }

    /// A plain element matched by `selector`.
    pub(crate) fn element(&mut self, selector: &str) -> El {
        self.push(Node {
            selectors: vec![selector.to_string()],
            ..Node::default()
        })
    }

    /// A section with identifier `id` spanning `top..top + height`.
    pub(crate) fn section(&mut self, id: &str, top: f64, height: f64) -> El {
        self.push(Node {
            selectors: vec!["section".to_string(), ["#", id].concat()],
            id: Some(id.to_string()),
            bounds: Some(Rect::new(0.0, top, 800.0, top + height)),
            ..Node::default()
        })
    }

    /// A link matched by `selector`, pointing at `href`.
    pub(crate) fn link(&mut self, selector: &str, href: Option<&str>) -> El {
        self.push(Node {
            selectors: vec![selector.to_string()],
            href: href.map(ToString::to_string),
            ..Node::default()
        })
    }

    /// A new ancestor of `child`, matched by `selector`.
    pub(crate) fn wrap(&mut self, child: El, selector: &str) -> El {
        let grandparent = self.node(child).parent;
        let parent = self.push(Node {
            selectors: vec![selector.to_string()],
            parent: grandparent,
            ..Node::default()
        });
        self.nodes[child.0 as usize].parent = Some(parent);
        parent
    }

    pub(crate) fn fail_selector(&mut self, selector: &str) {
        self.failing.insert(selector.to_string());
    }

    pub(crate) fn set_bounds(&mut self, el: El, bounds: Option<Rect>) {
        self.nodes[el.0 as usize].bounds = bounds;
    }

    pub(crate) fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub(crate) fn has_class(&self, el: El, class: &str) -> bool {
        self.node(el).classes.contains(class)
    }

    /// Every element carrying `class`, in document order.
    pub(crate) fn with_class(&self, class: &str) -> Vec<El> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.classes.contains(class))
            .map(|(i, _)| El(u32::try_from(i).unwrap()))
            .collect()
    }

    fn check(&self, selector: &str) -> Result<(), LookupError> {
        if self.failing.contains(selector) {
            Err(LookupError::new(selector, "rejected by test document"))
        } else {
            Ok(())
        }
    }
}

impl ElementLookup for FakeDocument {
    type Element = El;

    fn query_all(&self, selector: &str) -> Result<Vec<El>, LookupError> {
        self.check(selector)?;
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.selectors.iter().any(|s| s == selector))
            .map(|(i, _)| El(u32::try_from(i).unwrap()))
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<El> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(|i| El(u32::try_from(i).unwrap()))
    }

    fn fragment_of(&self, link: &El) -> Option<String> {
        self.node(*link).href.clone()
    }

    fn closest(&self, element: &El, selector: &str) -> Result<Option<El>, LookupError> {
        self.check(selector)?;
        let mut cur = Some(*element);
        while let Some(el) = cur {
            if self.node(el).selectors.iter().any(|s| s == selector) {
                return Ok(Some(el));
            }
            cur = self.node(el).parent;
        }
        Ok(None)
    }
}

impl Geometry<El> for FakeDocument {
    fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, 800.0, self.scroll_y + self.viewport_height)
    }

    fn bounds_of(&self, element: &El) -> Option<Rect> {
        self.node(*element).bounds
    }
}

impl ClassList<El> for FakeDocument {
    fn add_class(&mut self, element: &El, class: &str) {
        self.class_writes += 1;
        self.nodes[element.0 as usize]
            .classes
            .insert(class.to_string());
    }

    fn remove_class(&mut self, element: &El, class: &str) {
        self.class_writes += 1;
        self.nodes[element.0 as usize].classes.remove(class);
    }
}

impl Location for FakeDocument {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn replace_fragment(&mut self, fragment: Option<&str>) {
        self.fragment_writes += 1;
        self.fragment = fragment.map(ToString::to_string);
    }
}

impl ScrollEvents for FakeDocument {
    fn bind_scroll(&mut self, listener: ListenerId) {
        self.listeners.push(listener);
    }

    fn unbind_scroll(&mut self, listener: ListenerId) {
        self.listeners.retain(|l| *l != listener);
    }
}

impl DebugOverlay for FakeDocument {
    fn set_debug_line(&mut self, change_offset: Option<f64>) {
        self.debug_line = change_offset;
    }
}
