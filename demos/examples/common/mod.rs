// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny in-memory page shared by the scroll-spy demos.
//!
//! Layout: a `nav` with one `li > a` per section, followed by the sections stacked
//! top to bottom. Element handles are indices into the node list.

#![allow(dead_code, reason = "not every demo uses every helper")]

use std::collections::BTreeSet;

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_scroll_spy::error::LookupError;
use understory_scroll_spy::host::{
    ClassList, DebugOverlay, ElementLookup, Geometry, ListenerId, Location, ScrollEvents,
};

/// Install a `fmt` subscriber honoring `RUST_LOG` (default: `understory_scroll_spy=debug`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("understory_scroll_spy=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[derive(Debug, Default)]
struct Node {
    tags: Vec<&'static str>,
    id: Option<String>,
    href: Option<String>,
    bounds: Option<Rect>,
    parent: Option<usize>,
    classes: BTreeSet<String>,
}

#[derive(Debug)]
pub struct Page {
    nodes: Vec<Node>,
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub pathname: String,
    pub fragment: Option<String>,
    pub debug_line: Option<f64>,
}

impl Page {
    /// Build a page with one section per `(id, height)`, separated by `gap`.
    pub fn new(sections: &[(&str, f64)], gap: f64) -> Self {
        let mut nodes = vec![Node {
            tags: vec!["nav"],
            ..Node::default()
        }];
        for (id, _) in sections {
            let li = nodes.len();
            nodes.push(Node {
                tags: vec!["li"],
                parent: Some(0),
                ..Node::default()
            });
            nodes.push(Node {
                tags: vec!["nav a"],
                href: Some(format!("#{id}")),
                parent: Some(li),
                ..Node::default()
            });
        }
        let mut top = 0.0;
        for (id, height) in sections {
            nodes.push(Node {
                tags: vec!["section"],
                id: Some((*id).to_string()),
                bounds: Some(Rect::new(0.0, top, 800.0, top + height)),
                ..Node::default()
            });
            top += height + gap;
        }
        Self {
            nodes,
            scroll_y: 0.0,
            viewport_height: 600.0,
            pathname: "/".to_string(),
            fragment: None,
            debug_line: None,
        }
    }

    /// Human readable summary of highlighted elements.
    pub fn describe(&self, class: &str) -> String {
        let names: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.classes.contains(class))
            .map(|n| match (&n.id, &n.href, n.tags.first()) {
                (Some(id), _, _) => format!("section#{id}"),
                (_, Some(href), _) => format!("a[{href}]"),
                (_, _, Some(tag)) => (*tag).to_string(),
                _ => "?".to_string(),
            })
            .collect();
        format!(
            "y={:>6.0} active=[{}] fragment={:?}",
            self.scroll_y,
            names.join(", "),
            self.fragment
        )
    }
}

impl ElementLookup for Page {
    type Element = usize;

    fn query_all(&self, selector: &str) -> Result<Vec<usize>, LookupError> {
        if selector.trim().is_empty() {
            return Err(LookupError::new(selector, "empty selector"));
        }
        if let Some(id) = selector.strip_prefix('#') {
            return Ok(self.element_by_id(id).into_iter().collect());
        }
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.tags.contains(&selector))
            .map(|(i, _)| i)
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id.as_deref() == Some(id))
    }

    fn fragment_of(&self, link: &usize) -> Option<String> {
        self.nodes[*link].href.clone()
    }

    fn closest(&self, element: &usize, selector: &str) -> Result<Option<usize>, LookupError> {
        let mut cur = Some(*element);
        while let Some(i) = cur {
            if self.nodes[i].tags.contains(&selector) {
                return Ok(Some(i));
            }
            cur = self.nodes[i].parent;
        }
        Ok(None)
    }
}

impl Geometry<usize> for Page {
    fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, 800.0, self.scroll_y + self.viewport_height)
    }

    fn bounds_of(&self, element: &usize) -> Option<Rect> {
        self.nodes[*element].bounds
    }
}

impl ClassList<usize> for Page {
    fn add_class(&mut self, element: &usize, class: &str) {
        self.nodes[*element].classes.insert(class.to_string());
    }

    fn remove_class(&mut self, element: &usize, class: &str) {
        self.nodes[*element].classes.remove(class);
    }
}

impl Location for Page {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn replace_fragment(&mut self, fragment: Option<&str>) {
        self.fragment = fragment.map(str::to_string);
    }
}

impl ScrollEvents for Page {
    fn bind_scroll(&mut self, listener: ListenerId) {
        tracing::info!(listener = listener.get(), "scroll listener bound");
    }

    fn unbind_scroll(&mut self, listener: ListenerId) {
        tracing::info!(listener = listener.get(), "scroll listener unbound");
    }
}

impl DebugOverlay for Page {
    fn set_debug_line(&mut self, change_offset: Option<f64>) {
        self.debug_line = change_offset;
    }
}
