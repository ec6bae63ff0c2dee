// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-spy basics: nearest-preceding resolution with link, parent and section classes.
//!
//! Scrolls a three-section page top to bottom and prints which elements carry the
//! active class after each event. Repeated events at the same position are no-ops.
//!
//! Run:
//! - `cargo run -p understory_demos --example scroll_spy_basics`
//! - `RUST_LOG=understory_scroll_spy=trace cargo run -p understory_demos --example scroll_spy_basics`

mod common;

use common::{Page, init_tracing};
use understory_scroll_spy::config::{Options, callback};
use understory_scroll_spy::engine::{NavigationState, ScrollSpy};
use understory_scroll_spy::error::Error;
use understory_scroll_spy::registry::Section;

fn main() -> Result<(), Error> {
    init_tracing();

    let mut page = Page::new(&[("intro", 800.0), ("usage", 1200.0), ("faq", 600.0)], 0.0);
    let options = Options {
        update_hash: Some(true),
        set_classes_on_sections: Some(true),
        parents_obtaining_active_class: Some(vec!["li".to_string()]),
        on_change: Some(vec![callback(|state: &NavigationState<usize>| {
            let id = |s: Option<&Section<usize>>| s.map(|s| s.id.clone());
            println!(
                "  onChange: {:?} -> {:?}",
                id(state.previous()),
                id(state.current())
            );
            Ok(())
        })]),
        ..Options::default()
    };

    let mut spy = ScrollSpy::with_options(options, &mut page)?;
    println!("{}", page.describe("active"));

    for y in [0.0, 300.0, 500.0, 500.0, 1200.0, 2000.0, 2600.0, 100.0] {
        page.scroll_y = y;
        let update = spy.on_scroll(&mut page);
        let marker = if update.is_noop() { "(no-op)" } else { "" };
        println!("{} {marker}", page.describe("active"));
    }

    spy.detach(&mut page);
    page.scroll_y = 0.0;
    assert!(spy.on_scroll(&mut page).is_noop(), "detached spy ignores events");
    Ok(())
}
