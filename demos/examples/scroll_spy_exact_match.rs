// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact containment with gaps between sections.
//!
//! With `exactMatch` the trigger line must sit inside a section. In the gaps the
//! default element is highlighted instead, while `saveHashBetweenSections` keeps the
//! fragment on the last section passed. Options are then changed at runtime by name,
//! and `allowedPaths` switches the scroll-spy off for other pages.
//!
//! Run:
//! - `cargo run -p understory_demos --example scroll_spy_exact_match`

mod common;

use common::{Page, init_tracing};
use understory_scroll_spy::config::{Config, OptionKey, OptionValue};
use understory_scroll_spy::engine::ScrollSpy;
use understory_scroll_spy::error::Error;

fn main() -> Result<(), Error> {
    init_tracing();

    let mut page = Page::new(&[("one", 400.0), ("two", 400.0), ("three", 400.0)], 400.0);
    let config = Config::from_pairs([
        ("exactMatch", OptionValue::Flag(true)),
        ("updateHash", OptionValue::Flag(true)),
        ("changeOffset", OptionValue::Number(25.0)),
        ("defaultActiveElement", OptionValue::Text("nav".to_string())),
        ("debugLine", OptionValue::Flag(true)),
    ])?;
    let mut spy = ScrollSpy::new(config, &mut page)?;
    println!("debug line at {:?}%", page.debug_line);

    // Trigger line = scroll_y + 150.
    for y in [0.0, 100.0, 300.0, 700.0, 900.0, 1500.0, 2000.0] {
        page.scroll_y = y;
        spy.on_scroll(&mut page);
        println!("{}", page.describe("active"));
    }

    println!("-- saveHashBetweenSections off");
    spy.set_by_name("saveHashBetweenSections", OptionValue::Flag(false), &mut page)?;
    page.scroll_y = 300.0;
    spy.on_scroll(&mut page);
    println!("{}", page.describe("active"));

    println!("-- changeOffset read back: {:?}", spy.config().get(OptionKey::ChangeOffset));

    println!("-- restricted to /docs");
    spy.set(
        OptionKey::AllowedPaths,
        OptionValue::List(vec!["^/docs".to_string()]),
        &mut page,
    )?;
    println!("armed on {:?}: {}", page.pathname, spy.is_armed());
    page.pathname = "/docs/guide".to_string();
    spy.refresh(&mut page)?;
    println!("armed on {:?}: {}", page.pathname, spy.is_armed());

    if let Err(err) = spy.set_by_name("noSuchOption", OptionValue::Flag(true), &mut page) {
        println!("rejected: {err}");
    }
    Ok(())
}
