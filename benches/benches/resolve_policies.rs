// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_scroll_spy::resolve::{Policy, last_passed, trigger_line};

/// `n` stacked sections of height `h`, separated by `gap`.
fn gen_sections(n: usize, h: f64, gap: f64) -> Vec<Option<Rect>> {
    (0..n)
        .map(|i| {
            let y0 = i as f64 * (h + gap);
            Some(Rect::new(0.0, y0, 800.0, y0 + h))
        })
        .collect()
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64)
    }
}

/// Viewports scattered over a document of height `doc_h`.
fn gen_viewports(count: usize, doc_h: f64, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let y0 = rng.next_f64() * doc_h;
            Rect::new(0.0, y0, 800.0, y0 + 600.0)
        })
        .collect()
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_policies");
    for &n in &[16_usize, 128, 1024] {
        let sections = gen_sections(n, 400.0, 40.0);
        let doc_h = n as f64 * 440.0;
        let viewports = gen_viewports(256, doc_h, 0x5eed_0001);
        group.throughput(Throughput::Elements((n * viewports.len()) as u64));

        for (name, policy) in [
            ("nearest_preceding", Policy::NearestPreceding),
            ("exact_containment", Policy::ExactContainment),
        ] {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter(|| {
                    let mut hits = 0_usize;
                    for vp in &viewports {
                        let line = trigger_line(*vp, 50.0);
                        if let Some(i) = policy.resolve(line, sections.iter().copied()) {
                            hits += i;
                        }
                    }
                    black_box(hits)
                });
            });
        }

        group.bench_function(format!("gap_fallback_n{n}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for vp in &viewports {
                    let line = trigger_line(*vp, 50.0);
                    if let Some(i) = last_passed(line, sections.iter().copied()) {
                        hits += i;
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
