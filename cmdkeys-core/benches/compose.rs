use std::sync::Arc;

use cmdkeys_core::{
    compose, ComposeEnv, Labels, LayoutConfig, ListDims, ListLayout, Macro, Measure, Profile,
    ProfileKeybinds, SendMode, UnicodeMeasure,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn profile_with(n: usize, mode: SendMode) -> Profile {
    let texts: Vec<String> = (0..n).map(|i| format!("/say message number {}", i)).collect();
    let mut m = Macro::with_messages(texts.iter().map(String::as_str));
    m.mode = mode;
    Profile {
        macros: vec![m],
        ..Profile::default()
    }
}

fn bench_compose(c: &mut Criterion) {
    let keybinds = ProfileKeybinds::new();
    let labels = Labels::default();
    let measure: Measure = Arc::new(UnicodeMeasure);
    let layout = ListLayout::new(
        ListDims {
            width: 1280,
            height: 720,
            top: 32,
        },
        &LayoutConfig::default(),
    );
    let env = ComposeEnv {
        keybinds: &keybinds,
        layout: &layout,
        labels: &labels,
        measure: &measure,
        capture: None,
    };

    let mut group = c.benchmark_group("compose");
    for n in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::new("send", n), &n, |b, &n| {
            let mut profile = profile_with(n, SendMode::Send);
            b.iter(|| black_box(compose(&mut profile, 0, &env).unwrap().len()));
        });
        group.bench_with_input(BenchmarkId::new("cycle", n), &n, |b, &n| {
            let mut profile = profile_with(n, SendMode::Cycle);
            b.iter(|| black_box(compose(&mut profile, 0, &env).unwrap().len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
