// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_stateful`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;

use understory_stateful::{
    Arg, Callback, Options, Props, Value, decorate, fn_component, props, shallow_equal,
};

fn wide_record(fields: usize) -> Props {
    (0..fields)
        .map(|i| (format!("field{i}"), Value::new(i)))
        .collect()
}

fn bench_props(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Props={} Value={} Callback={}",
            core::mem::size_of::<Props>(),
            core::mem::size_of::<Value>(),
            core::mem::size_of::<Callback>(),
        );
    });

    let mut group = c.benchmark_group("stateful/shallow_equal");
    for fields in [2_usize, 8, 32] {
        let a = wide_record(fields);
        let b = wide_record(fields);
        group.bench_function(BenchmarkId::new("equal", fields), |bench| {
            bench.iter(|| black_box(shallow_equal(&a, &b)));
        });
    }
    group.finish();
}

fn bench_wrapper(c: &mut Criterion) {
    let mut group = c.benchmark_group("stateful/wrapper");

    let decoration = decorate(
        props! { message: String::from("hello"), count: 0_i32 }.into(),
        Arg::Absent,
        Arg::Absent,
        Options::default(),
    );
    let wrapped = decoration.wrap(fn_component("Bench", |props: &Props| props.len()));

    group.bench_function("mount", |b| {
        b.iter_batched(
            || wrapped.construct(),
            |mut instance| {
                let _ = black_box(instance.mount(props! { label: 1_i32 }));
                black_box(instance);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("set_and_flush", |b| {
        let mut instance = wrapped.construct();
        let _ = instance.mount(Props::new());
        let mut count = 0_i32;
        b.iter(|| {
            count += 1;
            instance.setter().set(props! { count: count });
            black_box(instance.flush())
        });
    });

    group.bench_function("gated_skip", |b| {
        let mut instance = wrapped.construct();
        let own = props! { label: 1_i32 };
        let _ = instance.mount(own.clone());
        b.iter(|| black_box(instance.receive_props(own.clone())));
    });

    let impure = decorate(
        props! { message: String::from("hello") }.into(),
        Arg::Absent,
        Arg::Absent,
        Options::new().pure(false),
    )
    .wrap(fn_component("Bench", |props: &Props| props.len()));
    group.bench_function("impure_rerender", |b| {
        let mut instance = impure.construct();
        let own = props! { label: 1_i32 };
        let _ = instance.mount(own.clone());
        b.iter(|| black_box(instance.receive_props(own.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_props, bench_wrapper);
criterion_main!(benches);
