use criterion::{black_box, criterion_group, criterion_main, Criterion};

use varr_common::collections::DynArray;

fn dynarray_push(c: &mut Criterion) {
    c.bench_function("DynArray::push(100) no reserve", |b| {
        b.iter(|| {
            let mut arr = DynArray::<u32>::with_capacity(0);
            for i in 0..100 {
                arr.push(black_box(i));
            }
            arr
        })
    });
    c.bench_function("DynArray::push(100) reserve", |b| {
        b.iter(|| {
            let mut arr = DynArray::<u32>::with_capacity(100);
            for i in 0..100 {
                arr.push(black_box(i));
            }
            arr
        })
    });

    c.bench_function("Vec::push(100) no reserve", |b| {
        b.iter(|| {
            let mut arr = Vec::<u32>::new();
            for i in 0..100 {
                arr.push(black_box(i));
            }
            arr
        })
    });
    c.bench_function("Vec::push(100) reserve", |b| {
        b.iter(|| {
            let mut arr = Vec::<u32>::with_capacity(100);
            for i in 0..100 {
                arr.push(black_box(i));
            }
            arr
        })
    });
}

fn dynarray_from_slice(c: &mut Criterion) {
    let data: Vec<u32> = (0..1024).collect();

    c.bench_function("DynArray::from(&[u32; 1024])", |b| {
        b.iter(|| DynArray::<u32>::from(black_box(data.as_slice())))
    });
    c.bench_function("Vec::from(&[u32; 1024])", |b| {
        b.iter(|| Vec::<u32>::from(black_box(data.as_slice())))
    });
}

criterion_group!(benches, dynarray_push, dynarray_from_slice);
criterion_main!(benches);
