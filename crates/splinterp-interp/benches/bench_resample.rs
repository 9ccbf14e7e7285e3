use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use splinterp_interp::{resample, ExecutionStrategy, Grid1D, ResampleGrids};

fn upsample_grids(size: usize, factor: usize) -> ResampleGrids {
    let last = (size - 1) as f64;
    let in_axis = Grid1D::linspace(0.0, last, size).unwrap();
    let out_axis = Grid1D::linspace(0.0, last, (size - 1) * factor + 1).unwrap();
    ResampleGrids {
        in_axis1: in_axis.clone(),
        in_axis2: in_axis,
        out_axis1: out_axis.clone(),
        out_axis2: out_axis,
    }
}

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resample");

    for size in [64, 128, 256].iter() {
        let grids = upsample_grids(*size, 4);
        let [rows, cols] = grids.output_shape();
        group.throughput(criterion::Throughput::Elements((rows * cols) as u64));

        let parameter_string = format!("{size}x{size}->{rows}x{cols}");

        let data_f64 = (0..size * size).map(|i| (i as f64).sin()).collect::<Vec<_>>();
        let data_f32 = data_f64.iter().map(|&v| v as f32).collect::<Vec<_>>();

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("fixed_4", ExecutionStrategy::Fixed(4)),
            ("global", ExecutionStrategy::Global),
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("resample_f64_{name}"), &parameter_string),
                &data_f64,
                |b, data| {
                    let mut data = data.clone();
                    b.iter(|| black_box(resample(&mut data, &grids, strategy)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new(format!("resample_f32_{name}"), &parameter_string),
                &data_f32,
                |b, data| {
                    let mut data = data.clone();
                    b.iter(|| black_box(resample(&mut data, &grids, strategy)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
