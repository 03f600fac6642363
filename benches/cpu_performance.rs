use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluidt::solver::{advect, diffuse, project};
use fluidt::{FieldKind, Simulation, SimulationParams};
use glam::DVec2;

fn seeded(size: usize, parallel: bool) -> Simulation {
    let params = SimulationParams {
        parallel,
        ..SimulationParams::default()
    };
    let mut sim = Simulation::new(size, size, params).unwrap();
    let mid = (size / 2) as isize;
    for i in -5..5 {
        sim.set(mid + i, mid, 15.0, DVec2::new(8.0, 0.0));
    }
    sim
}

fn benchmark_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, &size| {
            let mut sim = seeded(size, true);
            b.iter(|| black_box(sim.update()));
        });
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, &size| {
            let mut sim = seeded(size, false);
            b.iter(|| black_box(sim.update()));
        });
    }
    group.finish();
}

fn benchmark_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");

    let mut sim = seeded(100, true);
    for _ in 0..5 {
        sim.update();
    }
    let density = sim.field(FieldKind::Density).clone();
    let vx = sim.field(FieldKind::VelocityX).clone();
    let vy = sim.field(FieldKind::VelocityY).clone();

    group.bench_function("diffuse", |b| {
        b.iter(|| black_box(diffuse(&density, 0.1, 5)));
    });

    group.bench_function("advect", |b| {
        b.iter(|| black_box(advect(&density, &vx, &vy)));
    });

    group.bench_function("project", |b| {
        b.iter(|| {
            let (mut x, mut y) = (vx.clone(), vy.clone());
            project(&mut x, &mut y, 5);
            black_box((x, y))
        });
    });

    group.bench_function("resize", |b| {
        b.iter(|| {
            let mut sim = sim.clone();
            sim.resize(150, 80).unwrap();
            black_box(sim)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_step, benchmark_operations);
criterion_main!(benches);
