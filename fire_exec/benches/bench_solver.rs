use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Vector2, Vector3};

use fire_lib::fire_ctrl::{FireCtrl, InputData, SolverStrategy, VehicleMotion};
use util::module::State;

/// Time one full intercept sweep (up to ~500 candidate flight times) through
/// the module's cyclic processing entry point.
fn bench_intercept_sweep(c: &mut Criterion) {
    let mut fire_ctrl = FireCtrl::default();

    let input = InputData {
        target_pos_m_wf: Some(Vector3::new(6.0, 2.0, 1.8)),
        vehicle: VehicleMotion {
            position_m_wf: Vector2::zeros(),
            heading_rad: 0.0,
            velocity_mps_vf: Vector3::new(1.0, 0.5, 0.0),
        },
        strategy: SolverStrategy::MovingIntercept,
    };

    c.bench_function("intercept sweep", |b| {
        b.iter(|| fire_ctrl.proc(black_box(&input)))
    });
}

fn bench_drag_estimate(c: &mut Criterion) {
    let mut fire_ctrl = FireCtrl::default();

    let input = InputData {
        target_pos_m_wf: Some(Vector3::new(6.0, 2.0, 1.8)),
        vehicle: VehicleMotion {
            position_m_wf: Vector2::zeros(),
            heading_rad: 0.0,
            velocity_mps_vf: Vector3::zeros(),
        },
        strategy: SolverStrategy::DragCompensated,
    };

    c.bench_function("drag estimate", |b| {
        b.iter(|| fire_ctrl.proc(black_box(&input)))
    });
}

criterion_group!(benches, bench_intercept_sweep, bench_drag_estimate);
criterion_main!(benches);
