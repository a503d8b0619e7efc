//! FABRIK solve throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grasp_ik::{FabrikConfig, FabrikSolver};
use grasp_types::{BoneChain, BoneJoint, Point3};

#[allow(clippy::unwrap_used)]
fn finger_chain() -> BoneChain {
    BoneChain::from_rest_pose(vec![
        BoneJoint::at(Point3::new(0.0, 0.0, 0.0)),
        BoneJoint::at(Point3::new(0.03, 0.0, 0.0)),
        BoneJoint::at(Point3::new(0.055, 0.0, 0.0)),
        BoneJoint::at(Point3::new(0.073, 0.0, 0.0)),
    ])
    .unwrap()
}

fn bench_solve(c: &mut Criterion) {
    let chain = finger_chain();
    let solver = FabrikSolver::new(FabrikConfig::default());
    let target = Point3::new(0.04, 0.03, 0.0);

    c.bench_function("fabrik_reachable", |b| {
        b.iter(|| solver.solve(black_box(&chain), black_box(target)))
    });

    let unreachable = Point3::new(0.2, 0.0, 0.0);
    c.bench_function("fabrik_unreachable", |b| {
        b.iter(|| solver.solve(black_box(&chain), black_box(unreachable)))
    });
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
