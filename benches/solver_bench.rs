//! Benchmarks for the plane solver

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plane_fem::assembly;
use plane_fem::prelude::*;

/// `nx` x `ny` Quad4 cantilever plate, left edge fixed, tip shear on the right edge
fn create_quad4_plate(nx: usize, ny: usize) -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_material(Material::steel(0.01));

    let number = |i: usize, j: usize| i * (ny + 1) + j + 1;

    for i in 0..=nx {
        for j in 0..=ny {
            let mut node = Node::new(number(i, j), i as f64 / ny as f64, j as f64 / ny as f64);
            if i == 0 {
                node = node.fixed();
            }
            if i == nx {
                node = node.with_force(0.0, -1000.0 / (ny + 1) as f64);
            }
            mesh.add_node(node).unwrap();
        }
    }

    let mut e = 1;
    for i in 0..nx {
        for j in 0..ny {
            let nodes = [number(i, j), number(i + 1, j), number(i + 1, j + 1), number(i, j + 1)];
            mesh.add_element(ElementDef::quad4(e, nodes, 1)).unwrap();
            e += 1;
        }
    }

    mesh
}

fn benchmark_element_stiffness(c: &mut Criterion) {
    let mesh = create_quad4_plate(40, 8);
    c.bench_function("element_stiffness_320_quad4", |b| {
        b.iter(|| {
            let mut elements = mesh.build_elements().unwrap();
            let matrices = assembly::compute_element_stiffness(&mut elements, false).unwrap();
            black_box(matrices);
        })
    });
}

fn benchmark_small_plate(c: &mut Criterion) {
    let mesh = create_quad4_plate(10, 2);
    c.bench_function("plate_10x2_quad4_linear", |b| {
        b.iter(|| {
            let result = mesh.analyze(&AnalysisOptions::default().serial()).unwrap();
            black_box(result);
        })
    });
}

fn benchmark_medium_plate(c: &mut Criterion) {
    let mesh = create_quad4_plate(40, 8);
    c.bench_function("plate_40x8_quad4_linear", |b| {
        b.iter(|| {
            let result = mesh.analyze(&AnalysisOptions::default()).unwrap();
            black_box(result);
        })
    });
}

criterion_group!(
    benches,
    benchmark_element_stiffness,
    benchmark_small_plate,
    benchmark_medium_plate,
);

criterion_main!(benches);
