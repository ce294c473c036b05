//! plane-fem example - cantilever plate under an end shear load
//!
//! A 10 x 1 plate fixed along x = 0, loaded by a uniform downward traction on
//! the free end. Meshed once with Quad4 and once with Quad8 elements and
//! compared with the beam-theory tip deflection.

use plane_fem::prelude::*;

const LENGTH: f64 = 10.0;
const HEIGHT: f64 = 1.0;
const LOAD: f64 = -1000.0;

/// Structured mesh of `nx` x `ny` elements
fn cantilever(nx: usize, ny: usize, kind: ElementKind) -> FEMResult<Mesh> {
    let mut mesh = Mesh::new();
    mesh.add_material(Material::steel(0.1));

    // Quad8 meshes live on a grid twice as fine, without element centres
    let step = if kind == ElementKind::Quad8 { 2 } else { 1 };
    let (gx, gy) = (step * nx, step * ny);
    let mut numbers = vec![vec![0usize; gy + 1]; gx + 1];
    let mut next = 1;

    let dy = HEIGHT / gy as f64;

    for i in 0..=gx {
        for j in 0..=gy {
            if step == 2 && i % 2 == 1 && j % 2 == 1 {
                continue;
            }
            let x = LENGTH * i as f64 / gx as f64;
            let y = HEIGHT * j as f64 / gy as f64;
            let mut node = Node::new(next, x, y);
            if i == 0 {
                node = node.fixed();
            }
            if i == gx {
                // Consistent nodal loads of a uniform edge traction
                let share = match (step, j) {
                    (1, j) if j == 0 || j == gy => 0.5,
                    (1, _) => 1.0,
                    (_, j) if j % 2 == 1 => 4.0 / 3.0,
                    (_, j) if j == 0 || j == gy => 1.0 / 3.0,
                    _ => 2.0 / 3.0,
                };
                node = node.with_force(0.0, LOAD * share * dy / HEIGHT);
            }
            mesh.add_node(node)?;
            numbers[i][j] = next;
            next += 1;
        }
    }

    let mut number = 1;
    for ex in 0..nx {
        for ey in 0..ny {
            let (i, j) = (step * ex, step * ey);
            let n = |di: usize, dj: usize| numbers[i + di][j + dj];
            let def = match kind {
                ElementKind::Quad4 => ElementDef::quad4(number, [n(0, 0), n(1, 0), n(1, 1), n(0, 1)], 1),
                ElementKind::Quad8 => ElementDef::quad8(
                    number,
                    [n(0, 0), n(2, 0), n(2, 2), n(0, 2), n(1, 0), n(2, 1), n(1, 2), n(0, 1)],
                    1,
                ),
            };
            mesh.add_element(def)?;
            number += 1;
        }
    }
    Ok(mesh)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== plane-fem Example: Cantilever Plate ===\n");

    let material = Material::steel(0.1);
    let inertia = material.thickness * HEIGHT.powi(3) / 12.0;
    let plane_strain_modulus = material.young / (1.0 - material.poisson.powi(2));
    let beam_tip = LOAD * LENGTH.powi(3) / (3.0 * plane_strain_modulus * inertia);
    println!("Beam theory tip deflection: {:.6e}\n", beam_tip);

    for (kind, nx, ny) in [
        (ElementKind::Quad4, 20, 2),
        (ElementKind::Quad4, 40, 4),
        (ElementKind::Quad8, 10, 1),
        (ElementKind::Quad8, 20, 2),
    ] {
        let mesh = cantilever(nx, ny, kind)?;
        let result = mesh.analyze(&AnalysisOptions::default())?;

        let tip_nodes: Vec<f64> = mesh
            .nodes()
            .iter()
            .filter(|node| node.x == LENGTH)
            .filter_map(|node| result.node_displacement(node.number))
            .map(|d| d.dy)
            .collect();
        let tip = tip_nodes.iter().sum::<f64>() / tip_nodes.len() as f64;

        let summary = &result.summary;
        println!("{} {}x{} ({} DOFs):", kind, nx, ny, summary.total_dofs);
        println!("  Tip deflection: {:.6e} ({:.1}% of beam theory)", tip, 100.0 * tip / beam_tip);
        println!("  Max von Mises: {:.4e} at node {}", summary.max_von_mises, summary.max_von_mises_node);
        println!(
            "  Reactions: FX={:.3}, FY={:.3} (applied FY={:.3})",
            summary.total_reaction[0], summary.total_reaction[1], summary.total_load[1]
        );
        println!();
    }

    println!("=== Analysis Complete ===");
    Ok(())
}
