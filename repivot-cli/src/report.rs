/// Plain-text mesh and pivot summary for the info command
use std::fmt::Write;

use anyhow::Result;
use repivot_core::{estimate, world_bounds, Mesh, PivotOp, PivotParams, Point3, Transform};

const OPS: [(PivotOp, &str); 4] = [
    (PivotOp::CenterHorizontal, "center-hor"),
    (PivotOp::CenterVertical, "center-ver"),
    (PivotOp::Top, "top"),
    (PivotOp::Bottom, "bottom"),
];

fn fmt_point(p: &Point3<f32>) -> String {
    format!("({:.4}, {:.4}, {:.4})", p.x, p.y, p.z)
}

/// Describe `mesh` as placed by `transform`, with every pivot candidate.
pub fn summary(mesh: &Mesh, transform: &Transform, params: &PivotParams) -> Result<String> {
    let bounds = world_bounds(&mesh.positions, transform)?;
    let mut out = String::new();

    writeln!(out, "vertices: {}", mesh.vertex_count())?;
    writeln!(out, "faces:    {}", mesh.faces.len())?;
    writeln!(out, "origin:   {}", fmt_point(&transform.transform_point(&Point3::origin())))?;
    writeln!(out, "bounds:   {} .. {}", fmt_point(&bounds.min), fmt_point(&bounds.max))?;
    writeln!(out, "center:   {:?} (up = {})", params.center, params.up)?;

    for (op, name) in OPS {
        let candidate = estimate(&mesh.positions, transform, op, params)?;
        let values: Vec<String> = candidate
            .axes
            .iter()
            .map(|axis| format!("{axis}={:.4}", candidate.get(axis)))
            .collect();
        writeln!(out, "  {name:<11}{}", values.join(" "))?;
    }

    Ok(out)
}
