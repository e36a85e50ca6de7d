/// Moving a mesh's origin without moving the mesh
use std::ops::Neg;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{PivotError, PivotResult};
use crate::geometry::Mesh;
use crate::transform::Transform;

/// The new origin, expressed in the mesh's local space.
///
/// Consumed by the rebase functions, so an offset can only be applied once.
#[derive(Debug, PartialEq)]
pub struct RebaseOffset(Vector3<f32>);

impl RebaseOffset {
    pub fn new(offset: Vector3<f32>) -> Self {
        Self(offset)
    }

    /// Convert a world-space pivot into the local offset for a mesh placed
    /// by `transform`. A pivot that does not map to a finite local point
    /// is rejected.
    pub fn from_world_pivot(transform: &Transform, pivot: &Point3<f32>) -> PivotResult<Self> {
        let local = transform.inverse_transform_point(pivot)?;
        if !local.coords.iter().all(|c| c.is_finite()) {
            return Err(PivotError::degenerate_transform(format!(
                "pivot ({}, {}, {}) has no finite local position",
                pivot.x, pivot.y, pivot.z
            )));
        }
        Ok(Self(local.coords))
    }

    pub fn vector(&self) -> &Vector3<f32> {
        &self.0
    }
}

impl Neg for RebaseOffset {
    type Output = RebaseOffset;

    fn neg(self) -> Self::Output {
        RebaseOffset(-self.0)
    }
}

/// Return `vertices` shifted by `-offset`, leaving the input untouched.
pub fn rebase(vertices: &[Point3<f32>], offset: RebaseOffset) -> PivotResult<Vec<Point3<f32>>> {
    if vertices.is_empty() {
        return Err(PivotError::EmptyMesh);
    }
    Ok(vertices.iter().map(|v| v - offset.0).collect())
}

/// Shift `vertices` by `-offset` in place.
pub fn rebase_in_place(vertices: &mut [Point3<f32>], offset: RebaseOffset) -> PivotResult<()> {
    if vertices.is_empty() {
        return Err(PivotError::EmptyMesh);
    }
    for v in vertices.iter_mut() {
        *v -= offset.0;
    }
    Ok(())
}

impl Mesh {
    /// Copy of this mesh with its origin moved to `offset`.
    /// Normals and faces are carried over unchanged.
    pub fn rebased(&self, offset: RebaseOffset) -> PivotResult<Mesh> {
        debug!(vertices = self.vertex_count(), offset = ?offset.0, "rebasing copy");
        Ok(Mesh {
            positions: rebase(&self.positions, offset)?,
            normals: self.normals.clone(),
            faces: self.faces.clone(),
        })
    }

    /// Move this mesh's origin to `offset`, overwriting its positions.
    pub fn rebase_in_place(&mut self, offset: RebaseOffset) -> PivotResult<()> {
        debug!(vertices = self.vertex_count(), offset = ?offset.0, "rebasing in place");
        rebase_in_place(&mut self.positions, offset)
    }
}
