/// Pivot candidates derived from a mesh's vertices in world space
use std::fmt;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{PivotError, PivotResult};
use crate::params::{CenterStrategy, PivotParams};
use crate::transform::Transform;

/// A world-space coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes spanning the plane perpendicular to this one
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// A set of axes, used to say which components of a candidate apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct AxisSet(u8);

impl AxisSet {
    pub const NONE: AxisSet = AxisSet(0);
    pub const ALL: AxisSet = AxisSet(0b111);

    pub fn of(axes: &[Axis]) -> Self {
        axes.iter().fold(Self::NONE, |set, &axis| set.with(axis))
    }

    /// Axes perpendicular to `up`
    pub fn horizontal(up: Axis) -> Self {
        Self::of(&up.others())
    }

    /// Only `up` itself
    pub fn vertical(up: Axis) -> Self {
        Self::from(up)
    }

    #[must_use]
    pub fn with(self, axis: Axis) -> Self {
        AxisSet(self.0 | (1 << axis.index()))
    }

    pub fn contains(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |&axis| self.contains(axis))
    }
}

impl From<Axis> for AxisSet {
    fn from(axis: Axis) -> Self {
        AxisSet::NONE.with(axis)
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, axis) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{axis}")?;
        }
        f.write_str("}")
    }
}

/// A world-space pivot proposal.
///
/// `point` is fully populated, but only the components named by `axes`
/// are meant to replace the working pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotCandidate {
    pub point: Point3<f32>,
    pub axes: AxisSet,
}

impl PivotCandidate {
    /// Overwrite the selected components of `pivot` with this candidate's
    pub fn apply_to(&self, pivot: &mut Point3<f32>) {
        for axis in self.axes.iter() {
            pivot[axis.index()] = self.point[axis.index()];
        }
    }

    /// Component along `axis`
    pub fn get(&self, axis: Axis) -> f32 {
        self.point[axis.index()]
    }
}

/// Which end of the up axis to snap to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Top,
    Bottom,
}

/// A pivot edit the user can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotOp {
    CenterHorizontal,
    CenterVertical,
    Top,
    Bottom,
}

/// World-space axis-aligned bounds of a transformed vertex set.
///
/// The `*_index` arrays record, per axis, which vertex supplied the
/// extreme; ties go to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
    pub min_index: [usize; 3],
    pub max_index: [usize; 3],
}

impl WorldBounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Compute world-space bounds in a single pass.
pub fn world_bounds(vertices: &[Point3<f32>], transform: &Transform) -> PivotResult<WorldBounds> {
    let (first, rest) = vertices.split_first().ok_or(PivotError::EmptyMesh)?;
    let first = transform.transform_point(first);

    let mut bounds = WorldBounds {
        min: first,
        max: first,
        min_index: [0; 3],
        max_index: [0; 3],
    };

    for (i, vertex) in rest.iter().enumerate() {
        let world = transform.transform_point(vertex);
        for a in 0..3 {
            // strict comparisons keep the first vertex on ties
            if world[a] < bounds.min[a] {
                bounds.min[a] = world[a];
                bounds.min_index[a] = i + 1;
            }
            if world[a] > bounds.max[a] {
                bounds.max[a] = world[a];
                bounds.max_index[a] = i + 1;
            }
        }
    }

    Ok(bounds)
}

/// Midpoint of the extreme vertices along each requested axis.
pub fn center_by_bounds(
    vertices: &[Point3<f32>],
    transform: &Transform,
    axes: AxisSet,
) -> PivotResult<PivotCandidate> {
    let bounds = world_bounds(vertices, transform)?;
    Ok(PivotCandidate {
        point: bounds.center(),
        axes,
    })
}

/// Arithmetic mean of the transformed vertices.
///
/// Every vertex counts equally; this is not an area- or mass-weighted
/// centroid.
pub fn center_by_average(
    vertices: &[Point3<f32>],
    transform: &Transform,
    axes: AxisSet,
) -> PivotResult<PivotCandidate> {
    if vertices.is_empty() {
        return Err(PivotError::EmptyMesh);
    }

    let sum = vertices
        .iter()
        .map(|v| transform.transform_point(v).coords)
        .fold(Vector3::zeros(), |acc, w| acc + w);

    Ok(PivotCandidate {
        point: Point3::from(sum / vertices.len() as f32),
        axes,
    })
}

/// The transformed vertex lying furthest along (`Top`) or against
/// (`Bottom`) the `up` axis. Only the `up` component is applicable.
pub fn extreme_along(
    vertices: &[Point3<f32>],
    transform: &Transform,
    extreme: Extreme,
    up: Axis,
) -> PivotResult<PivotCandidate> {
    let (first, rest) = vertices.split_first().ok_or(PivotError::EmptyMesh)?;
    let a = up.index();

    let mut best = transform.transform_point(first);
    for vertex in rest {
        let world = transform.transform_point(vertex);
        let better = match extreme {
            Extreme::Top => world[a] > best[a],
            Extreme::Bottom => world[a] < best[a],
        };
        if better {
            best = world;
        }
    }

    Ok(PivotCandidate {
        point: best,
        axes: AxisSet::vertical(up),
    })
}

/// Run `op` with the strategy and up axis from `params`.
pub fn estimate(
    vertices: &[Point3<f32>],
    transform: &Transform,
    op: PivotOp,
    params: &PivotParams,
) -> PivotResult<PivotCandidate> {
    let up = params.up;
    let centered = |axes| match params.center {
        CenterStrategy::Bounds => center_by_bounds(vertices, transform, axes),
        CenterStrategy::Average => center_by_average(vertices, transform, axes),
    };

    let candidate = match op {
        PivotOp::CenterHorizontal => centered(AxisSet::horizontal(up))?,
        PivotOp::CenterVertical => centered(AxisSet::vertical(up))?,
        PivotOp::Top => extreme_along(vertices, transform, Extreme::Top, up)?,
        PivotOp::Bottom => extreme_along(vertices, transform, Extreme::Bottom, up)?,
    };

    debug!(
        ?op,
        strategy = ?params.center,
        axes = %candidate.axes,
        x = candidate.point.x,
        y = candidate.point.y,
        z = candidate.point.z,
        "estimated pivot"
    );
    Ok(candidate)
}
