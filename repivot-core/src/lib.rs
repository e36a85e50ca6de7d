//! repivot core library - pivot estimation and vertex rebasing
//!
//! Stateless geometry for moving a mesh's origin: candidate pivots are
//! computed from the vertices in world space, then the chosen pivot is
//! baked into the mesh by shifting every vertex in local space. The
//! session type sequences those calls for an interactive host.
//!
//! # Example
//!
//! ```
//! use repivot_core::{Mesh, PivotParams, PivotSession, Transform};
//!
//! let mut session = PivotSession::new(PivotParams::default());
//! session.select(Mesh::cube(2.0), Transform::from_translation(0.0, 3.0, 0.0));
//! session.begin_edit()?;
//! session.center_horizontal()?;
//! session.snap_bottom()?;
//!
//! let mesh = session.save_as_new()?;
//! assert!(mesh.positions.iter().all(|p| p.y >= 0.0));
//! # Ok::<(), repivot_core::PivotError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod geometry;
pub mod params;
pub mod pivot;
pub mod rebase;
pub mod session;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use error::{PivotError, PivotResult, StlError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use params::{CenterStrategy, PivotParams};
pub use pivot::{
    center_by_average, center_by_bounds, estimate, extreme_along, world_bounds, Axis, AxisSet,
    Extreme, PivotCandidate, PivotOp, WorldBounds,
};
pub use rebase::{rebase, rebase_in_place, RebaseOffset};
pub use session::{PivotSession, Selection, SessionMode};
pub use transform::{RotationState, Transform};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
