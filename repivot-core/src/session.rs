/// Interactive pivot editing session
///
/// Holds the selected mesh, its placement and the working pivot while a
/// host drives the edit. The estimator and rebaser stay stateless; this
/// type only sequences them.
use nalgebra::Point3;
use tracing::{info, warn};

use crate::error::{PivotError, PivotResult};
use crate::geometry::Mesh;
use crate::params::PivotParams;
use crate::pivot::{estimate, PivotCandidate, PivotOp};
use crate::rebase::RebaseOffset;
use crate::transform::Transform;

/// Whether a pivot edit is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Editing,
}

/// A mesh together with its local-to-world placement
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mesh: Mesh,
    pub transform: Transform,
}

/// Editing session state.
///
/// `Idle -> Editing -> (save | abort) -> Idle`. Saving rebases the mesh
/// exactly once; aborting never touches it.
#[derive(Debug)]
pub struct PivotSession {
    selection: Option<Selection>,
    working_pivot: Point3<f32>,
    mode: SessionMode,
    params: PivotParams,
}

impl Default for PivotSession {
    fn default() -> Self {
        Self::new(PivotParams::default())
    }
}

impl PivotSession {
    pub fn new(params: PivotParams) -> Self {
        Self {
            selection: None,
            working_pivot: Point3::origin(),
            mode: SessionMode::Idle,
            params,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn params(&self) -> &PivotParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut PivotParams {
        &mut self.params
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Select a mesh to edit. Ignored while an edit is in progress;
    /// returns whether the selection was taken.
    pub fn select(&mut self, mesh: Mesh, transform: Transform) -> bool {
        if self.mode == SessionMode::Editing {
            warn!("selection change ignored while editing");
            return false;
        }
        self.selection = Some(Selection { mesh, transform });
        true
    }

    /// Drop the selection. Ignored while editing.
    pub fn clear_selection(&mut self) -> bool {
        if self.mode == SessionMode::Editing {
            warn!("selection change ignored while editing");
            return false;
        }
        self.selection = None;
        true
    }

    /// Start editing the selected mesh. The working pivot starts at the
    /// mesh's current origin.
    pub fn begin_edit(&mut self) -> PivotResult<()> {
        let selection = self.selection.as_ref().ok_or(PivotError::NoSelection)?;
        if selection.mesh.is_empty() {
            return Err(PivotError::EmptyMesh);
        }

        self.working_pivot = selection.transform.transform_point(&Point3::origin());
        self.mode = SessionMode::Editing;
        info!(
            vertices = selection.mesh.vertex_count(),
            "pivot edit started"
        );
        Ok(())
    }

    /// Current working pivot in world space
    pub fn pivot(&self) -> PivotResult<Point3<f32>> {
        self.editing()?;
        Ok(self.working_pivot)
    }

    /// Move the working pivot directly, as a host-side handle would.
    pub fn set_pivot(&mut self, pivot: Point3<f32>) -> PivotResult<()> {
        self.editing()?;
        self.working_pivot = pivot;
        Ok(())
    }

    /// Estimate a candidate for `op` and merge it into the working pivot.
    pub fn apply(&mut self, op: PivotOp) -> PivotResult<PivotCandidate> {
        let selection = self.editing()?;
        let candidate = estimate(
            &selection.mesh.positions,
            &selection.transform,
            op,
            &self.params,
        )?;
        candidate.apply_to(&mut self.working_pivot);
        Ok(candidate)
    }

    pub fn center_horizontal(&mut self) -> PivotResult<PivotCandidate> {
        self.apply(PivotOp::CenterHorizontal)
    }

    pub fn center_vertical(&mut self) -> PivotResult<PivotCandidate> {
        self.apply(PivotOp::CenterVertical)
    }

    pub fn snap_top(&mut self) -> PivotResult<PivotCandidate> {
        self.apply(PivotOp::Top)
    }

    pub fn snap_bottom(&mut self) -> PivotResult<PivotCandidate> {
        self.apply(PivotOp::Bottom)
    }

    /// Bake the working pivot into a new mesh. The selected mesh is left
    /// as it was; on success the session returns to idle and forgets it.
    pub fn save_as_new(&mut self) -> PivotResult<Mesh> {
        let selection = self.editing()?;
        let offset = RebaseOffset::from_world_pivot(&selection.transform, &self.working_pivot)?;
        let rebased = selection.mesh.rebased(offset)?;

        info!(vertices = rebased.vertex_count(), "pivot saved as new mesh");
        self.reset();
        Ok(rebased)
    }

    /// Bake the working pivot into the selected mesh itself and hand it
    /// back. On failure the session stays in the edit.
    pub fn save_overwrite(&mut self) -> PivotResult<Mesh> {
        let selection = self.editing()?;
        let offset = RebaseOffset::from_world_pivot(&selection.transform, &self.working_pivot)?;

        let mut selection = self.selection.take().ok_or(PivotError::NoSelection)?;
        if let Err(err) = selection.mesh.rebase_in_place(offset) {
            self.selection = Some(selection);
            return Err(err);
        }

        info!(
            vertices = selection.mesh.vertex_count(),
            "pivot saved over selected mesh"
        );
        self.reset();
        Ok(selection.mesh)
    }

    /// Leave the edit without touching the mesh.
    ///
    /// Deliberately does not [`reset`](Self::reset): the selection is kept,
    /// so a new edit can start on the same mesh without selecting it again.
    pub fn abort(&mut self) {
        if self.mode == SessionMode::Editing {
            info!("pivot edit aborted");
        }
        self.mode = SessionMode::Idle;
        self.working_pivot = Point3::origin();
    }

    /// Return to idle with nothing selected.
    pub fn reset(&mut self) {
        self.mode = SessionMode::Idle;
        self.selection = None;
        self.working_pivot = Point3::origin();
    }

    fn editing(&self) -> PivotResult<&Selection> {
        if self.mode != SessionMode::Editing {
            return Err(PivotError::NotEditing);
        }
        self.selection.as_ref().ok_or(PivotError::NoSelection)
    }
}
