/// repivot Web - WASM bindings for browser-side pivot editing
///
/// Positions cross the boundary as flat `[x0, y0, z0, x1, ...]` arrays.
/// The browser owns rendering and the draggable handle; this crate only
/// keeps the session and does the math.
use nalgebra::Point3;
use repivot_core::{
    CenterStrategy, Mesh, PivotOp, PivotParams, PivotSession, RotationState, SessionMode,
    Transform,
};
use wasm_bindgen::prelude::*;

fn vec3(values: &[f32], what: &str) -> Result<[f32; 3], String> {
    match *values {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(format!("{what} needs 3 components, got {}", values.len())),
    }
}

fn points(flat: &[f32]) -> Result<Vec<Point3<f32>>, String> {
    if flat.len() % 3 != 0 {
        return Err(format!(
            "positions length {} is not a multiple of 3",
            flat.len()
        ));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn flatten(points: &[Point3<f32>]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Pivot editing session for one mesh
#[wasm_bindgen]
pub struct PivotEditor {
    session: PivotSession,
}

impl PivotEditor {
    /// Build an editor for `positions` placed by translation, XYZ Euler
    /// rotation (radians) and scale.
    pub fn try_new(
        positions: &[f32],
        translation: &[f32],
        rotation: &[f32],
        scale: &[f32],
    ) -> Result<PivotEditor, String> {
        let [tx, ty, tz] = vec3(translation, "translation")?;
        let [rx, ry, rz] = vec3(rotation, "rotation")?;
        let [sx, sy, sz] = vec3(scale, "scale")?;
        let transform = Transform::identity()
            .with_translation(tx, ty, tz)
            .with_rotation(&RotationState::new(rx, ry, rz))
            .with_scale(sx, sy, sz);

        let mut session = PivotSession::new(PivotParams::default());
        session.select(Mesh::from_positions(points(positions)?), transform);
        Ok(PivotEditor { session })
    }

    pub fn run(&mut self, op: PivotOp) -> Result<Vec<f32>, String> {
        self.session.apply(op).map_err(|e| e.to_string())?;
        self.current_pivot()
    }

    pub fn current_pivot(&self) -> Result<Vec<f32>, String> {
        let p = self.session.pivot().map_err(|e| e.to_string())?;
        Ok(vec![p.x, p.y, p.z])
    }

    /// Rebase a copy of the positions onto the working pivot
    pub fn save_positions(&mut self) -> Result<Vec<f32>, String> {
        let mesh = self.session.save_as_new().map_err(|e| e.to_string())?;
        Ok(flatten(&mesh.positions))
    }
}

#[wasm_bindgen]
impl PivotEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(
        positions: &[f32],
        translation: &[f32],
        rotation: &[f32],
        scale: &[f32],
    ) -> Result<PivotEditor, JsValue> {
        Self::try_new(positions, translation, rotation, scale).map_err(|e| JsValue::from_str(&e))
    }

    /// Enter edit mode; the pivot starts at the object's origin
    pub fn begin_edit(&mut self) -> Result<(), JsValue> {
        self.session
            .begin_edit()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn is_editing(&self) -> bool {
        self.session.mode() == SessionMode::Editing
    }

    /// Toggle between vertex-mean and bounding-box centering
    pub fn set_average(&mut self, average: bool) {
        self.session.params_mut().center = if average {
            CenterStrategy::Average
        } else {
            CenterStrategy::Bounds
        };
    }

    pub fn center_horizontal(&mut self) -> Result<Vec<f32>, JsValue> {
        self.run(PivotOp::CenterHorizontal).map_err(|e| JsValue::from_str(&e))
    }

    pub fn center_vertical(&mut self) -> Result<Vec<f32>, JsValue> {
        self.run(PivotOp::CenterVertical).map_err(|e| JsValue::from_str(&e))
    }

    pub fn top(&mut self) -> Result<Vec<f32>, JsValue> {
        self.run(PivotOp::Top).map_err(|e| JsValue::from_str(&e))
    }

    pub fn bottom(&mut self) -> Result<Vec<f32>, JsValue> {
        self.run(PivotOp::Bottom).map_err(|e| JsValue::from_str(&e))
    }

    /// Working pivot in world space as `[x, y, z]`
    pub fn pivot(&self) -> Result<Vec<f32>, JsValue> {
        self.current_pivot().map_err(|e| JsValue::from_str(&e))
    }

    /// Move the pivot to where the user dragged the handle
    pub fn set_pivot(&mut self, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        self.session
            .set_pivot(Point3::new(x, y, z))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Finish the edit and return the rebased positions
    pub fn save(&mut self) -> Result<Vec<f32>, JsValue> {
        self.save_positions().map_err(|e| JsValue::from_str(&e))
    }

    /// Leave the edit without changing anything
    pub fn abort(&mut self) {
        self.session.abort();
    }
}
