/// Local-to-world transforms and Euler rotation state
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

use crate::error::{PivotError, PivotResult};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Convert to a quaternion, applying rotations in order Z, Y, X
    pub fn to_quaternion(&self) -> UnitQuaternion<f32> {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.x);
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.y);
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.z);

        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Affine mapping from a mesh's local space into world space.
///
/// Applied in the order scale -> rotate -> translate. Scale may be
/// non-uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    pub fn from_euler(rotation: &RotationState) -> Self {
        Self {
            rotation: rotation.to_quaternion(),
            ..Self::identity()
        }
    }

    #[must_use]
    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: &RotationState) -> Self {
        self.rotation = rotation.to_quaternion();
        self
    }

    #[must_use]
    pub fn with_scale(mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.scale = Vector3::new(sx, sy, sz);
        self
    }

    /// Map a local-space point into world space
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let scaled = point.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.translation)
    }

    /// Map a world-space point back into local space.
    ///
    /// Fails when a scale component is zero or non-finite, or when the
    /// rotation or translation is non-finite.
    pub fn inverse_transform_point(&self, point: &Point3<f32>) -> PivotResult<Point3<f32>> {
        self.check_invertible()?;
        let unrotated = self.rotation.inverse() * (point.coords - self.translation);
        Ok(Point3::from(unrotated.component_div(&self.scale)))
    }

    pub fn is_invertible(&self) -> bool {
        self.check_invertible().is_ok()
    }

    fn check_invertible(&self) -> PivotResult<()> {
        for (axis, s) in ["x", "y", "z"].iter().zip(self.scale.iter()) {
            if !s.is_finite() || s.abs() < f32::EPSILON {
                return Err(PivotError::degenerate_transform(format!(
                    "scale on {axis} is {s}"
                )));
            }
        }
        if !self.rotation.coords.iter().all(|c| c.is_finite()) {
            return Err(PivotError::degenerate_transform("non-finite rotation"));
        }
        if !self.translation.iter().all(|t| t.is_finite()) {
            return Err(PivotError::degenerate_transform("non-finite translation"));
        }
        Ok(())
    }

    /// Homogeneous 4x4 matrix: translation * rotation * scale
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Self::translation_matrix(self.translation.x, self.translation.y, self.translation.z)
            * self.rotation.to_homogeneous()
            * Self::scale_matrix(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }
}
