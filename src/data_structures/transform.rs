//! Per-object transformation data.
//!
//! A [`Transform`] is what an object placement authors: a scale, three Euler
//! angles in degrees and a position. It is turned into the model matrix the
//! vertex shader consumes.

use cgmath::{Deg, Matrix4, Vector3};

/// Scale, Euler rotation (degrees, applied X then Y then Z) and translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn from_arrays(scale: [f32; 3], rotation_degrees: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation_degrees: rotation_degrees.into(),
            position: position.into(),
        }
    }

    /// Model matrix `T * Rz * Ry * Rx * S`.
    ///
    /// The order is fixed: a vertex is scaled first, then rotated about X, Y and
    /// Z in turn, then translated. Reordering changes the rendered output.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Deg(self.rotation_degrees.z))
            * Matrix4::from_angle_y(Deg(self.rotation_degrees.y))
            * Matrix4::from_angle_x(Deg(self.rotation_degrees.x))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
