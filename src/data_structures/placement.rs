//! Object placements: what is drawn, where, and with which resources.

use cgmath::Matrix4;
use serde::{Deserialize, Serialize};

use crate::data_structures::{material::MaterialId, transform::Transform};

/// The primitive meshes the scene is composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    TaperedCylinder,
    Plane,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Plane,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Sphere,
        ShapeKind::Box,
        ShapeKind::TaperedCylinder,
    ];
}

/// Binding index of a registered texture in the pipeline's sampler array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureSlot(pub u32);

impl TextureSlot {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One authored scene object, as it appears in a scene description.
///
/// Material and texture are referenced by tag and resolved against the
/// resource registry before anything is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub shape: ShapeKind,
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Euler angles in degrees, applied X, then Y, then Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub position: [f32; 3],
    pub material: String,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "enabled")]
    pub use_texture: bool,
    /// Flat colour used when texturing is disabled.
    #[serde(default = "opaque_white")]
    pub color: [f32; 4],
    #[serde(default = "unit_uv")]
    pub uv_scale: [f32; 2],
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn enabled() -> bool {
    true
}

fn opaque_white() -> [f32; 4] {
    [1.0; 4]
}

fn unit_uv() -> [f32; 2] {
    [1.0; 2]
}

impl ObjectPlacement {
    /// A textured placement with identity transform.
    pub fn textured(shape: ShapeKind, material: &str, texture: &str) -> Self {
        Self {
            texture: Some(texture.to_string()),
            use_texture: true,
            ..Self::solid(shape, material, opaque_white())
        }
    }

    /// A flat-coloured placement with identity transform.
    pub fn solid(shape: ShapeKind, material: &str, color: [f32; 4]) -> Self {
        Self {
            shape,
            scale: unit_scale(),
            rotation: [0.0; 3],
            position: [0.0; 3],
            material: material.to_string(),
            texture: None,
            use_texture: false,
            color,
            uv_scale: unit_uv(),
        }
    }

    pub fn with_transform(mut self, scale: [f32; 3], rotation: [f32; 3], position: [f32; 3]) -> Self {
        self.scale = scale;
        self.rotation = rotation;
        self.position = position;
        self
    }

    pub fn with_texturing(mut self, use_texture: bool) -> Self {
        self.use_texture = use_texture;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::from_arrays(self.scale, self.rotation, self.position)
    }
}

/// A placement whose tags have been turned into registry handles.
///
/// Built once while the scene is initialized so that drawing needs no string
/// lookups and cannot miss.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPlacement {
    pub shape: ShapeKind,
    pub model: Matrix4<f32>,
    pub material: MaterialId,
    /// `Some` selects the texture path, `None` the flat colour path.
    pub texture: Option<TextureSlot>,
    pub color: [f32; 4],
    pub uv_scale: [f32; 2],
}
