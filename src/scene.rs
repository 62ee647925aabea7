//! Scene description loaded from JSON.
//!
//! A [`SceneDescription`] lists everything the driver sets up once: textures,
//! materials, lights, the camera and the ordered object placements.
//! [`SceneDescription::still_life`] is the built-in desk scene.

use std::path::{Path, PathBuf};

use cgmath::{Deg, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{light::Light, material::Material, placement::ObjectPlacement},
    error::SceneError,
    resources::MAX_TEXTURE_SLOTS,
};

const STILL_LIFE: &str = include_str!("../assets/still_life.json");

/// Converts cgmath's OpenGL clip space (z in -1..1) to wgpu's (z in 0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// What initialization does with a placement whose tags do not resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTagPolicy {
    /// Abort initialization.
    #[default]
    Fail,
    /// Keep the placement and leave it out of every frame.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: [f32; 3],
    pub target: [f32; 3],
    #[serde(default = "y_up")]
    pub up: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

fn y_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 12.0],
            target: [0.0; 3],
            up: y_up(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from(self.position),
            Point3::from(self.target),
            Vector3::from(self.up),
        )
    }

    /// Perspective projection for a `width` x `height` target. A zero-sized
    /// target is treated as square.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(self.fov_degrees), aspect, self.near, self.far)
    }
}

/// A texture file and the tag objects refer to it by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureSource {
    pub tag: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Directory relative texture paths are resolved against.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "default_capacity")]
    pub texture_capacity: usize,
    #[serde(default)]
    pub missing_tags: MissingTagPolicy,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f64; 4],
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub textures: Vec<TextureSource>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_capacity() -> usize {
    MAX_TEXTURE_SLOTS
}

fn default_clear_color() -> [f64; 4] {
    [0.1, 0.2, 0.3, 1.0]
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            texture_capacity: default_capacity(),
            missing_tags: MissingTagPolicy::default(),
            clear_color: default_clear_color(),
            camera: Camera::default(),
            textures: Vec::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The desk still life: a three-tier spice rack, a cup, a pen, a book, a
    /// roll of tape and a chapstick on a floor plane.
    pub fn still_life() -> Result<Self, SceneError> {
        Self::from_json(STILL_LIFE)
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}
