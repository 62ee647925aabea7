//! Surface materials used by the lighting shader.

use serde::{Deserialize, Serialize};

/// Phong-style material coefficients looked up by tag at draw time.
///
/// Materials are registered once and never mutated afterwards. Tags are not
/// required to be unique; lookups return the first registered match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub tag: String,
    #[serde(default = "default_ambient_color")]
    pub ambient_color: [f32; 3],
    #[serde(default)]
    pub ambient_strength: f32,
    pub diffuse_color: [f32; 3],
    #[serde(default)]
    pub specular_color: [f32; 3],
    pub shininess: f32,
}

fn default_ambient_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Material {
    /// A material with the given diffuse colour and shininess and no specular or
    /// ambient contribution.
    pub fn new(tag: impl Into<String>, diffuse_color: [f32; 3], shininess: f32) -> Self {
        Self {
            tag: tag.into(),
            ambient_color: default_ambient_color(),
            ambient_strength: 0.0,
            diffuse_color,
            specular_color: [0.0; 3],
            shininess,
        }
    }

    pub fn with_ambient(mut self, color: [f32; 3], strength: f32) -> Self {
        self.ambient_color = color;
        self.ambient_strength = strength;
        self
    }

    pub fn with_specular(mut self, color: [f32; 3]) -> Self {
        self.specular_color = color;
        self
    }
}

/// Handle to a registered material, valid for the registry that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    pub fn index(&self) -> usize {
        self.0
    }
}
