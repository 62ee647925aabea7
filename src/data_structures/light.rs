//! Static scene lights.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Directional,
    Point,
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightKind::Directional => f.write_str("directional"),
            LightKind::Point => f.write_str("point"),
        }
    }
}

/// A light configured once during scene setup.
///
/// `vector` is the direction for directional lights and the world position for
/// point lights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub vector: [f32; 3],
    #[serde(default)]
    pub ambient: [f32; 3],
    #[serde(default)]
    pub diffuse: [f32; 3],
    #[serde(default)]
    pub specular: [f32; 3],
    #[serde(default = "active")]
    pub active: bool,
}

fn active() -> bool {
    true
}

impl Light {
    pub fn directional(direction: [f32; 3]) -> Self {
        Self::new(LightKind::Directional, direction)
    }

    pub fn point(position: [f32; 3]) -> Self {
        Self::new(LightKind::Point, position)
    }

    fn new(kind: LightKind, vector: [f32; 3]) -> Self {
        Self {
            kind,
            vector,
            ambient: [0.0; 3],
            diffuse: [1.0; 3],
            specular: [1.0; 3],
            active: true,
        }
    }

    pub fn with_colors(mut self, ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }
}
