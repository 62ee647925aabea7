//! Engine data structures: placements, materials, lights, transforms and textures.
//!
//! - `material` holds the Phong coefficients looked up by tag
//! - `placement` describes scene objects and their resolved form
//! - `light` holds the static directional and point lights
//! - `transform` turns scale/rotation/position into a model matrix
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod light;
pub mod material;
pub mod placement;
pub mod texture;
pub mod transform;
