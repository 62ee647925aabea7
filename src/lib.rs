//! still-life
//!
//! Renders a fixed desk still life built entirely out of primitive meshes:
//! planes, boxes, spheres, cylinders, cones and tapered cylinders, each placed
//! with its own transform, material and texture.
//!
//! High-level modules
//! - `backend`: the wgpu implementation of the render collaborator traits
//! - `context`: window, surface and device setup
//! - `data_structures`: materials, placements, lights, transforms and GPU textures
//! - `driver`: scene initialization and the per-frame draw loop
//! - `error`: typed errors for setup and tag resolution
//! - `flow`: the winit event loop
//! - `pipelines`: collaborator traits, uniform names and the wgpu pipeline
//! - `render`: the per-object binding protocol
//! - `resources`: the texture/material registry, image decoding and mesh generation
//! - `scene`: the JSON scene description and the built-in still life
//!

pub mod backend;
pub mod context;
pub mod data_structures;
pub mod driver;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use driver::SceneDriver;
pub use error::{ResolveError, SceneError};
pub use render::FrameReport;
pub use scene::SceneDescription;
