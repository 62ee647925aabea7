//! Render pipeline seams and the wgpu pipeline definitions behind them.
//!
//! The scene code never talks to wgpu directly. It programs per-draw state
//! through three collaborator traits:
//!
//! - [`ShaderPipeline`] sets shader uniforms keyed by name
//! - [`TextureBackend`] uploads, binds and releases textures
//! - [`MeshLibrary`] builds and draws the primitive shapes
//!
//! [`crate::backend::WgpuBackend`] implements all three on the GPU; tests use a
//! recording implementation instead.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::{
    data_structures::placement::{ShapeKind, TextureSlot},
    error::SceneError,
    resources::decoder::DecodedImage,
};

pub mod basic;
pub mod light;

/// Uniform names understood by the scene shader.
pub mod uniform {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const VIEW_POSITION: &str = "viewPosition";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";
    pub const DIRECTIONAL_LIGHT: &str = "directionalLight";
    pub const POINT_LIGHTS: &str = "pointLights";
}

/// Uniform sink of the active shader program.
///
/// Values persist until overwritten, so every draw must set everything it
/// depends on.
pub trait ShaderPipeline {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);
    /// Point a sampler uniform at a texture slot.
    fn set_sampler(&mut self, name: &str, slot: TextureSlot);
}

pub trait TextureBackend {
    type Handle;

    /// Upload RGB or RGBA pixels with repeat wrapping, linear filtering and mipmaps.
    fn create_texture(
        &mut self,
        label: &str,
        image: &DecodedImage,
    ) -> Result<Self::Handle, SceneError>;
    /// Make `handle` the texture sampled through `slot`.
    fn bind_texture(&mut self, slot: TextureSlot, handle: &Self::Handle);
    fn release_texture(&mut self, handle: Self::Handle);
}

pub trait MeshLibrary {
    /// Build the drawable geometry for `shape`. Called once per shape.
    fn load_mesh(&mut self, shape: ShapeKind);
    /// Submit `shape` with the currently set uniforms.
    fn draw_mesh(&mut self, shape: ShapeKind);
}

/// Everything the scene driver needs from a backend.
pub trait RenderBackend: ShaderPipeline + TextureBackend + MeshLibrary {}

impl<T: ShaderPipeline + TextureBackend + MeshLibrary> RenderBackend for T {}
