#![allow(dead_code)]

use std::{
    cell::Cell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use still_life::{
    data_structures::placement::{ShapeKind, TextureSlot},
    error::SceneError,
    pipelines::{MeshLibrary, ShaderPipeline, TextureBackend},
    resources::decoder::{DecodedImage, ImageDecoder},
};

/// One call made against the backend, in the order it was made.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Mat4(String, Matrix4<f32>),
    Vec4(String, [f32; 4]),
    Vec3(String, [f32; 3]),
    Vec2(String, [f32; 2]),
    Float(String, f32),
    Bool(String, bool),
    Int(String, i32),
    Sampler(String, u32),
    CreateTexture(String),
    BindTexture(u32, u32),
    ReleaseTexture(u32),
    LoadMesh(ShapeKind),
    DrawMesh(ShapeKind),
}

impl Call {
    /// Uniform name for setter calls.
    pub fn uniform(&self) -> Option<&str> {
        match self {
            Call::Mat4(name, _)
            | Call::Vec4(name, _)
            | Call::Vec3(name, _)
            | Call::Vec2(name, _)
            | Call::Float(name, _)
            | Call::Bool(name, _)
            | Call::Int(name, _)
            | Call::Sampler(name, _) => Some(name),
            _ => None,
        }
    }
}

/// A backend that records every call instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    next_handle: u32,
    pub live: HashSet<u32>,
    pub slots: HashMap<u32, u32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn draws(&self) -> Vec<ShapeKind> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawMesh(shape) => Some(*shape),
                _ => None,
            })
            .collect()
    }

    pub fn uniform_names(&self) -> Vec<&str> {
        self.calls.iter().filter_map(Call::uniform).collect()
    }

    /// The last call that set `name`.
    pub fn last(&self, name: &str) -> Option<&Call> {
        self.calls.iter().rev().find(|call| call.uniform() == Some(name))
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl ShaderPipeline for RecordingBackend {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.calls.push(Call::Mat4(name.to_string(), value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.calls.push(Call::Vec4(name.to_string(), value.into()));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.calls.push(Call::Vec3(name.to_string(), value.into()));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.calls.push(Call::Vec2(name.to_string(), value.into()));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.calls.push(Call::Float(name.to_string(), value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.calls.push(Call::Bool(name.to_string(), value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.calls.push(Call::Int(name.to_string(), value));
    }

    fn set_sampler(&mut self, name: &str, slot: TextureSlot) {
        self.calls.push(Call::Sampler(name.to_string(), slot.0));
    }
}

impl TextureBackend for RecordingBackend {
    type Handle = u32;

    fn create_texture(
        &mut self,
        label: &str,
        _image: &DecodedImage,
    ) -> Result<u32, SceneError> {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle);
        self.calls.push(Call::CreateTexture(label.to_string()));
        Ok(handle)
    }

    fn bind_texture(&mut self, slot: TextureSlot, handle: &u32) {
        self.slots.insert(slot.0, *handle);
        self.calls.push(Call::BindTexture(slot.0, *handle));
    }

    fn release_texture(&mut self, handle: u32) {
        assert!(self.live.remove(&handle), "texture {handle} released twice");
        self.calls.push(Call::ReleaseTexture(handle));
    }
}

impl MeshLibrary for RecordingBackend {
    fn load_mesh(&mut self, shape: ShapeKind) {
        self.calls.push(Call::LoadMesh(shape));
    }

    fn draw_mesh(&mut self, shape: ShapeKind) {
        self.calls.push(Call::DrawMesh(shape));
    }
}

pub fn solid_image(width: u32, height: u32, channels: u8) -> DecodedImage {
    DecodedImage {
        pixels: vec![200; (width * height) as usize * channels as usize],
        width,
        height,
        channels,
    }
}

/// A decoder serving in-memory images by path.
#[derive(Debug, Default)]
pub struct StubDecoder {
    images: HashMap<PathBuf, DecodedImage>,
    fallback: Option<DecodedImage>,
    decodes: Cell<usize>,
}

impl StubDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a 2x2 RGB image for every path.
    pub fn accepting_all() -> Self {
        Self {
            fallback: Some(solid_image(2, 2, 3)),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, path: &str, image: DecodedImage) -> Self {
        self.images.insert(PathBuf::from(path), image);
        self
    }

    pub fn with_rgb(self, path: &str) -> Self {
        self.with_image(path, solid_image(4, 4, 3))
    }

    pub fn decodes(&self) -> usize {
        self.decodes.get()
    }
}

impl ImageDecoder for StubDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, SceneError> {
        self.decodes.set(self.decodes.get() + 1);
        self.images
            .get(path)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| SceneError::ImageLoadFailure {
                path: path.to_path_buf(),
                reason: "no such file".to_string(),
            })
    }
}
