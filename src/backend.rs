//! The wgpu implementation of the render collaborator traits.
//!
//! [`WgpuBackend`] keeps a CPU copy of every uniform the scene shader reads.
//! Setters write into that copy; [`MeshLibrary::draw_mesh`] snapshots the
//! per-object part of it together with the shape to draw. [`WgpuBackend::render`]
//! later replays the snapshots in one render pass, each bound through a dynamic
//! offset into a shared uniform buffer.

use std::collections::HashMap;

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        placement::{ShapeKind, TextureSlot},
        texture::{self, Texture},
    },
    error::SceneError,
    pipelines::{
        MeshLibrary, ShaderPipeline, TextureBackend,
        basic::{self, FrameUniform, ObjectUniform},
        light::{LightUniform, MAX_POINT_LIGHTS},
        uniform,
    },
    resources::{MAX_TEXTURE_SLOTS, decoder::DecodedImage, mesh::MeshData},
};

/// Texture handle issued by [`WgpuBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

#[derive(Debug)]
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, shape: ShapeKind, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", shape)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", shape)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }
}

#[derive(Debug)]
struct DrawCommand {
    shape: ShapeKind,
    object: ObjectUniform,
}

/// Uniform buffer holding one [`ObjectUniform`] per draw at `stride` spacing.
#[derive(Debug)]
struct ObjectBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

#[derive(Debug)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,

    frame: FrameUniform,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    object: ObjectUniform,
    object_layout: wgpu::BindGroupLayout,
    object_stride: u64,
    object_buffer: Option<ObjectBuffer>,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    placeholder: Texture,
    textures: HashMap<TextureHandle, Texture>,
    next_texture: u32,
    slots: [Option<TextureHandle>; MAX_TEXTURE_SLOTS],
    // rebuilt lazily after any slot or texture change
    texture_bind_group: Option<wgpu::BindGroup>,

    meshes: HashMap<ShapeKind, GpuMesh>,
    draws: Vec<DrawCommand>,
}

impl WgpuBackend {
    /// Create the scene pipeline for targets of `color_format`.
    ///
    /// `device` and `queue` are cheap handles; the caller keeps its own copies.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        let frame_layout = basic::frame_layout(device);
        let object_layout = basic::object_layout(device);
        let texture_layout = basic::texture_slots_layout(device);
        let pipeline = basic::mk_scene_pipeline(
            device,
            color_format,
            &frame_layout,
            &object_layout,
            &texture_layout,
        );

        let frame = FrameUniform::new();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Buffer"),
            contents: bytemuck::cast_slice(&[frame]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let object_stride =
            wgpu::util::align_to(std::mem::size_of::<ObjectUniform>() as u64, alignment);

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            frame,
            frame_buffer,
            frame_bind_group,
            object: ObjectUniform::new(),
            object_layout,
            object_stride,
            object_buffer: None,
            sampler: texture::create_default_sampler(device),
            placeholder: Texture::create_placeholder(device, queue),
            texture_layout,
            textures: HashMap::new(),
            next_texture: 0,
            slots: [None; MAX_TEXTURE_SLOTS],
            texture_bind_group: None,
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Number of draws recorded since the last [`WgpuBackend::render`].
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Clear the targets and replay every draw recorded since the last call.
    ///
    /// Returns the number of draws submitted.
    pub fn render(
        &mut self,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) -> usize {
        let draws = std::mem::take(&mut self.draws);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[self.frame]));
        self.upload_draws(&draws);
        self.ensure_texture_bind_group();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(objects), Some(textures)) =
                (&self.object_buffer, &self.texture_bind_group)
            {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                render_pass.set_bind_group(2, textures, &[]);
                for (i, draw) in draws.iter().enumerate() {
                    let Some(mesh) = self.meshes.get(&draw.shape) else {
                        continue;
                    };
                    let offset = (i as u64 * self.object_stride) as wgpu::DynamicOffset;
                    render_pass.set_bind_group(1, &objects.bind_group, &[offset]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        draws.len()
    }

    fn upload_draws(&mut self, draws: &[DrawCommand]) {
        if draws.is_empty() {
            return;
        }
        let needs_growth = self
            .object_buffer
            .as_ref()
            .is_none_or(|buffer| buffer.capacity < draws.len());
        if needs_growth {
            self.object_buffer = Some(self.create_object_buffer(draws.len().next_power_of_two()));
        }
        let Some(objects) = &self.object_buffer else {
            return;
        };

        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let raw = bytemuck::bytes_of(&draw.object);
            bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
        }
        self.queue.write_buffer(&objects.buffer, 0, &bytes);
    }

    fn create_object_buffer(&self, capacity: usize) -> ObjectBuffer {
        log::debug!("Growing object uniform buffer to {} draws", capacity);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Buffer"),
            size: self.object_stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
            label: Some("object_bind_group"),
        });
        ObjectBuffer {
            buffer,
            bind_group,
            capacity,
        }
    }

    fn ensure_texture_bind_group(&mut self) {
        if self.texture_bind_group.is_some() {
            return;
        }
        let views: Vec<&wgpu::TextureView> = self
            .slots
            .iter()
            .map(|slot| {
                (*slot)
                    .and_then(|handle| self.textures.get(&handle))
                    .map_or(&self.placeholder.view, |texture| &texture.view)
            })
            .collect();
        let mut entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .enumerate()
            .map(|(binding, view)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: MAX_TEXTURE_SLOTS as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        self.texture_bind_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture_layout,
            entries: &entries,
            label: Some("texture_slots_bind_group"),
        }));
    }

    /// Split `directionalLight.<field>` / `pointLights[i].<field>` into the
    /// light it addresses and the field name.
    fn light_field<'n>(&mut self, name: &'n str) -> Option<(&mut LightUniform, &'n str)> {
        let (target, field) = name.split_once('.')?;
        if target == uniform::DIRECTIONAL_LIGHT {
            return Some((&mut self.frame.directional, field));
        }
        let index: usize = target
            .strip_prefix(uniform::POINT_LIGHTS)?
            .strip_prefix('[')?
            .strip_suffix(']')?
            .parse()
            .ok()?;
        if index >= MAX_POINT_LIGHTS {
            return None;
        }
        Some((&mut self.frame.points[index], field))
    }

    fn set_texture_slot(&mut self, name: &str, slot: u32) {
        if name != uniform::OBJECT_TEXTURE {
            unknown_uniform(name);
            return;
        }
        if slot as usize >= MAX_TEXTURE_SLOTS {
            log::warn!("Sampler slot {} out of range for {}", slot, name);
            return;
        }
        self.object.texture_slot = slot;
    }
}

fn unknown_uniform(name: &str) {
    log::warn!("Scene shader has no uniform named {}", name);
}

fn rgb(value: Vector3<f32>, w: f32) -> [f32; 4] {
    [value.x, value.y, value.z, w]
}

impl ShaderPipeline for WgpuBackend {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        match name {
            uniform::MODEL => {
                self.object.model = value.into();
                let normal = value.invert().unwrap_or(Matrix4::identity()).transpose();
                self.object.normal = normal.into();
            }
            uniform::VIEW => self.frame.view = value.into(),
            uniform::PROJECTION => self.frame.projection = value.into(),
            _ => unknown_uniform(name),
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        match name {
            uniform::OBJECT_COLOR => self.object.object_color = value.into(),
            _ => unknown_uniform(name),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        match name {
            uniform::VIEW_POSITION => self.frame.view_position = rgb(value, 1.0),
            uniform::OBJECT_COLOR => self.object.object_color = rgb(value, 1.0),
            uniform::MATERIAL_DIFFUSE => self.object.diffuse_color = rgb(value, 0.0),
            uniform::MATERIAL_SPECULAR => self.object.specular_color = rgb(value, 0.0),
            _ => {
                let applied = self
                    .light_field(name)
                    .is_some_and(|(light, field)| light.set_vec3(field, value.into()));
                if !applied {
                    unknown_uniform(name);
                }
            }
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        match name {
            uniform::UV_SCALE => self.object.uv_scale = value.into(),
            _ => unknown_uniform(name),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match name {
            uniform::MATERIAL_SHININESS => self.object.shininess = value,
            _ => unknown_uniform(name),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match name {
            uniform::USE_TEXTURE => self.object.use_texture = value as u32,
            uniform::USE_LIGHTING => self.frame.use_lighting = value as u32,
            _ => {
                let applied = self
                    .light_field(name)
                    .is_some_and(|(light, field)| light.set_bool(field, value));
                if !applied {
                    unknown_uniform(name);
                }
            }
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        match u32::try_from(value) {
            Ok(slot) => self.set_texture_slot(name, slot),
            Err(_) => log::warn!("Negative value {} for {}", value, name),
        }
    }

    fn set_sampler(&mut self, name: &str, slot: TextureSlot) {
        self.set_texture_slot(name, slot.0);
    }
}

impl TextureBackend for WgpuBackend {
    type Handle = TextureHandle;

    fn create_texture(
        &mut self,
        label: &str,
        image: &DecodedImage,
    ) -> Result<TextureHandle, SceneError> {
        let texture = Texture::from_decoded(&self.device, &self.queue, image, label)?;
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn bind_texture(&mut self, slot: TextureSlot, handle: &TextureHandle) {
        let Some(entry) = self.slots.get_mut(slot.index()) else {
            log::warn!("Cannot bind texture to slot {}", slot.0);
            return;
        };
        *entry = Some(*handle);
        self.texture_bind_group = None;
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if let Some(texture) = self.textures.remove(&handle) {
            texture.texture.destroy();
        }
        for slot in self.slots.iter_mut().filter(|slot| **slot == Some(handle)) {
            *slot = None;
        }
        self.texture_bind_group = None;
    }
}

impl MeshLibrary for WgpuBackend {
    fn load_mesh(&mut self, shape: ShapeKind) {
        if self.meshes.contains_key(&shape) {
            return;
        }
        let mesh = MeshData::for_shape(shape);
        log::debug!(
            "Loaded {:?} mesh: {} vertices, {} indices",
            shape,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        self.meshes.insert(shape, GpuMesh::new(&self.device, shape, &mesh));
    }

    fn draw_mesh(&mut self, shape: ShapeKind) {
        if !self.meshes.contains_key(&shape) {
            log::warn!("{:?} drawn before it was loaded", shape);
            self.load_mesh(shape);
        }
        self.draws.push(DrawCommand {
            shape,
            object: self.object,
        });
    }
}
