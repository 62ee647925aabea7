//! Scene setup and the per-frame draw loop.

use crate::{
    data_structures::placement::{ResolvedPlacement, ShapeKind},
    error::{ResolveError, SceneError},
    pipelines::{MeshLibrary, RenderBackend, ShaderPipeline, TextureBackend, light, uniform},
    render::{self, FrameReport, SkippedObject},
    resources::{ResourceRegistry, decoder::ImageDecoder},
    scene::{Camera, MissingTagPolicy, SceneDescription},
};

/// An initialized scene.
///
/// Only [`SceneDriver::initialize`] creates one, so a frame can never be
/// rendered against a half-built registry.
#[derive(Debug)]
pub struct SceneDriver<H> {
    registry: ResourceRegistry<H>,
    // one entry per placement, in scene order
    objects: Vec<Result<ResolvedPlacement, ResolveError>>,
    camera: Camera,
    clear_color: wgpu::Color,
}

impl<H> SceneDriver<H> {
    /// Load textures and materials, configure lights, build the meshes and
    /// resolve every placement.
    ///
    /// Stops at the first error. Textures uploaded before the error are
    /// released again.
    pub fn initialize<B, D>(
        description: &SceneDescription,
        backend: &mut B,
        decoder: &D,
    ) -> Result<Self, SceneError>
    where
        B: RenderBackend<Handle = H> + ?Sized,
        D: ImageDecoder + ?Sized,
    {
        let mut registry = ResourceRegistry::with_capacity(description.texture_capacity);
        match Self::prepare(&mut registry, description, backend, decoder) {
            Ok(objects) => {
                log::info!(
                    "Scene ready: {} textures, {} materials, {} objects",
                    registry.texture_count(),
                    registry.material_count(),
                    objects.len()
                );
                Ok(Self {
                    registry,
                    objects,
                    camera: description.camera.clone(),
                    clear_color: description.clear_color(),
                })
            }
            Err(e) => {
                registry.release_all(backend);
                Err(e)
            }
        }
    }

    fn prepare<B, D>(
        registry: &mut ResourceRegistry<H>,
        description: &SceneDescription,
        backend: &mut B,
        decoder: &D,
    ) -> Result<Vec<Result<ResolvedPlacement, ResolveError>>, SceneError>
    where
        B: RenderBackend<Handle = H> + ?Sized,
        D: ImageDecoder + ?Sized,
    {
        for texture in &description.textures {
            registry.register_texture(backend, decoder, &texture.path, &texture.tag)?;
        }
        for material in &description.materials {
            registry.register_material(material.clone());
        }
        registry.bind_all_textures(backend);

        light::configure_lights(backend, &description.lights)?;

        for shape in ShapeKind::ALL {
            backend.load_mesh(shape);
        }

        let mut objects = Vec::with_capacity(description.objects.len());
        for (index, placement) in description.objects.iter().enumerate() {
            let resolved = render::resolve(registry, placement);
            if let Err(source) = &resolved {
                match description.missing_tags {
                    MissingTagPolicy::Fail => {
                        return Err(SceneError::Unresolved {
                            index,
                            source: source.clone(),
                        });
                    }
                    MissingTagPolicy::Skip => {
                        log::warn!("Object {} will not be drawn: {}", index, source)
                    }
                }
            }
            objects.push(resolved);
        }
        Ok(objects)
    }

    /// Draw every resolved object in scene order.
    ///
    /// Objects that failed to resolve during initialization are listed in the
    /// report instead.
    pub fn render_frame<P>(&self, pipeline: &mut P) -> FrameReport
    where
        P: ShaderPipeline + MeshLibrary + ?Sized,
    {
        let mut report = FrameReport::default();
        for (index, object) in self.objects.iter().enumerate() {
            let outcome = match object {
                Ok(placement) => render::draw_placement(pipeline, &self.registry, placement),
                Err(error) => Err(error.clone()),
            };
            match outcome {
                Ok(()) => report.drawn += 1,
                Err(error) => {
                    log::debug!("Skipping object {}: {}", index, error);
                    report.skipped.push(SkippedObject { index, error });
                }
            }
        }
        report
    }

    /// Upload the camera for a `width` x `height` target.
    pub fn apply_camera<P: ShaderPipeline + ?Sized>(&self, pipeline: &mut P, width: u32, height: u32) {
        pipeline.set_mat4(uniform::VIEW, self.camera.view_matrix());
        pipeline.set_mat4(uniform::PROJECTION, self.camera.projection_matrix(width, height));
        pipeline.set_vec3(uniform::VIEW_POSITION, self.camera.position.into());
    }

    /// Release every texture the scene uploaded.
    pub fn teardown<B: TextureBackend<Handle = H> + ?Sized>(mut self, backend: &mut B) {
        self.registry.release_all(backend);
        log::info!("Scene released");
    }

    pub fn registry(&self) -> &ResourceRegistry<H> {
        &self.registry
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Indices of objects that will never be drawn.
    pub fn unresolved(&self) -> impl Iterator<Item = usize> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| object.is_err().then_some(index))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }
}
