//! Per-draw binding protocol.
//!
//! Every object is drawn by the same fixed sequence of pipeline state uploads
//! followed by one draw call:
//!
//! 1. the model matrix
//! 2. the material's diffuse colour, specular colour and shininess
//! 3. either the texture flag and sampler slot, or the flat colour
//! 4. the UV scale
//! 5. the draw call for the object's shape
//!
//! All of it is re-sent for every object. Nothing set for a previous object is
//! assumed to still be correct.
//!
//! Tag resolution happens before the first upload. An object whose tags do not
//! resolve is skipped as a whole, so a miss never leaves half-programmed state
//! behind.

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    data_structures::placement::{ObjectPlacement, ResolvedPlacement},
    error::{ResolveError, ResourceKind},
    pipelines::{MeshLibrary, ShaderPipeline, uniform},
    resources::ResourceRegistry,
};

/// An object that was left out of a frame and why.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedObject {
    pub index: usize,
    pub error: ResolveError,
}

/// Outcome of rendering one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub drawn: usize,
    pub skipped: Vec<SkippedObject>,
}

impl FrameReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Turn a placement's tags into registry handles and compose its model matrix.
pub fn resolve<H>(
    registry: &ResourceRegistry<H>,
    placement: &ObjectPlacement,
) -> Result<ResolvedPlacement, ResolveError> {
    let material = registry.find_material_id(&placement.material)?;
    let texture = if placement.use_texture {
        let tag = placement
            .texture
            .as_deref()
            .ok_or(ResolveError::UntaggedTexture)?;
        Some(registry.find_texture_slot(tag)?)
    } else {
        None
    };

    Ok(ResolvedPlacement {
        shape: placement.shape,
        model: placement.transform().to_matrix(),
        material,
        texture,
        color: placement.color,
        uv_scale: placement.uv_scale,
    })
}

/// Program the pipeline for `placement` and issue its draw call.
///
/// Fails only when the material handle was not issued by `registry`, in which
/// case nothing is uploaded.
pub fn draw_placement<P, H>(
    pipeline: &mut P,
    registry: &ResourceRegistry<H>,
    placement: &ResolvedPlacement,
) -> Result<(), ResolveError>
where
    P: ShaderPipeline + MeshLibrary + ?Sized,
{
    let material = registry.material(placement.material).ok_or_else(|| {
        ResolveError::not_found(ResourceKind::Material, &format!("#{}", placement.material.index()))
    })?;

    pipeline.set_mat4(uniform::MODEL, placement.model);

    pipeline.set_vec3(uniform::MATERIAL_DIFFUSE, Vector3::from(material.diffuse_color));
    pipeline.set_vec3(uniform::MATERIAL_SPECULAR, Vector3::from(material.specular_color));
    pipeline.set_float(uniform::MATERIAL_SHININESS, material.shininess);

    match placement.texture {
        Some(slot) => {
            pipeline.set_bool(uniform::USE_TEXTURE, true);
            pipeline.set_sampler(uniform::OBJECT_TEXTURE, slot);
        }
        None => {
            pipeline.set_bool(uniform::USE_TEXTURE, false);
            pipeline.set_vec4(uniform::OBJECT_COLOR, Vector4::from(placement.color));
        }
    }
    pipeline.set_vec2(uniform::UV_SCALE, Vector2::from(placement.uv_scale));

    pipeline.draw_mesh(placement.shape);
    Ok(())
}

/// Resolve and draw a tagged placement in one step.
///
/// Used for placements that were not resolved ahead of time. A resolution
/// miss skips the object.
pub fn draw_object<P, H>(
    pipeline: &mut P,
    registry: &ResourceRegistry<H>,
    placement: &ObjectPlacement,
) -> Result<(), ResolveError>
where
    P: ShaderPipeline + MeshLibrary + ?Sized,
{
    let resolved = resolve(registry, placement)?;
    draw_placement(pipeline, registry, &resolved)
}

/// Draw `placements` in order, collecting misses instead of stopping.
pub fn draw_objects<P, H>(
    pipeline: &mut P,
    registry: &ResourceRegistry<H>,
    placements: &[ObjectPlacement],
) -> FrameReport
where
    P: ShaderPipeline + MeshLibrary + ?Sized,
{
    let mut report = FrameReport::default();
    for (index, placement) in placements.iter().enumerate() {
        match draw_object(pipeline, registry, placement) {
            Ok(()) => report.drawn += 1,
            Err(error) => {
                log::debug!("Skipping object {}: {}", index, error);
                report.skipped.push(SkippedObject { index, error });
            }
        }
    }
    report
}
