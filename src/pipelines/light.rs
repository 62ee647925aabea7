use cgmath::Vector3;

use crate::{
    data_structures::light::{Light, LightKind},
    error::SceneError,
    pipelines::{ShaderPipeline, uniform},
};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 1;
pub const MAX_POINT_LIGHTS: usize = 5;

/// One light as laid out in the frame uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // direction for the directional light, position for point lights
    pub vector: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub active: u32,
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    pub _padding: [u32; 3],
}

impl LightUniform {
    /// Apply a `directionalLight.<field>` / `pointLights[i].<field>` style field.
    pub(crate) fn set_vec3(&mut self, field: &str, value: [f32; 3]) -> bool {
        let target = match field {
            "direction" | "position" => &mut self.vector,
            "ambient" => &mut self.ambient,
            "diffuse" => &mut self.diffuse,
            "specular" => &mut self.specular,
            _ => return false,
        };
        *target = [value[0], value[1], value[2], 0.0];
        true
    }

    pub(crate) fn set_bool(&mut self, field: &str, value: bool) -> bool {
        if field != "bActive" {
            return false;
        }
        self.active = value as u32;
        true
    }
}

fn upload_light<P: ShaderPipeline + ?Sized>(pipeline: &mut P, prefix: &str, light: &Light) {
    let vector_field = match light.kind {
        LightKind::Directional => "direction",
        LightKind::Point => "position",
    };
    pipeline.set_vec3(&format!("{prefix}.{vector_field}"), Vector3::from(light.vector));
    pipeline.set_vec3(&format!("{prefix}.ambient"), Vector3::from(light.ambient));
    pipeline.set_vec3(&format!("{prefix}.diffuse"), Vector3::from(light.diffuse));
    pipeline.set_vec3(&format!("{prefix}.specular"), Vector3::from(light.specular));
    pipeline.set_bool(&format!("{prefix}.bActive"), light.active);
}

/// Upload the scene's lights and switch lighting on.
///
/// Point light slots the scene does not use are switched off so no light
/// from an earlier configuration survives.
pub fn configure_lights<P: ShaderPipeline + ?Sized>(
    pipeline: &mut P,
    lights: &[Light],
) -> Result<(), SceneError> {
    let directional: Vec<&Light> = lights
        .iter()
        .filter(|l| l.kind == LightKind::Directional)
        .collect();
    let points: Vec<&Light> = lights.iter().filter(|l| l.kind == LightKind::Point).collect();
    if directional.len() > MAX_DIRECTIONAL_LIGHTS {
        return Err(SceneError::LightLimit {
            kind: LightKind::Directional,
            count: directional.len(),
            max: MAX_DIRECTIONAL_LIGHTS,
        });
    }
    if points.len() > MAX_POINT_LIGHTS {
        return Err(SceneError::LightLimit {
            kind: LightKind::Point,
            count: points.len(),
            max: MAX_POINT_LIGHTS,
        });
    }

    pipeline.set_bool(uniform::USE_LIGHTING, true);

    match directional.first() {
        Some(light) => upload_light(pipeline, uniform::DIRECTIONAL_LIGHT, light),
        None => pipeline.set_bool(&format!("{}.bActive", uniform::DIRECTIONAL_LIGHT), false),
    }
    for index in 0..MAX_POINT_LIGHTS {
        let prefix = format!("{}[{}]", uniform::POINT_LIGHTS, index);
        match points.get(index) {
            Some(light) => upload_light(pipeline, &prefix, light),
            None => pipeline.set_bool(&format!("{prefix}.bActive"), false),
        }
    }
    log::info!(
        "Configured {} directional and {} point lights",
        directional.len(),
        points.len()
    );
    Ok(())
}
