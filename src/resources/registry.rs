use std::path::Path;

use crate::{
    data_structures::{
        material::{Material, MaterialId},
        placement::TextureSlot,
    },
    error::{ResolveError, ResourceKind, SceneError},
    pipelines::TextureBackend,
    resources::decoder::ImageDecoder,
};

/// Number of sampler slots the scene shader exposes.
pub const MAX_TEXTURE_SLOTS: usize = 16;

#[derive(Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
}

/// Tag to texture-slot and tag to material bookkeeping.
///
/// Populated during scene initialization and read-only afterwards. A texture's
/// slot is its registration index. Lookups scan in registration order, so the
/// first entry registered under a tag wins.
#[derive(Debug)]
pub struct ResourceRegistry<H> {
    textures: Vec<TextureEntry<H>>,
    materials: Vec<Material>,
    capacity: usize,
}

impl<H> ResourceRegistry<H> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TEXTURE_SLOTS)
    }

    /// A registry holding at most `capacity` textures, clamped to [`MAX_TEXTURE_SLOTS`].
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity > MAX_TEXTURE_SLOTS {
            log::warn!(
                "Texture capacity {} exceeds the {} shader slots, clamping.",
                capacity,
                MAX_TEXTURE_SLOTS
            );
        }
        Self {
            textures: Vec::new(),
            materials: Vec::new(),
            capacity: capacity.min(MAX_TEXTURE_SLOTS),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn textures(&self) -> impl Iterator<Item = &TextureEntry<H>> {
        self.textures.iter()
    }

    /// Decode `path`, upload it and register it under `tag`.
    ///
    /// Fails without touching the registry or the backend when it is full, when
    /// the image cannot be decoded, when it is neither RGB nor RGBA, or when its
    /// pixel buffer does not match its dimensions.
    pub fn register_texture<B, D>(
        &mut self,
        backend: &mut B,
        decoder: &D,
        path: &Path,
        tag: &str,
    ) -> Result<TextureSlot, SceneError>
    where
        B: TextureBackend<Handle = H> + ?Sized,
        D: ImageDecoder + ?Sized,
    {
        if self.textures.len() >= self.capacity {
            return Err(SceneError::RegistryFull {
                capacity: self.capacity,
                tag: tag.to_string(),
            });
        }

        let image = decoder.decode(path)?;
        if !matches!(image.channels, 3 | 4) {
            return Err(SceneError::UnsupportedChannelLayout {
                path: path.to_path_buf(),
                channels: image.channels,
            });
        }
        if let Some(reason) = image.layout_defect() {
            return Err(SceneError::ImageLoadFailure {
                path: path.to_path_buf(),
                reason,
            });
        }
        log::info!(
            "Loaded image {:?} ({}x{}, {} channels) as '{}'",
            path,
            image.width,
            image.height,
            image.channels,
            tag
        );

        let handle = backend.create_texture(tag, &image)?;
        let slot = TextureSlot(self.textures.len() as u32);
        self.textures.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(slot)
    }

    pub fn register_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn find_texture_slot(&self, tag: &str) -> Result<TextureSlot, ResolveError> {
        self.textures
            .iter()
            .position(|entry| entry.tag == tag)
            .map(|index| TextureSlot(index as u32))
            .ok_or_else(|| ResolveError::not_found(ResourceKind::Texture, tag))
    }

    pub fn find_material(&self, tag: &str) -> Result<&Material, ResolveError> {
        self.find_material_id(tag).map(|id| &self.materials[id.0])
    }

    pub fn find_material_id(&self, tag: &str) -> Result<MaterialId, ResolveError> {
        self.materials
            .iter()
            .position(|material| material.tag == tag)
            .map(MaterialId)
            .ok_or_else(|| ResolveError::not_found(ResourceKind::Material, tag))
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Bind every texture to the slot matching its registration index.
    ///
    /// Must run after the last texture is registered and before the first
    /// textured draw. Repeating it yields the same bindings.
    pub fn bind_all_textures<B: TextureBackend<Handle = H> + ?Sized>(&self, backend: &mut B) {
        for (index, entry) in self.textures.iter().enumerate() {
            backend.bind_texture(TextureSlot(index as u32), &entry.handle);
        }
    }

    /// Release every texture handle. Materials are kept.
    ///
    /// Calling it again is a no-op since the released entries are gone.
    pub fn release_all<B: TextureBackend<Handle = H> + ?Sized>(&mut self, backend: &mut B) {
        for entry in self.textures.drain(..) {
            backend.release_texture(entry.handle);
        }
    }
}

impl<H> Default for ResourceRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
