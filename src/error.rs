//! Error taxonomy for scene setup and per-object resolution.
//!
//! [`SceneError`] covers everything that can abort scene initialization.
//! [`ResolveError`] is the narrower, cloneable outcome of looking up a tag; it
//! is what a frame report carries for objects that were skipped.

use std::{fmt, path::PathBuf};

use crate::data_structures::light::LightKind;

/// Which registry a tag lookup went to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Material,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Texture => f.write_str("texture"),
            ResourceKind::Material => f.write_str("material"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no {kind} registered with tag '{tag}'")]
    TagNotFound { kind: ResourceKind, tag: String },

    #[error("texturing is enabled but no texture tag is set")]
    UntaggedTexture,
}

impl ResolveError {
    pub(crate) fn not_found(kind: ResourceKind, tag: &str) -> Self {
        ResolveError::TagNotFound {
            kind,
            tag: tag.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("could not load image {path:?}: {reason}")]
    ImageLoadFailure { path: PathBuf, reason: String },

    #[error("image {path:?} has {channels} channels, only RGB (3) and RGBA (4) are supported")]
    UnsupportedChannelLayout { path: PathBuf, channels: u8 },

    #[error("could not upload texture '{tag}': {reason}")]
    TextureUpload { tag: String, reason: String },

    #[error("texture registry is full ({capacity} slots), cannot register '{tag}'")]
    RegistryFull { capacity: usize, tag: String },

    #[error("object {index} could not be resolved")]
    Unresolved {
        index: usize,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Lookup(#[from] ResolveError),

    #[error("scene defines {count} {kind} lights, at most {max} are supported")]
    LightLimit {
        kind: LightKind,
        count: usize,
        max: usize,
    },

    #[error("could not read scene file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene description: {0}")]
    Parse(#[from] serde_json::Error),
}
