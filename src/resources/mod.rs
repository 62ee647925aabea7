/**
 * This module contains everything that turns external data into scene resources:
 * decoded images, the tag registry and the primitive shape geometry.
 */
pub mod decoder;
pub mod mesh;
pub mod registry;

pub use registry::{MAX_TEXTURE_SLOTS, ResourceRegistry, TextureEntry};
