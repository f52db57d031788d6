//! State-tracking OpenGL object wrappers.
//!
//! A [`Context`] negotiates the version and extensions of the current
//! OpenGL context, applies driver workarounds and chooses, once, which
//! entry points every object operation goes through. Buffers, textures,
//! meshes and programs then skip redundant binds using the shared caches.

mod object;
#[cfg(test)]
mod recording;
mod state;
mod util;

pub mod buffer;
pub mod context;
pub mod error;
pub mod extensions;
pub mod format;
pub mod image;
pub mod mesh;
pub mod mesh_view;
pub mod options;
pub mod query;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod workarounds;

pub use context::{Context, ContextFlags, DriverInfo, States};
pub use error::{GlStateError, Result};
pub use extensions::Extension;
pub use glstate_common::Version;
pub use object::ObjectFlags;
pub use options::ContextOptions;
