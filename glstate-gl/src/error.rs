//! Error types for the OpenGL wrapper.
use glstate_common::gl::types::GLenum;
use glstate_common::Version;
use thiserror::Error;

/// Cumulative error type for OpenGL state operations.
#[derive(Error, Debug)]
pub enum GlStateError {
    #[error("unable to load the OpenGL entry point {0}")]
    FunctionLoad(&'static str),
    #[error("unable to parse the OpenGL version string {0:?}")]
    InvalidVersionString(String),
    #[error("{0} is not supported, at least OpenGL 3.0 is required")]
    UnsupportedVersion(Version),
    #[error("the operation requires the {0} extension")]
    MissingExtension(&'static str),
    #[error("texture unit {unit} is out of range, only {max} units are available")]
    TextureUnitOutOfRange { unit: u32, max: u32 },
    #[error("image data has {actual} bytes, {expected} are needed")]
    ImageDataTooSmall { expected: usize, actual: usize },
    #[error("unable to map the buffer")]
    MapFailed,
    #[error("mesh views drawn together must share the same mesh and have one instance")]
    MultiDrawMismatch,
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("unknown enum value {0:#x} returned by the driver")]
    UnknownEnum(GLenum),
}

/// Result type for OpenGL state operations.
pub type Result<T> = std::result::Result<T, GlStateError>;
