//! Global renderer state: features, clearing and error reporting.
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::state::{ClearDepth, ResetStatus, StateHandle};
use bitflags::bitflags;
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint};
use std::fmt::{Display, Formatter};

#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    Blending = gl::BLEND,
    DepthClamp = gl::DEPTH_CLAMP,
    DepthTest = gl::DEPTH_TEST,
    Dithering = gl::DITHER,
    FaceCulling = gl::CULL_FACE,
    FramebufferSrgb = gl::FRAMEBUFFER_SRGB,
    Multisampling = gl::MULTISAMPLE,
    PolygonOffsetFill = gl::POLYGON_OFFSET_FILL,
    PrimitiveRestart = gl::PRIMITIVE_RESTART,
    ProgramPointSize = gl::PROGRAM_POINT_SIZE,
    RasterizerDiscard = gl::RASTERIZER_DISCARD,
    ScissorTest = gl::SCISSOR_TEST,
    SeamlessCubeMapTexture = gl::TEXTURE_CUBE_MAP_SEAMLESS,
    StencilTest = gl::STENCIL_TEST,
}

bitflags! {
    /// Buffers cleared by [`Renderer::clear`].
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
    }
}

/// Error reported by `glGetError`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RendererError {
    NoError,
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    StackUnderflow,
    StackOverflow,
}

impl TryFrom<GLenum> for RendererError {
    type Error = GlStateError;

    fn try_from(value: GLenum) -> Result<Self> {
        Ok(match value {
            gl::NO_ERROR => RendererError::NoError,
            gl::INVALID_ENUM => RendererError::InvalidEnum,
            gl::INVALID_VALUE => RendererError::InvalidValue,
            gl::INVALID_OPERATION => RendererError::InvalidOperation,
            gl::INVALID_FRAMEBUFFER_OPERATION => RendererError::InvalidFramebufferOperation,
            gl::OUT_OF_MEMORY => RendererError::OutOfMemory,
            gl::STACK_UNDERFLOW => RendererError::StackUnderflow,
            gl::STACK_OVERFLOW => RendererError::StackOverflow,
            other => return Err(GlStateError::UnknownEnum(other)),
        })
    }
}

impl Display for RendererError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RendererError::NoError => "GL_NO_ERROR",
            RendererError::InvalidEnum => "GL_INVALID_ENUM",
            RendererError::InvalidValue => "GL_INVALID_VALUE",
            RendererError::InvalidOperation => "GL_INVALID_OPERATION",
            RendererError::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            RendererError::OutOfMemory => "GL_OUT_OF_MEMORY",
            RendererError::StackUnderflow => "GL_STACK_UNDERFLOW",
            RendererError::StackOverflow => "GL_STACK_OVERFLOW",
        };
        f.write_str(name)
    }
}

/// How the context reports a graphics reset.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ResetNotificationStrategy {
    NoResetNotification,
    LoseContextOnReset,
}

impl TryFrom<GLenum> for ResetNotificationStrategy {
    type Error = GlStateError;

    fn try_from(value: GLenum) -> Result<Self> {
        match value {
            gl::NO_RESET_NOTIFICATION => Ok(ResetNotificationStrategy::NoResetNotification),
            gl::LOSE_CONTEXT_ON_RESET => Ok(ResetNotificationStrategy::LoseContextOnReset),
            other => Err(GlStateError::UnknownEnum(other)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GraphicsResetStatus {
    NoError,
    GuiltyContextReset,
    InnocentContextReset,
    UnknownContextReset,
}

impl TryFrom<GLenum> for GraphicsResetStatus {
    type Error = GlStateError;

    fn try_from(value: GLenum) -> Result<Self> {
        match value {
            gl::NO_ERROR => Ok(GraphicsResetStatus::NoError),
            gl::GUILTY_CONTEXT_RESET => Ok(GraphicsResetStatus::GuiltyContextReset),
            gl::INNOCENT_CONTEXT_RESET => Ok(GraphicsResetStatus::InnocentContextReset),
            gl::UNKNOWN_CONTEXT_RESET => Ok(GraphicsResetStatus::UnknownContextReset),
            other => Err(GlStateError::UnknownEnum(other)),
        }
    }
}

/// Handle to the renderer state of a context.
pub struct Renderer {
    state: StateHandle,
}

impl Renderer {
    pub fn new(ctx: &Context) -> Renderer {
        Renderer { state: ctx.state() }
    }

    pub fn enable(&self, feature: Feature) {
        unsafe { gl::Enable(feature as GLenum) }
    }

    pub fn disable(&self, feature: Feature) {
        unsafe { gl::Disable(feature as GLenum) }
    }

    pub fn set_feature(&self, feature: Feature, enabled: bool) {
        if enabled {
            self.enable(feature)
        } else {
            self.disable(feature)
        }
    }

    pub fn set_clear_color(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    pub fn set_clear_depth(&self, depth: f32) {
        let clear_depth = self.state.borrow().renderer.clear_depth;
        unsafe {
            match clear_depth {
                ClearDepth::Default => gl::ClearDepth(depth as f64),
                ClearDepth::Es => gl::ClearDepthf(depth),
            }
        }
    }

    pub fn set_clear_stencil(&self, stencil: i32) {
        unsafe { gl::ClearStencil(stencil) }
    }

    pub fn clear(&self, mask: ClearMask) {
        unsafe { gl::Clear(mask.bits()) }
    }

    /// The oldest error recorded by the driver.
    pub fn error(&self) -> Result<RendererError> {
        RendererError::try_from(unsafe { gl::GetError() })
    }

    /// Always [`ResetNotificationStrategy::NoResetNotification`] without
    /// `ARB_robustness`.
    pub fn reset_notification_strategy(&self) -> Result<ResetNotificationStrategy> {
        let mut state = self.state.borrow_mut();
        let renderer = &mut state.renderer;
        if renderer.reset_status == ResetStatus::Default {
            return Ok(ResetNotificationStrategy::NoResetNotification);
        }
        if let Some(strategy) = renderer.reset_notification_strategy {
            return Ok(strategy);
        }

        let mut value: GLint = 0;
        unsafe { gl::GetIntegerv(gl::RESET_NOTIFICATION_STRATEGY_ARB, &mut value) };
        let strategy = ResetNotificationStrategy::try_from(value as GLenum)?;
        renderer.reset_notification_strategy = Some(strategy);
        Ok(strategy)
    }

    /// Always [`GraphicsResetStatus::NoError`] without `ARB_robustness`.
    pub fn graphics_reset_status(&self) -> Result<GraphicsResetStatus> {
        let reset_status = self.state.borrow().renderer.reset_status;
        match reset_status {
            ResetStatus::Default => Ok(GraphicsResetStatus::NoError),
            ResetStatus::Robustness => {
                GraphicsResetStatus::try_from(unsafe { gl::GetGraphicsResetStatusARB() })
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn converts_errors() {
        assert_eq!(
            RendererError::try_from(gl::INVALID_OPERATION).ok(),
            Some(RendererError::InvalidOperation)
        );
        assert!(matches!(
            RendererError::try_from(0x1234),
            Err(GlStateError::UnknownEnum(0x1234))
        ));
        assert_eq!(RendererError::OutOfMemory.to_string(), "GL_OUT_OF_MEMORY");
    }

    #[test]
    fn converts_reset_values() {
        assert_eq!(
            ResetNotificationStrategy::try_from(gl::LOSE_CONTEXT_ON_RESET).ok(),
            Some(ResetNotificationStrategy::LoseContextOnReset)
        );
        assert_eq!(
            GraphicsResetStatus::try_from(gl::GUILTY_CONTEXT_RESET).ok(),
            Some(GraphicsResetStatus::GuiltyContextReset)
        );
        assert!(GraphicsResetStatus::try_from(gl::OUT_OF_MEMORY).is_err());
    }
}
