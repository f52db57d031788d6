use crate::gl::types::GLenum;
use crate::{
    SamplerCompareFunction, SamplerCompareMode, SamplerDepthStencilMode, SamplerFilter,
    SamplerMipmap, SamplerWrapping,
};

impl From<SamplerWrapping> for GLenum {
    fn from(value: SamplerWrapping) -> Self {
        match value {
            SamplerWrapping::Repeat => crate::gl::REPEAT,
            SamplerWrapping::MirroredRepeat => crate::gl::MIRRORED_REPEAT,
            SamplerWrapping::ClampToEdge => crate::gl::CLAMP_TO_EDGE,
            SamplerWrapping::ClampToBorder => crate::gl::CLAMP_TO_BORDER,
            SamplerWrapping::MirrorClampToEdge => crate::gl::MIRROR_CLAMP_TO_EDGE,
        }
    }
}

impl From<SamplerFilter> for GLenum {
    fn from(value: SamplerFilter) -> Self {
        match value {
            SamplerFilter::Nearest => crate::gl::NEAREST,
            SamplerFilter::Linear => crate::gl::LINEAR,
        }
    }
}

impl SamplerFilter {
    /// Get the minification filter enum with the given mipmap selection.
    pub fn gl_mip(&self, mip: SamplerMipmap) -> GLenum {
        match (self, mip) {
            (SamplerFilter::Nearest, SamplerMipmap::Base) => crate::gl::NEAREST,
            (SamplerFilter::Linear, SamplerMipmap::Base) => crate::gl::LINEAR,
            (SamplerFilter::Nearest, SamplerMipmap::Nearest) => crate::gl::NEAREST_MIPMAP_NEAREST,
            (SamplerFilter::Linear, SamplerMipmap::Nearest) => crate::gl::LINEAR_MIPMAP_NEAREST,
            (SamplerFilter::Nearest, SamplerMipmap::Linear) => crate::gl::NEAREST_MIPMAP_LINEAR,
            (SamplerFilter::Linear, SamplerMipmap::Linear) => crate::gl::LINEAR_MIPMAP_LINEAR,
        }
    }
}

impl From<SamplerCompareMode> for GLenum {
    fn from(value: SamplerCompareMode) -> Self {
        match value {
            SamplerCompareMode::None => crate::gl::NONE,
            SamplerCompareMode::CompareRefToTexture => crate::gl::COMPARE_REF_TO_TEXTURE,
        }
    }
}

impl From<SamplerCompareFunction> for GLenum {
    fn from(value: SamplerCompareFunction) -> Self {
        match value {
            SamplerCompareFunction::Never => crate::gl::NEVER,
            SamplerCompareFunction::Always => crate::gl::ALWAYS,
            SamplerCompareFunction::Less => crate::gl::LESS,
            SamplerCompareFunction::LessOrEqual => crate::gl::LEQUAL,
            SamplerCompareFunction::Equal => crate::gl::EQUAL,
            SamplerCompareFunction::NotEqual => crate::gl::NOTEQUAL,
            SamplerCompareFunction::GreaterOrEqual => crate::gl::GEQUAL,
            SamplerCompareFunction::Greater => crate::gl::GREATER,
        }
    }
}

impl From<SamplerDepthStencilMode> for GLenum {
    fn from(value: SamplerDepthStencilMode) -> Self {
        match value {
            SamplerDepthStencilMode::DepthComponent => crate::gl::DEPTH_COMPONENT,
            SamplerDepthStencilMode::StencilIndex => crate::gl::STENCIL_INDEX,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mipmap_filters() {
        assert_eq!(SamplerFilter::Linear.gl_mip(SamplerMipmap::Base), crate::gl::LINEAR);
        assert_eq!(
            SamplerFilter::Nearest.gl_mip(SamplerMipmap::Linear),
            crate::gl::NEAREST_MIPMAP_LINEAR
        );
        assert_eq!(GLenum::from(SamplerWrapping::ClampToEdge), 0x812F);
    }
}
