//! Common types shared by the glstate crates.
//!
//! The raw OpenGL bindings and the conversions of these types into GL enums
//! are available with the `opengl` feature.
#[cfg(feature = "opengl")]
pub mod gl;
#[cfg(feature = "opengl")]
mod gl_enums;

pub mod map;
mod version;

pub use version::Version;

use std::convert::Infallible;
use std::str::FromStr;

/// Texture minification and magnification filter.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerFilter {
    Nearest = 0,
    #[default]
    Linear,
}

/// Mipmap selection combined with the minification filter.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerMipmap {
    /// Sample only the base level.
    #[default]
    Base = 0,
    Nearest,
    Linear,
}

/// Texture coordinate wrapping.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerWrapping {
    #[default]
    Repeat = 0,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
    MirrorClampToEdge,
}

/// Depth texture comparison mode.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerCompareMode {
    #[default]
    None = 0,
    CompareRefToTexture,
}

/// Depth texture comparison function.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerCompareFunction {
    Never = 0,
    Always,
    Less,
    #[default]
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
}

/// Which component of a combined depth/stencil texture is sampled.
#[repr(i32)]
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum SamplerDepthStencilMode {
    #[default]
    DepthComponent = 0,
    StencilIndex,
}

impl FromStr for SamplerFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "nearest" => SamplerFilter::Nearest,
            _ => SamplerFilter::Linear,
        })
    }
}

impl FromStr for SamplerMipmap {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "nearest" => SamplerMipmap::Nearest,
            "linear" => SamplerMipmap::Linear,
            _ => SamplerMipmap::Base,
        })
    }
}

impl FromStr for SamplerWrapping {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mirrored_repeat" => SamplerWrapping::MirroredRepeat,
            "clamp_to_edge" => SamplerWrapping::ClampToEdge,
            "clamp_to_border" => SamplerWrapping::ClampToBorder,
            "mirror_clamp_to_edge" => SamplerWrapping::MirrorClampToEdge,
            _ => SamplerWrapping::Repeat,
        })
    }
}

/// Calculate the number of mipmap levels for a texture of the given size.
pub fn calc_miplevel(size: &[i32]) -> i32 {
    let mut size = size.iter().copied().max().unwrap_or(0).max(0);
    let mut levels = 0;
    while size != 0 {
        levels += 1;
        size >>= 1;
    }

    levels
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn miplevels() {
        assert_eq!(calc_miplevel(&[256, 256]), 9);
        assert_eq!(calc_miplevel(&[1]), 1);
        assert_eq!(calc_miplevel(&[300, 17, 4]), 9);
        assert_eq!(calc_miplevel(&[0, 0]), 0);
    }

    #[test]
    fn sampler_names() {
        assert_eq!(
            "clamp_to_edge".parse::<SamplerWrapping>(),
            Ok(SamplerWrapping::ClampToEdge)
        );
        assert_eq!("bogus".parse::<SamplerWrapping>(), Ok(SamplerWrapping::Repeat));
        assert_eq!("nearest".parse::<SamplerFilter>(), Ok(SamplerFilter::Nearest));
        assert_eq!("linear".parse::<SamplerMipmap>(), Ok(SamplerMipmap::Linear));
    }
}
