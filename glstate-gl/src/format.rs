//! Texture internal formats and pixel transfer formats.
use glstate_common::gl;

/// Sized internal format of a texture.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TextureFormat {
    R8 = gl::R8,
    RG8 = gl::RG8,
    RGB8 = gl::RGB8,
    RGBA8 = gl::RGBA8,
    SRGB8 = gl::SRGB8,
    SRGB8Alpha8 = gl::SRGB8_ALPHA8,
    R8UI = gl::R8UI,
    RGBA8UI = gl::RGBA8UI,
    R16F = gl::R16F,
    RG16F = gl::RG16F,
    RGB16F = gl::RGB16F,
    RGBA16F = gl::RGBA16F,
    R32F = gl::R32F,
    RG32F = gl::RG32F,
    RGB32F = gl::RGB32F,
    RGBA32F = gl::RGBA32F,
    R32UI = gl::R32UI,
    R32I = gl::R32I,
    RGB10A2 = gl::RGB10_A2,
    R11FG11FB10F = gl::R11F_G11F_B10F,
    DepthComponent16 = gl::DEPTH_COMPONENT16,
    DepthComponent24 = gl::DEPTH_COMPONENT24,
    DepthComponent32F = gl::DEPTH_COMPONENT32F,
    Depth24Stencil8 = gl::DEPTH24_STENCIL8,
    Depth32FStencil8 = gl::DEPTH32F_STENCIL8,
}

impl TextureFormat {
    /// A pixel format and type the format can be specified with when no
    /// data is uploaded.
    pub fn transfer_format(self) -> (PixelFormat, PixelType) {
        use PixelFormat as F;
        use PixelType as T;
        match self {
            TextureFormat::R8 => (F::Red, T::UnsignedByte),
            TextureFormat::RG8 => (F::RG, T::UnsignedByte),
            TextureFormat::RGB8 | TextureFormat::SRGB8 => (F::RGB, T::UnsignedByte),
            TextureFormat::RGBA8 | TextureFormat::SRGB8Alpha8 => (F::RGBA, T::UnsignedByte),
            TextureFormat::R8UI => (F::RedInteger, T::UnsignedByte),
            TextureFormat::RGBA8UI => (F::RGBAInteger, T::UnsignedByte),
            TextureFormat::R16F => (F::Red, T::HalfFloat),
            TextureFormat::RG16F => (F::RG, T::HalfFloat),
            TextureFormat::RGB16F => (F::RGB, T::HalfFloat),
            TextureFormat::RGBA16F => (F::RGBA, T::HalfFloat),
            TextureFormat::R32F => (F::Red, T::Float),
            TextureFormat::RG32F => (F::RG, T::Float),
            TextureFormat::RGB32F => (F::RGB, T::Float),
            TextureFormat::RGBA32F => (F::RGBA, T::Float),
            TextureFormat::R32UI => (F::RedInteger, T::UnsignedInt),
            TextureFormat::R32I => (F::RedInteger, T::Int),
            TextureFormat::RGB10A2 => (F::RGBA, T::UnsignedInt2101010Rev),
            TextureFormat::R11FG11FB10F => (F::RGB, T::UnsignedInt10F11F11FRev),
            TextureFormat::DepthComponent16 => (F::DepthComponent, T::UnsignedShort),
            TextureFormat::DepthComponent24 => (F::DepthComponent, T::UnsignedInt),
            TextureFormat::DepthComponent32F => (F::DepthComponent, T::Float),
            TextureFormat::Depth24Stencil8 => (F::DepthStencil, T::UnsignedInt248),
            TextureFormat::Depth32FStencil8 => (F::DepthStencil, T::Float32UnsignedInt248Rev),
        }
    }
}

/// Layout of pixel data in client memory.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Red = gl::RED,
    RG = gl::RG,
    RGB = gl::RGB,
    RGBA = gl::RGBA,
    BGR = gl::BGR,
    BGRA = gl::BGRA,
    RedInteger = gl::RED_INTEGER,
    RGInteger = gl::RG_INTEGER,
    RGBInteger = gl::RGB_INTEGER,
    RGBAInteger = gl::RGBA_INTEGER,
    DepthComponent = gl::DEPTH_COMPONENT,
    StencilIndex = gl::STENCIL_INDEX,
    DepthStencil = gl::DEPTH_STENCIL,
}

impl PixelFormat {
    pub fn components(self) -> usize {
        match self {
            PixelFormat::Red
            | PixelFormat::RedInteger
            | PixelFormat::DepthComponent
            | PixelFormat::StencilIndex => 1,
            PixelFormat::RG | PixelFormat::RGInteger | PixelFormat::DepthStencil => 2,
            PixelFormat::RGB | PixelFormat::BGR | PixelFormat::RGBInteger => 3,
            PixelFormat::RGBA | PixelFormat::BGRA | PixelFormat::RGBAInteger => 4,
        }
    }
}

/// Data type of pixel components in client memory.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PixelType {
    UnsignedByte = gl::UNSIGNED_BYTE,
    Byte = gl::BYTE,
    UnsignedShort = gl::UNSIGNED_SHORT,
    Short = gl::SHORT,
    UnsignedInt = gl::UNSIGNED_INT,
    Int = gl::INT,
    HalfFloat = gl::HALF_FLOAT,
    Float = gl::FLOAT,
    UnsignedInt248 = gl::UNSIGNED_INT_24_8,
    UnsignedInt10F11F11FRev = gl::UNSIGNED_INT_10F_11F_11F_REV,
    UnsignedInt2101010Rev = gl::UNSIGNED_INT_2_10_10_10_REV,
    Float32UnsignedInt248Rev = gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
}

/// Size of one pixel in bytes.
pub fn pixel_size(format: PixelFormat, ty: PixelType) -> usize {
    let component = match ty {
        PixelType::UnsignedByte | PixelType::Byte => 1,
        PixelType::UnsignedShort | PixelType::Short | PixelType::HalfFloat => 2,
        PixelType::UnsignedInt | PixelType::Int | PixelType::Float => 4,
        // packed types hold the whole pixel
        PixelType::UnsignedInt248
        | PixelType::UnsignedInt10F11F11FRev
        | PixelType::UnsignedInt2101010Rev => return 4,
        PixelType::Float32UnsignedInt248Rev => return 8,
    };
    component * format.components()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pixel_sizes() {
        assert_eq!(pixel_size(PixelFormat::RGBA, PixelType::UnsignedByte), 4);
        assert_eq!(pixel_size(PixelFormat::RGB, PixelType::Float), 12);
        assert_eq!(pixel_size(PixelFormat::RG, PixelType::HalfFloat), 4);
        assert_eq!(pixel_size(PixelFormat::DepthStencil, PixelType::UnsignedInt248), 4);
        assert_eq!(
            pixel_size(PixelFormat::DepthStencil, PixelType::Float32UnsignedInt248Rev),
            8
        );
    }

    #[test]
    fn transfer_formats_match_pixel_size() {
        let (format, ty) = TextureFormat::RGBA32F.transfer_format();
        assert_eq!(pixel_size(format, ty), 16);
        let (format, ty) = TextureFormat::Depth24Stencil8.transfer_format();
        assert_eq!(pixel_size(format, ty), 4);
    }
}
