use super::{AbstractTexture, PixelData, TextureObject};
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::extensions;
use crate::format::{PixelFormat, PixelType, TextureFormat};
use crate::image::{image_data_size, Image, ImageView, DEFAULT_ALIGNMENT};
use crate::object::ObjectFlags;
use crate::state::{ObjectAccess, TextureImageQuery};
use crate::util::{cached_limit, get_integer};
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLsizei, GLuint};
use glstate_common::{calc_miplevel, SamplerWrapping};

/// A face of a cube map.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CubeMapCoordinate {
    PositiveX = gl::TEXTURE_CUBE_MAP_POSITIVE_X,
    NegativeX = gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
    PositiveY = gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
    NegativeY = gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
    PositiveZ = gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
    NegativeZ = gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
}

impl CubeMapCoordinate {
    pub const ALL: [CubeMapCoordinate; 6] = [
        CubeMapCoordinate::PositiveX,
        CubeMapCoordinate::NegativeX,
        CubeMapCoordinate::PositiveY,
        CubeMapCoordinate::NegativeY,
        CubeMapCoordinate::PositiveZ,
        CubeMapCoordinate::NegativeZ,
    ];

    /// Layer of the face when the cube map is accessed as a 3D image.
    pub fn index(self) -> i32 {
        (self as u32 - gl::TEXTURE_CUBE_MAP_POSITIVE_X) as i32
    }
}

const FACE_TARGETS: [GLenum; 6] = [
    gl::TEXTURE_CUBE_MAP_POSITIVE_X,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
    gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
    gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
    gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
];

/// Cube map texture, six square two-dimensional faces.
pub struct CubeMapTexture {
    object: TextureObject,
}

impl AbstractTexture for CubeMapTexture {
    fn object(&self) -> &TextureObject {
        &self.object
    }
}

impl CubeMapTexture {
    pub fn new(ctx: &Context) -> Self {
        CubeMapTexture {
            object: TextureObject::new(ctx, gl::TEXTURE_CUBE_MAP),
        }
    }

    pub fn wrap(ctx: &Context, id: GLuint, flags: ObjectFlags) -> Self {
        CubeMapTexture {
            object: TextureObject::wrap(ctx, gl::TEXTURE_CUBE_MAP, id, flags),
        }
    }

    pub fn release(mut self) -> GLuint {
        self.object.release()
    }

    pub fn as_object(&self) -> &TextureObject {
        &self.object
    }

    /// Maximum size of a face.
    pub fn max_size(ctx: &Context) -> [i32; 2] {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        let size = cached_limit(&mut state.texture.max_cube_map_size, || unsafe {
            get_integer(gl::MAX_CUBE_MAP_TEXTURE_SIZE)
        });
        [size; 2]
    }

    pub fn set_wrapping(&mut self, wrapping: [SamplerWrapping; 2]) -> &mut Self {
        self.object.set_wrapping(&wrapping);
        self
    }

    /// Size of a face at the given mip level. All faces are the same size.
    pub fn image_size(&self, level: i32) -> [i32; 2] {
        let size = self
            .object
            .image_size(gl::TEXTURE_CUBE_MAP_POSITIVE_X, level, 2);
        [size[0], size[1]]
    }

    /// Allocate immutable storage for all six faces.
    pub fn set_storage(&mut self, levels: i32, internal_format: TextureFormat, size: [i32; 2]) -> &mut Self {
        self.object
            .storage(levels, internal_format, &size, &FACE_TARGETS);
        self
    }

    /// Allocate immutable storage for the full mip chain of all faces.
    pub fn set_storage_with_mipmaps(&mut self, internal_format: TextureFormat, size: [i32; 2]) -> &mut Self {
        self.set_storage(calc_miplevel(&size), internal_format, size)
    }

    /// Specify a mutable image of one face.
    pub fn set_image(
        &mut self,
        face: CubeMapCoordinate,
        level: i32,
        internal_format: TextureFormat,
        image: &ImageView<'_, 2>,
    ) -> &mut Self {
        let size = image.size();
        self.object.image_raw(
            face as GLenum,
            level,
            internal_format,
            PixelData::from_view(image, &size),
        );
        self
    }

    /// Update part of one face.
    pub fn set_sub_image(
        &mut self,
        face: CubeMapCoordinate,
        level: i32,
        offset: [i32; 2],
        image: &ImageView<'_, 2>,
    ) -> &mut Self {
        let size = image.size();
        let pixels = PixelData::from_view(image, &size);

        if self.object.access() != ObjectAccess::DirectStateAccess {
            self.object
                .sub_image_raw(face as GLenum, level, &offset, pixels);
            return self;
        }

        // direct state access addresses faces as layers
        self.object.prepare_unpack(pixels.alignment);
        unsafe {
            gl::TextureSubImage3D(
                self.object.id(),
                level,
                offset[0],
                offset[1],
                face.index(),
                size[0],
                size[1],
                1,
                pixels.format as GLenum,
                pixels.ty as GLenum,
                image.data().as_ptr().cast(),
            );
        }
        self
    }

    /// Update a range of faces at once, with faces as the third dimension.
    /// Needs `ARB_direct_state_access`.
    pub fn set_sub_image_3d(
        &mut self,
        level: i32,
        offset: [i32; 3],
        image: &ImageView<'_, 3>,
    ) -> Result<&mut Self> {
        if self.object.access() != ObjectAccess::DirectStateAccess {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_DIRECT_STATE_ACCESS.name(),
            ));
        }
        let size = image.size();
        self.object.sub_image_raw(
            gl::TEXTURE_CUBE_MAP,
            level,
            &offset,
            PixelData::from_view(image, &size),
        );
        Ok(self)
    }

    /// Read back one face. With direct state access this needs
    /// `ARB_get_texture_sub_image`, otherwise the face is read through a
    /// binding.
    pub fn image(
        &self,
        face: CubeMapCoordinate,
        level: i32,
        format: PixelFormat,
        ty: PixelType,
    ) -> Image<2> {
        let size = self.image_size(level);
        let mut image = Image::zeroed(format, ty, size);
        if image_data_size(format, ty, &size, DEFAULT_ALIGNMENT) == 0 {
            return image;
        }

        let query = self.object.cube_image_query();
        if query != TextureImageQuery::DirectStateAccess {
            self.object
                .get_image_with(query, face as GLenum, level, format, ty, image.data_mut());
            return image;
        }

        self.object.prepare_pack();
        let out = image.data_mut();
        unsafe {
            gl::GetTextureSubImage(
                self.object.id(),
                level,
                0,
                0,
                face.index(),
                size[0],
                size[1],
                1,
                format as GLenum,
                ty as GLenum,
                out.len() as GLsizei,
                out.as_mut_ptr().cast(),
            );
        }
        image
    }

    /// Read back all six faces as a 3D image. Needs
    /// `ARB_direct_state_access`.
    pub fn image_3d(&self, level: i32, format: PixelFormat, ty: PixelType) -> Result<Image<3>> {
        if self.object.image_query() != TextureImageQuery::DirectStateAccess {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_DIRECT_STATE_ACCESS.name(),
            ));
        }
        let [width, height] = self.image_size(level);
        let mut image = Image::zeroed(format, ty, [width, height, 6]);
        if image_data_size(format, ty, &image.size(), DEFAULT_ALIGNMENT) > 0 {
            self.object.get_image_raw(
                gl::TEXTURE_CUBE_MAP,
                level,
                format,
                ty,
                image.data_mut(),
            );
        }
        Ok(image)
    }

    /// Does nothing without `ARB_invalidate_subdata`. Faces are the third
    /// dimension.
    pub fn invalidate_sub_image(&mut self, level: i32, offset: [i32; 3], size: [i32; 3]) {
        self.object.invalidate_sub_image(level, &offset, &size);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn face_indices() {
        let indices: Vec<i32> = CubeMapCoordinate::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(CubeMapCoordinate::NegativeY as GLenum, FACE_TARGETS[3]);
    }
}
