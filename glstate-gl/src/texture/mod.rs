//! Texture objects.
//!
//! Configuration without direct state access happens on the highest
//! texture unit, which is reserved for it. Units used for rendering are
//! tracked so that binding an already bound texture is skipped.
mod cube_map;

pub use cube_map::{CubeMapCoordinate, CubeMapTexture};

use crate::buffer::TargetHint;
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::extensions;
use crate::format::{PixelFormat, PixelType, TextureFormat};
use crate::image::{image_data_size, Image, ImageView, DEFAULT_ALIGNMENT};
use crate::object::ObjectFlags;
use crate::state::{
    Create, Invalidate, MultiBind, ObjectAccess, StateHandle, TextureBind, TextureImageQuery,
    TextureState, TextureStorage,
};
use crate::util::{cached_limit, get_float, get_integer};
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint, GLsizei, GLuint};
use glstate_common::{
    calc_miplevel, SamplerCompareFunction, SamplerCompareMode, SamplerDepthStencilMode, SamplerFilter,
    SamplerMipmap, SamplerWrapping,
};
use std::cell::Cell;
use std::ffi::c_void;

const TEXTURE_SRGB_DECODE_EXT: GLenum = 0x8A48;
const DECODE_EXT: GLenum = 0x8A49;
const SKIP_DECODE_EXT: GLenum = 0x8A4A;

const WRAP_PNAMES: [GLenum; 3] = [gl::TEXTURE_WRAP_S, gl::TEXTURE_WRAP_T, gl::TEXTURE_WRAP_R];
const SIZE_PNAMES: [GLenum; 3] = [gl::TEXTURE_WIDTH, gl::TEXTURE_HEIGHT, gl::TEXTURE_DEPTH];

/// Source of a color component when sampling.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Swizzle {
    Red = gl::RED,
    Green = gl::GREEN,
    Blue = gl::BLUE,
    Alpha = gl::ALPHA,
    Zero = gl::ZERO,
    One = gl::ONE,
}

/// Pad a size or offset to three dimensions.
fn extent3(values: &[i32], fill: i32) -> [i32; 3] {
    let mut out = [fill; 3];
    for (out, value) in out.iter_mut().zip(values) {
        *out = *value;
    }
    out
}

/// Size of a mip level, each dimension halved and clamped to one.
pub(crate) fn level_size(size: &[i32], level: i32) -> Vec<i32> {
    let shift = u32::try_from(level).unwrap_or(0);
    size.iter()
        .map(|extent| extent.checked_shr(shift).unwrap_or(0).max(1))
        .collect()
}

/// Pixel data passed to the image upload entry points.
#[derive(Copy, Clone)]
pub(crate) struct PixelData<'a> {
    pub format: PixelFormat,
    pub ty: PixelType,
    pub size: &'a [i32],
    pub data: Option<&'a [u8]>,
    pub alignment: usize,
}

impl<'a> PixelData<'a> {
    pub fn from_view<const N: usize>(view: &'a ImageView<'a, N>, size: &'a [i32]) -> Self {
        PixelData {
            format: view.format(),
            ty: view.pixel_type(),
            size,
            data: Some(view.data()),
            alignment: view.alignment(),
        }
    }

    fn ptr(&self) -> *const c_void {
        self.data
            .map(|data| data.as_ptr().cast())
            .unwrap_or(std::ptr::null())
    }
}

fn check_unit(state: &TextureState, unit: u32, count: u32) -> Result<()> {
    let max = state.unit_count();
    if unit.checked_add(count).map_or(true, |end| end > max) {
        return Err(GlStateError::TextureUnitOutOfRange {
            unit: unit.saturating_add(count.saturating_sub(1)),
            max,
        });
    }
    Ok(())
}

/// Target and object shared by every texture type.
pub struct TextureObject {
    state: StateHandle,
    target: GLenum,
    id: GLuint,
    flags: Cell<ObjectFlags>,
}

impl TextureObject {
    pub(crate) fn new(ctx: &Context, target: GLenum) -> TextureObject {
        let state = ctx.state();
        let create = state.borrow().texture.create;

        let mut id = 0;
        let flags = match create {
            Create::Gen => {
                unsafe { gl::GenTextures(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION
            }
            Create::DirectStateAccess => {
                unsafe { gl::CreateTextures(target, 1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION | ObjectFlags::CREATED
            }
        };
        state.borrow_mut().texture.forget(id);

        TextureObject {
            state,
            target,
            id,
            flags: Cell::new(flags),
        }
    }

    pub(crate) fn wrap(ctx: &Context, target: GLenum, id: GLuint, flags: ObjectFlags) -> Self {
        TextureObject {
            state: ctx.state(),
            target,
            id,
            flags: Cell::new(flags),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> GLenum {
        self.target
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags.get()
    }

    pub(crate) fn release(&mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }

    fn mark_created(&self) {
        self.flags.set(self.flags.get() | ObjectFlags::CREATED);
    }

    /// Bind the texture to a unit for rendering.
    pub fn bind(&self, unit: u32) -> Result<()> {
        let bind = {
            let state = self.state.borrow();
            check_unit(&state.texture, unit, 1)?;
            if state.texture.is_bound(unit, self.id) {
                return Ok(());
            }
            state.texture.bind
        };

        if bind == TextureBind::Multi {
            self.create_if_not_already();
        }

        let mut state = self.state.borrow_mut();
        let texture = &mut state.texture;
        unsafe {
            match bind {
                TextureBind::Default => {
                    if texture.activate(unit) {
                        gl::ActiveTexture(gl::TEXTURE0 + unit);
                    }
                    gl::BindTexture(self.target, self.id);
                }
                TextureBind::Multi => gl::BindTextures(unit, 1, &self.id),
                TextureBind::DirectStateAccess => gl::BindTextureUnit(unit, self.id),
                TextureBind::DirectStateAccessExt => {
                    gl::BindMultiTextureEXT(gl::TEXTURE0 + unit, self.target, self.id)
                }
            }
        }
        texture.record(unit, self.target, self.id);
        self.mark_created();
        Ok(())
    }

    /// Unbind whatever texture is bound to the unit.
    pub fn unbind(ctx: &Context, unit: u32) -> Result<()> {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        let texture = &mut state.texture;
        check_unit(texture, unit, 1)?;

        let Some((target, id)) = texture.binding(unit) else {
            return Ok(());
        };
        if id == 0 {
            return Ok(());
        }

        // the target is unknown after a state reset
        let target = if target == 0 { gl::TEXTURE_2D } else { target };
        unsafe {
            match texture.bind {
                TextureBind::Default => {
                    if texture.activate(unit) {
                        gl::ActiveTexture(gl::TEXTURE0 + unit);
                    }
                    gl::BindTexture(target, 0);
                }
                TextureBind::Multi => gl::BindTextures(unit, 1, std::ptr::null()),
                TextureBind::DirectStateAccess => gl::BindTextureUnit(unit, 0),
                TextureBind::DirectStateAccessExt => {
                    gl::BindMultiTextureEXT(gl::TEXTURE0 + unit, target, 0)
                }
            }
        }
        texture.record(unit, 0, 0);
        Ok(())
    }

    /// Unbind a consecutive range of units.
    pub fn unbind_range(ctx: &Context, first: u32, count: u32) -> Result<()> {
        let multi_bind = {
            let state = ctx.state();
            let state = state.borrow();
            check_unit(&state.texture, first, count)?;
            state.texture.multi_bind
        };

        match multi_bind {
            MultiBind::Fallback => {
                for unit in first..first + count {
                    TextureObject::unbind(ctx, unit)?;
                }
            }
            MultiBind::Multi => {
                let state = ctx.state();
                let empty = vec![(0, 0); count as usize];
                if state.borrow_mut().texture.bind_range(first, &empty) {
                    unsafe { gl::BindTextures(first, count as GLsizei, std::ptr::null()) }
                }
            }
        }
        Ok(())
    }

    /// Bind textures to consecutive units, unbinding the `None` slots.
    pub fn bind_many(ctx: &Context, first: u32, textures: &[Option<&TextureObject>]) -> Result<()> {
        let multi_bind = {
            let state = ctx.state();
            let state = state.borrow();
            check_unit(&state.texture, first, textures.len() as u32)?;
            state.texture.multi_bind
        };

        match multi_bind {
            MultiBind::Fallback => {
                for (i, texture) in textures.iter().enumerate() {
                    let unit = first + i as u32;
                    match texture {
                        Some(texture) => texture.bind(unit)?,
                        None => TextureObject::unbind(ctx, unit)?,
                    }
                }
            }
            MultiBind::Multi => {
                let entries: Vec<(GLenum, GLuint)> = textures
                    .iter()
                    .map(|texture| match texture {
                        Some(texture) => {
                            texture.create_if_not_already();
                            (texture.target, texture.id)
                        }
                        None => (0, 0),
                    })
                    .collect();

                let state = ctx.state();
                if state.borrow_mut().texture.bind_range(first, &entries) {
                    let ids: Vec<GLuint> = entries.iter().map(|(_, id)| *id).collect();
                    unsafe { gl::BindTextures(first, ids.len() as GLsizei, ids.as_ptr()) }
                }
            }
        }
        Ok(())
    }

    /// Make the texture current for configuration.
    pub(crate) fn bind_internal(&self) {
        let steps = self
            .state
            .borrow_mut()
            .texture
            .internal_bind(self.target, self.id);
        unsafe {
            if let Some(unit) = steps.activate {
                gl::ActiveTexture(gl::TEXTURE0 + unit);
            }
            if steps.bind {
                gl::BindTexture(self.target, self.id);
            }
        }
        self.mark_created();
    }

    pub(crate) fn create_if_not_already(&self) {
        if self.flags.get().contains(ObjectFlags::CREATED) {
            return;
        }
        self.bind_internal();
    }

    pub(crate) fn access(&self) -> ObjectAccess {
        self.state.borrow().texture.access
    }

    pub(crate) fn image_query(&self) -> TextureImageQuery {
        self.state.borrow().texture.image_query
    }

    pub(crate) fn cube_image_query(&self) -> TextureImageQuery {
        self.state.borrow().texture.cube_image_query
    }

    pub(crate) fn parameter_i(&self, pname: GLenum, value: GLint) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameteri(self.target, pname, value);
                }
                ObjectAccess::DirectStateAccess => gl::TextureParameteri(self.id, pname, value),
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameteriEXT(self.id, self.target, pname, value);
                }
            }
        }
    }

    pub(crate) fn parameter_f(&self, pname: GLenum, value: f32) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameterf(self.target, pname, value);
                }
                ObjectAccess::DirectStateAccess => gl::TextureParameterf(self.id, pname, value),
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameterfEXT(self.id, self.target, pname, value);
                }
            }
        }
    }

    pub(crate) fn parameter_fv(&self, pname: GLenum, values: &[f32]) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameterfv(self.target, pname, values.as_ptr());
                }
                ObjectAccess::DirectStateAccess => {
                    gl::TextureParameterfv(self.id, pname, values.as_ptr())
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameterfvEXT(self.id, self.target, pname, values.as_ptr());
                }
            }
        }
    }

    pub(crate) fn parameter_iv(&self, pname: GLenum, values: &[GLint]) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameteriv(self.target, pname, values.as_ptr());
                }
                ObjectAccess::DirectStateAccess => {
                    gl::TextureParameteriv(self.id, pname, values.as_ptr())
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameterivEXT(self.id, self.target, pname, values.as_ptr());
                }
            }
        }
    }

    pub(crate) fn parameter_integer_iv(&self, pname: GLenum, values: &[GLint]) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameterIiv(self.target, pname, values.as_ptr());
                }
                ObjectAccess::DirectStateAccess => {
                    gl::TextureParameterIiv(self.id, pname, values.as_ptr())
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameterIivEXT(self.id, self.target, pname, values.as_ptr());
                }
            }
        }
    }

    pub(crate) fn parameter_integer_uiv(&self, pname: GLenum, values: &[GLuint]) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::TexParameterIuiv(self.target, pname, values.as_ptr());
                }
                ObjectAccess::DirectStateAccess => {
                    gl::TextureParameterIuiv(self.id, pname, values.as_ptr())
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::TextureParameterIuivEXT(self.id, self.target, pname, values.as_ptr());
                }
            }
        }
    }

    /// Query a level parameter. `target` is the face for cube maps.
    pub(crate) fn level_parameter(&self, target: GLenum, level: i32, pname: GLenum) -> i32 {
        let mut value: GLint = 0;
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::GetTexLevelParameteriv(target, level, pname, &mut value);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::GetTextureLevelParameteriv(self.id, level, pname, &mut value)
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::GetTextureLevelParameterivEXT(self.id, target, level, pname, &mut value);
                }
            }
        }
        value
    }

    pub(crate) fn image_size(&self, target: GLenum, level: i32, dimensions: usize) -> Vec<i32> {
        SIZE_PNAMES[..dimensions]
            .iter()
            .map(|pname| self.level_parameter(target, level, *pname))
            .collect()
    }

    pub(crate) fn set_wrapping(&self, wrapping: &[SamplerWrapping]) {
        for (pname, wrap) in WRAP_PNAMES.iter().zip(wrapping) {
            self.parameter_i(*pname, GLenum::from(*wrap) as GLint);
        }
    }

    /// Prepare pixel unpack state for an upload from client memory.
    pub(crate) fn prepare_unpack(&self, alignment: usize) {
        let unbind = self
            .state
            .borrow_mut()
            .buffer
            .bind(TargetHint::PixelUnpack, 0);
        unsafe {
            if unbind {
                gl::BindBuffer(gl::PIXEL_UNPACK_BUFFER, 0);
            }
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, alignment as GLint);
        }
    }

    /// Prepare pixel pack state for a download to client memory.
    pub(crate) fn prepare_pack(&self) {
        let unbind = self.state.borrow_mut().buffer.bind(TargetHint::PixelPack, 0);
        unsafe {
            if unbind {
                gl::BindBuffer(gl::PIXEL_PACK_BUFFER, 0);
            }
            gl::PixelStorei(gl::PACK_ALIGNMENT, DEFAULT_ALIGNMENT as GLint);
        }
    }

    /// Specify a mutable image. `target` is the face for cube maps.
    pub(crate) fn image_raw(
        &self,
        target: GLenum,
        level: i32,
        internal_format: TextureFormat,
        pixels: PixelData<'_>,
    ) {
        self.prepare_unpack(pixels.alignment);
        let [w, h, d] = extent3(pixels.size, 1);
        let (ifmt, format, ty, ptr) = (
            internal_format as GLint,
            pixels.format as GLenum,
            pixels.ty as GLenum,
            pixels.ptr(),
        );
        let dims = pixels.size.len();

        unsafe {
            if self.access() == ObjectAccess::DirectStateAccessExt {
                self.mark_created();
                match dims {
                    1 => gl::TextureImage1DEXT(self.id, target, level, ifmt, w, 0, format, ty, ptr),
                    2 => gl::TextureImage2DEXT(self.id, target, level, ifmt, w, h, 0, format, ty, ptr),
                    _ => gl::TextureImage3DEXT(
                        self.id, target, level, ifmt, w, h, d, 0, format, ty, ptr,
                    ),
                }
                return;
            }

            self.bind_internal();
            match dims {
                1 => gl::TexImage1D(target, level, ifmt, w, 0, format, ty, ptr),
                2 => gl::TexImage2D(target, level, ifmt, w, h, 0, format, ty, ptr),
                _ => gl::TexImage3D(target, level, ifmt, w, h, d, 0, format, ty, ptr),
            }
        }
    }

    /// Update part of an image. `target` is the face for cube maps, which
    /// handle the direct state access path themselves.
    pub(crate) fn sub_image_raw(
        &self,
        target: GLenum,
        level: i32,
        offset: &[i32],
        pixels: PixelData<'_>,
    ) {
        self.prepare_unpack(pixels.alignment);
        let [x, y, z] = extent3(offset, 0);
        let [w, h, d] = extent3(pixels.size, 1);
        let (format, ty, ptr) = (pixels.format as GLenum, pixels.ty as GLenum, pixels.ptr());
        let dims = pixels.size.len();

        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    match dims {
                        1 => gl::TexSubImage1D(target, level, x, w, format, ty, ptr),
                        2 => gl::TexSubImage2D(target, level, x, y, w, h, format, ty, ptr),
                        _ => gl::TexSubImage3D(target, level, x, y, z, w, h, d, format, ty, ptr),
                    }
                }
                ObjectAccess::DirectStateAccess => match dims {
                    1 => gl::TextureSubImage1D(self.id, level, x, w, format, ty, ptr),
                    2 => gl::TextureSubImage2D(self.id, level, x, y, w, h, format, ty, ptr),
                    _ => gl::TextureSubImage3D(self.id, level, x, y, z, w, h, d, format, ty, ptr),
                },
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    match dims {
                        1 => gl::TextureSubImage1DEXT(self.id, target, level, x, w, format, ty, ptr),
                        2 => gl::TextureSubImage2DEXT(
                            self.id, target, level, x, y, w, h, format, ty, ptr,
                        ),
                        _ => gl::TextureSubImage3DEXT(
                            self.id, target, level, x, y, z, w, h, d, format, ty, ptr,
                        ),
                    }
                }
            }
        }
    }

    /// Allocate immutable storage, or emulate it with one image per level
    /// and per image target.
    pub(crate) fn storage(
        &self,
        levels: i32,
        internal_format: TextureFormat,
        size: &[i32],
        image_targets: &[GLenum],
    ) {
        let storage = self.state.borrow().texture.storage;
        let [w, h, d] = extent3(size, 1);
        let ifmt = internal_format as GLenum;

        unsafe {
            match storage {
                TextureStorage::Fallback => {
                    let (format, ty) = internal_format.transfer_format();
                    for level in 0..levels {
                        let level_size = level_size(size, level);
                        for target in image_targets {
                            self.image_raw(
                                *target,
                                level,
                                internal_format,
                                PixelData {
                                    format,
                                    ty,
                                    size: &level_size,
                                    data: None,
                                    alignment: DEFAULT_ALIGNMENT,
                                },
                            );
                        }
                    }
                }
                TextureStorage::Default => {
                    self.bind_internal();
                    match size.len() {
                        1 => gl::TexStorage1D(self.target, levels, ifmt, w),
                        2 => gl::TexStorage2D(self.target, levels, ifmt, w, h),
                        _ => gl::TexStorage3D(self.target, levels, ifmt, w, h, d),
                    }
                }
                TextureStorage::DirectStateAccess => match size.len() {
                    1 => gl::TextureStorage1D(self.id, levels, ifmt, w),
                    2 => gl::TextureStorage2D(self.id, levels, ifmt, w, h),
                    _ => gl::TextureStorage3D(self.id, levels, ifmt, w, h, d),
                },
            }
        }
    }

    /// Read back a whole level.
    pub(crate) fn get_image_raw(
        &self,
        target: GLenum,
        level: i32,
        format: PixelFormat,
        ty: PixelType,
        out: &mut [u8],
    ) {
        self.get_image_with(self.image_query(), target, level, format, ty, out);
    }

    /// Read back a whole level through the given entry points. `target` is
    /// the face for cube maps, which handle the direct state access path
    /// themselves.
    pub(crate) fn get_image_with(
        &self,
        query: TextureImageQuery,
        target: GLenum,
        level: i32,
        format: PixelFormat,
        ty: PixelType,
        out: &mut [u8],
    ) {
        self.prepare_pack();
        let (gl_format, gl_ty, len, ptr) = (
            format as GLenum,
            ty as GLenum,
            out.len() as GLsizei,
            out.as_mut_ptr().cast(),
        );
        unsafe {
            match query {
                TextureImageQuery::Default => {
                    self.bind_internal();
                    gl::GetTexImage(target, level, gl_format, gl_ty, ptr);
                }
                TextureImageQuery::Robustness => {
                    self.bind_internal();
                    gl::GetnTexImageARB(target, level, gl_format, gl_ty, len, ptr);
                }
                TextureImageQuery::DirectStateAccess => {
                    gl::GetTextureImage(self.id, level, gl_format, gl_ty, len, ptr);
                }
                TextureImageQuery::DirectStateAccessExt => {
                    self.mark_created();
                    gl::GetTextureImageEXT(self.id, target, level, gl_format, gl_ty, ptr);
                }
            }
        }
    }

    pub(crate) fn generate_mipmap(&self) {
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    self.bind_internal();
                    gl::GenerateMipmap(self.target);
                }
                ObjectAccess::DirectStateAccess => gl::GenerateTextureMipmap(self.id),
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::GenerateTextureMipmapEXT(self.id, self.target);
                }
            }
        }
    }

    pub(crate) fn invalidate_image(&self, level: i32) {
        if self.state.borrow().texture.invalidate == Invalidate::NoOp {
            return;
        }
        self.create_if_not_already();
        unsafe { gl::InvalidateTexImage(self.id, level) }
    }

    pub(crate) fn invalidate_sub_image(&self, level: i32, offset: &[i32], size: &[i32]) {
        if self.state.borrow().texture.invalidate == Invalidate::NoOp {
            return;
        }
        self.create_if_not_already();
        let [x, y, z] = extent3(offset, 0);
        let [w, h, d] = extent3(size, 1);
        unsafe { gl::InvalidateTexSubImage(self.id, level, x, y, z, w, h, d) }
    }

    /// Maximum absolute level of detail bias.
    pub fn max_lod_bias(ctx: &Context) -> f32 {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.texture.max_lod_bias, || unsafe {
            get_float(gl::MAX_TEXTURE_LOD_BIAS)
        })
    }

    /// Maximum anisotropy, `0.0` without anisotropic filtering support.
    pub fn max_max_anisotropy(ctx: &Context) -> f32 {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        if !state.texture.anisotropy_supported {
            return 0.0;
        }
        cached_limit(&mut state.texture.max_max_anisotropy, || unsafe {
            get_float(gl::MAX_TEXTURE_MAX_ANISOTROPY)
        })
    }

    /// Maximum samples of multisample color textures, `0` without
    /// `ARB_texture_multisample`.
    pub fn max_color_samples(ctx: &Context) -> i32 {
        if !ctx.is_extension_supported(&extensions::ARB_TEXTURE_MULTISAMPLE) {
            return 0;
        }
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.texture.max_color_samples, || unsafe {
            get_integer(gl::MAX_COLOR_TEXTURE_SAMPLES)
        })
    }

    /// Maximum samples of multisample depth textures, `0` without
    /// `ARB_texture_multisample`.
    pub fn max_depth_samples(ctx: &Context) -> i32 {
        if !ctx.is_extension_supported(&extensions::ARB_TEXTURE_MULTISAMPLE) {
            return 0;
        }
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.texture.max_depth_samples, || unsafe {
            get_integer(gl::MAX_DEPTH_TEXTURE_SAMPLES)
        })
    }

    /// Maximum samples of multisample integer textures, `0` without
    /// `ARB_texture_multisample`.
    pub fn max_integer_samples(ctx: &Context) -> i32 {
        if !ctx.is_extension_supported(&extensions::ARB_TEXTURE_MULTISAMPLE) {
            return 0;
        }
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.texture.max_integer_samples, || unsafe {
            get_integer(gl::MAX_INTEGER_SAMPLES)
        })
    }

    /// Maximum layer count of array textures.
    pub fn max_array_layers(ctx: &Context) -> i32 {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.texture.max_array_layers, || unsafe {
            get_integer(gl::MAX_ARRAY_TEXTURE_LAYERS)
        })
    }
}

impl Drop for TextureObject {
    fn drop(&mut self) {
        if self.id == 0 || !self.flags.get().contains(ObjectFlags::DELETE_ON_DESTRUCTION) {
            return;
        }

        match self.state.try_borrow_mut() {
            Ok(mut state) => state.texture.forget(self.id),
            Err(_) => log::warn!("texture {} deleted while the binding cache was borrowed", self.id),
        }
        unsafe { gl::DeleteTextures(1, &self.id) }
    }
}

/// Sampling parameters and operations shared by all texture types.
pub trait AbstractTexture {
    fn object(&self) -> &TextureObject;

    fn id(&self) -> GLuint {
        self.object().id()
    }

    /// Bind the texture to a unit for rendering.
    fn bind(&self, unit: u32) -> Result<()> {
        self.object().bind(unit)
    }

    fn set_base_level(&mut self, level: i32) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_i(gl::TEXTURE_BASE_LEVEL, level);
        self
    }

    fn set_max_level(&mut self, level: i32) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_i(gl::TEXTURE_MAX_LEVEL, level);
        self
    }

    fn set_minification_filter(&mut self, filter: SamplerFilter, mipmap: SamplerMipmap) -> &mut Self
    where
        Self: Sized,
    {
        self.object()
            .parameter_i(gl::TEXTURE_MIN_FILTER, filter.gl_mip(mipmap) as GLint);
        self
    }

    fn set_magnification_filter(&mut self, filter: SamplerFilter) -> &mut Self
    where
        Self: Sized,
    {
        self.object()
            .parameter_i(gl::TEXTURE_MAG_FILTER, GLenum::from(filter) as GLint);
        self
    }

    fn set_min_lod(&mut self, lod: f32) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_f(gl::TEXTURE_MIN_LOD, lod);
        self
    }

    fn set_max_lod(&mut self, lod: f32) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_f(gl::TEXTURE_MAX_LOD, lod);
        self
    }

    fn set_lod_bias(&mut self, bias: f32) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_f(gl::TEXTURE_LOD_BIAS, bias);
        self
    }

    fn set_border_color(&mut self, color: [f32; 4]) -> &mut Self
    where
        Self: Sized,
    {
        self.object().parameter_fv(gl::TEXTURE_BORDER_COLOR, &color);
        self
    }

    /// Border color for signed integer textures.
    fn set_border_color_integer(&mut self, color: [i32; 4]) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if !self.object().state.borrow().texture.integer_border_supported {
            return Err(GlStateError::MissingExtension(
                extensions::EXT_TEXTURE_INTEGER.name(),
            ));
        }
        self.object()
            .parameter_integer_iv(gl::TEXTURE_BORDER_COLOR, &color);
        Ok(self)
    }

    /// Border color for unsigned integer textures.
    fn set_border_color_unsigned(&mut self, color: [u32; 4]) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if !self.object().state.borrow().texture.integer_border_supported {
            return Err(GlStateError::MissingExtension(
                extensions::EXT_TEXTURE_INTEGER.name(),
            ));
        }
        self.object()
            .parameter_integer_uiv(gl::TEXTURE_BORDER_COLOR, &color);
        Ok(self)
    }

    /// Does nothing without anisotropic filtering support.
    fn set_max_anisotropy(&mut self, anisotropy: f32) -> &mut Self
    where
        Self: Sized,
    {
        if self.object().state.borrow().texture.anisotropy_supported {
            self.object()
                .parameter_f(gl::TEXTURE_MAX_ANISOTROPY, anisotropy);
        }
        self
    }

    /// Does nothing without `EXT_texture_sRGB_decode`.
    fn set_srgb_decode(&mut self, decode: bool) -> &mut Self
    where
        Self: Sized,
    {
        if self.object().state.borrow().texture.srgb_decode_supported {
            let value = if decode { DECODE_EXT } else { SKIP_DECODE_EXT };
            self.object()
                .parameter_i(TEXTURE_SRGB_DECODE_EXT, value as GLint);
        }
        self
    }

    fn set_swizzle(&mut self, swizzle: [Swizzle; 4]) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if !self.object().state.borrow().texture.swizzle_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_TEXTURE_SWIZZLE.name(),
            ));
        }
        let values = swizzle.map(|s| s as GLint);
        self.object().parameter_iv(gl::TEXTURE_SWIZZLE_RGBA, &values);
        Ok(self)
    }

    fn set_compare_mode(&mut self, mode: SamplerCompareMode) -> &mut Self
    where
        Self: Sized,
    {
        self.object()
            .parameter_i(gl::TEXTURE_COMPARE_MODE, GLenum::from(mode) as GLint);
        self
    }

    fn set_compare_function(&mut self, function: SamplerCompareFunction) -> &mut Self
    where
        Self: Sized,
    {
        self.object()
            .parameter_i(gl::TEXTURE_COMPARE_FUNC, GLenum::from(function) as GLint);
        self
    }

    fn set_depth_stencil_mode(&mut self, mode: SamplerDepthStencilMode) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if !self.object().state.borrow().texture.stencil_texturing_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_STENCIL_TEXTURING.name(),
            ));
        }
        self.object()
            .parameter_i(gl::DEPTH_STENCIL_TEXTURE_MODE, GLenum::from(mode) as GLint);
        Ok(self)
    }

    fn generate_mipmap(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.object().generate_mipmap();
        self
    }

    /// Does nothing without `ARB_invalidate_subdata`.
    fn invalidate_image(&mut self, level: i32) {
        self.object().invalidate_image(level);
    }
}

/// A one-, two- or three-dimensional texture.
pub struct Texture<const N: usize> {
    object: TextureObject,
}

pub type Texture1D = Texture<1>;
pub type Texture2D = Texture<2>;
pub type Texture3D = Texture<3>;

const fn target_for(dimensions: usize) -> GLenum {
    match dimensions {
        1 => gl::TEXTURE_1D,
        2 => gl::TEXTURE_2D,
        _ => gl::TEXTURE_3D,
    }
}

impl<const N: usize> AbstractTexture for Texture<N> {
    fn object(&self) -> &TextureObject {
        &self.object
    }
}

impl<const N: usize> Texture<N> {
    const TARGET: GLenum = target_for(N);

    pub fn new(ctx: &Context) -> Self {
        Texture {
            object: TextureObject::new(ctx, Self::TARGET),
        }
    }

    /// Wrap an existing texture object.
    pub fn wrap(ctx: &Context, id: GLuint, flags: ObjectFlags) -> Self {
        Texture {
            object: TextureObject::wrap(ctx, Self::TARGET, id, flags),
        }
    }

    /// Release the object so it isn't deleted on drop, returning its id.
    pub fn release(mut self) -> GLuint {
        self.object.release()
    }

    pub fn as_object(&self) -> &TextureObject {
        &self.object
    }

    /// Maximum size in each dimension.
    pub fn max_size(ctx: &Context) -> [i32; N] {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        let size = if N == 3 {
            cached_limit(&mut state.texture.max_3d_size, || unsafe {
                get_integer(gl::MAX_3D_TEXTURE_SIZE)
            })
        } else {
            cached_limit(&mut state.texture.max_size, || unsafe {
                get_integer(gl::MAX_TEXTURE_SIZE)
            })
        };
        [size; N]
    }

    pub fn set_wrapping(&mut self, wrapping: [SamplerWrapping; N]) -> &mut Self {
        self.object.set_wrapping(&wrapping);
        self
    }

    /// Allocate immutable storage for `levels` mip levels.
    pub fn set_storage(&mut self, levels: i32, internal_format: TextureFormat, size: [i32; N]) -> &mut Self {
        self.object
            .storage(levels, internal_format, &size, &[Self::TARGET]);
        self
    }

    /// Allocate immutable storage for the full mip chain.
    pub fn set_storage_with_mipmaps(&mut self, internal_format: TextureFormat, size: [i32; N]) -> &mut Self {
        self.set_storage(calc_miplevel(&size), internal_format, size)
    }

    /// Specify a mutable image level.
    pub fn set_image(
        &mut self,
        level: i32,
        internal_format: TextureFormat,
        image: &ImageView<'_, N>,
    ) -> &mut Self {
        let size = image.size();
        self.object.image_raw(
            Self::TARGET,
            level,
            internal_format,
            PixelData::from_view(image, &size),
        );
        self
    }

    /// Update part of an image level.
    pub fn set_sub_image(&mut self, level: i32, offset: [i32; N], image: &ImageView<'_, N>) -> &mut Self {
        let size = image.size();
        self.object.sub_image_raw(
            Self::TARGET,
            level,
            &offset,
            PixelData::from_view(image, &size),
        );
        self
    }

    /// Size of the given mip level.
    pub fn image_size(&self, level: i32) -> [i32; N] {
        let size = self.object.image_size(Self::TARGET, level, N);
        let mut out = [0; N];
        out.copy_from_slice(&size);
        out
    }

    /// Read back a mip level.
    pub fn image(&self, level: i32, format: PixelFormat, ty: PixelType) -> Image<N> {
        let mut image = Image::zeroed(format, ty, self.image_size(level));
        if image_data_size(format, ty, &image.size(), DEFAULT_ALIGNMENT) > 0 {
            self.object
                .get_image_raw(Self::TARGET, level, format, ty, image.data_mut());
        }
        image
    }

    /// Does nothing without `ARB_invalidate_subdata`.
    pub fn invalidate_sub_image(&mut self, level: i32, offset: [i32; N], size: [i32; N]) {
        self.object.invalidate_sub_image(level, &offset, &size);
    }
}
