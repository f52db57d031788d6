//! Buffer objects.
//!
//! Buffers are bound lazily: operations that need a bound buffer first look
//! at the cached bindings and reuse any target the buffer is already bound
//! to before binding it to its target hint.
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::extensions;
use crate::object::ObjectFlags;
use crate::state::{Create, Invalidate, MultiBind, ObjectAccess, StateHandle};
use crate::util::{cached_limit, get_integer};
use bitflags::bitflags;
use bytemuck::Pod;
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint, GLintptr, GLsizei, GLsizeiptr, GLuint};
use std::cell::Cell;
use std::ffi::c_void;
use std::ptr::NonNull;

/// Binding target used when the buffer has to be bound to be edited.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetHint {
    Array = gl::ARRAY_BUFFER,
    AtomicCounter = gl::ATOMIC_COUNTER_BUFFER,
    CopyRead = gl::COPY_READ_BUFFER,
    CopyWrite = gl::COPY_WRITE_BUFFER,
    DispatchIndirect = gl::DISPATCH_INDIRECT_BUFFER,
    DrawIndirect = gl::DRAW_INDIRECT_BUFFER,
    ElementArray = gl::ELEMENT_ARRAY_BUFFER,
    PixelPack = gl::PIXEL_PACK_BUFFER,
    PixelUnpack = gl::PIXEL_UNPACK_BUFFER,
    ShaderStorage = gl::SHADER_STORAGE_BUFFER,
    Texture = gl::TEXTURE_BUFFER,
    TransformFeedback = gl::TRANSFORM_FEEDBACK_BUFFER,
    Uniform = gl::UNIFORM_BUFFER,
}

impl TargetHint {
    /// Every target, in the order used by the binding cache.
    pub const ALL: [TargetHint; 13] = [
        TargetHint::Array,
        TargetHint::AtomicCounter,
        TargetHint::CopyRead,
        TargetHint::CopyWrite,
        TargetHint::DispatchIndirect,
        TargetHint::DrawIndirect,
        TargetHint::ElementArray,
        TargetHint::PixelPack,
        TargetHint::PixelUnpack,
        TargetHint::ShaderStorage,
        TargetHint::Texture,
        TargetHint::TransformFeedback,
        TargetHint::Uniform,
    ];
}

/// Indexed binding target.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Target {
    AtomicCounter = gl::ATOMIC_COUNTER_BUFFER,
    ShaderStorage = gl::SHADER_STORAGE_BUFFER,
    Uniform = gl::UNIFORM_BUFFER,
    TransformFeedback = gl::TRANSFORM_FEEDBACK_BUFFER,
}

impl From<Target> for TargetHint {
    fn from(value: Target) -> Self {
        match value {
            Target::AtomicCounter => TargetHint::AtomicCounter,
            Target::ShaderStorage => TargetHint::ShaderStorage,
            Target::Uniform => TargetHint::Uniform,
            Target::TransformFeedback => TargetHint::TransformFeedback,
        }
    }
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    StreamDraw = gl::STREAM_DRAW,
    StreamRead = gl::STREAM_READ,
    StreamCopy = gl::STREAM_COPY,
    #[default]
    StaticDraw = gl::STATIC_DRAW,
    StaticRead = gl::STATIC_READ,
    StaticCopy = gl::STATIC_COPY,
    DynamicDraw = gl::DYNAMIC_DRAW,
    DynamicRead = gl::DYNAMIC_READ,
    DynamicCopy = gl::DYNAMIC_COPY,
}

/// Access for mapping the whole buffer.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MapAccess {
    ReadOnly = gl::READ_ONLY,
    WriteOnly = gl::WRITE_ONLY,
    ReadWrite = gl::READ_WRITE,
}

bitflags! {
    /// Flags for mapping a buffer range.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct MapFlags: u32 {
        const READ = gl::MAP_READ_BIT;
        const WRITE = gl::MAP_WRITE_BIT;
        const INVALIDATE_RANGE = gl::MAP_INVALIDATE_RANGE_BIT;
        const INVALIDATE_BUFFER = gl::MAP_INVALIDATE_BUFFER_BIT;
        const FLUSH_EXPLICIT = gl::MAP_FLUSH_EXPLICIT_BIT;
        const UNSYNCHRONIZED = gl::MAP_UNSYNCHRONIZED_BIT;
        const PERSISTENT = gl::MAP_PERSISTENT_BIT;
        const COHERENT = gl::MAP_COHERENT_BIT;
    }
}

/// A buffer object.
pub struct Buffer {
    state: StateHandle,
    id: GLuint,
    target_hint: TargetHint,
    flags: Cell<ObjectFlags>,
}

impl Buffer {
    /// Create a new buffer.
    ///
    /// Without `ARB_direct_state_access` only the name is reserved and the
    /// object is created the first time it's bound.
    pub fn new(ctx: &Context, target_hint: TargetHint) -> Buffer {
        let state = ctx.state();
        let create = state.borrow().buffer.create;

        let mut id = 0;
        let flags = match create {
            Create::Gen => {
                unsafe { gl::GenBuffers(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION
            }
            Create::DirectStateAccess => {
                unsafe { gl::CreateBuffers(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION | ObjectFlags::CREATED
            }
        };
        // a fresh name is bound nowhere, whatever a missed forget left behind
        state.borrow_mut().buffer.forget(id);

        Buffer {
            state,
            id,
            target_hint,
            flags: Cell::new(flags),
        }
    }

    /// Wrap an existing buffer object.
    ///
    /// The object is deleted on drop only with
    /// [`ObjectFlags::DELETE_ON_DESTRUCTION`].
    pub fn wrap(ctx: &Context, id: GLuint, target_hint: TargetHint, flags: ObjectFlags) -> Buffer {
        Buffer {
            state: ctx.state(),
            id,
            target_hint,
            flags: Cell::new(flags),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags.get()
    }

    /// Release the object so it isn't deleted on drop, returning its id.
    pub fn release(mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }

    pub fn target_hint(&self) -> TargetHint {
        self.target_hint
    }

    pub fn set_target_hint(&mut self, hint: TargetHint) -> &mut Self {
        self.target_hint = hint;
        self
    }

    fn mark_created(&self) {
        self.flags.set(self.flags.get() | ObjectFlags::CREATED);
    }

    /// Bind to the target unless the cache says it already is bound there.
    pub(crate) fn bind_internal(&self, target: TargetHint) {
        let needs_bind = self.state.borrow_mut().buffer.bind(target, self.id);
        if needs_bind {
            self.mark_created();
            unsafe { gl::BindBuffer(target as GLenum, self.id) }
        }
    }

    /// Bind the buffer somewhere so it can be edited, returning the target.
    fn bind_somewhere_internal(&self, hint: TargetHint) -> TargetHint {
        let (target, needs_bind) = self.state.borrow_mut().buffer.bind_somewhere(hint, self.id);
        if needs_bind {
            self.mark_created();
            unsafe { gl::BindBuffer(target as GLenum, self.id) }
        }
        target
    }

    /// `glGen*` only reserves the name, some entry points need the object.
    pub(crate) fn create_if_not_already(&self) {
        if self.flags.get().contains(ObjectFlags::CREATED) {
            return;
        }
        self.bind_somewhere_internal(self.target_hint);
    }

    fn access(&self) -> ObjectAccess {
        self.state.borrow().buffer.access
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> usize {
        let mut size: GLint = 0;
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::GetBufferParameteriv(target as GLenum, gl::BUFFER_SIZE, &mut size);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::GetNamedBufferParameteriv(self.id, gl::BUFFER_SIZE, &mut size);
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::GetNamedBufferParameterivEXT(self.id, gl::BUFFER_SIZE, &mut size);
                }
            }
        }
        size.max(0) as usize
    }

    /// Replace the buffer contents.
    pub fn set_data<T: Pod>(&mut self, data: &[T], usage: BufferUsage) -> &mut Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.set_data_raw(bytes.len(), bytes.as_ptr().cast(), usage);
        self
    }

    /// Allocate storage of the given size without initializing it.
    pub fn allocate(&mut self, size: usize, usage: BufferUsage) -> &mut Self {
        self.set_data_raw(size, std::ptr::null(), usage);
        self
    }

    fn set_data_raw(&self, size: usize, data: *const c_void, usage: BufferUsage) {
        let size = size as GLsizeiptr;
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::BufferData(target as GLenum, size, data, usage as GLenum);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::NamedBufferData(self.id, size, data, usage as GLenum);
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::NamedBufferDataEXT(self.id, size, data, usage as GLenum);
                }
            }
        }
    }

    /// Replace part of the buffer contents, starting at `offset` bytes.
    pub fn set_sub_data<T: Pod>(&mut self, offset: usize, data: &[T]) -> &mut Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let (offset, size, ptr) = (
            offset as GLintptr,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr().cast(),
        );
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::BufferSubData(target as GLenum, offset, size, ptr);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::NamedBufferSubData(self.id, offset, size, ptr);
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::NamedBufferSubDataEXT(self.id, offset, size, ptr);
                }
            }
        }
        self
    }

    /// Read the whole buffer.
    pub fn data<T: Pod>(&self) -> Vec<T> {
        let count = self.size() / std::mem::size_of::<T>().max(1);
        self.sub_data(0, count)
    }

    /// Read `count` items starting at `offset` bytes.
    pub fn sub_data<T: Pod>(&self, offset: usize, count: usize) -> Vec<T> {
        let mut data = vec![T::zeroed(); count];
        if count == 0 {
            return data;
        }

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut data);
        let (offset, size, ptr) = (
            offset as GLintptr,
            bytes.len() as GLsizeiptr,
            bytes.as_mut_ptr().cast(),
        );
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::GetBufferSubData(target as GLenum, offset, size, ptr);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::GetNamedBufferSubData(self.id, offset, size, ptr);
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::GetNamedBufferSubDataEXT(self.id, offset, size, ptr);
                }
            }
        }
        data
    }

    /// Hint the driver that the contents are no longer needed.
    ///
    /// Does nothing without `ARB_invalidate_subdata`.
    pub fn invalidate_data(&mut self) -> &mut Self {
        if self.state.borrow().buffer.invalidate == Invalidate::Arb {
            self.create_if_not_already();
            unsafe { gl::InvalidateBufferData(self.id) }
        }
        self
    }

    /// Hint the driver that part of the contents is no longer needed.
    ///
    /// Does nothing without `ARB_invalidate_subdata`.
    pub fn invalidate_sub_data(&mut self, offset: usize, length: usize) -> &mut Self {
        if self.state.borrow().buffer.invalidate == Invalidate::Arb {
            self.create_if_not_already();
            unsafe {
                gl::InvalidateBufferSubData(self.id, offset as GLintptr, length as GLsizeiptr)
            }
        }
        self
    }

    /// Map the whole buffer.
    pub fn map(&mut self, access: MapAccess) -> Result<BufferMapping<'_>> {
        let len = self.size();
        let ptr = unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::MapBuffer(target as GLenum, access as GLenum)
                }
                ObjectAccess::DirectStateAccess => gl::MapNamedBuffer(self.id, access as GLenum),
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::MapNamedBufferEXT(self.id, access as GLenum)
                }
            }
        };

        let (readable, writable) = match access {
            MapAccess::ReadOnly => (true, false),
            MapAccess::WriteOnly => (false, true),
            MapAccess::ReadWrite => (true, true),
        };
        BufferMapping::new(self, ptr, len, readable, writable)
    }

    /// Map a range of the buffer.
    pub fn map_range(
        &mut self,
        offset: usize,
        length: usize,
        flags: MapFlags,
    ) -> Result<BufferMapping<'_>> {
        let (gl_offset, gl_length) = (offset as GLintptr, length as GLsizeiptr);
        let ptr = unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::MapBufferRange(target as GLenum, gl_offset, gl_length, flags.bits())
                }
                ObjectAccess::DirectStateAccess => {
                    gl::MapNamedBufferRange(self.id, gl_offset, gl_length, flags.bits())
                }
                ObjectAccess::DirectStateAccessExt => {
                    self.mark_created();
                    gl::MapNamedBufferRangeEXT(self.id, gl_offset, gl_length, flags.bits())
                }
            }
        };

        BufferMapping::new(
            self,
            ptr,
            length,
            flags.contains(MapFlags::READ),
            flags.contains(MapFlags::WRITE),
        )
    }

    fn flush_mapped_range(&self, offset: usize, length: usize) {
        let (offset, length) = (offset as GLintptr, length as GLsizeiptr);
        unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::FlushMappedBufferRange(target as GLenum, offset, length);
                }
                ObjectAccess::DirectStateAccess => {
                    gl::FlushMappedNamedBufferRange(self.id, offset, length);
                }
                ObjectAccess::DirectStateAccessExt => {
                    gl::FlushMappedNamedBufferRangeEXT(self.id, offset, length);
                }
            }
        }
    }

    fn unmap(&self) -> bool {
        let result = unsafe {
            match self.access() {
                ObjectAccess::Bind => {
                    let target = self.bind_somewhere_internal(self.target_hint);
                    gl::UnmapBuffer(target as GLenum)
                }
                ObjectAccess::DirectStateAccess => gl::UnmapNamedBuffer(self.id),
                ObjectAccess::DirectStateAccessExt => gl::UnmapNamedBufferEXT(self.id),
            }
        };
        result != gl::FALSE
    }

    /// Bind the buffer to an indexed target.
    ///
    /// This also replaces the generic binding of the target.
    pub fn bind(&self, target: Target, index: u32) -> &Self {
        self.create_if_not_already();
        self.state.borrow_mut().buffer.bind(target.into(), self.id);
        unsafe { gl::BindBufferBase(target as GLenum, index, self.id) }
        self
    }

    /// Bind a range of the buffer to an indexed target.
    pub fn bind_range(&self, target: Target, index: u32, offset: usize, size: usize) -> &Self {
        self.create_if_not_already();
        self.state.borrow_mut().buffer.bind(target.into(), self.id);
        unsafe {
            gl::BindBufferRange(
                target as GLenum,
                index,
                self.id,
                offset as GLintptr,
                size as GLsizeiptr,
            )
        }
        self
    }

    /// Unbind an indexed target.
    pub fn unbind(ctx: &Context, target: Target, index: u32) {
        ctx.state().borrow_mut().buffer.bind(target.into(), 0);
        unsafe { gl::BindBufferBase(target as GLenum, index, 0) }
    }

    /// Unbind a consecutive range of indexed targets.
    pub fn unbind_many(ctx: &Context, target: Target, first: u32, count: u32) {
        let state = ctx.state();
        let multi_bind = state.borrow().buffer.multi_bind;
        match multi_bind {
            MultiBind::Fallback => {
                state.borrow_mut().buffer.bind(target.into(), 0);
                for index in first..first + count {
                    unsafe { gl::BindBufferBase(target as GLenum, index, 0) }
                }
            }
            MultiBind::Multi => {
                state.borrow_mut().buffer.disengage(target.into());
                unsafe {
                    gl::BindBuffersBase(target as GLenum, first, count as GLsizei, std::ptr::null())
                }
            }
        }
    }

    /// Bind buffers to consecutive indices, unbinding the `None` slots.
    ///
    /// With `ARB_multi_bind` the generic binding of the target is left to
    /// the driver and is rebound before the next edit through it.
    pub fn bind_many(ctx: &Context, target: Target, first: u32, buffers: &[Option<&Buffer>]) {
        let state = ctx.state();
        let multi_bind = state.borrow().buffer.multi_bind;

        match multi_bind {
            MultiBind::Fallback => {
                for (i, buffer) in buffers.iter().enumerate() {
                    let index = first + i as u32;
                    match buffer {
                        Some(buffer) => {
                            buffer.bind(target, index);
                        }
                        None => Buffer::unbind(ctx, target, index),
                    }
                }
            }
            MultiBind::Multi => {
                let ids: Vec<GLuint> = buffers
                    .iter()
                    .map(|buffer| match buffer {
                        Some(buffer) => {
                            buffer.create_if_not_already();
                            buffer.id
                        }
                        None => 0,
                    })
                    .collect();

                state.borrow_mut().buffer.disengage(target.into());

                let ptr = if ids.iter().all(|id| *id == 0) {
                    std::ptr::null()
                } else {
                    ids.as_ptr()
                };
                unsafe { gl::BindBuffersBase(target as GLenum, first, ids.len() as GLsizei, ptr) }
            }
        }
    }

    /// Bind buffer ranges `(buffer, offset, size)` to consecutive indices,
    /// unbinding the `None` slots.
    pub fn bind_ranges(
        ctx: &Context,
        target: Target,
        first: u32,
        ranges: &[Option<(&Buffer, usize, usize)>],
    ) {
        let state = ctx.state();
        let multi_bind = state.borrow().buffer.multi_bind;

        match multi_bind {
            MultiBind::Fallback => {
                for (i, range) in ranges.iter().enumerate() {
                    let index = first + i as u32;
                    match range {
                        Some((buffer, offset, size)) => {
                            buffer.bind_range(target, index, *offset, *size);
                        }
                        None => Buffer::unbind(ctx, target, index),
                    }
                }
            }
            MultiBind::Multi => {
                let mut ids = Vec::with_capacity(ranges.len());
                let mut offsets = Vec::with_capacity(ranges.len());
                let mut sizes = Vec::with_capacity(ranges.len());
                for range in ranges {
                    match range {
                        Some((buffer, offset, size)) => {
                            buffer.create_if_not_already();
                            ids.push(buffer.id);
                            offsets.push(*offset as GLintptr);
                            sizes.push(*size as GLsizeiptr);
                        }
                        // Some NVidia drivers reject zero sizes even for
                        // unbound slots.
                        None => {
                            ids.push(0);
                            offsets.push(0);
                            sizes.push(1);
                        }
                    }
                }

                state.borrow_mut().buffer.disengage(target.into());

                unsafe {
                    gl::BindBuffersRange(
                        target as GLenum,
                        first,
                        ids.len() as GLsizei,
                        ids.as_ptr(),
                        offsets.as_ptr(),
                        sizes.as_ptr(),
                    )
                }
            }
        }
    }

    /// Copy `size` bytes between buffers. Needs `ARB_copy_buffer`.
    pub fn copy(
        read: &Buffer,
        write: &mut Buffer,
        read_offset: usize,
        write_offset: usize,
        size: usize,
    ) -> Result<()> {
        if !read.state.borrow().buffer.copy_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_COPY_BUFFER.name(),
            ));
        }

        let (read_offset, write_offset, size) = (
            read_offset as GLintptr,
            write_offset as GLintptr,
            size as GLsizeiptr,
        );
        unsafe {
            match read.access() {
                ObjectAccess::Bind => {
                    read.bind_internal(TargetHint::CopyRead);
                    write.bind_internal(TargetHint::CopyWrite);
                    gl::CopyBufferSubData(
                        gl::COPY_READ_BUFFER,
                        gl::COPY_WRITE_BUFFER,
                        read_offset,
                        write_offset,
                        size,
                    );
                }
                ObjectAccess::DirectStateAccess => {
                    gl::CopyNamedBufferSubData(read.id, write.id, read_offset, write_offset, size);
                }
                ObjectAccess::DirectStateAccessExt => {
                    read.mark_created();
                    write.mark_created();
                    gl::NamedCopyBufferSubDataEXT(
                        read.id,
                        write.id,
                        read_offset,
                        write_offset,
                        size,
                    );
                }
            }
        }
        Ok(())
    }

    /// Alignment of pointers returned by [`Buffer::map_range`].
    ///
    /// `1` without `ARB_map_buffer_alignment`.
    pub fn min_map_alignment(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.map_alignment_supported {
            return 1;
        }
        cached_limit(&mut state.min_map_alignment, || unsafe {
            get_integer(gl::MIN_MAP_BUFFER_ALIGNMENT)
        })
    }

    /// `0` without `ARB_shader_atomic_counters`.
    pub fn max_atomic_counter_bindings(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.atomic_counters_supported {
            return 0;
        }
        cached_limit(&mut state.max_atomic_counter_bindings, || unsafe {
            get_integer(gl::MAX_ATOMIC_COUNTER_BUFFER_BINDINGS)
        })
    }

    /// `0` without `ARB_shader_storage_buffer_object`.
    pub fn max_shader_storage_bindings(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.shader_storage_supported {
            return 0;
        }
        cached_limit(&mut state.max_shader_storage_bindings, || unsafe {
            get_integer(gl::MAX_SHADER_STORAGE_BUFFER_BINDINGS)
        })
    }

    /// `1` without `ARB_uniform_buffer_object`.
    pub fn uniform_offset_alignment(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.uniform_buffers_supported {
            return 1;
        }
        cached_limit(&mut state.uniform_offset_alignment, || unsafe {
            get_integer(gl::UNIFORM_BUFFER_OFFSET_ALIGNMENT)
        })
    }

    /// `1` without `ARB_shader_storage_buffer_object`.
    pub fn shader_storage_offset_alignment(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.shader_storage_supported {
            return 1;
        }
        cached_limit(&mut state.shader_storage_offset_alignment, || unsafe {
            get_integer(gl::SHADER_STORAGE_BUFFER_OFFSET_ALIGNMENT)
        })
    }

    /// `0` without `ARB_uniform_buffer_object`.
    pub fn max_uniform_bindings(ctx: &Context) -> i32 {
        let state = ctx.state();
        let state = &mut state.borrow_mut().buffer;
        if !state.uniform_buffers_supported {
            return 0;
        }
        cached_limit(&mut state.max_uniform_bindings, || unsafe {
            get_integer(gl::MAX_UNIFORM_BUFFER_BINDINGS)
        })
    }

    /// Whether [`Buffer::copy`] is available.
    pub fn is_copy_supported(ctx: &Context) -> bool {
        ctx.state().borrow().buffer.copy_supported
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.id == 0 || !self.flags.get().contains(ObjectFlags::DELETE_ON_DESTRUCTION) {
            return;
        }

        match self.state.try_borrow_mut() {
            Ok(mut state) => state.buffer.forget(self.id),
            Err(_) => log::warn!("buffer {} deleted while the binding cache was borrowed", self.id),
        }
        unsafe { gl::DeleteBuffers(1, &self.id) }
    }
}

/// A mapped buffer range, unmapped when dropped.
pub struct BufferMapping<'a> {
    buffer: &'a mut Buffer,
    ptr: NonNull<u8>,
    len: usize,
    readable: bool,
    writable: bool,
    unmapped: bool,
}

impl<'a> BufferMapping<'a> {
    fn new(
        buffer: &'a mut Buffer,
        ptr: *mut c_void,
        len: usize,
        readable: bool,
        writable: bool,
    ) -> Result<Self> {
        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or(GlStateError::MapFailed)?;
        Ok(BufferMapping {
            buffer,
            ptr,
            len,
            readable,
            writable,
            unmapped: false,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The mapped memory, `None` unless it was mapped for reading.
    pub fn as_slice(&self) -> Option<&[u8]> {
        self.readable
            .then(|| unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) })
    }

    /// The mapped memory, `None` unless it was mapped for writing.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        if !self.writable {
            return None;
        }
        Some(unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) })
    }

    /// Flush a range of a mapping made with [`MapFlags::FLUSH_EXPLICIT`].
    /// The offset is relative to the mapped range.
    pub fn flush_range(&self, offset: usize, length: usize) {
        self.buffer.flush_mapped_range(offset, length);
    }

    /// Unmap the buffer.
    ///
    /// Returns `false` if the contents got corrupted while mapped, for
    /// example after a display mode change.
    pub fn unmap(mut self) -> bool {
        self.unmapped = true;
        self.buffer.unmap()
    }
}

impl Drop for BufferMapping<'_> {
    fn drop(&mut self) {
        if !self.unmapped {
            self.buffer.unmap();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::States;
    use crate::recording::{self, take_calls, Call};

    #[test]
    fn multi_bind_leaves_generic_binding_to_the_driver() {
        let ctx = recording::context(3, 3, &["GL_ARB_multi_bind"]);
        let mut a = Buffer::wrap(&ctx, 1, TargetHint::Uniform, ObjectFlags::CREATED);
        let mut b = Buffer::wrap(&ctx, 2, TargetHint::Uniform, ObjectFlags::CREATED);

        a.set_data(&[0u32], BufferUsage::StaticDraw);
        Buffer::bind_many(&ctx, Target::Uniform, 0, &[Some(&b)]);
        b.set_data(&[0u32; 4], BufferUsage::StaticDraw);
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffer(gl::UNIFORM_BUFFER, 1),
                Call::BufferData(gl::UNIFORM_BUFFER, 4),
                Call::BindBuffersBase(gl::UNIFORM_BUFFER, 0, vec![2]),
                Call::BindBuffer(gl::UNIFORM_BUFFER, 2),
                Call::BufferData(gl::UNIFORM_BUFFER, 16),
            ]
        );

        Buffer::bind_ranges(&ctx, Target::Uniform, 1, &[None, Some((&a, 0, 4))]);
        a.set_sub_data(0, &[1u32]);
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffersRange(gl::UNIFORM_BUFFER, 1, vec![0, 1]),
                Call::BindBuffer(gl::UNIFORM_BUFFER, 1),
                Call::BufferSubData(gl::UNIFORM_BUFFER, 0, 4),
            ]
        );
    }

    #[test]
    fn single_indexed_bind_updates_generic_binding() {
        let ctx = recording::context(3, 3, &[]);
        let mut a = Buffer::wrap(&ctx, 1, TargetHint::Uniform, ObjectFlags::CREATED);

        a.bind(Target::Uniform, 3);
        a.set_sub_data(0, &[1u32]);
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBufferBase(gl::UNIFORM_BUFFER, 3, 1),
                Call::BufferSubData(gl::UNIFORM_BUFFER, 0, 4),
            ]
        );
    }

    #[test]
    fn copy_needs_copy_buffer() {
        let ctx = recording::context(3, 0, &[]);
        assert!(!Buffer::is_copy_supported(&ctx));
        let read = Buffer::wrap(&ctx, 1, TargetHint::Array, ObjectFlags::CREATED);
        let mut write = Buffer::wrap(&ctx, 2, TargetHint::Array, ObjectFlags::CREATED);
        assert!(matches!(
            Buffer::copy(&read, &mut write, 0, 0, 8),
            Err(GlStateError::MissingExtension("GL_ARB_copy_buffer"))
        ));
        assert!(take_calls().is_empty());

        let ctx = recording::context(3, 1, &[]);
        let read = Buffer::wrap(&ctx, 1, TargetHint::Array, ObjectFlags::CREATED);
        let mut write = Buffer::wrap(&ctx, 2, TargetHint::Array, ObjectFlags::CREATED);
        assert!(Buffer::copy(&read, &mut write, 0, 4, 8).is_ok());
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffer(gl::COPY_READ_BUFFER, 1),
                Call::BindBuffer(gl::COPY_WRITE_BUFFER, 2),
                Call::CopyBufferSubData(gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER, 8),
            ]
        );
    }

    #[test]
    fn edits_reuse_an_existing_binding() {
        let ctx = recording::context(3, 3, &[]);
        let mut buffer = Buffer::wrap(&ctx, 5, TargetHint::Uniform, ObjectFlags::CREATED);

        buffer.bind_internal(TargetHint::Array);
        buffer.set_sub_data(4, &[0u16; 2]);
        buffer.set_data(&[0u8; 3], BufferUsage::DynamicDraw);
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffer(gl::ARRAY_BUFFER, 5),
                Call::BufferSubData(gl::ARRAY_BUFFER, 4, 4),
                Call::BufferData(gl::ARRAY_BUFFER, 3),
            ]
        );
    }

    #[test]
    fn reset_state_reaches_the_driver() {
        let ctx = recording::context(3, 3, &[]);
        let buffer = Buffer::wrap(&ctx, 5, TargetHint::Array, ObjectFlags::CREATED);

        buffer.bind_internal(TargetHint::Array);
        buffer.bind_internal(TargetHint::Array);
        assert_eq!(take_calls(), vec![Call::BindBuffer(gl::ARRAY_BUFFER, 5)]);

        ctx.reset_state(States::BUFFERS);
        buffer.bind_internal(TargetHint::Array);
        assert_eq!(take_calls(), vec![Call::BindBuffer(gl::ARRAY_BUFFER, 5)]);
    }

    #[test]
    fn mapping_follows_access() {
        let ctx = recording::context(3, 3, &[]);
        let mut buffer = Buffer::wrap(&ctx, 1, TargetHint::Array, ObjectFlags::CREATED);

        {
            let mut mapping = buffer.map(MapAccess::ReadOnly).unwrap();
            assert_eq!(mapping.len(), recording::BUFFER_SIZE);
            assert_eq!(mapping.as_slice().map(<[u8]>::len), Some(recording::BUFFER_SIZE));
            assert!(mapping.as_mut_slice().is_none());
        }
        {
            let mut mapping = buffer.map(MapAccess::WriteOnly).unwrap();
            assert!(mapping.as_slice().is_none());
            if let Some(memory) = mapping.as_mut_slice() {
                memory[0] = 0xff;
            }
            assert!(mapping.unmap());
        }

        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffer(gl::ARRAY_BUFFER, 1),
                Call::MapBuffer(gl::ARRAY_BUFFER, gl::READ_ONLY),
                Call::UnmapBuffer(gl::ARRAY_BUFFER),
                Call::MapBuffer(gl::ARRAY_BUFFER, gl::WRITE_ONLY),
                Call::UnmapBuffer(gl::ARRAY_BUFFER),
            ]
        );
    }

    #[test]
    fn reused_name_is_bound_again() {
        let ctx = recording::context(3, 3, &[]);
        let owned = ObjectFlags::CREATED | ObjectFlags::DELETE_ON_DESTRUCTION;
        let buffer = Buffer::wrap(&ctx, 1, TargetHint::Array, owned);
        buffer.bind_internal(TargetHint::Array);

        // the cache can't be updated while borrowed
        let state = ctx.state();
        let borrowed = state.borrow();
        drop(buffer);
        drop(borrowed);

        let mut buffer = Buffer::new(&ctx, TargetHint::Array);
        assert_eq!(buffer.id(), 1);
        buffer.set_data(&[0u32], BufferUsage::StaticDraw);
        assert_eq!(
            take_calls(),
            vec![
                Call::BindBuffer(gl::ARRAY_BUFFER, 1),
                Call::DeleteBuffers(1),
                Call::BindBuffer(gl::ARRAY_BUFFER, 1),
                Call::BufferData(gl::ARRAY_BUFFER, 4),
            ]
        );
    }
}
