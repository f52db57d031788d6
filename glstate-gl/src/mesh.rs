//! Vertex array objects and draw calls.
use crate::buffer::{Buffer, TargetHint};
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::extensions;
use crate::object::ObjectFlags;
use crate::shader::Program;
use crate::state::{AttributeSetup, Create, StateHandle};
use crate::util::{cached_limit, get_integer};
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint, GLsizei, GLuint};
use std::cell::Cell;
use std::ffi::c_void;

/// Primitive assembled from the vertices.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MeshPrimitive {
    Points = gl::POINTS,
    Lines = gl::LINES,
    LineLoop = gl::LINE_LOOP,
    LineStrip = gl::LINE_STRIP,
    #[default]
    Triangles = gl::TRIANGLES,
    TriangleStrip = gl::TRIANGLE_STRIP,
    TriangleFan = gl::TRIANGLE_FAN,
    LinesAdjacency = gl::LINES_ADJACENCY,
    TrianglesAdjacency = gl::TRIANGLES_ADJACENCY,
    Patches = gl::PATCHES,
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IndexType {
    UnsignedByte = gl::UNSIGNED_BYTE,
    UnsignedShort = gl::UNSIGNED_SHORT,
    UnsignedInt = gl::UNSIGNED_INT,
}

impl IndexType {
    /// Size of one index in bytes.
    pub fn size(self) -> usize {
        match self {
            IndexType::UnsignedByte => 1,
            IndexType::UnsignedShort => 2,
            IndexType::UnsignedInt => 4,
        }
    }
}

/// Component type of a vertex attribute in the buffer.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VertexAttributeType {
    Byte = gl::BYTE,
    UnsignedByte = gl::UNSIGNED_BYTE,
    Short = gl::SHORT,
    UnsignedShort = gl::UNSIGNED_SHORT,
    Int = gl::INT,
    UnsignedInt = gl::UNSIGNED_INT,
    HalfFloat = gl::HALF_FLOAT,
    Float = gl::FLOAT,
    Double = gl::DOUBLE,
}

/// How the shader sees a vertex attribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttributeKind {
    /// Floating-point input, integer data optionally normalized.
    Float { normalized: bool },
    /// Integer input.
    Integer,
    /// Double-precision input. Needs `ARB_vertex_attrib_64bit`.
    Long,
}

/// One attribute of an interleaved vertex buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub ty: VertexAttributeType,
    pub kind: AttributeKind,
    /// Offset from the start of the vertex.
    pub offset: u32,
}

impl VertexAttribute {
    pub fn new(location: u32, components: i32, ty: VertexAttributeType) -> Self {
        let kind = match ty {
            VertexAttributeType::Double => AttributeKind::Long,
            _ => AttributeKind::Float { normalized: false },
        };
        VertexAttribute {
            location,
            components,
            ty,
            kind,
            offset: 0,
        }
    }

    pub fn with_kind(mut self, kind: AttributeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct IndexBinding {
    pub offset: usize,
    pub ty: IndexType,
    pub start: u32,
    pub end: u32,
}

/// Everything a single draw call needs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct DrawParams {
    pub count: i32,
    pub base_vertex: i32,
    pub instance_count: i32,
    pub base_instance: u32,
    pub index: Option<IndexBinding>,
}

#[derive(Debug)]
pub struct Mesh {
    state: StateHandle,
    id: GLuint,
    flags: Cell<ObjectFlags>,
    primitive: MeshPrimitive,
    count: i32,
    base_vertex: i32,
    instance_count: i32,
    base_instance: u32,
    index: Option<IndexBinding>,
    next_binding: u32,
}

impl Mesh {
    pub fn new(ctx: &Context, primitive: MeshPrimitive) -> Mesh {
        let state = ctx.state();
        let create = state.borrow().mesh.create;

        let mut id = 0;
        let flags = match create {
            Create::Gen => {
                unsafe { gl::GenVertexArrays(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION
            }
            Create::DirectStateAccess => {
                unsafe { gl::CreateVertexArrays(1, &mut id) };
                ObjectFlags::DELETE_ON_DESTRUCTION | ObjectFlags::CREATED
            }
        };
        state.borrow_mut().mesh.forget(id);

        Mesh {
            state,
            id,
            flags: Cell::new(flags),
            primitive,
            count: 0,
            base_vertex: 0,
            instance_count: 1,
            base_instance: 0,
            index: None,
            next_binding: 0,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags.get()
    }

    pub fn primitive(&self) -> MeshPrimitive {
        self.primitive
    }

    pub fn set_primitive(&mut self, primitive: MeshPrimitive) -> &mut Self {
        self.primitive = primitive;
        self
    }

    /// Vertex count, or index count for indexed meshes.
    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn set_count(&mut self, count: i32) -> &mut Self {
        self.count = count;
        self
    }

    pub fn base_vertex(&self) -> i32 {
        self.base_vertex
    }

    pub fn set_base_vertex(&mut self, base_vertex: i32) -> &mut Self {
        self.base_vertex = base_vertex;
        self
    }

    pub fn instance_count(&self) -> i32 {
        self.instance_count
    }

    pub fn set_instance_count(&mut self, count: i32) -> &mut Self {
        self.instance_count = count;
        self
    }

    pub fn base_instance(&self) -> u32 {
        self.base_instance
    }

    pub fn set_base_instance(&mut self, base_instance: u32) -> &mut Self {
        self.base_instance = base_instance;
        self
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    pub fn index_type(&self) -> Option<IndexType> {
        self.index.map(|index| index.ty)
    }

    pub(crate) fn index_binding(&self) -> Option<IndexBinding> {
        self.index
    }

    pub(crate) fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Maximum number of vertex attributes.
    pub fn max_vertex_attributes(ctx: &Context) -> i32 {
        let state = ctx.state();
        let mut state = state.borrow_mut();
        cached_limit(&mut state.mesh.max_vertex_attributes, || unsafe {
            get_integer(gl::MAX_VERTEX_ATTRIBS)
        })
    }

    /// Binding a different vertex array also switches the index buffer.
    pub(crate) fn bind_vao(&self) {
        let mut state = self.state.borrow_mut();
        if !state.mesh.bind_vao(self.id) {
            return;
        }
        state.buffer.disengage(TargetHint::ElementArray);
        drop(state);

        unsafe { gl::BindVertexArray(self.id) }
        self.flags.set(self.flags.get() | ObjectFlags::CREATED);
    }

    /// Attach an interleaved vertex buffer. The attributes are read from
    /// `offset` on, every `stride` bytes.
    pub fn add_vertex_buffer(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        stride: i32,
        divisor: u32,
        attributes: &[VertexAttribute],
    ) -> Result<&mut Self> {
        let (setup, divisor_supported, long_supported) = {
            let state = self.state.borrow();
            (
                state.mesh.attribute_setup,
                state.mesh.divisor_supported,
                state.mesh.long_attributes_supported,
            )
        };
        if divisor != 0 && !divisor_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_INSTANCED_ARRAYS.name(),
            ));
        }
        if !long_supported && attributes.iter().any(|a| a.kind == AttributeKind::Long) {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_VERTEX_ATTRIB_64BIT.name(),
            ));
        }

        match setup {
            AttributeSetup::Default => {
                self.bind_vao();
                buffer.bind_internal(TargetHint::Array);
                for attribute in attributes {
                    let pointer = (offset + attribute.offset as usize) as *const c_void;
                    let (location, components, ty) =
                        (attribute.location, attribute.components, attribute.ty as GLenum);
                    unsafe {
                        gl::EnableVertexAttribArray(location);
                        match attribute.kind {
                            AttributeKind::Float { normalized } => gl::VertexAttribPointer(
                                location,
                                components,
                                ty,
                                normalized as u8,
                                stride,
                                pointer,
                            ),
                            AttributeKind::Integer => {
                                gl::VertexAttribIPointer(location, components, ty, stride, pointer)
                            }
                            AttributeKind::Long => {
                                gl::VertexAttribLPointer(location, components, ty, stride, pointer)
                            }
                        }
                        if divisor != 0 {
                            gl::VertexAttribDivisor(location, divisor);
                        }
                    }
                }
            }
            AttributeSetup::DirectStateAccess => {
                buffer.create_if_not_already();
                let binding = self.next_binding;
                self.next_binding += 1;
                unsafe {
                    gl::VertexArrayVertexBuffer(
                        self.id,
                        binding,
                        buffer.id(),
                        offset as isize,
                        stride,
                    );
                    for attribute in attributes {
                        let (location, components, ty) =
                            (attribute.location, attribute.components, attribute.ty as GLenum);
                        gl::EnableVertexArrayAttrib(self.id, location);
                        match attribute.kind {
                            AttributeKind::Float { normalized } => gl::VertexArrayAttribFormat(
                                self.id,
                                location,
                                components,
                                ty,
                                normalized as u8,
                                attribute.offset,
                            ),
                            AttributeKind::Integer => gl::VertexArrayAttribIFormat(
                                self.id,
                                location,
                                components,
                                ty,
                                attribute.offset,
                            ),
                            AttributeKind::Long => gl::VertexArrayAttribLFormat(
                                self.id,
                                location,
                                components,
                                ty,
                                attribute.offset,
                            ),
                        }
                        gl::VertexArrayAttribBinding(self.id, location, binding);
                    }
                    if divisor != 0 {
                        gl::VertexArrayBindingDivisor(self.id, binding, divisor);
                    }
                }
            }
        }
        Ok(self)
    }

    /// Attach an index buffer. A non-zero `end` gives the range of index
    /// values for `glDrawRangeElements`.
    pub fn set_index_buffer(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        ty: IndexType,
        start: u32,
        end: u32,
    ) -> &mut Self {
        let setup = self.state.borrow().mesh.attribute_setup;
        match setup {
            AttributeSetup::Default => {
                self.bind_vao();
                buffer.bind_internal(TargetHint::ElementArray);
            }
            AttributeSetup::DirectStateAccess => {
                buffer.create_if_not_already();
                unsafe { gl::VertexArrayElementBuffer(self.id, buffer.id()) }
            }
        }
        self.index = Some(IndexBinding {
            offset,
            ty,
            start,
            end,
        });
        self
    }

    /// Draw the mesh with the program. Does nothing if the count is zero.
    pub fn draw(&self, program: &Program) -> Result<()> {
        self.draw_internal(
            program,
            DrawParams {
                count: self.count,
                base_vertex: self.base_vertex,
                instance_count: self.instance_count,
                base_instance: self.base_instance,
                index: self.index,
            },
        )
    }

    pub(crate) fn draw_internal(&self, program: &Program, params: DrawParams) -> Result<()> {
        if params.count == 0 || params.instance_count == 0 {
            return Ok(());
        }

        let (base_vertex_supported, base_instance_supported, instancing_supported) = {
            let state = self.state.borrow();
            (
                state.mesh.base_vertex_supported,
                state.mesh.base_instance_supported,
                state.mesh.instancing_supported,
            )
        };
        if params.instance_count != 1 && !instancing_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_DRAW_INSTANCED.name(),
            ));
        }
        if params.base_instance != 0 && !base_instance_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_BASE_INSTANCE.name(),
            ));
        }
        if params.index.is_some() && params.base_vertex != 0 && !base_vertex_supported {
            return Err(GlStateError::MissingExtension(
                extensions::ARB_DRAW_ELEMENTS_BASE_VERTEX.name(),
            ));
        }

        program.use_program();
        self.bind_vao();

        let primitive = self.primitive as GLenum;
        let DrawParams {
            count,
            base_vertex,
            instance_count,
            base_instance,
            ..
        } = params;

        unsafe {
            let Some(index) = params.index else {
                match (instance_count, base_instance) {
                    (1, _) => gl::DrawArrays(primitive, base_vertex, count),
                    (_, 0) => gl::DrawArraysInstanced(primitive, base_vertex, count, instance_count),
                    _ => gl::DrawArraysInstancedBaseInstance(
                        primitive,
                        base_vertex,
                        count,
                        instance_count,
                        base_instance,
                    ),
                }
                return Ok(());
            };

            let ty = index.ty as GLenum;
            let pointer = index.offset as *const c_void;
            if instance_count == 1 {
                match (base_vertex, index.end) {
                    (0, 0) => gl::DrawElements(primitive, count, ty, pointer),
                    (0, end) => gl::DrawRangeElements(primitive, index.start, end, count, ty, pointer),
                    (base_vertex, 0) => {
                        gl::DrawElementsBaseVertex(primitive, count, ty, pointer, base_vertex)
                    }
                    (base_vertex, end) => gl::DrawRangeElementsBaseVertex(
                        primitive,
                        index.start,
                        end,
                        count,
                        ty,
                        pointer,
                        base_vertex,
                    ),
                }
                return Ok(());
            }

            match (base_vertex, base_instance) {
                (0, 0) => gl::DrawElementsInstanced(primitive, count, ty, pointer, instance_count),
                (base_vertex, 0) => gl::DrawElementsInstancedBaseVertex(
                    primitive,
                    count,
                    ty,
                    pointer,
                    instance_count,
                    base_vertex,
                ),
                (0, base_instance) => gl::DrawElementsInstancedBaseInstance(
                    primitive,
                    count,
                    ty,
                    pointer,
                    instance_count,
                    base_instance,
                ),
                (base_vertex, base_instance) => gl::DrawElementsInstancedBaseVertexBaseInstance(
                    primitive,
                    count,
                    ty,
                    pointer,
                    instance_count,
                    base_vertex,
                    base_instance,
                ),
            }
        }
        Ok(())
    }

    /// Draw several ranges of the mesh with a single call.
    pub(crate) fn multi_draw(&self, program: &Program, ranges: &[(i32, i32, usize)]) {
        program.use_program();
        self.bind_vao();

        let primitive = self.primitive as GLenum;
        let counts: Vec<GLsizei> = ranges.iter().map(|(count, _, _)| *count).collect();
        let base_vertices: Vec<GLint> = ranges.iter().map(|(_, base, _)| *base).collect();

        unsafe {
            match self.index {
                None => gl::MultiDrawArrays(
                    primitive,
                    base_vertices.as_ptr(),
                    counts.as_ptr(),
                    ranges.len() as GLsizei,
                ),
                Some(index) => {
                    let offsets: Vec<*const c_void> = ranges
                        .iter()
                        .map(|(_, _, offset)| *offset as *const c_void)
                        .collect();
                    gl::MultiDrawElementsBaseVertex(
                        primitive,
                        counts.as_ptr(),
                        index.ty as GLenum,
                        offsets.as_ptr(),
                        ranges.len() as GLsizei,
                        base_vertices.as_ptr(),
                    );
                }
            }
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if self.id == 0 || !self.flags.get().contains(ObjectFlags::DELETE_ON_DESTRUCTION) {
            return;
        }

        match self.state.try_borrow_mut() {
            Ok(mut state) => state.mesh.forget(self.id),
            Err(_) => log::warn!("mesh {} deleted while the binding cache was borrowed", self.id),
        }
        unsafe { gl::DeleteVertexArrays(1, &self.id) }
    }
}
