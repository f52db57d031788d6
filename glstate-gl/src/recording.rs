//! Entry points that record what the object wrappers ask of the driver, so
//! binding decisions can be checked without an OpenGL context.
use crate::context::{Context, ContextFlags, DriverInfo};
use crate::options::ContextOptions;
use glstate_common::gl;
use glstate_common::gl::types::{
    GLboolean, GLenum, GLint, GLintptr, GLsizei, GLsizeiptr, GLuint, GLuint64,
};
use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::sync::Once;

/// A recorded driver call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Call {
    BindBuffer(GLenum, GLuint),
    BindBufferBase(GLenum, GLuint, GLuint),
    BindBuffersBase(GLenum, GLuint, Vec<GLuint>),
    BindBuffersRange(GLenum, GLuint, Vec<GLuint>),
    BufferData(GLenum, GLsizeiptr),
    BufferSubData(GLenum, GLintptr, GLsizeiptr),
    CopyBufferSubData(GLenum, GLenum, GLsizeiptr),
    MapBuffer(GLenum, GLenum),
    UnmapBuffer(GLenum),
    DeleteBuffers(GLuint),
    BindVertexArray(GLuint),
    VertexAttribPointer(GLuint, GLint, GLenum),
    DeleteVertexArrays(GLuint),
    ActiveTexture(GLenum),
    BindTexture(GLenum, GLuint),
    TexParameteri(GLenum, GLenum, GLint),
    DeleteTextures(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    DrawArrays(GLenum, GLint, GLsizei),
    DrawElements(GLenum, GLsizei, GLenum, usize),
    MultiDrawArrays(GLenum, Vec<GLint>, Vec<GLsizei>),
    MultiDrawElementsBaseVertex(GLenum, Vec<GLsizei>, Vec<usize>, Vec<GLint>),
    BeginQuery(GLenum, GLuint),
    GetQueryObjectuiv(GLuint, GLenum),
    GetQueryObjectui64v(GLuint, GLenum),
    DeleteQueries(GLuint),
}

/// Size reported for every buffer.
pub(crate) const BUFFER_SIZE: usize = 16;
/// Result reported for every query.
pub(crate) const QUERY_RESULT: u32 = 7;
/// Result reported by the 64-bit query entry points.
pub(crate) const QUERY_RESULT_64: u64 = 1 << 40;

thread_local! {
    static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
    static NEXT_NAME: Cell<GLuint> = const { Cell::new(1) };
}

fn record(call: Call) {
    CALLS.with(|calls| calls.borrow_mut().push(call));
}

/// Calls recorded on this thread since the last time they were taken.
pub(crate) fn take_calls() -> Vec<Call> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

unsafe fn slice<'a, T>(ptr: *const T, len: GLsizei) -> &'a [T] {
    if ptr.is_null() || len <= 0 {
        return &[];
    }
    std::slice::from_raw_parts(ptr, len as usize)
}

unsafe fn gen_names(n: GLsizei, names: *mut GLuint) {
    for i in 0..n.max(0) as usize {
        *names.add(i) = NEXT_NAME.with(|next| next.replace(next.get() + 1));
    }
}

extern "system" fn gen_buffers(n: GLsizei, names: *mut GLuint) {
    unsafe { gen_names(n, names) }
}

extern "system" fn gen_vertex_arrays(n: GLsizei, names: *mut GLuint) {
    unsafe { gen_names(n, names) }
}

extern "system" fn gen_textures(n: GLsizei, names: *mut GLuint) {
    unsafe { gen_names(n, names) }
}

extern "system" fn gen_queries(n: GLsizei, names: *mut GLuint) {
    unsafe { gen_names(n, names) }
}

extern "system" fn create_program() -> GLuint {
    NEXT_NAME.with(|next| next.replace(next.get() + 1))
}

extern "system" fn bind_buffer(target: GLenum, id: GLuint) {
    record(Call::BindBuffer(target, id));
}

extern "system" fn bind_buffer_base(target: GLenum, index: GLuint, id: GLuint) {
    record(Call::BindBufferBase(target, index, id));
}

extern "system" fn bind_buffers_base(
    target: GLenum,
    first: GLuint,
    count: GLsizei,
    ids: *const GLuint,
) {
    let ids = unsafe { slice(ids, count) }.to_vec();
    record(Call::BindBuffersBase(target, first, ids));
}

extern "system" fn bind_buffers_range(
    target: GLenum,
    first: GLuint,
    count: GLsizei,
    ids: *const GLuint,
    _offsets: *const GLintptr,
    _sizes: *const GLsizeiptr,
) {
    let ids = unsafe { slice(ids, count) }.to_vec();
    record(Call::BindBuffersRange(target, first, ids));
}

extern "system" fn buffer_data(target: GLenum, size: GLsizeiptr, _data: *const c_void, _usage: GLenum) {
    record(Call::BufferData(target, size));
}

extern "system" fn buffer_sub_data(
    target: GLenum,
    offset: GLintptr,
    size: GLsizeiptr,
    _data: *const c_void,
) {
    record(Call::BufferSubData(target, offset, size));
}

extern "system" fn get_buffer_parameteriv(_target: GLenum, pname: GLenum, value: *mut GLint) {
    if pname == gl::BUFFER_SIZE {
        unsafe { *value = BUFFER_SIZE as GLint }
    }
}

extern "system" fn copy_buffer_sub_data(
    read: GLenum,
    write: GLenum,
    _read_offset: GLintptr,
    _write_offset: GLintptr,
    size: GLsizeiptr,
) {
    record(Call::CopyBufferSubData(read, write, size));
}

extern "system" fn map_buffer(target: GLenum, access: GLenum) -> *mut c_void {
    record(Call::MapBuffer(target, access));
    let memory = Box::leak(vec![0u8; BUFFER_SIZE].into_boxed_slice());
    memory.as_mut_ptr().cast()
}

extern "system" fn unmap_buffer(target: GLenum) -> GLboolean {
    record(Call::UnmapBuffer(target));
    gl::TRUE
}

extern "system" fn delete_buffers(n: GLsizei, ids: *const GLuint) {
    for id in unsafe { slice(ids, n) } {
        record(Call::DeleteBuffers(*id));
    }
}

extern "system" fn bind_vertex_array(id: GLuint) {
    record(Call::BindVertexArray(id));
}

extern "system" fn enable_vertex_attrib_array(_location: GLuint) {}

extern "system" fn vertex_attrib_pointer(
    location: GLuint,
    components: GLint,
    ty: GLenum,
    _normalized: GLboolean,
    _stride: GLsizei,
    _pointer: *const c_void,
) {
    record(Call::VertexAttribPointer(location, components, ty));
}

extern "system" fn delete_vertex_arrays(n: GLsizei, ids: *const GLuint) {
    for id in unsafe { slice(ids, n) } {
        record(Call::DeleteVertexArrays(*id));
    }
}

extern "system" fn active_texture(unit: GLenum) {
    record(Call::ActiveTexture(unit));
}

extern "system" fn bind_texture(target: GLenum, id: GLuint) {
    record(Call::BindTexture(target, id));
}

extern "system" fn tex_parameteri(target: GLenum, pname: GLenum, value: GLint) {
    record(Call::TexParameteri(target, pname, value));
}

extern "system" fn delete_textures(n: GLsizei, ids: *const GLuint) {
    for id in unsafe { slice(ids, n) } {
        record(Call::DeleteTextures(*id));
    }
}

extern "system" fn use_program(id: GLuint) {
    record(Call::UseProgram(id));
}

extern "system" fn delete_program(id: GLuint) {
    record(Call::DeleteProgram(id));
}

extern "system" fn draw_arrays(mode: GLenum, first: GLint, count: GLsizei) {
    record(Call::DrawArrays(mode, first, count));
}

extern "system" fn draw_elements(mode: GLenum, count: GLsizei, ty: GLenum, indices: *const c_void) {
    record(Call::DrawElements(mode, count, ty, indices as usize));
}

extern "system" fn multi_draw_arrays(
    mode: GLenum,
    first: *const GLint,
    count: *const GLsizei,
    draw_count: GLsizei,
) {
    let (first, count) = unsafe { (slice(first, draw_count), slice(count, draw_count)) };
    record(Call::MultiDrawArrays(mode, first.to_vec(), count.to_vec()));
}

extern "system" fn multi_draw_elements_base_vertex(
    mode: GLenum,
    count: *const GLsizei,
    _ty: GLenum,
    indices: *const *const c_void,
    draw_count: GLsizei,
    base_vertex: *const GLint,
) {
    let (count, indices, base_vertex) = unsafe {
        (
            slice(count, draw_count),
            slice(indices, draw_count),
            slice(base_vertex, draw_count),
        )
    };
    record(Call::MultiDrawElementsBaseVertex(
        mode,
        count.to_vec(),
        indices.iter().map(|offset| *offset as usize).collect(),
        base_vertex.to_vec(),
    ));
}

extern "system" fn begin_query(target: GLenum, id: GLuint) {
    record(Call::BeginQuery(target, id));
}

extern "system" fn get_query_objectuiv(id: GLuint, pname: GLenum, value: *mut GLuint) {
    record(Call::GetQueryObjectuiv(id, pname));
    unsafe { *value = QUERY_RESULT }
}

extern "system" fn get_query_objectui64v(id: GLuint, pname: GLenum, value: *mut GLuint64) {
    record(Call::GetQueryObjectui64v(id, pname));
    unsafe { *value = QUERY_RESULT_64 }
}

extern "system" fn delete_queries(n: GLsizei, ids: *const GLuint) {
    for id in unsafe { slice(ids, n) } {
        record(Call::DeleteQueries(*id));
    }
}

fn entry_point(name: &str) -> *const c_void {
    match name {
        "glGenBuffers" => gen_buffers as *const c_void,
        "glGenVertexArrays" => gen_vertex_arrays as *const c_void,
        "glGenTextures" => gen_textures as *const c_void,
        "glGenQueries" => gen_queries as *const c_void,
        "glCreateProgram" => create_program as *const c_void,
        "glBindBuffer" => bind_buffer as *const c_void,
        "glBindBufferBase" => bind_buffer_base as *const c_void,
        "glBindBuffersBase" => bind_buffers_base as *const c_void,
        "glBindBuffersRange" => bind_buffers_range as *const c_void,
        "glBufferData" => buffer_data as *const c_void,
        "glBufferSubData" => buffer_sub_data as *const c_void,
        "glGetBufferParameteriv" => get_buffer_parameteriv as *const c_void,
        "glCopyBufferSubData" => copy_buffer_sub_data as *const c_void,
        "glMapBuffer" => map_buffer as *const c_void,
        "glUnmapBuffer" => unmap_buffer as *const c_void,
        "glDeleteBuffers" => delete_buffers as *const c_void,
        "glBindVertexArray" => bind_vertex_array as *const c_void,
        "glEnableVertexAttribArray" => enable_vertex_attrib_array as *const c_void,
        "glVertexAttribPointer" => vertex_attrib_pointer as *const c_void,
        "glDeleteVertexArrays" => delete_vertex_arrays as *const c_void,
        "glActiveTexture" => active_texture as *const c_void,
        "glBindTexture" => bind_texture as *const c_void,
        "glTexParameteri" => tex_parameteri as *const c_void,
        "glDeleteTextures" => delete_textures as *const c_void,
        "glUseProgram" => use_program as *const c_void,
        "glDeleteProgram" => delete_program as *const c_void,
        "glDrawArrays" => draw_arrays as *const c_void,
        "glDrawElements" => draw_elements as *const c_void,
        "glMultiDrawArrays" => multi_draw_arrays as *const c_void,
        "glMultiDrawElementsBaseVertex" => multi_draw_elements_base_vertex as *const c_void,
        "glBeginQuery" => begin_query as *const c_void,
        "glGetQueryObjectuiv" => get_query_objectuiv as *const c_void,
        "glGetQueryObjectui64v" => get_query_objectui64v as *const c_void,
        "glDeleteQueries" => delete_queries as *const c_void,
        _ => std::ptr::null(),
    }
}

/// Create a context backed by the recording entry points. Everything else
/// stays unloaded and panics when called.
pub(crate) fn context(major: u32, minor: u32, extensions: &[&str]) -> Context {
    static LOAD: Once = Once::new();
    LOAD.call_once(|| gl::load_with(entry_point));

    take_calls();
    NEXT_NAME.with(|next| next.set(1));

    let info = DriverInfo {
        vendor: "Recording".to_string(),
        renderer: "Recording".to_string(),
        version_string: format!("{major}.{minor}.0"),
        shading_language_version: format!("{major}.{minor}0"),
        shading_language_versions: Vec::new(),
        major,
        minor,
        flags: ContextFlags::empty(),
        extensions: extensions.iter().map(|s| s.to_string()).collect(),
        max_combined_texture_image_units: 16,
    };
    let options = ContextOptions {
        log_used_extensions: false,
        ..Default::default()
    };
    match Context::new(info, options) {
        Ok(ctx) => ctx,
        Err(err) => panic!("unable to create the recording context: {err}"),
    }
}
