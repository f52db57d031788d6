use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLfloat, GLint};

pub unsafe fn get_integer(pname: GLenum) -> i32 {
    let mut value: GLint = 0;
    gl::GetIntegerv(pname, &mut value);
    value
}

pub unsafe fn get_float(pname: GLenum) -> f32 {
    let mut value: GLfloat = 0.0;
    gl::GetFloatv(pname, &mut value);
    value
}

/// Return the cached limit, querying it on first use.
pub fn cached_limit<T: Copy>(slot: &mut Option<T>, query: impl FnOnce() -> T) -> T {
    *slot.get_or_insert_with(query)
}
