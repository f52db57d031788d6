//! Shader and program objects.
use crate::context::Context;
use crate::error::{GlStateError, Result};
use crate::state::StateHandle;
use crate::workarounds::{is_log_empty, DetectedDrivers};
use glstate_common::gl;
use glstate_common::gl::types::{GLchar, GLenum, GLint, GLuint};
use std::ffi::CString;

#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderType {
    Vertex = gl::VERTEX_SHADER,
    TessellationControl = gl::TESS_CONTROL_SHADER,
    TessellationEvaluation = gl::TESS_EVALUATION_SHADER,
    Geometry = gl::GEOMETRY_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
    Compute = gl::COMPUTE_SHADER,
}

/// Trim the trailing NUL and treat driver filler as no log at all.
fn clean_log(drivers: DetectedDrivers, mut log: Vec<u8>) -> String {
    while log.last() == Some(&0) {
        log.pop();
    }
    let log = String::from_utf8_lossy(&log).into_owned();
    if is_log_empty(drivers, &log) {
        String::new()
    } else {
        log
    }
}

pub struct Shader {
    id: GLuint,
    ty: ShaderType,
    drivers: DetectedDrivers,
    sources: Vec<CString>,
}

impl Shader {
    pub fn new(ctx: &Context, ty: ShaderType) -> Shader {
        let id = unsafe { gl::CreateShader(ty as GLenum) };
        Shader {
            id,
            ty,
            drivers: ctx.detected_driver(),
            sources: Vec::new(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn shader_type(&self) -> ShaderType {
        self.ty
    }

    /// Append a source string. Interior NUL bytes end the string.
    pub fn add_source(&mut self, source: &str) -> &mut Self {
        let source = source.split('\0').next().unwrap_or_default();
        if let Ok(source) = CString::new(source) {
            self.sources.push(source);
        }
        self
    }

    /// Compile the sources. A non-empty log of a successful compilation is
    /// logged as a warning.
    pub fn compile(&mut self) -> Result<()> {
        let pointers: Vec<*const GLchar> = self.sources.iter().map(|s| s.as_ptr()).collect();
        let mut status: GLint = 0;
        let mut log_length: GLint = 0;
        unsafe {
            gl::ShaderSource(
                self.id,
                pointers.len() as GLint,
                pointers.as_ptr(),
                std::ptr::null(),
            );
            gl::CompileShader(self.id);
            gl::GetShaderiv(self.id, gl::COMPILE_STATUS, &mut status);
            gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut log_length);
        }

        let mut log = vec![0u8; log_length.max(0) as usize];
        if !log.is_empty() {
            unsafe {
                gl::GetShaderInfoLog(
                    self.id,
                    log_length,
                    std::ptr::null_mut(),
                    log.as_mut_ptr().cast(),
                )
            };
        }
        let log = clean_log(self.drivers, log);

        if status == gl::FALSE as GLint {
            return Err(GlStateError::ShaderCompile(log));
        }
        if !log.is_empty() {
            log::warn!("{:?} shader compiled with: {log}", self.ty);
        }
        Ok(())
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if self.id != 0 {
            unsafe { gl::DeleteShader(self.id) }
        }
    }
}

pub struct Program {
    state: StateHandle,
    id: GLuint,
    drivers: DetectedDrivers,
}

impl Program {
    pub fn new(ctx: &Context) -> Program {
        let id = unsafe { gl::CreateProgram() };
        let state = ctx.state();
        state.borrow_mut().shader.forget(id);
        Program {
            state,
            id,
            drivers: ctx.detected_driver(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn attach_shader(&mut self, shader: &Shader) -> &mut Self {
        unsafe { gl::AttachShader(self.id, shader.id) }
        self
    }

    /// Takes effect on the next link.
    pub fn bind_attribute_location(&mut self, location: u32, name: &str) -> &mut Self {
        if let Ok(name) = CString::new(name) {
            unsafe { gl::BindAttribLocation(self.id, location, name.as_ptr()) }
        }
        self
    }

    pub fn link(&mut self) -> Result<()> {
        let mut status: GLint = 0;
        let mut log_length: GLint = 0;
        unsafe {
            gl::LinkProgram(self.id);
            gl::GetProgramiv(self.id, gl::LINK_STATUS, &mut status);
            gl::GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut log_length);
        }

        let mut log = vec![0u8; log_length.max(0) as usize];
        if !log.is_empty() {
            unsafe {
                gl::GetProgramInfoLog(
                    self.id,
                    log_length,
                    std::ptr::null_mut(),
                    log.as_mut_ptr().cast(),
                )
            };
        }
        let log = clean_log(self.drivers, log);

        if status == gl::FALSE as GLint {
            return Err(GlStateError::ProgramLink(log));
        }
        if !log.is_empty() {
            log::warn!("program linked with: {log}");
        }
        Ok(())
    }

    /// Location of a uniform, `None` if it isn't active.
    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    /// Make the program current unless it already is.
    pub fn use_program(&self) {
        if self.state.borrow_mut().shader.use_program(self.id) {
            unsafe { gl::UseProgram(self.id) }
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        if self.id == 0 {
            return;
        }
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.shader.forget(self.id),
            Err(_) => log::warn!("program {} deleted while the binding cache was borrowed", self.id),
        }
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_trailing_nul() {
        let log = clean_log(DetectedDrivers::empty(), b"0:1: error\n\0".to_vec());
        assert_eq!(log, "0:1: error\n");
        assert_eq!(clean_log(DetectedDrivers::empty(), vec![0]), "");
    }

    #[test]
    fn intel_filler_log() {
        let log = clean_log(DetectedDrivers::INTEL_WINDOWS, b"No errors.\n\0".to_vec());
        if cfg!(windows) {
            assert!(log.is_empty());
        } else {
            assert_eq!(log, "No errors.\n");
        }
    }
}
