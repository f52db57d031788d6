//! State trackers and the implementation dispatch chosen at context
//! creation.
//!
//! Nothing in here talks to the driver. The trackers only decide which
//! entry points to use and whether a call can be skipped; the object
//! wrappers make the calls.
mod buffer;
mod mesh;
mod renderer;
mod texture;

pub(crate) use buffer::BufferState;
pub(crate) use mesh::{AttributeSetup, MeshState, MultiDraw};
pub(crate) use renderer::{ClearDepth, RendererState, ResetStatus};
pub(crate) use texture::{TextureBind, TextureImageQuery, TextureState, TextureStorage};

use crate::context::{DriverInfo, ExtensionSupport, States};
use crate::extensions;
use glstate_common::gl::types::GLuint;
use std::cell::RefCell;
use std::rc::Rc;

/// Binding value that never matches a real object, forcing the next bind.
pub(crate) const DISENGAGED: GLuint = GLuint::MAX;

pub(crate) type StateHandle = Rc<RefCell<State>>;

/// How objects are created.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Create {
    /// `glGen*`, the object is created on first bind.
    Gen,
    /// `glCreate*`.
    DirectStateAccess,
}

/// How an existing object is edited or queried.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ObjectAccess {
    /// Bind to a target, then use the target-based entry point.
    Bind,
    /// `ARB_direct_state_access` entry points.
    DirectStateAccess,
    /// `EXT_direct_state_access` entry points.
    DirectStateAccessExt,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Invalidate {
    NoOp,
    Arb,
}

/// How a range of indexed targets or units is bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum MultiBind {
    /// One bind call per slot.
    Fallback,
    /// `ARB_multi_bind` entry points.
    Multi,
}

/// The program in use.
#[derive(Debug)]
pub(crate) struct ShaderState {
    current_program: GLuint,
}

impl ShaderState {
    /// Record the program in use. Returns whether the driver needs to be
    /// told.
    pub fn use_program(&mut self, id: GLuint) -> bool {
        if self.current_program == id {
            return false;
        }
        self.current_program = id;
        true
    }

    pub fn forget(&mut self, id: GLuint) {
        if self.current_program == id {
            self.current_program = 0;
        }
    }
}

#[derive(Debug)]
pub(crate) struct QueryState {
    pub create: Create,
    /// `glGetQueryObject[u]i64v`, from `ARB_timer_query`.
    pub long_results_supported: bool,
}

/// All state trackers of a context.
#[derive(Debug)]
pub(crate) struct State {
    pub buffer: BufferState,
    pub texture: TextureState,
    pub mesh: MeshState,
    pub shader: ShaderState,
    pub renderer: RendererState,
    pub query: QueryState,
}

impl State {
    /// Choose the implementations. Returns the state with the optional
    /// extensions it uses.
    pub fn new(ext: &ExtensionSupport, info: &DriverInfo) -> (State, Vec<&'static str>) {
        let mut used = Vec::new();

        let buffer = BufferState::new(ext, &mut used);
        let texture = TextureState::new(ext, info.max_combined_texture_image_units, &mut used);
        let mesh = MeshState::new(ext, &mut used);
        let renderer = RendererState::new(ext, &mut used);
        let query = QueryState {
            create: if ext.is_supported(&extensions::ARB_DIRECT_STATE_ACCESS) {
                Create::DirectStateAccess
            } else {
                Create::Gen
            },
            long_results_supported: ext.is_supported(&extensions::ARB_TIMER_QUERY),
        };

        let mut unique = Vec::with_capacity(used.len());
        for name in used {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let state = State {
            buffer,
            texture,
            mesh,
            shader: ShaderState { current_program: 0 },
            renderer,
            query,
        };
        (state, unique)
    }

    pub fn reset(&mut self, states: States) {
        if states.contains(States::BUFFERS) {
            self.buffer.reset();
        }
        if states.contains(States::MESHES) {
            self.mesh.reset();
        }
        if states.contains(States::SHADERS) {
            self.shader.current_program = DISENGAGED;
        }
        if states.contains(States::TEXTURES) {
            self.texture.reset();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buffer::TargetHint;
    use glstate_common::Version;

    fn info() -> DriverInfo {
        DriverInfo {
            max_combined_texture_image_units: 16,
            ..Default::default()
        }
    }

    #[test]
    fn used_extensions_are_unique() {
        let (_, used) = State::new(&ExtensionSupport::with(Version::GL450, &[]), &info());
        let mut sorted = used.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), used.len());
        assert_eq!(used.first(), Some(&"GL_ARB_direct_state_access"));
    }

    #[test]
    fn reset_selected_states() {
        let (mut state, _) = State::new(&ExtensionSupport::with(Version::GL330, &[]), &info());
        state.buffer.bind(TargetHint::Array, 0);
        state.shader.use_program(3);

        state.reset(States::SHADERS);
        assert!(!state.buffer.bind(TargetHint::Array, 0));
        assert!(state.shader.use_program(3));

        state.reset(States::BUFFERS | States::TEXTURES);
        assert!(state.buffer.bind(TargetHint::Array, 0));
        assert_eq!(state.texture.unit_count(), 16);
        assert!(!state.texture.is_bound(0, 0));
    }
}
