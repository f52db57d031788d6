use crate::buffer::TargetHint;
use crate::context::ExtensionSupport;
use crate::extensions;
use crate::state::{Create, Invalidate, MultiBind, ObjectAccess, DISENGAGED};
use glstate_common::gl::types::GLuint;

pub(crate) const TARGET_COUNT: usize = TargetHint::ALL.len();

/// Cached buffer bindings and the buffer implementations in use.
#[derive(Debug)]
pub(crate) struct BufferState {
    bindings: [GLuint; TARGET_COUNT],
    pub create: Create,
    pub access: ObjectAccess,
    pub invalidate: Invalidate,
    pub multi_bind: MultiBind,
    pub copy_supported: bool,

    pub map_alignment_supported: bool,
    pub atomic_counters_supported: bool,
    pub shader_storage_supported: bool,
    pub uniform_buffers_supported: bool,

    pub min_map_alignment: Option<i32>,
    pub max_atomic_counter_bindings: Option<i32>,
    pub max_shader_storage_bindings: Option<i32>,
    pub uniform_offset_alignment: Option<i32>,
    pub shader_storage_offset_alignment: Option<i32>,
    pub max_uniform_bindings: Option<i32>,
}

impl BufferState {
    pub fn new(ext: &ExtensionSupport, used: &mut Vec<&'static str>) -> Self {
        let (create, access) = if ext.is_supported(&extensions::ARB_DIRECT_STATE_ACCESS) {
            used.push(extensions::ARB_DIRECT_STATE_ACCESS.name());
            (Create::DirectStateAccess, ObjectAccess::DirectStateAccess)
        } else if ext.is_supported(&extensions::EXT_DIRECT_STATE_ACCESS) {
            used.push(extensions::EXT_DIRECT_STATE_ACCESS.name());
            (Create::Gen, ObjectAccess::DirectStateAccessExt)
        } else {
            (Create::Gen, ObjectAccess::Bind)
        };

        let invalidate = if ext.is_supported(&extensions::ARB_INVALIDATE_SUBDATA) {
            used.push(extensions::ARB_INVALIDATE_SUBDATA.name());
            Invalidate::Arb
        } else {
            Invalidate::NoOp
        };

        let multi_bind = if ext.is_supported(&extensions::ARB_MULTI_BIND) {
            used.push(extensions::ARB_MULTI_BIND.name());
            MultiBind::Multi
        } else {
            MultiBind::Fallback
        };

        BufferState {
            bindings: [0; TARGET_COUNT],
            create,
            access,
            invalidate,
            multi_bind,
            copy_supported: ext.is_supported(&extensions::ARB_COPY_BUFFER),
            map_alignment_supported: ext.is_supported(&extensions::ARB_MAP_BUFFER_ALIGNMENT),
            atomic_counters_supported: ext.is_supported(&extensions::ARB_SHADER_ATOMIC_COUNTERS),
            shader_storage_supported: ext
                .is_supported(&extensions::ARB_SHADER_STORAGE_BUFFER_OBJECT),
            uniform_buffers_supported: ext.is_supported(&extensions::ARB_UNIFORM_BUFFER_OBJECT),
            min_map_alignment: None,
            max_atomic_counter_bindings: None,
            max_shader_storage_bindings: None,
            uniform_offset_alignment: None,
            shader_storage_offset_alignment: None,
            max_uniform_bindings: None,
        }
    }

    pub fn index_for_target(target: TargetHint) -> usize {
        TargetHint::ALL
            .iter()
            .position(|t| *t == target)
            .unwrap_or_default()
    }

    pub fn binding(&self, target: TargetHint) -> GLuint {
        self.bindings[Self::index_for_target(target)]
    }

    /// Record a binding. Returns whether the driver needs to be told.
    pub fn bind(&mut self, target: TargetHint, id: GLuint) -> bool {
        let binding = &mut self.bindings[Self::index_for_target(target)];
        if *binding == id {
            return false;
        }
        *binding = id;
        true
    }

    /// Find a target the buffer can be used from without rebinding.
    ///
    /// Prefers the hint, then the first target the buffer is already bound
    /// to. Otherwise the buffer is recorded as bound to the hint and the
    /// returned flag says the driver needs to bind it.
    pub fn bind_somewhere(&mut self, hint: TargetHint, id: GLuint) -> (TargetHint, bool) {
        if self.binding(hint) == id {
            return (hint, false);
        }

        if let Some(index) = self.bindings.iter().position(|b| *b == id) {
            return (TargetHint::ALL[index], false);
        }

        self.bindings[Self::index_for_target(hint)] = id;
        (hint, true)
    }

    /// Forget a deleted buffer.
    pub fn forget(&mut self, id: GLuint) {
        for binding in self.bindings.iter_mut().filter(|b| **b == id) {
            *binding = 0;
        }
    }

    /// Invalidate an element array binding that changed with the VAO.
    pub fn disengage(&mut self, target: TargetHint) {
        self.bindings[Self::index_for_target(target)] = DISENGAGED;
    }

    pub fn reset(&mut self) {
        self.bindings = [DISENGAGED; TARGET_COUNT];
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glstate_common::Version;

    fn state(version: Version, advertised: &[crate::extensions::Extension]) -> BufferState {
        let mut used = Vec::new();
        BufferState::new(&ExtensionSupport::with(version, advertised), &mut used)
    }

    #[test]
    fn selects_implementations() {
        let gl45 = state(Version::GL450, &[]);
        assert_eq!(gl45.create, Create::DirectStateAccess);
        assert_eq!(gl45.access, ObjectAccess::DirectStateAccess);
        assert_eq!(gl45.invalidate, Invalidate::Arb);
        assert_eq!(gl45.multi_bind, MultiBind::Multi);

        let ext = state(Version::GL330, &[extensions::EXT_DIRECT_STATE_ACCESS]);
        assert_eq!(ext.create, Create::Gen);
        assert_eq!(ext.access, ObjectAccess::DirectStateAccessExt);
        assert_eq!(ext.invalidate, Invalidate::NoOp);
        assert_eq!(ext.multi_bind, MultiBind::Fallback);

        let plain = state(Version::GL300, &[]);
        assert_eq!(plain.access, ObjectAccess::Bind);
        assert!(!plain.copy_supported);
        assert!(!plain.uniform_buffers_supported);
    }

    #[test]
    fn lists_used_extensions() {
        let mut used = Vec::new();
        BufferState::new(
            &ExtensionSupport::with(Version::GL330, &[extensions::ARB_MULTI_BIND]),
            &mut used,
        );
        assert_eq!(used, vec!["GL_ARB_multi_bind"]);
    }

    #[test]
    fn elides_repeated_binds() {
        let mut state = state(Version::GL330, &[]);
        assert!(state.bind(TargetHint::Array, 3));
        assert!(!state.bind(TargetHint::Array, 3));
        assert!(state.bind(TargetHint::Array, 0));
        assert!(state.bind(TargetHint::Uniform, 3));
    }

    #[test]
    fn bind_somewhere_prefers_existing() {
        let mut state = state(Version::GL330, &[]);
        assert_eq!(state.bind_somewhere(TargetHint::Array, 5), (TargetHint::Array, true));
        assert_eq!(state.bind_somewhere(TargetHint::Array, 5), (TargetHint::Array, false));

        // already bound to array, so no need to rebind to uniform
        assert_eq!(
            state.bind_somewhere(TargetHint::Uniform, 5),
            (TargetHint::Array, false)
        );

        state.bind(TargetHint::Uniform, 5);
        assert_eq!(
            state.bind_somewhere(TargetHint::Uniform, 5),
            (TargetHint::Uniform, false)
        );
    }

    #[test]
    fn forget_clears_every_target() {
        let mut state = state(Version::GL330, &[]);
        state.bind(TargetHint::Array, 7);
        state.bind(TargetHint::CopyRead, 7);
        state.bind(TargetHint::Uniform, 8);
        state.forget(7);

        assert_eq!(state.binding(TargetHint::Array), 0);
        assert_eq!(state.binding(TargetHint::CopyRead), 0);
        assert_eq!(state.binding(TargetHint::Uniform), 8);
    }

    #[test]
    fn reset_forces_rebind() {
        let mut state = state(Version::GL330, &[]);
        state.bind(TargetHint::Array, 0);
        state.reset();
        assert!(state.bind(TargetHint::Array, 0));
    }
}
