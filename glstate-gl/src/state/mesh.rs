use crate::context::ExtensionSupport;
use crate::extensions;
use crate::state::{Create, DISENGAGED};
use glstate_common::gl::types::GLuint;

/// How vertex attributes are attached to a vertex array.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum AttributeSetup {
    /// Bind the vertex array and the buffer, then `glVertexAttribPointer`.
    Default,
    /// `glVertexArrayVertexBuffer` and `glVertexArrayAttribFormat`.
    DirectStateAccess,
}

/// How several mesh views are drawn at once.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum MultiDraw {
    /// `glMultiDrawArrays` / `glMultiDrawElements[BaseVertex]`.
    Default,
    /// One draw call per view.
    Fallback,
}

#[derive(Debug)]
pub(crate) struct MeshState {
    current_vao: GLuint,
    pub create: Create,
    pub attribute_setup: AttributeSetup,
    pub multi_draw: MultiDraw,
    pub base_vertex_supported: bool,
    pub base_instance_supported: bool,
    pub instancing_supported: bool,
    pub divisor_supported: bool,
    pub long_attributes_supported: bool,
    pub max_vertex_attributes: Option<i32>,
}

impl MeshState {
    pub fn new(ext: &ExtensionSupport, used: &mut Vec<&'static str>) -> Self {
        let dsa = ext.is_supported(&extensions::ARB_DIRECT_STATE_ACCESS);
        let attrib_binding = ext.is_supported(&extensions::ARB_VERTEX_ATTRIB_BINDING);

        let (create, attribute_setup) = if dsa && attrib_binding {
            if !used.contains(&extensions::ARB_DIRECT_STATE_ACCESS.name()) {
                used.push(extensions::ARB_DIRECT_STATE_ACCESS.name());
            }
            used.push(extensions::ARB_VERTEX_ATTRIB_BINDING.name());
            (Create::DirectStateAccess, AttributeSetup::DirectStateAccess)
        } else {
            (Create::Gen, AttributeSetup::Default)
        };

        let base_vertex_supported = ext.is_supported(&extensions::ARB_DRAW_ELEMENTS_BASE_VERTEX);

        // Indexed multi-draw with a base vertex needs the base vertex entry
        // point, so without it every view is drawn alone.
        let multi_draw = if base_vertex_supported {
            MultiDraw::Default
        } else {
            MultiDraw::Fallback
        };

        let base_instance_supported = ext.is_supported(&extensions::ARB_BASE_INSTANCE);
        if base_instance_supported {
            used.push(extensions::ARB_BASE_INSTANCE.name());
        }

        MeshState {
            current_vao: 0,
            create,
            attribute_setup,
            multi_draw,
            base_vertex_supported,
            base_instance_supported,
            instancing_supported: ext.is_supported(&extensions::ARB_DRAW_INSTANCED),
            divisor_supported: ext.is_supported(&extensions::ARB_INSTANCED_ARRAYS),
            long_attributes_supported: ext.is_supported(&extensions::ARB_VERTEX_ATTRIB_64BIT),
            max_vertex_attributes: None,
        }
    }

    /// Record a vertex array binding. Returns whether the driver needs to be
    /// told.
    pub fn bind_vao(&mut self, id: GLuint) -> bool {
        if self.current_vao == id {
            return false;
        }
        self.current_vao = id;
        true
    }

    pub fn forget(&mut self, id: GLuint) {
        if self.current_vao == id {
            self.current_vao = 0;
        }
    }

    pub fn reset(&mut self) {
        self.current_vao = DISENGAGED;
    }
}
