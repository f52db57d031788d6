use crate::context::ExtensionSupport;
use crate::extensions;
use crate::state::{Create, Invalidate, MultiBind, ObjectAccess, DISENGAGED};
use glstate_common::gl::types::{GLenum, GLuint};

/// How a texture gets bound to a unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TextureBind {
    /// `glActiveTexture` + `glBindTexture`.
    Default,
    /// `glBindTextures` with a single texture.
    Multi,
    /// `glBindTextureUnit`.
    DirectStateAccess,
    /// `glBindMultiTextureEXT`.
    DirectStateAccessExt,
}

/// How immutable storage is allocated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TextureStorage {
    /// Emulated with one `glTexImage*` call per level.
    Fallback,
    /// `glTexStorage*` on the internal unit.
    Default,
    /// `glTextureStorage*`.
    DirectStateAccess,
}

/// How texture images are read back.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TextureImageQuery {
    Default,
    Robustness,
    DirectStateAccess,
    DirectStateAccessExt,
}

/// Steps needed to make a texture current for configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct InternalBind {
    /// Unit to make active, if it isn't already.
    pub activate: Option<u32>,
    /// Whether `glBindTexture` is needed.
    pub bind: bool,
}

/// Cached texture unit bindings and the texture implementations in use.
#[derive(Debug)]
pub(crate) struct TextureState {
    bindings: Vec<(GLenum, GLuint)>,
    current_unit: Option<u32>,

    pub create: Create,
    pub bind: TextureBind,
    pub multi_bind: MultiBind,
    pub access: ObjectAccess,
    pub storage: TextureStorage,
    pub image_query: TextureImageQuery,
    /// Reading back a single cube map face.
    pub cube_image_query: TextureImageQuery,
    pub invalidate: Invalidate,
    pub anisotropy_supported: bool,
    pub srgb_decode_supported: bool,
    pub swizzle_supported: bool,
    pub stencil_texturing_supported: bool,
    pub integer_border_supported: bool,

    pub max_lod_bias: Option<f32>,
    pub max_max_anisotropy: Option<f32>,
    pub max_size: Option<i32>,
    pub max_3d_size: Option<i32>,
    pub max_cube_map_size: Option<i32>,
    pub max_array_layers: Option<i32>,
    pub max_color_samples: Option<i32>,
    pub max_depth_samples: Option<i32>,
    pub max_integer_samples: Option<i32>,
}

impl TextureState {
    pub fn new(ext: &ExtensionSupport, max_units: u32, used: &mut Vec<&'static str>) -> Self {
        let arb_dsa = ext.is_supported(&extensions::ARB_DIRECT_STATE_ACCESS);
        let ext_dsa = ext.is_supported(&extensions::EXT_DIRECT_STATE_ACCESS);
        let multi = ext.is_supported(&extensions::ARB_MULTI_BIND);
        let robustness = ext.is_supported(&extensions::ARB_ROBUSTNESS);

        let mut note = |name: &'static str| {
            if !used.contains(&name) {
                used.push(name)
            }
        };

        let (create, bind, access) = if arb_dsa {
            note(extensions::ARB_DIRECT_STATE_ACCESS.name());
            (
                Create::DirectStateAccess,
                TextureBind::DirectStateAccess,
                ObjectAccess::DirectStateAccess,
            )
        } else if ext_dsa {
            note(extensions::EXT_DIRECT_STATE_ACCESS.name());
            let bind = if multi {
                TextureBind::Multi
            } else {
                TextureBind::DirectStateAccessExt
            };
            (Create::Gen, bind, ObjectAccess::DirectStateAccessExt)
        } else if multi {
            (Create::Gen, TextureBind::Multi, ObjectAccess::Bind)
        } else {
            (Create::Gen, TextureBind::Default, ObjectAccess::Bind)
        };

        let multi_bind = if multi {
            note(extensions::ARB_MULTI_BIND.name());
            MultiBind::Multi
        } else {
            MultiBind::Fallback
        };

        let storage = if !ext.is_supported(&extensions::ARB_TEXTURE_STORAGE) {
            TextureStorage::Fallback
        } else {
            note(extensions::ARB_TEXTURE_STORAGE.name());
            if arb_dsa {
                TextureStorage::DirectStateAccess
            } else {
                TextureStorage::Default
            }
        };

        let image_query = if arb_dsa {
            TextureImageQuery::DirectStateAccess
        } else if robustness {
            note(extensions::ARB_ROBUSTNESS.name());
            TextureImageQuery::Robustness
        } else if ext_dsa {
            TextureImageQuery::DirectStateAccessExt
        } else {
            TextureImageQuery::Default
        };

        // per-face direct state access readback is glGetTextureSubImage
        let cube_image_query = if image_query != TextureImageQuery::DirectStateAccess {
            image_query
        } else if ext.is_supported(&extensions::ARB_GET_TEXTURE_SUB_IMAGE) {
            note(extensions::ARB_GET_TEXTURE_SUB_IMAGE.name());
            TextureImageQuery::DirectStateAccess
        } else if robustness {
            note(extensions::ARB_ROBUSTNESS.name());
            TextureImageQuery::Robustness
        } else {
            TextureImageQuery::Default
        };

        let invalidate = if ext.is_supported(&extensions::ARB_INVALIDATE_SUBDATA) {
            note(extensions::ARB_INVALIDATE_SUBDATA.name());
            Invalidate::Arb
        } else {
            Invalidate::NoOp
        };

        let anisotropy_supported = if ext.is_supported(&extensions::ARB_TEXTURE_FILTER_ANISOTROPIC) {
            note(extensions::ARB_TEXTURE_FILTER_ANISOTROPIC.name());
            true
        } else if ext.is_supported(&extensions::EXT_TEXTURE_FILTER_ANISOTROPIC) {
            note(extensions::EXT_TEXTURE_FILTER_ANISOTROPIC.name());
            true
        } else {
            false
        };

        TextureState {
            bindings: vec![(0, 0); max_units.max(1) as usize],
            current_unit: Some(0),
            create,
            bind,
            multi_bind,
            access,
            storage,
            image_query,
            cube_image_query,
            invalidate,
            anisotropy_supported,
            srgb_decode_supported: ext.is_supported(&extensions::EXT_TEXTURE_SRGB_DECODE),
            swizzle_supported: ext.is_supported(&extensions::ARB_TEXTURE_SWIZZLE),
            stencil_texturing_supported: ext.is_supported(&extensions::ARB_STENCIL_TEXTURING),
            integer_border_supported: ext.is_supported(&extensions::EXT_TEXTURE_INTEGER),
            max_lod_bias: None,
            max_max_anisotropy: None,
            max_size: None,
            max_3d_size: None,
            max_cube_map_size: None,
            max_array_layers: None,
            max_color_samples: None,
            max_depth_samples: None,
            max_integer_samples: None,
        }
    }

    /// Number of texture units.
    pub fn unit_count(&self) -> u32 {
        self.bindings.len() as u32
    }

    pub fn binding(&self, unit: u32) -> Option<(GLenum, GLuint)> {
        self.bindings.get(unit as usize).copied()
    }

    pub fn is_bound(&self, unit: u32, id: GLuint) -> bool {
        self.binding(unit).is_some_and(|(_, bound)| bound == id)
    }

    pub fn record(&mut self, unit: u32, target: GLenum, id: GLuint) {
        if let Some(binding) = self.bindings.get_mut(unit as usize) {
            *binding = (target, id);
        }
    }

    /// Make the unit active. Returns whether `glActiveTexture` is needed.
    pub fn activate(&mut self, unit: u32) -> bool {
        if self.current_unit == Some(unit) {
            return false;
        }
        self.current_unit = Some(unit);
        true
    }

    /// Prepare a texture for configuration through the bind path.
    ///
    /// Nothing is needed if the texture is bound in the active unit, else it
    /// is bound to the highest unit which is reserved for this.
    pub fn internal_bind(&mut self, target: GLenum, id: GLuint) -> InternalBind {
        if let Some(current) = self.current_unit {
            if self.is_bound(current, id) {
                return InternalBind {
                    activate: None,
                    bind: false,
                };
            }
        }

        let internal = self.unit_count() - 1;
        let activate = self.activate(internal).then_some(internal);
        if self.is_bound(internal, id) {
            return InternalBind {
                activate,
                bind: false,
            };
        }

        self.record(internal, target, id);
        InternalBind {
            activate,
            bind: true,
        }
    }

    /// Record new bindings for a consecutive range of units. Returns whether
    /// any of them changed.
    pub fn bind_range(&mut self, first: u32, textures: &[(GLenum, GLuint)]) -> bool {
        let mut changed = false;
        for (i, (target, id)) in textures.iter().copied().enumerate() {
            let unit = first + i as u32;
            if !self.is_bound(unit, id) {
                changed = true;
                self.record(unit, target, id);
            }
        }
        changed
    }

    /// Forget a deleted texture.
    pub fn forget(&mut self, id: GLuint) {
        for binding in self.bindings.iter_mut().filter(|(_, bound)| *bound == id) {
            *binding = (0, 0);
        }
    }

    pub fn reset(&mut self) {
        self.bindings.fill((0, DISENGAGED));
        self.current_unit = None;
    }
}
