//! Registry of the OpenGL extensions known to the state tracker.
//!
//! Each extension carries the minimal context version it needs to be used
//! and the version in which it was adopted into core. Extensions adopted
//! into a version older than or equal to the context version are always
//! considered supported, whether or not the driver advertises them.
use glstate_common::Version;
use std::fmt::{Display, Formatter};

/// Run-time information about an OpenGL extension.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Extension {
    index: usize,
    required_version: Version,
    core_version: Version,
    name: &'static str,
}

impl Extension {
    /// Index of the extension in the registry.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Minimal version required by this extension.
    pub const fn required_version(&self) -> Version {
        self.required_version
    }

    /// Version in which this extension was adopted into core, or
    /// [`Version::None`] if it never was.
    pub const fn core_version(&self) -> Version {
        self.core_version
    }

    /// The extension string, such as `GL_ARB_direct_state_access`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Every extension adopted into core in the given version.
    ///
    /// Passing [`Version::None`] lists the extensions that are not part of
    /// any core version.
    pub fn extensions(version: Version) -> impl Iterator<Item = &'static Extension> {
        ALL.iter().filter(move |ext| ext.core_version == version)
    }

    /// Look up a known extension by its extension string.
    pub fn find(name: &str) -> Option<&'static Extension> {
        ALL.iter().find(|ext| ext.name == name)
    }

    /// Every known extension, ordered by index.
    pub fn all() -> &'static [Extension] {
        ALL
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

macro_rules! extensions {
    ($($index:literal $ident:ident $name:literal $required:ident $core:ident;)*) => {
        $(
            pub const $ident: Extension = Extension {
                index: $index,
                required_version: Version::$required,
                core_version: Version::$core,
                name: $name,
            };
        )*

        const ALL: &[Extension] = &[$($ident),*];
    };
}

extensions! {
    0  ARB_ES2_COMPATIBILITY "GL_ARB_ES2_compatibility" GL210 GL410;
    1  ARB_ES3_COMPATIBILITY "GL_ARB_ES3_compatibility" GL330 GL430;
    2  ARB_BASE_INSTANCE "GL_ARB_base_instance" GL210 GL420;
    3  ARB_BUFFER_STORAGE "GL_ARB_buffer_storage" GL430 GL440;
    4  ARB_COPY_BUFFER "GL_ARB_copy_buffer" GL210 GL310;
    5  ARB_DIRECT_STATE_ACCESS "GL_ARB_direct_state_access" GL210 GL450;
    6  ARB_DRAW_ELEMENTS_BASE_VERTEX "GL_ARB_draw_elements_base_vertex" GL210 GL320;
    7  ARB_DRAW_INSTANCED "GL_ARB_draw_instanced" GL210 GL310;
    8  ARB_EXPLICIT_ATTRIB_LOCATION "GL_ARB_explicit_attrib_location" GL210 GL330;
    9  ARB_EXPLICIT_UNIFORM_LOCATION "GL_ARB_explicit_uniform_location" GL210 GL430;
    10 ARB_GET_TEXTURE_SUB_IMAGE "GL_ARB_get_texture_sub_image" GL210 GL450;
    11 ARB_INSTANCED_ARRAYS "GL_ARB_instanced_arrays" GL210 GL330;
    12 ARB_INVALIDATE_SUBDATA "GL_ARB_invalidate_subdata" GL210 GL430;
    13 ARB_MAP_BUFFER_ALIGNMENT "GL_ARB_map_buffer_alignment" GL210 GL420;
    14 ARB_MAP_BUFFER_RANGE "GL_ARB_map_buffer_range" GL210 GL300;
    15 ARB_MULTI_BIND "GL_ARB_multi_bind" GL300 GL440;
    16 ARB_ROBUSTNESS "GL_ARB_robustness" GL210 None;
    17 ARB_SAMPLER_OBJECTS "GL_ARB_sampler_objects" GL210 GL330;
    18 ARB_SHADER_ATOMIC_COUNTERS "GL_ARB_shader_atomic_counters" GL300 GL420;
    19 ARB_SHADER_STORAGE_BUFFER_OBJECT "GL_ARB_shader_storage_buffer_object" GL400 GL430;
    20 ARB_SHADING_LANGUAGE_420PACK "GL_ARB_shading_language_420pack" GL300 GL420;
    21 ARB_STENCIL_TEXTURING "GL_ARB_stencil_texturing" GL210 GL430;
    22 ARB_TEXTURE_CUBE_MAP_ARRAY "GL_ARB_texture_cube_map_array" GL210 GL400;
    23 ARB_TEXTURE_FILTER_ANISOTROPIC "GL_ARB_texture_filter_anisotropic" GL210 GL460;
    24 ARB_TEXTURE_MIRROR_CLAMP_TO_EDGE "GL_ARB_texture_mirror_clamp_to_edge" GL210 GL440;
    25 ARB_TEXTURE_MULTISAMPLE "GL_ARB_texture_multisample" GL210 GL320;
    26 ARB_TEXTURE_STORAGE "GL_ARB_texture_storage" GL210 GL420;
    27 ARB_TEXTURE_SWIZZLE "GL_ARB_texture_swizzle" GL210 GL330;
    28 ARB_TIMER_QUERY "GL_ARB_timer_query" GL210 GL330;
    29 ARB_TRANSFORM_FEEDBACK3 "GL_ARB_transform_feedback3" GL210 GL400;
    30 ARB_UNIFORM_BUFFER_OBJECT "GL_ARB_uniform_buffer_object" GL210 GL310;
    31 ARB_VERTEX_ARRAY_OBJECT "GL_ARB_vertex_array_object" GL210 GL300;
    32 ARB_VERTEX_ATTRIB_64BIT "GL_ARB_vertex_attrib_64bit" GL300 GL410;
    33 ARB_VERTEX_ATTRIB_BINDING "GL_ARB_vertex_attrib_binding" GL210 GL430;
    34 EXT_DIRECT_STATE_ACCESS "GL_EXT_direct_state_access" GL210 None;
    35 EXT_TEXTURE_ARRAY "GL_EXT_texture_array" GL210 GL300;
    36 EXT_TEXTURE_FILTER_ANISOTROPIC "GL_EXT_texture_filter_anisotropic" GL210 None;
    37 EXT_TEXTURE_INTEGER "GL_EXT_texture_integer" GL210 GL300;
    38 EXT_TEXTURE_SRGB_DECODE "GL_EXT_texture_sRGB_decode" GL210 None;
    39 KHR_DEBUG "GL_KHR_debug" GL210 GL430;
    40 KHR_NO_ERROR "GL_KHR_no_error" GL210 GL460;
    41 KHR_ROBUSTNESS "GL_KHR_robustness" GL320 GL450;
}

/// Number of known extensions.
pub const EXTENSION_COUNT: usize = ALL.len();
