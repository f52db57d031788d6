//! The OpenGL context: version and extension negotiation, driver
//! workarounds and ownership of the state trackers.
use crate::error::{GlStateError, Result};
use crate::extensions::{self, Extension, EXTENSION_COUNT};
use crate::options::ContextOptions;
use crate::renderer::Renderer;
use crate::state::{State, StateHandle};
use crate::workarounds::{self, DetectedDrivers, DriverWorkarounds};
use bitflags::bitflags;
use glstate_common::gl;
use glstate_common::gl::types::{GLenum, GLint, GLuint};
use glstate_common::map::FastHashSet;
use glstate_common::Version;
use std::cell::RefCell;
use std::ffi::{c_void, CStr};
use std::rc::Rc;

bitflags! {
    /// Flags the context was created with.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct ContextFlags: u32 {
        const DEBUG = gl::CONTEXT_FLAG_DEBUG_BIT;
        const ROBUST_ACCESS = gl::CONTEXT_FLAG_ROBUST_ACCESS_BIT;
        const NO_ERROR = gl::CONTEXT_FLAG_NO_ERROR_BIT;
    }
}

bitflags! {
    /// Cached state that can be reset after foreign code touched the context.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct States: u8 {
        /// Buffer bindings.
        const BUFFERS = 1 << 0;
        /// The bound vertex array object.
        const MESHES = 1 << 1;
        /// The program in use.
        const SHADERS = 1 << 2;
        /// Texture unit bindings and the active texture unit.
        const TEXTURES = 1 << 3;
    }
}

/// Information reported by the driver at context creation.
#[derive(Debug, Clone, Default)]
pub struct DriverInfo {
    pub vendor: String,
    pub renderer: String,
    pub version_string: String,
    pub shading_language_version: String,
    pub shading_language_versions: Vec<String>,
    pub major: u32,
    pub minor: u32,
    pub flags: ContextFlags,
    pub extensions: Vec<String>,
    pub max_combined_texture_image_units: u32,
}

unsafe fn get_string(name: GLenum) -> String {
    let ptr = gl::GetString(name);
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
}

unsafe fn get_string_indexed(name: GLenum, count: GLenum) -> Vec<String> {
    let mut num: GLint = 0;
    gl::GetIntegerv(count, &mut num);
    (0..num.max(0) as GLuint)
        .filter_map(|i| {
            let ptr = gl::GetStringi(name, i);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
            }
        })
        .collect()
}

impl DriverInfo {
    /// Query the driver of the current context.
    ///
    /// # Safety
    /// A context must be current on this thread and the entry points must be
    /// loaded.
    pub unsafe fn query() -> Result<DriverInfo> {
        for (name, loaded) in [
            ("glGetString", gl::GetString::is_loaded()),
            ("glGetStringi", gl::GetStringi::is_loaded()),
            ("glGetIntegerv", gl::GetIntegerv::is_loaded()),
        ] {
            if !loaded {
                return Err(GlStateError::FunctionLoad(name));
            }
        }

        let version_string = get_string(gl::VERSION);

        let mut major: GLint = 0;
        let mut minor: GLint = 0;
        gl::GetIntegerv(gl::MAJOR_VERSION, &mut major);
        gl::GetIntegerv(gl::MINOR_VERSION, &mut minor);

        // 2.1 contexts don't know GL_MAJOR_VERSION
        let (major, minor) = if major <= 0 {
            Version::parse(&version_string)
                .map(Version::major_minor)
                .ok_or_else(|| GlStateError::InvalidVersionString(version_string.clone()))?
        } else {
            (major as u32, minor as u32)
        };

        let mut flags: GLint = 0;
        if major >= 3 {
            gl::GetIntegerv(gl::CONTEXT_FLAGS, &mut flags);
        }

        let shading_language_versions = if (major, minor) >= (4, 3) {
            get_string_indexed(gl::SHADING_LANGUAGE_VERSION, gl::NUM_SHADING_LANGUAGE_VERSIONS)
        } else {
            Vec::new()
        };

        let mut max_units: GLint = 0;
        gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut max_units);

        Ok(DriverInfo {
            vendor: get_string(gl::VENDOR),
            renderer: get_string(gl::RENDERER),
            version_string,
            shading_language_version: get_string(gl::SHADING_LANGUAGE_VERSION),
            shading_language_versions,
            major,
            minor,
            flags: ContextFlags::from_bits_truncate(flags as u32),
            extensions: get_string_indexed(gl::EXTENSIONS, gl::NUM_EXTENSIONS),
            max_combined_texture_image_units: max_units.max(0) as u32,
        })
    }
}

/// Extension availability as seen by the state trackers.
#[derive(Debug, Clone)]
pub(crate) struct ExtensionSupport {
    version: Version,
    status: u64,
    required: [Version; EXTENSION_COUNT],
}

impl ExtensionSupport {
    fn new(version: Version) -> Self {
        let mut required = [Version::None; EXTENSION_COUNT];
        let mut status = 0;
        for ext in Extension::all() {
            required[ext.index()] = ext.required_version();
            if ext.core_version() <= version {
                status |= 1 << ext.index();
            }
        }

        ExtensionSupport {
            version,
            status,
            required,
        }
    }

    fn mark_supported(&mut self, ext: &Extension) {
        self.status |= 1 << ext.index();
    }

    fn raise_required_version(&mut self, ext: &Extension, version: Version) {
        let required = &mut self.required[ext.index()];
        if *required < version {
            *required = version;
        }
    }

    pub fn is_supported(&self, ext: &Extension) -> bool {
        self.is_supported_for(ext, self.version)
    }

    pub fn is_supported_for(&self, ext: &Extension, version: Version) -> bool {
        self.required[ext.index()] <= version && self.status & (1 << ext.index()) != 0
    }

    pub fn is_disabled_for(&self, ext: &Extension, version: Version) -> bool {
        ext.required_version() <= version && self.required[ext.index()] > version
    }

    #[cfg(test)]
    pub fn with(version: Version, advertised: &[Extension]) -> Self {
        let mut support = ExtensionSupport::new(version);
        for ext in advertised {
            support.mark_supported(ext);
        }
        support
    }
}

/// An OpenGL context with its cached state.
///
/// Objects created from a context share its state trackers and must only be
/// used while the context is current on the creating thread.
pub struct Context {
    info: DriverInfo,
    version: Version,
    extensions: ExtensionSupport,
    supported_extensions: Vec<Extension>,
    workarounds: RefCell<DriverWorkarounds>,
    detected_drivers: DetectedDrivers,
    state: StateHandle,
}

impl Context {
    /// Load the entry points with the given loader, query the driver of the
    /// current context and create the context wrapper.
    ///
    /// # Safety
    /// A context must be current on this thread, and `loader` must return
    /// valid function pointers for it.
    pub unsafe fn load_with<F>(loader: F, options: ContextOptions) -> Result<Context>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        let info = DriverInfo::query()?;
        Context::new(info, options)
    }

    /// Create the context wrapper from already gathered driver information.
    ///
    /// No OpenGL calls are made.
    pub fn new(info: DriverInfo, options: ContextOptions) -> Result<Context> {
        let version = Version::from_major_minor(info.major, info.minor)
            .ok_or_else(|| GlStateError::InvalidVersionString(info.version_string.clone()))?;
        if version < Version::GL300 {
            return Err(GlStateError::UnsupportedVersion(version));
        }

        let mut extensions = ExtensionSupport::new(version);

        // Everything from current and older versions is already marked,
        // only newer and vendor extensions are listed.
        let mut supported_extensions = Vec::new();
        let mut seen = FastHashSet::default();
        for name in &info.extensions {
            let Some(ext) = Extension::find(name) else {
                continue;
            };
            if ext.core_version() > version && seen.insert(ext.index()) {
                extensions.mark_supported(ext);
                supported_extensions.push(*ext);
            }
        }

        for name in &options.disabled_extensions {
            match Extension::find(name) {
                Some(ext) => {
                    log::debug!("disabling extension {ext}");
                    extensions.raise_required_version(ext, Version::None);
                }
                None => log::warn!("unknown extension {name} can't be disabled"),
            }
        }

        let mut workarounds = DriverWorkarounds::default();
        for name in &options.disabled_workarounds {
            workarounds.disable(name);
        }

        let detected = workarounds::detect_driver(&info.vendor);
        setup_driver_workarounds(&mut extensions, &mut workarounds, detected);

        let (state, used_extensions) = State::new(&extensions, &info);

        log::info!("Renderer: {} by {}", info.renderer, info.vendor);
        log::info!("OpenGL version: {}", info.version_string);
        if options.log_used_extensions {
            if !used_extensions.is_empty() {
                log::info!("Using optional features:");
                for ext in &used_extensions {
                    log::info!("    {ext}");
                }
            }

            let used: Vec<_> = workarounds.used().collect();
            if !used.is_empty() {
                log::info!("Using driver workarounds:");
                for workaround in used {
                    log::info!("    {workaround}");
                }
            }
        }

        Ok(Context {
            info,
            version,
            extensions,
            supported_extensions,
            workarounds: RefCell::new(workarounds),
            detected_drivers: detected,
            state: Rc::new(RefCell::new(state)),
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn vendor_string(&self) -> &str {
        &self.info.vendor
    }

    pub fn renderer_string(&self) -> &str {
        &self.info.renderer
    }

    pub fn version_string(&self) -> &str {
        &self.info.version_string
    }

    pub fn shading_language_version_string(&self) -> &str {
        &self.info.shading_language_version
    }

    /// Every supported shading language version string.
    ///
    /// Contexts older than 4.3 can't list them, so only the primary
    /// version is returned there.
    pub fn shading_language_version_strings(&self) -> Vec<&str> {
        if self.info.shading_language_versions.is_empty() {
            return vec![self.info.shading_language_version.as_str()];
        }
        self.info
            .shading_language_versions
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// All extension strings advertised by the driver.
    pub fn extension_strings(&self) -> &[String] {
        &self.info.extensions
    }

    pub fn flags(&self) -> ContextFlags {
        self.info.flags
    }

    /// Known extensions advertised by the driver that are not part of the
    /// core of the context version.
    pub fn supported_extensions(&self) -> &[Extension] {
        &self.supported_extensions
    }

    pub fn is_version_supported(&self, version: Version) -> bool {
        self.version >= version
    }

    /// The first supported version from the list, or [`Version::GL210`].
    pub fn supported_version(&self, versions: &[Version]) -> Version {
        versions
            .iter()
            .copied()
            .find(|v| self.is_version_supported(*v))
            .unwrap_or(Version::GL210)
    }

    /// Whether the extension is supported and usable with the context
    /// version.
    pub fn is_extension_supported(&self, ext: &Extension) -> bool {
        self.extensions.is_supported(ext)
    }

    /// Whether the extension would be usable with the given version.
    pub fn is_extension_supported_for(&self, ext: &Extension, version: Version) -> bool {
        self.extensions.is_supported_for(ext, version)
    }

    /// Whether the extension is disabled, either explicitly or because a
    /// driver workaround raised its minimal required version.
    pub fn is_extension_disabled(&self, ext: &Extension) -> bool {
        self.extensions.is_disabled_for(ext, self.version)
    }

    pub fn is_extension_disabled_for(&self, ext: &Extension, version: Version) -> bool {
        self.extensions.is_disabled_for(ext, version)
    }

    /// The driver recognized from the vendor string at creation.
    pub fn detected_driver(&self) -> DetectedDrivers {
        self.detected_drivers
    }

    /// Whether the named workaround is disabled. Querying a workaround that
    /// wasn't disabled marks it as used.
    pub fn is_driver_workaround_disabled(&self, name: &str) -> bool {
        self.workarounds.borrow_mut().is_disabled(name)
    }

    /// Workarounds in use.
    pub fn driver_workarounds(&self) -> Vec<&'static str> {
        self.workarounds.borrow().used().collect()
    }

    /// Forget the cached state so the next operations reach the driver.
    ///
    /// Needed after code outside of this crate changed bindings.
    pub fn reset_state(&self, states: States) {
        self.state.borrow_mut().reset(states);
    }

    /// The renderer of this context.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self)
    }

    pub(crate) fn state(&self) -> StateHandle {
        Rc::clone(&self.state)
    }
}

fn setup_driver_workarounds(
    extensions: &mut ExtensionSupport,
    workarounds: &mut DriverWorkarounds,
    detected: DetectedDrivers,
) {
    if cfg!(windows)
        && detected.contains(DetectedDrivers::INTEL_WINDOWS)
        && !extensions.is_supported(&extensions::ARB_SHADING_LANGUAGE_420PACK)
        && !workarounds
            .is_disabled("intel-windows-glsl-exposes-unsupported-shading-language-420pack")
    {
        extensions.raise_required_version(&extensions::ARB_SHADING_LANGUAGE_420PACK, Version::None);
    }

    if !workarounds.is_disabled("no-layout-qualifiers-on-old-glsl") {
        extensions.raise_required_version(&extensions::ARB_EXPLICIT_ATTRIB_LOCATION, Version::GL320);
        extensions.raise_required_version(&extensions::ARB_EXPLICIT_UNIFORM_LOCATION, Version::GL320);
        extensions.raise_required_version(&extensions::ARB_SHADING_LANGUAGE_420PACK, Version::GL320);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    pub(crate) fn info(major: u32, minor: u32, extensions: &[&str]) -> DriverInfo {
        DriverInfo {
            vendor: "NVIDIA Corporation".to_string(),
            renderer: "GeForce GTX 1080/PCIe/SSE2".to_string(),
            version_string: format!("{major}.{minor}.0 NVIDIA 460.89"),
            shading_language_version: "4.60 NVIDIA".to_string(),
            shading_language_versions: Vec::new(),
            major,
            minor,
            flags: ContextFlags::empty(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            max_combined_texture_image_units: 32,
        }
    }

    #[test]
    fn rejects_old_versions() {
        let err = Context::new(info(2, 1, &[]), ContextOptions::default());
        assert!(matches!(err, Err(GlStateError::UnsupportedVersion(Version::GL210))));

        let err = Context::new(info(1, 5, &[]), ContextOptions::default());
        assert!(matches!(err, Err(GlStateError::InvalidVersionString(_))));
    }

    #[test]
    fn core_extensions_are_supported_without_strings() {
        let ctx = Context::new(info(4, 5, &[]), ContextOptions::default()).unwrap();
        assert!(ctx.is_extension_supported(&extensions::ARB_DIRECT_STATE_ACCESS));
        assert!(ctx.is_extension_supported(&extensions::ARB_MULTI_BIND));
        assert!(!ctx.is_extension_supported(&extensions::EXT_DIRECT_STATE_ACCESS));
        assert!(ctx.supported_extensions().is_empty());
    }

    #[test]
    fn advertised_extensions_are_supported() {
        let ctx = Context::new(
            info(3, 3, &["GL_EXT_direct_state_access", "GL_ARB_multi_bind", "GL_NV_whatever"]),
            ContextOptions::default(),
        )
        .unwrap();

        assert!(ctx.is_extension_supported(&extensions::EXT_DIRECT_STATE_ACCESS));
        assert!(ctx.is_extension_supported(&extensions::ARB_MULTI_BIND));
        assert!(!ctx.is_extension_supported(&extensions::ARB_DIRECT_STATE_ACCESS));
        assert_eq!(
            ctx.supported_extensions(),
            &[extensions::EXT_DIRECT_STATE_ACCESS, extensions::ARB_MULTI_BIND]
        );
    }

    #[test]
    fn supported_for_version() {
        let ctx = Context::new(info(3, 0, &["GL_ARB_shader_storage_buffer_object"]), ContextOptions::default())
            .unwrap();
        // needs 4.0
        assert!(!ctx.is_extension_supported(&extensions::ARB_SHADER_STORAGE_BUFFER_OBJECT));
        assert!(ctx.is_extension_supported_for(
            &extensions::ARB_SHADER_STORAGE_BUFFER_OBJECT,
            Version::GL400
        ));
    }

    #[test]
    fn disabled_extensions() {
        let options = ContextOptions {
            disabled_extensions: vec!["GL_ARB_direct_state_access".to_string(), "GL_bogus".to_string()],
            ..Default::default()
        };
        let ctx = Context::new(info(4, 6, &[]), options).unwrap();
        assert!(!ctx.is_extension_supported(&extensions::ARB_DIRECT_STATE_ACCESS));
        assert!(ctx.is_extension_disabled(&extensions::ARB_DIRECT_STATE_ACCESS));
        assert!(!ctx.is_extension_disabled(&extensions::ARB_MULTI_BIND));
    }

    #[test]
    fn layout_qualifier_workaround() {
        let ctx = Context::new(
            info(3, 0, &["GL_ARB_explicit_attrib_location", "GL_ARB_explicit_uniform_location"]),
            ContextOptions::default(),
        )
        .unwrap();

        assert!(!ctx.is_extension_supported(&extensions::ARB_EXPLICIT_ATTRIB_LOCATION));
        assert!(ctx.is_extension_disabled(&extensions::ARB_EXPLICIT_ATTRIB_LOCATION));
        assert!(ctx.is_extension_supported_for(
            &extensions::ARB_EXPLICIT_UNIFORM_LOCATION,
            Version::GL320
        ));
        assert!(ctx
            .driver_workarounds()
            .contains(&"no-layout-qualifiers-on-old-glsl"));
    }

    #[test]
    fn layout_qualifier_workaround_disabled() {
        let options = ContextOptions {
            disabled_workarounds: vec!["no-layout-qualifiers-on-old-glsl".to_string()],
            ..Default::default()
        };
        let ctx = Context::new(info(3, 0, &["GL_ARB_explicit_attrib_location"]), options).unwrap();
        assert!(ctx.is_extension_supported(&extensions::ARB_EXPLICIT_ATTRIB_LOCATION));
        assert!(ctx.is_driver_workaround_disabled("no-layout-qualifiers-on-old-glsl"));
        assert!(ctx.driver_workarounds().is_empty());
    }

    #[test]
    fn supported_version_picks_first() {
        let ctx = Context::new(info(3, 3, &[]), ContextOptions::default()).unwrap();
        assert_eq!(
            ctx.supported_version(&[Version::GL450, Version::GL330, Version::GL300]),
            Version::GL330
        );
        assert_eq!(ctx.supported_version(&[Version::GL460]), Version::GL210);
        assert!(ctx.is_version_supported(Version::GL300));
        assert!(!ctx.is_version_supported(Version::None));
    }

    #[test]
    fn strings_and_driver() {
        let mut driver = info(4, 6, &[]);
        driver.flags = ContextFlags::DEBUG | ContextFlags::ROBUST_ACCESS;
        let ctx = Context::new(driver, ContextOptions::default()).unwrap();

        assert_eq!(ctx.version(), Version::GL460);
        assert_eq!(ctx.vendor_string(), "NVIDIA Corporation");
        assert_eq!(ctx.shading_language_version_strings(), vec!["4.60 NVIDIA"]);
        assert!(ctx.flags().contains(ContextFlags::DEBUG));
        if !cfg!(target_vendor = "apple") {
            assert_eq!(ctx.detected_driver(), DetectedDrivers::NVIDIA);
        }
    }
}
