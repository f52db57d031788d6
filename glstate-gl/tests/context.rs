use glstate_gl::extensions::{self, Extension};
use glstate_gl::options::{DISABLE_EXTENSIONS_ENV, DISABLE_WORKAROUNDS_ENV};
use glstate_gl::{Context, ContextFlags, ContextOptions, DriverInfo, GlStateError, States, Version};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn driver(vendor: &str, major: u32, minor: u32, extensions: &[&str]) -> DriverInfo {
    DriverInfo {
        vendor: vendor.to_string(),
        renderer: "Test Renderer".to_string(),
        version_string: format!("{major}.{minor}.0"),
        shading_language_version: format!("{major}.{minor}0"),
        shading_language_versions: vec![format!("{major}.{minor}0 core"), "1.10".to_string()],
        major,
        minor,
        flags: ContextFlags::empty(),
        extensions: extensions.iter().map(|s| s.to_string()).collect(),
        max_combined_texture_image_units: 16,
    }
}

#[test]
fn gl46_core_has_everything_in_core() {
    init_logger();
    let ctx = Context::new(driver("AMD", 4, 6, &[]), ContextOptions::default()).unwrap();

    for ext in Extension::all() {
        if ext.core_version() <= Version::GL460 {
            assert!(ctx.is_extension_supported(ext), "{ext} should be supported");
        } else {
            assert!(!ctx.is_extension_supported(ext), "{ext} is not advertised");
        }
    }
    assert_eq!(ctx.shading_language_version_strings().len(), 2);
}

#[test]
fn gl30_with_vendor_extensions() {
    init_logger();
    let ctx = Context::new(
        driver(
            "Mesa",
            3,
            0,
            &[
                "GL_ARB_texture_storage",
                "GL_EXT_texture_filter_anisotropic",
                "GL_ARB_texture_storage",
                "GL_ARB_shader_storage_buffer_object",
            ],
        ),
        ContextOptions::default(),
    )
    .unwrap();

    assert!(ctx.is_extension_supported(&extensions::ARB_TEXTURE_STORAGE));
    assert!(ctx.is_extension_supported(&extensions::EXT_TEXTURE_FILTER_ANISOTROPIC));
    // advertised, but needs a 4.0 context
    assert!(!ctx.is_extension_supported(&extensions::ARB_SHADER_STORAGE_BUFFER_OBJECT));

    // duplicates are listed once
    assert_eq!(
        ctx.supported_extensions(),
        &[
            extensions::ARB_TEXTURE_STORAGE,
            extensions::EXT_TEXTURE_FILTER_ANISOTROPIC,
            extensions::ARB_SHADER_STORAGE_BUFFER_OBJECT,
        ]
    );
}

#[test]
fn unknown_disabled_names_are_ignored() {
    init_logger();
    let options = ContextOptions {
        disabled_extensions: vec!["GL_not_an_extension".to_string()],
        disabled_workarounds: vec!["not-a-workaround".to_string()],
        log_used_extensions: false,
    };
    let ctx = Context::new(driver("AMD", 4, 3, &[]), options).unwrap();
    assert!(ctx.is_extension_supported(&extensions::ARB_INVALIDATE_SUBDATA));
    assert!(!ctx.is_driver_workaround_disabled("not-a-workaround"));
}

#[test]
fn disabled_extension_stays_disabled_for_every_version() {
    let options = ContextOptions {
        disabled_extensions: vec!["GL_ARB_texture_storage".to_string()],
        ..Default::default()
    };
    let ctx = Context::new(driver("AMD", 4, 2, &[]), options).unwrap();
    assert!(!ctx.is_extension_supported(&extensions::ARB_TEXTURE_STORAGE));
    assert!(ctx.is_extension_disabled(&extensions::ARB_TEXTURE_STORAGE));
    assert!(!ctx.is_extension_supported_for(&extensions::ARB_TEXTURE_STORAGE, Version::GL460));
}

#[test]
fn rejects_unsupported_versions() {
    let err = Context::new(driver("AMD", 2, 1, &[]), ContextOptions::default());
    assert!(matches!(err, Err(GlStateError::UnsupportedVersion(Version::GL210))));
}

#[test]
fn reset_state_is_harmless_without_objects() {
    let ctx = Context::new(driver("AMD", 3, 3, &[]), ContextOptions::default()).unwrap();
    ctx.reset_state(States::all());
    ctx.reset_state(States::TEXTURES | States::BUFFERS);
    assert_eq!(ctx.version(), Version::GL330);
}

#[test]
fn options_from_env() {
    std::env::set_var(
        DISABLE_EXTENSIONS_ENV,
        "GL_ARB_multi_bind, GL_ARB_direct_state_access",
    );
    std::env::set_var(DISABLE_WORKAROUNDS_ENV, "no-layout-qualifiers-on-old-glsl");
    let options = ContextOptions::from_env();
    std::env::remove_var(DISABLE_EXTENSIONS_ENV);
    std::env::remove_var(DISABLE_WORKAROUNDS_ENV);

    assert_eq!(
        options.disabled_extensions,
        vec!["GL_ARB_multi_bind", "GL_ARB_direct_state_access"]
    );
    assert_eq!(
        options.disabled_workarounds,
        vec!["no-layout-qualifiers-on-old-glsl"]
    );
    assert!(options.log_used_extensions);

    let ctx = Context::new(driver("AMD", 4, 6, &[]), options).unwrap();
    assert!(!ctx.is_extension_supported(&extensions::ARB_MULTI_BIND));
    assert!(ctx.is_extension_supported(&extensions::ARB_TEXTURE_STORAGE));
}
