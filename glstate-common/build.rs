#[cfg(feature = "opengl")]
pub fn main() {
    use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};
    use std::env;
    use std::fs::File;
    use std::path::Path;

    let dest = env::var("OUT_DIR").unwrap();
    let mut file =
        File::create(Path::new(&dest).join("gl_bindings.rs")).expect("Unable to create bindings file");

    Registry::new(
        Api::Gl,
        (4, 6),
        Profile::Core,
        Fallbacks::All,
        ["GL_EXT_direct_state_access", "GL_ARB_robustness"],
    )
    .write_bindings(GlobalGenerator, &mut file)
    .expect("Unable to write bindings.");
}

#[cfg(not(feature = "opengl"))]
pub fn main() {}
