//! Generated OpenGL 4.6 core bindings with the `EXT_direct_state_access` and
//! `ARB_robustness` entry points.
#![allow(
    clippy::all,
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    unused_imports,
    dead_code
)]

include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
