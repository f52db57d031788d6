//! Context creation options.

/// Environment variable holding extensions to disable, separated by spaces
/// or commas.
pub const DISABLE_EXTENSIONS_ENV: &str = "GLSTATE_DISABLE_EXTENSIONS";

/// Environment variable holding driver workarounds to disable, separated by
/// spaces or commas.
pub const DISABLE_WORKAROUNDS_ENV: &str = "GLSTATE_DISABLE_WORKAROUNDS";

/// Options for context creation.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Extensions that are never used, even if the driver advertises them.
    pub disabled_extensions: Vec<String>,
    /// Driver workarounds that are not applied.
    pub disabled_workarounds: Vec<String>,
    /// Log the optional features and workarounds in use after creation.
    pub log_used_extensions: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        ContextOptions {
            disabled_extensions: Vec::new(),
            disabled_workarounds: Vec::new(),
            log_used_extensions: true,
        }
    }
}

impl ContextOptions {
    /// Read options from the `GLSTATE_DISABLE_EXTENSIONS` and
    /// `GLSTATE_DISABLE_WORKAROUNDS` environment variables.
    pub fn from_env() -> ContextOptions {
        let read = |name: &str| {
            std::env::var(name)
                .map(|value| split_list(&value))
                .unwrap_or_default()
        };

        ContextOptions {
            disabled_extensions: read(DISABLE_EXTENSIONS_ENV),
            disabled_workarounds: read(DISABLE_WORKAROUNDS_ENV),
            ..Default::default()
        }
    }
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
