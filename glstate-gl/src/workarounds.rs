//! Driver detection and driver-specific workarounds.
use bitflags::bitflags;

bitflags! {
    /// Drivers recognized from the vendor string.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct DetectedDrivers: u8 {
        /// Proprietary AMD desktop drivers.
        const AMD = 1 << 0;
        /// Intel desktop drivers on Windows.
        const INTEL_WINDOWS = 1 << 1;
        /// Proprietary NVidia drivers.
        const NVIDIA = 1 << 2;
    }
}

/// Workarounds that can be disabled with
/// [`ContextOptions::disabled_workarounds`](crate::options::ContextOptions).
pub const KNOWN_WORKAROUNDS: &[&str] = &[
    // Core contexts created with an explicit version on AMD, NVidia and
    // Intel Windows drivers are pinned to that version.
    #[cfg(not(target_vendor = "apple"))]
    "no-forward-compatible-core-context",
    // Intel Windows GLSL compilers accept the 420pack keywords without
    // supporting them.
    #[cfg(windows)]
    "intel-windows-glsl-exposes-unsupported-shading-language-420pack",
    // glTransformFeedbackVaryings() keeps the passed pointers around until
    // link time on NVidia Windows drivers.
    #[cfg(windows)]
    "nv-windows-dangling-transform-feedback-varying-names",
    // Layout qualifiers fail to compile with GLSL 1.20 on Mesa, 1.30 on
    // NVidia and 1.40 on macOS.
    "no-layout-qualifiers-on-old-glsl",
    // NVidia reports compressed block size in bits instead of bytes.
    "nv-compressed-block-size-in-bits",
    // NVidia reports compressed cube map image size based on mutability
    // instead of on whether all faces are queried.
    "nv-cubemap-inconsistent-compressed-image-size",
    // NVidia returns only the first face of a compressed cube map queried
    // through ARB_direct_state_access.
    "nv-cubemap-broken-full-compressed-image-query",
];

/// Find the canonical name of a known workaround.
pub fn find_workaround(name: &str) -> Option<&'static str> {
    KNOWN_WORKAROUNDS.iter().copied().find(|w| *w == name)
}

/// Detect the driver from a `GL_VENDOR` string.
pub fn detect_driver(vendor: &str) -> DetectedDrivers {
    if cfg!(target_vendor = "apple") {
        return DetectedDrivers::empty();
    }

    if vendor.contains("ATI Technologies Inc.") {
        return DetectedDrivers::AMD;
    }

    if cfg!(windows) && vendor.contains("Intel") {
        return DetectedDrivers::INTEL_WINDOWS;
    }

    if vendor.contains("NVIDIA Corporation") {
        return DetectedDrivers::NVIDIA;
    }

    DetectedDrivers::empty()
}

/// Intel Windows drivers report `"No errors.\n"` instead of an empty
/// compilation or link log.
pub fn is_log_empty(drivers: DetectedDrivers, log: &str) -> bool {
    log.is_empty()
        || (cfg!(windows) && drivers.contains(DetectedDrivers::INTEL_WINDOWS) && log == "No errors.\n")
}

/// Workarounds that were queried or disabled during the context lifetime.
#[derive(Debug, Default, Clone)]
pub struct DriverWorkarounds {
    entries: Vec<(&'static str, bool)>,
}

impl DriverWorkarounds {
    /// Mark a workaround as disabled. Unknown names are ignored.
    pub fn disable(&mut self, name: &str) {
        let Some(found) = find_workaround(name) else {
            log::warn!("unknown driver workaround {name}");
            return;
        };

        match self.entries.iter_mut().find(|(w, _)| *w == found) {
            Some(entry) => entry.1 = true,
            None => self.entries.push((found, true)),
        }
    }

    /// Whether the workaround is disabled.
    ///
    /// A workaround that is asked for and not disabled is recorded as used.
    pub fn is_disabled(&mut self, name: &str) -> bool {
        let Some(found) = find_workaround(name) else {
            log::warn!("unknown driver workaround {name}");
            return false;
        };

        if let Some((_, disabled)) = self.entries.iter().find(|(w, _)| *w == found) {
            return *disabled;
        }

        self.entries.push((found, false));
        false
    }

    /// Workarounds that were applied.
    pub fn used(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(|(_, disabled)| !disabled)
            .map(|(name, _)| *name)
    }

    /// Workarounds that were explicitly disabled.
    pub fn disabled(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(|(_, disabled)| *disabled)
            .map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_vendors() {
        if cfg!(target_vendor = "apple") {
            return;
        }

        assert_eq!(detect_driver("ATI Technologies Inc."), DetectedDrivers::AMD);
        assert_eq!(detect_driver("NVIDIA Corporation"), DetectedDrivers::NVIDIA);
        assert_eq!(detect_driver("Mesa/X.org"), DetectedDrivers::empty());
        assert_eq!(
            detect_driver("Intel"),
            if cfg!(windows) {
                DetectedDrivers::INTEL_WINDOWS
            } else {
                DetectedDrivers::empty()
            }
        );
    }

    #[test]
    fn unknown_workaround_is_ignored() {
        let mut workarounds = DriverWorkarounds::default();
        workarounds.disable("definitely-not-a-workaround");
        assert_eq!(workarounds.disabled().count(), 0);
        assert!(!workarounds.is_disabled("definitely-not-a-workaround"));
        assert_eq!(workarounds.used().count(), 0);
    }

    #[test]
    fn query_records_use() {
        let mut workarounds = DriverWorkarounds::default();
        assert!(!workarounds.is_disabled("no-layout-qualifiers-on-old-glsl"));
        assert_eq!(
            workarounds.used().collect::<Vec<_>>(),
            vec!["no-layout-qualifiers-on-old-glsl"]
        );

        // asking again does not record twice
        assert!(!workarounds.is_disabled("no-layout-qualifiers-on-old-glsl"));
        assert_eq!(workarounds.used().count(), 1);
    }

    #[test]
    fn disabled_stays_disabled() {
        let mut workarounds = DriverWorkarounds::default();
        workarounds.disable("nv-compressed-block-size-in-bits");
        assert!(workarounds.is_disabled("nv-compressed-block-size-in-bits"));
        assert_eq!(workarounds.used().count(), 0);
        assert_eq!(
            workarounds.disabled().collect::<Vec<_>>(),
            vec!["nv-compressed-block-size-in-bits"]
        );
    }

    #[test]
    fn chatty_logs() {
        assert!(is_log_empty(DetectedDrivers::empty(), ""));
        assert!(!is_log_empty(DetectedDrivers::NVIDIA, "No errors.\n"));
        assert_eq!(
            is_log_empty(DetectedDrivers::INTEL_WINDOWS, "No errors.\n"),
            cfg!(windows)
        );
    }
}
