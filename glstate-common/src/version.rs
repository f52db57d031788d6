//! OpenGL version enumeration and parsing.
use std::fmt::{Display, Formatter};

/// A desktop OpenGL version.
///
/// Variants are declared in ascending order so that comparisons follow the
/// version number. [`Version::None`] orders above every real version and is
/// never supported by any context.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Version {
    GL210,
    GL300,
    GL310,
    GL320,
    GL330,
    GL400,
    GL410,
    GL420,
    GL430,
    GL440,
    GL450,
    GL460,
    None,
}

impl Version {
    /// Every real version, lowest first.
    pub const ALL: [Version; 12] = [
        Version::GL210,
        Version::GL300,
        Version::GL310,
        Version::GL320,
        Version::GL330,
        Version::GL400,
        Version::GL410,
        Version::GL420,
        Version::GL430,
        Version::GL440,
        Version::GL450,
        Version::GL460,
    ];

    /// Get the version for a major and minor number pair.
    ///
    /// Versions between known ones round down, versions newer than the
    /// newest known one map to [`Version::GL460`]. Anything older than 2.1
    /// yields `None`.
    pub fn from_major_minor(major: u32, minor: u32) -> Option<Version> {
        Version::ALL
            .iter()
            .rev()
            .find(|v| v.major_minor() <= (major, minor))
            .copied()
    }

    /// Parse the version out of a `GL_VERSION` string such as
    /// `"4.6.0 NVIDIA 460.89"`.
    pub fn parse(version_string: &str) -> Option<Version> {
        let (major, minor) = parse_version_numbers(version_string)?;
        Version::from_major_minor(major, minor)
    }

    pub fn major_minor(self) -> (u32, u32) {
        match self {
            Version::GL210 => (2, 1),
            Version::GL300 => (3, 0),
            Version::GL310 => (3, 1),
            Version::GL320 => (3, 2),
            Version::GL330 => (3, 3),
            Version::GL400 => (4, 0),
            Version::GL410 => (4, 1),
            Version::GL420 => (4, 2),
            Version::GL430 => (4, 3),
            Version::GL440 => (4, 4),
            Version::GL450 => (4, 5),
            Version::GL460 => (4, 6),
            Version::None => (0xFFFF, 0xFFFF),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::None => f.write_str("None"),
            v => {
                let (major, minor) = v.major_minor();
                write!(f, "OpenGL {major}.{minor}")
            }
        }
    }
}

/// Find the first `major.minor` pair in a version string.
fn parse_version_numbers(version_string: &str) -> Option<(u32, u32)> {
    for word in version_string.split_whitespace() {
        let Some((major, rest)) = word.split_once('.') else {
            continue;
        };

        let Ok(major) = major.parse::<u32>() else {
            continue;
        };

        let minor = rest.split('.').next().unwrap_or(rest);
        if let Ok(minor) = minor.parse::<u32>() {
            return Some((major, minor));
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn none_orders_above_everything() {
        assert!(Version::None > Version::GL460);
        assert!(Version::GL210 < Version::GL300);
        assert!(Version::GL330 < Version::GL400);
    }

    #[test]
    fn rounds_down_unknown_minor() {
        assert_eq!(Version::from_major_minor(3, 5), Some(Version::GL330));
        assert_eq!(Version::from_major_minor(4, 9), Some(Version::GL460));
        assert_eq!(Version::from_major_minor(5, 0), Some(Version::GL460));
        assert_eq!(Version::from_major_minor(1, 5), None);
    }

    #[test]
    fn parse_driver_strings() {
        assert_eq!(Version::parse("4.6.0 NVIDIA 460.89"), Some(Version::GL460));
        assert_eq!(
            Version::parse("3.3 (Core Profile) Mesa 21.2.6"),
            Some(Version::GL330)
        );
        assert_eq!(Version::parse("4.1 ATI-4.5.14"), Some(Version::GL410));
        assert_eq!(Version::parse("garbage"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Version::GL450.to_string(), "OpenGL 4.5");
        assert_eq!(Version::None.to_string(), "None");
    }
}
