//! Platform tags for conditionally typed properties.

use std::fmt;

/// Names the platform family a concrete property type belongs to.
///
/// The default tag is fixed at compile time by [`PlatformTag::current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag(&'static str);

impl PlatformTag {
    /// iOS, tvOS, watchOS and visionOS.
    pub const UIKIT: Self = Self("uikit");
    /// macOS and every other target.
    pub const APPKIT: Self = Self("appkit");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }

    #[cfg(any(
        target_os = "ios",
        target_os = "tvos",
        target_os = "watchos",
        target_os = "visionos"
    ))]
    pub const fn current() -> Self {
        Self::UIKIT
    }

    #[cfg(not(any(
        target_os = "ios",
        target_os = "tvos",
        target_os = "watchos",
        target_os = "visionos"
    )))]
    pub const fn current() -> Self {
        Self::APPKIT
    }
}

impl Default for PlatformTag {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
