//! RGBA colors and the per-platform color types.

use json_model::PlatformTag;

/// An RGBA color with floating-point components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Rgba {
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const BLUE: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };

    /// Channels outside `0.0..=1.0` are clamped; NaN becomes `0.0`.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    pub fn r(self) -> f64 {
        self.r
    }

    pub fn g(self) -> f64 {
        self.g
    }

    pub fn b(self) -> f64 {
        self.b
    }

    pub fn a(self) -> f64 {
        self.a
    }

    /// Builds a color from 8-bit channels, `255` mapping to `1.0`.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    /// 8-bit channels, rounded.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(channel8)
    }

    pub fn is_opaque(self) -> bool {
        channel8(self.a) == u8::MAX
    }
}

fn unit(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

fn channel8(c: f64) -> u8 {
    // Channels are kept in 0.0..=1.0, so the cast cannot truncate.
    (c * 255.0).round() as u8
}

/// A platform color type that property transformers can construct.
pub trait NativeColor: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Platform family this type belongs to.
    const PLATFORM: PlatformTag;

    fn from_rgba(rgba: Rgba) -> Self;

    fn rgba(&self) -> Rgba;

    fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(Rgba::from_rgba8(r, g, b, a))
    }
}

/// Color type of the UIKit platform family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UiColor(Rgba);

impl NativeColor for UiColor {
    const PLATFORM: PlatformTag = PlatformTag::UIKIT;

    fn from_rgba(rgba: Rgba) -> Self {
        Self(rgba)
    }

    fn rgba(&self) -> Rgba {
        self.0
    }
}

/// Color type of the AppKit platform family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NsColor(Rgba);

impl NativeColor for NsColor {
    const PLATFORM: PlatformTag = PlatformTag::APPKIT;

    fn from_rgba(rgba: Rgba) -> Self {
        Self(rgba)
    }

    fn rgba(&self) -> Rgba {
        self.0
    }
}

/// Color type of the platform this crate is compiled for.
#[cfg(any(
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
    target_os = "visionos"
))]
pub type PlatformColor = UiColor;

/// Color type of the platform this crate is compiled for.
#[cfg(not(any(
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
    target_os = "visionos"
)))]
pub type PlatformColor = NsColor;
