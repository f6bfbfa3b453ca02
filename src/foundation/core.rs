use crate::foundation::error::{CourseError, CourseResult};

pub use kurbo::{Line, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Zero-based frame number.
pub struct FrameIndex(pub u64);

/// Rational frame rate `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator; always > 0.
    pub den: u32,
}

impl Fps {
    /// Rejects a zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> CourseResult<Self> {
        if den == 0 {
            return Err(CourseError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CourseError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Seconds per frame.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of the start of `frame`.
    pub fn frame_to_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_secs()
    }

    /// Frames needed to cover `secs`, rounded up. Negative input yields 0.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// `#rrggbb`, alpha is carried separately by renderers as opacity.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha in `[0, 1]`.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

const TRAVELER_PALETTE: [Rgba8; 10] = [
    Rgba8::rgb(0xe6, 0x4b, 0x3c),
    Rgba8::rgb(0x34, 0x98, 0xdb),
    Rgba8::rgb(0x2e, 0xcc, 0x71),
    Rgba8::rgb(0xf1, 0xc4, 0x0f),
    Rgba8::rgb(0x9b, 0x59, 0xb6),
    Rgba8::rgb(0xe6, 0x7e, 0x22),
    Rgba8::rgb(0x1a, 0xbc, 0x9c),
    Rgba8::rgb(0xec, 0x70, 0xa8),
    Rgba8::rgb(0x95, 0xa5, 0xa6),
    Rgba8::rgb(0x8e, 0x6c, 0x3a),
];

/// Palette colour for a traveler colour index; indices wrap around.
pub fn traveler_color(color_index: u32) -> Rgba8 {
    TRAVELER_PALETTE[(color_index as usize) % TRAVELER_PALETTE.len()]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
