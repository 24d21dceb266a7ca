//! Per-tool parameter sets.
//!
//! Commands own clones of these; a command never looks at a tool again
//! after it has been constructed.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::fill::Tolerance;

pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
pub const DEFAULT_SPRAY_RADIUS: f32 = 20.0;
pub const DEFAULT_DROPLET_RADIUS: f32 = 1.0;
pub const DEFAULT_SPRAY_FREQUENCY: f32 = 20.0;
pub const DEFAULT_SPRAY_DENSITY: u32 = 20;
pub const DEFAULT_PLUME_LENGTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PencilSettings {
    pub color: Color,
    pub line_width: f32,
}

impl Default for PencilSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Stamp pattern for the brush tool.
///
/// Patterns are evaluated in canvas coordinates so overlapping stamps line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushTexture {
    #[default]
    Solid,
    Dotted,
    Hatched,
    CrossHatched,
    Grain,
}

impl BrushTexture {
    pub const ALL: [BrushTexture; 5] = [
        BrushTexture::Solid,
        BrushTexture::Dotted,
        BrushTexture::Hatched,
        BrushTexture::CrossHatched,
        BrushTexture::Grain,
    ];

    pub fn covers(self, x: usize, y: usize) -> bool {
        match self {
            BrushTexture::Solid => true,
            BrushTexture::Dotted => x % 2 == 0 && y % 2 == 0,
            BrushTexture::Hatched => (x + y) % 4 == 0,
            BrushTexture::CrossHatched => (x + y) % 4 == 0 || (x + 4 - y % 4) % 4 == 0,
            BrushTexture::Grain => {
                // Cheap integer hash, stable across runs so replay is exact
                let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
                h ^= h >> 15;
                h = h.wrapping_mul(0xC2B2_AE3D);
                h ^= h >> 13;
                h % 3 != 0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: Color,
    /// Side of the square stamp
    pub line_width: f32,
    pub texture: BrushTexture,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            texture: BrushTexture::Solid,
        }
    }
}

/// Calligraphy pen: a fixed-length nib dragged at a fixed angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeSettings {
    pub color: Color,
    pub line_width: f32,
    pub line_length: f32,
    pub angle_degrees: f32,
}

impl Default for PlumeSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            line_length: DEFAULT_PLUME_LENGTH,
            angle_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpraySettings {
    pub color: Color,
    /// Radius of the area droplets land in
    pub radius: f32,
    pub droplet_radius: f32,
    /// Bursts per second while the pointer is held
    pub frequency_hz: f32,
    /// Droplets per burst
    pub density: u32,
}

impl Default for SpraySettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            radius: DEFAULT_SPRAY_RADIUS,
            droplet_radius: DEFAULT_DROPLET_RADIUS,
            frequency_hz: DEFAULT_SPRAY_FREQUENCY,
            density: DEFAULT_SPRAY_DENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectangleStyle {
    /// Contour only, in the secondary color
    Empty,
    /// Primary fill with a secondary contour
    FilledContour,
    /// Primary fill, no contour
    #[default]
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleSettings {
    pub primary: Color,
    pub secondary: Color,
    pub line_width: f32,
    pub style: RectangleStyle,
    pub line_dash: bool,
}

impl Default for RectangleSettings {
    fn default() -> Self {
        Self {
            primary: Color::BLACK,
            secondary: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            style: RectangleStyle::Filled,
            line_dash: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketSettings {
    pub color: Color,
    pub tolerance: Tolerance,
}

/// Frozen copy of whichever tool produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolParameters {
    Pencil(PencilSettings),
    Brush(BrushSettings),
    Plume(PlumeSettings),
    Spray(SpraySettings),
    Rectangle(RectangleSettings),
    PaintBucket(BucketSettings),
}
