//! Static color-tone and quantization-level tables
//!
//! Pure domain data: each enum maps to its persisted key, its display label
//! and the coefficients the filter synthesizer reads. Nothing here mutates.

use std::fmt;

/// Number of discrete brightness steps each channel is reduced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantizationLevel {
    /// Legacy "filter off" value from records that predate `scope`
    Off,
    #[default]
    Four,
    Eight,
    Twelve,
    Sixteen,
}

const BREAKPOINTS_4: [f64; 4] = [0.08, 0.33, 0.66, 0.92];

const BREAKPOINTS_8: [f64; 8] = [0.06, 0.14, 0.28, 0.42, 0.56, 0.7, 0.85, 0.92];

const BREAKPOINTS_12: [f64; 12] = [
    0.06, 0.09, 0.18, 0.27, 0.36, 0.45, 0.55, 0.65, 0.75, 0.85, 0.90, 0.92,
];

// i/15 rounded to three places
const BREAKPOINTS_16: [f64; 16] = [
    0.0, 0.067, 0.133, 0.2, 0.267, 0.333, 0.4, 0.467, 0.533, 0.6, 0.667, 0.733, 0.8, 0.867,
    0.933, 1.0,
];

impl QuantizationLevel {
    /// Every level, including the legacy off value
    pub const ALL: [QuantizationLevel; 5] = [
        QuantizationLevel::Off,
        QuantizationLevel::Four,
        QuantizationLevel::Eight,
        QuantizationLevel::Twelve,
        QuantizationLevel::Sixteen,
    ];

    /// Levels a control may offer while the filter scope is on
    pub const SELECTABLE: [QuantizationLevel; 4] = [
        QuantizationLevel::Four,
        QuantizationLevel::Eight,
        QuantizationLevel::Twelve,
        QuantizationLevel::Sixteen,
    ];

    /// Persisted numeric value (also the breakpoint count)
    pub fn value(self) -> u8 {
        match self {
            QuantizationLevel::Off => 0,
            QuantizationLevel::Four => 4,
            QuantizationLevel::Eight => 8,
            QuantizationLevel::Twelve => 12,
            QuantizationLevel::Sixteen => 16,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }

    /// Ordered output values of the discrete mapping; empty for `Off`
    pub fn breakpoints(self) -> &'static [f64] {
        match self {
            QuantizationLevel::Off => &[],
            QuantizationLevel::Four => &BREAKPOINTS_4,
            QuantizationLevel::Eight => &BREAKPOINTS_8,
            QuantizationLevel::Twelve => &BREAKPOINTS_12,
            QuantizationLevel::Sixteen => &BREAKPOINTS_16,
        }
    }

    pub fn is_off(self) -> bool {
        self == QuantizationLevel::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            QuantizationLevel::Off => "Filter Off",
            QuantizationLevel::Four => "4 levels (Minimal)",
            QuantizationLevel::Eight => "8 levels (Retro)",
            QuantizationLevel::Twelve => "12 levels (Industrial)",
            QuantizationLevel::Sixteen => "16 levels (Smoother)",
        }
    }
}

/// Per-tone coefficients: post-quantization gains and breakpoint ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCoefficients {
    /// Gain matrix diagonal
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Red table scale
    pub r_base: f64,
    /// Green table scale
    pub g_ratio: f64,
    /// Blue table scale
    pub b_ratio: f64,
}

/// Named combination of channel gains and breakpoint scaling ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTone {
    #[default]
    Orange,
    YellowGreen,
    BlueGreen,
    PureRed,
    BlackWhite,
}

impl ColorTone {
    pub const ALL: [ColorTone; 5] = [
        ColorTone::Orange,
        ColorTone::YellowGreen,
        ColorTone::BlueGreen,
        ColorTone::PureRed,
        ColorTone::BlackWhite,
    ];

    /// Persisted key, also written to the color marker attribute
    pub fn key(self) -> &'static str {
        match self {
            ColorTone::Orange => "orange",
            ColorTone::YellowGreen => "yellow-green",
            ColorTone::BlueGreen => "blue-green",
            ColorTone::PureRed => "pure-red",
            ColorTone::BlackWhite => "black-white",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorTone::Orange => "ANSI Safety Orange",
            ColorTone::YellowGreen => "Luminescent Green",
            ColorTone::BlueGreen => "Bioluminescent Cyan",
            ColorTone::PureRed => "Night Vision Red",
            ColorTone::BlackWhite => "B & W",
        }
    }

    pub fn coefficients(self) -> ToneCoefficients {
        match self {
            ColorTone::Orange => ToneCoefficients {
                r: 1.30,
                g: 1.00,
                b: 0.00,
                r_base: 1.0,
                g_ratio: 0.7576,
                b_ratio: 0.0909,
            },
            ColorTone::YellowGreen => ToneCoefficients {
                r: 0.92,
                g: 0.90,
                b: 0.00,
                r_base: 0.98,
                g_ratio: 1.0102,
                b_ratio: 0.00,
            },
            ColorTone::BlueGreen => ToneCoefficients {
                r: 0.00,
                g: 1.00,
                b: 0.75,
                r_base: 0.80,
                g_ratio: 1.10,
                b_ratio: 1.20,
            },
            ColorTone::PureRed => ToneCoefficients {
                r: 1.40,
                g: 0.60,
                b: 0.20,
                r_base: 0.8,
                g_ratio: 0.15,
                b_ratio: 0.05,
            },
            ColorTone::BlackWhite => ToneCoefficients {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                r_base: 1.0,
                g_ratio: 1.0,
                b_ratio: 1.0,
            },
        }
    }

    /// True grayscale: all channels share the unscaled breakpoints
    pub fn is_grayscale(self) -> bool {
        self == ColorTone::BlackWhite
    }
}

impl fmt::Display for ColorTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shape of the pixelation pre-filter an effect requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelationStyle {
    Block,
    Diagonal,
}

impl PixelationStyle {
    /// Divisor applied to the effect pixel size to get the morphology radius
    pub fn radius_divisor(self) -> f64 {
        use crate::constants::filter::{BLOCK_RADIUS_DIVISOR, DIAGONAL_RADIUS_DIVISOR};
        match self {
            PixelationStyle::Block => BLOCK_RADIUS_DIVISOR,
            PixelationStyle::Diagonal => DIAGONAL_RADIUS_DIVISOR,
        }
    }
}

/// Overlay drawn by the host stylesheet, selected through a marker attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayEffect {
    #[default]
    None,
    Scanlines,
    DiagonalGrid,
    DotGrid,
    PixelationBlock,
    PixelationDiagonal,
}

impl OverlayEffect {
    pub const ALL: [OverlayEffect; 6] = [
        OverlayEffect::None,
        OverlayEffect::Scanlines,
        OverlayEffect::DiagonalGrid,
        OverlayEffect::DotGrid,
        OverlayEffect::PixelationBlock,
        OverlayEffect::PixelationDiagonal,
    ];

    /// Persisted numeric value
    pub fn value(self) -> u8 {
        match self {
            OverlayEffect::None => 0,
            OverlayEffect::Scanlines => 1,
            OverlayEffect::DiagonalGrid => 2,
            OverlayEffect::DotGrid => 3,
            OverlayEffect::PixelationBlock => 4,
            OverlayEffect::PixelationDiagonal => 5,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|effect| effect.value() == value)
    }

    /// Nominal cell size in pixels
    pub fn pixel_size(self) -> u16 {
        match self {
            OverlayEffect::None => 1,
            OverlayEffect::Scanlines => 4,
            OverlayEffect::DiagonalGrid => 8,
            OverlayEffect::DotGrid => 12,
            OverlayEffect::PixelationBlock => 16,
            OverlayEffect::PixelationDiagonal => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverlayEffect::None => "None",
            OverlayEffect::Scanlines => "CRT Scanlines",
            OverlayEffect::DiagonalGrid => "45° Diagonal Grid",
            OverlayEffect::DotGrid => "Square Dot Grid",
            OverlayEffect::PixelationBlock => "Pixelation (Block)",
            OverlayEffect::PixelationDiagonal => "Pixel + 45° Grid",
        }
    }

    /// Marker attribute the stylesheet keys on; `None` has no marker
    pub fn marker(self) -> Option<&'static str> {
        use crate::constants::markers;
        match self {
            OverlayEffect::None => None,
            OverlayEffect::Scanlines => Some(markers::SCANLINES),
            OverlayEffect::DiagonalGrid => Some(markers::DIAGONAL_GRID),
            OverlayEffect::DotGrid => Some(markers::DOT_GRID),
            OverlayEffect::PixelationBlock => Some(markers::PIXELATION_BLOCK),
            OverlayEffect::PixelationDiagonal => Some(markers::PIXELATION_DIAGONAL),
        }
    }

    /// Pixelation pre-filter requested by this effect, if any
    pub fn pixelation(self) -> Option<PixelationStyle> {
        match self {
            OverlayEffect::PixelationBlock => Some(PixelationStyle::Block),
            OverlayEffect::PixelationDiagonal => Some(PixelationStyle::Diagonal),
            OverlayEffect::None
            | OverlayEffect::Scanlines
            | OverlayEffect::DiagonalGrid
            | OverlayEffect::DotGrid => None,
        }
    }
}

/// Advisory extent of page content the filter should affect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Scope {
    Off,
    /// Interface chrome only
    #[default]
    Interface,
    InterfaceAndImages,
    InterfaceImagesAndVideo,
}

impl Scope {
    pub const ALL: [Scope; 4] = [
        Scope::Off,
        Scope::Interface,
        Scope::InterfaceAndImages,
        Scope::InterfaceImagesAndVideo,
    ];

    pub fn value(self) -> u8 {
        match self {
            Scope::Off => 0,
            Scope::Interface => 1,
            Scope::InterfaceAndImages => 2,
            Scope::InterfaceImagesAndVideo => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|scope| scope.value() == value)
    }

    pub fn is_off(self) -> bool {
        self == Scope::Off
    }

    pub fn label(self) -> &'static str {
        match self {
            Scope::Off => "Off",
            Scope::Interface => "Interface only",
            Scope::InterfaceAndImages => "Interface + images",
            Scope::InterfaceImagesAndVideo => "Interface + images + video",
        }
    }
}
