//! Filter synthesis
//!
//! Maps a configuration to a declarative filter pipeline: an optional
//! pixelation pre-filter, desaturation, per-channel discrete quantization and
//! a color gain matrix. The pipeline renders to SVG filter markup that the
//! page applies by id.
//!
//! Output is deterministic: identical inputs produce byte-identical markup,
//! and table values are rounded to three decimals exactly like fixed-point
//! decimal formatting does.

use crate::constants::filter::{
    ERODED, FILTER_ID, GAIN_PRECISION, MONO, PIXELATED, SOURCE_GRAPHIC, TABLE_PRECISION,
};
use crate::tables::{ColorTone, OverlayEffect, QuantizationLevel};

/// Morphology operator of a pixelation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyOperator {
    Erode,
    Dilate,
}

impl MorphologyOperator {
    fn as_str(self) -> &'static str {
        match self {
            MorphologyOperator::Erode => "erode",
            MorphologyOperator::Dilate => "dilate",
        }
    }
}

/// Per-channel discrete transfer tables
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTables {
    pub red: Vec<f64>,
    pub green: Vec<f64>,
    pub blue: Vec<f64>,
}

/// One image-processing step of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    Morphology {
        operator: MorphologyOperator,
        radius: f64,
        input: &'static str,
        result: &'static str,
    },
    /// Zero saturation, luminance kept
    Desaturate {
        input: &'static str,
        result: &'static str,
    },
    Quantize {
        input: &'static str,
        tables: ChannelTables,
    },
    /// Diagonal gains; alpha passes through
    GainMatrix { r: f64, g: f64, b: f64 },
}

/// Ordered stage list; empty means "no filter"
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPipeline {
    stages: Vec<FilterStage>,
}

impl FilterPipeline {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Quantization tables, if the pipeline has a quantization stage
    pub fn tables(&self) -> Option<&ChannelTables> {
        self.stages.iter().find_map(|stage| match stage {
            FilterStage::Quantize { tables, .. } => Some(tables),
            _ => None,
        })
    }

    /// SVG `<filter>` element; empty string for an empty pipeline
    pub fn to_markup(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut lines = vec![format!(
            r#"<filter id="{FILTER_ID}" color-interpolation-filters="sRGB">"#
        )];
        for stage in &self.stages {
            match stage {
                FilterStage::Morphology {
                    operator,
                    radius,
                    input,
                    result,
                } => lines.push(format!(
                    r#"  <feMorphology operator="{}" radius="{radius}" in="{input}" result="{result}"/>"#,
                    operator.as_str()
                )),
                FilterStage::Desaturate { input, result } => lines.push(format!(
                    r#"  <feColorMatrix type="saturate" values="0" in="{input}" result="{result}"/>"#
                )),
                FilterStage::Quantize { input, tables } => {
                    lines.push(format!(r#"  <feComponentTransfer in="{input}">"#));
                    for (func, values) in [
                        ("feFuncR", &tables.red),
                        ("feFuncG", &tables.green),
                        ("feFuncB", &tables.blue),
                    ] {
                        lines.push(format!(
                            r#"    <{func} type="discrete" tableValues="{}"/>"#,
                            join_table(values)
                        ));
                    }
                    lines.push("  </feComponentTransfer>".to_string());
                }
                FilterStage::GainMatrix { r, g, b } => {
                    let (r, g, b) = (gain(*r), gain(*g), gain(*b));
                    lines.push(format!(
                        r#"  <feColorMatrix type="matrix" values="{r} 0 0 0 0 0 {g} 0 0 0 0 0 {b} 0 0 0 0 0 1 0"/>"#
                    ));
                }
            }
        }
        lines.push("</filter>".to_string());
        lines.join("\n")
    }
}

/// Build the pipeline for a level, effect and color tone
pub fn build(level: QuantizationLevel, effect: OverlayEffect, color: ColorTone) -> FilterPipeline {
    if level.is_off() {
        return FilterPipeline::empty();
    }

    let mut stages = Vec::with_capacity(5);
    let mut source = SOURCE_GRAPHIC;

    if let Some(style) = effect.pixelation() {
        let radius = f64::from(effect.pixel_size()) / style.radius_divisor();
        stages.push(FilterStage::Morphology {
            operator: MorphologyOperator::Erode,
            radius,
            input: SOURCE_GRAPHIC,
            result: ERODED,
        });
        stages.push(FilterStage::Morphology {
            operator: MorphologyOperator::Dilate,
            radius,
            input: ERODED,
            result: PIXELATED,
        });
        source = PIXELATED;
    }

    stages.push(FilterStage::Desaturate {
        input: source,
        result: MONO,
    });
    stages.push(FilterStage::Quantize {
        input: MONO,
        tables: channel_tables(level, color),
    });

    let coefficients = color.coefficients();
    stages.push(FilterStage::GainMatrix {
        r: coefficients.r,
        g: coefficients.g,
        b: coefficients.b,
    });

    FilterPipeline { stages }
}

/// Derive the three channel tables from the level's breakpoints
pub fn channel_tables(level: QuantizationLevel, color: ColorTone) -> ChannelTables {
    let breakpoints = level.breakpoints();
    let scaled = |ratio: f64| -> Vec<f64> { breakpoints.iter().map(|v| round3(v * ratio)).collect() };

    if color.is_grayscale() {
        let gray: Vec<f64> = breakpoints.iter().copied().map(round3).collect();
        return ChannelTables {
            red: gray.clone(),
            green: gray.clone(),
            blue: gray,
        };
    }

    let coefficients = color.coefficients();
    ChannelTables {
        red: scaled(coefficients.r_base),
        green: scaled(coefficients.g_ratio),
        blue: scaled(coefficients.b_ratio),
    }
}

/// Round to three decimals via exact decimal formatting
pub fn round3(value: f64) -> f64 {
    let text = format!("{value:.prec$}", prec = TABLE_PRECISION);
    text.parse().unwrap_or(value)
}

fn gain(value: f64) -> String {
    format!("{value:.prec$}", prec = GAIN_PRECISION)
}

fn join_table(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
