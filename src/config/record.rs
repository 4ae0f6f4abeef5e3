//! Configuration record and its persisted JSON shape
//!
//! The stored object is `{"level":n,"effect":n,"color":"key","scope":n}`.
//! Records written before `scope` existed lack that field and are migrated
//! on decode.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::tables::{ColorTone, OverlayEffect, QuantizationLevel, Scope};

/// User preference for the filter overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub level: QuantizationLevel,
    pub effect: OverlayEffect,
    pub color: ColorTone,
    pub scope: Scope,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            level: QuantizationLevel::Four,
            effect: OverlayEffect::None,
            color: ColorTone::Orange,
            scope: Scope::Interface,
        }
    }
}

impl Configuration {
    /// Whether a filter should be installed at all
    pub fn is_active(&self) -> bool {
        !self.scope.is_off()
    }

    /// Decode a persisted record, migrating older shapes
    pub fn decode(json: &str) -> Result<Self, RecordError> {
        let stored: StoredRecord = serde_json::from_str(json)?;
        stored.into_configuration()
    }

    /// Encode to the persisted JSON shape (always includes `scope`)
    pub fn encode(&self) -> Result<String, RecordError> {
        let stored = StoredRecord::from(self);
        Ok(serde_json::to_string(&stored)?)
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported quantization level: {0}")]
    UnknownLevel(u8),

    #[error("unsupported overlay effect: {0}")]
    UnknownEffect(u8),

    #[error("unsupported scope: {0}")]
    UnknownScope(u8),
}

/// Wire shape of the record
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    level: u8,

    /// Older records may omit the effect entirely
    #[serde(default)]
    effect: u8,

    #[serde(default = "default_color_key")]
    color: String,

    /// Absent in records written before scope existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<u8>,
}

fn default_color_key() -> String {
    ColorTone::Orange.key().to_string()
}

impl From<&Configuration> for StoredRecord {
    fn from(config: &Configuration) -> Self {
        Self {
            level: config.level.value(),
            effect: config.effect.value(),
            color: config.color.key().to_string(),
            scope: Some(config.scope.value()),
        }
    }
}

impl StoredRecord {
    fn into_configuration(self) -> Result<Configuration, RecordError> {
        let mut level =
            QuantizationLevel::from_value(self.level).ok_or(RecordError::UnknownLevel(self.level))?;
        let effect =
            OverlayEffect::from_value(self.effect).ok_or(RecordError::UnknownEffect(self.effect))?;

        let color = ColorTone::from_key(&self.color).unwrap_or_else(|| {
            warn!(color = %self.color, fallback = %ColorTone::Orange, "Unknown color tone in record, using fallback");
            ColorTone::Orange
        });

        let scope = match self.scope {
            Some(raw) => Scope::from_value(raw).ok_or(RecordError::UnknownScope(raw))?,
            None => {
                let migrated = if level.is_off() { Scope::Off } else { Scope::Interface };
                info!(level = self.level, scope = migrated.value(), "Migrated record without scope");
                migrated
            }
        };

        // A filter that is on needs a real level; only pre-scope records may carry 0
        if !scope.is_off() && level.is_off() {
            warn!(scope = scope.value(), "Record enables the filter with level 0, recovering level 4");
            level = QuantizationLevel::Four;
        }

        Ok(Configuration {
            level,
            effect,
            color,
            scope,
        })
    }
}
