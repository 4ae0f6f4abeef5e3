//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Persisted preference record location
pub mod storage {
    /// Fixed key the preference record is stored under (also the file stem)
    pub const STORAGE_KEY: &str = "hfs_orange_filter";

    /// Directory created under the per-user config dir
    pub const APP_DIR: &str = "hfs-orange-filter";

    /// Extension of the record file
    pub const FILE_EXTENSION: &str = "json";

    /// Environment variable that overrides the record file path
    pub const STORE_PATH_ENV: &str = "ORANGE_FILTER_STORE";
}

/// Marker attributes set on the document root for the host stylesheet
pub mod markers {
    /// Present (`"true"`) whenever a filter is installed
    pub const FILTER_ENABLED: &str = "data-orange-filter";

    /// Color tone key of the installed filter
    pub const COLOR_TONE: &str = "data-color-filter";

    /// Advisory scope ordinal (1-3)
    pub const SCOPE: &str = "data-filter-scope";

    pub const SCANLINES: &str = "data-scanlines-effect";
    pub const DIAGONAL_GRID: &str = "data-grid-effect";
    pub const DOT_GRID: &str = "data-dotgrid-effect";
    pub const PIXELATION_BLOCK: &str = "data-pixelation-effect";
    pub const PIXELATION_DIAGONAL: &str = "data-pixel-diag-grid-effect";

    /// Every mutually exclusive effect marker, cleared before one is set
    pub const EFFECTS: [&str; 5] = [
        SCANLINES,
        DIAGONAL_GRID,
        DOT_GRID,
        PIXELATION_BLOCK,
        PIXELATION_DIAGONAL,
    ];

    /// Value written for boolean markers
    pub const TRUE: &str = "true";
}

/// SVG filter markup constants
pub mod filter {
    /// Id of the `<filter>` element the stylesheet references
    pub const FILTER_ID: &str = "orange8bit";

    /// Id of the hidden `<svg>` container the filter is installed into
    pub const CONTAINER_ID: &str = "orange-filter-svg";

    /// Input name of the unfiltered page content
    pub const SOURCE_GRAPHIC: &str = "SourceGraphic";

    pub const ERODED: &str = "eroded";
    pub const PIXELATED: &str = "pixelated";
    pub const MONO: &str = "mono";

    /// Pixel size divisor for block pixelation radius
    pub const BLOCK_RADIUS_DIVISOR: f64 = 20.0;

    /// Pixel size divisor for diagonal pixelation radius
    pub const DIAGONAL_RADIUS_DIVISOR: f64 = 18.0;

    /// Decimal places of derived quantization table values
    pub const TABLE_PRECISION: usize = 3;

    /// Decimal places of gain matrix coefficients
    pub const GAIN_PRECISION: usize = 2;
}

/// Host options dialog constants
pub mod host {
    /// Settle delay between seeing the dialog and binding controls
    pub const BIND_DELAY_MS: u64 = 100;

    /// Title text that identifies the host options dialog
    pub const OPTIONS_DIALOG_TITLE: &str = "Options";
}
