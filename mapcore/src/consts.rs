//! Shared numeric constants for the map core.

// ── Viewport ────────────────────────────────────────────────────

/// Web Mercator tile edge in CSS pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Lowest zoom a view can reach.
pub const MIN_ZOOM: f64 = 0.0;

/// Highest zoom the tile providers serve.
pub const MAX_ZOOM: f64 = 19.0;

/// Initial center of both views (Lima), as `(lng, lat)`.
pub const DEFAULT_CENTER: (f64, f64) = (-77.0428, -12.0464);

/// Initial zoom of the overview map.
pub const OVERVIEW_ZOOM: f64 = 11.0;

/// Initial zoom of the detail map.
pub const DETAIL_ZOOM: f64 = 13.0;

/// Padding applied on every side when fitting a view to bounds.
pub const FIT_PADDING_PX: f64 = 50.0;

/// Fixed zoom used when focusing a single point drawing.
pub const POINT_FOCUS_ZOOM: f64 = 16.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for markers and thin lines.
pub const HIT_SLOP_PX: f64 = 8.0;

// ── Editing ─────────────────────────────────────────────────────

/// Arrow-key nudge in degrees.
pub const NUDGE_STEP_DEG: f64 = 0.000_01;

/// Arrow-key nudge in degrees while Shift is held.
pub const NUDGE_STEP_LARGE_DEG: f64 = 0.000_1;

/// Decimal places shown in the coordinate readout.
pub const READOUT_DECIMALS: usize = 6;
