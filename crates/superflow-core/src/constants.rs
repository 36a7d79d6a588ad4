/// Cross-section numerical constants and model contract.
///
/// Centralises the fixed values used by the regime table and the level
/// solver, and the array layout shared with the bindings.

// -- Numerical safeguards --

/// Returned by Manning's equation for a negative area or perimeter.
pub const INVALID_CROSS_SECTION: f64 = -1.0;

/// Upper bound on bisection steps. Halving a bracket of a few metres reaches
/// machine precision well before this.
pub const MAX_ITERATIONS: usize = 100;

/// Bisection stops when the bracket is narrower than this fraction of the
/// regime range.
pub const LEVEL_TOLERANCE: f64 = 1e-12;

/// Bisection stops when the residual is within this fraction of the target.
pub const FLOW_TOLERANCE: f64 = 1e-10;

/// Maximum number of regimes a table can hold (unequal summer crests).
pub const MAX_REGIMES: usize = 6;

// -- Model contract constants --

/// Geometry field names in array order.
pub const GEOMETRY_NAMES: &[&str] = &[
    "summer_bed_width",
    "summer_bed_depth",
    "left_summer_height",
    "left_summer_distance",
    "right_summer_height",
    "right_summer_distance",
    "left_winter_height",
    "left_winter_distance",
    "right_winter_height",
    "right_winter_distance",
];

/// Hydraulic parameter names in array order.
pub const HYDRAULIC_NAMES: &[&str] = &["manning_coefficient", "slope"];

/// Region names in the order levels are reported.
pub const REGION_NAMES: &[&str] = &[
    "summer_bed",
    "summer_plains",
    "left_winter_plain",
    "right_winter_plain",
    "upper_winter_plains",
];

// -- Reference cross-section --

/// Summer bed width [m].
pub const DEFAULT_SUMMER_BED_WIDTH: f64 = 10.0;

/// Summer bed depth [m].
pub const DEFAULT_SUMMER_BED_DEPTH: f64 = 3.5;

/// Summer dyke height above the plain [m].
pub const DEFAULT_SUMMER_HEIGHT: f64 = 2.5;

/// Summer dyke distance from the bed edge [m].
pub const DEFAULT_SUMMER_DISTANCE: f64 = 5.0;

/// Winter dyke height above the plain [m].
pub const DEFAULT_WINTER_HEIGHT: f64 = 4.0;

/// Winter dyke distance from the bed edge [m].
pub const DEFAULT_WINTER_DISTANCE: f64 = 15.0;

/// Manning roughness coefficient [s/m^(1/3)].
pub const DEFAULT_MANNING: f64 = 0.035;

/// Longitudinal slope [-].
pub const DEFAULT_SLOPE: f64 = 0.1;

/// Flow rate used when none is given [m3/s].
pub const DEFAULT_FLOW_RATE: f64 = 800.0;
