/// Redemption weight units shared by every tier of a normalized scorecard.
///
/// A scorecard with any non-zero weight sums to exactly this value.
pub const TOTAL_REDEMPTION_WEIGHT: u64 = 1_000_000_000;

/// Display points shared by every tier of a normalized scorecard.
pub const TOTAL_POINTS: f64 = 100.0;

/// Average block time used to turn a block deadline into wall-clock time (seconds)
pub const BLOCK_DURATION_SECS: i64 = 12;

/// Convert redemption weight units to display points.
pub fn units_to_points(units: u64) -> f64 {
    units as f64 * TOTAL_POINTS / TOTAL_REDEMPTION_WEIGHT as f64
}
