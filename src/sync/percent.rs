/// Stop loss is stored as a fraction but edited as a percentage. All
/// conversion between the two goes through here.
pub struct PercentField;

impl PercentField {
    /// Fraction to the value shown in the form (0.2 -> 20).
    pub fn to_display(fraction: f64) -> f64 {
        round6(fraction * 100.0)
    }

    /// Form value back to the stored fraction (20 -> 0.2).
    pub fn from_display(percent: f64) -> f64 {
        round6(percent / 100.0)
    }
}

// Strips float noise such as 0.2 * 100 = 20.000000000000004.
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
