//! Leveling rune cost reference.
//!
//! Runes needed for each character level in a run, as shown next to the
//! countdown so a player can plan spending between storms.

use serde::Serialize;

/// Cost of reaching each level from the one before it, starting at level 1.
const LEVEL_COSTS: [u64; 12] = [
    0, 3_698, 7_922, 12_348, 16_978, 21_818, 26_869, 32_137, 37_624, 43_335, 49_271, 55_439,
];

/// Highest level in the table.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_LEVEL: u32 = LEVEL_COSTS.len() as u32;

/// One row of the rune cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuneLevel {
    /// Character level
    pub level: u32,
    /// Runes spent going from `level - 1` to `level`
    pub cost: u64,
    /// Runes spent going from level 1 to `level`
    pub total: u64,
}

/// Returns every row of the table, lowest level first.
#[must_use]
pub fn rune_levels() -> Vec<RuneLevel> {
    LEVEL_COSTS
        .iter()
        .zip(1..)
        .scan(0u64, |total, (&cost, level)| {
            *total += cost;
            Some(RuneLevel {
                level,
                cost,
                total: *total,
            })
        })
        .collect()
}

/// Returns the row for `level`, if the table covers it.
#[must_use]
pub fn rune_level(level: u32) -> Option<RuneLevel> {
    rune_levels().into_iter().find(|row| row.level == level)
}

/// Formats a rune count with comma thousands separators.
#[must_use]
pub fn format_runes(runes: u64) -> String {
    let digits = runes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
