//! `runes` command handler
//!
//! Prints the leveling rune cost table, or a single level's row.

use crate::cli::args::{OutputFormat, RunesArgs};
use crate::error::StormclockError;
use crate::runes::{RuneLevel, format_runes, rune_level, rune_levels};

/// Prints the rune cost table.
///
/// # Errors
///
/// Returns a usage error if `--level` is outside the table, or a JSON error
/// if serialization fails.
pub fn runes(args: &RunesArgs) -> Result<(), StormclockError> {
    let rows = match args.level {
        Some(level) => vec![rune_level(level).ok_or_else(|| {
            StormclockError::Usage(format!("no rune cost for level {level}"))
        })?],
        None => rune_levels(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Human => print!("{}", render_table(&rows)),
    }
    Ok(())
}

fn render_table(rows: &[RuneLevel]) -> String {
    let mut out = String::from("Leveling Rune Cost\n\n");
    out.push_str(&format!("  {:>3}  {:>10}  {:>11}\n", "#", "Level Cost", "Total Spend"));
    for row in rows {
        out.push_str(&format!(
            "  {:>3}  {:>10}  {:>11}\n",
            row.level,
            format_runes(row.cost),
            format_runes(row.total)
        ));
    }
    out
}
