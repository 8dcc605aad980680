//! `presets` command handler
//!
//! Lists the built-in schedules, or prints one preset's YAML so it can be
//! copied and edited.

use crate::cli::args::{OutputFormat, PresetsArgs};
use crate::config::{find_preset, list_presets, suggest_preset};
use crate::error::{ConfigError, StormclockError};
use crate::render::format_clock;

/// Lists built-in presets or shows one.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] if `--show` names no preset, or a
/// configuration error if an embedded preset fails to load.
pub fn presets(args: &PresetsArgs) -> Result<(), StormclockError> {
    if let Some(name) = &args.show {
        return show(name, args.format);
    }

    let mut entries = Vec::new();
    for preset in list_presets() {
        let schedule = preset.load()?.schedule;
        entries.push((preset, schedule));
    }

    match args.format {
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = entries
                .iter()
                .map(|(preset, schedule)| {
                    serde_json::json!({
                        "name": preset.name,
                        "description": preset.description,
                        "phases": schedule.len(),
                        "boss_pause_after": schedule.boss_pause_after(),
                        "total_secs": schedule.total_duration().as_secs_f64(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Human => {
            println!("Built-in Presets ({} available)\n", entries.len());
            for (preset, schedule) in &entries {
                println!(
                    "  {:<18}{:<62}{} phases, {}",
                    preset.name,
                    preset.description,
                    schedule.len(),
                    format_clock(schedule.total_duration()),
                );
            }
            println!();
            println!("Run a preset: stormclock run --preset <name>");
            println!("View YAML:    stormclock presets --show <name>");
        }
    }
    Ok(())
}

fn show(name: &str, format: OutputFormat) -> Result<(), StormclockError> {
    let preset = find_preset(name).ok_or_else(|| ConfigError::UnknownPreset {
        name: name.to_string(),
        suggestion: suggest_preset(name),
    })?;

    match format {
        OutputFormat::Human => print!("{}", preset.yaml),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "name": preset.name,
                "description": preset.description,
                "yaml": preset.yaml,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
