//! Version information display
//!
//! Prints version metadata in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};

/// Print version information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version}");
        }
        OutputFormat::Json => {
            let presets = crate::config::list_preset_names();
            println!(
                "{}",
                serde_json::json!({
                    "name": name,
                    "version": version,
                    "presets": presets,
                })
            );
        }
    }
}
