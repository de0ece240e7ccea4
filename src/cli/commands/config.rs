use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    if *print_config {
        println!("📄 Current configuration:\n");
        println!("{}", serde_yaml::to_string(cfg)?);
    }

    if *edit_config {
        let path = Config::config_file();
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });
        let requested = editor.clone().unwrap_or_else(|| default_editor.clone());

        let edited = |ed: &str| {
            Command::new(ed)
                .arg(&path)
                .status()
                .is_ok_and(|s| s.success())
        };

        if edited(&requested) {
            success(format!("Configuration file edited using '{requested}'"));
        } else {
            warning(format!(
                "Editor '{requested}' not available, falling back to '{default_editor}'"
            ));
            if edited(&default_editor) {
                success(format!("Configuration file edited using '{default_editor}'"));
            } else {
                error(format!("Failed to edit the configuration with '{default_editor}'"));
            }
        }
    }

    Ok(())
}
