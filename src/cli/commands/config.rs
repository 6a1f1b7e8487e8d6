use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        set_trainee,
        set_gym,
    } = cmd
    {
        if set_trainee.is_some() || set_gym.is_some() {
            // start from the file, not from the CLI-overridden view
            let mut stored = Config::load()?;
            if let Some(t) = set_trainee {
                stored.trainee = Some(*t);
            }
            if let Some(g) = set_gym {
                stored.gym = Some(*g);
            }
            stored.save()?;
            success(format!(
                "Default identity saved: trainee {}, gym {}",
                stored.trainee.map_or("-".to_string(), |t| t.to_string()),
                stored.gym.map_or("-".to_string(), |g| g.to_string()),
            ));
        }

        if *print_config {
            println!("📄 Current configuration:\n");
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("{}", yaml);
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
            let editor_to_use = editor.clone().unwrap_or_else(|| default_editor.clone());

            match Command::new(&editor_to_use).arg(&path).status() {
                Ok(s) if s.success() => {
                    success(format!("Configuration file edited using '{}'", editor_to_use));
                }
                _ => {
                    warning(format!(
                        "Editor '{}' not available, falling back to '{}'",
                        editor_to_use, default_editor
                    ));
                    match Command::new(&default_editor).arg(&path).status() {
                        Ok(s) if s.success() => {
                            success(format!("Configuration file edited using '{}'", default_editor));
                        }
                        _ => {
                            return Err(AppError::Config(format!(
                                "failed to edit configuration file with '{}'",
                                default_editor
                            )));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
