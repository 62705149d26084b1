use crate::config::AppConfig;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tierhue_engine::model::parse_hex_color;
use tierhue_engine::{ActiveThemeController, DefaultColorTable, FileStore, Namespace};

/// Inspect and change the active custom theme stored under a Tierhue store root.
#[derive(Debug, Parser)]
#[command(name = "tierhue", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./tierhue.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding user.json, app.json and shared.json
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// User the theme preference belongs to
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the lifecycle state and the active palette
    Status,
    /// Print the color a UI element resolves to
    Resolve { section: String, element: String },
    /// Activate a palette
    Activate {
        palette: String,
        /// Read the palette from this tier only (user, app or shared)
        #[arg(long)]
        source: Option<Namespace>,
        /// Do not save the choice as the user's preference
        #[arg(long)]
        no_persist: bool,
    },
    /// Forget the user's preference and fall back to the admin default
    Disable,
    /// Re-read the store and re-apply the theme
    Reload,
    /// Print the built-in default color table
    Defaults,
}

impl Command {
    fn needs_user(&self) -> bool {
        !matches!(self, Command::Defaults)
    }
}

/// Runs `command` against the store configured in `config` and returns the
/// text to print.
pub async fn run(command: Command, config: &AppConfig) -> Result<String> {
    if !command.needs_user() {
        return Ok(render_defaults());
    }

    let Some(user) = config.user() else {
        bail!("No user configured. Pass --user <ID>, set TIERHUE__USER, or set user in tierhue.toml");
    };

    let root = config.store().root();
    log::debug!("Using store root {}", root.display());
    let controller = ActiveThemeController::new(Arc::new(FileStore::new(root)));
    controller
        .set_user(Some(user))
        .await
        .with_context(|| format!("Failed to initialize the theme for user '{user}'"))?;

    execute(command, &controller).await
}

/// Executes `command` on an initialized controller.
pub async fn execute(command: Command, controller: &ActiveThemeController) -> Result<String> {
    match command {
        Command::Status => Ok(render_status(controller)),
        Command::Resolve { section, element } => {
            let color = controller.get_color_for_element(&section, &element);
            Ok(format!("{section}.{element} = {}", with_swatch(&color)))
        }
        Command::Activate {
            palette,
            source,
            no_persist,
        } => {
            let theme = controller
                .activate(&palette, !no_persist, source)
                .await
                .with_context(|| format!("Failed to activate palette '{palette}'"))?;
            let mut out = format!(
                "Activated '{}' ({}) from the {} tier",
                theme.palette_name, theme.palette_id, theme.source
            );
            if no_persist {
                out.push_str(" for this session only");
            }
            Ok(out)
        }
        Command::Disable => {
            controller
                .disable()
                .await
                .context("Failed to disable the custom theme")?;
            Ok(render_status(controller))
        }
        Command::Reload => {
            controller
                .reload()
                .await
                .context("Failed to reload the custom theme")?;
            Ok(render_status(controller))
        }
        Command::Defaults => Ok(render_defaults()),
    }
}

fn render_status(controller: &ActiveThemeController) -> String {
    let mut out = format!("status: {}", controller.status());
    match controller.active_theme() {
        Some(theme) => {
            let _ = write!(
                out,
                "\npalette: {} ({})\nsource: {}\nmapped elements: {}",
                theme.palette_name,
                theme.palette_id,
                theme.source,
                theme.element_mapping.len()
            );
        }
        None => out.push_str("\npalette: none (built-in defaults)"),
    }
    out
}

fn render_defaults() -> String {
    DefaultColorTable::global()
        .entries()
        .into_iter()
        .map(|(section, element, color)| format!("{section}.{element} = {}", with_swatch(color)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends a truecolor swatch when `hex` parses.
fn with_swatch(hex: &str) -> String {
    match parse_hex_color(hex) {
        Ok(color) => format!(
            "{hex} \x1b[48;2;{};{};{}m    \x1b[0m",
            color.r, color.g, color.b
        ),
        Err(_) => hex.to_string(),
    }
}
