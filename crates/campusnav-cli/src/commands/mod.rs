//! Subcommand handlers.
//!
//! `main.rs` parses arguments and hands a [`CommandContext`] to one of these
//! modules; each handler loads what it needs and renders its own output.

pub mod campuses;
pub mod integrated;
pub mod path;
pub mod route_through;
pub mod weather;

use std::path::PathBuf;

use anyhow::{Context, Result};

use campusnav_lib::{ensure_dataset, CampusDataset, RoutingConfig};
use campusnav_cli::output::OutputFormat;
use campusnav_cli::terminal::ColorPalette;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub palette: ColorPalette,
    pub config: RoutingConfig,
}

impl CommandContext {
    /// Load the campus graphs and directory from the resolved data directory.
    pub fn load_dataset(&self) -> Result<CampusDataset> {
        ensure_dataset(self.data_dir.as_deref(), &self.config.cost)
            .context("failed to load campus data")
    }
}
