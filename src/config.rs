//! Host configuration.
//!
//! [`AppConfig`] is the builder the demo host runs from. [`Args`] is the
//! command line that fills it in.

use clap::Parser;

use crate::color::Color;
use crate::pipeline::PipelineVariant;

/// Window and draw configuration for [`run`](crate::run).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Pipeline bound at startup. `Tab` switches between draws.
    pub variant: PipelineVariant,
    pub clear_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "lanthorn".to_string(),
            width: 800,
            height: 600,
            variant: PipelineVariant::default(),
            clear_color: Color::CLEAR,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn variant(mut self, variant: PipelineVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

/// Command-line arguments of the `lanthorn` binary.
#[derive(Debug, Parser)]
#[command(name = "lanthorn", version, about = "Draws a spinning cube through the flat or normals pipeline")]
pub struct Args {
    /// Pipeline to start with: "flat" or "normals".
    #[arg(short, long, default_value_t = PipelineVariant::Normals)]
    pub pipeline: PipelineVariant,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,

    #[arg(long, default_value = "lanthorn")]
    pub title: String,

    /// Log filter in env_logger syntax. Overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,
}

impl Args {
    pub fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title(self.title.clone())
            .size(self.width, self.height)
            .variant(self.pipeline)
    }
}
