//! Glint configuration file handling
//!
//! `glint.toml` is optional. Every field has a default, and command-line
//! flags override whatever the file sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "glint.toml";

/// Contents of `glint.toml`
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct GlintConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub button: ButtonConfig,
}

/// Frame output settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Frames per second of the rendered sequence
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Directory that receives the frames
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_width() -> u32 {
    620
}

fn default_height() -> u32 {
    310
}

fn default_fps() -> u32 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            output_dir: default_output_dir(),
        }
    }
}

/// Button settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ButtonConfig {
    #[serde(default = "default_text")]
    pub text: String,
}

fn default_text() -> String {
    "Download".to_string()
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
        }
    }
}

impl GlintConfig {
    /// Load `glint.toml` from a directory, falling back to defaults
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Load a specific configuration file
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            anyhow::bail!(
                "render size must be positive, got {}x{}",
                self.render.width,
                self.render.height
            );
        }
        if self.render.fps == 0 {
            anyhow::bail!("render fps must be positive");
        }
        Ok(())
    }
}
