//! Glint CLI
//!
//! Render the download button as SVG markup or as a PNG frame sequence of
//! one animation cycle.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::GlintConfig;
use glint_animation::AnimationScheduler;
use glint_core::SharedSurface;
use glint_svg::{LazyFlattener, RasterizedSvg};
use glint_widgets::download_button::{DISPLAY_SIZE, TRAJECTORY_TOLERANCE, VIEWPORT};
use glint_widgets::{DownloadButton, DownloadButtonProps, CYCLE_DURATION_MS};

#[derive(Parser)]
#[command(name = "glint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render the Glint download button", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./glint.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the static button as SVG markup
    Markup {
        /// Label text
        #[arg(short, long)]
        text: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one animation cycle to numbered PNG frames
    Render {
        /// Label text
        #[arg(short, long)]
        text: Option<String>,

        /// Frame width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Frame height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Show button geometry and timing
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => GlintConfig::load(path)?,
        None => GlintConfig::load_from_dir(Path::new("."))?,
    };

    match cli.command {
        Commands::Markup { text, output } => {
            if let Some(text) = text {
                config.button.text = text;
            }
            cmd_markup(&config, output.as_deref())
        }

        Commands::Render {
            text,
            width,
            height,
            fps,
            output_dir,
        } => {
            if let Some(text) = text {
                config.button.text = text;
            }
            if let Some(width) = width {
                config.render.width = width;
            }
            if let Some(height) = height {
                config.render.height = height;
            }
            if let Some(fps) = fps {
                config.render.fps = fps;
            }
            if let Some(dir) = output_dir {
                config.render.output_dir = dir;
            }
            config.validate()?;
            cmd_render(&config)
        }

        Commands::Info => cmd_info(&config),
    }
}

fn new_button(
    scheduler: &AnimationScheduler,
    config: &GlintConfig,
    on_complete: impl Fn() + Send + Sync + 'static,
) -> DownloadButton {
    DownloadButton::new(
        scheduler.handle(),
        LazyFlattener::lyon(TRAJECTORY_TOLERANCE),
        DownloadButtonProps::new(config.button.text.clone()).on_complete(on_complete),
    )
}

fn cmd_markup(config: &GlintConfig, output: Option<&Path>) -> Result<()> {
    let scheduler = AnimationScheduler::new();
    let button = new_button(&scheduler, config, || {});
    let svg = button.render().to_svg();

    match output {
        Some(path) => {
            fs::write(path, &svg).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{svg}"),
    }
    Ok(())
}

fn cmd_render(config: &GlintConfig) -> Result<()> {
    let render = &config.render;
    let scheduler = AnimationScheduler::new();
    let completed = Arc::new(AtomicBool::new(false));
    let flag = completed.clone();
    let mut button = new_button(&scheduler, config, move || flag.store(true, Ordering::SeqCst));

    let surface = button.render().into_shared();
    let ready = pollster::block_on(button.mount(Some(surface.clone())))
        .context("Failed to set up the download button")?;
    if !ready || !button.trigger() {
        anyhow::bail!("download button did not start playing");
    }

    fs::create_dir_all(&render.output_dir)
        .with_context(|| format!("Failed to create {}", render.output_dir.display()))?;

    let frame_ms = 1000.0 / render.fps as f32;
    let max_frames = (CYCLE_DURATION_MS / frame_ms).ceil() as u32 + 2;
    info!(
        "Rendering \"{}\" at {}x{}, {} fps into {}",
        config.button.text,
        render.width,
        render.height,
        render.fps,
        render.output_dir.display()
    );

    let mut frame = 0;
    loop {
        write_frame(&surface, &render.output_dir, frame, render.width, render.height)?;
        if completed.load(Ordering::SeqCst) {
            break;
        }
        if frame >= max_frames {
            anyhow::bail!("animation did not finish after {} frames", frame);
        }
        scheduler.tick_by(frame_ms);
        frame += 1;
    }

    info!("Wrote {} frames", frame + 1);
    Ok(())
}

fn write_frame(surface: &SharedSurface, dir: &Path, frame: u32, width: u32, height: u32) -> Result<()> {
    let svg = surface
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .to_svg();
    let raster = RasterizedSvg::from_str(&svg, width, height)
        .with_context(|| format!("Failed to rasterize frame {frame}"))?;

    let image = image::RgbaImage::from_raw(width, height, raster.into_pixels())
        .context("Frame buffer has the wrong size")?;
    let path = dir.join(format!("frame_{frame:04}.png"));
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

fn cmd_info(config: &GlintConfig) -> Result<()> {
    let scheduler = AnimationScheduler::new();
    let mut button = new_button(&scheduler, config, || {});
    let surface = button.render().into_shared();
    pollster::block_on(button.mount(Some(surface))).context("Failed to set up the download button")?;

    println!("Viewport:       {} x {}", VIEWPORT.width, VIEWPORT.height);
    println!("Display size:   {} x {}", DISPLAY_SIZE.width, DISPLAY_SIZE.height);
    println!("Cycle duration: {} ms", CYCLE_DURATION_MS);
    if let Some(trajectory) = button.trajectory() {
        println!(
            "Trajectory:     {} points, length {:.3}",
            trajectory.len(),
            trajectory.length()
        );
    }
    println!("Label:          {:?}", config.button.text);
    Ok(())
}
