mod config;
mod core;
mod image;
mod renderer;
mod shared;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::core::{Size, ViewOptions};
use crate::image::{FitMode, ImageSource, PixelFormat, ResizeFilter};
use crate::renderer::color::Color;
use crate::renderer::BitDepth;
use crate::shared::constants;
use crate::utils::{args, logger, platform};

#[derive(Parser)]
#[command(name = "foto", author, version, about = "Show an image in the terminal", long_about = None)]
struct Cli {
    /// Append a debug log to this file (also: $FOTO_LOG)
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display an image, `-` reads standard input
    View(ViewArgs),
    /// Print detected terminal capabilities as JSON
    Detect,
    /// Query the terminal size as crossterm sees it
    TerminalSize,
}

#[derive(Args)]
struct ViewArgs {
    file: String,

    /// Pixel dimensions of the raw input
    #[arg(long = "raw-size", value_name = "W,H", value_parser = args::point_arg)]
    raw_size: (u16, u16),

    /// Byte layout of the raw input
    #[arg(long, value_enum, default_value_t = PixelFormat::Rgba8888)]
    format: PixelFormat,

    /// Terminal title, defaults to "<file> - foto"
    #[arg(short, long)]
    title: Option<String>,

    /// Top-left cell of the image
    #[arg(short, long, value_name = "X,Y", value_parser = args::point_arg)]
    position: Option<(u16, u16)>,

    /// Render into a COLS,ROWS grid instead of the whole terminal
    #[arg(short, long, value_name = "COLS,ROWS", value_parser = args::point_arg)]
    size: Option<(u16, u16)>,

    /// Letterbox color
    #[arg(short, long, value_name = "R,G,B", value_parser = args::color_arg)]
    background: Option<Color>,

    /// Stretch the image instead of fitting it
    #[arg(short = 'S', long)]
    stretch: bool,

    /// Reload the image when the file is modified, not for stdin
    #[arg(short = 'r', long)]
    hotreload: bool,

    /// Let SIGUSR1 resize the terminal to the image size
    #[arg(short = '1', long)]
    sigusr1: bool,

    /// Let SIGUSR2 reload the image on demand
    #[arg(short = '2', long)]
    sigusr2: bool,

    /// Color depth of the escapes
    #[arg(long, value_enum)]
    depth: Option<BitDepth>,

    /// One character per pixel instead of half blocks
    #[arg(long)]
    ascii: bool,

    /// Resampling filter
    #[arg(long, value_enum)]
    filter: Option<ResizeFilter>,

    /// Print once and exit instead of staying on the alternate screen
    #[arg(long)]
    once: bool,

    /// Config file, defaults to ~/.config/foto/config.json
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ViewArgs {
    fn into_options(self, config: Config) -> ViewOptions {
        let name = image::loader::display_name(&self.file);
        let source = ImageSource {
            path: self.file,
            size: Size::new(self.raw_size.0 as u32, self.raw_size.1 as u32),
            format: self.format,
        };

        let mut hot_reload = self.hotreload || config.hot_reload;
        if hot_reload && source.is_stdin() {
            logger::warn("Cannot hot-reload with stdin");
            hot_reload = false;
        }

        let [r, g, b] = config.background;
        let depth = platform::resolve_depth(self.depth.unwrap_or(config.depth));
        logger::debug(&format!("color depth {}", platform::depth_name(depth)));

        ViewOptions {
            title: self
                .title
                .unwrap_or_else(|| format!("{} - {}", name, constants::APP_NAME)),
            source,
            origin: self.position.unwrap_or((0, 0)),
            size: self.size,
            background: self.background.unwrap_or(Color::rgb(r, g, b)),
            fit: if self.stretch || config.stretch {
                FitMode::Stretch
            } else {
                FitMode::Letterbox
            },
            filter: self.filter.unwrap_or(config.filter),
            depth,
            unicode: !self.ascii && config.unicode,
            hot_reload,
            reload_interval: Duration::from_millis(config.reload_interval_ms),
            sigusr1: self.sigusr1,
            sigusr2: self.sigusr2,
            once: self.once,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log);

    match cli.command {
        Commands::View(view) => {
            let config = Config::load(view.config.as_deref())?;
            let options = view.into_options(config);
            core::run_viewer(options)?;
        }
        Commands::Detect => {
            let info = platform::TerminalInfo::detect();
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::TerminalSize => {
            let (cols, rows) = crossterm::terminal::size()?;
            println!("{}x{}", cols, rows);
        }
    }

    Ok(())
}
