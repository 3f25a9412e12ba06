use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Write;
use std::time::Duration;

use super::reload::ReloadWatcher;
use super::transform::{Size, Transform};
use crate::image::{Compositor, FitMode, ImageSource, ResizeFilter, Surface};
use crate::renderer::color::Color;
use crate::renderer::display::{self, TerminalSession};
use crate::renderer::{BitDepth, RenderOutcome, TerminalRasterizer};
use crate::shared::constants;
use crate::utils::{logger, signals, terminal_control};

/// Everything the viewer needs, resolved from flags and config.
#[derive(Clone, Debug)]
pub struct ViewOptions {
    pub source: ImageSource,
    pub title: String,
    /// Top-left cell of the image (column, row).
    pub origin: (u16, u16),
    /// Fixed grid in cells instead of the terminal size.
    pub size: Option<(u16, u16)>,
    pub background: Color,
    pub fit: FitMode,
    pub filter: ResizeFilter,
    /// Must already be resolved, never `Auto`.
    pub depth: BitDepth,
    pub unicode: bool,
    pub hot_reload: bool,
    pub reload_interval: Duration,
    pub sigusr1: bool,
    pub sigusr2: bool,
    pub once: bool,
}

/// Pixel grid behind a cell grid: half blocks give two pixels per cell.
pub fn pixel_grid(cells: Size, unicode: bool) -> Size {
    let rows_per_cell = if unicode { 2 } else { 1 };
    Size::new(cells.width, cells.height * rows_per_cell)
}

/// Cells needed to show `image` at one pixel per half cell.
pub fn image_cells(image: Size, unicode: bool) -> (u16, u16) {
    let rows = if unicode {
        image.height.div_ceil(2)
    } else {
        image.height
    };
    let clamp = |v: u32| v.clamp(1, u16::MAX as u32) as u16;
    (clamp(image.width), clamp(rows))
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub fn run_viewer(options: ViewOptions) -> Result<()> {
    let image = options.source.load()?;
    logger::info(&format!(
        "loaded {} ({}x{} {:?})",
        options.source.path,
        image.width(),
        image.height(),
        image.format()
    ));

    signals::install_handlers(options.sigusr1, options.sigusr2)?;

    let watcher = if options.hot_reload {
        Some(ReloadWatcher::new(&options.source.path, options.reload_interval)?)
    } else {
        None
    };

    let mut viewer = Viewer::new(options, image, watcher);
    if viewer.options.once {
        viewer.show_once()
    } else {
        viewer.run()
    }
}

struct Viewer {
    options: ViewOptions,
    image: Surface,
    compositor: Compositor,
    rasterizer: TerminalRasterizer,
    watcher: Option<ReloadWatcher>,
}

impl Viewer {
    fn new(options: ViewOptions, image: Surface, watcher: Option<ReloadWatcher>) -> Self {
        let compositor = Compositor::new(options.fit, options.filter, options.background);
        let rasterizer = TerminalRasterizer::new(options.unicode, options.depth)
            .with_origin(options.origin.0, options.origin.1);
        Self {
            options,
            image,
            compositor,
            rasterizer,
            watcher,
        }
    }

    fn target_cells(&self) -> Result<Size> {
        if let Some((cols, rows)) = self.options.size {
            return Ok(Size::new(cols as u32, rows as u32));
        }
        let term = display::terminal_size_chars()?;
        // one-shot output keeps a line free for the prompt
        let reserved = if self.options.once { 1 } else { 0 };
        Ok(Size::new(
            term.width.saturating_sub(self.options.origin.0 as u32),
            term.height
                .saturating_sub(self.options.origin.1 as u32 + reserved),
        ))
    }

    fn draw<W: Write>(&mut self, out: &mut W, cells: Size) -> Result<RenderOutcome> {
        let grid = pixel_grid(cells, self.options.unicode);
        let canvas = self.compositor.compose(&self.image, grid)?;

        let interactive = !self.options.once;
        let outcome = self.rasterizer.render(&canvas, out, || {
            if signals::quit_requested() {
                return false;
            }
            // one-shot output only stops for Ctrl-C
            !(interactive
                && (signals::any_pending() || event::poll(Duration::ZERO).unwrap_or(false)))
        });
        Ok(outcome)
    }

    fn show_once(&mut self) -> Result<()> {
        signals::install_quit_handler()?;
        let mut session = TerminalSession::new(false, &self.options.title)?;
        let cells = self.target_cells()?;

        session.clear()?;
        let outcome = self.draw(session.output(), cells)?;
        session.park_cursor((self.options.origin.1 as u32 + cells.height).min(u16::MAX as u32) as u16)?;

        match outcome {
            RenderOutcome::Failed(e) => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::new(true, &self.options.title)?;
        logger::set_echo(false);
        let result = self.event_loop(&mut session);
        drop(session);
        logger::set_echo(true);
        result
    }

    fn event_loop(&mut self, session: &mut TerminalSession) -> Result<()> {
        let mut dirty = true;
        let mut last_drawn: Option<(Transform, Size)> = None;

        loop {
            if signals::quit_requested() {
                return Ok(());
            }

            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if is_quit_key(&key) => return Ok(()),
                    Event::Resize(cols, rows) => {
                        logger::debug(&format!("terminal resized to {}x{}", cols, rows));
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if signals::take_resize_request() {
                let (cols, rows) = image_cells(self.image.size(), self.options.unicode);
                logger::info(&format!("requesting terminal size {}x{}", cols, rows));
                terminal_control::request_resize(cols, rows);
            }

            let mut reload = signals::take_reload_request();
            if let Some(watcher) = self.watcher.as_mut() {
                reload |= watcher.poll()?;
            }
            if reload && self.reload() {
                last_drawn = None;
                dirty = true;
            }

            if dirty {
                let cells = self.target_cells()?;
                let grid = pixel_grid(cells, self.options.unicode);
                let key = (self.compositor.transform(self.image.size(), grid), grid);

                if last_drawn == Some(key) {
                    dirty = false;
                    continue;
                }
                if last_drawn.map(|(_, g)| g) != Some(grid) {
                    session.clear()?;
                }

                match self.draw(session.output(), cells)? {
                    RenderOutcome::Succeeded => {
                        last_drawn = Some(key);
                        dirty = false;
                    }
                    RenderOutcome::Aborted => {
                        logger::debug("render aborted, redrawing");
                        last_drawn = None;
                    }
                    RenderOutcome::Failed(e) => {
                        logger::error(&format!("render failed: {}", e));
                        last_drawn = None;
                        dirty = false;
                    }
                }
                continue;
            }

            // idle until input arrives or the next watcher check is due
            event::poll(Duration::from_millis(constants::IDLE_POLL_MS))?;
        }
    }

    /// Keeps the current image when the new one cannot be loaded.
    fn reload(&mut self) -> bool {
        match self.options.source.load() {
            Ok(image) => {
                logger::info(&format!(
                    "reloaded {} ({}x{})",
                    self.options.source.path,
                    image.width(),
                    image.height()
                ));
                self.image = image;
                true
            }
            Err(e) => {
                logger::warn(&format!("Failed to load updated image: {:#}", e));
                false
            }
        }
    }
}
