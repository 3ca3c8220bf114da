//! The animated greeting page
//!
//! A single frame loop drives everything: elapsed wall time feeds the tree
//! reveal and the timers, while the particle field and sparkles step once per
//! frame. Layers are composited back to front each frame.

pub mod burst;
pub mod carousel;
pub mod floating;
pub mod particles;

use crate::audio;
use crate::canvas::Canvas;
use crate::colors;
use crate::config::{resolve_seed, PageConfig, CELL_PX};
use crate::help::{render_help_overlay, HELP};
use crate::reveal::{draw_base, Reveal, RevealTiming};
use crate::settings::{AudioSettings, Settings};
use crate::terminal::{MouseCaptureGuard, Terminal};
use crate::tree::{generate, GrowthRules, Tree, TreeParams, TREE_SPACE_HEIGHT, TREE_SPACE_WIDTH};
use burst::Bursts;
use carousel::{ArrowHit, Carousel, QuoteLine, DEFAULT_QUOTES};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::style::Color;
use floating::HeartSpawner;
use kurbo::{Point, Vec2};
use particles::ParticleField;
use rand::prelude::*;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const TREE_TOP: u16 = 1;
/// Quote line plus key hint
const FOOTER_ROWS: u16 = 2;
const HINT: &str = "? help  q quit";

/// Run the page until the user quits
pub fn run(config: PageConfig) -> io::Result<()> {
    let seed = resolve_seed(config.seed);
    let settings = Settings::load();
    let mut rng = StdRng::seed_from_u64(seed);

    let tree = generate(TreeParams::ROOT, &GrowthRules::default(), &mut rng);
    info!(seed, branches = tree.branches.len(), hearts = tree.hearts.len(), "tree generated");

    let quotes = settings
        .quotes
        .unwrap_or_else(|| DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect());
    let message = config.message.or(settings.message);
    let audio_settings = if config.mute {
        AudioSettings {
            enabled: false,
            ..settings.audio
        }
    } else {
        settings.audio
    };
    let _playback = audio::start(&audio_settings);

    let mut term = Terminal::new(true)?;
    let _mouse = MouseCaptureGuard::enable()?;
    term.clear_screen()?;

    let (width, height) = term.size();
    let mut page = Page::new(width, height, tree, quotes, message, &mut rng);
    let mut last = Instant::now();

    loop {
        while let Some(event) = term.poll_event(Duration::ZERO)? {
            if let Event::Resize(w, h) = event {
                term.resize(w, h);
                term.clear_screen()?;
            }
            if page.handle_event(&event) {
                return Ok(());
            }
        }

        let now = Instant::now();
        page.update(now - last, &mut rng);
        last = now;

        term.clear();
        page.compose(&mut term);
        term.present()?;
        term.sleep(config.time_step);
    }
}

pub struct Page {
    width: u16,
    height: u16,
    tree: Tree,
    reveal: Reveal,
    tree_canvas: Canvas,
    field: ParticleField,
    field_canvas: Canvas,
    carousel: Carousel,
    spawner: HeartSpawner,
    bursts: Bursts,
    message: Option<String>,
    show_help: bool,
}

fn tree_canvas(width: u16, height: u16) -> Canvas {
    let avail = height.saturating_sub(TREE_TOP + FOOTER_ROWS);
    Canvas::fitted(width, height, TREE_TOP, avail, TREE_SPACE_WIDTH, TREE_SPACE_HEIGHT)
}

/// Particles live in page pixels; a braille dot is a quarter of a cell's width
fn field_canvas(width: u16, height: u16) -> Canvas {
    Canvas::new(width, height, 2.0 / CELL_PX.x, Vec2::ZERO)
}

fn field_bounds(width: u16, height: u16) -> Vec2 {
    Vec2::new(width as f64 * CELL_PX.x, height as f64 * CELL_PX.y)
}

impl Page {
    pub fn new<R: Rng + ?Sized>(
        width: u16,
        height: u16,
        tree: Tree,
        quotes: Vec<String>,
        message: Option<String>,
        rng: &mut R,
    ) -> Self {
        let mut canvas = tree_canvas(width, height);
        draw_base(&mut canvas);
        Self {
            width,
            height,
            tree,
            reveal: Reveal::new(RevealTiming::default()),
            tree_canvas: canvas,
            field: ParticleField::new(field_bounds(width, height), rng),
            field_canvas: field_canvas(width, height),
            carousel: Carousel::new(quotes),
            spawner: HeartSpawner::new(),
            bursts: Bursts::default(),
            message,
            show_help: false,
        }
    }

    /// Re-rasterize for a new terminal size. Particles keep their positions.
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "resize");
        self.width = width;
        self.height = height;
        self.tree_canvas = tree_canvas(width, height);
        self.reveal.replay(&self.tree, &mut self.tree_canvas);
        self.field_canvas = field_canvas(width, height);
        self.field.resize(field_bounds(width, height));
    }

    fn quote_line(&self) -> Option<QuoteLine> {
        let row = self.height.checked_sub(FOOTER_ROWS)?;
        QuoteLine::layout(self.carousel.current()?, self.width, row)
    }

    fn in_tree_area(&self, row: u16) -> bool {
        row >= TREE_TOP && row < self.height.saturating_sub(FOOTER_ROWS)
    }

    /// Returns true when the user asked to quit
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => return self.on_key(key),
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.on_click(mouse.column, mouse.row);
                }
            }
            Event::Resize(w, h) => self.resize(*w, *h),
            _ => {}
        }
        false
    }

    fn on_key(&mut self, key: &KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => return true,
            (_, KeyCode::Char('?')) => self.show_help = !self.show_help,
            (_, KeyCode::Left | KeyCode::Char('p')) => self.carousel.prev(),
            (_, KeyCode::Right | KeyCode::Char('n')) => self.carousel.next(),
            _ => {}
        }
        false
    }

    fn on_click(&mut self, col: u16, row: u16) {
        match self.quote_line().and_then(|line| line.hit(col, row)) {
            Some(ArrowHit::Prev) => self.carousel.prev(),
            Some(ArrowHit::Next) => self.carousel.next(),
            None if self.in_tree_area(row) => {
                let at = Point::new(
                    (col as f64 + 0.5) * CELL_PX.x,
                    (row as f64 + 0.5) * CELL_PX.y,
                );
                self.bursts.spawn(at);
            }
            None => {}
        }
    }

    /// Advance every subsystem by one frame
    pub fn update<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) {
        self.reveal.advance(elapsed, &self.tree, &mut self.tree_canvas);
        self.field.frame(&mut self.field_canvas);
        self.carousel.tick(elapsed);
        self.spawner.tick(elapsed, rng);
        self.bursts.step();
    }

    /// Draw all layers, back to front
    pub fn compose(&self, term: &mut Terminal) {
        self.field_canvas.blit(term);
        self.tree_canvas.blit(term);
        self.spawner.render(term);
        self.bursts.render(term, CELL_PX);

        if let Some(ref message) = self.message {
            let x = (self.width as usize).saturating_sub(message.chars().count()) / 2;
            term.set_str(x as i32, 0, message, Some(colors::MESSAGE), true);
        }

        if let Some(line) = self.quote_line() {
            let row = line.row as i32;
            term.set(line.prev_col as i32, row, '‹', Some(colors::QUOTE_ARROW), true);
            term.set_str(line.text_col as i32, row, &line.text, Some(colors::QUOTE), false);
            term.set(line.next_col as i32, row, '›', Some(colors::QUOTE_ARROW), true);
        }

        if self.height > 0 {
            term.set_str(1, self.height as i32 - 1, HINT, Some(Color::DarkGrey), false);
        }

        if self.show_help {
            render_help_overlay(term, HELP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::BARK;
    use crate::reveal::RevealState;
    use crossterm::event::MouseEvent;

    fn page(width: u16, height: u16) -> (Page, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = generate(TreeParams::ROOT, &GrowthRules::default(), &mut rng);
        let quotes = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let page = Page::new(width, height, tree, quotes, Some("For you".into()), &mut rng);
        (page, rng)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn trunk_cell(page: &Page) -> (usize, usize) {
        let (col, row) = page.tree_canvas.cell_of(Point::new(500.0, 700.0));
        (col as usize, row as usize)
    }

    #[test]
    fn quit_keys() {
        let (mut page, _) = page(80, 40);
        assert!(!page.handle_event(&key(KeyCode::Char('x'))));
        assert!(page.handle_event(&key(KeyCode::Char('q'))));
        assert!(page.handle_event(&key(KeyCode::Esc)));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(page.handle_event(&ctrl_c));
    }

    #[test]
    fn arrow_keys_drive_the_carousel() {
        let (mut page, _) = page(80, 40);
        page.handle_event(&key(KeyCode::Right));
        assert_eq!(page.carousel.current(), Some("second"));
        page.handle_event(&key(KeyCode::Left));
        page.handle_event(&key(KeyCode::Char('p')));
        assert_eq!(page.carousel.current(), Some("third"));
    }

    #[test]
    fn clicking_quote_arrows_navigates() {
        let (mut page, _) = page(80, 40);
        let line = page.quote_line().unwrap();
        page.handle_event(&click(line.next_col, line.row));
        assert_eq!(page.carousel.current(), Some("second"));
        page.handle_event(&click(line.prev_col, line.row));
        assert_eq!(page.carousel.current(), Some("first"));
        assert!(page.bursts.sparkles().is_empty());
    }

    #[test]
    fn clicking_the_tree_spawns_sparkles() {
        let (mut page, _) = page(80, 40);
        page.handle_event(&click(40, 20));
        assert_eq!(page.bursts.sparkles().len(), burst::SPARKLES_PER_BURST);
        assert_eq!(page.bursts.sparkles()[0].pos, Point::new(324.0, 328.0));
        // the hint row is outside the tree area
        page.handle_event(&click(40, 39));
        assert_eq!(page.bursts.sparkles().len(), burst::SPARKLES_PER_BURST);
    }

    #[test]
    fn trunk_is_visible_before_the_reveal() {
        let (page, _) = page(80, 40);
        assert_eq!(page.reveal.state(), RevealState::Idle);
        let mut term = Terminal::with_size(80, 40, false).unwrap();
        page.compose(&mut term);
        let (col, row) = trunk_cell(&page);
        let cell = term.get(col, row).unwrap();
        assert_eq!(cell.fg, Some(BARK.to_color()));
        assert_eq!(term.get(36, 0).map(|c| c.ch), Some('F'));
    }

    #[test]
    fn tree_reveals_over_time() {
        let (mut page, mut rng) = page(80, 40);
        let total = page.tree.branches.len() + page.tree.hearts.len();
        // 50ms frames for a minute is far more than the reveal needs
        for _ in 0..1200 {
            page.update(Duration::from_millis(50), &mut rng);
        }
        assert!(page.reveal.is_done());
        assert_eq!(page.reveal.revealed(&page.tree), (page.tree.branches.len(), page.tree.hearts.len()));
        assert!(total > 255);
    }

    #[test]
    fn resize_replays_revealed_tree() {
        let (mut page, mut rng) = page(80, 40);
        page.update(Duration::from_millis(700), &mut rng);
        let state = page.reveal.state();
        page.handle_event(&Event::Resize(120, 50));
        assert_eq!(page.reveal.state(), state);
        assert_eq!(page.tree_canvas.size(), (120, 50));
        let (col, row) = trunk_cell(&page);
        assert_eq!(page.tree_canvas.cell(col, row).map(|c| c.1), Some(BARK));
    }

    #[test]
    fn help_overlay_toggles() {
        let (mut page, _) = page(80, 40);
        page.handle_event(&key(KeyCode::Char('?')));
        let mut term = Terminal::with_size(80, 40, false).unwrap();
        page.compose(&mut term);
        let has_corner = (0..40).any(|y| (0..80).any(|x| term.get(x, y).map(|c| c.ch) == Some('┌')));
        assert!(has_corner);
        page.handle_event(&key(KeyCode::Char('?')));
        assert!(!page.show_help);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (mut page, mut rng) = page(3, 2);
        page.update(Duration::from_secs(2), &mut rng);
        let mut term = Terminal::with_size(3, 2, false).unwrap();
        page.compose(&mut term);
        page.handle_event(&click(1, 1));
        page.handle_event(&Event::Resize(0, 0));
        page.update(Duration::from_secs(2), &mut rng);
        let mut empty = Terminal::with_size(0, 0, false).unwrap();
        page.compose(&mut empty);
    }
}
