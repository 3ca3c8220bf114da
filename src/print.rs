//! One-shot tree output for pipes and scripts

use crate::canvas::{Canvas, Surface};
use crate::config::{resolve_seed, PrintConfig};
use crate::reveal::{draw_base, Reveal, RevealTiming};
use crate::terminal::Terminal;
use crate::tree::{generate, GrowthRules, Tree, TreeParams, TREE_SPACE_HEIGHT, TREE_SPACE_WIDTH};
use rand::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use tracing::info;

const FALLBACK_SIZE: (u16, u16) = (80, 40);

#[derive(Serialize)]
struct TreeDump<'a> {
    seed: u64,
    #[serde(flatten)]
    tree: &'a Tree,
}

pub fn run(config: PrintConfig) -> io::Result<()> {
    let seed = resolve_seed(config.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let tree = generate(TreeParams::ROOT, &GrowthRules::default(), &mut rng);
    info!(seed, branches = tree.branches.len(), hearts = tree.hearts.len(), "tree generated");

    if config.json {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &TreeDump { seed, tree: &tree })?;
        writeln!(stdout)?;
        return Ok(());
    }

    let (term_w, term_h) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
    let width = config.width.unwrap_or(term_w);
    let height = config.height.unwrap_or(term_h);

    let mut term = Terminal::with_size(width, height, false)?;
    render_tree(&tree, &mut term);
    term.print_to_stdout()
}

/// Paint the fully grown tree into the terminal buffer
pub fn render_tree(tree: &Tree, term: &mut Terminal) {
    let (width, height) = term.size();
    let mut canvas = Canvas::fitted(width, height, 0, height, TREE_SPACE_WIDTH, TREE_SPACE_HEIGHT);
    finish(tree, &mut canvas);
    canvas.blit(term);
}

fn finish<S: Surface>(tree: &Tree, surface: &mut S) {
    draw_base(surface);
    let mut reveal = Reveal::new(RevealTiming::default());
    reveal.advance(Duration::MAX, tree, surface);
}
