//! Terminal scene sink that draws the grid as rows of glyphs.

use std::io::{self, Write};

use anyhow::{Context, Result};

use grid_courier_rendering::{CellFill, GridScene, SceneSink};

/// Renders scenes as text, one glyph per cell, top row first.
///
/// `@` marks the token, `#` an obstacle, `*` a highlighted path cell and
/// `.` everything else.
pub(crate) struct AsciiSink<W> {
    out: W,
}

impl AsciiSink<io::Stdout> {
    /// Creates a sink that writes to standard output.
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> AsciiSink<W>
where
    W: Write,
{
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    fn render(scene: &GridScene) -> String {
        let mut rendered = String::new();
        for y in (0..scene.height()).rev() {
            for x in 0..scene.width() {
                let index = (y * scene.width() + x) as usize;
                let cell = &scene.cells()[index];
                let glyph = if cell.has_token {
                    '@'
                } else {
                    match cell.fill {
                        CellFill::Obstacle => '#',
                        CellFill::OnPath => '*',
                        CellFill::Default | CellFill::OffPath => '.',
                    }
                };
                rendered.push(glyph);
            }
            rendered.push('\n');
        }
        rendered.push('\n');
        rendered
    }
}

impl<W> SceneSink for AsciiSink<W>
where
    W: Write,
{
    fn present(&mut self, scene: &GridScene) -> Result<()> {
        let rendered = Self::render(scene);
        self.out
            .write_all(rendered.as_bytes())
            .context("could not write the scene")
    }
}
