use std::io::Write;

use anyhow::Result;
use sweeper_core::{Coord, GameEngine, Ignored, Outcome, Status, Tile, Update, linear_index};

/// Display side of the game: consumes updates, never touches the engine state.
pub trait Renderer {
    /// Draws the whole board, used once at startup.
    fn draw_full(&mut self, engine: &GameEngine) -> Result<()>;

    fn draw(&mut self, update: &Update, engine: &GameEngine) -> Result<()>;

    /// Reports input that never reached the engine, or an action it ignored.
    fn note(&mut self, message: &str, engine: &GameEngine) -> Result<()>;
}

/// Plain text grid that mirrors the board by applying only the changed cells.
pub struct TextRenderer<W> {
    out: W,
    size: Coord,
    tiles: Vec<Tile>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, size: Coord) -> Self {
        let cells = usize::from(size) * usize::from(size);
        Self {
            out,
            size,
            tiles: vec![Tile::Closed; cells],
        }
    }

    fn write_grid(&mut self, engine: &GameEngine) -> Result<()> {
        let mut tiles = self.tiles.clone();
        if engine.status() == Status::Lost {
            for pos in engine.board().mine_positions() {
                let tile = &mut tiles[linear_index(pos, self.size)];
                if *tile == Tile::Closed {
                    *tile = Tile::Mine;
                }
            }
        }

        write!(self.out, "   ")?;
        for col in 0..self.size {
            write!(self.out, "{}", col % 10)?;
        }
        writeln!(self.out)?;
        for (row, line) in tiles.chunks(usize::from(self.size)).enumerate() {
            let glyphs: String = line.iter().map(|tile| tile.glyph()).collect();
            writeln!(self.out, "{row:>2} {glyphs}")?;
        }
        Ok(())
    }

    fn write_status(&mut self, engine: &GameEngine) -> Result<()> {
        match engine.status() {
            Status::Playing => writeln!(
                self.out,
                "mines left: {}, opened {}/{}",
                engine.mines_left(),
                engine.opened_count(),
                engine.config().safe_cells()
            )?,
            Status::Won(elapsed) => writeln!(self.out, "you win, use time {}s", elapsed.as_secs())?,
            Status::Lost => writeln!(self.out, "you lose")?,
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw_full(&mut self, engine: &GameEngine) -> Result<()> {
        for (pos, tile) in engine.board().tiles() {
            self.tiles[linear_index(pos, self.size)] = tile;
        }
        self.write_grid(engine)?;
        self.write_status(engine)?;
        self.out.flush()?;
        Ok(())
    }

    fn draw(&mut self, update: &Update, engine: &GameEngine) -> Result<()> {
        if let Outcome::Ignored(reason) = update.outcome {
            return self.note(describe(reason), engine);
        }

        for change in &update.changes {
            self.tiles[linear_index(change.pos, self.size)] = change.tile;
        }
        self.write_grid(engine)?;
        self.write_status(engine)?;
        self.out.flush()?;
        Ok(())
    }

    fn note(&mut self, message: &str, _engine: &GameEngine) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

fn describe(reason: Ignored) -> &'static str {
    match reason {
        Ignored::OutOfBounds => "outside the board",
        Ignored::GameOver => "game over, type restart",
        Ignored::Flagged => "cell is flagged",
        Ignored::AlreadyOpen => "cell is already open",
        Ignored::ChordMismatch => "flag count does not match",
        Ignored::NothingToOpen => "nothing left to open around this cell",
    }
}

/// One JSON object per input line, for driving another program. Updates are written as is,
/// rejected input as `{"note": .., "status": ..}`.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn draw_full(&mut self, engine: &GameEngine) -> Result<()> {
        let tiles: Vec<_> = engine.board().tiles().collect();
        serde_json::to_writer(
            &mut self.out,
            &serde_json::json!({ "size": engine.size(), "tiles": tiles }),
        )?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn draw(&mut self, update: &Update, _engine: &GameEngine) -> Result<()> {
        serde_json::to_writer(&mut self.out, update)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn note(&mut self, message: &str, engine: &GameEngine) -> Result<()> {
        log::debug!("{message}");
        serde_json::to_writer(
            &mut self.out,
            &serde_json::json!({ "note": message, "status": engine.status() }),
        )?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
