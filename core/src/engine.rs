use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - Ready -> Active (first reveal)
/// - Active -> Won
/// - Active -> Lost
/// - any -> Ready (restart)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for the first reveal, mines not placed yet
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Single game session: owns the board, places mines on the first reveal, and reports every
/// visible change back to the caller.
#[derive(Clone, Debug)]
pub struct GameEngine {
    board: Board,
    generator: RandomMineGenerator,
    opened_count: CellCount,
    flag_count: CellCount,
    state: EngineState,
    started_at: Option<Instant>,
    finished_after: Option<Duration>,
}

impl GameEngine {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            board: Board::new(config)?,
            generator: RandomMineGenerator::new(seed),
            opened_count: 0,
            flag_count: 0,
            state: EngineState::Ready,
            started_at: None,
            finished_after: None,
        })
    }

    /// Engine whose first game uses exactly these mines; later games after a restart are random.
    pub fn with_mines(config: GameConfig, mines: &[Coord2], seed: u64) -> Result<Self> {
        let mut engine = Self::new(config, seed)?;
        engine.board.place_mines(mines)?;
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Mines still have to be placed before the next reveal
    pub fn needs_generation(&self) -> bool {
        !self.board.is_generated()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        self.board.config()
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flag_count as isize)
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        self.board.tile(coords)
    }

    /// Time since the first reveal, frozen once the game ends
    pub fn elapsed(&self) -> Duration {
        match (self.finished_after, self.started_at) {
            (Some(finished_after), _) => finished_after,
            (None, Some(started_at)) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn status(&self) -> Status {
        match self.state {
            EngineState::Ready | EngineState::Active => Status::Playing,
            EngineState::Won => Status::Won(self.elapsed()),
            EngineState::Lost => Status::Lost,
        }
    }

    pub fn handle(&mut self, action: Action) -> Update {
        match action {
            Action::Reveal(coords) => self.reveal(coords),
            Action::ToggleFlag(coords) => self.toggle_flag(coords),
            Action::Restart => self.restart(),
        }
    }

    /// Reveals a closed cell, or chord-reveals around an open one.
    pub fn reveal(&mut self, coords: Coord2) -> Update {
        let Some(&cell) = self.board.cell(coords) else {
            return self.ignored(Ignored::OutOfBounds);
        };
        if self.state.is_finished() {
            return self.ignored(Ignored::GameOver);
        }
        if cell.is_flagged() {
            return self.ignored(Ignored::Flagged);
        }

        if self.state.is_ready() {
            self.mark_started(coords);
        }

        if cell.is_open() {
            return self.chord_reveal(coords);
        }

        let mut changes = Vec::new();
        self.open_cells(vec![coords], &mut changes);
        self.applied(changes)
    }

    /// Opens every closed neighbor of an open cell whose flagged neighbors match its count.
    fn chord_reveal(&mut self, coords: Coord2) -> Update {
        let Some(count) = self.board[coords].adjacent_count() else {
            // only reachable on a lost board
            return self.ignored(Ignored::GameOver);
        };

        let flagged = self.board.flagged_neighbor_count(coords);
        if flagged != count {
            log::trace!(
                "Chord at {:?} refused, {} flags around a {}",
                coords,
                flagged,
                count
            );
            return self.ignored(Ignored::ChordMismatch);
        }

        let mut targets: Vec<Coord2> = self
            .board
            .neighbors(coords)
            .filter(|&pos| self.board[pos].is_closed())
            .collect();
        if targets.is_empty() {
            return self.ignored(Ignored::NothingToOpen);
        }
        // the stack pops from the back, keep compass order
        targets.reverse();

        log::debug!("Chord at {:?} opening {} cells", coords, targets.len());
        let mut changes = Vec::new();
        self.open_cells(targets, &mut changes);
        self.applied(changes)
    }

    /// Opens the cells on `stack`, flooding through zero cells. A cell's cover is checked before
    /// it opens, so already open or flagged cells are skipped and nothing is visited twice.
    fn open_cells(&mut self, mut stack: Vec<Coord2>, changes: &mut Vec<CellChange>) {
        while let Some(coords) = stack.pop() {
            if self.state.is_finished() {
                break;
            }

            let Some(cell) = self.board.cell_mut(coords) else {
                continue;
            };
            if !cell.open() {
                log::trace!("Skipping cell at {:?}", coords);
                continue;
            }
            let cell = *cell;
            changes.push(CellChange::new(coords, cell.tile()));

            match cell.content() {
                Content::Mine => {
                    log::debug!("Hit mine at {:?}", coords);
                    self.mark_ended(false);
                }
                Content::Clear(count) => {
                    self.opened_count += 1;
                    log::trace!("Opened cell at {:?}, mine count: {}", coords, count);

                    if self.opened_count == self.board.safe_cell_count() {
                        self.mark_ended(true);
                    } else if count == 0 {
                        let board = &self.board;
                        stack.extend(
                            board
                                .neighbors(coords)
                                .filter(|&pos| board[pos].is_closed()),
                        );
                    }
                }
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Update {
        if !self.board.contains(coords) {
            return self.ignored(Ignored::OutOfBounds);
        }
        if self.state.is_finished() {
            return self.ignored(Ignored::GameOver);
        }

        let Some(cell) = self.board.cell_mut(coords) else {
            return self.ignored(Ignored::OutOfBounds);
        };
        let toggled = cell.toggle_flag();
        let tile = cell.tile();
        if !toggled {
            return self.ignored(Ignored::AlreadyOpen);
        }

        if tile == Tile::Flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        log::trace!("Flag toggled at {:?}, now {:?}", coords, tile);
        self.applied(vec![CellChange::new(coords, tile)])
    }

    /// Closes every cell and waits for a new first reveal; the grid is reused as is.
    pub fn restart(&mut self) -> Update {
        let changes: Vec<CellChange> = self
            .board
            .tiles()
            .filter(|&(_, tile)| tile != Tile::Closed)
            .map(|(pos, _)| CellChange::new(pos, Tile::Closed))
            .collect();

        self.board.reset();
        self.opened_count = 0;
        self.flag_count = 0;
        self.state = EngineState::Ready;
        self.started_at = None;
        self.finished_after = None;
        log::debug!("Restarted, {} cells closed", changes.len());

        self.applied(changes)
    }

    /// Restarts and reseeds, behaving from here on like `GameEngine::new(config, seed)`.
    pub fn restart_with_seed(&mut self, seed: u64) -> Update {
        self.generator.reseed(seed);
        self.restart()
    }

    /// Places mines if needed and starts the clock
    fn mark_started(&mut self, anchor: Coord2) {
        if self.needs_generation() {
            self.board.generate(anchor, &mut self.generator);
        }
        let now = Instant::now();
        self.started_at = Some(now);
        self.state = EngineState::Active;
        log::debug!("Started at {:?} with first reveal {:?}", now, anchor);
    }

    fn mark_ended(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        let elapsed = self
            .started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or_default();
        self.finished_after = Some(elapsed);
        log::debug!("Ended as {:?} after {:?}", self.state, elapsed);
    }

    fn applied(&self, changes: Vec<CellChange>) -> Update {
        Update {
            outcome: Outcome::Applied,
            changes,
            status: self.status(),
        }
    }

    fn ignored(&self, reason: Ignored) -> Update {
        Update {
            outcome: Outcome::Ignored(reason),
            changes: Vec::new(),
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord, mines: &[Coord2]) -> GameEngine {
        let config = GameConfig::new_unchecked(size, mines.len() as CellCount);
        GameEngine::with_mines(config, mines, 0).unwrap()
    }

    #[test]
    fn reveal_hits_mine_and_loses() {
        let mut engine = engine(4, &[(0, 0)]);

        let update = engine.reveal((0, 0));

        assert_eq!(update.outcome, Outcome::Applied);
        assert_eq!(update.status, Status::Lost);
        assert_eq!(update.changes, vec![CellChange::new((0, 0), Tile::Mine)]);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.opened_count(), 0);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut engine = engine(4, &[(3, 3)]);

        let update = engine.reveal((0, 0));

        assert!(matches!(update.status, Status::Won(_)));
        assert_eq!(update.changes.len(), 15);
        assert_eq!(engine.tile_at((0, 0)), Some(Tile::Open(0)));
        assert_eq!(engine.tile_at((2, 2)), Some(Tile::Open(1)));
        assert_eq!(engine.tile_at((3, 3)), Some(Tile::Closed));
    }

    #[test]
    fn numbered_cell_opens_alone() {
        let mut engine = engine(4, &[(0, 0), (3, 3)]);

        let update = engine.reveal((1, 1));

        assert_eq!(update.changes, vec![CellChange::new((1, 1), Tile::Open(1))]);
        assert_eq!(engine.opened_count(), 1);
        assert_eq!(engine.state(), EngineState::Active);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut engine = engine(4, &[(3, 3)]);
        engine.toggle_flag((0, 3));

        let update = engine.reveal((0, 0));

        assert_eq!(update.status, Status::Playing);
        assert_eq!(engine.tile_at((0, 3)), Some(Tile::Flagged));
        assert_eq!(engine.opened_count(), 14);
    }

    #[test]
    fn revealing_a_flag_is_ignored() {
        let mut engine = engine(4, &[(3, 3)]);
        engine.toggle_flag((1, 1));

        let update = engine.reveal((1, 1));

        assert_eq!(update.outcome, Outcome::Ignored(Ignored::Flagged));
        assert!(!update.has_update());
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.tile_at((1, 1)), Some(Tile::Flagged));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut engine = engine(4, &[(3, 3)]);

        assert_eq!(
            engine.reveal((4, 0)).outcome,
            Outcome::Ignored(Ignored::OutOfBounds)
        );
        assert_eq!(
            engine.toggle_flag((0, 200)).outcome,
            Outcome::Ignored(Ignored::OutOfBounds)
        );
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        let mines = &[(0, 1), (2, 1)];
        let mut engine = engine(4, mines);

        engine.reveal((1, 1));
        engine.toggle_flag((0, 1));
        engine.toggle_flag((2, 1));

        let update = engine.reveal((1, 1));

        assert_eq!(update.outcome, Outcome::Applied);
        assert_eq!(engine.tile_at((1, 0)), Some(Tile::Open(2)));
        assert_eq!(engine.tile_at((1, 2)), Some(Tile::Open(2)));
        assert_eq!(engine.tile_at((0, 0)), Some(Tile::Open(1)));
        assert_eq!(engine.tile_at((2, 2)), Some(Tile::Open(1)));
    }

    #[test]
    fn chord_reveal_cascades_through_zeros() {
        let mut engine = engine(5, &[(0, 0)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 0));

        let update = engine.reveal((1, 1));

        assert_eq!(update.outcome, Outcome::Applied);
        assert_eq!(update.changes.len(), 23);
        assert_eq!(engine.opened_count(), 24);
        assert!(matches!(update.status, Status::Won(_)));
        assert_eq!(engine.tile_at((4, 4)), Some(Tile::Open(0)));
        assert_eq!(engine.tile_at((0, 0)), Some(Tile::Flagged));
    }

    #[test]
    fn chord_with_wrong_flag_count_is_ignored() {
        let mut engine = engine(4, &[(0, 1), (2, 1)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 1));

        let update = engine.reveal((1, 1));

        assert_eq!(update.outcome, Outcome::Ignored(Ignored::ChordMismatch));
        assert_eq!(engine.opened_count(), 1);
    }

    #[test]
    fn chord_with_wrong_flags_hits_mine() {
        let mut engine = engine(4, &[(0, 0), (3, 3)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 1));

        let update = engine.reveal((1, 1));

        assert_eq!(update.status, Status::Lost);
        assert_eq!(engine.tile_at((0, 0)), Some(Tile::Mine));
        let mines_opened = update
            .changes
            .iter()
            .filter(|change| change.tile == Tile::Mine)
            .count();
        assert_eq!(mines_opened, 1);
        assert_eq!(update.changes.last().map(|change| change.tile), Some(Tile::Mine));
    }

    #[test]
    fn chord_with_nothing_left_is_ignored() {
        // (4, 4) is walled off by mines so the board is not won by the cascade
        let mut engine = engine(5, &[(0, 0), (3, 4), (4, 3)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 0));
        engine.reveal((1, 1));
        assert_eq!(engine.state(), EngineState::Active);

        let update = engine.reveal((1, 1));

        assert_eq!(update.outcome, Outcome::Ignored(Ignored::NothingToOpen));
        assert_eq!(engine.tile_at((4, 4)), Some(Tile::Closed));
    }

    #[test]
    fn flags_can_be_toggled_back() {
        let mut engine = engine(4, &[(3, 3)]);

        engine.toggle_flag((2, 2));
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.mines_left(), 0);

        let update = engine.toggle_flag((2, 2));
        assert_eq!(update.changes, vec![CellChange::new((2, 2), Tile::Closed)]);
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(engine.mines_left(), 1);
    }

    #[test]
    fn open_cells_cannot_be_flagged() {
        let mut engine = engine(4, &[(0, 0), (3, 3)]);
        engine.reveal((1, 1));

        let update = engine.toggle_flag((1, 1));

        assert_eq!(update.outcome, Outcome::Ignored(Ignored::AlreadyOpen));
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn finished_game_ignores_actions() {
        let mut engine = engine(4, &[(0, 0)]);
        engine.reveal((0, 0));

        assert_eq!(
            engine.reveal((3, 3)).outcome,
            Outcome::Ignored(Ignored::GameOver)
        );
        assert_eq!(
            engine.toggle_flag((3, 3)).outcome,
            Outcome::Ignored(Ignored::GameOver)
        );
        assert_eq!(engine.reveal((3, 3)).status, Status::Lost);
    }

    #[test]
    fn first_reveal_generates_around_anchor() {
        let config = GameConfig::new(8).unwrap();
        let mut engine = GameEngine::new(config, 3).unwrap();
        assert!(engine.needs_generation());

        let update = engine.reveal((4, 4));

        assert_eq!(update.outcome, Outcome::Applied);
        assert!(!engine.needs_generation());
        assert_eq!(engine.board().mine_positions().count(), 12);
        assert_eq!(engine.tile_at((4, 4)), Some(Tile::Open(0)));
        for pos in engine.board().neighbors((4, 4)) {
            assert!(!engine.board()[pos].is_mine());
        }
    }

    #[test]
    fn revealing_a_flag_before_first_reveal_does_not_generate() {
        let mut engine = GameEngine::new(GameConfig::new(8).unwrap(), 3).unwrap();
        engine.toggle_flag((4, 4));

        let update = engine.reveal((4, 4));

        assert_eq!(update.outcome, Outcome::Ignored(Ignored::Flagged));
        assert_eq!(update.status, Status::Playing);
        assert!(engine.needs_generation());
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.elapsed(), Duration::ZERO);
        assert_eq!(engine.board().mine_positions().count(), 0);
    }

    #[test]
    fn flagging_before_first_reveal_does_not_generate() {
        let mut engine = GameEngine::new(GameConfig::new(8).unwrap(), 3).unwrap();

        engine.toggle_flag((0, 0));

        assert!(engine.needs_generation());
        assert_eq!(engine.state(), EngineState::Ready);
    }

    #[test]
    fn restart_closes_everything() {
        let mut engine = engine(4, &[(0, 0), (3, 3)]);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 0));
        engine.reveal((3, 0));

        let update = engine.restart();

        assert_eq!(update.outcome, Outcome::Applied);
        assert!(update.changes.iter().all(|change| change.tile == Tile::Closed));
        assert!(update.changes.contains(&CellChange::new((0, 0), Tile::Closed)));
        assert_eq!(engine.state(), EngineState::Ready);
        assert_eq!(engine.opened_count(), 0);
        assert_eq!(engine.flag_count(), 0);
        assert!(engine.needs_generation());
        assert_eq!(engine.elapsed(), Duration::ZERO);
        assert!(engine.board().tiles().all(|(_, tile)| tile == Tile::Closed));
    }

    #[test]
    fn win_reports_elapsed_time() {
        let mut engine = engine(4, &[(3, 3)]);

        let update = engine.reveal((0, 0));

        let Status::Won(elapsed) = update.status else {
            panic!("expected a win, got {:?}", update.status);
        };
        assert_eq!(engine.elapsed(), elapsed);
        assert_eq!(engine.status(), Status::Won(elapsed));
    }
}
