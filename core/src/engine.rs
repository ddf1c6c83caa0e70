use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Two face-up tiles waiting to be turned back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingMismatch {
    pub first: Position,
    pub second: Position,
    timer: TimerId,
}

/// A memory game from the first tile to the last pair or the last mistake.
#[derive(Clone, Debug)]
pub struct MemoryGame<C: Clock = SystemClock> {
    config: GameConfig,
    board: Board,
    tiles: Array2<TileState>,
    cursor: Option<Position>,
    pending_mismatch: Option<PendingMismatch>,
    preview: Option<TimerId>,
    matched_pairs: TileCount,
    mistakes: TileCount,
    phase: GamePhase,
    clock: C,
    started_at: Duration,
    ended_at: Option<Duration>,
    timers: Timers,
}

impl<C: Clock> MemoryGame<C> {
    pub fn new(config: GameConfig, board: Board, clock: C) -> Self {
        let size = board.size();
        let started_at = clock.now();
        log::debug!("Game started at {:?}", started_at);
        Self {
            config,
            board,
            tiles: Array2::default(size.to_nd_index()),
            cursor: None,
            pending_mismatch: None,
            preview: None,
            matched_pairs: 0,
            mistakes: 0,
            phase: Default::default(),
            clock,
            started_at,
            ended_at: None,
            timers: Timers::new(),
        }
    }

    pub fn generate(config: GameConfig, generator: impl BoardGenerator, clock: C) -> Self {
        Self::new(config, generator.generate(), clock)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn size(&self) -> Position {
        self.board.size()
    }

    pub fn positions(&self) -> PositionIter {
        self.board.positions()
    }

    pub fn matched_pairs(&self) -> TileCount {
        self.matched_pairs
    }

    pub fn mistakes(&self) -> TileCount {
        self.mistakes
    }

    pub fn mistakes_left(&self) -> TileCount {
        self.config.mistake_limit.saturating_sub(self.mistakes)
    }

    /// First tile of the pair attempt in progress
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn pending_mismatch(&self) -> Option<PendingMismatch> {
        self.pending_mismatch
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn tile_state(&self, coords: Position) -> Result<TileState> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.tiles[coords.to_nd_index()])
    }

    pub fn tile_view(&self, coords: Position) -> Result<TileView> {
        let coords = self.board.validate_coords(coords)?;
        Ok(TileView::new(self.tiles[coords.to_nd_index()], self.board[coords]))
    }

    pub fn count_tiles(&self, state: TileState) -> TileCount {
        self.tiles
            .iter()
            .filter(|&&tile| tile == state)
            .count()
            .try_into()
            .unwrap_or(TileCount::MAX)
    }

    /// Whole seconds since the game started, frozen once it ended
    pub fn elapsed_secs(&self) -> u64 {
        self.ended_at
            .unwrap_or_else(|| self.clock.now())
            .saturating_sub(self.started_at)
            .as_secs()
    }

    pub fn can_select_at(&self, coords: Position) -> bool {
        if self.phase.is_finished() || self.pending_mismatch.is_some() {
            return false;
        }

        matches!(self.tile_state(coords), Ok(TileState::Hidden))
    }

    pub fn select_tile(&mut self, coords: Position) -> SelectOutcome {
        if !self.can_select_at(coords) {
            log::trace!("Ignored selection at {:?}", coords);
            return SelectOutcome::NoEffect;
        }

        self.tiles[coords.to_nd_index()] = TileState::Revealed;

        let Some(first) = self.cursor else {
            self.cursor = Some(coords);
            log::trace!("First tile {:?}", coords);
            return SelectOutcome::FirstRevealed;
        };

        if self.board[first] == self.board[coords] {
            self.complete_pair(first, coords)
        } else {
            self.register_mistake(first, coords)
        }
    }

    fn complete_pair(&mut self, first: Position, second: Position) -> SelectOutcome {
        self.tiles[first.to_nd_index()] = TileState::Matched;
        self.tiles[second.to_nd_index()] = TileState::Matched;
        self.cursor = None;
        self.matched_pairs += 1;
        log::debug!(
            "Matched {:?} and {:?}, {} of {} pairs",
            first,
            second,
            self.matched_pairs,
            self.config.total_pairs()
        );

        if self.matched_pairs >= self.config.total_pairs() {
            self.end_game(GamePhase::Won);
            SelectOutcome::Won {
                elapsed_secs: self.elapsed_secs(),
            }
        } else {
            SelectOutcome::Matched
        }
    }

    fn register_mistake(&mut self, first: Position, second: Position) -> SelectOutcome {
        self.mistakes += 1;
        log::debug!(
            "Mismatch {:?} and {:?}, mistake {} of {}",
            first,
            second,
            self.mistakes,
            self.config.mistake_limit
        );

        if self.mistakes >= self.config.mistake_limit {
            self.end_game(GamePhase::Lost);
            return SelectOutcome::Lost;
        }

        let delay = self.config.mismatch_delay;
        let timer = self.timers.schedule(
            self.clock.now().saturating_add(delay),
            Deferred::ResolveMismatch { first, second },
        );
        self.pending_mismatch = Some(PendingMismatch {
            first,
            second,
            timer,
        });
        SelectOutcome::MismatchPending {
            first,
            second,
            delay,
        }
    }

    /// Turns an outstanding mismatched pair face down and releases the selection.
    ///
    /// Returns whether anything changed; a finished game or a missing mismatch is a no-op.
    pub fn resolve_mismatch(&mut self) -> bool {
        if self.phase.is_finished() {
            return false;
        }
        let Some(pending) = self.pending_mismatch.take() else {
            return false;
        };

        self.timers.cancel(pending.timer);
        self.hide_if_revealed(pending.first);
        self.hide_if_revealed(pending.second);
        self.cursor = None;
        log::debug!(
            "Turned back {:?} and {:?}",
            pending.first,
            pending.second
        );
        true
    }

    /// Shows every unmatched tile for `duration`, then turns them back.
    ///
    /// Only accepted while no pair attempt is in progress.
    pub fn reveal_all_briefly(&mut self, duration: Duration) -> bool {
        if self.phase.is_finished()
            || self.preview.is_some()
            || self.cursor.is_some()
            || self.pending_mismatch.is_some()
        {
            return false;
        }

        for tile in self.tiles.iter_mut() {
            if !tile.is_matched() {
                *tile = TileState::Revealed;
            }
        }
        let deadline = self.clock.now().saturating_add(duration);
        self.preview = Some(self.timers.schedule(deadline, Deferred::EndPreview));
        log::debug!("Preview until {:?}", deadline);
        true
    }

    /// Turns back every tile shown by the start preview.
    pub fn end_preview(&mut self) -> bool {
        let Some(timer) = self.preview.take() else {
            return false;
        };
        self.timers.cancel(timer);
        if self.phase.is_finished() {
            return false;
        }

        for tile in self.tiles.iter_mut() {
            if *tile == TileState::Revealed {
                *tile = TileState::Hidden;
            }
        }
        log::debug!("Preview ended");
        true
    }

    /// Runs every scheduled task whose deadline has passed, in deadline order.
    ///
    /// Returns the tasks that changed the board.
    pub fn run_due_timers(&mut self) -> Vec<Deferred> {
        let now = self.clock.now();
        let mut fired = Vec::new();
        while let Some((id, action)) = self.timers.pop_due(now) {
            if self.run_deferred(id, action) {
                fired.push(action);
            }
        }
        fired
    }

    /// Time left until the next scheduled task, zero if one is already due.
    pub fn next_timer_in(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn run_deferred(&mut self, id: TimerId, action: Deferred) -> bool {
        match action {
            Deferred::EndPreview if self.preview == Some(id) => self.end_preview(),
            Deferred::ResolveMismatch { .. }
                if self.pending_mismatch.map(|pending| pending.timer) == Some(id) =>
            {
                self.resolve_mismatch()
            }
            _ => {
                log::trace!("Stale task {:?}: {:?}", id, action);
                false
            }
        }
    }

    fn hide_if_revealed(&mut self, coords: Position) {
        let tile = &mut self.tiles[coords.to_nd_index()];
        if *tile == TileState::Revealed {
            *tile = TileState::Hidden;
        }
    }

    fn end_game(&mut self, phase: GamePhase) {
        if self.phase.is_finished() {
            return;
        }

        self.phase = phase;
        self.cursor = None;
        self.pending_mismatch = None;
        self.preview = None;
        let now = self.clock.now();
        self.ended_at.replace(now);
        let cancelled = self.timers.cancel_all();
        log::debug!(
            "Game ended {:?} at {:?}, cancelled {} pending tasks",
            phase,
            now,
            cancelled
        );
    }
}

impl MemoryGame<SystemClock> {
    /// Random board on the wall clock.
    pub fn start(config: GameConfig) -> Self {
        let generator = RandomBoardGenerator::from_entropy();
        Self::generate(config, generator, SystemClock::new())
    }
}
