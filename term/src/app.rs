use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::Context;
use crossterm::event;
use pairs_core::{
    BoardGenerator, Clock, Deferred, GamePhase, MemoryGame, Position, RandomBoardGenerator,
    SelectOutcome, SystemClock,
};

use crate::config::Settings;
use crate::terminal::TerminalGuard;
use crate::{input, render};

/// Longest wait between redraws, keeps the clock on screen ticking.
const CLOCK_REFRESH: Duration = Duration::from_millis(500);

const EXIT_QUESTION: &str = "Are you sure you want to exit the game? (y/n)";
const LOST_MESSAGE: &str = "Unfortunately! You lost the game.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    Move(Direction),
    /// Open the focused tile
    Activate,
    /// Open a tile directly, e.g. by clicking it
    Select(Position),
    Quit,
    Confirm(bool),
    Dismiss,
    Redraw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Playing,
    ConfirmQuit,
    Finished,
}

pub struct App<C: Clock> {
    game: MemoryGame<C>,
    focus: Position,
    mode: Mode,
    banner: String,
    running: bool,
}

impl<C: Clock> App<C> {
    pub fn new(game: MemoryGame<C>) -> Self {
        Self {
            game,
            focus: (0, 0),
            mode: Mode::Playing,
            banner: String::new(),
            running: true,
        }
    }

    pub fn game(&self) -> &MemoryGame<C> {
        &self.game
    }

    pub fn focus(&self) -> Position {
        self.focus
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Line shown under the board, the exit question takes over while it is asked.
    pub fn status_message(&self) -> &str {
        match self.mode {
            Mode::ConfirmQuit => EXIT_QUESTION,
            Mode::Playing | Mode::Finished => &self.banner,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Message to leave on the plain terminal once the UI is gone.
    pub fn summary(&self) -> Option<&str> {
        match self.game.phase() {
            GamePhase::InProgress => None,
            GamePhase::Won | GamePhase::Lost => Some(&self.banner),
        }
    }

    pub fn start_preview(&mut self, duration: Duration) {
        if self.game.reveal_all_briefly(duration) {
            self.banner = "Memorise the tiles!".to_owned();
        }
    }

    /// Applies a message, returns whether the screen needs a redraw.
    pub fn update(&mut self, msg: Msg) -> bool {
        use Msg::*;

        log::trace!("{:?} in {:?}", msg, self.mode);
        match (self.mode, msg) {
            (_, Redraw) => true,
            (Mode::Playing, Move(direction)) => self.move_focus(direction),
            (Mode::Playing, Activate) => self.select(self.focus),
            (Mode::Playing, Select(pos)) => {
                self.focus = pos;
                self.select(pos);
                true
            }
            (Mode::Playing, Quit) => {
                self.mode = Mode::ConfirmQuit;
                true
            }
            (Mode::ConfirmQuit, Confirm(true)) => {
                log::info!("Player left the game");
                self.running = false;
                true
            }
            (Mode::ConfirmQuit, Confirm(false)) => {
                self.mode = Mode::Playing;
                true
            }
            (Mode::Finished, Dismiss) => {
                self.running = false;
                true
            }
            _ => false,
        }
    }

    /// Runs due timers, returns whether the board changed.
    pub fn tick(&mut self) -> bool {
        let fired = self.game.run_due_timers();
        for action in &fired {
            match action {
                Deferred::EndPreview => self.banner.clear(),
                Deferred::ResolveMismatch { .. } => {}
            }
        }
        !fired.is_empty()
    }

    /// How long input polling may block before the next timer or clock redraw.
    pub fn poll_timeout(&self) -> Duration {
        self.game
            .next_timer_in()
            .map_or(CLOCK_REFRESH, |due| due.min(CLOCK_REFRESH))
    }

    fn move_focus(&mut self, direction: Direction) -> bool {
        let (rows, cols) = self.game.size();
        let (row, col) = self.focus;
        let next = match direction {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(rows - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(cols - 1)),
        };
        let changed = next != self.focus;
        self.focus = next;
        changed
    }

    fn select(&mut self, pos: Position) -> bool {
        let outcome = self.game.select_tile(pos);
        match outcome {
            SelectOutcome::NoEffect => {}
            SelectOutcome::FirstRevealed => self.banner.clear(),
            SelectOutcome::Matched => self.banner = "Match!".to_owned(),
            SelectOutcome::MismatchPending { .. } => {
                self.banner = format!("No match. Mistakes left: {}", self.game.mistakes_left());
            }
            SelectOutcome::Won { elapsed_secs } => {
                self.banner = format!(
                    "Congratulations! You completed the game. Time: {elapsed_secs} seconds"
                );
                self.mode = Mode::Finished;
            }
            SelectOutcome::Lost => {
                self.banner = LOST_MESSAGE.to_owned();
                self.mode = Mode::Finished;
            }
        }
        if outcome.is_final() {
            log::info!("{}", self.banner);
        }
        outcome.has_update()
    }
}

/// Builds the game from settings and plays it in the terminal until the player leaves.
///
/// Returns the end-of-game notice, if the game was finished.
pub fn run(settings: &Settings) -> anyhow::Result<Option<String>> {
    let generator = match settings.seed {
        Some(seed) => RandomBoardGenerator::new(seed),
        None => RandomBoardGenerator::from_entropy(),
    };
    log::info!("Board seed {}", generator.seed());
    let game = MemoryGame::new(settings.game, generator.generate(), SystemClock::new());
    let mut app = App::new(game);
    if settings.show_preview {
        app.start_preview(settings.game.preview);
    }

    let guard = TerminalGuard::enter().context("initialising terminal")?;
    let result = event_loop(&mut app);
    drop(guard);
    result?;

    Ok(app.summary().map(str::to_owned))
}

fn event_loop<C: Clock>(app: &mut App<C>) -> anyhow::Result<()> {
    let mut out = BufWriter::new(io::stdout());
    let mut dirty = true;
    let mut shown_secs = None;

    while app.is_running() {
        dirty |= app.tick();

        let secs = app.game().elapsed_secs();
        if shown_secs != Some(secs) {
            shown_secs = Some(secs);
            dirty = true;
        }

        if dirty {
            render::draw(&mut out, app)?;
            out.flush()?;
            dirty = false;
        }

        if event::poll(app.poll_timeout())? {
            let event = event::read()?;
            if let Some(msg) = input::map_event(&event, app.mode(), app.game().size()) {
                dirty |= app.update(msg);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_core::{
        Board, GameConfig, MISMATCH_DELAY, ManualClock, PREVIEW_DURATION, Symbol, TileState,
    };

    const LAYOUT: [[Symbol; 4]; 4] = [[1, 2, 3, 4], [1, 2, 3, 4], [5, 6, 7, 8], [5, 6, 7, 8]];

    fn app() -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let board = Board::from_rows(LAYOUT).unwrap();
        let game = MemoryGame::new(GameConfig::default(), board, clock.clone());
        (App::new(game), clock)
    }

    #[test]
    fn focus_stays_on_board() {
        let (mut app, _) = app();

        assert!(!app.update(Msg::Move(Direction::Up)));
        assert!(!app.update(Msg::Move(Direction::Left)));
        for _ in 0..6 {
            app.update(Msg::Move(Direction::Right));
            app.update(Msg::Move(Direction::Down));
        }
        assert_eq!(app.focus(), (3, 3));
    }

    #[test]
    fn activate_opens_focused_tile() {
        let (mut app, _) = app();
        app.update(Msg::Move(Direction::Down));

        assert!(app.update(Msg::Activate));
        assert_eq!(app.game().tile_state((1, 0)), Ok(TileState::Revealed));
        assert!(!app.update(Msg::Activate));
    }

    #[test]
    fn mismatch_clears_after_tick() {
        let (mut app, clock) = app();
        app.update(Msg::Select((0, 0)));
        app.update(Msg::Select((0, 1)));
        assert_eq!(app.status_message(), "No match. Mistakes left: 2");
        assert_eq!(app.poll_timeout(), CLOCK_REFRESH);

        clock.advance(MISMATCH_DELAY - Duration::from_millis(200));
        assert_eq!(app.poll_timeout(), Duration::from_millis(200));
        assert!(!app.tick());

        clock.advance_ms(200);
        assert!(app.tick());
        assert_eq!(app.game().tile_state((0, 1)), Ok(TileState::Hidden));
    }

    #[test]
    fn preview_banner_clears_when_preview_ends() {
        let (mut app, clock) = app();
        app.start_preview(PREVIEW_DURATION);
        assert_eq!(app.status_message(), "Memorise the tiles!");

        clock.advance(PREVIEW_DURATION);
        assert!(app.tick());
        assert_eq!(app.status_message(), "");
    }

    #[test]
    fn quit_needs_confirmation() {
        let (mut app, _) = app();

        app.update(Msg::Quit);
        assert_eq!(app.mode(), Mode::ConfirmQuit);
        assert_eq!(app.status_message(), EXIT_QUESTION);

        app.update(Msg::Confirm(false));
        assert_eq!(app.mode(), Mode::Playing);
        assert!(app.is_running());

        app.update(Msg::Quit);
        app.update(Msg::Confirm(true));
        assert!(!app.is_running());
        assert_eq!(app.summary(), None);
    }

    #[test]
    fn winning_shows_time_and_waits_for_dismiss() {
        let (mut app, clock) = app();
        clock.advance_ms(42_000);
        for col in 0..4 {
            app.update(Msg::Select((0, col)));
            app.update(Msg::Select((1, col)));
            app.update(Msg::Select((2, col)));
            app.update(Msg::Select((3, col)));
        }

        let notice = "Congratulations! You completed the game. Time: 42 seconds";
        assert_eq!(app.mode(), Mode::Finished);
        assert_eq!(app.status_message(), notice);
        assert!(!app.update(Msg::Select((0, 0))));
        assert!(app.is_running());

        app.update(Msg::Dismiss);
        assert!(!app.is_running());
        assert_eq!(app.summary(), Some(notice));
    }

    #[test]
    fn losing_shows_notice() {
        let (mut app, clock) = app();
        for _ in 0..3 {
            app.update(Msg::Select((0, 0)));
            app.update(Msg::Select((3, 3)));
            clock.advance(MISMATCH_DELAY);
            app.tick();
        }

        assert_eq!(app.mode(), Mode::Finished);
        assert_eq!(app.status_message(), LOST_MESSAGE);
        assert_eq!(app.summary(), Some(LOST_MESSAGE));
    }
}
