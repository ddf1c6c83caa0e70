use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use pairs_core::Position;

use crate::app::{Direction, Mode, Msg};
use crate::render;

/// Translates a terminal event into a message for the current mode.
pub fn map_event(event: &Event, mode: Mode, size: Position) -> Option<Msg> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key, mode),
        Event::Mouse(mouse) if mode == Mode::Playing => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                render::tile_at(mouse.column, mouse.row, size).map(Msg::Select)
            }
            _ => None,
        },
        Event::Resize(..) => Some(Msg::Redraw),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, mode: Mode) -> Option<Msg> {
    use KeyCode::*;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == Char('c') {
        return Some(match mode {
            Mode::Playing => Msg::Quit,
            Mode::ConfirmQuit => Msg::Confirm(true),
            Mode::Finished => Msg::Dismiss,
        });
    }

    match mode {
        Mode::Playing => match key.code {
            Up | Char('k') => Some(Msg::Move(Direction::Up)),
            Down | Char('j') => Some(Msg::Move(Direction::Down)),
            Left | Char('h') => Some(Msg::Move(Direction::Left)),
            Right | Char('l') => Some(Msg::Move(Direction::Right)),
            Enter | Char(' ') => Some(Msg::Activate),
            Esc | Char('q') => Some(Msg::Quit),
            _ => None,
        },
        Mode::ConfirmQuit => match key.code {
            Char('y') | Char('Y') => Some(Msg::Confirm(true)),
            Char('n') | Char('N') | Esc => Some(Msg::Confirm(false)),
            _ => None,
        },
        Mode::Finished => Some(Msg::Dismiss),
    }
}
