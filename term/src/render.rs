use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use pairs_core::{Clock, Position, Symbol, TileState, TileView};

use crate::app::App;

const ORIGIN: (u16, u16) = (2, 1);
const TILE_WIDTH: u16 = 7;
const TILE_HEIGHT: u16 = 3;
const GAP: u16 = 1;

const HIDDEN: Color = Color::Rgb {
    r: 128,
    g: 128,
    b: 128,
};

/// Colour of each symbol, as in the classic palette.
pub fn symbol_color(symbol: Symbol) -> Color {
    let (r, g, b) = match symbol {
        1 => (255, 255, 0),
        2 => (255, 0, 0),
        3 => (0, 255, 0),
        4 => (0, 0, 255),
        5 => (255, 200, 0),
        6 => (255, 175, 175),
        7 => (0, 255, 255),
        8 => (255, 0, 255),
        _ => (0, 0, 0),
    };
    Color::Rgb { r, g, b }
}

/// Top-left terminal cell of a tile.
fn tile_origin((row, col): Position) -> (u16, u16) {
    (
        ORIGIN.0 + u16::from(col) * (TILE_WIDTH + GAP),
        ORIGIN.1 + u16::from(row) * (TILE_HEIGHT + GAP),
    )
}

/// Maps a terminal cell to the tile drawn there, gaps belong to no tile.
pub fn tile_at(column: u16, row: u16, size: Position) -> Option<Position> {
    let x = column.checked_sub(ORIGIN.0)?;
    let y = row.checked_sub(ORIGIN.1)?;
    if x % (TILE_WIDTH + GAP) >= TILE_WIDTH || y % (TILE_HEIGHT + GAP) >= TILE_HEIGHT {
        return None;
    }

    let tile_col = u8::try_from(x / (TILE_WIDTH + GAP)).ok()?;
    let tile_row = u8::try_from(y / (TILE_HEIGHT + GAP)).ok()?;
    (tile_row < size.0 && tile_col < size.1).then_some((tile_row, tile_col))
}

pub fn draw<W: Write, C: Clock>(out: &mut W, app: &App<C>) -> io::Result<()> {
    let game = app.game();
    queue!(out, ResetColor, Clear(ClearType::All))?;

    for pos in game.positions() {
        let Ok(view) = game.tile_view(pos) else {
            continue;
        };
        draw_tile(out, pos, view, app.focus() == pos)?;
    }

    let (rows, _) = game.size();
    let status_row = tile_origin((rows, 0)).1;
    queue!(
        out,
        ResetColor,
        MoveTo(ORIGIN.0, status_row),
        Print(format!(
            "Time: {}s   Pairs: {}/{}   Mistakes left: {}",
            game.elapsed_secs(),
            game.matched_pairs(),
            game.config().total_pairs(),
            game.mistakes_left()
        )),
        MoveTo(ORIGIN.0, status_row + 1),
        SetAttribute(Attribute::Bold),
        Print(app.status_message()),
        SetAttribute(Attribute::Reset),
        MoveTo(ORIGIN.0, status_row + 3),
        SetForegroundColor(Color::DarkGrey),
        Print("arrows/hjkl move   enter/space/click open   q quit"),
        ResetColor,
    )?;
    Ok(())
}

fn draw_tile<W: Write>(out: &mut W, pos: Position, view: TileView, focused: bool) -> io::Result<()> {
    let (x, y) = tile_origin(pos);
    let blank = " ".repeat(usize::from(TILE_WIDTH));
    let (background, label) = match (view.state, view.symbol) {
        (TileState::Hidden, _) | (_, None) => (Some(HIDDEN), String::new()),
        (TileState::Revealed, Some(symbol)) => (Some(symbol_color(symbol)), symbol.to_string()),
        (TileState::Matched, Some(_)) => (None, String::new()),
    };

    for line in 0..TILE_HEIGHT {
        queue!(out, MoveTo(x, y + line), ResetColor)?;
        match background {
            Some(color) => queue!(out, SetBackgroundColor(color), Print(&blank))?,
            None if line == TILE_HEIGHT / 2 => {
                queue!(out, SetForegroundColor(Color::DarkGrey), Print(format!("{:^7}", "·")))?
            }
            None => queue!(out, Print(&blank))?,
        }
    }

    let middle = y + TILE_HEIGHT / 2;
    if !label.is_empty() {
        queue!(
            out,
            MoveTo(x, middle),
            SetForegroundColor(Color::Black),
            Print(format!("{label:^7}")),
        )?;
    }
    if focused {
        queue!(
            out,
            ResetColor,
            SetForegroundColor(Color::White),
            MoveTo(x, middle),
            Print('['),
            MoveTo(x + TILE_WIDTH - 1, middle),
            Print(']'),
        )?;
    }
    queue!(out, ResetColor)?;
    Ok(())
}
