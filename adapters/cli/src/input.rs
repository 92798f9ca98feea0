//! Keyboard commands accepted by the terminal adapter.

use robots_core::Direction;

/// Key reference printed on start and on request.
pub(crate) const HELP: &str = "\
move: q w e / a d / z x c   teleport: t   new game: n   help: h   quit: quit";

/// Player intent decoded from a line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Move(Direction),
    Teleport,
    NewGame,
    Help,
    Quit,
}

/// Decodes a single line, ignoring surrounding whitespace and case.
pub(crate) fn parse(line: &str) -> Option<Action> {
    let action = match line.trim().to_ascii_lowercase().as_str() {
        "q" => Action::Move(Direction::NorthWest),
        "w" => Action::Move(Direction::North),
        "e" => Action::Move(Direction::NorthEast),
        "a" => Action::Move(Direction::West),
        "d" => Action::Move(Direction::East),
        "z" => Action::Move(Direction::SouthWest),
        "x" => Action::Move(Direction::South),
        "c" => Action::Move(Direction::SouthEast),
        "t" => Action::Teleport,
        "n" => Action::NewGame,
        "h" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => return None,
    };
    Some(action)
}
