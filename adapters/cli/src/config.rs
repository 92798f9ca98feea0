//! Layered game settings: built-in defaults, then a TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use robots_core::BoardConfig;
use serde::Deserialize;

/// Board configuration plus the seed for the engine's random stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) board: BoardConfig,
    pub(crate) seed: u64,
}

/// Values that may be overridden on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) rows: Option<u32>,
    pub(crate) columns: Option<u32>,
    pub(crate) robots: Option<u32>,
    pub(crate) teleports: Option<u32>,
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    seed: Option<u64>,
    #[serde(default)]
    board: BoardConfig,
}

/// Resolves the final settings, falling back to a fresh random seed.
pub(crate) fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let file = match path {
        Some(path) => load(path)?,
        None => FileConfig::default(),
    };

    let mut board = file.board;
    if let Some(rows) = overrides.rows {
        board.rows = rows;
    }
    if let Some(columns) = overrides.columns {
        board.columns = columns;
    }
    if let Some(robots) = overrides.robots {
        board.robot_count = robots;
    }
    if let Some(teleports) = overrides.teleports {
        board.teleport_units = teleports;
    }
    board
        .validate()
        .context("board configuration rejected")?;

    let seed = overrides
        .seed
        .or(file.seed)
        .unwrap_or_else(rand::random::<u64>);
    Ok(Settings { board, seed })
}

fn load(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse config at {}", path.display()))
}

fn parse(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("invalid toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use robots_core::Position;

    #[test]
    fn empty_file_keeps_classic_board() {
        let file = parse("").expect("empty toml is valid");
        assert_eq!(file.board, BoardConfig::default());
        assert_eq!(file.seed, None);
    }

    #[test]
    fn file_overrides_individual_fields() {
        let file = parse(
            r#"
            seed = 42

            [board]
            rows = 12
            robot_count = 8
            obstacles = [{ row = 1, column = 1 }, { row = 10, column = 3 }]
            "#,
        )
        .expect("valid toml");

        assert_eq!(file.seed, Some(42));
        assert_eq!(file.board.rows, 12);
        assert_eq!(file.board.columns, 9);
        assert_eq!(file.board.robot_count, 8);
        assert_eq!(file.board.teleport_units, 3);
        assert_eq!(
            file.board.obstacles,
            vec![Position::new(1, 1), Position::new(10, 3)]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("robots = 3").is_err());
    }

    #[test]
    fn flags_take_precedence_over_defaults() {
        let settings = resolve(
            None,
            Overrides {
                rows: Some(11),
                columns: Some(13),
                robots: Some(6),
                teleports: Some(0),
                seed: Some(5),
            },
        )
        .expect("overrides form a valid board");

        assert_eq!(settings.seed, 5);
        assert_eq!(settings.board.rows, 11);
        assert_eq!(settings.board.columns, 13);
        assert_eq!(settings.board.robot_count, 6);
        assert_eq!(settings.board.teleport_units, 0);
    }

    #[test]
    fn invalid_boards_are_reported() {
        let error = resolve(
            None,
            Overrides {
                rows: Some(2),
                columns: Some(2),
                ..Overrides::default()
            },
        )
        .expect_err("2x2 board cannot hold the classic wall");

        assert!(format!("{error:#}").contains("board configuration rejected"));
    }
}
