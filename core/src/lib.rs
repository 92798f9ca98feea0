#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robots engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values that adapters render
//! in order. Systems such as random placement only ever read the board
//! through a [`BoardView`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of board rows used by the classic game.
pub const DEFAULT_ROWS: u32 = 9;

/// Number of board columns used by the classic game.
pub const DEFAULT_COLUMNS: u32 = 9;

/// Number of robots scattered at the start of every classic game.
pub const DEFAULT_ROBOT_COUNT: u32 = 4;

/// Number of teleport units granted at the start of every classic game.
pub const DEFAULT_TELEPORT_UNITS: u32 = 3;

/// Location of the single wall placed on the classic board.
pub const DEFAULT_OBSTACLE: Position = Position::new(2, 2);

/// Location of a single board cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Applies a compass offset, returning `None` when the result leaves a
    /// `rows` x `columns` board.
    #[must_use]
    pub fn offset(self, direction: Direction, rows: u32, columns: u32) -> Option<Position> {
        let row = shift(self.row, direction.row_delta())?;
        let column = shift(self.column, direction.column_delta())?;
        if row < rows && column < columns {
            Some(Position::new(row, column))
        } else {
            None
        }
    }

    /// Returns the cell one pursuit step closer to `target`.
    ///
    /// Each axis moves independently by at most one, so a robot off both
    /// axes of its quarry always advances diagonally.
    #[must_use]
    pub fn step_toward(self, target: Position) -> Position {
        Position::new(
            approach(self.row, target.row),
            approach(self.column, target.column),
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

fn shift(value: u32, delta: i32) -> Option<u32> {
    match delta {
        -1 => value.checked_sub(1),
        1 => value.checked_add(1),
        _ => Some(value),
    }
}

fn approach(value: u32, target: u32) -> u32 {
    match value.cmp(&target) {
        std::cmp::Ordering::Less => value + 1,
        std::cmp::Ordering::Greater => value - 1,
        std::cmp::Ordering::Equal => value,
    }
}

/// The eight compass directions available to the human.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// One row up and one column left.
    NorthWest,
    /// One row up.
    North,
    /// One row up and one column right.
    NorthEast,
    /// One column left.
    West,
    /// One column right.
    East,
    /// One row down and one column left.
    SouthWest,
    /// One row down.
    South,
    /// One row down and one column right.
    SouthEast,
}

impl Direction {
    /// Every direction in keypad order, top-left to bottom-right.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Row offset applied by the direction.
    #[must_use]
    pub const fn row_delta(self) -> i32 {
        match self {
            Self::NorthWest | Self::North | Self::NorthEast => -1,
            Self::West | Self::East => 0,
            Self::SouthWest | Self::South | Self::SouthEast => 1,
        }
    }

    /// Column offset applied by the direction.
    #[must_use]
    pub const fn column_delta(self) -> i32 {
        match self {
            Self::NorthWest | Self::West | Self::SouthWest => -1,
            Self::North | Self::South => 0,
            Self::NorthEast | Self::East | Self::SouthEast => 1,
        }
    }
}

/// Contents of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellContent {
    /// Open ground.
    #[default]
    Empty,
    /// Fixed obstacle that destroys robots walking into it.
    Wall,
    /// The living human.
    Human,
    /// A robot that has not yet moved during the current pass.
    Robot,
    /// A robot that already moved during the current pass.
    RobotAdvancing,
    /// Wreckage left behind by destroyed robots.
    Scrap,
    /// The human after being caught.
    HumanDead,
    /// The human after every robot was destroyed.
    HumanWinMarker,
    /// The robot that caught the human.
    RobotWinMarker,
}

impl CellContent {
    /// Reports whether the cell holds a live robot, moved or not.
    #[must_use]
    pub const fn is_robot(self) -> bool {
        matches!(self, Self::Robot | Self::RobotAdvancing)
    }
}

/// Progress of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The human is alive and robots remain.
    Playing,
    /// Every robot was destroyed.
    Won,
    /// The human was caught.
    Lost,
}

impl GameStatus {
    /// Reports whether the game has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Audio cues the collaborator may play in response to engine activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A new game started.
    Reset,
    /// The human took a step.
    Move,
    /// The human teleported.
    Teleport,
    /// The game ended, regardless of outcome.
    GameOver,
}

/// Headline shown above the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    /// Regular title while a game is in progress.
    Default,
    /// The human was caught.
    YouAreDead,
    /// Every robot was destroyed.
    YouWin,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current game and starts a fresh one.
    NewGame,
    /// Moves the human one step in the provided direction.
    MoveHuman {
        /// Direction of travel.
        direction: Direction,
    },
    /// Teleports the human to a random empty cell.
    TeleportHuman,
    /// Replaces the random stream used for placement and teleports.
    Reseed {
        /// Seed for the new deterministic stream.
        seed: u64,
    },
    /// Starts a game from an explicit arrangement instead of a random scatter.
    ArrangeBoard {
        /// Cell the human occupies.
        human: Position,
        /// Cells occupied by robots.
        robots: Vec<Position>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The whole board was replaced and must be redrawn.
    BoardReset {
        /// Complete state of the fresh board.
        snapshot: BoardSnapshot,
    },
    /// A single cell changed contents.
    CellChanged {
        /// Cell that changed.
        position: Position,
        /// Contents written into the cell.
        content: CellContent,
    },
    /// The number of remaining teleport units changed.
    TeleportUnitsChanged {
        /// Units left after the change.
        remaining: u32,
    },
    /// The headline shown above the board changed.
    TitleChanged {
        /// Headline to display.
        title: Title,
    },
    /// A cue the collaborator should play.
    Cue {
        /// Cue to play.
        cue: SoundCue,
    },
    /// The game moved into a new status.
    StatusChanged {
        /// Status after the transition.
        status: GameStatus,
    },
}

/// Complete, owned copy of the board and its counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Number of board rows.
    pub rows: u32,
    /// Number of board columns.
    pub columns: u32,
    /// Cell contents in row-major order.
    pub cells: Vec<CellContent>,
    /// Current human position.
    pub human: Position,
    /// Robots still alive.
    pub robots_remaining: u32,
    /// Teleport units left.
    pub teleport_units: u32,
    /// Game status.
    pub status: GameStatus,
}

impl BoardSnapshot {
    /// Returns a borrowed view over the captured cells.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells, self.rows, self.columns)
    }

    /// Returns the contents of the provided cell, if it lies on the board.
    #[must_use]
    pub fn content(&self, position: Position) -> Option<CellContent> {
        self.view().content(position)
    }

    /// Counts cells holding exactly the provided content.
    #[must_use]
    pub fn count(&self, content: CellContent) -> usize {
        self.cells.iter().filter(|cell| **cell == content).count()
    }
}

/// Result of a single player turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnResult {
    /// Events emitted while resolving the turn, in order.
    pub events: Vec<Event>,
    /// Game status once the turn resolved.
    pub status: GameStatus,
    /// Teleport units left once the turn resolved.
    pub teleport_units: u32,
}

/// Read-only view into the dense board grid.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [CellContent],
    rows: u32,
    columns: u32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellContent], rows: u32, columns: u32) -> Self {
        Self {
            cells,
            rows,
            columns,
        }
    }

    /// Returns the contents of the provided cell, if it lies on the board.
    #[must_use]
    pub fn content(&self, position: Position) -> Option<CellContent> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell lies on the board and is empty.
    #[must_use]
    pub fn is_empty(&self, position: Position) -> bool {
        self.content(position) == Some(CellContent::Empty)
    }

    /// Reports whether at least one cell on the board is empty.
    #[must_use]
    pub fn has_empty_cell(&self) -> bool {
        self.cells.contains(&CellContent::Empty)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellContent)> + 'a {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| Position::new(row, column)))
            .zip(self.cells.iter().copied())
    }

    /// Provides the `(rows, columns)` dimensions of the board.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.row() < self.rows && position.column() < self.columns {
            let row = usize::try_from(position.row()).ok()?;
            let column = usize::try_from(position.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Board dimensions and starting counters for a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of board rows.
    pub rows: u32,
    /// Number of board columns.
    pub columns: u32,
    /// Robots scattered by every new game.
    pub robot_count: u32,
    /// Teleport units granted by every new game.
    pub teleport_units: u32,
    /// Cells that hold a wall in every new game.
    pub obstacles: Vec<Position>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            robot_count: DEFAULT_ROBOT_COUNT,
            teleport_units: DEFAULT_TELEPORT_UNITS,
            obstacles: vec![DEFAULT_OBSTACLE],
        }
    }
}

impl BoardConfig {
    /// Cell where the human starts every new game: the board centre.
    #[must_use]
    pub const fn human_start(&self) -> Position {
        Position::new(self.rows / 2, self.columns / 2)
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }

    /// Checks that every game played with this configuration keeps at least
    /// one empty cell available for placement and teleports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyBoard);
        }

        if self.robot_count == 0 {
            return Err(ConfigError::NoRobots);
        }

        let start = self.human_start();
        for obstacle in &self.obstacles {
            if obstacle.row() >= self.rows || obstacle.column() >= self.columns {
                return Err(ConfigError::ObstacleOutOfBounds {
                    position: *obstacle,
                });
            }
            if *obstacle == start {
                return Err(ConfigError::ObstacleOnHumanStart {
                    position: *obstacle,
                });
            }
        }

        // Scrap never outnumbers the robots that produced it, so this bound
        // holds for the entire game, not just the opening scatter.
        let required = self.obstacles.len() as u64 + 1 + u64::from(self.robot_count);
        let capacity = self.capacity();
        if required >= capacity {
            return Err(ConfigError::Overcrowded { required, capacity });
        }
        if usize::try_from(capacity).is_err() {
            return Err(ConfigError::TooLarge { capacity });
        }

        Ok(())
    }
}

/// Reasons a board configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// The board has no rows or no columns.
    #[error("board must have at least one row and one column")]
    EmptyBoard,
    /// A game needs at least one robot to be winnable.
    #[error("at least one robot is required")]
    NoRobots,
    /// An obstacle lies outside the board.
    #[error("obstacle at {position} lies outside the board")]
    ObstacleOutOfBounds {
        /// Offending obstacle.
        position: Position,
    },
    /// An obstacle covers the human start cell.
    #[error("obstacle at {position} covers the human start cell")]
    ObstacleOnHumanStart {
        /// Offending obstacle.
        position: Position,
    },
    /// Walls, the human and the robots would leave no empty cell.
    #[error("{required} occupied cells leave no empty cell on a board of {capacity}")]
    Overcrowded {
        /// Cells that walls, the human and robots need.
        required: u64,
        /// Cells available on the board.
        capacity: u64,
    },
    /// The board holds more cells than this platform can address.
    #[error("a board of {capacity} cells cannot be allocated")]
    TooLarge {
        /// Cells the board would hold.
        capacity: u64,
    },
}

/// Failures surfaced by engine operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error, Serialize, Deserialize)]
pub enum EngineError {
    /// A position lies outside the board.
    #[error("position {position} lies outside the {rows}x{columns} board")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Number of board rows.
        rows: u32,
        /// Number of board columns.
        columns: u32,
    },
    /// No empty cell exists to place a piece on.
    #[error("no empty cell is available")]
    NoSpaceAvailable,
    /// An arranged piece was placed on an occupied cell.
    #[error("cell {position} is already occupied")]
    CellOccupied {
        /// Offending position.
        position: Position,
    },
    /// The board configuration was rejected.
    #[error("invalid board configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::{
        BoardConfig, BoardView, CellContent, ConfigError, Direction, EngineError, Position,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn offset_stays_within_bounds() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(Direction::North, 9, 9), None);
        assert_eq!(origin.offset(Direction::West, 9, 9), None);
        assert_eq!(
            origin.offset(Direction::SouthEast, 9, 9),
            Some(Position::new(1, 1))
        );

        let corner = Position::new(8, 8);
        assert_eq!(corner.offset(Direction::South, 9, 9), None);
        assert_eq!(corner.offset(Direction::East, 9, 9), None);
        assert_eq!(
            corner.offset(Direction::NorthWest, 9, 9),
            Some(Position::new(7, 7))
        );
    }

    #[test]
    fn every_direction_moves_exactly_one_king_step() {
        let centre = Position::new(4, 4);
        for direction in Direction::ALL {
            let next = centre
                .offset(direction, 9, 9)
                .expect("centre neighbours are on the board");
            let step = (
                next.row().abs_diff(centre.row()),
                next.column().abs_diff(centre.column()),
            );
            assert_ne!(step, (0, 0), "{direction:?}");
            assert!(step.0 <= 1 && step.1 <= 1, "{direction:?}");
        }
    }

    #[test]
    fn step_toward_moves_each_axis_independently() {
        let human = Position::new(4, 4);
        assert_eq!(Position::new(0, 0).step_toward(human), Position::new(1, 1));
        assert_eq!(Position::new(4, 6).step_toward(human), Position::new(4, 5));
        assert_eq!(Position::new(8, 4).step_toward(human), Position::new(7, 4));
        assert_eq!(Position::new(2, 7).step_toward(human), Position::new(3, 6));
    }

    #[test]
    fn board_view_iterates_in_row_major_order() {
        let cells = [
            CellContent::Empty,
            CellContent::Wall,
            CellContent::Robot,
            CellContent::Human,
            CellContent::Empty,
            CellContent::Scrap,
        ];
        let view = BoardView::new(&cells, 2, 3);

        let positions: Vec<Position> = view.iter().map(|(position, _)| position).collect();
        assert_eq!(positions[1], Position::new(0, 1));
        assert_eq!(positions[3], Position::new(1, 0));
        assert_eq!(positions.len(), 6);
        assert_eq!(
            view.iter().last(),
            Some((Position::new(1, 2), CellContent::Scrap))
        );
        assert_eq!(view.content(Position::new(1, 2)), Some(CellContent::Scrap));
        assert_eq!(view.content(Position::new(2, 0)), None);
        assert!(view.is_empty(Position::new(1, 1)));
        assert!(!view.is_empty(Position::new(0, 1)));
    }

    #[test]
    fn default_config_matches_classic_board() {
        let config = BoardConfig::default();
        assert_eq!((config.rows, config.columns), (9, 9));
        assert_eq!(config.human_start(), Position::new(4, 4));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_degenerate_boards() {
        let empty = BoardConfig {
            rows: 0,
            ..BoardConfig::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyBoard));

        let idle = BoardConfig {
            robot_count: 0,
            ..BoardConfig::default()
        };
        assert_eq!(idle.validate(), Err(ConfigError::NoRobots));

        let stray = BoardConfig {
            obstacles: vec![Position::new(9, 0)],
            ..BoardConfig::default()
        };
        assert!(matches!(
            stray.validate(),
            Err(ConfigError::ObstacleOutOfBounds { .. })
        ));

        let blocking = BoardConfig {
            obstacles: vec![Position::new(4, 4)],
            ..BoardConfig::default()
        };
        assert!(matches!(
            blocking.validate(),
            Err(ConfigError::ObstacleOnHumanStart { .. })
        ));
    }

    #[test]
    fn validate_requires_a_spare_cell() {
        let tight = BoardConfig {
            rows: 2,
            columns: 2,
            robot_count: 3,
            obstacles: Vec::new(),
            ..BoardConfig::default()
        };
        assert_eq!(
            tight.validate(),
            Err(ConfigError::Overcrowded {
                required: 4,
                capacity: 4,
            })
        );

        let roomy = BoardConfig {
            robot_count: 2,
            ..tight
        };
        assert_eq!(roomy.validate(), Ok(()));
    }

    #[test]
    fn engine_error_wraps_config_error() {
        let error: EngineError = ConfigError::EmptyBoard.into();
        assert_eq!(error, EngineError::InvalidConfig(ConfigError::EmptyBoard));
        assert!(error.to_string().contains("at least one row"));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn board_config_round_trips_through_bincode() {
        assert_round_trip(&BoardConfig::default());
    }

    #[test]
    fn engine_error_round_trips_through_bincode() {
        assert_round_trip(&EngineError::OutOfBounds {
            position: Position::new(12, 3),
            rows: 9,
            columns: 9,
        });
    }
}
