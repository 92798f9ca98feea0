#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Robots.

mod grid;

use grid::Grid;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robots_core::{
    BoardConfig, BoardSnapshot, CellContent, Command, ConfigError, Direction, EngineError, Event,
    GameStatus, Position, SoundCue, Title, TurnResult,
};
use robots_system_placement::pick_empty_cell;
use tracing::{debug, info, trace};

/// Represents the authoritative Robots game state.
#[derive(Clone, Debug)]
pub struct World {
    config: BoardConfig,
    grid: Grid,
    human: Position,
    robots_remaining: u32,
    teleport_units: u32,
    status: GameStatus,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world for the provided configuration and starts the first game.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        let mut world = Self {
            grid: Grid::new(config.rows, config.columns)?,
            human: config.human_start(),
            robots_remaining: 0,
            teleport_units: 0,
            status: GameStatus::Playing,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        };
        world.reset(&mut Vec::new())?;
        Ok(world)
    }

    /// Discards the current game, starts a fresh one and returns its board.
    pub fn new_game(&mut self) -> Result<BoardSnapshot, EngineError> {
        let mut events = Vec::new();
        apply(self, Command::NewGame, &mut events)?;
        Ok(query::snapshot(self))
    }

    /// Moves the human one step and lets the robots answer.
    pub fn move_human(&mut self, direction: Direction) -> Result<TurnResult, EngineError> {
        self.turn(Command::MoveHuman { direction })
    }

    /// Spends a teleport unit to drop the human on a random empty cell.
    pub fn teleport_human(&mut self) -> Result<TurnResult, EngineError> {
        self.turn(Command::TeleportHuman)
    }

    fn turn(&mut self, command: Command) -> Result<TurnResult, EngineError> {
        let mut events = Vec::new();
        apply(self, command, &mut events)?;
        Ok(TurnResult {
            events,
            status: self.status,
            teleport_units: self.teleport_units,
        })
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        let mut grid = obstacle_layout(&self.config)?;
        let human = self.config.human_start();
        grid.set(human, CellContent::Human)?;

        for _ in 0..self.config.robot_count {
            let cell = pick_empty_cell(grid.view(), &mut self.rng)?;
            grid.set(cell, CellContent::Robot)?;
        }

        info!(
            rows = self.config.rows,
            columns = self.config.columns,
            robots = self.config.robot_count,
            "new game"
        );
        self.start(grid, human, self.config.robot_count, out_events);
        Ok(())
    }

    fn arrange(
        &mut self,
        human: Position,
        robots: &[Position],
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if robots.is_empty() {
            return Err(ConfigError::NoRobots.into());
        }
        let required = self.config.obstacles.len() as u64 + 1 + robots.len() as u64;
        let capacity = self.config.capacity();
        if required >= capacity {
            return Err(ConfigError::Overcrowded { required, capacity }.into());
        }

        let mut grid = obstacle_layout(&self.config)?;
        for (position, content) in std::iter::once((human, CellContent::Human))
            .chain(robots.iter().map(|robot| (*robot, CellContent::Robot)))
        {
            if grid.get(position)? != CellContent::Empty {
                return Err(EngineError::CellOccupied { position });
            }
            grid.set(position, content)?;
        }

        let robot_count = u32::try_from(robots.len()).map_err(|_| ConfigError::Overcrowded {
            required,
            capacity,
        })?;
        debug!(%human, robots = robot_count, "board arranged");
        self.start(grid, human, robot_count, out_events);
        Ok(())
    }

    fn start(
        &mut self,
        grid: Grid,
        human: Position,
        robots: u32,
        out_events: &mut Vec<Event>,
    ) {
        self.grid = grid;
        self.human = human;
        self.robots_remaining = robots;
        self.teleport_units = self.config.teleport_units;
        self.status = GameStatus::Playing;

        out_events.push(Event::BoardReset {
            snapshot: query::snapshot(self),
        });
        out_events.push(Event::TeleportUnitsChanged {
            remaining: self.teleport_units,
        });
        out_events.push(Event::TitleChanged {
            title: Title::Default,
        });
        out_events.push(Event::Cue {
            cue: SoundCue::Reset,
        });
        out_events.push(Event::StatusChanged {
            status: GameStatus::Playing,
        });
    }

    fn step_human(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if self.status != GameStatus::Playing {
            return Ok(());
        }

        let (rows, columns) = self.grid.dimensions();
        let Some(target) = self.human.offset(direction, rows, columns) else {
            trace!(?direction, "move leaves the board");
            return Ok(());
        };

        match self.grid.get(target)? {
            CellContent::Empty => {
                out_events.push(Event::Cue {
                    cue: SoundCue::Move,
                });
                self.write(self.human, CellContent::Empty, out_events)?;
                self.write(target, CellContent::Human, out_events)?;
                trace!(from = %self.human, to = %target, "human moved");
                self.human = target;
                self.advance_robots(out_events)
            }
            CellContent::Robot => {
                self.write(target, CellContent::RobotWinMarker, out_events)?;
                debug!(robot = %target, "human walked into a robot");
                self.lose(out_events)
            }
            blocked => {
                trace!(?direction, ?blocked, "move blocked");
                Ok(())
            }
        }
    }

    fn teleport(&mut self, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        if self.status != GameStatus::Playing || self.teleport_units == 0 {
            return Ok(());
        }

        let destination = pick_empty_cell(self.grid.view(), &mut self.rng)?;
        out_events.push(Event::Cue {
            cue: SoundCue::Teleport,
        });
        self.write(self.human, CellContent::Empty, out_events)?;
        self.write(destination, CellContent::Human, out_events)?;
        debug!(from = %self.human, to = %destination, "human teleported");
        self.human = destination;
        self.teleport_units -= 1;
        out_events.push(Event::TeleportUnitsChanged {
            remaining: self.teleport_units,
        });
        Ok(())
    }

    /// Moves every robot one step toward the human in row-major order.
    ///
    /// Robots write themselves as [`CellContent::RobotAdvancing`] so they are
    /// skipped later in the same scan, while the cell they vacated is
    /// immediately open to robots processed after them.
    fn advance_robots(&mut self, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        let (rows, columns) = self.grid.dimensions();
        for row in 0..rows {
            for column in 0..columns {
                let source = Position::new(row, column);
                if self.grid.get(source)? != CellContent::Robot {
                    continue;
                }

                let destination = source.step_toward(self.human);
                match self.grid.get(destination)? {
                    CellContent::Empty => {
                        self.write(source, CellContent::Empty, out_events)?;
                        self.write(destination, CellContent::RobotAdvancing, out_events)?;
                        trace!(from = %source, to = %destination, "robot advanced");
                    }
                    CellContent::Human => {
                        self.write(source, CellContent::RobotWinMarker, out_events)?;
                        debug!(robot = %source, "robot caught the human");
                        return self.lose(out_events);
                    }
                    occupant => {
                        self.write(source, CellContent::Scrap, out_events)?;
                        self.robots_remaining = self.robots_remaining.saturating_sub(1);
                        if occupant.is_robot() {
                            self.write(destination, CellContent::Scrap, out_events)?;
                            self.robots_remaining = self.robots_remaining.saturating_sub(1);
                        }
                        debug!(
                            robot = %source,
                            at = %destination,
                            ?occupant,
                            remaining = self.robots_remaining,
                            "robot destroyed"
                        );

                        if self.robots_remaining == 0 {
                            return self.win(out_events);
                        }
                    }
                }
            }
        }

        let advanced: Vec<Position> = self
            .grid
            .view()
            .iter()
            .filter(|(_, content)| *content == CellContent::RobotAdvancing)
            .map(|(position, _)| position)
            .collect();
        for position in advanced {
            self.write(position, CellContent::Robot, out_events)?;
        }
        Ok(())
    }

    fn lose(&mut self, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        self.write(self.human, CellContent::HumanDead, out_events)?;
        info!(human = %self.human, "human was caught");
        self.finish(GameStatus::Lost, Title::YouAreDead, out_events);
        Ok(())
    }

    fn win(&mut self, out_events: &mut Vec<Event>) -> Result<(), EngineError> {
        self.write(self.human, CellContent::HumanWinMarker, out_events)?;
        info!(human = %self.human, "every robot destroyed");
        self.finish(GameStatus::Won, Title::YouWin, out_events);
        Ok(())
    }

    fn finish(&mut self, status: GameStatus, title: Title, out_events: &mut Vec<Event>) {
        self.status = status;
        out_events.push(Event::Cue {
            cue: SoundCue::GameOver,
        });
        out_events.push(Event::TitleChanged { title });
        out_events.push(Event::StatusChanged { status });
    }

    fn write(
        &mut self,
        position: Position,
        content: CellContent,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        if self.grid.get(position)? == content {
            return Ok(());
        }
        self.grid.set(position, content)?;
        out_events.push(Event::CellChanged { position, content });
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match command {
        Command::NewGame => world.reset(out_events),
        Command::MoveHuman { direction } => world.step_human(direction, out_events),
        Command::TeleportHuman => world.teleport(out_events),
        Command::Reseed { seed } => {
            debug!(seed, "random stream reseeded");
            world.rng = ChaCha8Rng::seed_from_u64(seed);
            Ok(())
        }
        Command::ArrangeBoard { human, robots } => world.arrange(human, &robots, out_events),
    }
}

fn obstacle_layout(config: &BoardConfig) -> Result<Grid, EngineError> {
    let mut grid = Grid::new(config.rows, config.columns)?;
    for obstacle in &config.obstacles {
        grid.set(*obstacle, CellContent::Wall)?;
    }
    Ok(grid)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use robots_core::{BoardSnapshot, GameStatus, Position};

    /// Captures an owned copy of the board and its counters.
    #[must_use]
    pub fn snapshot(world: &World) -> BoardSnapshot {
        let (rows, columns) = world.grid.dimensions();
        BoardSnapshot {
            rows,
            columns,
            cells: world.grid.cells().to_vec(),
            human: world.human,
            robots_remaining: world.robots_remaining,
            teleport_units: world.teleport_units,
            status: world.status,
        }
    }

    /// Current game status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Cell the human currently occupies.
    #[must_use]
    pub fn human_position(world: &World) -> Position {
        world.human
    }

    /// Robots still alive.
    #[must_use]
    pub fn robots_remaining(world: &World) -> u32 {
        world.robots_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_world() -> World {
        World::new(BoardConfig::default(), 0x1234).expect("classic config is valid")
    }

    #[test]
    fn new_world_starts_playing() {
        let world = classic_world();
        let snapshot = query::snapshot(&world);

        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.human, Position::new(4, 4));
        assert_eq!(snapshot.robots_remaining, 4);
        assert_eq!(snapshot.teleport_units, 3);
        assert_eq!(snapshot.content(Position::new(2, 2)), Some(CellContent::Wall));
        assert_eq!(snapshot.count(CellContent::Robot), 4);
    }

    #[test]
    fn new_world_rejects_invalid_config() {
        let config = BoardConfig {
            rows: 0,
            ..BoardConfig::default()
        };
        assert_eq!(
            World::new(config, 1).err(),
            Some(EngineError::InvalidConfig(ConfigError::EmptyBoard))
        );
    }

    #[test]
    fn new_game_emits_reset_sequence() {
        let mut world = classic_world();
        let mut events = Vec::new();
        apply(&mut world, Command::NewGame, &mut events).expect("new game succeeds");

        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], Event::BoardReset { .. }));
        assert_eq!(events[1], Event::TeleportUnitsChanged { remaining: 3 });
        assert_eq!(
            events[2],
            Event::TitleChanged {
                title: Title::Default
            }
        );
        assert_eq!(
            events[3],
            Event::Cue {
                cue: SoundCue::Reset
            }
        );
        assert_eq!(
            events[4],
            Event::StatusChanged {
                status: GameStatus::Playing
            }
        );
    }

    #[test]
    fn write_skips_unchanged_cells() {
        let mut world = classic_world();
        let mut events = Vec::new();
        world
            .write(Position::new(2, 2), CellContent::Wall, &mut events)
            .expect("wall is on the board");
        assert!(events.is_empty());
    }

    #[test]
    fn arrange_rejects_occupied_cells() {
        let mut world = classic_world();
        let mut events = Vec::new();

        let error = apply(
            &mut world,
            Command::ArrangeBoard {
                human: Position::new(4, 4),
                robots: vec![Position::new(2, 2)],
            },
            &mut events,
        )
        .expect_err("robot on the wall must be rejected");
        assert_eq!(
            error,
            EngineError::CellOccupied {
                position: Position::new(2, 2)
            }
        );

        let error = apply(
            &mut world,
            Command::ArrangeBoard {
                human: Position::new(4, 4),
                robots: vec![Position::new(0, 0), Position::new(0, 0)],
            },
            &mut events,
        )
        .expect_err("stacked robots must be rejected");
        assert_eq!(
            error,
            EngineError::CellOccupied {
                position: Position::new(0, 0)
            }
        );
        assert!(events.is_empty(), "failed arrangements emit nothing");
    }

    #[test]
    fn arrange_rejects_positions_off_the_board() {
        let mut world = classic_world();
        let before = query::snapshot(&world);
        let error = apply(
            &mut world,
            Command::ArrangeBoard {
                human: Position::new(4, 4),
                robots: vec![Position::new(9, 9)],
            },
            &mut Vec::new(),
        )
        .expect_err("off-board robot must be rejected");

        assert!(matches!(error, EngineError::OutOfBounds { .. }));
        assert_eq!(query::snapshot(&world), before, "failed arrangements keep the old game");
    }

    #[test]
    fn arrange_requires_a_robot() {
        let mut world = classic_world();
        let error = apply(
            &mut world,
            Command::ArrangeBoard {
                human: Position::new(4, 4),
                robots: Vec::new(),
            },
            &mut Vec::new(),
        )
        .expect_err("robotless arrangement must be rejected");
        assert_eq!(error, EngineError::InvalidConfig(ConfigError::NoRobots));
    }
}
