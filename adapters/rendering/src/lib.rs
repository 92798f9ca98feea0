#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Robots adapters.
//!
//! Adapters build a [`Scene`] from the board snapshot returned by a new game
//! and then feed it every engine [`Event`] in order. The scene redraws only
//! the cells that changed and hands back the cues the adapter should play.

use std::{error::Error, fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use robots_core::{BoardSnapshot, CellContent, Event, GameStatus, Position, SoundCue, Title};

/// Character used to draw a cell in text frames.
#[must_use]
pub const fn glyph(content: CellContent) -> char {
    match content {
        CellContent::Empty => '.',
        CellContent::Wall => '#',
        CellContent::Human => '@',
        CellContent::Robot | CellContent::RobotAdvancing => '+',
        CellContent::Scrap => '*',
        CellContent::HumanDead => 'X',
        CellContent::HumanWinMarker => '!',
        CellContent::RobotWinMarker => '&',
    }
}

/// Headline text shown above the board.
#[must_use]
pub const fn title_text(title: Title) -> &'static str {
    match title {
        Title::Default => "Robots",
        Title::YouAreDead => "You are dead!",
        Title::YouWin => "You win!",
    }
}

/// Short label describing a cue for adapters without audio output.
#[must_use]
pub const fn cue_label(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::Reset => "reset",
        SoundCue::Move => "move",
        SoundCue::Teleport => "teleport",
        SoundCue::GameOver => "game over",
    }
}

/// Collaborator-side copy of the board kept in sync through engine events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Number of board rows.
    pub rows: u32,
    /// Number of board columns.
    pub columns: u32,
    /// Cell contents in row-major order.
    pub cells: Vec<CellContent>,
    /// Headline shown above the board.
    pub title: Title,
    /// Teleport units shown on the teleport control.
    pub teleport_units: u32,
    /// Status used to pick which controls are live.
    pub status: GameStatus,
}

impl Scene {
    /// Creates a scene that mirrors the provided snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        Self {
            rows: snapshot.rows,
            columns: snapshot.columns,
            cells: snapshot.cells.clone(),
            title: title_for(snapshot.status),
            teleport_units: snapshot.teleport_units,
            status: snapshot.status,
        }
    }

    /// Contents of the provided cell, if it lies on the board.
    #[must_use]
    pub fn content(&self, position: Position) -> Option<CellContent> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Folds engine events into the scene, returning the cues to play.
    pub fn apply(&mut self, events: &[Event]) -> Result<Vec<SoundCue>, RenderingError> {
        let mut cues = Vec::new();
        for event in events {
            match event {
                Event::BoardReset { snapshot } => *self = Self::from_snapshot(snapshot),
                Event::CellChanged { position, content } => {
                    let slot = self
                        .index(*position)
                        .and_then(|index| self.cells.get_mut(index))
                        .ok_or(RenderingError::CellOutOfBounds {
                            position: *position,
                        })?;
                    *slot = *content;
                }
                Event::TeleportUnitsChanged { remaining } => self.teleport_units = *remaining,
                Event::TitleChanged { title } => self.title = *title,
                Event::Cue { cue } => cues.push(*cue),
                Event::StatusChanged { status } => self.status = *status,
            }
        }
        Ok(cues)
    }

    /// Draws the scene as a text frame: title line, board rows, status line.
    #[must_use]
    pub fn render(&self) -> String {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        let mut frame = String::new();
        frame.push_str(title_text(self.title));
        frame.push('\n');
        for row in self.cells.chunks(width) {
            let line: Vec<String> = row.iter().map(|cell| glyph(*cell).to_string()).collect();
            frame.push_str(&line.join(" "));
            frame.push('\n');
        }
        frame.push_str(&format!("teleports: {}", self.teleport_units));
        if self.status.is_terminal() {
            frame.push_str("  (n: new game)");
        }
        frame.push('\n');
        frame
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

fn title_for(status: GameStatus) -> Title {
    match status {
        GameStatus::Playing => Title::Default,
        GameStatus::Won => Title::YouWin,
        GameStatus::Lost => Title::YouAreDead,
    }
}

/// Output surface capable of showing scenes and playing cues.
pub trait Presenter {
    /// Shows the provided scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Plays a single cue.
    fn play(&mut self, cue: SoundCue) -> AnyResult<()>;

    /// Shows free-form text such as key help.
    fn message(&mut self, text: &str) -> AnyResult<()>;
}

/// Presenter that writes text frames and bracketed cue labels to a writer.
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: W,
    bell: bool,
}

impl<W: Write> TextPresenter<W> {
    /// Wraps the writer. When `bell` is set, game-over cues also ring the
    /// terminal bell.
    #[must_use]
    pub fn new(out: W, bell: bool) -> Self {
        Self { out, bell }
    }

    /// Consumes the presenter, returning the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.out
            .write_all(scene.render().as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")
    }

    fn play(&mut self, cue: SoundCue) -> AnyResult<()> {
        if self.bell && cue == SoundCue::GameOver {
            self.out
                .write_all(b"\x07")
                .context("failed to ring bell")?;
        }
        writeln!(self.out, "[{}]", cue_label(cue)).context("failed to write cue")
    }

    fn message(&mut self, text: &str) -> AnyResult<()> {
        writeln!(self.out, "{text}").context("failed to write message")
    }
}

/// Errors that can occur while folding events into a scene.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// An event addressed a cell outside the scene.
    CellOutOfBounds {
        /// Offending position.
        position: Position,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds { position } => {
                write!(f, "cell {position} lies outside the scene")
            }
        }
    }
}

impl Error for RenderingError {}
