// app.rs - Interactive state: cursor, edit mode, key dispatch into the runner

use std::sync::mpsc::Receiver;

use conway::{Boundary, Generation, InvalidOperation, PATTERNS, Runner};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Share of cells touched by one fill or clear press.
pub const EDIT_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlay,
    ToggleEdit,
    Step,
    Faster,
    Slower,
    // Edit mode only
    Move(Direction),
    ToggleCell,
    Fill,
    Clear,
    SetBoundary(Boundary),
    NextPattern,
    StampPattern,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('p')                => Action::TogglePlay,
            KeyCode::Char('e')                => Action::ToggleEdit,
            KeyCode::Char('s')                => Action::Step,
            KeyCode::Char('+')                => Action::Faster,
            KeyCode::Char('-')                => Action::Slower,
            KeyCode::Up                       => Action::Move(Direction::Up),
            KeyCode::Down                     => Action::Move(Direction::Down),
            KeyCode::Left                     => Action::Move(Direction::Left),
            KeyCode::Right                    => Action::Move(Direction::Right),
            KeyCode::Char(' ')                => Action::ToggleCell,
            KeyCode::Char('f')                => Action::Fill,
            KeyCode::Char('c')                => Action::Clear,
            KeyCode::Char('0')                => Action::SetBoundary(Boundary::Periodic),
            KeyCode::Char('1')                => Action::SetBoundary(Boundary::Empty),
            KeyCode::Char('2')                => Action::SetBoundary(Boundary::Full),
            KeyCode::Char('n')                => Action::NextPattern,
            KeyCode::Char('g')                => Action::StampPattern,
            _ => return None,
        };
        Some(action)
    }

    fn needs_edit_mode(self) -> bool {
        matches!(
            self,
            Action::Move(_)
                | Action::ToggleCell
                | Action::Fill
                | Action::Clear
                | Action::SetBoundary(_)
                | Action::NextPattern
                | Action::StampPattern
        )
    }
}

pub const HOTKEYS: &[&str] = &[
    "General",
    "p - play/pause",
    "e - edit mode on/off",
    "s - one step",
    "q - quit",
    "Playing",
    "+/- - in-/decrease speed",
    "Edit mode",
    "c - clear field by 10 %",
    "f - fill field by 10 %",
    "cursor keys - move cursor",
    "space - toggle cell",
    "0 - periodic boundary",
    "1 - empty boundary",
    "2 - filled boundary",
    "n - next pattern",
    "g - stamp pattern",
];

pub struct App {
    runner          : Runner,
    generations     : Receiver<Generation>,  // fed by the runner's observer
    pub cursor      : (usize, usize),
    pub edit_mode   : bool,
    pub pattern     : usize,
    pub status      : String,                // last action, shown in the debug panel
    pub last        : Option<Generation>,
    quit            : bool,
}

impl App {
    pub fn new(runner: Runner, generations: Receiver<Generation>) -> Self {
        Self {
            runner,
            generations,
            cursor: (0, 0),
            edit_mode: false,
            pattern: 0,
            status: String::new(),
            last: None,
            quit: false,
        }
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn pattern_name(&self) -> &'static str {
        PATTERNS[self.pattern].name
    }

    /// Pulls every generation reported since the last call; true if any.
    pub fn drain_generations(&mut self) -> bool {
        let mut any = false;
        while let Ok(generation) = self.generations.try_recv() {
            self.last = Some(generation);
            any = true;
        }
        any
    }

    pub fn apply(&mut self, action: Action) {
        debug!(?action, "key action");

        if action.needs_edit_mode() && !self.edit_mode {
            self.status = "edit mode is off (press e)".into();
            return;
        }

        self.status = match action {
            Action::Quit => {
                let _ = self.runner.stop();
                self.quit = true;
                "quit".into()
            }
            Action::TogglePlay => {
                if self.runner.is_running() {
                    report(self.runner.stop(), "pause")
                } else {
                    self.edit_mode = false;
                    report(self.runner.start(), "play")
                }
            }
            Action::ToggleEdit => {
                if self.edit_mode {
                    self.edit_mode = false;
                    "edit mode off".into()
                } else {
                    let _ = self.runner.stop();
                    self.edit_mode = true;
                    "edit mode on".into()
                }
            }
            Action::Step => match self.runner.step() {
                Ok(g) => format!("step {}: +{} -{}", g.step, g.births, g.deaths),
                Err(e) => e.to_string(),
            },
            Action::Faster => format!("{} ms", self.runner.faster().as_millis()),
            Action::Slower => format!("{} ms", self.runner.slower().as_millis()),
            Action::Move(direction) => {
                self.move_cursor(direction);
                format!("cursor {}, {}", self.cursor.0, self.cursor.1)
            }
            Action::ToggleCell => {
                let (row, col) = self.cursor;
                match self.runner.edit(|g| g.toggle(row, col)).and_then(|r| r) {
                    Ok(true) => "toggle: alive".into(),
                    Ok(false) => "toggle: dead".into(),
                    Err(e) => e.to_string(),
                }
            }
            Action::Fill => match self.runner.edit(|g| g.fill(EDIT_FRACTION)) {
                Ok(n) => format!("fill: {n} born"),
                Err(e) => e.to_string(),
            },
            Action::Clear => match self.runner.edit(|g| g.clear(EDIT_FRACTION)) {
                Ok(n) => format!("clear: {n} killed"),
                Err(e) => e.to_string(),
            },
            Action::SetBoundary(boundary) => {
                self.runner.set_boundary(boundary);
                format!("{boundary} boundary")
            }
            Action::NextPattern => {
                self.pattern = (self.pattern + 1) % PATTERNS.len();
                format!("pattern: {}", self.pattern_name())
            }
            Action::StampPattern => {
                let (row, col) = self.cursor;
                let pattern = &PATTERNS[self.pattern];
                match self.runner.edit(|g| pattern.stamp(g, row, col)) {
                    Ok(n) => format!("{}: {n} cells", pattern.name),
                    Err(e) => e.to_string(),
                }
            }
        };
    }

    /// Moves the cursor one cell, wrapping at the edges.
    fn move_cursor(&mut self, direction: Direction) {
        let (rows, cols) = self.runner.read(|g| g.dimensions());
        let (row, col) = self.cursor;
        self.cursor = match direction {
            Direction::Up    => ((row + rows - 1) % rows, col),
            Direction::Down  => ((row + 1) % rows, col),
            Direction::Left  => (row, (col + cols - 1) % cols),
            Direction::Right => (row, (col + 1) % cols),
        };
    }
}

fn report(result: Result<(), InvalidOperation>, ok: &str) -> String {
    match result {
        Ok(()) => ok.to_string(),
        Err(e) => e.to_string(),
    }
}
