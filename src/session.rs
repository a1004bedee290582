//! Game session: the phase machine, validated player movement, the elapsed
//! counter and the list of completed runs. Everything here is plain state
//! plus transitions; the browser layer only forwards events and repaints.

use rand::Rng;
use thiserror::Error;

use crate::generator::generate;
use crate::grid::{Direction, Grid};

pub const MIN_MAZE_SIZE: u32 = 5;
pub const MAX_MAZE_SIZE: u32 = 30;
/// Size of the maze built at load, before the player asks for another.
pub const DEFAULT_MAZE_SIZE: u32 = 20;

/// Rejection of an out-of-range maze size request. The display strings are
/// the user-facing warning messages.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeError {
    #[error("Minimum maze size is {}", MIN_MAZE_SIZE)]
    TooSmall,
    #[error("Maximum maze size is {}", MAX_MAZE_SIZE)]
    TooLarge,
}

/// Session lifecycle. `reset()` returns to `NotStarted` from anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    NotStarted,
    Running,
    Completed,
}

/// The player marker. Always within grid bounds; starts at the top-left
/// cell, the goal is the bottom-right cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub column: u32,
    pub row: u32,
}

/// One finished run, as shown in the history list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    pub size: u32,
    pub time: String,
}

/// What a move attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Wrong phase or closed wall; position unchanged.
    Ignored,
    Moved,
    /// The move landed on the goal cell; the run is over.
    Completed,
}

/// Singular/plural elapsed-time display string.
pub fn format_elapsed(seconds: u64) -> String {
    if seconds == 1 {
        "1 Second".to_owned()
    } else {
        format!("{seconds} Seconds")
    }
}

pub struct GameSession {
    grid: Grid,
    player: Player,
    phase: Phase,
    elapsed_seconds: u64,
    history: Vec<RunRecord>,
}

impl GameSession {
    /// A fresh session with a generated default-size maze.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            grid: generate(DEFAULT_MAZE_SIZE, DEFAULT_MAZE_SIZE, rng),
            player: Player { column: 0, row: 0 },
            phase: Phase::NotStarted,
            elapsed_seconds: 0,
            history: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn elapsed_string(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    /// Completed runs, oldest first.
    pub fn history(&self) -> &[RunRecord] {
        &self.history
    }

    /// Replace the maze with a freshly generated `size x size` one and reset
    /// the run. An out-of-range size leaves the whole session untouched.
    pub fn regenerate(&mut self, size: u32, rng: &mut impl Rng) -> Result<(), SizeError> {
        if size > MAX_MAZE_SIZE {
            return Err(SizeError::TooLarge);
        }
        if size < MIN_MAZE_SIZE {
            return Err(SizeError::TooSmall);
        }
        self.grid = generate(size, size, rng);
        self.reset();
        Ok(())
    }

    /// Begin the run. Only valid from `NotStarted`; returns whether the
    /// transition happened.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// One second of play time. Counts only while `Running`, so a tick from
    /// a stale timer can never advance a reset or finished run. Returns the
    /// new display string when the counter advanced.
    pub fn tick(&mut self) -> Option<String> {
        if self.phase != Phase::Running {
            return None;
        }
        self.elapsed_seconds += 1;
        Some(self.elapsed_string())
    }

    /// Attempt a one-cell move. Legal iff the run is `Running` and the wall
    /// of the player's cell facing `direction` is open; anything else is a
    /// silent no-op. An edge cell's outward wall is closed by construction,
    /// so an open wall always leads in bounds.
    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase != Phase::Running {
            return MoveOutcome::Ignored;
        }
        if !self.grid.is_open(self.player.column, self.player.row, direction) {
            return MoveOutcome::Ignored;
        }
        let (dx, dy) = direction.delta();
        self.player.column = (self.player.column as i32 + dx) as u32;
        self.player.row = (self.player.row as i32 + dy) as u32;

        if self.player.column == self.grid.columns() - 1 && self.player.row == self.grid.rows() - 1
        {
            self.phase = Phase::Completed;
            self.history.push(RunRecord {
                size: self.grid.columns(),
                time: self.elapsed_string(),
            });
            return MoveOutcome::Completed;
        }
        MoveOutcome::Moved
    }

    /// Back to the starting state: timer zeroed, player at the top-left,
    /// phase `NotStarted`. The maze and the history stay.
    pub fn reset(&mut self) {
        self.phase = Phase::NotStarted;
        self.elapsed_seconds = 0;
        self.player = Player { column: 0, row: 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(seed: u64) -> GameSession {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = GameSession::new(&mut rng);
        session.regenerate(5, &mut rng).unwrap();
        session
    }

    // Walk the unique path from the player to the goal, moving one cell at
    // a time. BFS parents over open walls give the route.
    fn solve(session: &mut GameSession) -> MoveOutcome {
        let grid = session.grid();
        let (columns, rows) = (grid.columns(), grid.rows());
        let idx = |c: u32, r: u32| (r * columns + c) as usize;
        let mut parent: Vec<Option<(u32, u32, Direction)>> =
            vec![None; (columns * rows) as usize];
        let mut seen = vec![false; (columns * rows) as usize];
        let start = (session.player().column, session.player().row);
        seen[idx(start.0, start.1)] = true;
        let mut queue = std::collections::VecDeque::from([start]);
        while let Some((c, r)) = queue.pop_front() {
            for dir in Direction::ALL {
                if !grid.is_open(c, r, dir) {
                    continue;
                }
                if let Some((nc, nr)) = grid.neighbor(c, r, dir) {
                    if !seen[idx(nc, nr)] {
                        seen[idx(nc, nr)] = true;
                        parent[idx(nc, nr)] = Some((c, r, dir));
                        queue.push_back((nc, nr));
                    }
                }
            }
        }
        let mut path = Vec::new();
        let mut cursor = (columns - 1, rows - 1);
        while cursor != start {
            let (pc, pr, dir) = parent[idx(cursor.0, cursor.1)].expect("goal unreachable");
            path.push(dir);
            cursor = (pc, pr);
        }
        let mut last = MoveOutcome::Ignored;
        for dir in path.into_iter().rev() {
            last = session.try_move(dir);
        }
        last
    }

    #[test]
    fn formats_seconds_with_singular_special_case() {
        assert_eq!(format_elapsed(0), "0 Seconds");
        assert_eq!(format_elapsed(1), "1 Second");
        assert_eq!(format_elapsed(2), "2 Seconds");
        assert_eq!(format_elapsed(61), "61 Seconds");
    }

    #[test]
    fn start_is_only_valid_before_the_run() {
        let mut session = session(1);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.start());
        assert_eq!(session.phase(), Phase::Running);
        assert!(!session.start());
        session.reset();
        assert!(session.start());
    }

    #[test]
    fn ticks_count_only_while_running() {
        let mut session = session(2);
        assert_eq!(session.tick(), None);
        session.start();
        assert_eq!(session.tick(), Some("1 Second".to_owned()));
        assert_eq!(session.tick(), Some("2 Seconds".to_owned()));
        session.reset();
        assert_eq!(session.tick(), None);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn moves_are_ignored_before_start() {
        let mut session = session(3);
        for dir in Direction::ALL {
            assert_eq!(session.try_move(dir), MoveOutcome::Ignored);
        }
        assert_eq!(session.player(), Player { column: 0, row: 0 });
    }

    #[test]
    fn move_succeeds_iff_wall_is_open() {
        let mut session = session(4);
        session.start();
        // (0,0) has closed Up and Left walls by construction.
        assert_eq!(session.try_move(Direction::Up), MoveOutcome::Ignored);
        assert_eq!(session.try_move(Direction::Left), MoveOutcome::Ignored);
        let open_dir = Direction::ALL
            .into_iter()
            .find(|&dir| session.grid().is_open(0, 0, dir))
            .expect("start cell walled in");
        assert_eq!(session.try_move(open_dir), MoveOutcome::Moved);
        let expected = match open_dir {
            Direction::Right => Player { column: 1, row: 0 },
            Direction::Down => Player { column: 0, row: 1 },
            _ => unreachable!(),
        };
        assert_eq!(session.player(), expected);
    }

    #[test]
    fn completion_records_exactly_one_run() {
        let mut session = session(5);
        session.start();
        session.tick();
        session.tick();
        session.tick();
        assert_eq!(solve(&mut session), MoveOutcome::Completed);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.elapsed_seconds(), 3);
        assert_eq!(
            session.history(),
            &[RunRecord {
                size: 5,
                time: "3 Seconds".to_owned(),
            }]
        );
        // Further input is dead until a reset.
        assert_eq!(session.tick(), None);
        for dir in Direction::ALL {
            assert_eq!(session.try_move(dir), MoveOutcome::Ignored);
        }
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn out_of_range_sizes_are_rejected_without_side_effects() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = GameSession::new(&mut rng);
        session.start();
        session.tick();
        let before = session.grid().clone();

        let err = session.regenerate(31, &mut rng).unwrap_err();
        assert_eq!(err, SizeError::TooLarge);
        assert_eq!(err.to_string(), "Maximum maze size is 30");

        let err = session.regenerate(4, &mut rng).unwrap_err();
        assert_eq!(err, SizeError::TooSmall);
        assert_eq!(err.to_string(), "Minimum maze size is 5");

        assert_eq!(session.grid(), &before);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn regenerate_resets_the_run() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = GameSession::new(&mut rng);
        session.start();
        session.tick();
        session.regenerate(8, &mut rng).unwrap();
        assert_eq!(session.grid().columns(), 8);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.player(), Player { column: 0, row: 0 });
    }
}
