use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CoordinatorError;

/// The two global stages a job passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Map,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
        }
    }
}

/// Lifecycle of a single task.
///
/// `Idle -> InProgress -> Completed`. `InProgress` is re-entered with a fresh
/// lease when the old one expires. A task never goes back to `Idle`, and
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Never handed out.
    Idle,

    /// Leased to some worker at `leased_at`.
    InProgress { leased_at: Instant },

    /// Reported finished by some attempt.
    Completed,
}

/// A lease handed out by [`TaskTable::lease_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lease {
    pub index: u32,

    /// The task had been leased before and that lease expired.
    pub reassigned: bool,
}

/// Task states of one phase.
#[derive(Debug)]
pub struct TaskTable {
    phase: Phase,
    states: Vec<TaskState>,
}

impl TaskTable {
    pub fn new(phase: Phase, len: usize) -> Self {
        Self {
            phase,
            states: vec![TaskState::Idle; len],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: u32) -> Option<TaskState> {
        self.states.get(index as usize).copied()
    }

    /// Number of tasks in [`TaskState::Completed`].
    pub fn completed(&self) -> usize {
        self.states
            .iter()
            .filter(|state| matches!(state, TaskState::Completed))
            .count()
    }

    /// Mark task `index` completed.
    ///
    /// Returns `true` only for the report that actually flipped the task,
    /// repeated reports return `false` and change nothing.
    pub fn complete(&mut self, index: u32) -> Result<bool, CoordinatorError> {
        let count = self.states.len();
        let state = self
            .states
            .get_mut(index as usize)
            .ok_or(CoordinatorError::UnknownTask {
                phase: self.phase,
                index,
                count,
            })?;

        if matches!(state, TaskState::Completed) {
            return Ok(false);
        }

        *state = TaskState::Completed;
        Ok(true)
    }

    /// Lease the first task, in ascending index order, that was never handed
    /// out or whose lease is older than `timeout` at `now`.
    pub fn lease_next(&mut self, now: Instant, timeout: Duration) -> Option<Lease> {
        let (index, reassigned) =
            self.states
                .iter()
                .enumerate()
                .find_map(|(index, state)| match state {
                    TaskState::Idle => Some((index, false)),
                    TaskState::InProgress { leased_at }
                        if now.saturating_duration_since(*leased_at) > timeout =>
                    {
                        Some((index, true))
                    }
                    _ => None,
                })?;

        self.states[index] = TaskState::InProgress { leased_at: now };

        Some(Lease {
            index: index as u32,
            reassigned,
        })
    }
}
