//! What a worker gets back when it asks the coordinator for work.

/// Answer to a map or reduce allocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation<T> {
    /// A task was leased to the caller.
    Assigned(T),

    /// Nothing is assignable right now, but the phase is not over. Ask again
    /// later.
    Wait,

    /// Every task of the phase has been reported finished.
    PhaseComplete,
}

impl<T> Allocation<T> {
    /// Whether this answer ends the phase for the caller.
    pub fn is_complete(&self) -> bool {
        matches!(self, Allocation::PhaseComplete)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Allocation<U> {
        match self {
            Allocation::Assigned(task) => Allocation::Assigned(f(task)),
            Allocation::Wait => Allocation::Wait,
            Allocation::PhaseComplete => Allocation::PhaseComplete,
        }
    }
}

/// A leased map task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTask {
    /// Index of the task, `0..n_map`.
    pub index: u32,

    /// Input reference, read in full by the worker.
    pub input: String,

    /// Number of reduce buckets to partition into.
    pub n_reduce: u32,
}

/// A leased reduce task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceTask {
    /// Index of the bucket to reduce, `0..n_reduce`.
    pub index: u32,

    /// Number of map tasks, i.e. how many intermediate files may exist for
    /// this bucket.
    pub n_map: u32,
}
