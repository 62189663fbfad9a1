//! kli-flow - Task-graph runtime.
//!
//! The orchestrator consumes this crate through a narrow interface: fill
//! a [`Graph`] with dependency-free work nodes, hand it to the
//! [`Scheduler`], block until every node has run, then process the
//! notifications serially. A work node is a closure executed on a worker
//! thread; its return value is the notification handed back to the
//! submitting thread, in submission order, once the whole graph has
//! finished. Work nodes must not assume any ordering among themselves.

use rayon::prelude::*;
use thiserror::Error;

/// Error raised while bringing up the runtime.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The worker pool could not be built.
    #[error("cannot build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A work node: runs on a worker, returns its notification value.
pub type WorkNode<N> = Box<dyn FnOnce() -> N + Send>;

/// An ordered set of dependency-free work nodes.
///
/// The graph is a builder: the orchestrator emplaces one node per
/// pending task, dispatches the whole batch, and reuses the emptied
/// graph for the next wave.
pub struct Graph<N> {
    nodes: Vec<WorkNode<N>>,
}

impl<N> Graph<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds a work node to the batch.
    pub fn emplace(&mut self, work: impl FnOnce() -> N + Send + 'static) {
        self.nodes.push(Box::new(work));
    }

    /// True when no work is pending.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of pending work nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drops all pending work.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker pool executing graphs.
pub struct Scheduler {
    pool: rayon::ThreadPool,
}

impl Scheduler {
    /// Builds a scheduler; `workers` of `None` sizes the pool to the
    /// machine.
    pub fn new(workers: Option<usize>) -> Result<Self, FlowError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|index| format!("kli-worker-{index}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Runs every node of the graph on the pool and blocks until all
    /// have finished.
    ///
    /// Nodes execute in any order and in parallel; the returned
    /// notifications are in submission order, ready for the caller's
    /// serial notification-processing phase. The graph is left empty.
    pub fn dispatch<N: Send>(&self, graph: &mut Graph<N>) -> Vec<N> {
        let nodes = std::mem::take(&mut graph.nodes);
        self.pool
            .install(|| nodes.into_par_iter().map(|work| work()).collect())
    }
}
