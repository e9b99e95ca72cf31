use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use dw_core::{Point, WorldGrid};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::navigation::queue::PriorityOrderedQueue;

/// Weight applied to the remaining-distance estimate.
///
/// Values above 1 make the heuristic inadmissible: paths may be slightly
/// longer than optimal, but far fewer steps are expanded.
pub const HEURISTIC_WEIGHT: f64 = 1.1;

/// Cost between two points.
pub type DistanceFn = fn(Point, Point) -> f64;

/// Points reachable in one move from a centre point.
pub type AdjacencyFn = Box<dyn Fn(Point) -> Vec<Point> + Send>;

/// Straight-line distance. The default.
pub fn euclidean(from: Point, to: Point) -> f64 {
    let (dx, dy) = axis_distances(from, to);
    dx.hypot(dy)
}

/// Sum of axis distances, for four-way movement.
pub fn manhattan(from: Point, to: Point) -> f64 {
    let (dx, dy) = axis_distances(from, to);
    dx + dy
}

/// Largest axis distance, for eight-way movement at uniform cost.
pub fn chebyshev(from: Point, to: Point) -> f64 {
    let (dx, dy) = axis_distances(from, to);
    dx.max(dy)
}

// Differences are taken in f64 so points at opposite ends of the i32 range
// do not overflow.
fn axis_distances(from: Point, to: Point) -> (f64, f64) {
    (
        (f64::from(from.x) - f64::from(to.x)).abs(),
        (f64::from(from.y) - f64::from(to.y)).abs(),
    )
}

/// Lifecycle of a [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    /// Built but not yet run.
    Created,
    /// Searching.
    Running,
    /// A path was found.
    Found,
    /// The open set emptied without reaching the target.
    Exhausted,
    /// Cancellation was observed before the search finished.
    Cancelled,
}

impl NavigatorState {
    /// Returns `true` for `Found`, `Exhausted` and `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::Exhausted | Self::Cancelled)
    }
}

/// Terminal outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A path from start to target exists.
    Found,
    /// No path exists.
    Exhausted,
    /// The search was cancelled.
    Cancelled,
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What a navigator delivers when it finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationResult {
    /// How the search ended.
    pub outcome: NavigationOutcome,
    /// Start to target inclusive. Present only when `outcome` is `Found`.
    pub path: Option<Vec<Point>>,
    /// Number of steps moved to the closed set.
    pub expanded: usize,
    /// Generation stamp of the grid snapshot searched, if any.
    pub grid_generation: Option<u64>,
}

impl NavigationResult {
    /// Returns `true` if a path was found.
    pub fn is_found(&self) -> bool {
        self.outcome == NavigationOutcome::Found
    }
}

/// A search node. Equality is by position only, so the open set treats two
/// steps at the same point as one entry.
#[derive(Debug, Clone, Copy)]
struct CostedStep {
    position: Point,
    cost_so_far: f64,
    heuristic_to_target: f64,
    /// Index of the parent in the closed arena.
    parent: Option<usize>,
}

impl CostedStep {
    fn total_score(&self) -> f64 {
        self.cost_so_far + self.heuristic_to_target
    }
}

impl PartialEq for CostedStep {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

/// A* search from one point to another over an adjacency function.
///
/// A navigator runs once. Call [`Navigator::run`] to search on the current
/// thread or [`Navigator::spawn`] to search on a worker. Either way the
/// search checks its cancel token before every expansion.
pub struct Navigator {
    start: Point,
    target: Point,
    adjacency: AdjacencyFn,
    distance: DistanceFn,
    state: NavigatorState,
    cancel: Arc<AtomicBool>,
    grid_generation: Option<u64>,
    last_result: Option<NavigationResult>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("start", &self.start)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("grid_generation", &self.grid_generation)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Search from `start` to `target` using `adjacency` for neighbours.
    pub fn new(
        start: Point,
        target: Point,
        adjacency: impl Fn(Point) -> Vec<Point> + Send + 'static,
    ) -> Self {
        Self {
            start,
            target,
            adjacency: Box::new(adjacency),
            distance: euclidean,
            state: NavigatorState::Created,
            cancel: Arc::new(AtomicBool::new(false)),
            grid_generation: None,
            last_result: None,
        }
    }

    /// Search a grid snapshot. Later changes to the world's grid do not
    /// affect this search.
    pub fn on_grid(start: Point, target: Point, grid: Arc<WorldGrid>) -> Self {
        let generation = grid.generation();
        let mut navigator = Self::new(start, target, move |p| grid.adjacent_reachable_cells(p));
        navigator.grid_generation = Some(generation);
        navigator
    }

    /// Replace the distance function used for step costs and the heuristic.
    pub fn with_distance(mut self, distance: DistanceFn) -> Self {
        self.distance = distance;
        self
    }

    /// Start point.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Target point.
    pub fn target(&self) -> Point {
        self.target
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NavigatorState {
        self.state
    }

    /// Shared flag that cancels the search when set.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Search on the current thread. A navigator that has already finished
    /// returns its recorded result without searching again.
    pub fn run(&mut self) -> NavigationResult {
        if let Some(result) = &self.last_result {
            return result.clone();
        }
        self.state = NavigatorState::Running;
        debug!(start = %self.start, target = %self.target, "navigation started");

        let mut open = PriorityOrderedQueue::new(CostedStep::total_score);
        let mut closed: Vec<CostedStep> = Vec::new();
        let mut closed_points: HashSet<Point> = HashSet::new();

        open.insert(CostedStep {
            position: self.start,
            cost_so_far: 0.0,
            heuristic_to_target: 0.0,
            parent: None,
        });

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return self.finish(NavigationOutcome::Cancelled, None, closed.len());
            }
            let Some(current) = open.pop_lowest_priority() else {
                return self.finish(NavigationOutcome::Exhausted, None, closed.len());
            };
            let current_index = closed.len();
            closed_points.insert(current.position);
            closed.push(current);

            if current.position == self.target {
                let path = reconstruct_path(&closed, current_index);
                return self.finish(NavigationOutcome::Found, Some(path), closed.len());
            }

            for candidate in (self.adjacency)(current.position) {
                if closed_points.contains(&candidate) {
                    continue;
                }
                let step = CostedStep {
                    position: candidate,
                    cost_so_far: current.cost_so_far + (self.distance)(current.position, candidate),
                    heuristic_to_target: HEURISTIC_WEIGHT * (self.distance)(candidate, self.target),
                    parent: Some(current_index),
                };
                match open.index_of_item(&step) {
                    Some(index) => {
                        let improves = open
                            .item_at_index(index)
                            .is_some_and(|existing| step.cost_so_far < existing.cost_so_far);
                        if improves {
                            open.remove_item_at_index(index);
                            open.insert(step);
                        }
                    }
                    None => open.insert(step),
                }
            }
        }
    }

    /// Run the search on a dedicated worker thread.
    pub fn spawn(mut self) -> SimResult<NavigationTask> {
        let (sender, receiver) = mpsc::channel();
        let cancel = self.cancel_token();
        let handle = thread::Builder::new()
            .name("navigator".into())
            .spawn(move || {
                let result = self.run();
                if sender.send(result).is_err() {
                    debug!("navigation result dropped: task handle gone");
                }
            })
            .map_err(|e| SimError::Worker(e.to_string()))?;
        Ok(NavigationTask {
            receiver,
            cancel,
            handle: Some(handle),
        })
    }

    fn finish(
        &mut self,
        outcome: NavigationOutcome,
        path: Option<Vec<Point>>,
        expanded: usize,
    ) -> NavigationResult {
        self.state = match outcome {
            NavigationOutcome::Found => NavigatorState::Found,
            NavigationOutcome::Exhausted => NavigatorState::Exhausted,
            NavigationOutcome::Cancelled => NavigatorState::Cancelled,
        };
        debug!(
            %outcome,
            expanded,
            path_len = path.as_ref().map_or(0, Vec::len),
            "navigation finished"
        );
        let result = NavigationResult {
            outcome,
            path,
            expanded,
            grid_generation: self.grid_generation,
        };
        self.last_result = Some(result.clone());
        result
    }
}

fn reconstruct_path(closed: &[CostedStep], last: usize) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = Some(last);
    while let Some(index) = cursor {
        let step = &closed[index];
        path.push(step.position);
        cursor = step.parent;
    }
    path.reverse();
    path
}

/// Handle to a navigator running on a worker thread.
///
/// Exactly one [`NavigationResult`] is delivered. Dropping the handle
/// cancels nothing; call [`NavigationTask::cancel`] to stop the search.
#[derive(Debug)]
pub struct NavigationTask {
    receiver: Receiver<NavigationResult>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl NavigationTask {
    /// Request cancellation of the running search.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Shared flag that cancels the search when set.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The result, if the search has finished and it was not taken yet.
    pub fn try_result(&mut self) -> Option<NavigationResult> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the search finishes.
    ///
    /// If the worker died without reporting, the result is `Cancelled`.
    pub fn wait(mut self) -> NavigationResult {
        let result = self.receiver.recv().unwrap_or(NavigationResult {
            outcome: NavigationOutcome::Cancelled,
            path: None,
            expanded: 0,
            grid_generation: None,
        });
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("navigation worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dw_core::GenerationConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::AtomicUsize;

    fn open_grid(size: usize) -> Arc<WorldGrid> {
        Arc::new(WorldGrid::new(GenerationConfig::new(size), &mut StdRng::seed_from_u64(3)).unwrap())
    }

    fn assert_connected(path: &[Point]) {
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn finds_path_on_open_grid() {
        let grid = open_grid(10);
        let generation = grid.generation();
        let mut navigator = Navigator::on_grid(Point::new(1, 1), Point::new(8, 7), grid);
        let result = navigator.run();

        assert_eq!(result.outcome, NavigationOutcome::Found);
        assert_eq!(navigator.state(), NavigatorState::Found);
        assert_eq!(result.grid_generation, Some(generation));
        let path = result.path.unwrap();
        assert_eq!(path.first(), Some(&Point::new(1, 1)));
        assert_eq!(path.last(), Some(&Point::new(8, 7)));
        assert_connected(&path);
    }

    #[test]
    fn start_equals_target() {
        let mut navigator = Navigator::on_grid(Point::new(2, 2), Point::new(2, 2), open_grid(5));
        let result = navigator.run();
        assert_eq!(result.outcome, NavigationOutcome::Found);
        assert_eq!(result.path, Some(vec![Point::new(2, 2)]));
        assert_eq!(result.expanded, 1);
    }

    #[test]
    fn enclosed_target_is_exhausted() {
        let grid = WorldGrid::from_ascii(&[
            "          ",
            "          ",
            "          ",
            "     ###  ",
            "     # #  ",
            "     ###  ",
            "          ",
            "          ",
            "          ",
            "          ",
        ])
        .unwrap();
        let mut navigator = Navigator::on_grid(Point::new(1, 1), Point::new(6, 4), Arc::new(grid));
        let result = navigator.run();
        assert_eq!(result.outcome, NavigationOutcome::Exhausted);
        assert_eq!(result.path, None);
        // Every open cell outside the ring was expanded.
        assert_eq!(result.expanded, 100 - 9);
    }

    #[test]
    fn path_routes_around_walls() {
        let grid = WorldGrid::from_ascii(&[
            "      ",
            "  #   ",
            "  #   ",
            "  #   ",
            "  #   ",
            "      ",
        ])
        .unwrap();
        let result = Navigator::on_grid(Point::new(0, 3), Point::new(5, 3), Arc::new(grid.clone())).run();
        let path = result.path.unwrap();
        assert_connected(&path);
        assert!(path.iter().all(|p| !grid.is_wall(*p)));
    }

    #[test]
    fn no_corner_cutting() {
        // Target is diagonal to start but both orthogonals are wall, so the
        // path has to go the long way round.
        let grid = WorldGrid::from_ascii(&["    ", " #  ", "#   ", "    "]).unwrap();
        let mut navigator = Navigator::on_grid(Point::new(0, 1), Point::new(1, 2), Arc::new(grid));
        let path = navigator.run().path.unwrap();
        assert_connected(&path);
        assert!(path.len() > 2);
    }

    #[test]
    fn cancelled_before_run_delivers_no_path() {
        let navigator = Navigator::on_grid(Point::new(1, 1), Point::new(8, 8), open_grid(10));
        navigator.cancel();
        let result = navigator.spawn().unwrap().wait();
        assert_eq!(result.outcome, NavigationOutcome::Cancelled);
        assert_eq!(result.path, None);
        assert_eq!(result.expanded, 0);
    }

    #[test]
    fn cancelled_mid_search() {
        let grid = open_grid(30);
        let calls = Arc::new(AtomicUsize::new(0));
        let token = Arc::new(AtomicBool::new(false));
        let (seen, flag) = (Arc::clone(&calls), Arc::clone(&token));
        let mut navigator = Navigator::new(Point::new(1, 1), Point::new(28, 28), move |p| {
            if seen.fetch_add(1, Ordering::SeqCst) == 4 {
                flag.store(true, Ordering::SeqCst);
            }
            grid.adjacent_reachable_cells(p)
        });
        navigator.cancel = token;
        let result = navigator.run();
        assert_eq!(result.outcome, NavigationOutcome::Cancelled);
        assert_eq!(result.path, None);
        assert_eq!(result.expanded, 5);
        assert_eq!(navigator.state(), NavigatorState::Cancelled);
    }

    #[test]
    fn rerun_returns_recorded_outcome() {
        let mut navigator = Navigator::on_grid(Point::new(0, 0), Point::new(4, 4), open_grid(5));
        let first = navigator.run();
        assert!(first.is_found());
        navigator.cancel();
        let second = navigator.run();
        assert_eq!(second, first);
        assert_eq!(navigator.state(), NavigatorState::Found);
    }

    #[test]
    fn spawned_task_delivers_once() {
        let navigator = Navigator::on_grid(Point::new(0, 0), Point::new(4, 4), open_grid(5));
        let mut task = navigator.spawn().unwrap();
        let result = loop {
            if let Some(result) = task.try_result() {
                break result;
            }
            thread::yield_now();
        };
        assert!(result.is_found());
        assert_eq!(task.try_result(), None);
    }

    #[test]
    fn snapshot_ignores_later_grid_changes() {
        let mut world = dw_core::World::new(WorldGrid::from_ascii(&["   ", "   ", "   "]).unwrap());
        let navigator = Navigator::on_grid(Point::new(0, 0), Point::new(2, 2), world.grid_snapshot());
        world.grid_mut().set_terrain(Point::new(1, 1), dw_core::TerrainType::Wall);
        world.grid_mut().set_terrain(Point::new(1, 0), dw_core::TerrainType::Wall);
        world.grid_mut().set_terrain(Point::new(0, 1), dw_core::TerrainType::Wall);
        let result = navigator.spawn().unwrap().wait();
        assert_eq!(result.path.map(|p| p.len()), Some(3));
    }

    #[test]
    fn distance_functions() {
        let (a, b) = (Point::new(0, 0), Point::new(3, 4));
        assert!((euclidean(a, b) - 5.0).abs() < f64::EPSILON);
        assert!((manhattan(a, b) - 7.0).abs() < f64::EPSILON);
        assert!((chebyshev(a, b) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distances_span_the_coordinate_range() {
        let (a, b) = (Point::new(i32::MIN, i32::MAX), Point::new(i32::MAX, i32::MIN));
        let span = f64::from(i32::MAX) - f64::from(i32::MIN);
        assert!((manhattan(a, b) - 2.0 * span).abs() < 1.0);
        assert!((chebyshev(a, b) - span).abs() < 1.0);
        assert!((euclidean(a, b) - span * std::f64::consts::SQRT_2).abs() < 1.0);
    }

    #[test]
    fn start_at_coordinate_limit_is_exhausted() {
        let start = Point::new(i32::MAX, 0);
        let result = Navigator::on_grid(start, Point::new(1, 1), open_grid(3)).run();
        assert_eq!(result.outcome, NavigationOutcome::Exhausted);
        assert_eq!(result.expanded, 1);
    }

    #[test]
    fn manhattan_distance_still_finds_path() {
        let result = Navigator::on_grid(Point::new(0, 0), Point::new(5, 2), open_grid(6))
            .with_distance(manhattan)
            .run();
        assert!(result.is_found());
        assert_connected(&result.path.unwrap());
    }
}
