// runner.rs - Autorun scheduler: a single cancellable tokio task stepping the grid

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::boundary::Boundary;
use crate::error::InvalidOperation;
use crate::grid::{Generation, Grid};

pub const MIN_INTERVAL: Duration = Duration::from_millis(10);
pub const MAX_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// One "faster" or "slower" press changes the interval by this factor.
pub const SPEED_FACTOR: f64 = 1.6666;

pub type SharedGrid = Arc<Mutex<Grid>>;

/// Called once per completed generation, from whichever thread stepped.
pub type Observer = Arc<dyn Fn(&Generation) + Send + Sync>;

pub fn shared(grid: Grid) -> SharedGrid {
    Arc::new(Mutex::new(grid))
}

/// Locks the grid. A panic in another holder does not leave the grid
/// half-written (every mutation completes before returning), so poison is
/// ignored.
pub fn lock(grid: &SharedGrid) -> MutexGuard<'_, Grid> {
    grid.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tick interval shared with the running loop, in microseconds.
#[derive(Debug, Clone)]
struct Interval(Arc<AtomicU64>);

impl Interval {
    fn new(interval: Duration) -> Self {
        Interval(Arc::new(AtomicU64::new(to_micros(clamp(interval)))))
    }

    fn get(&self) -> Duration {
        Duration::from_micros(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, interval: Duration) -> Duration {
        let interval = clamp(interval);
        self.0.store(to_micros(interval), Ordering::Relaxed);
        interval
    }
}

fn clamp(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

fn to_micros(interval: Duration) -> u64 {
    u64::try_from(interval.as_micros()).unwrap_or(u64::MAX)
}

/// Idle/Running state machine around the tick loop.
///
/// The presence of `cancel` is the Running state: it is created by
/// [`Runner::start`] and consumed by [`Runner::stop`], so at most one loop
/// is ever owned.
pub struct Runner {
    grid     : SharedGrid,
    handle   : Handle,        // runtime the tick loop is spawned on
    interval : Interval,
    observer : Observer,
    cancel   : Option<oneshot::Sender<()>>,
}

impl Runner {
    pub fn new(grid: SharedGrid, handle: Handle) -> Self {
        Self {
            grid,
            handle,
            interval: Interval::new(DEFAULT_INTERVAL),
            observer: Arc::new(|_: &Generation| {}),
            cancel: None,
        }
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        self.interval.set(interval);
        self
    }

    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Generation) + Send + Sync + 'static,
    {
        self.observer = Arc::new(observer);
        self
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Read-only access for rendering. Allowed in any state.
    pub fn read<T>(&self, f: impl FnOnce(&Grid) -> T) -> T {
        f(&lock(&self.grid))
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval.get()
    }

    /// Spawns the tick loop. No-op when a loop is already owned.
    pub fn start(&mut self) -> Result<(), InvalidOperation> {
        if self.cancel.is_some() {
            debug!("start ignored, already running");
            return Err(InvalidOperation::AlreadyRunning);
        }

        let (tx, rx) = oneshot::channel();
        self.handle.spawn(tick_loop(
            self.grid.clone(),
            self.interval.clone(),
            self.observer.clone(),
            rx,
        ));
        self.cancel = Some(tx);

        debug!(interval_ms = self.interval().as_millis() as u64, "autorun started");
        Ok(())
    }

    /// Signals the tick loop to stop and returns without waiting for it.
    /// No tick begins after this returns. No-op when idle.
    pub fn stop(&mut self) -> Result<(), InvalidOperation> {
        let Some(cancel) = self.cancel.take() else {
            debug!("stop ignored, not running");
            return Err(InvalidOperation::NotRunning);
        };

        // The loop may already be gone if the runtime shut down.
        let _ = cancel.send(());
        debug!("autorun stopped");
        Ok(())
    }

    /// One manual generation. Only while idle.
    pub fn step(&mut self) -> Result<Generation, InvalidOperation> {
        if self.is_running() {
            return Err(InvalidOperation::Running);
        }
        let generation = lock(&self.grid).step();
        trace!(step = generation.step, alive = generation.alive, "manual step");
        (self.observer)(&generation);
        Ok(generation)
    }

    /// Runs an editing closure on the grid. Only while idle.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut Grid) -> T) -> Result<T, InvalidOperation> {
        if self.is_running() {
            return Err(InvalidOperation::Running);
        }
        Ok(f(&mut lock(&self.grid)))
    }

    /// Boundary changes are allowed in any state; the next lookup sees them.
    pub fn set_boundary(&self, boundary: Boundary) {
        lock(&self.grid).set_boundary(boundary);
        debug!(%boundary, "boundary changed");
    }

    /// Sets the interval, clamped to [`MIN_INTERVAL`]..=[`MAX_INTERVAL`].
    /// Applies from the next wait on.
    pub fn set_interval(&self, interval: Duration) -> Duration {
        let interval = self.interval.set(interval);
        debug!(interval_ms = interval.as_millis() as u64, "interval changed");
        interval
    }

    /// Multiplies the interval by `factor`.
    pub fn scale(&self, factor: f64) -> Result<Duration, InvalidOperation> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(InvalidOperation::SpeedFactor(factor));
        }
        let secs = self.interval().as_secs_f64() * factor;
        let scaled = Duration::try_from_secs_f64(secs).unwrap_or(MAX_INTERVAL);
        Ok(self.set_interval(scaled))
    }

    pub fn faster(&self) -> Duration {
        self.set_interval(self.interval().div_f64(SPEED_FACTOR))
    }

    pub fn slower(&self) -> Duration {
        let secs = self.interval().as_secs_f64() * SPEED_FACTOR;
        self.set_interval(Duration::try_from_secs_f64(secs).unwrap_or(MAX_INTERVAL))
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

/// True once `stop` has sent, or the runner went away.
fn cancelled(cancel: &mut oneshot::Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(oneshot::error::TryRecvError::Empty))
}

async fn tick_loop(
    grid: SharedGrid,
    interval: Interval,
    observer: Observer,
    mut cancel: oneshot::Receiver<()>,
) {
    loop {
        let generation = {
            let mut grid = lock(&grid);
            // Checked under the lock so a stop that returned before we got
            // here can never be followed by another step.
            if cancelled(&mut cancel) {
                break;
            }
            grid.step()
        };

        trace!(step = generation.step, alive = generation.alive, "tick");
        observer(&generation);

        let wait = interval.get();
        tokio::select! {
            biased;
            _ = &mut cancel => break,
            _ = tokio::time::sleep(wait) => {}
        }
    }
    debug!("tick loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridConfig;

    fn runner() -> Runner {
        let grid = Grid::from_config(GridConfig { seed: Some(8), ..GridConfig::default() }).unwrap();
        Runner::new(shared(grid), Handle::current())
    }

    #[tokio::test]
    async fn interval_is_clamped() {
        let runner = runner();
        assert_eq!(runner.interval(), DEFAULT_INTERVAL);
        assert_eq!(runner.set_interval(Duration::from_millis(1)), MIN_INTERVAL);
        assert_eq!(runner.set_interval(Duration::from_secs(60)), MAX_INTERVAL);

        let runner = runner.with_interval(Duration::ZERO);
        assert_eq!(runner.interval(), MIN_INTERVAL);
    }

    #[tokio::test]
    async fn faster_bottoms_out_at_floor() {
        let runner = runner();
        assert_eq!(runner.faster().as_millis(), 120);
        for _ in 0..20 {
            runner.faster();
        }
        assert_eq!(runner.interval(), MIN_INTERVAL);

        let slower = runner.slower().as_micros();
        assert!((16_660..=16_670).contains(&slower), "{slower}");
        for _ in 0..100 {
            runner.slower();
        }
        assert_eq!(runner.interval(), MAX_INTERVAL);
    }

    #[tokio::test]
    async fn scale_rejects_nonsense() {
        let runner = runner();
        for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(runner.scale(factor), Err(InvalidOperation::SpeedFactor(_))));
        }
        assert_eq!(runner.interval(), DEFAULT_INTERVAL);
        assert_eq!(runner.scale(0.5), Ok(Duration::from_millis(100)));
        assert_eq!(runner.scale(1e300), Ok(MAX_INTERVAL));
    }

    #[tokio::test]
    async fn manual_step_notifies_and_counts() {
        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let mut runner = runner().with_observer(move |g| counter.store(g.step, Ordering::SeqCst));

        let generation = runner.step().unwrap();
        assert_eq!(generation.step, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(runner.read(|g| g.steps()), 1);
    }

    #[tokio::test]
    async fn edit_and_step_refused_while_running() {
        let mut runner = runner();
        runner.start().unwrap();
        assert_eq!(runner.edit(|g| g.fill(1.0)), Err(InvalidOperation::Running));
        assert_eq!(runner.step(), Err(InvalidOperation::Running));

        runner.stop().unwrap();
        let before = runner.read(|g| g.alive());
        let flipped = runner.edit(|g| g.fill(1.0)).unwrap();
        assert_eq!(runner.read(|g| g.alive()), before + flipped);
        assert_eq!(runner.read(|g| g.alive()), 100);
    }

    #[tokio::test]
    async fn boundary_can_change_while_running() {
        let mut runner = runner();
        runner.start().unwrap();
        runner.set_boundary(Boundary::Full);
        assert_eq!(runner.read(|g| g.boundary()), Boundary::Full);
        runner.stop().unwrap();
    }
}
