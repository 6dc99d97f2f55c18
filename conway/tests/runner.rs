// runner.rs - Autorun timing, driven by tokio's paused test clock

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use conway::runner::{self, lock, shared};
use conway::{Boundary, Grid, GridConfig, InvalidOperation, Runner};
use tokio::runtime::Handle;

fn counted_runner(interval: Duration) -> (Runner, Arc<AtomicUsize>) {
    let grid = Grid::from_config(GridConfig {
        rows: 16,
        cols: 16,
        boundary: Boundary::Periodic,
        fill_probability: 0.4,
        seed: Some(42),
        ..GridConfig::default()
    })
    .unwrap();

    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let runner = Runner::new(shared(grid), Handle::current())
        .with_interval(interval)
        .with_observer(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    (runner, ticks)
}

async fn let_tasks_run() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_interval() {
    let (mut runner, ticks) = counted_runner(Duration::from_millis(100));
    runner.start().unwrap();

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    let seen = ticks.load(Ordering::SeqCst);
    assert!((10..=11).contains(&seen), "saw {seen} ticks");
    assert_eq!(runner.read(|g| g.steps()) as usize, seen);

    runner.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn double_start_keeps_one_loop() {
    let (mut runner, ticks) = counted_runner(Duration::from_millis(100));
    assert_eq!(runner.start(), Ok(()));
    assert_eq!(runner.start(), Err(InvalidOperation::AlreadyRunning));
    assert!(runner.is_running());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    let seen = ticks.load(Ordering::SeqCst);
    assert!((10..=11).contains(&seen), "duplicated loop? saw {seen} ticks");

    runner.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_ticking() {
    let (mut runner, ticks) = counted_runner(Duration::from_millis(50));
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(runner.stop(), Ok(()));
    assert!(!runner.is_running());
    let steps = runner.read(|g| g.steps());
    let seen = ticks.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(runner.read(|g| g.steps()), steps);
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
}

#[tokio::test(start_paused = true)]
async fn redundant_transitions_leave_steps_alone() {
    let (mut runner, ticks) = counted_runner(Duration::from_millis(100));

    assert_eq!(runner.stop(), Err(InvalidOperation::NotRunning));
    assert_eq!(runner.read(|g| g.steps()), 0);

    runner.start().unwrap();
    let_tasks_run().await;
    let steps = runner.read(|g| g.steps());
    assert_eq!(steps, 1);

    assert_eq!(runner.start(), Err(InvalidOperation::AlreadyRunning));
    let_tasks_run().await;
    assert_eq!(runner.read(|g| g.steps()), steps);
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    runner.stop().unwrap();
    assert_eq!(runner.stop(), Err(InvalidOperation::NotRunning));
}

#[tokio::test(start_paused = true)]
async fn stop_interrupts_a_long_wait() {
    let (mut runner, _ticks) = counted_runner(runner::MAX_INTERVAL);
    runner.start().unwrap();
    let_tasks_run().await;
    assert_eq!(runner.read(|g| g.steps()), 1);
    // The loop holds its own handle on the grid while alive.
    assert_eq!(Arc::strong_count(runner.grid()), 2);

    runner.stop().unwrap();
    // No timer is advanced here; only the cancel signal can end the wait.
    let_tasks_run().await;
    assert_eq!(Arc::strong_count(runner.grid()), 1);
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_to_next_wait() {
    let (mut runner, ticks) = counted_runner(Duration::from_millis(400));
    runner.start().unwrap();
    let_tasks_run().await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    // The wait already in progress keeps its 400ms.
    runner.set_interval(Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    runner.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn alive_count_holds_under_autorun() {
    let (mut runner, _ticks) = counted_runner(runner::MIN_INTERVAL);
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    runner.stop().unwrap();

    let grid = lock(runner.grid());
    assert!(grid.steps() >= 40);
    assert_eq!(grid.alive(), grid.cells().iter().filter(|&&c| c).count());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_runner_ends_the_loop() {
    let (mut runner, _ticks) = counted_runner(Duration::from_millis(100));
    runner.start().unwrap();
    let_tasks_run().await;

    let grid = runner.grid().clone();
    drop(runner);
    let_tasks_run().await;
    assert_eq!(Arc::strong_count(&grid), 1);
}
