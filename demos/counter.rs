//! # Demo: counter
//!
//! Minimal tour of one controllable worker: bind, run, pause, resume,
//! re-prioritize, cancel, join.
//!
//! Demonstrates how to:
//! - Define a unit of work using [`WorkFn`] with a checkpointing loop.
//! - Attach the built-in [`LogSubscriber`] to watch lifecycle events.
//! - Drive the worker from a controlling thread and read its flags.
//!
//! ## Run
//! ```bash
//! cargo run --example counter
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use threadvisor::{ControlToken, LogSubscriber, Priority, WorkFn, WorkRef, Worker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Shared result state, captured by the work closure.
    let counter = Arc::new(AtomicU64::new(0));
    let ticks = Arc::clone(&counter);

    // 2. A work body that counts until canceled, checkpointing every step.
    let work: WorkRef = WorkFn::arc("ticker", move |ctx: &ControlToken| loop {
        ctx.checkpoint()?;
        ticks.fetch_add(1, Ordering::Relaxed);
        thread::sleep(Duration::from_millis(10));
    });

    // 3. One job slot with logging attached.
    let mut worker =
        Worker::with_work("ticker", work).with_subscribers(vec![Arc::new(LogSubscriber)]);

    worker.run()?;
    thread::sleep(Duration::from_millis(100));
    println!(" ─► running: count={}", counter.load(Ordering::Relaxed));

    // 4. Pause: the count holds still while the gate is raised.
    worker.pause()?;
    thread::sleep(Duration::from_millis(100));
    let frozen = counter.load(Ordering::Relaxed);
    thread::sleep(Duration::from_millis(100));
    println!(
        " ─► paused: count={} (still {})",
        frozen,
        counter.load(Ordering::Relaxed)
    );

    // 5. Resume at a lower priority (lowering never needs privileges).
    worker.resume()?;
    worker.set_priority(Priority::Low)?;
    thread::sleep(Duration::from_millis(100));
    println!(" ─► resumed: count={}", counter.load(Ordering::Relaxed));

    // 6. Cancel and reap.
    worker.cancel()?;
    let outcome = worker.join()?;
    println!(
        " ─► done: outcome={:?} final count={}",
        outcome,
        counter.load(Ordering::Relaxed)
    );
    Ok(())
}
