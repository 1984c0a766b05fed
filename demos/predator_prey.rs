//! # Demo: predator_prey
//!
//! A headless predator-prey cellular automaton: a background worker steps the
//! simulation on a private working copy and publishes whole generations to a
//! [`Workspace`]; the frame loop snapshots populations for display and paints
//! cells from scripted pointer input while the worker runs.
//!
//! Demonstrates how to:
//! - Share a grid between a worker and a controller through
//!   publish/refresh/edit without torn updates.
//! - Fan a single simulation step out over a thread pool (rayon) while the
//!   outer loop stays pausable and cancelable at its checkpoints.
//! - Compose a [`Panel`] and run it under the [`FrameLoop`] with the
//!   [`HeadlessDriver`].
//!
//! ## Run
//! ```bash
//! cargo run --example predator_prey --features "logging controller"
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;

use threadvisor::controller::{
    FrameConfig, FrameError, FrameLoop, HeadlessDriver, InputEvent, Panel,
};
use threadvisor::{ControlToken, LogSubscriber, WorkFn, WorkRef, Worker, Workspace};

const GRID_SIZE: usize = 64;
const SIM_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Wolf,
    Rabbit,
}

#[derive(Clone)]
struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    fn seeded(size: usize) -> Self {
        // Deterministic xorshift fill, roughly 1/8 wolves and 1/4 rabbits.
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let cells = (0..size * size)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                match state % 8 {
                    0 => Cell::Wolf,
                    1 | 2 => Cell::Rabbit,
                    _ => Cell::Empty,
                }
            })
            .collect();
        Self { size, cells }
    }

    fn neighbors(&self, idx: usize) -> (u32, u32) {
        let (row, col) = (idx / self.size, idx % self.size);
        let mut wolves = 0;
        let mut rabbits = 0;
        for dr in [-1i64, 0, 1] {
            for dc in [-1i64, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (nr, nc) = (row as i64 + dr, col as i64 + dc);
                if nr < 0 || nc < 0 || nr >= self.size as i64 || nc >= self.size as i64 {
                    continue;
                }
                match self.cells[nr as usize * self.size + nc as usize] {
                    Cell::Wolf => wolves += 1,
                    Cell::Rabbit => rabbits += 1,
                    Cell::Empty => {}
                }
            }
        }
        (wolves, rabbits)
    }

    /// One generation; the per-cell rule runs in parallel over the grid.
    fn step(&mut self) {
        let grid = &*self;
        let next: Vec<Cell> = (0..grid.cells.len())
            .into_par_iter()
            .map(|idx| {
                let (wolves, rabbits) = grid.neighbors(idx);
                match grid.cells[idx] {
                    Cell::Wolf if rabbits > 0 || (2..=3).contains(&wolves) => Cell::Wolf,
                    Cell::Wolf => Cell::Empty,
                    Cell::Rabbit if wolves == 0 && (2..=4).contains(&rabbits) => Cell::Rabbit,
                    Cell::Rabbit => Cell::Empty,
                    Cell::Empty if rabbits == 3 => Cell::Rabbit,
                    Cell::Empty if wolves == 3 => Cell::Wolf,
                    Cell::Empty => Cell::Empty,
                }
            })
            .collect();
        self.cells = next;
    }

    fn census(&self) -> (usize, usize) {
        let wolves = self.cells.iter().filter(|&&c| c == Cell::Wolf).count();
        let rabbits = self.cells.iter().filter(|&&c| c == Cell::Rabbit).count();
        (wolves, rabbits)
    }
}

/// The interactive panel: owns the simulation worker and paints rabbits
/// wherever the (scripted) pointer drags.
struct SimPanel {
    ws: Arc<Workspace<Grid>>,
    worker: Worker,
    frame: u64,
}

impl SimPanel {
    fn new() -> Self {
        let ws = Arc::new(Workspace::new(Grid::seeded(GRID_SIZE)));
        let shared = Arc::clone(&ws);

        let work: WorkRef = WorkFn::arc("simulate", move |ctx: &ControlToken| {
            let mut copy = shared.checkout()?;
            loop {
                ctx.checkpoint()?;
                // Controller paint edits win: pull them before stepping.
                copy.refresh(&shared)?;
                copy.get_mut().step();
                copy.publish(&shared)?;
                thread::sleep(SIM_DELAY);
            }
        });

        let worker =
            Worker::with_work("simulate", work).with_subscribers(vec![Arc::new(LogSubscriber)]);
        Self { ws, worker, frame: 0 }
    }
}

impl Panel for SimPanel {
    fn name(&self) -> &str {
        "predator-prey"
    }

    fn on_attach(&mut self) {
        if let Err(e) = self.worker.run() {
            log::error!("could not start simulation: {e}");
        }
    }

    fn on_detach(&mut self) {
        if self.worker.is_running() {
            let _ = self.worker.cancel();
        }
        match self.worker.join() {
            Ok(outcome) => log::info!("simulation ended: {outcome:?}"),
            Err(e) => log::warn!("simulation teardown: {e}"),
        }
    }

    fn on_event(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Pointer { x, y, pressed: true } = *event {
            // Pointer coordinates are fractions of the window; paint a rabbit.
            let col = ((x.clamp(0.0, 0.999)) * GRID_SIZE as f32) as usize;
            let row = ((y.clamp(0.0, 0.999)) * GRID_SIZE as f32) as usize;
            let painted = self
                .ws
                .edit(|grid| grid.cells[row * grid.size + col] = Cell::Rabbit);
            if let Err(e) = painted {
                log::warn!("paint failed: {e}");
            }
        }
        true
    }

    fn on_update(&mut self, _dt: Duration) -> Result<bool, FrameError> {
        self.frame += 1;
        if self.frame % 10 == 0 {
            let (wolves, rabbits) = self.ws.snapshot()?.census();
            println!(
                "frame {:>3}: wolves={:<5} rabbits={:<5}",
                self.frame, wolves, rabbits
            );
        }
        Ok(true)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Scripted input: drag a rabbit brush across the upper-left quadrant.
    let script = (0..20)
        .map(|i| {
            vec![InputEvent::Pointer {
                x: 0.05 + i as f32 * 0.02,
                y: 0.25,
                pressed: true,
            }]
        })
        .collect();

    let cfg = FrameConfig {
        frame_budget: Duration::from_millis(16),
        max_frames: 60,
    };
    let mut frames = FrameLoop::new(cfg, HeadlessDriver::with_script(script))
        .with_panel(Box::new(SimPanel::new()));

    let produced = frames.run();
    println!("presented {produced} frames");
}
