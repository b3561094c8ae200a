//! Worker module for executing benchmark requests
//!
//! A Worker is one slot of the bounded pool that serves a single backend run.
//! Its loop is deliberately small: **claim -> execute -> report -> repeat**.
//!
//! 1. Claims the next prompt index from a shared atomic cursor
//! 2. Sends one chat completion through the shared `InferenceClient`
//! 3. Turns the response (or error, or timeout) into a `RequestOutcome`
//! 4. Sends the outcome to the driver via channel
//! 5. Stops once the cursor runs past the last prompt
//!
//! Every claimed prompt yields exactly one outcome. There are no retries.
//!
//! # Example
//!
//! ```ignore
//! use serve_bench_core::worker::Worker;
//!
//! let worker = Worker::new(0, client, base_url, prompts, cursor, tx, params, timeout);
//! let stats = worker.run().await;
//! println!("Completed: {}", stats.completed);
//! ```

mod executor;
mod stats;

pub use executor::Worker;
pub use stats::WorkerStats;
