// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel write coalescing.
//!
//! Dragging a slider in the host UI produces a burst of set requests. A
//! [`Coalescer`] collapses such a burst into one device write while still
//! answering every request.
//!
//! # Contract
//!
//! - Each [`submit`](Coalescer::submit) joins the open window, replaces the
//!   arguments that will be written (last write wins) and pushes the
//!   window's deadline to `now + window` (trailing-edge debounce).
//! - When the deadline passes, the latest arguments are executed exactly
//!   once and the outcome is delivered to every caller of that window in
//!   submission order.
//! - Failures are not retried.
//! - A write already in flight is never cancelled; submissions arriving
//!   meanwhile open the next window.
//!
//! # Execution model
//!
//! No task is spawned. Every waiting caller sleeps until the shared
//! deadline, and whichever wakes first after it executes the batch. A
//! caller that is dropped therefore never strands the others.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};

use crate::error::{CommunicationError, Error};

type Outcome = Result<bool, Error>;

#[derive(Debug)]
struct Window<A> {
    args: Option<A>,
    deadline: Instant,
    waiters: Vec<oneshot::Sender<Outcome>>,
}

/// Debounced write queue for one channel.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tuyalight_lib::coalesce::Coalescer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let channel = Coalescer::new("brightness", Duration::from_millis(100));
/// let write = |level: i64| async move { Ok(level > 0) };
///
/// let (a, b) = tokio::join!(channel.submit(10, write), channel.submit(0, write));
/// // Only the last level was written; both callers see its outcome.
/// assert_eq!(a, Ok(false));
/// assert_eq!(b, Ok(false));
/// # }
/// ```
#[derive(Debug)]
pub struct Coalescer<A> {
    channel: &'static str,
    window: Duration,
    pending: Mutex<Window<A>>,
}

impl<A> Coalescer<A> {
    /// Creates a coalescer with the given debounce window.
    #[must_use]
    pub fn new(channel: &'static str, window: Duration) -> Self {
        Self {
            channel,
            window,
            pending: Mutex::new(Window {
                args: None,
                deadline: Instant::now(),
                waiters: Vec::new(),
            }),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn channel(&self) -> &'static str {
        self.channel
    }

    /// Returns the debounce window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the number of callers waiting on the open window.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.lock().waiters.len()
    }

    /// Joins the current window with `args` and resolves with the outcome
    /// of the coalesced write.
    ///
    /// `run` performs the write. It is only called by whichever caller ends
    /// up executing a batch, with that batch's latest arguments.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the coalesced write, or
    /// `CommunicationError::Abandoned` if the caller executing it was
    /// dropped before it finished.
    pub async fn submit<F, Fut>(&self, args: A, run: F) -> Outcome
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let (tx, mut rx) = oneshot::channel();
        let mut deadline = {
            let mut pending = self.pending.lock();
            pending.args = Some(args);
            pending.deadline = Instant::now() + self.window;
            pending.waiters.push(tx);
            tracing::trace!(
                channel = self.channel,
                waiters = pending.waiters.len(),
                "Joined write window"
            );
            pending.deadline
        };

        loop {
            tokio::select! {
                biased;
                outcome = &mut rx => {
                    return outcome.unwrap_or(Err(CommunicationError::Abandoned.into()));
                }
                () = sleep_until(deadline) => {
                    match self.take_due() {
                        Due::Batch(args, waiters) => {
                            tracing::debug!(
                                channel = self.channel,
                                callers = waiters.len(),
                                "Executing coalesced write"
                            );
                            let outcome = run(args).await;
                            for waiter in waiters {
                                let _ = waiter.send(outcome.clone());
                            }
                        }
                        Due::Later(next) => deadline = next,
                        Due::InFlight => {
                            return rx.await.unwrap_or(Err(CommunicationError::Abandoned.into()));
                        }
                    }
                }
            }
        }
    }

    fn take_due(&self) -> Due<A> {
        let mut pending = self.pending.lock();
        if pending.deadline > Instant::now() {
            return Due::Later(pending.deadline);
        }
        match pending.args.take() {
            Some(args) => Due::Batch(args, std::mem::take(&mut pending.waiters)),
            None => Due::InFlight,
        }
    }
}

enum Due<A> {
    Batch(A, Vec<oneshot::Sender<Outcome>>),
    Later(Instant),
    InFlight,
}
