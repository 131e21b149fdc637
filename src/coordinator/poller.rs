// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background poll timer.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::protocol::DeviceLink;
use crate::types::PollInterval;

use super::Shared;

/// Handle to a running poll task.
#[derive(Debug)]
pub(crate) struct Poller {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Spawns the poll loop on the current tokio runtime.
    pub fn spawn<L: DeviceLink + 'static>(shared: Arc<Shared<L>>) -> Self {
        let (cancel, cancel_rx) = watch::channel(false);
        let interval_rx = shared.interval.subscribe();
        let task = tokio::spawn(run(shared, interval_rx, cancel_rx));
        Self { cancel, task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the loop to stop and waits for it to exit.
    ///
    /// A poll in progress is abandoned at its next await point.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        if let Err(err) = self.task.await
            && err.is_panic()
        {
            tracing::error!(error = %err, "poll task panicked");
        }
    }

    /// Stops the loop without waiting for it.
    pub fn abort(&self) {
        self.task.abort();
    }
}

async fn run<L: DeviceLink + 'static>(
    shared: Arc<Shared<L>>,
    mut interval_rx: watch::Receiver<PollInterval>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    tracing::debug!(device = %shared.label, "poll task started");

    'schedule: loop {
        let interval = *interval_rx.borrow_and_update();
        let period = interval.as_duration();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(device = %shared.label, %interval, "poll schedule set");

        loop {
            tokio::select! {
                biased;
                _ = cancel_rx.changed() => break 'schedule,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        break 'schedule;
                    }
                    continue 'schedule;
                }
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel_rx.changed() => break 'schedule,
                () = shared.poll_tick() => {}
            }
        }
    }

    tracing::debug!(device = %shared.label, "poll task stopped");
}
