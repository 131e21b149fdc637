// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resilient polling and control of a single purifier.
//!
//! A [`Coordinator`] exclusively owns one [`DeviceLink`]. Every link
//! operation (scheduled poll, manual refresh, power or mode command) runs
//! under the same async lock, so at most one is ever in flight.
//!
//! Failures are handled on two levels:
//!
//! 1. Within a cycle, an operation is attempted up to
//!    [`RetryPolicy::max_attempts`] times. A failed read drops the
//!    connection so the next attempt reconnects.
//! 2. Across cycles, an exhausted poll is masked by the last known good
//!    state until [`RetryPolicy::failure_threshold`] consecutive cycles
//!    have failed. Only then is the device reported unavailable.
//!
//! # Examples
//!
//! ```
//! use purifier_link::{Coordinator, DeviceConfig};
//! use purifier_link::protocol::SimulatedLink;
//! use purifier_link::types::Mode;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> purifier_link::Result<()> {
//! let coordinator = Coordinator::new(SimulatedLink::new(true, Mode::Silent), DeviceConfig::new());
//!
//! let state = coordinator.refresh().await?;
//! assert!(state.power());
//! assert_eq!(state.mode(), Some(Mode::Silent));
//!
//! coordinator.set_mode(Mode::Strong).await?;
//! assert_eq!(coordinator.state().and_then(|s| s.mode()), Some(Mode::Strong));
//!
//! coordinator.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod operation;
mod poller;
mod retry;
mod session;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use crate::error::{CommandError, Error, LinkError, PollError};
use crate::protocol::{AttributeId, DeviceLink, codec};
use crate::state::{Availability, DeviceState};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{Mode, ModePayload, PollInterval, PowerState};

use operation::{LinkOperation, ReadState, WriteAttribute};
use poller::Poller;
use session::{ReadRecorded, Session};

pub use config::{DEFAULT_LABEL, DeviceConfig};
pub use retry::{FAILURE_THRESHOLD, MAX_RETRIES, RETRY_DELAY, RetryPolicy};
pub use session::SessionDiagnostics;

/// State shared between a coordinator and its poll task.
pub(crate) struct Shared<L> {
    label: String,
    policy: RetryPolicy,
    /// `None` once shut down.
    link: tokio::sync::Mutex<Option<L>>,
    session: RwLock<Session>,
    callbacks: CallbackRegistry,
    interval: watch::Sender<PollInterval>,
    closed: AtomicBool,
}

/// Coordinator for one purifier.
///
/// See the [module documentation](self) for the retry model.
pub struct Coordinator<L: DeviceLink> {
    shared: Arc<Shared<L>>,
    poller: Mutex<Option<Poller>>,
}

impl<L: DeviceLink + 'static> Coordinator<L> {
    /// Creates a coordinator owning `link`.
    ///
    /// No I/O happens until the first refresh or command.
    #[must_use]
    pub fn new(link: L, config: DeviceConfig) -> Self {
        let (interval, _) = watch::channel(config.poll_interval);
        let shared = Shared {
            label: config.label().to_string(),
            policy: config.retry,
            link: tokio::sync::Mutex::new(Some(link)),
            session: RwLock::new(Session::default()),
            callbacks: CallbackRegistry::new(),
            interval,
            closed: AtomicBool::new(false),
        };
        Self {
            shared: Arc::new(shared),
            poller: Mutex::new(None),
        }
    }

    /// Returns the label used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.shared.policy
    }

    /// Returns the best known state, which may be stale.
    ///
    /// Never touches the link.
    #[must_use]
    pub fn state(&self) -> Option<DeviceState> {
        self.shared.session.read().last_good_state()
    }

    /// Returns the current availability.
    #[must_use]
    pub fn availability(&self) -> Availability {
        self.shared.session.read().availability()
    }

    /// Returns a snapshot of the session counters.
    #[must_use]
    pub fn diagnostics(&self) -> SessionDiagnostics {
        let interval = *self.shared.interval.borrow();
        self.shared.session.read().diagnostics(interval)
    }

    /// Returns the current poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> PollInterval {
        *self.shared.interval.borrow()
    }

    /// Changes the poll interval.
    ///
    /// A running poller picks up the new interval immediately; the next
    /// poll happens one full interval from now.
    pub fn set_poll_interval(&self, interval: PollInterval) {
        let previous = self.shared.interval.send_replace(interval);
        if previous != interval {
            tracing::info!(device = %self.shared.label, %previous, %interval, "poll interval changed");
        }
    }

    /// Runs one poll cycle.
    ///
    /// Waits for any operation already in flight.
    ///
    /// # Errors
    ///
    /// Returns `PollError::NoDataYet` if the cycle failed and no state was
    /// ever read, `PollError::Unavailable` once the failure threshold is
    /// reached, and `PollError::ShutDown` after [`shutdown`](Self::shutdown).
    pub async fn refresh(&self) -> Result<DeviceState, PollError> {
        self.shared.refresh().await
    }

    /// Runs the initial poll of a newly set up device.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotReady` if the poll failed.
    pub async fn first_refresh(&self) -> Result<DeviceState, Error> {
        self.shared.refresh().await.map_err(|err| {
            tracing::warn!(device = %self.shared.label, error = %err, "initial refresh failed");
            Error::NotReady(err)
        })
    }

    /// Turns the purifier on or off, then refreshes the state.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::LinkExhausted` if every write attempt failed.
    pub async fn set_power(&self, on: bool) -> Result<(), CommandError> {
        let payload = codec::encode_power(PowerState::from(on));
        self.shared.command(AttributeId::Power, payload.to_vec()).await
    }

    /// Sets the operating mode, then refreshes the state.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::LinkExhausted` if every write attempt failed.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), CommandError> {
        let payload = codec::encode_mode(ModePayload::from(mode));
        self.shared.command(AttributeId::Mode, payload.to_vec()).await
    }

    /// Sets the operating mode by its display name.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidArgument` without touching the link if
    /// `name` is not one of `Auto`, `Silent`, `Standard` or `Strong`.
    pub async fn set_mode_by_name(&self, name: &str) -> Result<(), CommandError> {
        let mode: Mode = name.parse()?;
        self.set_mode(mode).await
    }

    /// Starts polling in the background.
    ///
    /// Does nothing if the poller is already running or the coordinator
    /// has been shut down.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_poller(&self) {
        // Checked under the lock `shutdown` takes the poller with.
        let mut poller = self.poller.lock();
        if self.shared.closed.load(Ordering::Acquire)
            || poller.as_ref().is_some_and(Poller::is_running)
        {
            return;
        }
        *poller = Some(Poller::spawn(Arc::clone(&self.shared)));
        tracing::info!(device = %self.shared.label, interval = %self.poll_interval(), "polling started");
    }

    /// Returns `true` while the background poller is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.lock().as_ref().is_some_and(Poller::is_running)
    }

    /// Stops polling and disconnects the link.
    ///
    /// Waits for any operation in flight. Calling this more than once is
    /// harmless.
    pub async fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);

        let poller = self.poller.lock().take();
        if let Some(poller) = poller {
            poller.stop().await;
        }

        let link = self.shared.link.lock().await.take();
        if let Some(mut link) = link {
            if link.is_connected() {
                link.disconnect().await;
                tracing::debug!(device = %self.shared.label, "link disconnected");
            }
            tracing::info!(device = %self.shared.label, "coordinator shut down");
        }
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

impl<L: DeviceLink> Drop for Coordinator<L> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.get_mut().take() {
            poller.abort();
        }
    }
}

impl<L: DeviceLink> fmt::Debug for Coordinator<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("label", &self.shared.label)
            .field("session", &*self.shared.session.read())
            .field("policy", &self.shared.policy)
            .finish_non_exhaustive()
    }
}

impl<L: DeviceLink + 'static> Subscribable for Coordinator<L> {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_power_changed(callback)
    }

    fn on_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ModePayload) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_mode_changed(callback)
    }

    fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Availability) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_availability_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

impl<L: DeviceLink> Shared<L> {
    async fn refresh(&self) -> Result<DeviceState, PollError> {
        let mut guard = self.link.lock().await;
        let link = guard.as_mut().ok_or(PollError::ShutDown)?;
        self.poll_cycle(link).await
    }

    /// Timer entry point. Skipped while another operation holds the link.
    async fn poll_tick(&self) {
        let Ok(mut guard) = self.link.try_lock() else {
            tracing::debug!(device = %self.label, "operation in progress, skipping poll");
            return;
        };
        let Some(link) = guard.as_mut() else {
            return;
        };
        // Outcome is already logged and published.
        let _ = self.poll_cycle(link).await;
    }

    async fn poll_cycle(&self, link: &mut L) -> Result<DeviceState, PollError> {
        match self.run_with_retry(link, &ReadState).await {
            Ok(state) => {
                let recorded = self.session.write().record_read(state);
                tracing::debug!(
                    device = %self.label,
                    power = state.power(),
                    mode = state.mode_name(),
                    "poll succeeded"
                );
                self.publish_read(&state, &recorded);
                Ok(state)
            }
            Err(err) => {
                let recorded = self.session.write().record_failed_cycle(&err, &self.policy);
                if let Some(availability) = recorded.availability_changed {
                    self.publish_availability(availability);
                }
                match recorded.result {
                    Ok(cached) => {
                        tracing::debug!(
                            device = %self.label,
                            consecutive_failures = self.session.read().consecutive_failures(),
                            error = %err,
                            "poll failed, serving cached state"
                        );
                        self.callbacks.dispatch_state(&cached);
                        Ok(cached)
                    }
                    Err(poll_err) => {
                        tracing::warn!(device = %self.label, error = %poll_err, "poll failed");
                        Err(poll_err)
                    }
                }
            }
        }
    }

    async fn command(&self, attribute: AttributeId, payload: Vec<u8>) -> Result<(), CommandError> {
        let mut guard = self.link.lock().await;
        let link = guard.as_mut().ok_or(CommandError::ShutDown)?;

        let operation = WriteAttribute { attribute, payload };
        if let Err(source) = self.run_with_retry(link, &operation).await {
            tracing::warn!(device = %self.label, %attribute, error = %source, "command failed");
            return Err(CommandError::LinkExhausted {
                attempts: self.policy.max_attempts(),
                source,
            });
        }
        self.session.write().record_write();
        tracing::debug!(device = %self.label, %attribute, "command written");

        if let Err(err) = self.poll_cycle(link).await {
            tracing::warn!(device = %self.label, error = %err, "refresh after command failed");
        }
        Ok(())
    }

    async fn run_with_retry<O>(&self, link: &mut L, operation: &O) -> Result<O::Output, LinkError>
    where
        O: LinkOperation<L>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;
        loop {
            match self.attempt_once(link, operation).await {
                Ok(output) => return Ok(output),
                Err(err) => {
                    tracing::warn!(
                        device = %self.label,
                        operation = operation.name(),
                        attempt,
                        max_attempts,
                        error = %err,
                        "link operation failed"
                    );
                    self.session.write().record_error(&err);
                    if !self.policy.should_retry(attempt) {
                        return Err(err);
                    }
                    tokio::time::sleep(self.policy.retry_delay()).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt_once<O>(&self, link: &mut L, operation: &O) -> Result<O::Output, LinkError>
    where
        O: LinkOperation<L>,
    {
        if !link.is_connected() {
            link.connect().await?;
            tracing::debug!(device = %self.label, "link connected");
        }
        match operation.perform(link).await {
            Ok(output) => Ok(output),
            Err(err) => {
                link.disconnect().await;
                Err(err)
            }
        }
    }

    fn publish_read(&self, state: &DeviceState, recorded: &ReadRecorded) {
        if let Some(availability) = recorded.availability_changed {
            self.publish_availability(availability);
        }
        for change in state.changes_since(recorded.previous.as_ref()) {
            self.callbacks.dispatch_change(&change);
        }
        self.callbacks.dispatch_state(state);
    }

    fn publish_availability(&self, availability: Availability) {
        tracing::info!(device = %self.label, %availability, "availability changed");
        self.callbacks.dispatch_availability(availability);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::protocol::{LinkCall, SimulatedLink};

    fn coordinator(link: &SimulatedLink) -> Coordinator<SimulatedLink> {
        Coordinator::new(link.clone(), DeviceConfig::new().with_friendly_name("test"))
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_reads_power_then_mode() {
        let link = SimulatedLink::new(true, Mode::Strong);
        let coordinator = coordinator(&link);

        let state = coordinator.refresh().await.unwrap();
        assert!(state.power());
        assert_eq!(state.mode(), Some(Mode::Strong));
        assert_eq!(
            link.calls(),
            vec![
                LinkCall::Connect,
                LinkCall::Read(AttributeId::Power),
                LinkCall::Read(AttributeId::Mode),
            ]
        );
        assert_eq!(coordinator.availability(), Availability::Available);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_failure_does_not_disconnect() {
        let link = SimulatedLink::new(false, Mode::Auto);
        link.fail_next(LinkCall::Connect, 1);
        let coordinator = coordinator(&link);

        coordinator.refresh().await.unwrap();
        assert_eq!(link.count(LinkCall::Connect), 2);
        assert_eq!(link.count(LinkCall::Disconnect), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn read_failure_disconnects_before_retry() {
        let link = SimulatedLink::new(false, Mode::Auto);
        link.fail_next(LinkCall::Read(AttributeId::Mode), 1);
        let coordinator = coordinator(&link);

        coordinator.refresh().await.unwrap();
        assert_eq!(
            link.calls(),
            vec![
                LinkCall::Connect,
                LinkCall::Read(AttributeId::Power),
                LinkCall::Read(AttributeId::Mode),
                LinkCall::Disconnect,
                LinkCall::Connect,
                LinkCall::Read(AttributeId::Power),
                LinkCall::Read(AttributeId::Mode),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_delay_is_not_taken_after_last_attempt() {
        let link = SimulatedLink::new(false, Mode::Auto);
        link.fail_always(LinkCall::Connect);
        let coordinator = coordinator(&link);

        let started = tokio::time::Instant::now();
        let err = coordinator.refresh().await.unwrap_err();
        assert_eq!(err, PollError::NoDataYet);
        assert_eq!(started.elapsed(), RETRY_DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_policy_is_honoured() {
        let link = SimulatedLink::new(false, Mode::Auto);
        link.fail_always(LinkCall::Connect);
        let policy = RetryPolicy::new()
            .with_max_attempts(2)
            .with_retry_delay(Duration::from_millis(100))
            .with_failure_threshold(1);
        let coordinator = Coordinator::new(link.clone(), DeviceConfig::new().with_retry_policy(policy));

        let err = coordinator.refresh().await.unwrap_err();
        assert_eq!(err, PollError::Unavailable { consecutive_failures: 1 });
        assert_eq!(link.count(LinkCall::Connect), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_notifies_state_and_changes() {
        let link = SimulatedLink::new(true, Mode::Auto);
        let coordinator = coordinator(&link);

        let states = Arc::new(AtomicUsize::new(0));
        let powers = Arc::new(AtomicUsize::new(0));
        let modes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&states);
        coordinator.on_state_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&powers);
        coordinator.on_power_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&modes);
        coordinator.on_mode_changed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();
        link.set_mode_raw(ModePayload::from(Mode::Silent).as_bytes().to_vec());
        coordinator.refresh().await.unwrap();

        assert_eq!(states.load(Ordering::SeqCst), 3);
        assert_eq!(powers.load(Ordering::SeqCst), 1);
        assert_eq!(modes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_mode_name_is_rejected_without_io() {
        let link = SimulatedLink::new(true, Mode::Auto);
        let coordinator = coordinator(&link);

        let err = coordinator.set_mode_by_name("turbo").await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
        assert!(link.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn operations_after_shutdown_fail() {
        let link = SimulatedLink::new(true, Mode::Auto);
        let coordinator = coordinator(&link);
        coordinator.shutdown().await;

        assert!(coordinator.is_shut_down());
        assert_eq!(coordinator.refresh().await, Err(PollError::ShutDown));
        assert_eq!(coordinator.set_power(false).await, Err(CommandError::ShutDown));
        coordinator.spawn_poller();
        assert!(!coordinator.is_polling());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spawn_racing_shutdown_leaves_no_poller() {
        for _ in 0..200 {
            let link = SimulatedLink::new(true, Mode::Auto);
            let coordinator = Arc::new(coordinator(&link));

            let spawner = {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.spawn_poller() })
            };
            coordinator.shutdown().await;
            spawner.await.unwrap();

            assert!(!coordinator.is_polling());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn diagnostics_track_session() {
        let link = SimulatedLink::new(true, Mode::Auto);
        let coordinator = coordinator(&link);
        coordinator.refresh().await.unwrap();

        link.fail_always(LinkCall::Connect);
        link.drop_connection();
        coordinator.refresh().await.unwrap();

        let diagnostics = coordinator.diagnostics();
        assert_eq!(diagnostics.consecutive_failures, 1);
        assert_eq!(diagnostics.availability, Availability::Available);
        assert!(diagnostics.last_good_state.is_some());
        assert_eq!(
            diagnostics.last_error.as_deref(),
            Some("connection failed: peer not reachable")
        );
        assert_eq!(diagnostics.poll_interval, PollInterval::DEFAULT);
    }
}
