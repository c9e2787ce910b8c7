//! Threshold read / write / reconcile sequence.

use crate::error::{ExecutionError, ThresholdError};
use crate::state::ThresholdState;
use crate::traits::{ElevatedWriter, ThresholdReader};
use crate::types::{
    current_notification_text, label_text, set_notification_text, DevicePaths, Threshold,
};
use battery_threshold_interfaces::{Indicator, Notifier};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Terminal state of a single write request.
#[derive(Debug)]
pub enum WriteOutcome {
    /// Requested value already matched the cached one; nothing was launched.
    Skipped(Threshold),
    /// The privileged write could not be launched or exited unsuccessfully.
    Failed(ExecutionError),
    /// The write reported success but the device does not show the value yet.
    Unverified {
        requested: Threshold,
        observed: Option<Threshold>,
    },
    Verified(Threshold),
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Skipped(_) | WriteOutcome::Verified(_))
    }
}

// Ends the in-flight record even if the write unwinds.
struct InFlight<'a>(&'a Mutex<ThresholdState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.lock().finish_write();
    }
}

pub struct ThresholdController<R, W, I, N> {
    paths: DevicePaths,
    reader: R,
    writer: W,
    indicator: I,
    notifier: N,
    state: Mutex<ThresholdState>,
}

impl<R, W, I, N> ThresholdController<R, W, I, N>
where
    R: ThresholdReader,
    W: ElevatedWriter,
    I: Indicator,
    N: Notifier,
{
    /// Builds the controller and populates the label from a fresh read.
    pub fn new(paths: DevicePaths, reader: R, writer: W, indicator: I, notifier: N) -> Self {
        if paths.is_split() {
            tracing::warn!(
                "Reading {} but writing {}",
                paths.read.display(),
                paths.write.display()
            );
        }

        let controller = Self {
            paths,
            reader,
            writer,
            indicator,
            notifier,
            state: Mutex::new(ThresholdState::new()),
        };

        let initial = controller.read_threshold().ok();
        controller.indicator.set_label(&label_text(initial.as_ref()));
        controller
    }

    pub fn paths(&self) -> &DevicePaths {
        &self.paths
    }

    pub fn state(&self) -> ThresholdState {
        self.state.lock().clone()
    }

    pub fn cached(&self) -> Option<Threshold> {
        self.state.lock().cached().cloned()
    }

    pub fn label_text(&self) -> String {
        self.indicator.label()
    }

    /// Reads the current threshold from the device and caches it.
    ///
    /// This blocks the calling thread until the reader returns. It does not
    /// touch the indicator.
    pub fn read_threshold(&self) -> Result<Threshold, ThresholdError> {
        let result = self.probe();
        let mut state = self.state.lock();
        match &result {
            Ok(threshold) => state.record_read(threshold.clone()),
            Err(e) => {
                tracing::warn!("Threshold unavailable: {}", e);
                state.record_unavailable(e.to_string());
            }
        }
        result
    }

    /// Requests a privileged write and reconciles against a fresh read.
    pub async fn write_threshold(&self, requested: Threshold) -> WriteOutcome {
        {
            let mut state = self.state.lock();
            if state.trusted() == Some(&requested) {
                tracing::debug!("Threshold already {}%, skipping write", requested);
                return WriteOutcome::Skipped(requested);
            }
            state.begin_write(requested.clone());
        }
        let _in_flight = InFlight(&self.state);

        tracing::info!(
            "Setting threshold to {}% via {}",
            requested,
            self.paths.write.display()
        );

        let outcome = match self.writer.write(&self.paths.write, requested.as_str()).await {
            Ok(()) => self.reconcile(requested).await,
            Err(e) => {
                tracing::error!("Failed to set threshold to {}%: {}", requested, e);
                WriteOutcome::Failed(e)
            }
        };

        outcome
    }

    /// Spawns [`write_threshold`](Self::write_threshold) and returns at once.
    ///
    /// Nothing serializes concurrent requests; whichever completes last
    /// decides the displayed value.
    pub fn request_write(self: &Arc<Self>, requested: Threshold) -> JoinHandle<WriteOutcome>
    where
        R: 'static,
        W: 'static,
        I: 'static,
        N: 'static,
    {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.write_threshold(requested).await })
    }

    /// Reads the threshold and reports it as a notification, leaving the
    /// label alone.
    pub async fn show_current(&self) -> Result<Threshold, ThresholdError> {
        let result = self.read_threshold();
        self.emit(&current_notification_text(result.as_ref().ok()))
            .await;
        result
    }

    async fn reconcile(&self, requested: Threshold) -> WriteOutcome {
        // Verification read is only committed when it confirms the request.
        match self.probe() {
            Ok(observed) if observed == requested => {
                self.state.lock().record_read(observed.clone());
                self.indicator.set_label(&label_text(Some(&observed)));
                self.emit(&set_notification_text(&observed)).await;
                tracing::info!("Threshold set to {}%", observed);
                WriteOutcome::Verified(observed)
            }
            Ok(observed) => {
                tracing::warn!(
                    "Requested {}% but device reports {}%",
                    requested,
                    observed
                );
                self.state.lock().mark_stale();
                WriteOutcome::Unverified {
                    requested,
                    observed: Some(observed),
                }
            }
            Err(e) => {
                tracing::warn!("Could not verify threshold {}%: {}", requested, e);
                self.state.lock().mark_stale();
                WriteOutcome::Unverified {
                    requested,
                    observed: None,
                }
            }
        }
    }

    fn probe(&self) -> Result<Threshold, ThresholdError> {
        let raw = self.reader.read(&self.paths.read)?;
        let threshold = Threshold::from_raw(&raw)
            .ok_or_else(|| ThresholdError::EmptyReading(self.paths.read.clone()))?;
        tracing::debug!("Read threshold {}% from {}", threshold, self.paths.read.display());
        Ok(threshold)
    }

    async fn emit(&self, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            tracing::warn!("Notification failed: {}", e);
        }
    }
}
