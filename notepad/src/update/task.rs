//! Runs an update check off the UI thread.

use super::installer::Installer;
use super::transport::Transport;
use super::{UpdateOutcome, UpdateState, Updater};
use crate::error::UpdateError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

pub type UpdateResult = Result<UpdateOutcome, UpdateError>;

enum TaskMessage {
    State(UpdateState),
    Finished(UpdateResult),
}

/// Handle to a running check. The result is picked up with
/// [`poll`](Self::poll); dropping the handle asks the worker to stop
/// before its next step.
pub struct UpdateTask {
    rx: Receiver<TaskMessage>,
    cancel: Arc<AtomicBool>,
    state: UpdateState,
}

impl UpdateTask {
    /// Start `updater.check_for_update()` on a worker thread. `on_finish`
    /// runs on the worker after the result is sent, typically to wake the
    /// UI.
    pub fn spawn<T, I>(
        mut updater: Updater<T, I>,
        on_finish: impl FnOnce() + Send + 'static,
    ) -> std::io::Result<Self>
    where
        T: Transport + 'static,
        I: Installer + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancel = updater.cancel_flag();
        let state_tx = tx.clone();
        updater.set_observer(Box::new(move |state: &UpdateState| {
            let _ = state_tx.send(TaskMessage::State(state.clone()));
        }));
        std::thread::Builder::new()
            .name("update-check".to_string())
            .spawn(move || {
                let result = updater.check_for_update();
                match &result {
                    Ok(outcome) => log::info!("update check finished: {:?}", outcome),
                    Err(e) => log::error!("update check failed: {}", e),
                }
                // receiver may be gone if the app closed
                let _ = tx.send(TaskMessage::Finished(result));
                on_finish();
            })?;
        Ok(Self { rx, cancel, state: UpdateState::Checking })
    }

    /// Take in the worker's progress. Returns the result once it has
    /// finished.
    pub fn poll(&mut self) -> Option<UpdateResult> {
        loop {
            match self.rx.try_recv() {
                Ok(TaskMessage::State(state)) => self.state = state,
                Ok(TaskMessage::Finished(result)) => return Some(result),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(Err(UpdateError::WorkerLost)),
            }
        }
    }

    /// Last state the worker reported.
    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

impl Drop for UpdateTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::testing::{RecordingInstaller, ScriptedTransport};
    use crate::update::{UpdateConfig, RELEASES_URL};
    use std::time::Duration;

    #[test]
    fn result_arrives_after_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let updater = Updater::new(
            UpdateConfig::for_dir(dir.path().to_path_buf()),
            ScriptedTransport::new().ok(RELEASES_URL, r#"{"tag_name": "1.0.0"}"#),
            RecordingInstaller::default(),
        );
        let (done_tx, done_rx) = mpsc::channel();
        let mut task = UpdateTask::spawn(updater, move || {
            done_tx.send(()).unwrap();
        })
        .unwrap();

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(task.poll(), Some(Ok(UpdateOutcome::UpToDate))));
        assert_eq!(task.state(), &UpdateState::UpToDate);
    }

    #[test]
    fn failure_is_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let updater = Updater::new(
            UpdateConfig::for_dir(dir.path().to_path_buf()),
            ScriptedTransport::new().status(RELEASES_URL, 503),
            RecordingInstaller::default(),
        );
        let (done_tx, done_rx) = mpsc::channel();
        let mut task = UpdateTask::spawn(updater, move || {
            done_tx.send(()).unwrap();
        })
        .unwrap();

        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(task.poll(), Some(Err(UpdateError::Network(_)))));
        assert!(matches!(task.state(), UpdateState::Failed(_)));
    }
}
