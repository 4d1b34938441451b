use crossbeam_channel::{Receiver, unbounded};
use std::thread::JoinHandle;

use super::{CancellationToken, Job, Outcome};
use crate::error::{Error, Result};

/// A notification from the background job.
///
/// Progress events arrive in emission order; `Terminal` is always the last
/// event for a job and nothing follows it.
#[derive(Debug)]
pub enum JobEvent {
    Progress { label: String, done: u64, total: u64 },
    Terminal(Outcome),
}

struct ActiveJob {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Single point of truth for "is a job running".
///
/// The controller lives on the interactive thread and is the only place a
/// job can be started or cancelled. The background thread never touches the
/// active-job slot; it only emits events and observes the token. The slot
/// stays occupied until [`finish`](JobController::finish) is called after
/// the terminal event has been observed, so a second `start` is rejected
/// even if the worker thread has already exited.
#[derive(Default)]
pub struct JobController {
    active: Option<ActiveJob>,
}

impl JobController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `job` on a background thread and return its event stream.
    ///
    /// Returns [`Error::AlreadyRunning`] while the active slot is occupied.
    /// The sender side never blocks, so a slow consumer cannot stall the
    /// job.
    pub fn start(&mut self, job: Job) -> Result<Receiver<JobEvent>> {
        if self.active.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let (sender, receiver) = unbounded();
        let token = CancellationToken::new();
        let job_token = token.clone();

        let handle = std::thread::Builder::new()
            .name("seedkit-job".into())
            .spawn(move || {
                let outcome = job.run(&job_token, &mut |label, done, total| {
                    let _ = sender.send(JobEvent::Progress {
                        label: label.to_string(),
                        done,
                        total,
                    });
                });
                let _ = sender.send(JobEvent::Terminal(outcome));
            })?;

        self.active = Some(ActiveJob { token, handle });
        Ok(receiver)
    }

    /// Request cancellation of the active job; no-op when idle.
    ///
    /// Does not block: the job unwinds at its next poll point and the
    /// result arrives through the terminal event.
    pub fn cancel(&self) {
        if let Some(active) = &self.active {
            active.token.cancel();
        }
    }

    /// Clone of the active job's token, e.g. for a signal handler.
    pub fn cancellation_token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|a| a.token.clone())
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Release the job. Call after observing the terminal event.
    pub fn finish(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.handle.join();
        }
    }
}
