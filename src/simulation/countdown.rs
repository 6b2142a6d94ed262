// src/simulation/countdown.rs

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::simulation::{ExamSession, GradingJob, TickOutcome};

/// Background timer driving `ExamSession::tick`. Aborted on drop.
pub struct CountdownHandle {
    task: JoinHandle<()>,
    expired: oneshot::Receiver<Vec<GradingJob>>,
}

impl CountdownHandle {
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Resolves with the grading jobs once time runs out, or `None` when the
    /// session was submitted some other way.
    pub async fn expired(&mut self) -> Option<Vec<GradingJob>> {
        (&mut self.expired).await.ok()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Ticks the session once per `period` until it stops being in progress.
pub fn spawn_countdown(session: Arc<Mutex<ExamSession>>, period: Duration) -> CountdownHandle {
    let (tx, rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let outcome = session.lock().await.tick();
            match outcome {
                TickOutcome::Running { .. } => continue,
                TickOutcome::Expired(jobs) => {
                    let _ = tx.send(jobs);
                    break;
                }
                TickOutcome::Stopped => break,
            }
        }
    });

    CountdownHandle { task, expired: rx }
}
