//! Background generation job bound to the session that started it.

use futures::channel::oneshot;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use uuid::Uuid;

use super::client::{GenerationService, Prediction, PredictionRequest, PredictionStatus};
use crate::error::{GenerationError, GenerationResult};
use crate::photo::{ImageSource, SourceImage};

/// Progress of a job, readable from the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobProgress {
    Submitting,
    Waiting { prediction_id: String, polls: u32 },
    Downloading,
    Finished,
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_polls: u32,
}

/// Handle to a running generation request.
///
/// Dropping the handle cancels the job.
pub struct GenerationJob {
    session_id: Uuid,
    cancelled: Arc<AtomicBool>,
    progress: Arc<Mutex<JobProgress>>,
    result: oneshot::Receiver<GenerationResult<SourceImage>>,
}

impl std::fmt::Debug for GenerationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationJob")
            .field("session_id", &self.session_id)
            .field("cancelled", &self.is_cancelled())
            .field("progress", &*self.progress.lock())
            .finish()
    }
}

impl GenerationJob {
    /// Run `request` against `service` on a worker thread
    pub fn spawn(
        service: Arc<dyn GenerationService>,
        request: PredictionRequest,
        session_id: Uuid,
        settings: PollSettings,
    ) -> Self {
        let (sender, result) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(Mutex::new(JobProgress::Submitting));

        let worker = Worker {
            service,
            cancelled: cancelled.clone(),
            progress: progress.clone(),
            settings,
        };
        std::thread::spawn(move || {
            let outcome = worker.run(&request);
            *worker.progress.lock() = JobProgress::Finished;
            if let Err(err) = &outcome {
                log::warn!("Generation for session {} failed: {}", session_id, err);
            }
            // The receiver is gone if the job was dropped; nothing to deliver then
            let _ = sender.send(outcome);
        });

        log::info!("Started generation job for session {}", session_id);
        Self {
            session_id,
            cancelled,
            progress,
            result,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn progress(&self) -> JobProgress {
        self.progress.lock().clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The finished result, if any, as long as it still belongs to `session_id`.
    ///
    /// A result for another session is discarded and reported as cancelled.
    pub fn try_take(&mut self, session_id: Uuid) -> Option<GenerationResult<SourceImage>> {
        let outcome = match self.result.try_recv() {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return None,
            Err(oneshot::Canceled) => Err(GenerationError::Transport("worker exited".to_owned())),
        };
        if self.is_cancelled() || session_id != self.session_id {
            log::info!("Discarding stale generation result for session {}", self.session_id);
            return Some(Err(GenerationError::Cancelled));
        }
        Some(outcome)
    }
}

impl Drop for GenerationJob {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Worker {
    service: Arc<dyn GenerationService>,
    cancelled: Arc<AtomicBool>,
    progress: Arc<Mutex<JobProgress>>,
    settings: PollSettings,
}

impl Worker {
    fn check_cancelled(&self) -> GenerationResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn run(&self, request: &PredictionRequest) -> GenerationResult<SourceImage> {
        let mut prediction = self.service.submit(request)?;
        let mut polls = 0;

        while !prediction.status.is_terminal() {
            *self.progress.lock() = JobProgress::Waiting {
                prediction_id: prediction.id.clone(),
                polls,
            };
            if polls >= self.settings.max_polls {
                return Err(GenerationError::Timeout(polls));
            }
            std::thread::sleep(self.settings.interval);
            self.check_cancelled()?;

            prediction = self.service.poll(&prediction.id)?;
            polls += 1;
        }
        self.check_cancelled()?;

        let url = finished_output(&prediction)?;
        *self.progress.lock() = JobProgress::Downloading;
        let bytes = self.service.fetch_output(&url)?;
        SourceImage::from_bytes(ImageSource::Url(url), &bytes)
            .map_err(|err| GenerationError::Malformed(err.to_string()))
    }
}

fn finished_output(prediction: &Prediction) -> GenerationResult<String> {
    match prediction.status {
        PredictionStatus::Succeeded => prediction
            .output_url()
            .map(str::to_owned)
            .ok_or_else(|| GenerationError::Malformed("succeeded without an output image".to_owned())),
        PredictionStatus::Canceled => Err(GenerationError::Cancelled),
        _ => Err(GenerationError::Failed(
            prediction.error.clone().unwrap_or_else(|| "unknown error".to_owned()),
        )),
    }
}
