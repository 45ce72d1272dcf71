//! Worker-thread isolation boundary
//!
//! A job runs on a freshly spawned, named OS thread and answers over a
//! oneshot channel. The caller waits under a timeout; a late answer is
//! dropped with the detached worker. Panics are caught on the worker and
//! surface as [`BoundaryError::Panicked`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// Why the boundary produced no result
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// Worker thread could not be started
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// No answer within the limit
    #[error("worker did not answer within {0:?}")]
    Timeout(Duration),

    /// Worker panicked
    #[error("worker panicked: {0}")]
    Panicked(String),

    /// Worker went away without answering
    #[error("worker dropped its reply channel")]
    Disconnected,
}

/// Run `job` on a dedicated thread and await its answer
///
/// # Errors
/// [`BoundaryError::Spawn`] when no thread could be started (the job has not
/// run), otherwise the reason no answer arrived.
pub async fn isolate<T, F>(name: &str, limit: Duration, job: F) -> Result<T, BoundaryError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (reply, answer) = oneshot::channel();

    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job));
            // The caller may have timed out already.
            let _ = reply.send(outcome);
        })
        .map_err(BoundaryError::Spawn)?;

    match tokio::time::timeout(limit, answer).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(payload))) => Err(BoundaryError::Panicked(panic_message(payload.as_ref()))),
        Ok(Err(_)) => Err(BoundaryError::Disconnected),
        Err(_) => Err(BoundaryError::Timeout(limit)),
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answer_is_returned() {
        let value = isolate("test-worker", Duration::from_secs(5), || 21 * 2)
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn worker_runs_on_named_thread() {
        let name = isolate("dialogue-probe", Duration::from_secs(5), || {
            thread::current().name().map(str::to_owned)
        })
        .await
        .unwrap();
        assert_eq!(name.as_deref(), Some("dialogue-probe"));
    }

    #[tokio::test]
    async fn slow_worker_times_out() {
        let err = isolate("test-worker", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
        })
        .await
        .unwrap_err();
        assert!(matches!(err, BoundaryError::Timeout(_)));
    }

    #[tokio::test]
    async fn panic_is_contained() {
        let err = isolate("test-worker", Duration::from_secs(5), || -> u8 {
            panic!("boom");
        })
        .await
        .unwrap_err();
        match err {
            BoundaryError::Panicked(message) => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn formatted_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new(format!("bad {}", 7));
        assert_eq!(panic_message(payload.as_ref()), "bad 7");
    }
}
