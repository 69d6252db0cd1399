//! Terminal outcome delivery with cancellation.
//!
//! The channel form of an evaluation runs on a spawned task and hands
//! the caller a receiver for the single terminal outcome plus a
//! cancellation handle. Cancelling drops the evaluation future, which
//! closes any open store cursor, and suppresses the outcome: a
//! cancelled call never delivers `Data`/`NoData`/`Error` afterwards.

use std::future::Future;

use tokio::sync::oneshot;

/// Receiver for the single terminal outcome of one call.
pub struct OutcomeReceiver<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> OutcomeReceiver<T> {
    /// Waits for the terminal outcome.
    ///
    /// Returns `None` if the call was cancelled before completion.
    pub async fn recv(self) -> Option<T> {
        self.rx.await.ok()
    }
}

/// Handle for cancelling an in-flight call.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] lets
/// the call run to completion.
pub struct CancelHandle {
    cancel: Option<oneshot::Sender<()>>,
}

impl CancelHandle {
    /// Cancels the in-flight call.
    pub fn cancel(mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }
}

/// Runs `task` on the runtime and delivers its outcome, unless
/// cancelled first.
pub fn deliver<T, F>(task: F) -> (OutcomeReceiver<T>, CancelHandle)
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let (out_tx, out_rx) = oneshot::channel();
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        tokio::pin!(task);
        tokio::select! {
            // Checked first: a cancellation issued before the outcome is
            // polled always wins.
            biased;
            cancelled = cancel_rx => {
                if cancelled.is_ok() {
                    // Cancelled: drop the evaluation, emit nothing.
                    return;
                }
                // Handle dropped without cancelling; run to completion.
                let outcome = task.await;
                let _ = out_tx.send(outcome);
            }
            outcome = &mut task => {
                let _ = out_tx.send(outcome);
            }
        }
    });

    (
        OutcomeReceiver { rx: out_rx },
        CancelHandle { cancel: Some(cancel_tx) },
    )
}
