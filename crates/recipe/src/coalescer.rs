use std::{future::Future, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::AbortHandle,
};

enum Signal<T> {
    Push(T),
    Shutdown(oneshot::Sender<()>),
}

/// Collects items and hands them to a flush callback once no new item arrived for
/// `window`.
///
/// Dropping the coalescer cancels the background task and discards pending items; call
/// [`Coalescer::shutdown`] to flush them first.
pub struct Coalescer<T> {
    signals: mpsc::UnboundedSender<Signal<T>>,
    task: AbortHandle,
}

impl<T: Send + 'static> Coalescer<T> {
    pub fn new<F, Fut>(window: Duration, flush: F) -> Self
    where
        F: Fn(Vec<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (signals, mut receiver) = mpsc::unbounded_channel::<Signal<T>>();

        let task = tokio::spawn(async move {
            let mut pending = Vec::new();

            loop {
                let signal = if pending.is_empty() {
                    receiver.recv().await
                } else {
                    match tokio::time::timeout(window, receiver.recv()).await {
                        Ok(signal) => signal,
                        Err(_) => {
                            flush(std::mem::take(&mut pending)).await;
                            continue;
                        }
                    }
                };

                match signal {
                    Some(Signal::Push(item)) => pending.push(item),
                    Some(Signal::Shutdown(done)) => {
                        // Closing first makes later pushes fail, then take what got in.
                        receiver.close();
                        let mut waiting = vec![done];
                        while let Ok(signal) = receiver.try_recv() {
                            match signal {
                                Signal::Push(item) => pending.push(item),
                                Signal::Shutdown(done) => waiting.push(done),
                            }
                        }

                        if !pending.is_empty() {
                            flush(std::mem::take(&mut pending)).await;
                        }
                        for done in waiting {
                            let _ = done.send(());
                        }
                        break;
                    }
                    None => break,
                }
            }
        });

        Self {
            signals,
            task: task.abort_handle(),
        }
    }

    /// Queues `item`. Returns `false` once the coalescer has shut down.
    pub fn push(&self, item: T) -> bool {
        self.signals.send(Signal::Push(item)).is_ok()
    }

    /// Flushes pending items and stops the background task.
    pub async fn shutdown(&self) {
        let (done, wait) = oneshot::channel();
        if self.signals.send(Signal::Shutdown(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

impl<T> Drop for Coalescer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
