//! Runs translations off the UI thread and queues their results.
//!
//! Each request runs in its own blocking task. A supervising async task
//! awaits it, turns a panic into [`TranslateError::Worker`], and pushes the
//! response onto an unbounded channel that the UI thread drains every frame.

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::translation::{TranslateError, TranslationRequest, TranslationResponse, Translator};

pub struct Dispatcher {
    runtime: Option<Runtime>,
    handle: Handle,
    translator: Arc<dyn Translator>,
    tx: UnboundedSender<TranslationResponse>,
    rx: UnboundedReceiver<TranslationResponse>,
}

impl Dispatcher {
    pub fn new(translator: Arc<dyn Translator>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("kotrans-worker")
            .enable_all()
            .build()
            .context("Failed to start translation worker runtime")?;
        let handle = runtime.handle().clone();
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime: Some(runtime),
            handle,
            translator,
            tx,
            rx,
        })
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Starts translating `request`; `notify` runs once its response is queued.
    pub fn dispatch<F>(&self, request: TranslationRequest, notify: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let translator = Arc::clone(&self.translator);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let request_id = request.id;
            let worker = tokio::task::spawn_blocking(move || {
                debug!(request = request.id, max_length = request.max_length, "worker started");
                translator.translate(&request.source_text)
            });

            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => Err(TranslateError::Worker(panic_message(
                    e.into_panic(),
                ))),
                Err(e) => Err(TranslateError::Worker(e.to_string())),
            };

            if tx
                .send(TranslationResponse {
                    request_id,
                    outcome,
                })
                .is_err()
            {
                debug!(request = request_id, "window closed before translation finished");
            }
            notify();
        });
    }

    /// Takes every response queued since the last call, without blocking.
    pub fn drain(&mut self) -> Vec<TranslationResponse> {
        let mut responses = Vec::new();
        while let Ok(response) = self.rx.try_recv() {
            responses.push(response);
        }
        responses
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Running inferences are abandoned, not awaited.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}
