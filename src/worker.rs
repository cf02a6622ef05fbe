//! Background fetch execution
//!
//! Each request runs on its own thread so typing never waits on the network.
//! Every dispatched request produces exactly one [`FetchSettled`], even when
//! the provider panics.

use crate::controller::{FetchRequest, FetchSettled};
use crate::error::FetchFailure;
use crate::provider::SearchProvider;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct FetchWorker {
    provider: Arc<dyn SearchProvider>,
    sender: Sender<FetchSettled>,
    receiver: Receiver<FetchSettled>,
}

impl FetchWorker {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            provider,
            sender,
            receiver,
        }
    }

    /// Run `request` in the background
    pub fn dispatch(&self, request: FetchRequest) {
        let provider = Arc::clone(&self.provider);
        let tx = self.sender.clone();

        thread::spawn(move || {
            let FetchRequest { token, query } = request;
            let outcome = catch_unwind(AssertUnwindSafe(|| provider.search(&query)))
                .unwrap_or_else(|panic| Err(FetchFailure::Provider(panic_message(panic.as_ref()))));
            let _ = tx.send(FetchSettled {
                token,
                query,
                outcome,
            });
        });
    }

    /// Everything settled so far, without blocking
    pub fn drain(&self) -> Vec<FetchSettled> {
        self.receiver.try_iter().collect()
    }

    /// Wait up to `timeout` for the next settlement
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchSettled> {
        match self.receiver.recv_timeout(timeout) {
            Ok(settled) => Some(settled),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "provider panicked".to_string()
    }
}
