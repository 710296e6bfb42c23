#![allow(dead_code)]

use async_trait::async_trait;
use dnstester_application::ports::QueryTransport;
use dnstester_domain::{Rcode, RecordType, Target, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers every query with NOERROR after a fixed delay.
#[derive(Clone)]
pub struct DelayedTransport {
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl DelayedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryTransport for DelayedTransport {
    async fn execute(
        &self,
        _target: &Target,
        _domain: &str,
        _qtype: RecordType,
        _tls_insecure: bool,
        timeout: Duration,
    ) -> Result<Rcode, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay >= timeout {
            tokio::time::sleep(timeout).await;
            return Err(TransportError::Timeout(timeout));
        }
        tokio::time::sleep(self.delay).await;
        Ok(Rcode::NoError)
    }
}
