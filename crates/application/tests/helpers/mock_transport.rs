#![allow(dead_code)]

use async_trait::async_trait;
use dnstester_application::ports::QueryTransport;
use dnstester_domain::{Rcode, RecordType, Target, TransportError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted reaction of one server.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Answer with `rcode` after `delay`
    Respond(Rcode, Duration),
    /// Never answer; only a timeout or cancellation ends the call
    Hang,
    /// Fail immediately with a transport error
    Fail(TransportError),
    /// Fail the first `n` calls, then answer NOERROR after `delay`
    FailThenRespond(u32, Duration),
}

/// Transport double that counts calls and concurrent in-flight queries.
#[derive(Clone)]
pub struct MockTransport {
    behaviors: Arc<Mutex<HashMap<String, Behavior>>>,
    default: Behavior,
    calls: Arc<Mutex<HashMap<String, u32>>>,
    total_calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_default(Behavior::Respond(Rcode::NoError, Duration::from_millis(10)))
    }

    pub fn with_default(default: Behavior) -> Self {
        Self {
            behaviors: Arc::new(Mutex::new(HashMap::new())),
            default,
            calls: Arc::new(Mutex::new(HashMap::new())),
            total_calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Behavior keyed by target host.
    pub fn set_behavior(&self, host: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(host.to_string(), behavior);
    }

    pub fn calls_for(&self, host: &str) -> u32 {
        self.calls.lock().unwrap().get(host).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter even when the call future is dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QueryTransport for MockTransport {
    async fn execute(
        &self,
        target: &Target,
        _domain: &str,
        _qtype: RecordType,
        _tls_insecure: bool,
        _timeout: Duration,
    ) -> Result<Rcode, TransportError> {
        let host = target.host().to_string();
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            let entry = calls.entry(host.clone()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(&host)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match behavior {
            Behavior::Respond(rcode, delay) => {
                tokio::time::sleep(delay).await;
                Ok(rcode)
            }
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail(err) => Err(err),
            Behavior::FailThenRespond(failures, delay) => {
                if call_number <= failures {
                    Err(TransportError::ConnectionRefused(host))
                } else {
                    tokio::time::sleep(delay).await;
                    Ok(Rcode::NoError)
                }
            }
        }
    }
}
