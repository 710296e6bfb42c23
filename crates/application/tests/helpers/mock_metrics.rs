#![allow(dead_code)]

use dnstester_application::ports::{AttemptRecord, MetricsRecorder};
use dnstester_domain::TaskStatus;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAttempt {
    pub server: String,
    pub protocol: String,
    pub qtype: String,
    pub result: String,
}

/// Metrics double that keeps every call for later assertions.
#[derive(Default)]
pub struct RecordingMetrics {
    attempts: Mutex<Vec<RecordedAttempt>>,
    tasks: Mutex<Vec<TaskStatus>>,
    api_requests: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Vec<RecordedAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempts_for(&self, host: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.server.contains(host))
            .count()
    }

    pub fn tasks(&self) -> Vec<TaskStatus> {
        self.tasks.lock().unwrap().clone()
    }
}

impl MetricsRecorder for RecordingMetrics {
    fn record_attempt(&self, record: &AttemptRecord<'_>) {
        self.attempts.lock().unwrap().push(RecordedAttempt {
            server: record.server.to_string(),
            protocol: record.protocol.to_string(),
            qtype: record.qtype.to_string(),
            result: record.outcome.result_label(),
        });
    }

    fn record_task(&self, status: TaskStatus) {
        self.tasks.lock().unwrap().push(status);
    }

    fn record_api_request(&self, endpoint: &str) {
        self.api_requests.lock().unwrap().push(endpoint.to_string());
    }
}
