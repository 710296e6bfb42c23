use dnstester_domain::{
    generate_task_id, DnsServer, DomainError, ServerSpec, TaskPayload, TaskStatus,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::TaskQueue;

/// Request as typed by a user, before normalization.
#[derive(Debug, Clone, Default)]
pub struct SubmitTaskRequest {
    pub domain: String,
    pub qtype: String,
    pub servers: Vec<ServerSpec>,
    pub tls_insecure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTask {
    pub task_id: String,
    pub status: TaskStatus,
}

/// Validates a request and puts it on the queue.
pub struct SubmitTaskUseCase {
    queue: Arc<dyn TaskQueue>,
    default_servers: Vec<DnsServer>,
}

impl SubmitTaskUseCase {
    pub fn new(queue: Arc<dyn TaskQueue>) -> Self {
        Self {
            queue,
            default_servers: Vec::new(),
        }
    }

    pub fn with_default_servers(mut self, servers: Vec<DnsServer>) -> Self {
        self.default_servers = servers;
        self
    }

    /// Validation errors surface here, before anything is queued.
    #[instrument(skip(self, request), fields(domain = %request.domain))]
    pub async fn execute(&self, request: SubmitTaskRequest) -> Result<SubmittedTask, DomainError> {
        let payload = TaskPayload {
            task_id: generate_task_id(),
            domain: request.domain,
            qtype: request.qtype,
            servers: request.servers,
            tls_insecure: request.tls_insecure,
        };

        let normalized = payload.validate()?;
        if normalized.servers.is_empty() && self.default_servers.is_empty() {
            return Err(DomainError::NoServers);
        }

        let encoded = normalized.to_payload().encode()?;
        self.queue.enqueue(&normalized.task_id, &encoded).await?;

        info!(
            task_id = %normalized.task_id,
            qtype = %normalized.qtype,
            servers = normalized.servers.len(),
            "Task submitted"
        );

        Ok(SubmittedTask {
            task_id: normalized.task_id,
            status: TaskStatus::Pending,
        })
    }
}
