use crate::normalize::{normalize_domain, normalize_qtype};
use crate::{DnsServer, DomainError, RecordType, ResolutionReport, ServerSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a queued task. Only the task processor moves a task
/// out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(DomainError::DatabaseError(format!(
                "unknown task status '{}'",
                other
            ))),
        }
    }
}

/// Random 128-bit identifier rendered in the familiar 8-4-4-4-12 layout.
pub fn generate_task_id() -> String {
    let hex = format!("{:032x}", fastrand::u128(..));
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Wire form of a task as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub task_id: String,
    pub domain: String,
    #[serde(default)]
    pub qtype: String,
    #[serde(default)]
    pub servers: Vec<ServerSpec>,
    #[serde(default)]
    pub tls_insecure: bool,
}

impl TaskPayload {
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw).map_err(|e| DomainError::InvalidPayload(e.to_string()))
    }

    pub fn encode(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::SerializationError(e.to_string()))
    }

    /// Normalizes every field. An empty server list is allowed here; the
    /// caller decides whether to substitute configured servers.
    pub fn validate(&self) -> Result<ResolutionRequest, DomainError> {
        if self.task_id.trim().is_empty() {
            return Err(DomainError::InvalidPayload("task_id is empty".to_string()));
        }

        let servers = self
            .servers
            .iter()
            .map(ServerSpec::normalize)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolutionRequest {
            task_id: self.task_id.clone(),
            domain: normalize_domain(&self.domain)?,
            qtype: normalize_qtype(&self.qtype)?,
            servers,
            tls_insecure: self.tls_insecure,
        })
    }
}

/// A task payload after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub task_id: String,
    pub domain: String,
    pub qtype: RecordType,
    pub servers: Vec<DnsServer>,
    pub tls_insecure: bool,
}

impl ResolutionRequest {
    pub fn to_payload(&self) -> TaskPayload {
        TaskPayload {
            task_id: self.task_id.clone(),
            domain: self.domain.clone(),
            qtype: self.qtype.to_string(),
            servers: self.servers.iter().map(ServerSpec::from).collect(),
            tls_insecure: self.tls_insecure,
        }
    }
}

/// Stored view of a task, as returned to pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub status: TaskStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResolutionReport>,
}
