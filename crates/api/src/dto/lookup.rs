use dnstester_application::use_cases::{SubmitTaskRequest, SubmittedTask};
use dnstester_domain::{ServerSpec, TaskStatus};
use serde::{Deserialize, Serialize};

/// A server given either as a bare target string or as a full entry.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ServerInput {
    Address(String),
    Spec(ServerSpec),
}

impl From<ServerInput> for ServerSpec {
    fn from(input: ServerInput) -> Self {
        match input {
            ServerInput::Address(ip) => ServerSpec::new(ip),
            ServerInput::Spec(spec) => spec,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LookupRequest {
    pub domain: String,
    #[serde(default)]
    pub qtype: Option<String>,
    #[serde(default)]
    pub servers: Option<Vec<ServerInput>>,
    #[serde(default)]
    pub tls_insecure: Option<bool>,
}

impl From<LookupRequest> for SubmitTaskRequest {
    fn from(req: LookupRequest) -> Self {
        Self {
            domain: req.domain,
            qtype: req.qtype.unwrap_or_default(),
            servers: req
                .servers
                .unwrap_or_default()
                .into_iter()
                .map(ServerSpec::from)
                .collect(),
            tls_insecure: req.tls_insecure.unwrap_or(false),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct LookupResponse {
    pub task_id: String,
    pub status: TaskStatus,
}

impl From<SubmittedTask> for LookupResponse {
    fn from(task: SubmittedTask) -> Self {
        Self {
            task_id: task.task_id,
            status: task.status,
        }
    }
}
