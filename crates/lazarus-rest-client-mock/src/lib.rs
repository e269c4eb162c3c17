//! Mock REST client backed by scripted replies

use async_trait::async_trait;
use lazarus_api_contract::*;
use lazarus_client_api::{ClientApi, ClientApiError, ClientApiResult};
use lazarus_test_scenarios::{Reply, Scenario, ScenarioReplies};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Scan,
    Resurrect,
    Download,
}

/// A remote call as the mock received it
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Scan {
        url: String,
    },
    Resurrect {
        local_path: String,
        details: Vec<serde_json::Value>,
    },
    Download {
        project_name: String,
        local_path: String,
    },
}

/// Holds calls of one operation in flight until released
#[derive(Debug, Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Wait until a gated call has been dispatched
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one waiting (or the next) gated call settle
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
struct Script {
    scan: VecDeque<Reply>,
    resurrect: VecDeque<Reply>,
    download: VecDeque<Reply>,
    calls: Vec<Call>,
    gates: HashMap<Operation, Gate>,
}

/// Scripted [`ClientApi`] implementation
#[derive(Default)]
pub struct MockClient {
    script: Mutex<Script>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_replies(replies: ScenarioReplies) -> Self {
        let client = Self::new();
        {
            let mut script = client.lock();
            script.scan = replies.scan.into();
            script.resurrect = replies.resurrect.into();
            script.download = replies.download.into();
        }
        client
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::from_replies(scenario.replies.clone())
    }

    /// Queue the next answer for `operation`
    pub fn push_reply(&self, operation: Operation, reply: Reply) -> &Self {
        let mut script = self.lock();
        match operation {
            Operation::Scan => script.scan.push_back(reply),
            Operation::Resurrect => script.resurrect.push_back(reply),
            Operation::Download => script.download.push_back(reply),
        }
        drop(script);
        self
    }

    /// Gate every subsequent call of `operation`
    pub fn hold(&self, operation: Operation) -> Gate {
        self.lock().gates.entry(operation).or_default().clone()
    }

    /// Calls received so far, in dispatch order
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn dispatch(&self, call: Call) -> Reply {
        let operation = call.operation();
        let (reply, gate) = {
            let mut script = self.lock();
            script.calls.push(call);
            let queue = match operation {
                Operation::Scan => &mut script.scan,
                Operation::Resurrect => &mut script.resurrect,
                Operation::Download => &mut script.download,
            };
            let reply = queue.pop_front();
            (reply, script.gates.get(&operation).cloned())
        };

        if let Some(gate) = gate {
            gate.pass().await;
        }

        reply.unwrap_or_else(|| Reply::ProtocolError {
            message: format!("no scripted reply for {operation:?}"),
        })
    }
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Scan { .. } => Operation::Scan,
            Call::Resurrect { .. } => Operation::Resurrect,
            Call::Download { .. } => Operation::Download,
        }
    }
}

fn reply_error(reply: Reply, expected: &str) -> ClientApiError {
    match reply {
        Reply::TransportError { message } => ClientApiError::Transport(message),
        Reply::ProtocolError { message } => ClientApiError::Protocol(message),
        Reply::ServerError { status, detail } => ClientApiError::Server { status, detail },
        other => ClientApiError::Unexpected(format!("expected {expected} reply, got {other:?}")),
    }
}

#[async_trait]
impl ClientApi for MockClient {
    async fn scan(&self, url: &str) -> ClientApiResult<ScanReport> {
        match self.dispatch(Call::Scan { url: url.into() }).await {
            Reply::ScanOk { report } => Ok(report),
            other => Err(reply_error(other, "scan")),
        }
    }

    async fn resurrect(
        &self,
        local_path: &str,
        details: &[serde_json::Value],
    ) -> ClientApiResult<ResurrectionResult> {
        let call = Call::Resurrect {
            local_path: local_path.into(),
            details: details.to_vec(),
        };
        match self.dispatch(call).await {
            Reply::ResurrectOk { result } => Ok(result),
            other => Err(reply_error(other, "resurrect")),
        }
    }

    async fn download(&self, project_name: &str, local_path: &str) -> ClientApiResult<Artifact> {
        let call = Call::Download {
            project_name: project_name.into(),
            local_path: local_path.into(),
        };
        match self.dispatch(call).await {
            Reply::DownloadOk { file_name, bytes } => Ok(Artifact { file_name, bytes }),
            other => Err(reply_error(other, "download")),
        }
    }
}
