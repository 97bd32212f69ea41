//! Hand-off protocol for JSON command replay.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::DispatchError;

/// A JSON command file to replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayRequest {
    pub commands_file: PathBuf,
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Result dict reported by the replay backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub success: bool,
    pub details: serde_json::Value,
}

/// Backend that executes a JSON command file produced by the translator.
#[async_trait]
pub trait CommandReplayer: Send + Sync {
    async fn replay(&self, request: ReplayRequest) -> Result<ReplayOutcome, DispatchError>;
}
