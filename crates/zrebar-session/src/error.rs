//! 会话错误定义

use crate::host::DocumentId;
use crate::registry::SessionId;
use thiserror::Error;
use zrebar_core::entity::EntityId;
use zrebar_core::error::{BoundaryError, ConfigError};

/// 宿主文档操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity {0} is not a polyline")]
    NotAPolyline(EntityId),

    #[error("No active transaction")]
    NoTransaction,

    #[error("A transaction is already active")]
    TransactionActive,

    #[error("Append rejected: {0}")]
    AppendRejected(String),
}

/// 会话启动被拒绝（此时没有任何修改）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StartError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Document {document} already has an active session ({active})")]
    SessionAlreadyActive {
        document: DocumentId,
        active: SessionId,
    },
}

/// 会话失败原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    #[error("Failed to launch drawing command: {0}")]
    ToolLaunch(HostError),

    #[error("Drawing command {command} failed")]
    ToolFailed { command: String },

    #[error("Boundary entity is missing (candidate: {candidate:?})")]
    MissingBoundary { candidate: Option<EntityId> },

    #[error("Boundary {id} is not closed (gap {gap:.4})")]
    BoundaryNotClosed { id: EntityId, gap: f64 },

    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    #[error("Bar #{index} failed validation")]
    InvalidBar { index: usize },

    #[error("Write aborted: {0}")]
    Write(HostError),
}

impl From<BoundaryError> for FailureReason {
    fn from(err: BoundaryError) -> Self {
        match err {
            BoundaryError::NotClosed { id, gap, .. } => FailureReason::BoundaryNotClosed { id, gap },
            other @ BoundaryError::Degenerate { .. } => FailureReason::InvalidBoundary(other.to_string()),
        }
    }
}
