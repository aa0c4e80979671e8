//! 核心错误定义

use crate::entity::EntityId;
use crate::scanline::SweepAxis;
use thiserror::Error;

/// 配置校验错误（会话开始前拒绝，不产生任何修改）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {axis} spacing must be a positive number, got {value}")]
    InvalidSpacing { axis: SweepAxis, value: f64 },
}

/// 边界校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    #[error("Boundary {id} is not closed (gap {gap:.4} exceeds tolerance {tolerance})")]
    NotClosed {
        id: EntityId,
        gap: f64,
        tolerance: f64,
    },

    #[error("Boundary {id} is degenerate: {reason}")]
    Degenerate { id: EntityId, reason: String },
}
