//! 实体标识
//!
//! 核心从不持有宿主文档中的图元，只保存其句柄（`EntityId`）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 宿主实体句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    /// CAD 风格的十六进制句柄
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// 实体类别（由宿主在实体创建通知中报告）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Line,
    Arc,
    Circle,
    Polyline,
    Text,
    Other,
}

impl EntityKind {
    /// 是否能够构成闭合边界（多段线类）
    pub fn is_boundary_candidate(&self) -> bool {
        matches!(self, EntityKind::Polyline)
    }
}
