//! 宿主文档抽象
//!
//! 宿主（CAD 文档/事务系统）拥有全部图元，并以回调的方式向会话投递事件。
//! 核心只要求宿主提供：命令启动、事件订阅、实体查询、事务内追加实体。

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use zrebar_core::entity::{EntityId, EntityKind};
use zrebar_core::geometry::{Geometry, Polyline};

/// 文档标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// 绘图空间（模型空间/布局）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub u32);

impl SpaceId {
    pub const MODEL: SpaceId = SpaceId(0);
}

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// 观察者类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// 实体追加到数据库
    EntityAppended,
    /// 命令结束/取消/失败
    CommandLifecycle,
    /// 宿主空闲（无待处理的内部工作）
    Idle,
}

/// 宿主投递给会话的事件
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    EntityAppended {
        entity: EntityId,
        kind: EntityKind,
        space: SpaceId,
    },
    CommandEnded { command: String },
    CommandCancelled { command: String },
    CommandFailed { command: String },
    Idle,
}

impl HostEvent {
    /// 投递该事件所需的观察者类别
    pub fn observer_kind(&self) -> ObserverKind {
        match self {
            HostEvent::EntityAppended { .. } => ObserverKind::EntityAppended,
            HostEvent::CommandEnded { .. }
            | HostEvent::CommandCancelled { .. }
            | HostEvent::CommandFailed { .. } => ObserverKind::CommandLifecycle,
            HostEvent::Idle => ObserverKind::Idle,
        }
    }
}

/// 宿主文档接口
pub trait Host {
    /// 文档标识（会话注册表的键）
    fn document_id(&self) -> DocumentId;

    /// 当前绘图空间
    fn current_space(&self) -> SpaceId;

    /// 启动交互式绘图命令，立即返回
    fn launch_command(&mut self, command: &str) -> Result<(), HostError>;

    /// 挂接观察者
    fn subscribe(&mut self, kind: ObserverKind) -> SubscriptionId;

    /// 卸下观察者；未知句柄忽略
    fn unsubscribe(&mut self, subscription: SubscriptionId);

    /// 读取多段线实体的几何副本
    fn polyline(&self, id: EntityId) -> Result<Polyline, HostError>;

    // ========== 事务 ==========

    fn begin_transaction(&mut self) -> Result<(), HostError>;

    /// 在当前事务内追加实体
    fn append_entity(&mut self, geometry: Geometry, layer: &str) -> Result<EntityId, HostError>;

    /// 在当前事务内将多段线标记为闭合
    fn close_polyline(&mut self, id: EntityId) -> Result<(), HostError>;

    fn commit_transaction(&mut self) -> Result<(), HostError>;

    /// 回滚当前事务；没有活动事务时不做任何事
    fn abort_transaction(&mut self);
}

/// 比较命令名：忽略大小写以及前导的 `_`/`.` 内部调用标记
pub fn command_matches(launched: &str, reported: &str) -> bool {
    fn normalize(name: &str) -> &str {
        name.trim().trim_start_matches(['_', '.'])
    }
    normalize(launched).eq_ignore_ascii_case(normalize(reported))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_matches() {
        assert!(command_matches("PLINE", "pline"));
        assert!(command_matches("PLINE", "_PLINE"));
        assert!(command_matches("_pline", "PLINE"));
        assert!(command_matches("PLINE", "_.PLINE"));
        assert!(!command_matches("PLINE", "LINE"));
        assert!(!command_matches("PLINE", "PLINEX"));
    }

    #[test]
    fn test_observer_kind() {
        assert_eq!(HostEvent::Idle.observer_kind(), ObserverKind::Idle);
        assert_eq!(
            HostEvent::CommandFailed { command: "PLINE".into() }.observer_kind(),
            ObserverKind::CommandLifecycle
        );
    }
}
