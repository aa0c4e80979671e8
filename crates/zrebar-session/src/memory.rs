//! 内存文档
//!
//! `Host` 的完整内存实现：实体表、订阅表和基于快照的事务回滚。
//! 命令行程序和测试都用它扮演宿主。

use crate::error::HostError;
use crate::host::{DocumentId, Host, HostEvent, ObserverKind, SpaceId, SubscriptionId};
use std::collections::{BTreeMap, HashMap};
use zrebar_core::entity::EntityId;
use zrebar_core::geometry::{Geometry, Polyline};

/// 首个实体句柄
const FIRST_HANDLE: u64 = 0x100;

/// 文档中的实体
#[derive(Debug, Clone)]
pub struct StoredEntity {
    pub id: EntityId,
    pub geometry: Geometry,
    pub layer: String,
    pub space: SpaceId,
}

/// 事务开始时的快照
#[derive(Debug)]
struct Snapshot {
    entities: BTreeMap<EntityId, StoredEntity>,
    next_handle: u64,
}

#[derive(Debug)]
pub struct MemoryHost {
    document: DocumentId,
    space: SpaceId,
    entities: BTreeMap<EntityId, StoredEntity>,
    next_handle: u64,
    subscriptions: HashMap<SubscriptionId, ObserverKind>,
    next_subscription: u64,
    launched: Vec<String>,
    accept_commands: bool,
    transaction: Option<Snapshot>,
}

impl MemoryHost {
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            space: SpaceId::MODEL,
            entities: BTreeMap::new(),
            next_handle: FIRST_HANDLE,
            subscriptions: HashMap::new(),
            next_subscription: 1,
            launched: Vec::new(),
            accept_commands: true,
            transaction: None,
        }
    }

    fn allocate_handle(&mut self) -> EntityId {
        let id = EntityId::new(self.next_handle);
        self.next_handle += 1;
        id
    }

    fn insert(&mut self, geometry: Geometry, layer: &str) -> EntityId {
        let id = self.allocate_handle();
        self.entities.insert(
            id,
            StoredEntity {
                id,
                geometry,
                layer: layer.to_string(),
                space: self.space,
            },
        );
        id
    }

    /// 模拟绘图工具提交一个实体，返回应投递给观察者的事件
    pub fn draw(&mut self, geometry: Geometry) -> HostEvent {
        let kind = geometry.kind();
        let entity = self.insert(geometry, "0");
        HostEvent::EntityAppended {
            entity,
            kind,
            space: self.space,
        }
    }

    /// 删除实体（例如被其他命令并发删除）
    pub fn erase(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&StoredEntity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &StoredEntity> {
        self.entities.values()
    }

    pub fn entities_on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a StoredEntity> + 'a {
        self.entities.values().filter(move |e| e.layer == layer)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_subscribed(&self, kind: ObserverKind) -> bool {
        self.subscriptions.values().any(|&k| k == kind)
    }

    /// 已启动的命令（按顺序）
    pub fn launched_commands(&self) -> &[String] {
        &self.launched
    }

    /// 设置为 false 时拒绝启动命令
    pub fn set_accept_commands(&mut self, accept: bool) {
        self.accept_commands = accept;
    }

    pub fn set_current_space(&mut self, space: SpaceId) {
        self.space = space;
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }
}

impl Host for MemoryHost {
    fn document_id(&self) -> DocumentId {
        self.document
    }

    fn current_space(&self) -> SpaceId {
        self.space
    }

    fn launch_command(&mut self, command: &str) -> Result<(), HostError> {
        if !self.accept_commands {
            return Err(HostError::CommandRejected(command.to_string()));
        }
        self.launched.push(command.to_string());
        Ok(())
    }

    fn subscribe(&mut self, kind: ObserverKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription);
    }

    fn polyline(&self, id: EntityId) -> Result<Polyline, HostError> {
        match self.entities.get(&id) {
            Some(StoredEntity {
                geometry: Geometry::Polyline(pl),
                ..
            }) => Ok(pl.clone()),
            Some(_) => Err(HostError::NotAPolyline(id)),
            None => Err(HostError::EntityNotFound(id)),
        }
    }

    fn begin_transaction(&mut self) -> Result<(), HostError> {
        if self.transaction.is_some() {
            return Err(HostError::TransactionActive);
        }
        self.transaction = Some(Snapshot {
            entities: self.entities.clone(),
            next_handle: self.next_handle,
        });
        Ok(())
    }

    fn append_entity(&mut self, geometry: Geometry, layer: &str) -> Result<EntityId, HostError> {
        if self.transaction.is_none() {
            return Err(HostError::NoTransaction);
        }
        Ok(self.insert(geometry, layer))
    }

    fn close_polyline(&mut self, id: EntityId) -> Result<(), HostError> {
        if self.transaction.is_none() {
            return Err(HostError::NoTransaction);
        }
        match self.entities.get_mut(&id) {
            Some(StoredEntity {
                geometry: Geometry::Polyline(pl),
                ..
            }) => {
                pl.closed = true;
                Ok(())
            }
            Some(_) => Err(HostError::NotAPolyline(id)),
            None => Err(HostError::EntityNotFound(id)),
        }
    }

    fn commit_transaction(&mut self) -> Result<(), HostError> {
        self.transaction
            .take()
            .map(|_| ())
            .ok_or(HostError::NoTransaction)
    }

    fn abort_transaction(&mut self) {
        if let Some(snapshot) = self.transaction.take() {
            self.entities = snapshot.entities;
            self.next_handle = snapshot.next_handle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zrebar_core::geometry::Line;
    use zrebar_core::math::Point2;

    fn line() -> Geometry {
        Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)))
    }

    #[test]
    fn test_abort_restores_document() {
        let mut host = MemoryHost::new(DocumentId(1));
        host.draw(line());

        host.begin_transaction().unwrap();
        host.append_entity(line(), "REBAR").unwrap();
        host.append_entity(line(), "REBAR").unwrap();
        assert_eq!(host.entity_count(), 3);
        host.abort_transaction();

        assert_eq!(host.entity_count(), 1);
        assert!(!host.in_transaction());
        assert_eq!(host.entities_on_layer("REBAR").count(), 0);
    }

    #[test]
    fn test_commit_keeps_entities() {
        let mut host = MemoryHost::new(DocumentId(1));
        host.begin_transaction().unwrap();
        assert_eq!(host.begin_transaction(), Err(HostError::TransactionActive));
        let id = host.append_entity(line(), "REBAR").unwrap();
        host.commit_transaction().unwrap();

        assert_eq!(host.entity(id).map(|e| e.layer.as_str()), Some("REBAR"));
        assert_eq!(host.commit_transaction(), Err(HostError::NoTransaction));
    }

    #[test]
    fn test_append_requires_transaction() {
        let mut host = MemoryHost::new(DocumentId(1));
        assert_eq!(host.append_entity(line(), "REBAR"), Err(HostError::NoTransaction));
    }

    #[test]
    fn test_polyline_lookup() {
        let mut host = MemoryHost::new(DocumentId(1));
        let HostEvent::EntityAppended { entity, .. } = host.draw(line()) else {
            panic!("Expected EntityAppended");
        };
        assert_eq!(host.polyline(entity), Err(HostError::NotAPolyline(entity)));
        host.erase(entity);
        assert_eq!(host.polyline(entity), Err(HostError::EntityNotFound(entity)));
    }
}
