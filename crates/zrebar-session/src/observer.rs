//! 观察者集合
//!
//! 会话的全部事件订阅集中在这里，终止时一次性释放。

use crate::host::{Host, ObserverKind, SubscriptionId};

/// 会话持有的订阅
#[derive(Debug, Default)]
pub struct ObserverSet {
    subscriptions: Vec<(ObserverKind, SubscriptionId)>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 挂接一个观察者（同类已挂接时不重复订阅）
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H, kind: ObserverKind) {
        if self.is_attached(kind) {
            return;
        }
        let subscription = host.subscribe(kind);
        self.subscriptions.push((kind, subscription));
    }

    /// 卸下指定类别的观察者
    pub fn detach<H: Host + ?Sized>(&mut self, host: &mut H, kind: ObserverKind) {
        self.subscriptions.retain(|&(k, subscription)| {
            if k == kind {
                host.unsubscribe(subscription);
                false
            } else {
                true
            }
        });
    }

    pub fn is_attached(&self, kind: ObserverKind) -> bool {
        self.subscriptions.iter().any(|&(k, _)| k == kind)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// 释放全部订阅；可重复调用
    pub fn release_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for (_, subscription) in self.subscriptions.drain(..) {
            host.unsubscribe(subscription);
        }
    }
}

impl Drop for ObserverSet {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            tracing::warn!(
                "ObserverSet dropped with {} live subscriptions",
                self.subscriptions.len()
            );
        }
    }
}
