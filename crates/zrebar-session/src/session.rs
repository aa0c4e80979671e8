//! 边界捕获会话
//!
//! 单个文档上的状态机：
//!
//! ```text
//! Idle → AwaitingTool → ToolRunning → ToolEndedPendingIdle → Completed
//!                            │
//!                            └──→ Cancelled | Failed
//! ```
//!
//! 绘图命令结束的通知可能早于宿主完成对新实体的内部处理，
//! 所以命令结束后还要再等一次空闲信号才运行几何流水线。
//! 所有工作都发生在宿主投递的事件回调里，任何操作都不阻塞调用线程。

use crate::config::SessionConfig;
use crate::error::{FailureReason, StartError};
use crate::host::{command_matches, DocumentId, Host, HostEvent, ObserverKind};
use crate::observer::ObserverSet;
use crate::pipeline;
use crate::registry::{SessionId, SessionRegistry};
use std::sync::Arc;
use zrebar_core::config::FillConfig;
use zrebar_core::entity::EntityId;
use zrebar_core::result::RunResult;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingTool,
    ToolRunning,
    ToolEndedPendingIdle,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }
}

/// 会话结果（通过回调交付）
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(RunResult),
    Cancelled,
    Failed(FailureReason),
}

impl SessionOutcome {
    fn state(&self) -> SessionState {
        match self {
            SessionOutcome::Completed(_) => SessionState::Completed,
            SessionOutcome::Cancelled => SessionState::Cancelled,
            SessionOutcome::Failed(_) => SessionState::Failed,
        }
    }
}

/// 完成回调
pub type CompletionCallback = Box<dyn FnOnce(SessionOutcome)>;

/// 边界捕获会话
///
/// 丢弃未终止的会话只会注销注册表条目：`Drop` 拿不到宿主，
/// 宿主上的订阅不会被释放，完成回调也不会触发。需要提前结束时调用 [`CaptureSession::abort`]。
pub struct CaptureSession {
    id: SessionId,
    document: DocumentId,
    fill: FillConfig,
    config: SessionConfig,
    state: SessionState,
    /// 最近一次追加的候选边界（后到者覆盖先到者）
    candidate: Option<EntityId>,
    observers: ObserverSet,
    registry: Arc<SessionRegistry>,
    on_finish: Option<CompletionCallback>,
}

impl CaptureSession {
    /// 开始捕获：校验配置、登记会话、挂接观察者并启动绘图命令
    ///
    /// 立即返回。配置无效或文档已有活动会话时返回错误，此时没有任何修改；
    /// 其余结果（包括命令启动失败）都通过 `on_finish` 交付。
    pub fn start<H, F>(
        host: &mut H,
        registry: Arc<SessionRegistry>,
        fill: FillConfig,
        config: SessionConfig,
        on_finish: F,
    ) -> Result<Self, StartError>
    where
        H: Host + ?Sized,
        F: FnOnce(SessionOutcome) + 'static,
    {
        fill.validate()?;

        let id = SessionId::next();
        let document = host.document_id();
        registry.try_register(document, id)?;

        let mut session = Self {
            id,
            document,
            fill,
            config,
            state: SessionState::Idle,
            candidate: None,
            observers: ObserverSet::new(),
            registry,
            on_finish: Some(Box::new(on_finish)),
        };
        session.transition(SessionState::AwaitingTool);

        session.observers.attach(host, ObserverKind::EntityAppended);
        session.observers.attach(host, ObserverKind::CommandLifecycle);

        match host.launch_command(&session.config.command) {
            Ok(()) => session.transition(SessionState::ToolRunning),
            Err(err) => {
                tracing::warn!("{}: failed to launch {}: {}", id, session.config.command, err);
                session.finish(host, SessionOutcome::Failed(FailureReason::ToolLaunch(err)));
            }
        }

        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 当前记录的候选边界
    pub fn candidate(&self) -> Option<EntityId> {
        self.candidate
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// 当前挂接的观察者数量
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// 处理宿主投递的事件
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: HostEvent) {
        if self.state.is_terminal() {
            tracing::debug!("{}: ignoring {:?} after termination", self.id, event);
            return;
        }
        if !self.observers.is_attached(event.observer_kind()) {
            tracing::debug!("{}: no observer for {:?}", self.id, event);
            return;
        }

        match (self.state, event) {
            (SessionState::ToolRunning, HostEvent::EntityAppended { entity, kind, space }) => {
                if kind.is_boundary_candidate() && space == host.current_space() {
                    if let Some(previous) = self.candidate.replace(entity) {
                        tracing::debug!("{}: candidate {} replaced by {}", self.id, previous, entity);
                    }
                }
            }
            (SessionState::ToolRunning, HostEvent::CommandEnded { command }) => {
                if self.is_own_command(&command) {
                    self.on_tool_ended(host);
                }
            }
            (SessionState::ToolRunning, HostEvent::CommandCancelled { command }) => {
                if self.is_own_command(&command) {
                    self.candidate = None;
                    self.finish(host, SessionOutcome::Cancelled);
                }
            }
            (SessionState::ToolRunning, HostEvent::CommandFailed { command }) => {
                if self.is_own_command(&command) {
                    self.candidate = None;
                    self.finish(host, SessionOutcome::Failed(FailureReason::ToolFailed { command }));
                }
            }
            (SessionState::ToolEndedPendingIdle, HostEvent::Idle) => {
                self.on_idle(host);
            }
            (state, event) => {
                tracing::debug!("{}: {:?} ignored in state {:?}", self.id, event, state);
            }
        }
    }

    /// 由调用方中止会话（例如文档即将关闭）
    pub fn abort<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.state.is_terminal() {
            return;
        }
        self.candidate = None;
        self.finish(host, SessionOutcome::Cancelled);
    }

    fn is_own_command(&self, reported: &str) -> bool {
        command_matches(&self.config.command, reported)
    }

    fn on_tool_ended<H: Host + ?Sized>(&mut self, host: &mut H) {
        // 先卸下命令相关观察者，避免重入
        self.observers.detach(host, ObserverKind::CommandLifecycle);
        self.observers.detach(host, ObserverKind::EntityAppended);
        self.transition(SessionState::ToolEndedPendingIdle);
        self.observers.attach(host, ObserverKind::Idle);
    }

    fn on_idle<H: Host + ?Sized>(&mut self, host: &mut H) {
        // 空闲观察者是一次性的
        self.observers.detach(host, ObserverKind::Idle);

        let outcome = match pipeline::run(host, self.candidate, &self.fill, &self.config) {
            Ok(result) => SessionOutcome::Completed(result),
            Err(reason) => {
                tracing::warn!("{}: {}", self.id, reason);
                SessionOutcome::Failed(reason)
            }
        };
        self.finish(host, outcome);
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!("{}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// 终止：释放全部观察者、注销会话、交付结果；只执行一次
    fn finish<H: Host + ?Sized>(&mut self, host: &mut H, outcome: SessionOutcome) {
        if self.state.is_terminal() {
            return;
        }
        self.transition(outcome.state());
        self.observers.release_all(host);
        self.registry.release(self.document, self.id);

        if let Some(callback) = self.on_finish.take() {
            callback(outcome);
        }
    }
}

impl Drop for CaptureSession {
    /// 只释放注册表条目，宿主订阅仍然保留
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            tracing::warn!("{} dropped in state {:?}", self.id, self.state);
            self.registry.release(self.document, self.id);
        }
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("document", &self.document)
            .field("state", &self.state)
            .field("candidate", &self.candidate)
            .field("observers", &self.observers.len())
            .finish()
    }
}
