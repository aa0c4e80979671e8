//! ZRebar 边界捕获会话
//!
//! 在宿主文档中启动多段线绘制命令，捕获用户画出的边界，
//! 等宿主空闲后生成钢筋并在一个事务内写回文档。
//!
//! - `host`: 宿主文档抽象（命令、事件、事务）
//! - `session`: 捕获状态机
//! - `registry`: 每个文档最多一个活动会话
//! - `pipeline`: 边界 → 钢筋 → 原子写入 → 汇总
//! - `memory`: 内存宿主，供命令行程序和测试使用

pub mod config;
pub mod error;
pub mod host;
pub mod memory;
pub mod observer;
pub mod pipeline;
pub mod registry;
pub mod session;

pub use config::SessionConfig;
pub use error::{FailureReason, HostError, StartError};
pub use host::{command_matches, DocumentId, Host, HostEvent, ObserverKind, SpaceId, SubscriptionId};
pub use memory::MemoryHost;
pub use registry::{SessionId, SessionRegistry};
pub use session::{CaptureSession, CompletionCallback, SessionOutcome, SessionState};
