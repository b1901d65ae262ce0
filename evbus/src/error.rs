//! 事件总线统一错误定义
//!
//! 区分四类失败：注册失败、模式不支持、处理器执行失败、异步提交失败，
//! 另含类型不匹配与工作池构建失败两类编程/环境错误。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BusError {
    // --- 注册 ---
    #[error("failed to register listener of type {listener}: {source}")]
    Registration {
        listener: &'static str,
        #[source]
        source: anyhow::Error,
    },

    // --- 分发前置条件 ---
    #[error("event bus {bus} does not support asynchronous events")]
    UnsupportedMode { bus: String },

    // --- 分发执行 ---
    #[error("handler failed: event_type={event_type}, handler={handler}, reason={source}")]
    HandlerInvocation {
        event_type: &'static str,
        handler: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to handle event of type {event_type}: {reason}")]
    Submission {
        event_type: &'static str,
        reason: String,
    },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // --- 运行时 ---
    #[error("worker pool error: {source}")]
    WorkerPool {
        #[from]
        source: std::io::Error,
    },
}

impl BusError {
    /// 稳定的 snake_case 标签，用于日志字段
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Registration { .. } => "registration",
            BusError::UnsupportedMode { .. } => "unsupported_mode",
            BusError::HandlerInvocation { .. } => "handler_invocation",
            BusError::Submission { .. } => "submission",
            BusError::TypeMismatch { .. } => "type_mismatch",
            BusError::WorkerPool { .. } => "worker_pool",
        }
    }
}

/// 统一 Result 类型别名
pub type BusResult<T> = Result<T, BusError>;
