//! 单次分发的执行与结果
//!
//! 一个批次 = 某事件在查询时刻的全部绑定，按桶内顺序依次调用，首个失败即中止。
//! 失败如何呈现由 `FailurePolicy` 决定：同步路径吞掉并记录，异步路径向调用方传播。
//!
use crate::error::{BusError, BusResult};
use crate::event::Event;
use crate::registry::Snapshot;
use std::any::type_name;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// 分发模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
}

impl From<bool> for Mode {
    fn from(is_async: bool) -> Self {
        if is_async { Mode::Async } else { Mode::Sync }
    }
}

/// 批次失败的呈现方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 记录日志后按成功返回原事件
    Swallow,
    /// 作为分发结果的失败返回
    Propagate,
}

impl From<Mode> for FailurePolicy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sync => FailurePolicy::Swallow,
            Mode::Async => FailurePolicy::Propagate,
        }
    }
}

/// 一个批次的结局
#[derive(Debug)]
pub enum Outcome<E> {
    /// 全部处理器成功
    Delivered(E),
    /// 有处理器失败，错误已记录，事件原样返回
    Swallowed { event: E, error: BusError },
    /// 有处理器失败，错误交给调用方
    Propagated(BusError),
}

impl<E> Outcome<E> {
    pub fn into_result(self) -> BusResult<E> {
        match self {
            Outcome::Delivered(event) | Outcome::Swallowed { event, .. } => Ok(event),
            Outcome::Propagated(error) => Err(error),
        }
    }
}

/// 依次调用批次内的处理器
pub(crate) fn run_batch<E: Event>(
    bindings: &Snapshot,
    event: E,
    policy: FailurePolicy,
) -> Outcome<E> {
    tracing::trace!(event_type = type_name::<E>(), handlers = bindings.len(), "dispatching");

    let failure = bindings.iter().find_map(|binding| binding.invoke(&event).err());

    match (failure, policy) {
        (None, _) => Outcome::Delivered(event),
        (Some(error), FailurePolicy::Swallow) => {
            tracing::error!(
                event_type = type_name::<E>(),
                kind = error.as_label(),
                error = %error,
                "event handler failed, remaining handlers skipped"
            );
            Outcome::Swallowed { event, error }
        }
        (Some(error), FailurePolicy::Propagate) => {
            tracing::warn!(
                event_type = type_name::<E>(),
                kind = error.as_label(),
                error = %error,
                "event handler failed"
            );
            Outcome::Propagated(error)
        }
    }
}

/// 分发结果：单次赋值，完成后给出原事件或失败
///
/// 同步分发返回时已完成；异步分发在工作线程执行完批次后完成。
/// 可以 `.await`，也可以在非异步线程中调用 [`Dispatched::wait`] 阻塞等待。
#[must_use = "dropping a dispatch result discards handler failures of async dispatch"]
pub struct Dispatched<E> {
    event_type: &'static str,
    state: State<E>,
}

enum State<E> {
    Ready(BusResult<E>),
    Pending(oneshot::Receiver<BusResult<E>>),
    // 结果已被取走
    Taken,
}

// 不对 E 做结构化投影，`Pin` 下移动 E 是安全的
impl<E> Unpin for Dispatched<E> {}

impl<E: Event> Dispatched<E> {
    pub(crate) fn ready(result: BusResult<E>) -> Self {
        Self {
            event_type: type_name::<E>(),
            state: State::Ready(result),
        }
    }

    pub(crate) fn pending(rx: oneshot::Receiver<BusResult<E>>) -> Self {
        Self {
            event_type: type_name::<E>(),
            state: State::Pending(rx),
        }
    }

    /// 非阻塞地检查结果是否已确定
    pub fn is_ready(&mut self) -> bool {
        if let State::Pending(rx) = &mut self.state {
            let received = match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Closed) => Err(dropped(self.event_type)),
            };
            self.state = State::Ready(received);
        }
        true
    }

    /// 阻塞当前线程直到完成
    ///
    /// # Panics
    ///
    /// 在异步执行上下文中对未完成的结果调用会 panic，此时应使用 `.await`。
    pub fn wait(self) -> BusResult<E> {
        let event_type = self.event_type;
        match self.state {
            State::Ready(result) => result,
            State::Pending(rx) => rx.blocking_recv().unwrap_or_else(|_| Err(dropped(event_type))),
            State::Taken => Err(polled_twice(event_type)),
        }
    }
}

impl<E: Event> Future for Dispatched<E> {
    type Output = BusResult<E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let event_type = this.event_type;
        match mem::replace(&mut this.state, State::Taken) {
            State::Ready(result) => Poll::Ready(result),
            State::Taken => Poll::Ready(Err(polled_twice(event_type))),
            State::Pending(mut rx) => match Pin::new(&mut rx).poll(cx) {
                Poll::Ready(received) => {
                    Poll::Ready(received.unwrap_or_else(|_| Err(dropped(event_type))))
                }
                Poll::Pending => {
                    this.state = State::Pending(rx);
                    Poll::Pending
                }
            },
        }
    }
}

fn dropped(event_type: &'static str) -> BusError {
    BusError::Submission {
        event_type,
        reason: "batch was dropped before completion".to_string(),
    }
}

fn polled_twice(event_type: &'static str) -> BusError {
    BusError::Submission {
        event_type,
        reason: "dispatch result already taken".to_string(),
    }
}
