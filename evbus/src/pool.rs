//! 异步分发使用的工作池
//!
//! 总线独占一个 tokio 运行时，批次通过 `spawn_blocking` 运行在其阻塞线程池上：
//! 线程按需创建、空闲超时后回收，线程上限与在途批次上限均可配置。
//!
use crate::config::BusConfig;
use crate::error::{BusError, BusResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;

pub(crate) struct WorkerPool {
    runtime: Mutex<Option<Runtime>>,
    handle: Handle,
    closed: AtomicBool,
    pending: Arc<AtomicUsize>,
    max_pending: Option<usize>,
}

/// 在途计数守卫：任务执行完毕或被丢弃时归还名额
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl WorkerPool {
    pub(crate) fn new(config: &BusConfig) -> BusResult<Self> {
        let prefix = config.thread_name.clone();
        let spawned = AtomicUsize::new(0);
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(config.max_blocking_threads.max(1))
            .thread_keep_alive(config.keep_alive)
            // 线程名带序号：{thread_name}-{n}
            .thread_name_fn(move || {
                let n = spawned.fetch_add(1, Ordering::Relaxed);
                format!("{prefix}-{n}")
            })
            .build()?;
        let handle = runtime.handle().clone();

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            handle,
            closed: AtomicBool::new(false),
            pending: Arc::new(AtomicUsize::new(0)),
            max_pending: config.max_pending,
        })
    }

    /// 提交一个工作单元，返回接收其结果的通道
    ///
    /// 池已关闭或在途批次达到上限时拒绝提交；
    /// 已提交的工作若未执行即被丢弃，接收端会观察到通道关闭。
    pub(crate) fn submit<T, F>(
        &self,
        event_type: &'static str,
        work: F,
    ) -> BusResult<oneshot::Receiver<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err(rejected(event_type, "worker pool is shut down"));
        }

        let in_flight = self.pending.fetch_add(1, Ordering::AcqRel);
        let guard = PendingGuard(self.pending.clone());
        if let Some(max) = self.max_pending.filter(|&max| in_flight >= max) {
            return Err(rejected(
                event_type,
                &format!("worker pool saturated ({max} batches in flight)"),
            ));
        }

        let (tx, rx) = oneshot::channel();
        self.handle.spawn_blocking(move || {
            let _guard = guard;
            // 调用方可能已放弃等待，此时结果直接丢弃
            let _ = tx.send(work());
        });

        Ok(rx)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// 后台关闭运行时，不等待正在执行的批次
    pub(crate) fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
            tracing::debug!("worker pool shut down");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn rejected(event_type: &'static str, reason: &str) -> BusError {
    tracing::warn!(event_type, reason, "async dispatch rejected");
    BusError::Submission {
        event_type,
        reason: reason.to_string(),
    }
}
