use crate::binding::Binding;
use crate::dispatch::{Dispatched, Mode};
use crate::error::{BusError, BusResult};
use crate::event::Event;
use crate::listener::{self, Listener};
use std::any::type_name;
use std::sync::Arc;

/// 事件总线（Event Bus）
///
/// - 负责接收监听者注册，并把提交的事件分发给绑定到该事件类型的处理器；
/// - 同步分发在调用线程执行，处理器失败只记录日志，结果恒为原事件；
/// - 异步分发交给工作池执行，处理器失败作为结果的失败返回；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
pub trait EventBus: Send + Sync {
    /// 总线名称（用于日志与相等性比较）
    fn name(&self) -> &str;

    /// 是否支持异步分发
    fn supports_async(&self) -> bool;

    /// 注册一批已解析的绑定，返回新增数量
    fn register(&self, bindings: Vec<Binding>) -> BusResult<usize>;

    /// 从监听者实例中提取处理器并注册
    ///
    /// 发现或注册失败时同步返回 `BusError::Registration`。
    fn register_listeners<L: Listener>(&self, listener: Arc<L>) -> BusResult<usize> {
        let wrap = |source: anyhow::Error| BusError::Registration {
            listener: type_name::<L>(),
            source,
        };

        let bindings = listener::discover(listener).map_err(wrap)?;
        self.register(bindings).map_err(|e| match e {
            e @ BusError::Registration { .. } => e,
            other => wrap(other.into()),
        })
    }

    /// 提交事件
    ///
    /// 请求异步但总线不支持时，在任何处理器运行之前返回 `BusError::UnsupportedMode`。
    fn dispatch<E: Event>(&self, event: E, mode: impl Into<Mode>) -> BusResult<Dispatched<E>> {
        match mode.into() {
            Mode::Sync => Ok(self.dispatch_sync(event)),
            Mode::Async if self.supports_async() => Ok(self.dispatch_async(event)),
            Mode::Async => Err(BusError::UnsupportedMode {
                bus: self.name().to_string(),
            }),
        }
    }

    /// 在调用线程上分发，返回已完成的结果
    fn dispatch_sync<E: Event>(&self, event: E) -> Dispatched<E>;

    /// 提交到工作池分发，立即返回未完成的结果
    fn dispatch_async<E: Event>(&self, event: E) -> Dispatched<E>;
}
