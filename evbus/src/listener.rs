//! 监听者（Listener）
//!
//! 注册入口消费的“发现”协议：一个实例声明自己有哪些处理器、各自接收什么事件。
//! 通常由 `#[listeners]` 宏生成实现，也可以手写。
//!
use crate::binding::Binding;
use crate::event::Event;
use std::sync::Arc;

/// 监听者：向 `Binder` 声明自身的处理器
///
/// 返回错误表示发现失败，注册入口会将其包装为 `BusError::Registration`。
pub trait Listener: Send + Sync + Sized + 'static {
    fn bind(binder: &mut Binder<Self>) -> anyhow::Result<()>;
}

/// 收集某个监听者实例的全部绑定
pub struct Binder<O> {
    owner: Arc<O>,
    bindings: Vec<Binding>,
}

impl<O: Send + Sync + 'static> Binder<O> {
    pub fn new(owner: Arc<O>) -> Self {
        Self {
            owner,
            bindings: Vec::new(),
        }
    }

    /// 声明一个处理 `E` 的方法
    pub fn on<E, F>(&mut self, handler: &'static str, f: F) -> &mut Self
    where
        E: Event,
        F: Fn(&O, &E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bindings
            .push(Binding::new(self.owner.clone(), handler, f));
        self
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}

/// 从监听者实例中提取绑定
pub fn discover<L: Listener>(listener: Arc<L>) -> anyhow::Result<Vec<Binding>> {
    let mut binder = Binder::new(listener);
    L::bind(&mut binder)?;
    Ok(binder.into_bindings())
}

/// 处理器返回值到 `anyhow::Result<()>` 的统一转换，供宏生成代码使用
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> anyhow::Result<()>;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<Err> IntoHandlerResult for Result<(), Err>
where
    Err: Into<anyhow::Error>,
{
    fn into_handler_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}
