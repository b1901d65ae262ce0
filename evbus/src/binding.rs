//! 处理器绑定（Binding）
//!
//! 一次注册的不可变描述：接收的事件类型、所属实例与可调用入口。
//! 以类型擦除方式保存处理器，调用端在 `invoke` 时还原事件类型。
//!
use crate::error::{BusError, BusResult};
use crate::event::{Event, EventKey};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type ErasedHandlerFn = Arc<dyn Fn(&dyn Any) -> Option<anyhow::Result<()>> + Send + Sync>;

/// 绑定去重口径
///
/// - `PerHandler`：(所属类型, 事件类型, 处理器名)，同一类型上监听同一事件的多个方法互不覆盖；
/// - `PerOwner`：(所属类型, 事件类型)，同一类型对同一事件只保留先注册的一个处理器。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindingIdentity {
    #[default]
    PerHandler,
    PerOwner,
}

/// 绑定在路由表桶内的唯一键
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingKey {
    owner: TypeId,
    event: EventKey,
    handler: Option<&'static str>,
}

struct Inner {
    event: EventKey,
    owner_type: TypeId,
    owner_name: &'static str,
    handler: &'static str,
    invoke: ErasedHandlerFn,
}

/// 已解析的处理器绑定，克隆开销为一次引用计数
#[derive(Clone)]
pub struct Binding {
    inner: Arc<Inner>,
}

impl Binding {
    /// 以实例方法的形式创建绑定：`f(&owner, &event)`
    pub fn new<O, E, F>(owner: Arc<O>, handler: &'static str, f: F) -> Self
    where
        O: Send + Sync + 'static,
        E: Event,
        F: Fn(&O, &E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let invoke: ErasedHandlerFn =
            Arc::new(move |event: &dyn Any| event.downcast_ref::<E>().map(|e| f(&*owner, e)));

        Self {
            inner: Arc::new(Inner {
                event: EventKey::of::<E>(),
                owner_type: TypeId::of::<O>(),
                owner_name: type_name::<O>(),
                handler,
                invoke,
            }),
        }
    }

    /// 以独立闭包创建绑定，闭包自身即所属实例
    pub fn from_fn<E, F>(handler: &'static str, f: F) -> Self
    where
        E: Event,
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(Arc::new(f), handler, |f: &F, event: &E| f(event))
    }

    pub fn event_key(&self) -> EventKey {
        self.inner.event
    }

    pub fn handler_name(&self) -> &'static str {
        self.inner.handler
    }

    pub fn key(&self, identity: BindingIdentity) -> BindingKey {
        BindingKey {
            owner: self.inner.owner_type,
            event: self.inner.event,
            handler: match identity {
                BindingIdentity::PerHandler => Some(self.inner.handler),
                BindingIdentity::PerOwner => None,
            },
        }
    }

    /// 调用处理器
    ///
    /// 处理器返回的错误与 panic 均转换为 `HandlerInvocation`；
    /// 事件类型与绑定不一致时返回 `TypeMismatch`（仅在绕过路由表直接调用时可能出现）。
    pub fn invoke<E: Event>(&self, event: &E) -> BusResult<()> {
        let any: &dyn Any = event;
        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.inner.invoke)(any)));

        match result {
            Ok(Some(Ok(()))) => Ok(()),
            Ok(Some(Err(source))) => Err(self.invocation_error::<E>(source)),
            Ok(None) => Err(BusError::TypeMismatch {
                expected: self.inner.event.name(),
                found: type_name::<E>(),
            }),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                Err(self.invocation_error::<E>(anyhow::anyhow!("handler panicked: {reason}")))
            }
        }
    }

    fn invocation_error<E: Event>(&self, source: anyhow::Error) -> BusError {
        BusError::HandlerInvocation {
            event_type: type_name::<E>(),
            handler: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.inner.owner_name, self.inner.handler, self.inner.event
        )
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("owner", &self.inner.owner_name)
            .field("handler", &self.inner.handler)
            .field("event", &self.inner.event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        hits: AtomicUsize,
    }

    impl Counter {
        fn on_string(&self, _s: &String) -> anyhow::Result<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counter() -> Arc<Counter> {
        Arc::new(Counter {
            hits: AtomicUsize::new(0),
        })
    }

    #[test]
    fn invoke_calls_the_owner_method() {
        let owner = counter();
        let binding = Binding::new(owner.clone(), "on_string", Counter::on_string);

        binding.invoke(&"hello".to_string()).unwrap();

        assert_eq!(owner.hits.load(Ordering::SeqCst), 1);
        assert_eq!(binding.event_key(), EventKey::of::<String>());
        assert_eq!(binding.handler_name(), "on_string");
    }

    #[test]
    fn invoke_with_wrong_event_type_is_a_mismatch() {
        let binding = Binding::new(counter(), "on_string", Counter::on_string);

        let err = binding.invoke(&42_u32).unwrap_err();
        match err {
            BusError::TypeMismatch { expected, found } => {
                assert!(expected.contains("String"));
                assert_eq!(found, "u32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn handler_error_is_wrapped() {
        let binding = Binding::from_fn("fails", |_: &u8| anyhow::bail!("boom"));

        let err = binding.invoke(&1_u8).unwrap_err();
        match err {
            BusError::HandlerInvocation {
                event_type,
                handler,
                source,
            } => {
                assert_eq!(event_type, "u8");
                assert!(handler.contains("fails"));
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn handler_panic_is_captured() {
        let binding = Binding::from_fn("panics", |_: &u8| -> anyhow::Result<()> {
            panic!("kaboom")
        });

        let err = binding.invoke(&1_u8).unwrap_err();
        assert!(err.to_string().contains("kaboom"));
    }

    #[test]
    fn identity_decides_whether_sibling_methods_collide() {
        let owner = counter();
        let a = Binding::new(owner.clone(), "on_string", Counter::on_string);
        let b = Binding::new(owner, "on_string_again", Counter::on_string);

        assert_ne!(
            a.key(BindingIdentity::PerHandler),
            b.key(BindingIdentity::PerHandler)
        );
        assert_eq!(
            a.key(BindingIdentity::PerOwner),
            b.key(BindingIdentity::PerOwner)
        );
    }
}
