use crate::binding::Binding;
use crate::config::BusConfig;
use crate::dispatch::{Dispatched, FailurePolicy, run_batch};
use crate::error::{BusError, BusResult};
use crate::event::{Event, EventKey};
use crate::event_bus::EventBus;
use crate::pool::WorkerPool;
use crate::registry::{Registry, Snapshot};
use bon::bon;
use std::any::type_name;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 进程内的 EventBus 实现
/// - 通过 TypeId 维护事件类型到绑定集合的路由表
/// - 异步分发使用总线独占的工作池，池按需扩缩
pub struct SimpleEventBus {
    config: BusConfig,
    registry: Registry,
    pool: Option<WorkerPool>,
}

impl SimpleEventBus {
    /// 使用默认配置创建支持异步分发的总线
    pub fn new() -> BusResult<Self> {
        Self::with_config(BusConfig::default())
    }

    /// 创建仅支持同步分发的总线（不创建工作池）
    pub fn sync_only() -> Self {
        let config = BusConfig::builder().supports_async(false).build();
        Self {
            registry: Registry::new(config.identity),
            config,
            pool: None,
        }
    }

    /// 按配置创建总线；`supports_async` 为真时构建工作池
    pub fn with_config(config: BusConfig) -> BusResult<Self> {
        let pool = if config.supports_async {
            Some(WorkerPool::new(&config)?)
        } else {
            None
        };

        Ok(Self {
            registry: Registry::new(config.identity),
            config,
            pool,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 查询某事件类型当前绑定的处理器
    pub fn handlers<E: Event>(&self) -> Snapshot {
        self.registry.lookup(EventKey::of::<E>())
    }

    /// 以闭包注册单个处理器，返回实际新增的数量
    pub fn on<E, F>(&self, handler: &'static str, f: F) -> BusResult<usize>
    where
        E: Event,
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(vec![Binding::from_fn(handler, f)])
    }

    /// 关闭工作池；之后的异步分发以 `BusError::Submission` 失败
    pub fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.shutdown();
        }
    }
}

#[bon]
impl SimpleEventBus {
    /// 构建器入口：`SimpleEventBus::builder().name(..).config(..).build()`
    ///
    /// `name` 覆盖 `config` 中的名称。
    #[builder(start_fn = builder, finish_fn = build)]
    pub fn assemble(
        #[builder(into)] name: Option<String>,
        #[builder(default)] config: BusConfig,
    ) -> BusResult<Self> {
        let config = match name {
            Some(name) => BusConfig { name, ..config },
            None => config,
        };
        Self::with_config(config)
    }
}

impl EventBus for SimpleEventBus {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supports_async(&self) -> bool {
        self.pool.is_some()
    }

    fn register(&self, bindings: Vec<Binding>) -> BusResult<usize> {
        let offered = bindings.len();
        let inserted = self.registry.register(bindings);
        tracing::debug!(
            bus = %self.config.name,
            inserted,
            skipped = offered - inserted,
            "bindings registered"
        );
        Ok(inserted)
    }

    fn dispatch_sync<E: Event>(&self, event: E) -> Dispatched<E> {
        let bindings = self.handlers::<E>();
        Dispatched::ready(run_batch(&bindings, event, FailurePolicy::Swallow).into_result())
    }

    fn dispatch_async<E: Event>(&self, event: E) -> Dispatched<E> {
        let Some(pool) = &self.pool else {
            return Dispatched::ready(Err(BusError::UnsupportedMode {
                bus: self.config.name.clone(),
            }));
        };

        let bindings = self.handlers::<E>();
        let submitted = pool.submit(type_name::<E>(), move || {
            run_batch(&bindings, event, FailurePolicy::Propagate).into_result()
        });

        match submitted {
            Ok(rx) => Dispatched::pending(rx),
            Err(error) => Dispatched::ready(Err(error)),
        }
    }
}

impl PartialEq for SimpleEventBus {
    fn eq(&self, other: &Self) -> bool {
        self.config.name.eq_ignore_ascii_case(&other.config.name)
    }
}

impl Eq for SimpleEventBus {}

impl Hash for SimpleEventBus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.config.name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for SimpleEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventBus{{{}}}", self.config.name)
    }
}

impl fmt::Debug for SimpleEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleEventBus")
            .field("name", &self.config.name)
            .field("supports_async", &self.supports_async())
            .field("bindings", &self.registry.len())
            .finish()
    }
}
