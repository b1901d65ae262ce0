use crate::binding::BindingIdentity;
use bon::Builder;
use std::time::Duration;

/// 事件总线配置
#[derive(Clone, Debug, Builder)]
pub struct BusConfig {
    /// 总线名称，相等性比较时忽略 ASCII 大小写
    #[builder(into, default = "SimpleEventBus".to_string())]
    pub name: String,
    /// 是否支持异步分发；关闭时不创建工作池
    #[builder(default = true)]
    pub supports_async: bool,
    /// 绑定去重口径
    #[builder(default)]
    pub identity: BindingIdentity,
    /// 工作线程名
    #[builder(into, default = "evbus-worker".to_string())]
    pub thread_name: String,
    /// 工作池的线程上限（按需创建，空闲回收）
    #[builder(default = 512)]
    pub max_blocking_threads: usize,
    /// 空闲线程保活时长
    #[builder(default = Duration::from_secs(60))]
    pub keep_alive: Duration,
    /// 在途异步批次上限；`None` 表示不限（无背压）
    pub max_pending: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
