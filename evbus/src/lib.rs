//! 进程内类型化事件分发引擎（evbus）
//!
//! 调用方提交任意类型的事件，总线把它交给此前绑定到该事件类型的处理器：
//! - 绑定（`binding`）：事件类型、所属实例与处理器入口的不可变描述
//! - 路由表（`registry`）：事件类型到绑定集合的线程安全映射，注册幂等
//! - 总线（`event_bus` / `simple_event_bus`）：同步分发在调用线程执行并吞掉处理器失败，
//!   异步分发交给工作池执行并把失败交给调用方
//! - 发现（`listener`）：监听者声明自身处理器的协议，可由 `#[listeners]` 宏生成
//!
//! 本 crate 仅做进程内投递，不涉及持久化、重放或跨进程传输。
//!
//! 典型用法：
//! 1. 在监听者类型的 `impl` 块上标注 `#[listeners]`，在处理方法上标注 `#[listener]`；
//! 2. 通过 `EventBus::register_listeners` 注册实例；
//! 3. 使用 `EventBus::dispatch` 提交事件，`.await` 或 `wait()` 取回结果。
//!
pub mod binding;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod event_bus;
pub mod listener;
pub mod registry;
pub mod simple_event_bus;

mod pool;

pub use binding::{Binding, BindingIdentity, BindingKey};
pub use config::BusConfig;
pub use dispatch::{Dispatched, FailurePolicy, Mode, Outcome};
pub use error::{BusError, BusResult};
pub use event::{Event, EventKey};
pub use event_bus::EventBus;
pub use listener::{Binder, IntoHandlerResult, Listener};
pub use registry::{Registry, Snapshot};
pub use simple_event_bus::SimpleEventBus;

#[cfg(feature = "macros")]
pub use evbus_macros::{listener, listeners};

// 宏生成代码通过该路径引用依赖，调用方无需自行引入 anyhow
#[doc(hidden)]
pub mod __private {
    pub use anyhow;
}

// 允许在本 crate 内部通过 ::evbus 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::evbus 路径。
extern crate self as evbus;
