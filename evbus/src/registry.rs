//! 路由表（Registry）
//!
//! 事件类型 → 绑定集合 的线程安全多值映射：
//! - 注册幂等：桶内已有等价绑定（按 `BindingIdentity` 判定）时跳过；
//! - 写者串行：整批注册持有同一把写锁；
//! - 桶按写时复制整体替换，读者拿到的快照不会看到半插入状态。
//!
use crate::binding::{Binding, BindingIdentity};
use crate::event::EventKey;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::{Arc, Mutex};

/// 某一事件类型在查询时刻的绑定快照
pub type Snapshot = Arc<[Binding]>;

pub struct Registry {
    identity: BindingIdentity,
    buckets: DashMap<TypeId, Snapshot>,
    write_lock: Mutex<()>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(BindingIdentity::default())
    }
}

impl Registry {
    pub fn new(identity: BindingIdentity) -> Self {
        Self {
            identity,
            buckets: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// 注册一批绑定，返回实际新增的数量
    pub fn register(&self, bindings: impl IntoIterator<Item = Binding>) -> usize {
        // 锁内只做内存操作，中毒时沿用内部状态
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut inserted = 0;
        for binding in bindings {
            let key = binding.key(self.identity);
            let event = binding.event_key();

            let mut entry = self.buckets.entry(event.id()).or_insert_with(|| Arc::from([]));
            if entry.iter().any(|b| b.key(self.identity) == key) {
                tracing::debug!(binding = %binding, "binding already registered, skipped");
                continue;
            }

            let mut next: Vec<Binding> = Vec::with_capacity(entry.len() + 1);
            next.extend(entry.iter().cloned());
            next.push(binding);
            *entry = Arc::from(next);
            inserted += 1;
        }

        inserted
    }

    /// 查询某事件类型的绑定；无绑定时返回空快照
    pub fn lookup(&self, event: EventKey) -> Snapshot {
        self.buckets
            .get(&event.id())
            .map(|bucket| bucket.clone())
            .unwrap_or_else(|| Arc::from([]))
    }

    /// 已注册绑定总数
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 至少有一个绑定的事件类型名列表（只读视图）
    pub fn event_types(&self) -> Vec<&'static str> {
        self.buckets
            .iter()
            .filter_map(|bucket| bucket.first().map(|b| b.event_key().name()))
            .collect()
    }
}
