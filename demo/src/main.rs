use evbus::{BusConfig, EventBus, Mode, SimpleEventBus, listeners};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Deposited {
    account: String,
    amount: i64,
}

#[derive(Debug, Clone)]
struct Withdrawn {
    account: String,
    amount: i64,
}

#[derive(Default)]
struct Balance {
    total: AtomicI64,
}

#[listeners]
impl Balance {
    #[listener]
    fn on_deposited(&self, e: &Deposited) {
        self.total.fetch_add(e.amount, Ordering::SeqCst);
    }

    #[listener]
    fn on_withdrawn(&self, e: &Withdrawn) -> anyhow::Result<()> {
        let current = self.total.load(Ordering::SeqCst);
        if current < e.amount {
            anyhow::bail!("insufficient funds on {}: {} < {}", e.account, current, e.amount);
        }
        self.total.fetch_sub(e.amount, Ordering::SeqCst);
        Ok(())
    }
}

struct AuditLog;

#[listeners]
impl AuditLog {
    #[listener]
    fn on_deposited(&self, e: &Deposited) {
        tracing::info!(account = %e.account, amount = e.amount, "deposit recorded");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let bus = SimpleEventBus::builder()
        .name("demo")
        .config(BusConfig::builder().thread_name("demo-events").build())
        .build()?;

    let balance = Arc::new(Balance::default());
    bus.register_listeners(balance.clone())?;
    bus.register_listeners(Arc::new(AuditLog))?;

    let deposit = Deposited {
        account: "acc-1".into(),
        amount: 100,
    };
    let echoed = bus.dispatch(deposit, Mode::Sync)?.await?;
    println!("sync deposit handled: {echoed:?}");

    // 同步路径：处理器失败只记录日志，结果仍是原事件
    let overdraw = Withdrawn {
        account: "acc-1".into(),
        amount: 500,
    };
    let echoed = bus.dispatch(overdraw.clone(), Mode::Sync)?.await?;
    println!("sync overdraw swallowed: {echoed:?}");

    // 异步路径：同样的失败交给调用方
    match bus.dispatch(overdraw, Mode::Async)?.await {
        Ok(e) => println!("async overdraw unexpectedly succeeded: {e:?}"),
        Err(err) => println!("async overdraw failed: {err}"),
    }

    let withdraw = Withdrawn {
        account: "acc-1".into(),
        amount: 40,
    };
    bus.dispatch(withdraw, Mode::Async)?.await?;

    println!(
        "{bus}: {} bindings, balance = {}",
        bus.registry().len(),
        balance.total.load(Ordering::SeqCst)
    );

    Ok(())
}
