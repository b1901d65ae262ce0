use evbus::{EventBus, Mode, SimpleEventBus, listeners};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct Greeter {
    seen: AtomicBool,
}

#[listeners]
impl Greeter {
    #[listener]
    fn on_string(&self, _s: &String) -> anyhow::Result<()> {
        self.seen.store(true, Ordering::SeqCst);
        Ok(())
    }

    // 未标注的方法不参与注册
    #[allow(dead_code)]
    fn helper(&self, _s: &String) {}
}

fn main() {
    let bus = SimpleEventBus::sync_only();
    let greeter = Arc::new(Greeter::default());

    assert_eq!(bus.register_listeners(greeter.clone()).unwrap(), 1);

    let out = bus
        .dispatch("Hello World".to_string(), Mode::Sync)
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(out, "Hello World");
    assert!(greeter.seen.load(Ordering::SeqCst));
}
