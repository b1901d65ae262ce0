use evbus::{EventBus, SimpleEventBus, listeners};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
struct Rejected;

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("rejected")
    }
}

impl std::error::Error for Rejected {}

struct Ping(u32);

#[derive(Default)]
struct Mixed {
    hits: AtomicUsize,
}

#[listeners]
impl Mixed {
    #[listener]
    fn on_ping(&self, ping: &Ping) {
        self.hits.fetch_add(ping.0 as usize, Ordering::SeqCst);
    }

    #[listener]
    fn on_number(&self, n: &u8) -> Result<(), Rejected> {
        if *n == 0 {
            return Err(Rejected);
        }
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    #[evbus::listener]
    fn on_text(&self, _t: &&'static str) -> anyhow::Result<()> {
        Ok(())
    }
}

fn main() {
    let bus = SimpleEventBus::new().unwrap();
    let mixed = Arc::new(Mixed::default());
    assert_eq!(bus.register_listeners(mixed.clone()).unwrap(), 3);

    let _ = bus.dispatch(Ping(2), false).unwrap().wait().unwrap();
    assert_eq!(mixed.hits.load(Ordering::SeqCst), 2);

    let err = bus.dispatch(0_u8, true).unwrap().wait().unwrap_err();
    assert!(err.to_string().contains("rejected"));
    assert_eq!(mixed.hits.load(Ordering::SeqCst), 2);
}
