use evbus::{EventBus, SimpleEventBus, listeners};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::Mutex;

struct Recorder<T> {
    last: Mutex<Option<String>>,
    _tag: PhantomData<fn() -> T>,
}

#[listeners]
impl<T: 'static> Recorder<T> {
    #[listener]
    fn on_string(&self, s: &String) {
        *self.last.lock().unwrap() = Some(s.clone());
    }
}

fn main() {
    let bus = SimpleEventBus::sync_only();
    let recorder = Arc::new(Recorder::<u8> {
        last: Mutex::new(None),
        _tag: PhantomData,
    });
    bus.register_listeners(recorder.clone()).unwrap();

    let _ = bus.dispatch("x".to_string(), false).unwrap().wait().unwrap();
    assert_eq!(recorder.last.lock().unwrap().as_deref(), Some("x"));
}
