use evbus::listeners;

struct Tick;
struct Clock;

#[listeners]
impl Clock {
    #[listener]
    fn on_nothing(&self) {}

    #[listener]
    fn on_pair(&self, _a: &Tick, _b: &Tick) {}
}

fn main() {
    let _ = (Clock, Tick);
}
