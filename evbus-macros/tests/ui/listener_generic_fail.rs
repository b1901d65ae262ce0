use evbus::listeners;

struct Tick;
struct Clock;

#[listeners]
impl Clock {
    #[listener]
    fn on_tick<T>(&self, _e: &Tick) {}
}

fn main() {
    let _ = (Clock, Tick);
}
