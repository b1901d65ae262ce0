use evbus::listeners;

struct Tick;
struct Clock;

#[listeners]
impl Clock {
    #[listener]
    fn on_tick(&self, _e: Tick) {}

    #[listener]
    fn on_tock(&self, _e: &mut Tick) {}
}

fn main() {
    let _ = (Clock, Tick);
}
