use evbus::listeners;

struct Tick;
struct Clock;

#[listeners]
impl Clock {
    #[listener]
    fn on_tick(&mut self, _e: &Tick) {}

    #[listener]
    fn on_tock(_e: &Tick) {}
}

fn main() {
    let _ = (Clock, Tick);
}
