use evbus::listeners;

struct Tick;
struct Clock;

#[listeners]
impl Clock {
    #[listener]
    async fn on_tick(&self, _e: &Tick) {}
}

fn main() {
    let _ = (Clock, Tick);
}
