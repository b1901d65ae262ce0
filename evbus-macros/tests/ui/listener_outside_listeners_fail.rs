use evbus::listener;

struct Tick;

#[listener]
fn on_tick(_e: &Tick) {}

fn main() {
    on_tick(&Tick);
}
