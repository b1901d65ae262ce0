use evbus::listeners;

struct Clock;

#[listeners]
impl Default for Clock {
    fn default() -> Self {
        Clock
    }
}

fn main() {
    let _ = Clock;
}
