use evbus::listeners;

#[listeners]
struct Clock;

fn main() {}
