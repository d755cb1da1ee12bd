use crate::Tick;

/// Returns whether tick `a` is newer than tick `b`, treating ticks as a
/// wrapping sequence. Two ticks exactly half the range apart are not ordered.
pub fn tick_greater_than(a: Tick, b: Tick) -> bool {
    let diff = a.wrapping_sub(b);
    diff != 0 && diff < 0x8000
}

pub fn tick_less_than(a: Tick, b: Tick) -> bool {
    tick_greater_than(b, a)
}
