/// Xorshift32 random number generator
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform sample in [0, 1), the `Math.random()` stand-in for impulses.
#[inline]
pub fn next_unit(state: &mut u32) -> f32 {
    // Top 24 bits fit an f32 mantissa exactly, so the result never rounds up to 1.0
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Xorshift gets stuck on zero.
pub fn seed_state(seed: u32) -> u32 {
    if seed == 0 { 0x9E37_79B9 } else { seed }
}
