//! Reference implementations
//!
//! Plain, unrestricted versions of every puzzle. The checker treats these as
//! the oracle, so they favour obviousness over speed.

pub fn copy_lsb(x: i64) -> i64 {
    if x & 1 != 0 { -1 } else { 0 }
}

pub fn divide_power2(x: i64, n: i64) -> i64 {
    // i64 division already truncates toward zero
    x / (1i64 << n)
}

pub fn get_byte(x: i64, n: i64) -> i64 {
    x.to_le_bytes()[n as usize] as i64
}

pub fn any_odd_bit(x: i64) -> i64 {
    for i in (1..64).step_by(2) {
        if x & (1i64 << i) != 0 {
            return 1;
        }
    }
    0
}

pub fn conditional(x: i64, y: i64, z: i64) -> i64 {
    if x != 0 { y } else { z }
}

pub fn subtraction_ok(x: i64, y: i64) -> i64 {
    let wide = x as i128 - y as i128;
    (wide == (wide as i64) as i128) as i64
}

pub fn bit_mask(highbit: i64, lowbit: i64) -> i64 {
    let mut result = 0i64;
    for i in lowbit..=highbit {
        result |= 1i64 << i;
    }
    result
}

pub fn rotate_left(x: i64, n: i64) -> i64 {
    let mut u = x as u64;
    for _ in 0..n {
        let msb = u >> 63;
        u = (u << 1) | msb;
    }
    u as i64
}

pub fn true_five_eighths(x: i64) -> i64 {
    ((x as i128 * 5) / 8) as i64
}

pub fn bit_count(x: i64) -> i64 {
    (0..64).map(|i| (x >> i) & 1).sum()
}

pub fn bit_parity(x: i64) -> i64 {
    (0..64).fold(0, |acc, i| acc ^ ((x >> i) & 1))
}
