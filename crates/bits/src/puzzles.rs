//! Bit Puzzles
//!
//! Each puzzle is a straight-line function over 64-bit two's-complement
//! integers. Bodies use only the operators `! ~ & ^ | + << >>`:
//!
//! | C    | here                  |
//! |------|-----------------------|
//! | `!x` | [`lnot`]              |
//! | `~x` | `!x`                  |
//! | `+`  | `wrapping_add`        |
//! | `<<` | `<<` / `wrapping_shl` |
//! | `>>` | `>>` (arithmetic)     |
//!
//! No branches, loops, comparisons (besides the one inside `lnot`) or
//! constants above `0xFF`. Shift amounts outside `0..=63` wrap, which only
//! matters for arguments outside each puzzle's documented range.
//!
//! Operator budgets and ratings live in [`crate::catalog`].

/// Logical not: 1 if `x` is zero, else 0
#[inline(always)]
pub fn lnot(x: i64) -> i64 {
    (x == 0) as i64
}

#[inline(always)]
fn shl(x: i64, n: i64) -> i64 {
    x.wrapping_shl(n as u32)
}

#[inline(always)]
fn sar(x: i64, n: i64) -> i64 {
    x.wrapping_shr(n as u32)
}

// ============================================================================
// Rating 2
// ============================================================================

/// Set every bit of the result to the least significant bit of `x`
///
/// `copy_lsb(5) == -1`, `copy_lsb(6) == 0`
pub fn copy_lsb(x: i64) -> i64 {
    (x << 63) >> 63
}

/// `x / 2^n` rounded toward zero, for `0 <= n <= 62`
///
/// `divide_power2(15, 1) == 7`, `divide_power2(-33, 4) == -2`
pub fn divide_power2(x: i64, n: i64) -> i64 {
    // Negative values need a bias of 2^n - 1 before the shift
    let sign = x >> 63;
    let bias = sign & shl(1, n).wrapping_add(!0);
    sar(x.wrapping_add(bias), n)
}

/// Extract byte `n` of `x`, 0 being the least significant
///
/// `get_byte(0x12345678, 1) == 0x56`
pub fn get_byte(x: i64, n: i64) -> i64 {
    sar(x, n << 3) & 0xFF
}

/// 1 if any odd-numbered bit of `x` is set
///
/// `any_odd_bit(0x5) == 0`, `any_odd_bit(0x7) == 1`
pub fn any_odd_bit(x: i64) -> i64 {
    let mask = 0xAA | (0xAA << 8) | (0xAA << 16) | (0xAA << 24);
    let odd = x & (mask | (mask << 32));
    lnot(lnot(odd))
}

// ============================================================================
// Rating 3
// ============================================================================

/// Same as `x ? y : z`
///
/// `conditional(2, 4, 5) == 4`
pub fn conditional(x: i64, y: i64, z: i64) -> i64 {
    // All ones when x != 0, all zeros otherwise
    let mask = sar(shl(lnot(lnot(x)), 63), 63);
    (y & mask) | (z & !mask)
}

/// 1 if `x - y` can be computed without overflow
///
/// `subtraction_ok(i64::MIN, i64::MIN) == 1`,
/// `subtraction_ok(i64::MIN, 0x7000000000000000) == 0`
pub fn subtraction_ok(x: i64, y: i64) -> i64 {
    let diff = x.wrapping_add((!y).wrapping_add(1));
    let sx = (x >> 63) & 1;
    let sy = (y >> 63) & 1;
    let sd = (diff >> 63) & 1;
    // Overflow: operands differ in sign and the result sign follows y
    let overflow = (sx & !sy & !sd) | (!sx & sy & sd);
    !overflow & 1
}

/// Mask of ones from bit `lowbit` up to bit `highbit`, both in `0..=63`
///
/// Zero when `lowbit > highbit`. `bit_mask(5, 3) == 0x38`
pub fn bit_mask(highbit: i64, lowbit: i64) -> i64 {
    // Two shifts so that highbit == 63 clears everything
    let above = shl(shl(!0, highbit), 1);
    let from_low = shl(!0, lowbit);
    !above & from_low
}

/// Rotate `x` left by `n`, for `0 <= n <= 63`
///
/// `rotate_left(0x8765432187654321, 4) == 0x7654321876543218`
pub fn rotate_left(x: i64, n: i64) -> i64 {
    let left = shl(x, n);
    // 64 - n; for n == 0 the amount wraps to 0 and the mask below is empty
    let right = sar(x, 64i64.wrapping_add((!n).wrapping_add(1)));
    let right = right & !shl(!0, n);
    left | right
}

// ============================================================================
// Rating 4
// ============================================================================

/// `x * 5 / 8` rounded toward zero, without intermediate overflow
///
/// `true_five_eighths(11) == 6`, `true_five_eighths(-9) == -5`,
/// `true_five_eighths(0x3000000000000000) == 0x1E00000000000000`
pub fn true_five_eighths(x: i64) -> i64 {
    let sign = x >> 63;
    let eighths = x >> 3;
    let low = x & 0x7;
    // 5 * low, plus the rounding bias for negative values, divided by 8
    let carry = (sign & 0x7).wrapping_add((low << 2).wrapping_add(low)) >> 3;
    eighths.wrapping_add(eighths << 2).wrapping_add(carry)
}

/// Number of 1 bits in `x`
///
/// `bit_count(5) == 2`, `bit_count(7) == 3`
pub fn bit_count(x: i64) -> i64 {
    let mut m1 = 0x55 | (0x55 << 8);
    let mut m2 = 0x33 | (0x33 << 8);
    let mut m4 = 0x0F | (0x0F << 8);
    m1 |= m1 << 16;
    m2 |= m2 << 16;
    m4 |= m4 << 16;
    m1 |= m1 << 32;
    m2 |= m2 << 32;
    m4 |= m4 << 32;

    // Pairwise sums in 2-, 4- then 8-bit fields
    let mut c = (x & m1).wrapping_add((x >> 1) & m1);
    c = (c & m2).wrapping_add((c >> 2) & m2);
    c = (c & m4).wrapping_add((c >> 4) & m4);
    c = c.wrapping_add(c >> 8);
    c = c.wrapping_add(c >> 16);
    c = c.wrapping_add(c >> 32);
    c & 0x7F
}

/// 1 if `x` contains an odd number of 0 bits
///
/// With 64 bits this equals the parity of the 1 bits.
/// `bit_parity(5) == 0`, `bit_parity(7) == 1`
pub fn bit_parity(x: i64) -> i64 {
    let mut p = x;
    p ^= p >> 32;
    p ^= p >> 16;
    p ^= p >> 8;
    p ^= p >> 4;
    p ^= p >> 2;
    p ^= p >> 1;
    p & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_lsb() {
        assert_eq!(copy_lsb(5), -1);
        assert_eq!(copy_lsb(6), 0);
        assert_eq!(copy_lsb(i64::MIN), 0);
        assert_eq!(copy_lsb(i64::MAX), -1);
    }

    #[test]
    fn test_divide_power2() {
        assert_eq!(divide_power2(15, 1), 7);
        assert_eq!(divide_power2(-33, 4), -2);
        assert_eq!(divide_power2(-1, 62), 0);
        assert_eq!(divide_power2(i64::MIN, 62), -2);
        assert_eq!(divide_power2(-7, 0), -7);
    }

    #[test]
    fn test_get_byte() {
        assert_eq!(get_byte(0x12345678, 1), 0x56);
        assert_eq!(get_byte(-1, 7), 0xFF);
        assert_eq!(get_byte(0x0102030405060708, 7), 0x01);
        assert_eq!(get_byte(0x0102030405060708, 0), 0x08);
    }

    #[test]
    fn test_any_odd_bit() {
        assert_eq!(any_odd_bit(0x5), 0);
        assert_eq!(any_odd_bit(0x7), 1);
        assert_eq!(any_odd_bit(i64::MIN), 1);
        assert_eq!(any_odd_bit(0x5555555555555555), 0);
    }

    #[test]
    fn test_conditional() {
        assert_eq!(conditional(2, 4, 5), 4);
        assert_eq!(conditional(0, 4, 5), 5);
        assert_eq!(conditional(i64::MIN, -1, 0), -1);
        assert_eq!(conditional(-1, 0, 7), 0);
        assert_eq!(conditional(1, i64::MIN, i64::MAX), i64::MIN);
    }

    #[test]
    fn test_subtraction_ok() {
        assert_eq!(subtraction_ok(i64::MIN, i64::MIN), 1);
        assert_eq!(subtraction_ok(i64::MIN, 0x7000000000000000), 0);
        assert_eq!(subtraction_ok(i64::MAX, -1), 0);
        assert_eq!(subtraction_ok(0, i64::MIN), 0);
        assert_eq!(subtraction_ok(-1, i64::MIN), 1);
        assert_eq!(subtraction_ok(3, 5), 1);
    }

    #[test]
    fn test_bit_mask() {
        assert_eq!(bit_mask(5, 3), 0x38);
        assert_eq!(bit_mask(63, 0), -1);
        assert_eq!(bit_mask(3, 5), 0);
        assert_eq!(bit_mask(63, 63), i64::MIN);
        assert_eq!(bit_mask(0, 0), 1);
    }

    #[test]
    fn test_rotate_left() {
        assert_eq!(
            rotate_left(0x8765432187654321u64 as i64, 4),
            0x7654321876543218
        );
        assert_eq!(rotate_left(0x1234, 0), 0x1234);
        assert_eq!(rotate_left(i64::MIN, 1), 1);
        assert_eq!(rotate_left(1, 63), i64::MIN);
    }

    #[test]
    fn test_true_five_eighths() {
        assert_eq!(true_five_eighths(11), 6);
        assert_eq!(true_five_eighths(-9), -5);
        assert_eq!(true_five_eighths(0x3000000000000000), 0x1E00000000000000);
        assert_eq!(true_five_eighths(-1), 0);
        assert_eq!(true_five_eighths(-8), -5);
    }

    #[test]
    fn test_bit_count() {
        assert_eq!(bit_count(5), 2);
        assert_eq!(bit_count(7), 3);
        assert_eq!(bit_count(0), 0);
        assert_eq!(bit_count(-1), 64);
        assert_eq!(bit_count(i64::MIN), 1);
    }

    #[test]
    fn test_bit_parity() {
        assert_eq!(bit_parity(5), 0);
        assert_eq!(bit_parity(7), 1);
        assert_eq!(bit_parity(-1), 0);
        assert_eq!(bit_parity(i64::MIN), 1);
    }

    #[test]
    fn test_lnot() {
        assert_eq!(lnot(0), 1);
        assert_eq!(lnot(42), 0);
        assert_eq!(lnot(i64::MIN), 0);
    }
}
