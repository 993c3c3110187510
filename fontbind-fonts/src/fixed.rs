//! 26.6 and 16.16 fixed-point helpers.
//!
//! Metrics exchanged with callers use the rasterizer's fixed-point units:
//! 26.6 (1/64 pixel) for pixel distances and 16.16 for scale factors and
//! linear advances.

/// One pixel in 26.6 units.
pub const ONE_26_6: i64 = 64;

/// 1.0 in 16.16 units.
pub const ONE_16_16: i64 = 1 << 16;

/// `FT_MulFix`: `(a * b) / 0x10000`, rounded to nearest.
pub fn mul_fix(a: i64, b: i64) -> i64 {
    let product = a as i128 * b as i128;
    let rounded = if product >= 0 {
        (product + 0x8000) >> 16
    } else {
        -((-product + 0x8000) >> 16)
    };
    rounded as i64
}

/// `FT_DivFix`: `(a * 0x10000) / b`, rounded to nearest. Division by zero
/// saturates the way FreeType does.
pub fn div_fix(a: i64, b: i64) -> i64 {
    if b == 0 {
        return if a < 0 { -0x7FFF_FFFF } else { 0x7FFF_FFFF };
    }
    let negative = (a < 0) != (b < 0);
    let (a, b) = (a.unsigned_abs() as i128, b.unsigned_abs() as i128);
    let q = ((a << 16) + (b >> 1)) / b;
    if negative { -(q as i64) } else { q as i64 }
}

/// Round a 26.6 value down to a whole pixel.
pub fn pix_floor(x: i64) -> i64 {
    x & !63
}

/// Round a 26.6 value to the nearest whole pixel.
pub fn pix_round(x: i64) -> i64 {
    pix_floor(x.saturating_add(32))
}

/// Round a 26.6 value up to a whole pixel.
pub fn pix_ceil(x: i64) -> i64 {
    pix_floor(x.saturating_add(63))
}

/// Convert a float pixel distance to 26.6.
pub fn f32_to_26_6(value: f32) -> i64 {
    (value * ONE_26_6 as f32).round() as i64
}

/// Convert a 26.6 value to whole pixels, rounding to nearest.
pub fn to_pixels(x: i64) -> i64 {
    pix_round(x) >> 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_fix_rounds_to_nearest() {
        assert_eq!(mul_fix(1000, ONE_16_16), 1000);
        assert_eq!(mul_fix(1000, ONE_16_16 / 2), 500);
        assert_eq!(mul_fix(3, ONE_16_16 / 2), 2);
        assert_eq!(mul_fix(-3, ONE_16_16 / 2), -2);
    }

    #[test]
    fn test_div_fix() {
        assert_eq!(div_fix(1, 2), ONE_16_16 / 2);
        assert_eq!(div_fix(32 * 64, 2048), ONE_16_16);
        assert_eq!(div_fix(-1, 2), -(ONE_16_16 / 2));
        assert_eq!(div_fix(5, 0), 0x7FFF_FFFF);
    }

    #[test]
    fn test_pixel_rounding() {
        assert_eq!(pix_floor(100), 64);
        assert_eq!(pix_round(95), 64);
        assert_eq!(pix_round(96), 128);
        assert_eq!(pix_ceil(65), 128);
        assert_eq!(pix_floor(-1), -64);
        assert_eq!(to_pixels(100), 2);
        assert_eq!(pix_round(i64::MAX), i64::MAX & !63);
        assert_eq!(pix_ceil(i64::MAX - 10), i64::MAX & !63);
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(f32_to_26_6(1.5), 96);
    }
}
