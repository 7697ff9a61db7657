//! Utility math functions.

use crate::{ChronoError, ChronoResult};

/// Floored division, rounding toward negative infinity.
#[inline]
pub(crate) const fn floor_div(dividend: i64, divisor: i64) -> i64 {
    dividend.div_euclid(divisor)
}

/// Floored modulo; the result has the sign of the divisor.
#[inline]
pub(crate) const fn floor_mod(dividend: i64, divisor: i64) -> i64 {
    dividend.rem_euclid(divisor)
}

/// Floored division and modulo in one step.
#[inline]
pub(crate) const fn div_mod(dividend: i64, divisor: i64) -> (i64, i64) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}

#[inline]
pub(crate) fn checked_add(a: i64, b: i64) -> ChronoResult<i64> {
    a.checked_add(b)
        .ok_or_else(|| ChronoError::range().with_message("addition overflowed i64"))
}

#[inline]
pub(crate) fn checked_sub(a: i64, b: i64) -> ChronoResult<i64> {
    a.checked_sub(b)
        .ok_or_else(|| ChronoError::range().with_message("subtraction overflowed i64"))
}

#[inline]
pub(crate) fn checked_mul(a: i64, b: i64) -> ChronoResult<i64> {
    a.checked_mul(b)
        .ok_or_else(|| ChronoError::range().with_message("multiplication overflowed i64"))
}
