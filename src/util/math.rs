#[cfg(test)]
mod tests;

/// Divides `value` by `2^n`, rounding halves up.
///
/// `n == 0` returns `value` unchanged.
#[must_use]
pub const fn round_power_of_two(value: u64, n: u32) -> u64 {
    if n == 0 {
        return value;
    }
    (value + (1 << (n - 1))) >> n
}

/// Integer `log2` of a power of two block dimension.
#[must_use]
pub const fn log2_exact(value: usize) -> u32 {
    debug_assert!(value.is_power_of_two());
    value.trailing_zeros()
}
