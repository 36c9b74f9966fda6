//! Money representation.
//!
//! All amounts are integers in the smallest currency unit (e.g. paise).
//! Running sums widen to `i128` so a long ledger cannot overflow mid-fold.

/// Amount in the smallest currency unit.
pub type Money = i64;

/// Sum an iterator of amounts without intermediate overflow.
pub fn sum_amounts<I>(amounts: I) -> i128
where
    I: IntoIterator<Item = Money>,
{
    amounts.into_iter().map(|a| a as i128).sum()
}

/// Clamp a widened sum back to `Money`, saturating at the i64 bounds.
pub fn narrow_saturating(total: i128) -> Money {
    if total > Money::MAX as i128 {
        Money::MAX
    } else if total < Money::MIN as i128 {
        Money::MIN
    } else {
        total as Money
    }
}
