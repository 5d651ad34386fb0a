use crate::common::Amounted;

/// Sums revenue amounts and subtracts expense amounts.
pub fn balance<'a, T, I>(records: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .map(Amounted::signed_amount)
        .sum()
}
