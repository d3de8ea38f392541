//! Add/subtract helpers for counter maps.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Integer counters keyed by `K`.
pub trait IntCounter<K> {
    /// Add `amount` to the entry for `key`, inserting it if missing.
    /// Returns the new count; the entry is left unchanged on overflow.
    fn add_count(&mut self, key: K, amount: i32) -> Result<i32>;

    /// Subtract `amount` from an existing entry. Fails if the entry is
    /// missing or the result would drop below `min`.
    fn sub_count(&mut self, key: &K, amount: i32, min: i32) -> Result<i32>;

    /// Like [`sub_count`](Self::sub_count), reporting whether the result is zero.
    fn sub_count_is_zero(&mut self, key: &K, amount: i32, min: i32) -> Result<bool> {
        Ok(self.sub_count(key, amount, min)? == 0)
    }

    /// Subtract without failing. Returns false when nothing was subtracted.
    /// With `remove_zero`, an entry that reaches zero is removed.
    fn try_sub_count(&mut self, key: &K, amount: i32, min: i32, remove_zero: bool) -> bool;
}

/// Floating point counters keyed by `K`.
pub trait FloatCounter<K> {
    fn add_amount(&mut self, key: K, amount: f32);
}

fn checked_sub(current: i32, amount: i32, min: i32) -> Result<i32> {
    // widened so extreme limits cannot overflow the comparison
    let result = current as i64 - amount as i64;
    if result < min as i64 {
        return Err(Error::CounterUnderflow {
            current,
            amount,
            limit: min,
        });
    }
    // a negative amount can push the result past i32::MAX
    i32::try_from(result).map_err(|_| Error::CounterOverflow {
        current,
        amount: amount.wrapping_neg(),
    })
}

impl<K: Eq + Hash> IntCounter<K> for HashMap<K, i32> {
    fn add_count(&mut self, key: K, amount: i32) -> Result<i32> {
        let current = self.entry(key).or_insert(0);
        let updated = current.checked_add(amount).ok_or(Error::CounterOverflow {
            current: *current,
            amount,
        })?;
        *current = updated;
        Ok(updated)
    }

    fn sub_count(&mut self, key: &K, amount: i32, min: i32) -> Result<i32> {
        let current = self.get_mut(key).ok_or(Error::CounterMissing)?;
        *current = checked_sub(*current, amount, min)?;
        Ok(*current)
    }

    fn try_sub_count(&mut self, key: &K, amount: i32, min: i32, remove_zero: bool) -> bool {
        let Some(current) = self.get_mut(key) else {
            return false;
        };
        let Ok(result) = checked_sub(*current, amount, min) else {
            return false;
        };
        if remove_zero && result == 0 {
            self.remove(key);
        } else {
            *current = result;
        }
        true
    }
}

impl<K: Eq + Hash> FloatCounter<K> for HashMap<K, f32> {
    fn add_amount(&mut self, key: K, amount: f32) {
        *self.entry(key).or_insert(0.0) += amount;
    }
}
