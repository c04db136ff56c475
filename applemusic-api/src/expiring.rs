//! A single-slot value with an absolute expiry instant.
//!
//! Time is read from [`tokio::time::Instant`], so a paused test runtime can
//! move the clock with `tokio::time::advance`.

use std::time::Duration;
use tokio::time::Instant;

// Lifetimes past the representable range are clamped to roughly a century.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Zero or one value of type `T`, live until its expiry instant passes.
///
/// There is no background sweep: a stale value is dropped on the next
/// [`get`](Self::get). The slot is not synchronized; the owner guards it.
#[derive(Debug)]
pub struct Expiring<T> {
    slot: Option<(T, Instant)>,
}

impl<T> Expiring<T> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Store `value`, live for `ttl` from now. A zero `ttl` stores a value
    /// that is already expired.
    pub fn set(&mut self, value: T, ttl: Duration) {
        let now = Instant::now();
        let at = now.checked_add(ttl).unwrap_or(now + MAX_TTL);
        self.slot = Some((value, at));
    }

    /// Like [`set`](Self::set) with the lifetime in (fractional) seconds.
    ///
    /// Negative, NaN and infinite inputs are treated as zero.
    pub fn set_secs(&mut self, value: T, secs: f64) {
        let ttl = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        self.set(value, ttl);
    }

    /// Empty the slot.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Instant at which the stored value stops being live, if any.
    pub fn expires_at(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(_, at)| *at)
    }
}

impl<T: Clone> Expiring<T> {
    /// Return the stored value if now is strictly before its expiry.
    ///
    /// An expired value is cleared as a side effect.
    pub fn get(&mut self) -> Option<T> {
        match &self.slot {
            Some((value, at)) if Instant::now() < *at => Some(value.clone()),
            Some(_) => {
                self.slot = None;
                None
            }
            None => None,
        }
    }
}

impl<T> Default for Expiring<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn live_until_ttl_elapses() {
        let mut slot = Expiring::new();
        slot.set("v", Duration::from_secs(10));

        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert_eq!(slot.get(), Some("v"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(slot.get(), None);
        assert!(slot.expires_at().is_none(), "stale slot is cleared on read");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_is_never_live() {
        let mut slot = Expiring::new();
        slot.set(1, Duration::ZERO);
        assert_eq!(slot.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn set_secs_clamps_bad_input() {
        let mut slot = Expiring::new();
        slot.set_secs(1, -5.0);
        assert_eq!(slot.get(), None);
        slot.set_secs(2, f64::NAN);
        assert_eq!(slot.get(), None);
        slot.set_secs(3, 0.5);
        assert_eq!(slot.get(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_and_clear_empties() {
        let mut slot = Expiring::new();
        slot.set("old", Duration::from_secs(60));
        slot.set("new", Duration::from_secs(60));
        assert_eq!(slot.get(), Some("new"));

        slot.clear();
        assert_eq!(slot.get(), None);
    }
}
