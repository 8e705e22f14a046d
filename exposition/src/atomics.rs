//! Atomic floating-point storage used by every metric kind.
//!
//! The standard library has no atomic float, so values are kept as their IEEE-754 bit pattern
//! inside an atomic 64-bit integer.  Plain loads and stores map directly onto the integer
//! operations, while compound updates (add/subtract) run a compare-and-exchange loop over the bit
//! pattern.
//!
//! Further, we always require an atomic integer of 64 bits regardless of whether the standard
//! library exposes one for the target architecture, so 32-bit targets fall back to
//! `portable-atomic`.

use std::fmt;
use std::sync::atomic::Ordering;

#[cfg(target_pointer_width = "32")]
use portable_atomic::AtomicU64;
#[cfg(not(target_pointer_width = "32"))]
use std::sync::atomic::AtomicU64;

/// An atomic `f64`.
///
/// Reads and stores never block.  [`add`](AtomicF64::add) and [`sub`](AtomicF64::sub) retry a
/// weak compare-and-exchange until it succeeds, so concurrent updates are never lost.  Under
/// contention a single caller may retry several times, but every failed attempt means another
/// caller's update landed, so the system as a whole always makes progress.
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// Creates a new `AtomicF64` holding `value`.
    pub fn new(value: f64) -> Self {
        Self { bits: AtomicU64::new(value.to_bits()) }
    }

    /// Reads the current value.
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Unconditionally replaces the current value.
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Adds `delta` to the current value.
    pub fn add(&self, delta: f64) {
        self.update(|current| current + delta);
    }

    /// Subtracts `delta` from the current value.
    pub fn sub(&self, delta: f64) {
        self.update(|current| current - delta);
    }

    fn update<F>(&self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let target = f(f64::from_bits(current)).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                target,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for AtomicF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicF64").field(&self.load()).finish()
    }
}
