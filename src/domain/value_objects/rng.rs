//! # Deterministic Random Stream
//!
//! Seeded pseudo-random generator whose state is an explicit value.
//!
//! [`RngState`] never mutates in place: every draw consumes a state and
//! returns the successor, so two streams seeded identically yield identical
//! sequences indefinitely and a state can be handed to another thread
//! without sharing anything.
//!
//! # Construction
//!
//! ```text
//! seed ──FNV-1a (32 bit)──▶ state₀
//! stateₙ₊₁ = (1664525 · stateₙ + 1013904223) mod 2³²
//! sampleₙ₊₁ = stateₙ₊₁ / 2³²            ∈ [0, 1)
//! ```
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::value_objects::rng::RngState;
//!
//! let a = RngState::from_seed(42);
//! let b = RngState::from_seed(42);
//!
//! let (x, a) = a.next_uniform();
//! let (y, b) = b.next_uniform();
//! assert_eq!(x, y);
//! assert_eq!(a, b);
//! assert!((0.0..1.0).contains(&x));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// LCG multiplier (Numerical Recipes).
pub const LCG_MULTIPLIER: u32 = 1_664_525;

/// LCG increment (Numerical Recipes).
pub const LCG_INCREMENT: u32 = 1_013_904_223;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 32-bit FNV-1a hash of a byte string.
#[must_use]
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// State of a deterministic uniform stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RngState(u32);

impl RngState {
    /// Seeds a stream from an integer seed.
    ///
    /// The seed's decimal representation is hashed, so `from_seed(7)` and
    /// `from_label("7")` start the same stream.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::from_label(&seed.to_string())
    }

    /// Seeds a stream from an arbitrary label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self(fnv1a_32(label.as_bytes()))
    }

    /// Creates a state from a raw 32-bit value.
    #[inline]
    #[must_use]
    pub const fn from_raw(state: u32) -> Self {
        Self(state)
    }

    /// Returns the raw 32-bit state.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Draws a uniform sample in `[0, 1)` and returns it with the next state.
    #[inline]
    #[must_use]
    pub fn next_uniform(self) -> (f64, Self) {
        let next = LCG_MULTIPLIER.wrapping_mul(self.0).wrapping_add(LCG_INCREMENT);
        (f64::from(next) / TWO_POW_32, Self(next))
    }

    /// Jumps the stream ahead by `steps` draws in `O(log steps)`.
    ///
    /// `state.advance(n)` is the state reached after `n` calls to
    /// [`next_uniform`](Self::next_uniform).
    #[must_use]
    pub fn advance(self, steps: u64) -> Self {
        let mut remaining = steps;
        let (mut acc_mult, mut acc_plus) = (1u32, 0u32);
        let (mut cur_mult, mut cur_plus) = (LCG_MULTIPLIER, LCG_INCREMENT);

        while remaining > 0 {
            if remaining & 1 == 1 {
                acc_mult = acc_mult.wrapping_mul(cur_mult);
                acc_plus = acc_plus.wrapping_mul(cur_mult).wrapping_add(cur_plus);
            }
            cur_plus = cur_mult.wrapping_add(1).wrapping_mul(cur_plus);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
            remaining >>= 1;
        }

        Self(acc_mult.wrapping_mul(self.0).wrapping_add(acc_plus))
    }
}

impl fmt::Display for RngState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RngState({:#010x})", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draw(mut state: RngState, n: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let (u, next) = state.next_uniform();
            out.push(u);
            state = next;
        }
        out
    }

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn lcg_step_matches_formula() {
        let (u, next) = RngState::from_raw(1).next_uniform();
        assert_eq!(next.raw(), 1_015_568_748);
        assert_eq!(u, 1_015_568_748.0 / TWO_POW_32);
    }

    #[test]
    fn seed_and_label_agree() {
        assert_eq!(RngState::from_seed(42), RngState::from_label("42"));
    }

    #[test]
    fn same_seed_same_sequence() {
        assert_eq!(
            draw(RngState::from_seed(7), 500),
            draw(RngState::from_seed(7), 500)
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let a = draw(RngState::from_seed(1), 16);
        let b = draw(RngState::from_seed(2), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn advance_zero_is_identity() {
        let state = RngState::from_seed(99);
        assert_eq!(state.advance(0), state);
    }

    #[test]
    fn display_shows_hex_state() {
        assert_eq!(RngState::from_raw(255).to_string(), "RngState(0x000000ff)");
    }

    proptest! {
        #[test]
        fn samples_are_in_unit_interval(seed in any::<u64>()) {
            for u in draw(RngState::from_seed(seed), 64) {
                prop_assert!((0.0..1.0).contains(&u));
            }
        }

        #[test]
        fn advance_matches_sequential_steps(raw in any::<u32>(), steps in 0u64..2_000) {
            let start = RngState::from_raw(raw);
            let mut stepped = start;
            for _ in 0..steps {
                stepped = stepped.next_uniform().1;
            }
            prop_assert_eq!(start.advance(steps), stepped);
        }

        #[test]
        fn advance_composes(raw in any::<u32>(), a in 0u64..10_000, b in 0u64..10_000) {
            let start = RngState::from_raw(raw);
            prop_assert_eq!(start.advance(a).advance(b), start.advance(a + b));
        }
    }
}
