//! Deterministic numeric resolution.
//!
//! Every payout, fine, and amplified effect goes through
//! [`apply_modifiers`], so the modifier order is fixed in exactly one place:
//! the role bonus applies first, then the global event bonus, each
//! multiplicatively, each floored to an integer before the next step.

/// Apply percentage modifiers to a base amount.
///
/// `floor(floor(base * (100 + role_pct) / 100) * (100 + event_pct) / 100)`.
/// Flooring uses euclidean division so negative intermediate values still
/// round toward negative infinity.
#[must_use]
pub fn apply_modifiers(base: i64, role_bonus_pct: i64, event_bonus_pct: i64) -> i64 {
    let with_role = (base * (100 + role_bonus_pct)).div_euclid(100);
    (with_role * (100 + event_bonus_pct)).div_euclid(100)
}

/// Apply a single amplification percentage (ultimates).
#[must_use]
pub fn amplify(base: i64, amplify_pct: i64) -> i64 {
    apply_modifiers(base, amplify_pct, 0)
}
