//! Angle-to-count conversion.
//!
//! The chip splits each 20 ms frame into 4096 counts. A servo's pulse always rises at count 0,
//! so positioning a servo means choosing the count at which the pulse falls. [`encode`] maps an
//! angle onto that count through a channel's [`PulseRange`].

use crate::PulseRange;

/// Length of one PWM frame at 50 Hz (µs).
pub const FRAME_PERIOD_US: u32 = 20_000;

/// Counts per frame (12-bit counter).
pub const COUNTS_PER_FRAME: u32 = 4_096;

/// Largest count a 12-bit register can hold.
pub const MAX_COUNT: u16 = 4_095;

/// Largest angle; larger commands are clamped to it.
pub const MAX_DEGREES: f32 = 180.0;

/// Count at which a pulse of `pulse_us` ends, rounded down and capped at [`MAX_COUNT`].
///
/// ```rust
/// use servo_expander::angle::count_for_pulse_us;
///
/// assert_eq!(count_for_pulse_us(1_500), 307); // 0x133
/// assert_eq!(count_for_pulse_us(2_500), 512);
/// ```
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "u16::MAX * 4096 fits in u32; the count is capped at MAX_COUNT before narrowing"
)]
pub const fn count_for_pulse_us(pulse_us: u16) -> u16 {
    let count = pulse_us as u32 * COUNTS_PER_FRAME / FRAME_PERIOD_US;
    let capped = if count > MAX_COUNT as u32 {
        MAX_COUNT as u32
    } else {
        count
    };
    capped as u16
}

/// Clamp an angle into 0.0..=180.0. NaN becomes 0.0.
#[must_use]
pub fn clamp_degrees(degrees: f32) -> f32 {
    if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(0.0, MAX_DEGREES)
    }
}

/// Pulse width (µs) for an angle, interpolated linearly across `range`.
///
/// The angle is clamped first (see [`clamp_degrees`]).
#[must_use]
pub fn pulse_us_at(degrees: f32, range: PulseRange) -> f32 {
    let degrees = clamp_degrees(degrees);
    f32::from(range.min_us()) + degrees / MAX_DEGREES * f32::from(range.span_us())
}

/// Convert an angle into the count at which the channel's pulse should fall.
///
/// `count = floor(pulse_us * 4096 / 20000)` where `pulse_us` interpolates between the range's
/// bounds. Angles outside 0..=180 are clamped. The result is at most 512 for any valid range.
///
/// ```rust
/// use servo_expander::{PulseProfile, encode};
///
/// assert_eq!(encode(0.0, PulseProfile::Us1000To2000), 204);
/// assert_eq!(encode(180.0, PulseProfile::Us1000To2000), 409);
/// assert_eq!(encode(90.0, PulseProfile::Us500To2500), 307);
/// assert_eq!(encode(-10.0, PulseProfile::Us500To2500), encode(0.0, PulseProfile::Us500To2500));
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "pulse is within 500..=2500 µs, so the count is a small non-negative value"
)]
pub fn encode(degrees: f32, range: impl Into<PulseRange>) -> u16 {
    let pulse_us = pulse_us_at(degrees, range.into());
    // Multiply before dividing: 4096 / 20000 is not exact in f32 and would round
    // integer results (for example 2500 µs -> 512) down by one.
    let count = pulse_us * COUNTS_PER_FRAME as f32 / FRAME_PERIOD_US as f32;
    count as u16
}
