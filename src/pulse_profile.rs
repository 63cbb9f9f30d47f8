//! Pulse-width ranges that map 0°..180° onto a servo's control pulse.
//!
//! Hobby servos disagree on how wide a pulse means 0° and 180°. [`PulseProfile`] names the
//! six common ranges; [`PulseRange`] is the validated pair of bounds the encoder uses, and
//! can also hold a custom range tuned for a particular servo.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Narrowest pulse width any range may use (µs).
pub const MIN_PULSE_US: u16 = 500;

/// Widest pulse width any range may use (µs).
pub const MAX_PULSE_US: u16 = 2_500;

// ============================================================================
// PulseProfile - the six named ranges
// ============================================================================

/// One of the six supported pulse-width ranges.
///
/// The default is [`PulseProfile::Us1000To2000`], the range most servos accept.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseProfile {
    /// 500..2500 µs, the full range of SG90-class servos.
    Us500To2500,
    /// 600..2400 µs.
    Us600To2400,
    /// 700..2300 µs.
    Us700To2300,
    /// 800..2200 µs.
    Us800To2200,
    /// 900..2100 µs.
    Us900To2100,
    /// 1000..2000 µs, the conventional "industry standard" range.
    #[default]
    Us1000To2000,
}

impl PulseProfile {
    /// Every profile, widest first.
    pub const ALL: [Self; 6] = [
        Self::Us500To2500,
        Self::Us600To2400,
        Self::Us700To2300,
        Self::Us800To2200,
        Self::Us900To2100,
        Self::Us1000To2000,
    ];

    /// `(min_pulse_us, max_pulse_us)` for this profile.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Us500To2500 => (500, 2_500),
            Self::Us600To2400 => (600, 2_400),
            Self::Us700To2300 => (700, 2_300),
            Self::Us800To2200 => (800, 2_200),
            Self::Us900To2100 => (900, 2_100),
            Self::Us1000To2000 => (1_000, 2_000),
        }
    }

    /// Pulse width for 0° (µs).
    #[must_use]
    pub const fn min_pulse_us(self) -> u16 {
        self.bounds().0
    }

    /// Pulse width for 180° (µs).
    #[must_use]
    pub const fn max_pulse_us(self) -> u16 {
        self.bounds().1
    }

    /// The validated range for this profile.
    #[must_use]
    pub const fn range(self) -> PulseRange {
        let (min_us, max_us) = self.bounds();
        PulseRange { min_us, max_us }
    }

    /// Find the named profile with exactly these bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPulseRange`] if the bounds are invalid (see [`PulseRange::new`])
    /// or do not match one of the six profiles.
    pub fn from_bounds(min_us: u16, max_us: u16) -> Result<Self> {
        let range = PulseRange::new(min_us, max_us)?;
        Self::ALL
            .into_iter()
            .find(|profile| profile.range() == range)
            .ok_or(Error::InvalidPulseRange { min_us, max_us })
    }
}

// ============================================================================
// PulseRange - validated bounds
// ============================================================================

/// A validated pulse-width range: `500 <= min_us < max_us <= 2500`.
///
/// Build one from a [`PulseProfile`] (infallible) or from custom bounds with [`PulseRange::new`].
///
/// ```rust
/// use servo_expander::{Error, PulseProfile, PulseRange};
///
/// let tuned = PulseRange::new(550, 2_350)?;
/// assert_eq!(tuned.span_us(), 1_800);
///
/// assert_eq!(PulseRange::from(PulseProfile::Us900To2100).min_us(), 900);
/// assert_eq!(
///     PulseRange::new(1_200, 1_000),
///     Err(Error::InvalidPulseRange { min_us: 1_200, max_us: 1_000 })
/// );
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "(u16, u16)", into = "(u16, u16)")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseRange {
    min_us: u16,
    max_us: u16,
}

impl PulseRange {
    /// Validate a custom range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPulseRange`] if `min_us >= max_us` or either bound is outside
    /// [`MIN_PULSE_US`]..=[`MAX_PULSE_US`].
    pub const fn new(min_us: u16, max_us: u16) -> Result<Self> {
        if min_us < MIN_PULSE_US || max_us > MAX_PULSE_US || min_us >= max_us {
            return Err(Error::InvalidPulseRange { min_us, max_us });
        }
        Ok(Self { min_us, max_us })
    }

    /// Pulse width for 0° (µs).
    #[must_use]
    pub const fn min_us(self) -> u16 {
        self.min_us
    }

    /// Pulse width for 180° (µs).
    #[must_use]
    pub const fn max_us(self) -> u16 {
        self.max_us
    }

    /// `max_us - min_us`, always positive.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "min_us < max_us is checked at construction"
    )]
    pub const fn span_us(self) -> u16 {
        self.max_us - self.min_us
    }

    /// Pulse width halfway between the bounds (µs), rounded down.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "the result lies between the bounds, at most 2500"
    )]
    pub const fn center_us(self) -> u16 {
        self.min_us + self.span_us() / 2
    }

    /// Clamp a pulse width into this range.
    #[must_use]
    pub const fn clamp_us(self, pulse_us: u16) -> u16 {
        if pulse_us < self.min_us {
            self.min_us
        } else if pulse_us > self.max_us {
            self.max_us
        } else {
            pulse_us
        }
    }
}

impl Default for PulseRange {
    fn default() -> Self {
        PulseProfile::default().range()
    }
}

impl From<PulseProfile> for PulseRange {
    fn from(profile: PulseProfile) -> Self {
        profile.range()
    }
}

/// Deserialized ranges are validated like [`PulseRange::new`].
impl TryFrom<(u16, u16)> for PulseRange {
    type Error = Error;

    fn try_from((min_us, max_us): (u16, u16)) -> Result<Self> {
        Self::new(min_us, max_us)
    }
}

impl From<PulseRange> for (u16, u16) {
    fn from(range: PulseRange) -> Self {
        (range.min_us, range.max_us)
    }
}
