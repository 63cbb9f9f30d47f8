//! Serializable controller settings.
//!
//! [`ControllerConfig`] holds the chip address and each channel's [`PulseRange`]. It derives
//! `serde` traits so it can be stored and reloaded, for example with `postcard`. Ranges are
//! validated again when deserialized.

use serde::{Deserialize, Serialize};

use crate::channel::CHANNEL_COUNT;
use crate::register::DEFAULT_ADDRESS;
use crate::{ChannelId, PulseRange};

/// Chip address and per-channel pulse ranges.
///
/// Build one up front, or take a snapshot of a running controller with
/// [`ServoController::config`](crate::ServoController::config).
///
/// ```rust
/// use servo_expander::{ChannelId, ControllerConfig, PulseProfile, PulseRange};
///
/// let config = ControllerConfig::default()
///     .with_range(ChannelId::Servo3, PulseProfile::Us500To2500)
///     .with_range(ChannelId::Servo4, PulseRange::new(550, 2_350)?);
///
/// assert_eq!(config.address, 0x40);
/// assert_eq!(config.range(ChannelId::Servo3), PulseProfile::Us500To2500.range());
/// assert_eq!(config.range(ChannelId::Servo4).min_us(), 550);
/// assert_eq!(config.range(ChannelId::Servo5), PulseRange::default());
/// # Ok::<(), servo_expander::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// 7-bit bus address of the chip.
    pub address: u8,
    /// Range of each channel, indexed by [`ChannelId::index`].
    pub ranges: [PulseRange; CHANNEL_COUNT],
}

impl ControllerConfig {
    /// All channels on the default range, at `address`.
    #[must_use]
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ranges: [PulseRange::default(); CHANNEL_COUNT],
        }
    }

    /// Return this config with `channel` set to `range` (a [`PulseProfile`](crate::PulseProfile)
    /// or a custom [`PulseRange`]).
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "ChannelId::index is always < CHANNEL_COUNT"
    )]
    pub fn with_range(mut self, channel: ChannelId, range: impl Into<PulseRange>) -> Self {
        self.ranges[usize::from(channel.index())] = range.into();
        self
    }

    /// Range of `channel`.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "ChannelId::index is always < CHANNEL_COUNT"
    )]
    pub fn range(&self, channel: ChannelId) -> PulseRange {
        self.ranges[usize::from(channel.index())]
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}
