//! The 16 output channels of the expander.
//!
//! See [`ChannelId`].

use crate::{Error, Result};

/// Number of output channels on the chip.
pub const CHANNEL_COUNT: usize = 16;

/// One of the chip's 16 PWM outputs, labelled the way servo boards print them.
///
/// `Servo1` is the chip's LED0 output, `Servo16` is LED15.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChannelId {
    /// Output 0.
    Servo1 = 0,
    /// Output 1.
    Servo2,
    /// Output 2.
    Servo3,
    /// Output 3.
    Servo4,
    /// Output 4.
    Servo5,
    /// Output 5.
    Servo6,
    /// Output 6.
    Servo7,
    /// Output 7.
    Servo8,
    /// Output 8.
    Servo9,
    /// Output 9.
    Servo10,
    /// Output 10.
    Servo11,
    /// Output 11.
    Servo12,
    /// Output 12.
    Servo13,
    /// Output 13.
    Servo14,
    /// Output 14.
    Servo15,
    /// Output 15.
    Servo16,
}

impl ChannelId {
    /// Every channel, in output order.
    pub const ALL: [Self; CHANNEL_COUNT] = [
        Self::Servo1,
        Self::Servo2,
        Self::Servo3,
        Self::Servo4,
        Self::Servo5,
        Self::Servo6,
        Self::Servo7,
        Self::Servo8,
        Self::Servo9,
        Self::Servo10,
        Self::Servo11,
        Self::Servo12,
        Self::Servo13,
        Self::Servo14,
        Self::Servo15,
        Self::Servo16,
    ];

    /// Zero-based output number (0 for `Servo1`).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = Error;

    /// Convert a zero-based output number into a channel.
    fn try_from(index: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(Error::InvalidChannel { index })
    }
}

impl From<ChannelId> for u8 {
    fn from(channel: ChannelId) -> Self {
        channel.index()
    }
}
