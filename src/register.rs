//! PCA9685 register addresses and bit values.
//!
//! Each output has four registers (on-low, on-high, off-low, off-high) starting at
//! [`LED0_ON_L`] with a stride of [`LED_STRIDE`]. The broadcast `ALL_LED_*` registers
//! write every output at once. See [`LedRegisters`].

use crate::ChannelId;

// ============================================================================
// Addresses
// ============================================================================

/// Default 7-bit bus address (all address pins low).
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Mode register 1 (sleep, auto-increment, all-call).
pub const MODE1: u8 = 0x00;
/// Mode register 2 (output drive and inversion).
pub const MODE2: u8 = 0x01;
/// First per-output register: LED0 on-low.
pub const LED0_ON_L: u8 = 0x06;
/// Distance between the register blocks of consecutive outputs.
pub const LED_STRIDE: u8 = 4;
/// Broadcast on-low.
pub const ALL_LED_ON_L: u8 = 0xFA;
/// Broadcast on-high.
pub const ALL_LED_ON_H: u8 = 0xFB;
/// Broadcast off-low.
pub const ALL_LED_OFF_L: u8 = 0xFC;
/// Broadcast off-high.
pub const ALL_LED_OFF_H: u8 = 0xFD;
/// Oscillator prescaler. Only writable while [`mode1::SLEEP`] is set.
pub const PRE_SCALE: u8 = 0xFE;

/// Bits of [`MODE1`].
pub mod mode1 {
    /// Restart enabled.
    pub const RESTART: u8 = 0x80;
    /// Use the external clock pin.
    pub const EXTCLK: u8 = 0x40;
    /// Register auto-increment.
    pub const AI: u8 = 0x20;
    /// Low-power mode, oscillator off. Set at power-on.
    pub const SLEEP: u8 = 0x10;
    /// Respond to the all-call bus address.
    pub const ALLCALL: u8 = 0x01;
}

/// Bit in an off-high register that holds the output fully low.
pub const LED_FULL_OFF: u8 = 0x10;

/// Mask of the count bits in an on-high or off-high register.
pub const LED_COUNT_HIGH_MASK: u8 = 0x0F;

// ============================================================================
// LedRegisters
// ============================================================================

/// The four registers that shape one output's pulse.
///
/// ```rust
/// use servo_expander::{ChannelId, register::LedRegisters};
///
/// let servo1 = LedRegisters::for_channel(ChannelId::Servo1);
/// assert_eq!((servo1.off_low, servo1.off_high), (0x08, 0x09));
/// assert_eq!(LedRegisters::ALL_CHANNELS.off_low, 0xFC);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedRegisters {
    /// Count at which the pulse rises, low byte.
    pub on_low: u8,
    /// Count at which the pulse rises, high nibble.
    pub on_high: u8,
    /// Count at which the pulse falls, low byte.
    pub off_low: u8,
    /// Count at which the pulse falls, high nibble plus [`LED_FULL_OFF`].
    pub off_high: u8,
}

impl LedRegisters {
    /// The broadcast registers that address every output at once.
    pub const ALL_CHANNELS: Self = Self {
        on_low: ALL_LED_ON_L,
        on_high: ALL_LED_ON_H,
        off_low: ALL_LED_OFF_L,
        off_high: ALL_LED_OFF_H,
    };

    /// The registers of one output.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "at most 0x06 + 4 * 15 + 3 = 0x45"
    )]
    pub const fn for_channel(channel: ChannelId) -> Self {
        let base = LED0_ON_L + LED_STRIDE * channel.index();
        Self {
            on_low: base,
            on_high: base + 1,
            off_low: base + 2,
            off_high: base + 3,
        }
    }
}
