//! A device abstraction for up to 16 servos on one PWM expander chip.
//!
//! See [`ServoController`] for usage.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::angle::{MAX_DEGREES, clamp_degrees, count_for_pulse_us, encode};
use crate::bus::RegisterBus;
use crate::channel::CHANNEL_COUNT;
use crate::chip_init::{ChipInitializer, ChipState, DiagnosticSink, NoDiagnostics};
use crate::register::{DEFAULT_ADDRESS, LED_COUNT_HIGH_MASK, LED_FULL_OFF, LedRegisters};
use crate::{ChannelId, ControllerConfig, PulseRange, Result};

/// A device abstraction for servos driven by a PCA9685 PWM expander.
///
/// Each channel has its own [`PulseRange`] (default 1000-2000 µs). The chip is set up the first
/// time a channel is written; setup runs once per controller and blocks for about 10 ms.
/// Channel writes then cost two register writes each.
///
/// The controller owns its bus. To put several chips on one bus, give each controller a shared
/// bus handle (for example `embedded_hal_bus::i2c::RefCellDevice`) and its own address.
///
/// # Examples
///
/// ```rust,no_run
/// use embedded_hal::{delay::DelayNs, i2c::I2c};
/// use servo_expander::{ChannelId, PulseProfile, PulseRange, Result, ServoController};
///
/// fn example(i2c: impl I2c, delay: impl DelayNs) -> Result<()> {
///     let mut servos = ServoController::new_with_address(i2c, delay, 0x41)
///         .with_diagnostics(|prescale: u8| {
///             let _ = prescale; // show it on a display, log it, ...
///         });
///
///     servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us500To2500);
///     servos.set_pulse_profile(ChannelId::Servo2, PulseRange::new(550, 2_350)?);
///
///     servos.write_angle(ChannelId::Servo1, 45.0)?; // sets up the chip first
///     servos.center(ChannelId::Servo2)?;
///     servos.relax(ChannelId::Servo1)?; // stop pulses; the servo goes limp
///     Ok(())
/// }
/// ```
pub struct ServoController<I2C, D, S = NoDiagnostics> {
    bus: RegisterBus<I2C>,
    delay: D,
    diagnostics: S,
    chip: ChipInitializer,
    ranges: [PulseRange; CHANNEL_COUNT],
}

impl<I2C, D> ServoController<I2C, D> {
    /// Create a controller for the chip at the default address (0x40).
    ///
    /// No bus traffic happens until the first write.
    #[must_use]
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Create a controller for the chip at `address`.
    ///
    /// See the [struct-level example](Self) for usage.
    #[must_use]
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address),
            delay,
            diagnostics: NoDiagnostics,
            chip: ChipInitializer::new(),
            ranges: [PulseRange::default(); CHANNEL_COUNT],
        }
    }

    /// Create a controller from saved settings: address and per-channel ranges.
    #[must_use]
    pub fn from_config(i2c: I2C, delay: D, config: &ControllerConfig) -> Self {
        let mut controller = Self::new_with_address(i2c, delay, config.address);
        controller.ranges = config.ranges;
        controller
    }
}

impl<I2C, D, S> ServoController<I2C, D, S> {
    /// Replace the diagnostic sink that receives the prescaler read-back during setup.
    #[must_use]
    pub fn with_diagnostics<S2: DiagnosticSink>(
        self,
        diagnostics: S2,
    ) -> ServoController<I2C, D, S2> {
        ServoController {
            bus: self.bus,
            delay: self.delay,
            diagnostics,
            chip: self.chip,
            ranges: self.ranges,
        }
    }

    /// 7-bit bus address of the chip.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Whether setup has run.
    #[must_use]
    pub const fn state(&self) -> ChipState {
        self.chip.state()
    }

    /// Shorthand for `state() == ChipState::Ready`.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state(), ChipState::Ready)
    }

    /// Choose the pulse range `channel` maps angles onto.
    ///
    /// Takes a [`PulseProfile`](crate::PulseProfile) or a validated [`PulseRange`]. Only
    /// affects later writes; the servo does not move until the channel is written again.
    pub fn set_pulse_profile(&mut self, channel: ChannelId, profile: impl Into<PulseRange>) {
        let range = profile.into();
        debug!(
            "{} pulse range {}..{} us",
            channel,
            range.min_us(),
            range.max_us()
        );
        *self.range_mut(channel) = range;
    }

    /// Pulse range currently used by `channel`.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "ChannelId::index is always < CHANNEL_COUNT"
    )]
    pub fn pulse_range(&self, channel: ChannelId) -> PulseRange {
        self.ranges[usize::from(channel.index())]
    }

    /// Current address and per-channel ranges, ready to save and pass to
    /// [`from_config`](ServoController::from_config) later.
    #[must_use]
    pub const fn config(&self) -> ControllerConfig {
        ControllerConfig {
            address: self.address(),
            ranges: self.ranges,
        }
    }

    /// Give back the bus and delay.
    #[must_use]
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "ChannelId::index is always < CHANNEL_COUNT"
    )]
    fn range_mut(&mut self, channel: ChannelId) -> &mut PulseRange {
        &mut self.ranges[usize::from(channel.index())]
    }
}

impl<I2C, D, S> ServoController<I2C, D, S>
where
    I2C: I2c,
    D: DelayNs,
    S: DiagnosticSink,
{
    /// Set up the chip now instead of on the first write. Does nothing if already set up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if a setup write fails. The
    /// controller stays uninitialized and the next call retries the whole sequence.
    pub fn initialize(&mut self) -> Result<()> {
        self.chip
            .ensure_ready(&mut self.bus, &mut self.delay, &mut self.diagnostics)
    }

    /// Move `channel` to `degrees` (0..=180) within its pulse range.
    ///
    /// Angles outside 0..=180 are clamped, not rejected. Sets up the chip first if needed.
    ///
    /// See the [struct-level example](Self) for usage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if setup or either register write
    /// fails.
    pub fn write_angle(&mut self, channel: ChannelId, degrees: f32) -> Result<()> {
        self.initialize()?;
        if !(0.0..=MAX_DEGREES).contains(&degrees) {
            debug!(
                "{} angle {} clamped to {}",
                channel,
                degrees,
                clamp_degrees(degrees)
            );
        }
        let count = encode(degrees, self.pulse_range(channel));
        trace!("{} {} deg -> count {}", channel, degrees, count);
        self.write_off_count(channel, count)
    }

    /// Send a pulse of `pulse_us` on `channel`, clamped to the channel's pulse range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if setup or either register write
    /// fails.
    pub fn write_pulse_us(&mut self, channel: ChannelId, pulse_us: u16) -> Result<()> {
        self.initialize()?;
        let pulse_us = self.pulse_range(channel).clamp_us(pulse_us);
        let count = count_for_pulse_us(pulse_us);
        trace!("{} {} us -> count {}", channel, pulse_us, count);
        self.write_off_count(channel, count)
    }

    /// Move `channel` to the middle of its pulse range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if setup or either register write
    /// fails.
    pub fn center(&mut self, channel: ChannelId) -> Result<()> {
        let center_us = self.pulse_range(channel).center_us();
        self.write_pulse_us(channel, center_us)
    }

    /// Stop sending pulses on `channel` so the servo relaxes.
    ///
    /// This allows the servo to move freely, reducing power consumption and mechanical
    /// stress. The next [`write_angle`](Self::write_angle) resumes control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if setup or the register write
    /// fails.
    pub fn relax(&mut self, channel: ChannelId) -> Result<()> {
        self.initialize()?;
        debug!("{} relaxed", channel);
        let registers = LedRegisters::for_channel(channel);
        self.bus.write_register(registers.off_high, LED_FULL_OFF)
    }

    /// Write the falling-edge count. The on registers stay at 0 from setup, so every pulse
    /// starts at the beginning of the frame; the full-off bit is cleared.
    fn write_off_count(&mut self, channel: ChannelId, count: u16) -> Result<()> {
        let registers = LedRegisters::for_channel(channel);
        let [low, high] = count.to_le_bytes();
        self.bus.write_register(registers.off_low, low)?;
        self.bus
            .write_register(registers.off_high, high & LED_COUNT_HIGH_MASK)
    }
}
