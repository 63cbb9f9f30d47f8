//! One-time chip setup, run lazily before the first channel write.
//!
//! The sequence programs the prescaler for a 50 Hz frame, parks every output at a 1.5 ms
//! pulse through the broadcast registers, wakes the oscillator, and waits for it to settle.
//! It runs at most once per controller. See [`ChipState`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::Result;
use crate::angle::count_for_pulse_us;
use crate::bus::RegisterBus;
use crate::register::{LedRegisters, MODE1, PRE_SCALE, mode1};

// ============================================================================
// Constants
// ============================================================================

/// Frequency of the chip's internal oscillator (Hz).
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Servo frame rate (Hz).
pub const REFRESH_HZ: u32 = 50;

/// Prescaler value for a 50 Hz frame on the internal oscillator (121).
pub const PRESCALE_50HZ: u8 = prescale_for(OSCILLATOR_HZ, REFRESH_HZ);

/// Pulse every output starts with after setup (µs).
pub const DEFAULT_PULSE_US: u16 = 1_500;

/// Off count written to every output during setup (307 = 0x133).
pub const DEFAULT_OFF_COUNT: u16 = count_for_pulse_us(DEFAULT_PULSE_US);

/// [`MODE1`] value after setup: awake, answering the all-call address.
pub const RUN_MODE: u8 = mode1::ALLCALL;

/// Time for the oscillator to stabilize after waking (ms).
pub const SETTLE_DELAY_MS: u32 = 10;

/// Prescaler value for a refresh rate: `round(oscillator / (4096 * refresh)) - 1`.
///
/// The result is clamped to the chip's accepted range 3..=255.
///
/// ```rust
/// use servo_expander::chip_init::{PRESCALE_50HZ, prescale_for};
///
/// assert_eq!(PRESCALE_50HZ, 0x79);
/// assert_eq!(prescale_for(25_000_000, 200), 30);
/// ```
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "const inputs; the result is clamped to u8 range before narrowing"
)]
pub const fn prescale_for(oscillator_hz: u32, refresh_hz: u32) -> u8 {
    let counts_per_second = 4_096 * refresh_hz as u64;
    let rounded = (oscillator_hz as u64 + counts_per_second / 2) / counts_per_second;
    let prescale = rounded.saturating_sub(1);
    let clamped = if prescale < 3 {
        3
    } else if prescale > 255 {
        255
    } else {
        prescale
    };
    clamped as u8
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Receives values read back from the chip during setup, for display or logging.
///
/// Purely observational: nothing the sink does affects setup. Closures taking a `u8`
/// implement this trait.
pub trait DiagnosticSink {
    /// Called with the prescaler register as read back after it was written.
    fn prescale_read_back(&mut self, prescale: u8);
}

/// A [`DiagnosticSink`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn prescale_read_back(&mut self, _prescale: u8) {}
}

impl<F: FnMut(u8)> DiagnosticSink for F {
    fn prescale_read_back(&mut self, prescale: u8) {
        self(prescale);
    }
}

// ============================================================================
// ChipState
// ============================================================================

/// Whether the chip has been set up.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipState {
    /// Setup has not completed. No channel write may be issued.
    #[default]
    Uninitialized,
    /// Setup completed. Never reverts.
    Ready,
}

/// Runs the setup sequence once and remembers that it did.
#[derive(Debug, Default)]
pub(crate) struct ChipInitializer {
    state: ChipState,
}

impl ChipInitializer {
    pub(crate) const fn new() -> Self {
        Self {
            state: ChipState::Uninitialized,
        }
    }

    pub(crate) const fn state(&self) -> ChipState {
        self.state
    }

    /// Run the setup sequence unless it already completed.
    ///
    /// On a transport error the state stays [`ChipState::Uninitialized`], so the next call
    /// starts the sequence again from the prescaler write.
    pub(crate) fn ensure_ready<I2C, D, S>(
        &mut self,
        bus: &mut RegisterBus<I2C>,
        delay: &mut D,
        diagnostics: &mut S,
    ) -> Result<()>
    where
        I2C: I2c,
        D: DelayNs,
        S: DiagnosticSink,
    {
        if self.state == ChipState::Ready {
            return Ok(());
        }

        info!("expander {} setup: prescale={}", bus.address(), PRESCALE_50HZ);
        bus.write_register(PRE_SCALE, PRESCALE_50HZ)?;

        match bus.read_register(PRE_SCALE) {
            Ok(prescale) => {
                debug!("prescale read back as {}", prescale);
                diagnostics.prescale_read_back(prescale);
            }
            Err(error) => warn!("prescale read-back failed: {}", error),
        }

        let all = LedRegisters::ALL_CHANNELS;
        bus.write_register(all.on_low, 0)?;
        bus.write_register(all.on_high, 0)?;

        let [off_low, off_high] = DEFAULT_OFF_COUNT.to_le_bytes();
        bus.write_register(all.off_low, off_low)?;
        bus.write_register(all.off_high, off_high)?;

        bus.write_register(MODE1, RUN_MODE)?;
        delay.delay_ms(SETTLE_DELAY_MS);

        self.state = ChipState::Ready;
        info!("expander {} ready", bus.address());
        Ok(())
    }
}
