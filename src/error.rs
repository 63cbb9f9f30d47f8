//! Crate-wide error type.

use embedded_hal::i2c::ErrorKind;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by the servo expander driver.
#[derive(
    Clone,
    Copy,
    derive_more::Debug,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    PartialEq,
    Eq,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An I2C transfer to or from the chip failed. Not retried.
    #[display("I2C transfer failed: {_0}")]
    #[from]
    Transport(#[error(not(source))] ErrorKind),

    /// A pulse range with `min_us >= max_us` or a bound outside 500..=2500 µs.
    #[display("invalid pulse range {min_us}..{max_us} µs (need 500 <= min < max <= 2500)")]
    InvalidPulseRange {
        /// Requested pulse width for 0°.
        min_us: u16,
        /// Requested pulse width for 180°.
        max_us: u16,
    },

    /// A channel index outside 0..16.
    #[display("invalid channel index {index} (need 0..16)")]
    InvalidChannel {
        /// The rejected index.
        index: u8,
    },
}

impl Error {
    /// Normalise any bus error into [`Error::Transport`].
    pub(crate) fn transport(error: &impl embedded_hal::i2c::Error) -> Self {
        Self::Transport(error.kind())
    }
}
