//! Servo control through a 16-channel PWM expander (PCA9685), with a pulse range per channel.
//!
//! Start with [`ServoController`]: give it an I2C bus and a delay, pick a [`PulseProfile`]
//! for each [`ChannelId`] you use, then call [`write_angle`](ServoController::write_angle).
//! The chip is initialized lazily on the first write.
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_hal::{delay::DelayNs, i2c::I2c};
//! use servo_expander::{ChannelId, PulseProfile, Result, ServoController};
//!
//! fn example(i2c: impl I2c, delay: impl DelayNs) -> Result<()> {
//!     let mut servos = ServoController::new(i2c, delay);
//!
//!     // Channel 1 drives a wide-range servo; channel 2 keeps the default 1000-2000 µs.
//!     servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us500To2500);
//!
//!     servos.write_angle(ChannelId::Servo1, 90.0)?; // first write initializes the chip
//!     servos.write_angle(ChannelId::Servo2, 45.0)?;
//!     Ok(())
//! }
//! ```
//!
//! # Glossary
//!
//! - **Frame:** one 20 ms PWM period (50 Hz). Every channel's pulse starts at the beginning of
//!   the frame.
//! - **Count:** one of the 4096 steps the chip divides a frame into (about 4.88 µs each).
//! - **Pulse range:** the pulse widths (µs) a servo maps to 0° and 180°. See [`PulseRange`].
//! - **Broadcast registers:** the `ALL_LED_*` registers that write every channel at once.
#![no_std]

#[macro_use]
mod fmt;

pub mod angle;
mod bus;
pub mod channel;
pub mod chip_init;
pub mod config;
pub mod controller;
mod error;
pub mod pulse_profile;
pub mod register;

pub use crate::angle::encode;
pub use crate::channel::ChannelId;
pub use crate::chip_init::{DiagnosticSink, NoDiagnostics};
pub use crate::config::ControllerConfig;
pub use crate::controller::ServoController;
// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
pub use crate::pulse_profile::{PulseProfile, PulseRange};
