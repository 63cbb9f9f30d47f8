//! Single-register reads and writes over a blocking I2C bus.

use embedded_hal::i2c::I2c;

use crate::{Error, Result};

/// An I2C bus bound to one chip address.
pub(crate) struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterBus<I2C> {
    pub(crate) const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub(crate) const fn address(&self) -> u8 {
        self.address
    }

    pub(crate) fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus<I2C> {
    /// Write one register as a single `[register, value]` transfer.
    pub(crate) fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|bus_error| {
                let error = Error::transport(&bus_error);
                error!("write {} to register {} failed: {}", value, register, error);
                error
            })
    }

    /// Read one register with a write-then-read transfer.
    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buffer)
            .map_err(|bus_error| Error::transport(&bus_error))?;
        let [value] = buffer;
        Ok(value)
    }
}
