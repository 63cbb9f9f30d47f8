//! Recording fakes for the embedded-hal bus and delay traits.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// One thing the driver did, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Write { address: u8, register: u8, value: u8 },
    Read { address: u8, register: u8 },
    Delay { ns: u64 },
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub const WRITE_NACK: ErrorKind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data);

/// An I2C bus that stores register writes and logs every transfer.
pub struct FakeBus {
    log: EventLog,
    registers: HashMap<(u8, u8), u8>,
    writes_seen: usize,
    fail_write_at: Option<usize>,
    fail_reads: bool,
}

impl FakeBus {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            registers: HashMap::new(),
            writes_seen: 0,
            fail_write_at: None,
            fail_reads: false,
        }
    }

    /// Make the register write with this zero-based index fail (later writes succeed).
    pub fn failing_write(mut self, index: usize) -> Self {
        self.fail_write_at = Some(index);
        self
    }

    /// Make every register read fail.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn register(&self, address: u8, register: u8) -> Option<u8> {
        self.registers.get(&(address, register)).copied()
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut pointer = None;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let bytes: &[u8] = bytes;
                    match bytes {
                        [register] => pointer = Some(*register),
                        [register, value] => {
                            let index = self.writes_seen;
                            self.writes_seen += 1;
                            if self.fail_write_at == Some(index) {
                                return Err(WRITE_NACK);
                            }
                            self.registers.insert((address, *register), *value);
                            self.log.borrow_mut().push(Event::Write {
                                address,
                                register: *register,
                                value: *value,
                            });
                        }
                        _ => return Err(ErrorKind::Other),
                    }
                }
                Operation::Read(buffer) => {
                    if self.fail_reads {
                        return Err(ErrorKind::ArbitrationLoss);
                    }
                    let register = pointer.ok_or(ErrorKind::Other)?;
                    let value = self.register(address, register).unwrap_or(0);
                    buffer.fill(value);
                    self.log
                        .borrow_mut()
                        .push(Event::Read { address, register });
                }
            }
        }
        Ok(())
    }
}

/// A delay that returns immediately and logs how long it was asked to wait.
pub struct FakeDelay {
    log: EventLog,
}

impl FakeDelay {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay { ns: u64::from(ns) });
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::Delay {
            ns: u64::from(us) * 1_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::Delay {
            ns: u64::from(ms) * 1_000_000,
        });
    }
}

/// A fresh log plus a bus and delay that write to it.
pub fn fakes() -> (EventLog, FakeBus, FakeDelay) {
    let log = EventLog::default();
    let bus = FakeBus::new(Rc::clone(&log));
    let delay = FakeDelay::new(Rc::clone(&log));
    (log, bus, delay)
}

pub const fn write(address: u8, register: u8, value: u8) -> Event {
    Event::Write {
        address,
        register,
        value,
    }
}

/// Everything setup does, in order, for the chip at `address`.
pub fn setup_events(address: u8) -> Vec<Event> {
    vec![
        write(address, 0xFE, 0x79),
        Event::Read {
            address,
            register: 0xFE,
        },
        write(address, 0xFA, 0x00),
        write(address, 0xFB, 0x00),
        write(address, 0xFC, 0x33),
        write(address, 0xFD, 0x01),
        write(address, 0x00, 0x01),
        Event::Delay { ns: 10_000_000 },
    ]
}

/// Events logged after the first `skip` entries.
pub fn events_after(log: &EventLog, skip: usize) -> Vec<Event> {
    log.borrow().iter().skip(skip).cloned().collect()
}
