#![allow(missing_docs)]
//! Controller behaviour against a recording fake bus.

mod common;

use common::{Event, WRITE_NACK, events_after, fakes, setup_events, write};
use servo_expander::chip_init::ChipState;
use servo_expander::{ChannelId, ControllerConfig, Error, PulseProfile, PulseRange, ServoController};

const SETUP_EVENTS: usize = 8;

#[test]
fn first_write_sets_up_the_chip_then_writes_the_channel() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us500To2500);
    assert_eq!(servos.state(), ChipState::Uninitialized);

    servos
        .write_angle(ChannelId::Servo1, 90.0)
        .expect("write succeeds");

    let mut expected = setup_events(0x40);
    expected.extend([write(0x40, 0x08, 0x33), write(0x40, 0x09, 0x01)]);
    assert_eq!(*log.borrow(), expected);
    assert!(servos.is_ready());
}

#[test]
fn setup_runs_once() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);

    for degrees in [0.0, 45.0, 90.0, 135.0, 180.0] {
        servos
            .write_angle(ChannelId::Servo2, degrees)
            .expect("write succeeds");
    }
    servos.initialize().expect("already set up");

    let log = log.borrow();
    assert_eq!(log[..SETUP_EVENTS], setup_events(0x40)[..]);
    assert_eq!(log.len(), SETUP_EVENTS + 5 * 2);
    let prescale_writes = log
        .iter()
        .filter(|event| matches!(event, Event::Write { register: 0xFE, .. }))
        .count();
    assert_eq!(prescale_writes, 1);
}

#[test]
fn explicit_initialize_then_write_skips_setup() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.initialize().expect("setup succeeds");
    assert_eq!(*log.borrow(), setup_events(0x40));

    servos
        .write_angle(ChannelId::Servo3, 0.0)
        .expect("write succeeds");
    // Default profile 1000..2000 µs: 0 deg -> 204 = 0x0CC. Servo3 off registers are 0x10/0x11.
    assert_eq!(
        events_after(&log, SETUP_EVENTS),
        [write(0x40, 0x10, 0xCC), write(0x40, 0x11, 0x00)]
    );
}

#[test]
fn channel_writes_only_touch_that_channels_off_registers() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.initialize().expect("setup succeeds");

    for (index, channel) in (0_u8..).zip(ChannelId::ALL) {
        let before = log.borrow().len();
        servos.write_angle(channel, 180.0).expect("write succeeds");
        let off_low = 0x08 + 4 * index;
        // 2000 µs -> 409 = 0x199.
        assert_eq!(
            events_after(&log, before),
            [write(0x40, off_low, 0x99), write(0x40, off_low + 1, 0x01)],
            "{channel:?}"
        );
    }
}

#[test]
fn out_of_range_angles_write_the_clamped_count() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.initialize().expect("setup succeeds");

    servos.write_angle(ChannelId::Servo5, -10.0).expect("write");
    servos.write_angle(ChannelId::Servo5, 0.0).expect("write");
    servos.write_angle(ChannelId::Servo5, 200.0).expect("write");
    servos.write_angle(ChannelId::Servo5, 180.0).expect("write");

    let writes = events_after(&log, SETUP_EVENTS);
    assert_eq!(writes[0..2], writes[2..4]);
    assert_eq!(writes[4..6], writes[6..8]);
}

#[test]
fn failed_setup_write_is_reported_and_retried() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus.failing_write(0), delay);

    assert_eq!(
        servos.write_angle(ChannelId::Servo1, 90.0),
        Err(Error::Transport(WRITE_NACK))
    );
    assert_eq!(servos.state(), ChipState::Uninitialized);
    assert!(log.borrow().is_empty(), "nothing after the failed write");

    servos
        .write_angle(ChannelId::Servo1, 90.0)
        .expect("retry succeeds");
    assert!(servos.is_ready());
    assert_eq!(log.borrow()[..SETUP_EVENTS], setup_events(0x40)[..]);
}

#[test]
fn failure_midway_through_setup_stops_the_sequence() {
    let (log, bus, delay) = fakes();
    // Writes: prescale, on_l, on_h, off_l (fails), ...
    let mut servos = ServoController::new(bus.failing_write(3), delay);

    assert_eq!(servos.initialize(), Err(Error::Transport(WRITE_NACK)));
    assert_eq!(servos.state(), ChipState::Uninitialized);
    assert_eq!(*log.borrow(), setup_events(0x40)[..4]);
}

#[test]
fn failed_channel_write_is_reported() {
    let (log, bus, delay) = fakes();
    // Setup makes six writes; the seventh is the channel's off_low.
    let mut servos = ServoController::new(bus.failing_write(6), delay);

    assert_eq!(
        servos.write_angle(ChannelId::Servo1, 90.0),
        Err(Error::Transport(WRITE_NACK))
    );
    assert!(servos.is_ready());
    assert_eq!(*log.borrow(), setup_events(0x40));
}

#[test]
fn failed_prescale_read_back_is_not_fatal() {
    let (log, bus, delay) = fakes();
    let mut seen = Vec::new();
    {
        let mut servos = ServoController::new(bus.failing_reads(), delay)
            .with_diagnostics(|prescale: u8| seen.push(prescale));
        servos
            .write_angle(ChannelId::Servo1, 90.0)
            .expect("setup ignores the read failure");
        assert!(servos.is_ready());
    }
    assert!(seen.is_empty());
    assert!(
        !log.borrow()
            .iter()
            .any(|event| matches!(event, Event::Read { .. }))
    );
}

#[test]
fn diagnostics_receive_the_prescale_read_back() {
    let (_log, bus, delay) = fakes();
    let mut seen = Vec::new();
    {
        let mut servos =
            ServoController::new(bus, delay).with_diagnostics(|prescale: u8| seen.push(prescale));
        servos.write_angle(ChannelId::Servo1, 0.0).expect("write");
        servos.write_angle(ChannelId::Servo2, 0.0).expect("write");
    }
    assert_eq!(seen, [0x79]);
}

#[test]
fn setting_a_profile_causes_no_bus_traffic() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);

    servos.set_pulse_profile(ChannelId::Servo4, PulseProfile::Us600To2400);
    servos.set_pulse_profile(
        ChannelId::Servo5,
        PulseRange::new(550, 2_350).expect("valid range"),
    );

    assert!(log.borrow().is_empty());
    assert_eq!(
        servos.pulse_range(ChannelId::Servo4),
        PulseProfile::Us600To2400.range()
    );
    assert_eq!(servos.pulse_range(ChannelId::Servo6), PulseRange::default());
}

#[test]
fn profile_change_applies_to_the_next_write() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.write_angle(ChannelId::Servo1, 0.0).expect("write");
    servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us500To2500);
    servos.write_angle(ChannelId::Servo1, 0.0).expect("write");

    // 204 = 0x0CC, then 102 = 0x066.
    assert_eq!(
        events_after(&log, SETUP_EVENTS),
        [
            write(0x40, 0x08, 0xCC),
            write(0x40, 0x09, 0x00),
            write(0x40, 0x08, 0x66),
            write(0x40, 0x09, 0x00),
        ]
    );
}

#[test]
fn relax_sets_the_full_off_bit_and_the_next_write_clears_it() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);

    servos.relax(ChannelId::Servo2).expect("relax");
    assert_eq!(log.borrow()[..SETUP_EVENTS], setup_events(0x40)[..]);
    servos.write_angle(ChannelId::Servo2, 90.0).expect("write");

    // Servo2 off registers are 0x0C/0x0D; 1500 µs -> 307 = 0x133.
    assert_eq!(
        events_after(&log, SETUP_EVENTS),
        [
            write(0x40, 0x0D, 0x10),
            write(0x40, 0x0C, 0x33),
            write(0x40, 0x0D, 0x01),
        ]
    );
}

#[test]
fn center_and_pulse_writes_stay_inside_the_range() {
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::new(bus, delay);
    servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us800To2200);

    servos.center(ChannelId::Servo1).expect("center");
    servos.write_pulse_us(ChannelId::Servo1, 100).expect("pulse");
    servos.write_pulse_us(ChannelId::Servo1, 9_000).expect("pulse");

    // 1500 µs -> 0x133, 800 µs -> 163 = 0x0A3, 2200 µs -> 450 = 0x1C2.
    assert_eq!(
        events_after(&log, SETUP_EVENTS),
        [
            write(0x40, 0x08, 0x33),
            write(0x40, 0x09, 0x01),
            write(0x40, 0x08, 0xA3),
            write(0x40, 0x09, 0x00),
            write(0x40, 0x08, 0xC2),
            write(0x40, 0x09, 0x01),
        ]
    );
}

#[test]
fn from_config_uses_address_and_ranges() {
    let config =
        ControllerConfig::new(0x44).with_range(ChannelId::Servo7, PulseProfile::Us900To2100);
    let (log, bus, delay) = fakes();
    let mut servos = ServoController::from_config(bus, delay, &config);

    assert_eq!(servos.address(), 0x44);
    assert_eq!(
        servos.pulse_range(ChannelId::Servo7),
        PulseProfile::Us900To2100.range()
    );
    servos.write_angle(ChannelId::Servo7, 0.0).expect("write");

    // Servo7 off registers are 0x20/0x21; 900 µs -> 184 = 0x0B8.
    let mut expected = setup_events(0x44);
    expected.extend([write(0x44, 0x20, 0xB8), write(0x44, 0x21, 0x00)]);
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn release_returns_the_bus() {
    let (_log, bus, delay) = fakes();
    let mut servos = ServoController::new_with_address(bus, delay, 0x41);
    servos
        .write_angle(ChannelId::Servo16, 180.0)
        .expect("write");

    let (bus, _delay) = servos.release();
    assert_eq!(bus.register(0x41, 0xFE), Some(0x79));
    assert_eq!(bus.register(0x41, 0x00), Some(0x01));
    assert_eq!(bus.register(0x41, 0x44), Some(0x99));
    assert_eq!(bus.register(0x41, 0x45), Some(0x01));
}
