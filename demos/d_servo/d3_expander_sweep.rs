#![no_std]
#![no_main]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Delay, Timer};
use servo_expander::{ChannelId, PulseProfile, Result, ServoController};
use {defmt::info, defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // Expander on I2C0: SDA = GPIO 4, SCL = GPIO 5, default address 0x40.
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut servos = ServoController::new(i2c, Delay).with_diagnostics(|prescale: u8| {
        info!("prescale read back: {}", prescale);
    });

    // An SG90 on output 1, a standard servo on output 2.
    servos.set_pulse_profile(ChannelId::Servo1, PulseProfile::Us500To2500);
    servos.set_pulse_profile(ChannelId::Servo2, PulseProfile::Us1000To2000);

    servos.center(ChannelId::Servo1)?;
    servos.center(ChannelId::Servo2)?;
    Timer::after_millis(500).await;

    // Sweep both servos in opposite directions, 10 degrees at a time. Include 180 degrees.
    loop {
        for degrees in (0..=180_u8).step_by(10) {
            let degrees = f32::from(degrees);
            servos.write_angle(ChannelId::Servo1, degrees)?;
            servos.write_angle(ChannelId::Servo2, 180.0 - degrees)?;
            Timer::after_millis(100).await;
        }

        // Let both servos go limp between sweeps.
        info!("relaxing");
        servos.relax(ChannelId::Servo1)?;
        servos.relax(ChannelId::Servo2)?;
        Timer::after_secs(2).await;
    }
}
