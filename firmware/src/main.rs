//! Raspberry Pi Pico - "Asteroid Defender"
//!
//! Pico Display Pack buttons:
//!   B (GP13) = left, Y (GP15) = right, X (GP14) = fire, A (GP12) unused
//! Joystick on GP26 (X) / GP27 (Y), buzzer on GP21, audio switch on GP22.
//! Serial console on the USB port: arrows or L/R to move, space to fire,
//! P to pause.
//! LED (GP25): ON during gameplay, OFF otherwise

#![no_std]
#![no_main]

mod board;

use asteroid_defender::hal::Scoreboard;
use asteroid_defender::{Button, GameLoop, Status};
use board::{BUTTONS, Joystick, PicoBoard, SerialHandler};
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_time::{Delay, Duration, Timer};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, Orientation, Rotation};
use mipidsi::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

/// Loop yield between cooperative steps.
const STEP_YIELD: Duration = Duration::from_millis(1);
const DEBOUNCE: Duration = Duration::from_millis(20);

// --- Embassy bindings ---
bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver, SerialHandler);
}

#[embassy_executor::task(pool_size = 4)]
async fn button_task(mut pin: Input<'static>, button: Button) {
    loop {
        pin.wait_for_falling_edge().await;
        BUTTONS.post(button);
        Timer::after(DEBOUNCE).await;
        pin.wait_for_high().await;
    }
}

// --- Main ---
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // USB serial logger and console
    let usb_driver = Driver::new(p.USB, Irqs);
    unwrap!(spawner.spawn(logger_task(usb_driver)));
    Timer::after(Duration::from_secs(2)).await;
    log::info!("=== Asteroid Defender ===");

    // Onboard LED (GP25 on Pico)
    let mut led = Output::new(p.PIN_25, Level::Low);

    // ST7789 display (Pico Display Pack)
    let _bl = Output::new(p.PIN_20, Level::High);
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 62_500_000;
    let spi_bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs_display = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs_display).unwrap();
    static DISPLAY_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
    let display_buf = DISPLAY_BUF.init([0u8; 1024]);
    let di = mipidsi::interface::SpiInterface::new(spi_device, dc, display_buf);
    let mut display = Builder::new(ST7789, di)
        .display_size(135, 240)
        .display_offset(52, 40)
        .invert_colors(ColorInversion::Inverted)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .init(&mut Delay)
        .unwrap();
    display.clear(Rgb565::BLACK).unwrap();
    log::info!("Display ready!");

    // Buttons (active-low, pull-up)
    //  [A]  [X]  ← X = fire
    //  [B]  [Y]  ← B = left, Y = right
    unwrap!(spawner.spawn(button_task(Input::new(p.PIN_15, Pull::Up), Button::B0)));
    unwrap!(spawner.spawn(button_task(Input::new(p.PIN_12, Pull::Up), Button::B1)));
    unwrap!(spawner.spawn(button_task(Input::new(p.PIN_14, Pull::Up), Button::B2)));
    unwrap!(spawner.spawn(button_task(Input::new(p.PIN_13, Pull::Up), Button::B3)));

    // Joystick, buzzer, audio switch
    let stick = Joystick {
        adc: Adc::new_blocking(p.ADC, adc::Config::default()),
        x: adc::Channel::new_pin(p.PIN_26, Pull::None),
        y: adc::Channel::new_pin(p.PIN_27, Pull::None),
    };
    let buzzer = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm::Config::default());
    let audio_enable = Input::new(p.PIN_22, Pull::Up);

    let mut board = PicoBoard::new(display, buzzer, audio_enable, stick);
    let mut game = GameLoop::new();
    log::info!("Entering game loop");

    loop {
        game.new_game(&mut board);
        led.set_high();
        game.start_round(&mut board);
        while game.step(&mut board) != Status::GameOver {
            Timer::after(STEP_YIELD).await;
        }
        led.set_low();
        log::info!("Game Over! Score: {}", board.score());

        let mut screen = game.begin_game_over(&mut board);
        while !game.game_over_step(&mut screen, &mut board) {
            Timer::after(STEP_YIELD).await;
        }
    }
}
