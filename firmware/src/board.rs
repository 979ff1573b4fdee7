//! The Pico Display Pack as an Asteroid Defender board.

use asteroid_defender::hal::{Buzzer, Clock, Controls, PixelSink, Scoreboard, StatusReadout};
use asteroid_defender::status::{lives_leds, lives_line, score_line};
use asteroid_defender::{Axis, Button, ButtonLatch, MatrixDisplay, Millis, PixelColour};
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::Input;
use embassy_rp::pwm::{self, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Instant;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

// --- Screen layout ---
pub const FIELD_ORIGIN: Point = Point::new(8, 3);
pub const CELL: u32 = 8;
const HUD_X: i32 = 88;
const HUD_W: u32 = 152;
const SCREEN_H: u32 = 135;
const SCORE_Y: i32 = 24;
const LIVES_Y: i32 = 50;
const LIVES_LEDS_Y: i32 = 78;
const GAME_OVER_Y: i32 = 98;

/// Lives squares left to right, by lives-LED port bit.
const LED_SLOTS: [u8; 4] = [5, 4, 3, 2];

// --- Buzzer ---
/// 125 MHz system clock divided down to a 1 MHz PWM counter.
const PWM_DIVIDER: u8 = 125;
const PWM_COUNTER_HZ: u32 = 1_000_000;

// --- Joystick ---
const STICK_CENTRE: u16 = 512;

pub static BUTTONS: ButtonLatch = ButtonLatch::new();

pub static SERIAL: Channel<CriticalSectionRawMutex, u8, 32> = Channel::new();

/// Serial console bytes from the USB port that also carries the log.
pub struct SerialHandler;

impl embassy_usb_logger::ReceiverHandler for SerialHandler {
    async fn handle_data(&self, data: &[u8]) {
        let sent = data.iter().take_while(|&&byte| SERIAL.try_send(byte).is_ok()).count();
        if sent < data.len() {
            log::warn!("serial input full, dropping {} bytes", data.len() - sent);
        }
    }

    fn new() -> Self {
        Self
    }
}

pub struct Joystick<'d> {
    pub adc: Adc<'d, adc::Blocking>,
    pub x: adc::Channel<'d>,
    pub y: adc::Channel<'d>,
}

pub struct PicoBoard<'d, D> {
    matrix: MatrixDisplay<D>,
    buzzer: Pwm<'d>,
    buzzer_config: pwm::Config,
    audio_enable: Input<'d>,
    stick: Joystick<'d>,
    score: u32,
}

impl<'d, D> PicoBoard<'d, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(display: D, buzzer: Pwm<'d>, audio_enable: Input<'d>, stick: Joystick<'d>) -> Self {
        let mut buzzer_config = pwm::Config::default();
        buzzer_config.divider = PWM_DIVIDER.into();
        buzzer_config.compare_b = 0;
        let mut board = Self {
            matrix: MatrixDisplay::new(display, FIELD_ORIGIN, CELL),
            buzzer,
            buzzer_config,
            audio_enable,
            stick,
            score: 0,
        };
        board.buzzer.set_config(&board.buzzer_config);
        board
    }

    fn draw_hud(&mut self, score: u32, lives: u8) {
        let title_style = MonoTextStyle::new(&FONT_6X10, Rgb565::YELLOW);
        let hud_style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        let life_on = Rgb565::RED;
        let life_off = Rgb565::new(4, 8, 4);
        let leds = lives_leds(lives);

        let display = self.matrix.target_mut();
        let mut ok = Rectangle::new(Point::new(HUD_X, 0), Size::new(HUD_W, SCREEN_H))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(display)
            .is_ok();
        ok &= Text::with_baseline("ASTEROID DEFENDER", Point::new(HUD_X + 8, 6), title_style, Baseline::Top)
            .draw(display)
            .is_ok();
        ok &= Text::with_baseline(&score_line(score), Point::new(HUD_X + 8, SCORE_Y), hud_style, Baseline::Top)
            .draw(display)
            .is_ok();
        ok &= Text::with_baseline(&lives_line(lives), Point::new(HUD_X + 8, LIVES_Y), hud_style, Baseline::Top)
            .draw(display)
            .is_ok();
        for (i, bit) in LED_SLOTS.iter().enumerate() {
            let color = if leds & (1 << bit) != 0 { life_on } else { life_off };
            let x = HUD_X + 8 + (i as i32) * 16;
            ok &= Rectangle::new(Point::new(x, LIVES_LEDS_Y), Size::new(10, 10))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)
                .is_ok();
        }
        if !ok {
            log::warn!("HUD draw failed");
        }
    }

    fn draw_game_over(&mut self) {
        let gameover_style = MonoTextStyle::new(&FONT_10X20, Rgb565::RED);
        let info_style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);

        let display = self.matrix.target_mut();
        let ok = Text::with_baseline("GAME OVER", Point::new(HUD_X + 8, GAME_OVER_Y), gameover_style, Baseline::Top)
            .draw(display)
            .is_ok()
            && Text::with_baseline(
                "Press any button",
                Point::new(HUD_X + 8, GAME_OVER_Y + 22),
                info_style,
                Baseline::Top,
            )
            .draw(display)
            .is_ok();
        if !ok {
            log::warn!("game over banner draw failed");
        }
    }
}

impl<D> Clock for PicoBoard<'_, D> {
    fn now(&self) -> Millis {
        Instant::now().as_millis() as Millis
    }
}

impl<D> PixelSink for PicoBoard<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_pixel(&mut self, row: u8, col: u8, colour: PixelColour) {
        self.matrix.set_pixel(row, col, colour);
    }

    fn clear(&mut self) {
        self.matrix.clear();
    }
}

impl<D> Buzzer for PicoBoard<'_, D> {
    fn play_tone(&mut self, hz: u16) {
        let top = (PWM_COUNTER_HZ / u32::from(hz.max(16))).min(u32::from(u16::MAX)) as u16;
        self.buzzer_config.top = top;
        self.buzzer_config.compare_b = top / 2;
        self.buzzer.set_config(&self.buzzer_config);
    }

    fn stop_tone(&mut self) {
        self.buzzer_config.compare_b = 0;
        self.buzzer.set_config(&self.buzzer_config);
    }

    fn audio_enabled(&self) -> bool {
        self.audio_enable.is_high()
    }
}

impl<D> Scoreboard for PicoBoard<'_, D> {
    fn add(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset(&mut self) {
        self.score = 0;
    }
}

impl<D> StatusReadout for PicoBoard<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn render_status(&mut self, score: u32, lives: u8) {
        self.draw_hud(score, lives);
    }

    fn render_game_over(&mut self, score: u32) {
        self.draw_hud(score, 0);
        self.draw_game_over();
    }
}

impl<D> Controls for PicoBoard<'_, D> {
    fn poll_button(&mut self) -> Option<Button> {
        BUTTONS.take()
    }

    fn read_serial(&mut self) -> Option<u8> {
        SERIAL.try_receive().ok()
    }

    /// 12-bit ADC reading scaled to 0..1023.
    fn sample_axis(&mut self, axis: Axis) -> u16 {
        let channel = match axis {
            Axis::X => &mut self.stick.x,
            Axis::Y => &mut self.stick.y,
        };
        match self.stick.adc.blocking_read(channel) {
            Ok(raw) => raw >> 2,
            Err(_) => {
                log::warn!("joystick read failed");
                STICK_CENTRE
            }
        }
    }
}
