//! Screen layout: status banner, message area, boot and fault screens.
//!
//! The screen is split into a main area for received text and a 20 px strip
//! along the bottom edge that holds the connection banner.

use core::fmt::Write;

use heapless::String;

use crate::config::{ConfigError, GloveConfig, FLEX_COUNT};
use crate::link::StatusIndicator;
use crate::text::{render, DisplayMessage, FontScale, TextSurface};

/// Height of the status strip at the bottom of the screen.
pub const STATUS_STRIP_HEIGHT: i32 = 20;
/// Top-left corner of received text.
pub const MESSAGE_ORIGIN: (i32, i32) = (10, 20);
/// Corner radius of the status banner.
pub const BANNER_RADIUS: i32 = 5;
/// Banner text offset from the banner's top-left corner.
pub const BANNER_INSET: (i32, i32) = (5, 2);
/// Spinner outer radius.
pub const SPINNER_RADIUS: i32 = 10;
/// Spinner spoke length.
pub const SPINNER_SPOKE: i32 = 3;
/// Spokes per revolution.
pub const SPINNER_SEGMENTS: usize = 12;
/// Gap between the waiting text and the spinner centre.
pub const SPINNER_GAP: i32 = 20;

/// Waiting-screen caption.
pub const WAITING_TEXT: &str = "Waiting for connection...";
/// First line of the missing-IMU screen; also used to centre that screen.
pub const IMU_MISSING_TEXT: &str = "Failed to find MPU6050 chip";

/// Colours used by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Green,
    Red,
}

/// Full drawing surface of the board's screen.
///
/// [`TextSurface::draw_glyph`] renders white on black at the scale last set
/// with [`Display::set_font_scale`]; [`TextSurface::clear`] fills the screen
/// with black. Drawing may be buffered until [`Display::flush`].
pub trait Display: TextSurface {
    fn set_font_scale(&mut self, scale: FontScale);
    fn fill_screen(&mut self, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, radius: i32, color: Color);
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    /// Draw `text` on one line with its top-left corner at `(x, y)`.
    fn draw_string(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color);
    /// Rendered width of `text` at the active scale.
    fn text_width(&self, text: &str) -> i32;
    /// Line height at the active scale.
    fn font_height(&self) -> i32;
    /// Blit the boot splash image.
    fn show_splash(&mut self);
    /// Push buffered drawing to the panel.
    fn flush(&mut self);
}

/// Draw the connection banner in the bottom-left corner.
pub fn draw_status_banner<D: Display + ?Sized>(display: &mut D, status: StatusIndicator) {
    let (fg, bg) = match status {
        StatusIndicator::Connected => (Color::Black, Color::Green),
        StatusIndicator::Disconnected => (Color::White, Color::Red),
    };
    let label = status.label();
    display.set_font_scale(FontScale::Small);
    let x = 0;
    let y = display.height() - STATUS_STRIP_HEIGHT;
    let w = display.text_width(label) + 2 * BANNER_INSET.0;
    let h = display.font_height() + 2 * BANNER_INSET.1;
    display.fill_round_rect(x, y, w, h, BANNER_RADIUS, bg);
    display.draw_string(label, x + BANNER_INSET.0, y + BANNER_INSET.1, fg, bg);
}

/// Blank everything above the status strip.
pub fn clear_main_area<D: Display + ?Sized>(display: &mut D) {
    let w = display.width();
    let h = display.height() - STATUS_STRIP_HEIGHT;
    display.fill_rect(0, 0, w, h, Color::Black);
}

/// Lay out `message` at its own scale from [`MESSAGE_ORIGIN`].
pub fn draw_message<D: Display + ?Sized>(display: &mut D, message: &DisplayMessage) {
    display.set_font_scale(message.scale());
    render(display, message.text(), MESSAGE_ORIGIN.0, MESSAGE_ORIGIN.1);
}

/// Origin that centres one line of `text` on the screen at the active scale.
#[must_use]
pub fn centered<D: Display + ?Sized>(display: &D, text: &str) -> (i32, i32) {
    (
        (display.width() - display.text_width(text)) / 2,
        (display.height() - display.font_height()) / 2,
    )
}

/// Show the waiting caption and return a spinner placed below it.
pub fn draw_waiting_screen<D: Display + ?Sized>(display: &mut D) -> Spinner {
    display.fill_screen(Color::Black);
    display.set_font_scale(FontScale::Small);
    let (x, y) = centered(display, WAITING_TEXT);
    render(display, WAITING_TEXT.as_bytes(), x, y);
    Spinner::new(display.width() / 2, y + display.font_height() + SPINNER_GAP)
}

// cos(k * 30°) for k in 0..12; sin is the same table shifted by a quarter turn.
const COS_30: [f32; SPINNER_SEGMENTS] = [
    1.0,
    0.866_025_4,
    0.5,
    0.0,
    -0.5,
    -0.866_025_4,
    -1.0,
    -0.866_025_4,
    -0.5,
    0.0,
    0.5,
    0.866_025_4,
];

#[inline]
fn cos_step(k: usize) -> f32 {
    COS_30[k % SPINNER_SEGMENTS]
}

#[inline]
fn sin_step(k: usize) -> f32 {
    COS_30[(k + SPINNER_SEGMENTS - 3) % SPINNER_SEGMENTS]
}

/// Twelve-spoke loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Spinner {
    pub cx: i32,
    pub cy: i32,
}

impl Spinner {
    #[must_use]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Endpoints of every spoke for `frame`, outer point first.
    #[must_use]
    pub fn spokes(&self, frame: u8) -> [(i32, i32, i32, i32); SPINNER_SEGMENTS] {
        let outer = SPINNER_RADIUS as f32;
        let inner = (SPINNER_RADIUS - SPINNER_SPOKE) as f32;
        let (cx, cy) = (self.cx as f32, self.cy as f32);
        let mut out = [(0, 0, 0, 0); SPINNER_SEGMENTS];
        for (i, spoke) in out.iter_mut().enumerate() {
            let k = usize::from(frame) + i;
            let (c, s) = (cos_step(k), sin_step(k));
            *spoke = (
                (cx + outer * c) as i32,
                (cy + outer * s) as i32,
                (cx + inner * c) as i32,
                (cy + inner * s) as i32,
            );
        }
        out
    }

    /// Erase the previous frame and draw `frame`.
    pub fn draw<D: Display + ?Sized>(&self, display: &mut D, frame: u8) {
        display.fill_circle(self.cx, self.cy, SPINNER_RADIUS + 2, Color::Black);
        for (x0, y0, x1, y1) in self.spokes(frame) {
            display.draw_line(x0, y0, x1, y1, Color::White);
        }
    }
}

/// Static diagnostic screens shown when the glove cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultScreen {
    /// IMU did not answer: name the I²C pins.
    ImuWiring,
    /// Follow-up to `ImuWiring`: list the flex sensor pins.
    FlexPins,
    /// Calibration constants failed validation.
    Config(ConfigError),
}

/// Longest fault text.
pub const FAULT_TEXT_LEN: usize = 96;

/// Text shown for `screen`.
#[must_use]
pub fn fault_text(screen: FaultScreen, config: &GloveConfig) -> String<FAULT_TEXT_LEN> {
    let mut text = String::new();
    // Overflow only truncates the on-screen hint.
    let _ = match screen {
        FaultScreen::ImuWiring => write!(
            text,
            "{}. Connect SDA to Pin {}, SCL to Pin {}",
            IMU_MISSING_TEXT, config.imu_sda_pin, config.imu_scl_pin
        ),
        FaultScreen::FlexPins => {
            let mut result = Ok(());
            for (i, channel) in config.flex.iter().enumerate() {
                let sep = if i + 1 < FLEX_COUNT { ", " } else { "" };
                result = result.and(write!(text, "Flex({}){}", channel.pin, sep));
            }
            result
        }
        FaultScreen::Config(err) => write!(text, "Configuration error: {}", err),
    };
    text
}

/// Clear the screen and show `screen`.
pub fn draw_fault<D: Display + ?Sized>(display: &mut D, screen: FaultScreen, config: &GloveConfig) {
    display.fill_screen(Color::Black);
    display.set_font_scale(FontScale::Small);
    let (x, y) = centered(display, IMU_MISSING_TEXT);
    let text = fault_text(screen, config);
    render(display, text.as_bytes(), x.max(0), y);
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording display shared by the layout and pipeline tests.

    extern crate std;

    use super::*;
    use std::string::String;
    use std::vec::Vec;

    pub const GLYPH_W: i32 = 6;
    pub const GLYPH_H: i32 = 8;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Draw {
        Glyph(u8, i32, i32, FontScale),
        Clear,
        Screen(Color),
        Rect(i32, i32, i32, i32, Color),
        RoundRect(i32, i32, i32, i32, i32, Color),
        Circle(i32, i32, i32, Color),
        Line(i32, i32, i32, i32),
        Str(String, i32, i32, Color, Color),
        Splash,
        Flush,
    }

    /// 240x135 landscape panel with a 6x8 font.
    pub struct MockDisplay {
        pub scale: FontScale,
        pub ops: Vec<Draw>,
    }

    impl MockDisplay {
        pub fn new() -> Self {
            Self {
                scale: FontScale::Small,
                ops: Vec::new(),
            }
        }

        pub fn glyphs(&self) -> Vec<(u8, i32, i32, FontScale)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Draw::Glyph(g, x, y, s) => Some((*g, *x, *y, *s)),
                    _ => None,
                })
                .collect()
        }

        pub fn text(&self) -> String {
            self.glyphs().iter().map(|g| g.0 as char).collect()
        }
    }

    impl TextSurface for MockDisplay {
        fn glyph_width(&self, _glyph: u8) -> i32 {
            GLYPH_W * i32::from(self.scale.factor())
        }
        fn glyph_height(&self) -> i32 {
            GLYPH_H * i32::from(self.scale.factor())
        }
        fn width(&self) -> i32 {
            240
        }
        fn height(&self) -> i32 {
            135
        }
        fn draw_glyph(&mut self, glyph: u8, x: i32, y: i32) {
            self.ops.push(Draw::Glyph(glyph, x, y, self.scale));
        }
        fn clear(&mut self) {
            self.ops.push(Draw::Clear);
        }
    }

    impl Display for MockDisplay {
        fn set_font_scale(&mut self, scale: FontScale) {
            self.scale = scale;
        }
        fn fill_screen(&mut self, color: Color) {
            self.ops.push(Draw::Screen(color));
        }
        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
            self.ops.push(Draw::Rect(x, y, w, h, color));
        }
        fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
            self.ops.push(Draw::RoundRect(x, y, w, h, r, color));
        }
        fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
            self.ops.push(Draw::Circle(cx, cy, r, color));
        }
        fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, _color: Color) {
            self.ops.push(Draw::Line(x0, y0, x1, y1));
        }
        fn draw_string(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color) {
            self.ops.push(Draw::Str(String::from(text), x, y, fg, bg));
        }
        fn text_width(&self, text: &str) -> i32 {
            text.len() as i32 * self.glyph_width(b' ')
        }
        fn font_height(&self) -> i32 {
            self.glyph_height()
        }
        fn show_splash(&mut self) {
            self.ops.push(Draw::Splash);
        }
        fn flush(&mut self) {
            self.ops.push(Draw::Flush);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::mock::{Draw, MockDisplay, GLYPH_H, GLYPH_W};
    use super::*;
    use crate::config::DEFAULT_CONFIG;
    use std::string::String;

    #[test]
    fn test_connected_banner_layout() {
        let mut d = MockDisplay::new();
        d.set_font_scale(FontScale::Large);
        draw_status_banner(&mut d, StatusIndicator::Connected);
        assert_eq!(
            d.ops,
            [
                Draw::RoundRect(0, 115, 9 * GLYPH_W + 10, GLYPH_H + 4, 5, Color::Green),
                Draw::Str(String::from("Connected"), 5, 117, Color::Black, Color::Green),
            ]
        );
        // Banner always uses the small font.
        assert_eq!(d.scale, FontScale::Small);
    }

    #[test]
    fn test_disconnected_banner_colors() {
        let mut d = MockDisplay::new();
        draw_status_banner(&mut d, StatusIndicator::Disconnected);
        assert!(matches!(
            d.ops[0],
            Draw::RoundRect(0, 115, w, _, 5, Color::Red) if w == 12 * GLYPH_W + 10
        ));
        assert!(matches!(
            &d.ops[1],
            Draw::Str(s, 5, 117, Color::White, Color::Red) if s == "Disconnected"
        ));
    }

    #[test]
    fn test_clear_main_area_spares_status_strip() {
        let mut d = MockDisplay::new();
        clear_main_area(&mut d);
        assert_eq!(d.ops, [Draw::Rect(0, 0, 240, 115, Color::Black)]);
    }

    #[test]
    fn test_message_drawn_at_origin_with_its_scale() {
        let mut d = MockDisplay::new();
        let mut m = DisplayMessage::new();
        m.replace(b"hi");
        m.toggle_scale();
        draw_message(&mut d, &m);
        assert_eq!(
            d.glyphs(),
            [
                (b'h', 10, 20, FontScale::Large),
                (b'i', 10 + 2 * GLYPH_W, 20, FontScale::Large),
            ]
        );
    }

    #[test]
    fn test_waiting_screen_centres_caption() {
        let mut d = MockDisplay::new();
        let spinner = draw_waiting_screen(&mut d);
        assert_eq!(d.ops[0], Draw::Screen(Color::Black));
        assert_eq!(d.text(), WAITING_TEXT);
        let x = (240 - 25 * GLYPH_W) / 2;
        let y = (135 - GLYPH_H) / 2;
        assert_eq!(d.glyphs()[0], (b'W', x, y, FontScale::Small));
        assert_eq!(spinner, Spinner::new(120, y + GLYPH_H + 20));
    }

    #[test]
    fn test_spinner_spokes() {
        let spinner = Spinner::new(120, 100);
        let spokes = spinner.spokes(0);
        assert_eq!(spokes[0], (130, 100, 127, 100));
        assert_eq!(spokes[3], (120, 110, 120, 107));
        assert_eq!(spokes[6], (110, 100, 113, 100));
        assert_eq!(spokes[9], (120, 90, 120, 93));
        // One frame advances the pattern by one spoke.
        assert_eq!(spinner.spokes(1)[0], spokes[1]);
        assert_eq!(spinner.spokes(12), spokes);
    }

    #[test]
    fn test_spinner_erases_previous_frame() {
        let mut d = MockDisplay::new();
        Spinner::new(50, 60).draw(&mut d, 4);
        assert_eq!(d.ops[0], Draw::Circle(50, 60, 12, Color::Black));
        assert_eq!(d.ops.len(), 1 + SPINNER_SEGMENTS);
    }

    #[test]
    fn test_fault_texts() {
        assert_eq!(
            fault_text(FaultScreen::ImuWiring, &DEFAULT_CONFIG).as_str(),
            "Failed to find MPU6050 chip. Connect SDA to Pin 21, SCL to Pin 22"
        );
        assert_eq!(
            fault_text(FaultScreen::FlexPins, &DEFAULT_CONFIG).as_str(),
            "Flex(36), Flex(39), Flex(32), Flex(33), Flex(26)"
        );
        let err = ConfigError::DegenerateCalibration { sensor: 2 };
        assert_eq!(
            fault_text(FaultScreen::Config(err), &DEFAULT_CONFIG).as_str(),
            "Configuration error: sensor 2: flat and bend resistance are equal"
        );
    }

    #[test]
    fn test_fault_screen_clears_first() {
        let mut d = MockDisplay::new();
        draw_fault(&mut d, FaultScreen::FlexPins, &DEFAULT_CONFIG);
        assert_eq!(d.ops[0], Draw::Screen(Color::Black));
        assert!(d.text().starts_with("Flex(36)"));
    }
}
