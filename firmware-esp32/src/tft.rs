//! Framebuffer drawing for the 240x135 ST7789 panel.
//!
//! All drawing lands in an RGB565 framebuffer. [`Display::flush`] only marks
//! it dirty; the control loop pushes the bytes to the panel over SPI.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Baseline, Text};
use glove_core::display::{Color, Display};
use glove_core::text::{FontScale, TextSurface};
use glove_proto::DEVICE_NAME;
use lcd_async::raw_framebuf::RawFrameBuf;

/// Panel width in landscape.
pub const WIDTH: usize = 240;
/// Panel height in landscape.
pub const HEIGHT: usize = 135;
/// RGB565 framebuffer size.
pub const FRAME_BYTES: usize = WIDTH * HEIGHT * 2;

fn rgb(color: Color) -> Rgb565 {
    match color {
        Color::Black => Rgb565::BLACK,
        Color::White => Rgb565::WHITE,
        Color::Green => Rgb565::GREEN,
        Color::Red => Rgb565::RED,
    }
}

fn font(scale: FontScale) -> &'static MonoFont<'static> {
    match scale {
        FontScale::Small => &FONT_6X10,
        FontScale::Large => &FONT_10X20,
    }
}

fn size(w: i32, h: i32) -> Size {
    Size::new(w.max(0) as u32, h.max(0) as u32)
}

/// Screen state backed by a static framebuffer.
pub struct FrameDisplay {
    frame: &'static mut [u8; FRAME_BYTES],
    scale: FontScale,
    dirty: bool,
}

impl FrameDisplay {
    pub fn new(frame: &'static mut [u8; FRAME_BYTES]) -> Self {
        Self {
            frame,
            scale: FontScale::Small,
            dirty: true,
        }
    }

    /// Whether a flush happened since the last call.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Raw RGB565 bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.frame[..]
    }

    fn canvas(&mut self) -> RawFrameBuf<Rgb565, &mut [u8]> {
        RawFrameBuf::new(&mut self.frame[..], WIDTH, HEIGHT)
    }

    fn style(&self, fg: Color, bg: Color) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyleBuilder::new()
            .font(font(self.scale))
            .text_color(rgb(fg))
            .background_color(rgb(bg))
            .build()
    }

    fn fill(&mut self, shape: Rectangle, color: Color) {
        let _ = shape
            .into_styled(PrimitiveStyle::with_fill(rgb(color)))
            .draw(&mut self.canvas());
    }
}

impl TextSurface for FrameDisplay {
    fn glyph_width(&self, _glyph: u8) -> i32 {
        let f = font(self.scale);
        (f.character_size.width + f.character_spacing) as i32
    }

    fn glyph_height(&self) -> i32 {
        font(self.scale).character_size.height as i32
    }

    fn width(&self) -> i32 {
        WIDTH as i32
    }

    fn height(&self) -> i32 {
        HEIGHT as i32
    }

    fn draw_glyph(&mut self, glyph: u8, x: i32, y: i32) {
        let buf = [if glyph.is_ascii() { glyph } else { b'?' }];
        let text = core::str::from_utf8(&buf).unwrap_or("?");
        self.draw_string(text, x, y, Color::White, Color::Black);
    }

    fn clear(&mut self) {
        self.fill_screen(Color::Black);
    }
}

impl Display for FrameDisplay {
    fn set_font_scale(&mut self, scale: FontScale) {
        self.scale = scale;
    }

    fn fill_screen(&mut self, color: Color) {
        let _ = self.canvas().clear(rgb(color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.fill(Rectangle::new(Point::new(x, y), size(w, h)), color);
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, radius: i32, color: Color) {
        let rect = Rectangle::new(Point::new(x, y), size(w, h));
        let _ = RoundedRectangle::with_equal_corners(rect, size(radius, radius))
            .into_styled(PrimitiveStyle::with_fill(rgb(color)))
            .draw(&mut self.canvas());
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let diameter = (2 * radius + 1).max(0) as u32;
        let _ = Circle::with_center(Point::new(cx, cy), diameter)
            .into_styled(PrimitiveStyle::with_fill(rgb(color)))
            .draw(&mut self.canvas());
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let _ = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1))
            .draw(&mut self.canvas());
    }

    fn draw_string(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color) {
        let style = self.style(fg, bg);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.canvas());
    }

    fn text_width(&self, text: &str) -> i32 {
        text.len() as i32 * self.glyph_width(b' ')
    }

    fn font_height(&self) -> i32 {
        self.glyph_height()
    }

    fn show_splash(&mut self) {
        let previous = self.scale;
        self.fill_screen(Color::Black);
        self.scale = FontScale::Large;
        let x = (self.width() - self.text_width(DEVICE_NAME)) / 2;
        let y = (self.height() - self.font_height()) / 2;
        self.draw_string(DEVICE_NAME, x, y, Color::Green, Color::Black);
        self.scale = previous;
    }

    fn flush(&mut self) {
        self.dirty = true;
    }
}
