use embedded_graphics::{
    mono_font::{
        iso_8859_1::{FONT_6X10, FONT_7X13},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{renderer::TextRenderer, Baseline, Text},
};

use super::{
    frame::Frame,
    scroll::{centered_x, ScrollState},
};
use crate::metrics::{storage::bytes_to_gib, SystemSnapshot};

pub const ROW_IP: i32 = 0;
pub const ROW_CPU: i32 = 10;
pub const ROW_BAR: i32 = 22;
pub const ROW_DISK: i32 = 32;
pub const ROW_CAPTION: i32 = 44;
pub const BAR_HEIGHT: u32 = 6;

/// Text styles for the body rows and the caption row.
#[derive(Debug, Clone, Copy)]
pub struct Fonts {
    pub body: MonoTextStyle<'static, BinaryColor>,
    pub caption: MonoTextStyle<'static, BinaryColor>,
}

impl Default for Fonts {
    fn default() -> Self {
        // ISO-8859-1 glyph sets include the degree sign.
        Self {
            body: MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
            caption: MonoTextStyle::new(&FONT_7X13, BinaryColor::On),
        }
    }
}

/// What one render pass put on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub ip_line: String,
    pub cpu_line: String,
    pub bar_fill: u32,
    pub disk_line: String,
    pub caption_x: i32,
    pub caption_scrolled: bool,
}

/// Overwrite `frame` with the status layout for `snapshot` and advance the marquee.
pub fn render(
    frame: &mut Frame,
    snapshot: &SystemSnapshot,
    scroll: &mut ScrollState,
    fonts: &Fonts,
    port_label: u16,
) -> RenderReport {
    paint(frame.clear(BinaryColor::Off));
    let display_width = frame.width() as i32;

    let ip_line = format_ip_line(snapshot, port_label);
    let cpu_line = format_cpu_line(snapshot);
    let disk_line = format_disk_line(snapshot);
    draw_text(frame, &ip_line, 0, ROW_IP, fonts.body);
    draw_text(frame, &cpu_line, 0, ROW_CPU, fonts.body);
    let bar_fill = draw_status_bar(frame, snapshot.cpu_load_percent);
    draw_text(frame, &disk_line, 0, ROW_DISK, fonts.body);

    let caption_width = text_width(scroll.text(), fonts.caption);
    let caption_scrolled = caption_width > display_width;
    let caption_x = if caption_scrolled {
        scroll.offset()
    } else {
        centered_x(caption_width, display_width)
    };
    draw_text(frame, scroll.text(), caption_x, ROW_CAPTION, fonts.caption);
    if caption_scrolled {
        scroll.step(caption_width, display_width);
    }

    RenderReport {
        ip_line,
        cpu_line,
        bar_fill,
        disk_line,
        caption_x,
        caption_scrolled,
    }
}

pub fn format_ip_line(snapshot: &SystemSnapshot, port_label: u16) -> String {
    format!("IP: {}:{port_label}", snapshot.ip_address)
}

pub fn format_cpu_line(snapshot: &SystemSnapshot) -> String {
    format!(
        "CPU: {:.1}°C {:.0}%",
        snapshot.cpu_temp_celsius, snapshot.cpu_load_percent
    )
}

pub fn format_disk_line(snapshot: &SystemSnapshot) -> String {
    format!(
        "Disk: {:.1}/{:.1}GB",
        bytes_to_gib(snapshot.disk_used_bytes),
        bytes_to_gib(snapshot.disk_total_bytes)
    )
}

/// Filled width of the status bar: `floor(percent / 100 * track)`, clamped to the track.
pub fn bar_fill_width(percent: f64, track_width: u32) -> u32 {
    if !percent.is_finite() {
        return 0;
    }
    let fill = (percent / 100.0 * track_width as f64).floor();
    fill.clamp(0.0, track_width as f64) as u32
}

/// Rendered width of `text` in pixels.
pub fn text_width(text: &str, style: MonoTextStyle<'static, BinaryColor>) -> i32 {
    style
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size
        .width as i32
}

fn draw_status_bar(frame: &mut Frame, percent: f64) -> u32 {
    let track_width = frame.width();
    let fill = bar_fill_width(percent, track_width);

    let track = Rectangle::new(Point::new(0, ROW_BAR), Size::new(track_width, BAR_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1));
    paint(track.draw(frame));

    if fill > 0 {
        let solid = PrimitiveStyleBuilder::new()
            .stroke_color(BinaryColor::On)
            .stroke_width(1)
            .fill_color(BinaryColor::On)
            .build();
        let filled =
            Rectangle::new(Point::new(0, ROW_BAR), Size::new(fill, BAR_HEIGHT)).into_styled(solid);
        paint(filled.draw(frame));
    }
    fill
}

fn draw_text(
    frame: &mut Frame,
    text: &str,
    x: i32,
    y: i32,
    style: MonoTextStyle<'static, BinaryColor>,
) {
    let text = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top);
    paint(text.draw(frame));
}

fn paint<T>(result: Result<T, std::convert::Infallible>) {
    match result {
        Ok(_) => {}
        Err(never) => match never {},
    }
}
