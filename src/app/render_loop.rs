use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use super::{lifecycle::clear_on_exit, Logger};
use crate::{
    display::{
        render, DisplayDevice, Fonts, Frame, RenderReport, ScrollState, DISPLAY_HEIGHT,
        DISPLAY_WIDTH,
    },
    metrics::{MetricFault, MetricSource, SystemSnapshot},
    Result,
};

/// Everything that survives between frames: the bitmap, the marquee and the fonts.
pub struct RenderContext {
    frame: Frame,
    scroll: ScrollState,
    fonts: Fonts,
    port_label: u16,
}

impl RenderContext {
    pub fn new(caption: &str, scroll_speed_px: i32, port_label: u16) -> Self {
        Self {
            frame: Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            scroll: ScrollState::new(caption, scroll_speed_px, DISPLAY_WIDTH as i32),
            fonts: Fonts::default(),
            port_label,
        }
    }

    pub fn render(&mut self, snapshot: &SystemSnapshot) -> RenderReport {
        render(
            &mut self.frame,
            snapshot,
            &mut self.scroll,
            &self.fonts,
            self.port_label,
        )
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }
}

/// Pacing for the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub frame_interval: Duration,
    pub max_frames: Option<u64>,
}

impl LoopSettings {
    fn limit_reached(&self, frames: u64) -> bool {
        self.max_frames.is_some_and(|max| frames >= max)
    }
}

/// Sample, render, flush, sleep; until `running` drops or the frame limit is hit.
/// The panel is cleared on the way out. Returns the number of frames flushed.
pub fn run_render_loop<D: DisplayDevice, S: MetricSource>(
    device: &mut D,
    source: &mut S,
    ctx: &mut RenderContext,
    settings: LoopSettings,
    logger: &Logger,
    running: &AtomicBool,
) -> Result<u64> {
    let mut frames = 0u64;
    let mut reported_faults: Vec<MetricFault> = Vec::new();

    while running.load(Ordering::SeqCst) && !settings.limit_reached(frames) {
        let snapshot = source.sample();
        report_fault_changes(logger, &mut reported_faults, source.faults());

        let report = ctx.render(&snapshot);
        logger.trace(format!(
            "frame {frames}: {} | {} | bar {}px | {} | caption x={}",
            report.ip_line, report.cpu_line, report.bar_fill, report.disk_line, report.caption_x
        ));
        device.flush(ctx.frame())?;
        frames += 1;

        if !settings.limit_reached(frames) {
            thread::sleep(settings.frame_interval);
        }
    }

    clear_on_exit(device, logger);
    logger.info(format!("render loop stopped after {frames} frames"));
    Ok(frames)
}

/// Log metric faults only when the set changes, so a missing sensor is not logged every frame.
fn report_fault_changes(
    logger: &Logger,
    reported: &mut Vec<MetricFault>,
    current: &[MetricFault],
) {
    if reported.as_slice() == current {
        return;
    }
    for fault in current.iter().filter(|f| !reported.contains(f)) {
        logger.warn(format!("degraded metric: {fault}"));
    }
    for fault in reported.iter().filter(|f| !current.contains(f)) {
        logger.info(format!("metric recovered: {fault}"));
    }
    *reported = current.to_vec();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::LogLevel, display::MemoryDevice};

    struct Fixed(SystemSnapshot);

    impl MetricSource for Fixed {
        fn sample(&mut self) -> SystemSnapshot {
            self.0.clone()
        }
    }

    fn settings(max_frames: Option<u64>) -> LoopSettings {
        LoopSettings {
            frame_interval: Duration::from_millis(1),
            max_frames,
        }
    }

    #[test]
    fn renders_requested_frames_then_clears() {
        let mut device = MemoryDevice::new();
        let mut source = Fixed(SystemSnapshot::unavailable());
        let mut ctx = RenderContext::new("a caption much wider than the panel is", 2, 8000);
        let running = AtomicBool::new(true);
        let frames = run_render_loop(
            &mut device,
            &mut source,
            &mut ctx,
            settings(Some(4)),
            &Logger::stderr(LogLevel::Error),
            &running,
        )
        .unwrap();
        assert_eq!(frames, 4);
        assert_eq!(device.flush_count(), 4);
        assert_eq!(device.clear_count(), 1);
        assert_eq!(ctx.scroll().offset(), 128 - 4 * 2);
    }

    #[test]
    fn stopped_flag_skips_rendering() {
        let mut device = MemoryDevice::new();
        let mut source = Fixed(SystemSnapshot::unavailable());
        let mut ctx = RenderContext::new("hi", 2, 8000);
        let running = AtomicBool::new(false);
        let frames = run_render_loop(
            &mut device,
            &mut source,
            &mut ctx,
            settings(None),
            &Logger::stderr(LogLevel::Error),
            &running,
        )
        .unwrap();
        assert_eq!(frames, 0);
        assert_eq!(device.flush_count(), 0);
        assert_eq!(device.clear_count(), 1);
    }

    #[test]
    fn zero_frame_limit_renders_nothing() {
        let mut device = MemoryDevice::new();
        let mut source = Fixed(SystemSnapshot::unavailable());
        let mut ctx = RenderContext::new("hi", 2, 8000);
        let running = AtomicBool::new(true);
        let frames = run_render_loop(
            &mut device,
            &mut source,
            &mut ctx,
            settings(Some(0)),
            &Logger::stderr(LogLevel::Error),
            &running,
        )
        .unwrap();
        assert_eq!(frames, 0);
        assert_eq!(device.flush_count(), 0);
    }

    #[test]
    fn fault_changes_are_tracked() {
        let logger = Logger::stderr(LogLevel::Error);
        let mut reported = Vec::new();
        let fault = MetricFault::MountNotFound("/".into());
        report_fault_changes(&logger, &mut reported, std::slice::from_ref(&fault));
        assert_eq!(reported, vec![fault]);
        report_fault_changes(&logger, &mut reported, &[]);
        assert!(reported.is_empty());
    }
}
