use std::time::Duration;

use oledstat::{
    display::{
        renderer::{text_width, BAR_HEIGHT, ROW_BAR},
        render, Fonts, Frame, ScrollState, DISPLAY_HEIGHT, DISPLAY_WIDTH,
    },
    metrics::{MetricFault, MetricSource, Sampler, SamplerSettings, SystemSnapshot, NO_NETWORK},
};

const GIB: u64 = 1024 * 1024 * 1024;
const PORT: u16 = 8000;

fn offline_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        ip_address: NO_NETWORK.into(),
        cpu_temp_celsius: 0.0,
        cpu_load_percent: 0.0,
        disk_used_bytes: GIB,
        disk_total_bytes: 32 * GIB,
    }
}

fn panel() -> Frame {
    Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
}

#[test]
fn offline_board_renders_sentinel_rows() {
    let mut frame = panel();
    let mut scroll = ScrollState::new("idle", 2, DISPLAY_WIDTH as i32);
    let report = render(
        &mut frame,
        &offline_snapshot(),
        &mut scroll,
        &Fonts::default(),
        PORT,
    );
    assert_eq!(report.ip_line, "IP: No Network:8000");
    assert_eq!(report.cpu_line, "CPU: 0.0°C 0%");
    assert_eq!(report.bar_fill, 0);
    assert_eq!(report.disk_line, "Disk: 1.0/32.0GB");
    // Outlined but empty track.
    assert!(frame.pixel(0, ROW_BAR));
    assert!(!frame.pixel(10, ROW_BAR + 2));
}

#[test]
fn full_load_fills_the_whole_track() {
    let mut frame = panel();
    let mut scroll = ScrollState::new("idle", 2, DISPLAY_WIDTH as i32);
    let snapshot = SystemSnapshot {
        cpu_load_percent: 100.0,
        ..offline_snapshot()
    };
    let report = render(&mut frame, &snapshot, &mut scroll, &Fonts::default(), PORT);
    assert_eq!(report.bar_fill, DISPLAY_WIDTH);
    for y in ROW_BAR..ROW_BAR + BAR_HEIGHT as i32 {
        for x in 0..DISPLAY_WIDTH as i32 {
            assert!(frame.pixel(x, y), "unlit bar pixel at ({x}, {y})");
        }
    }
}

#[test]
fn unreadable_sensor_shows_zero_degrees() {
    let dir = tempfile::tempdir().unwrap();
    let mut sampler = Sampler::new(SamplerSettings {
        ip_probe_target: "127.0.0.1:9".into(),
        thermal_zone: dir
            .path()
            .join("thermal_zone0")
            .join("temp")
            .to_string_lossy()
            .into_owned(),
        disk_mount: "/".into(),
        cpu_sample_interval: Duration::from_millis(10),
    });
    let snapshot = sampler.sample();
    assert_eq!(snapshot.cpu_temp_celsius, 0.0);
    assert!(sampler
        .faults()
        .iter()
        .any(|fault| matches!(fault, MetricFault::SensorUnavailable(_))));

    let mut frame = panel();
    let mut scroll = ScrollState::new("idle", 2, DISPLAY_WIDTH as i32);
    let report = render(&mut frame, &snapshot, &mut scroll, &Fonts::default(), PORT);
    assert!(
        report.cpu_line.starts_with("CPU: 0.0°C "),
        "unexpected cpu row {}",
        report.cpu_line
    );
}

#[test]
fn fitting_caption_never_moves() {
    let fonts = Fonts::default();
    let caption = "Pi online";
    let expected_x = (DISPLAY_WIDTH as i32 - text_width(caption, fonts.caption)) / 2;
    let mut frame = panel();
    let mut scroll = ScrollState::new(caption, 5, DISPLAY_WIDTH as i32);
    for _ in 0..50 {
        let report = render(&mut frame, &offline_snapshot(), &mut scroll, &fonts, PORT);
        assert_eq!(report.caption_x, expected_x);
        assert_eq!(scroll.offset(), DISPLAY_WIDTH as i32);
    }
}

#[test]
fn marquee_wraps_to_right_edge_exactly() {
    let fonts = Fonts::default();
    let caption = "uptime 3 days, 4 users, load average 0.42 0.37 0.30";
    let width = text_width(caption, fonts.caption);
    assert!(width > DISPLAY_WIDTH as i32);

    let speed = 4;
    let mut frame = panel();
    let mut scroll = ScrollState::new(caption, speed, DISPLAY_WIDTH as i32);
    let mut seen = Vec::new();
    for _ in 0..400 {
        let report = render(&mut frame, &offline_snapshot(), &mut scroll, &fonts, PORT);
        assert!(report.caption_scrolled);
        seen.push(report.caption_x);
    }

    let wrap_at = seen
        .iter()
        .skip(1)
        .position(|&x| x == DISPLAY_WIDTH as i32)
        .map(|idx| idx + 1)
        .expect("caption never wrapped");
    for pair in seen[..wrap_at].windows(2) {
        assert_eq!(pair[1], pair[0] - speed);
    }
    assert!(seen[wrap_at - 1] - speed < -width);
    assert!(seen[wrap_at - 1] >= -width);
    assert_eq!(seen[wrap_at + 1], DISPLAY_WIDTH as i32 - speed);
}
