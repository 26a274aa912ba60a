use std::time::Duration;

use striply::config::SessionConfig;
use striply::countdown::CountdownDisplay;
use striply::layout::StripGeometry;
use striply::sequencer::{CaptureRun, RunEvent};
use striply::shutter::Mute;
use striply::types::{CellRect, FrameBuffer, Rgb};

const FEED: Rgb = Rgb::hex(0x336699);

fn session(layout: &str) -> SessionConfig {
    SessionConfig {
        layout: layout.parse().unwrap(),
        shutter_sound: None,
        ..Default::default()
    }
}

/// Drive a run to completion in 250ms steps, returning every event.
fn run_to_end(run: &mut CaptureRun, frame: &FrameBuffer) -> Vec<RunEvent> {
    let mut events = Vec::new();
    for _ in 0..1_000 {
        if !run.is_running() {
            break;
        }
        events.extend(run.advance(Duration::from_millis(250), Some(frame), &mut Mute).unwrap());
    }
    events
}

fn decode(run: &CaptureRun) -> image::RgbImage {
    let export = run.export().expect("finished run has an export");
    image::load_from_memory(export.png_bytes()).unwrap().to_rgb8()
}

#[test]
fn two_by_three_fills_six_cells_row_major() {
    let mut run = CaptureRun::start(&session("2x3")).unwrap();
    let frame = FrameBuffer::new(64, 48, FEED);
    let events = run_to_end(&mut run, &frame);

    let drawn: Vec<(usize, CellRect)> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::CellCaptured { index, rect } => Some((*index, *rect)),
            _ => None,
        })
        .collect();
    let origins: Vec<(i32, i32)> = drawn.iter().map(|(_, r)| (r.x, r.y)).collect();
    assert_eq!(
        origins,
        vec![(15, 15), (230, 15), (15, 230), (230, 230), (15, 445), (230, 445)]
    );
    assert!(drawn.iter().enumerate().all(|(i, (index, _))| i == *index));
    assert!(drawn.iter().all(|(_, r)| r.width == 200 && r.height == 200));
    assert_eq!(events.last(), Some(&RunEvent::Finished));

    let img = decode(&run);
    assert_eq!(img.dimensions(), (445, 740));
    for (_, r) in &drawn {
        let center = img.get_pixel((r.x + 100) as u32, (r.y + 100) as u32);
        assert_eq!(center.0, [0x33, 0x66, 0x99]);
        // rounded corner: the cell's own corner pixel stays background
        assert_eq!(img.get_pixel(r.x as u32, r.y as u32).0, [0xff, 0xff, 0xff]);
    }
}

#[test]
fn every_draw_follows_its_own_countdown() {
    let mut run = CaptureRun::start(&session("1x4")).unwrap();
    let frame = FrameBuffer::new(8, 8, FEED);
    let events = run_to_end(&mut run, &frame);

    // Every cell sees a full 3, 2, 1 and the flash before it is drawn.
    let mut saw_flash = false;
    let mut numbers = Vec::new();
    let mut per_cell = Vec::new();
    for e in &events {
        match e {
            RunEvent::Countdown(CountdownDisplay::Number(n)) => numbers.push(*n),
            RunEvent::Countdown(CountdownDisplay::Flash) => saw_flash = true,
            RunEvent::CellCaptured { index, .. } => {
                assert!(saw_flash, "capture {index} happened without a flash");
                saw_flash = false;
                per_cell.push(std::mem::take(&mut numbers));
            }
            _ => {}
        }
    }
    assert_eq!(per_cell, vec![vec![3, 2, 1]; 4]);
    assert!(numbers.is_empty());
}

#[test]
fn footer_timestamp_is_centered_in_the_footer() {
    let mut run = CaptureRun::start(&session("2x3")).unwrap();
    let frame = FrameBuffer::new(8, 8, FEED);
    run_to_end(&mut run, &frame);
    let img = decode(&run);
    let (w, h) = img.dimensions();

    let geometry = StripGeometry::default();
    let last_cell_bottom = 15 + 2 * 215 + geometry.photo_size;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (u32::MAX, 0, u32::MAX, 0);
    for y in last_cell_bottom..h {
        for x in 0..w {
            if img.get_pixel(x, y).0 != [0xff, 0xff, 0xff] {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }
    assert!(min_x < max_x, "no footer text found");
    assert!(min_y >= h - geometry.footer_height);
    assert!(max_y < h - 30 + 1);
    let center = (min_x + max_x) as i32 / 2;
    assert!((center - w as i32 / 2).abs() <= 2, "text centered at {center}, canvas {w}");
}

#[test]
fn backgrounds_paint_the_top_left_pixel() {
    let cases = [
        ("default", [0xff, 0xff, 0xff]),
        ("pink", [0xff, 0xe1, 0xf0]),
        ("blue", [0xd1, 0xf1, 0xff]),
        ("gradient", [0xfb, 0xe1, 0xf1]),
    ];
    for (name, expected) in cases {
        let mut config = session("1x1");
        config.background = name.parse().unwrap();
        let mut run = CaptureRun::start(&config).unwrap();
        run_to_end(&mut run, &FrameBuffer::new(4, 4, FEED));
        assert_eq!(decode(&run).get_pixel(0, 0).0, expected, "background {name}");
    }
}

#[test]
fn gradient_ends_at_the_bottom_stop() {
    let mut config = session("1x1");
    config.background = "gradient".parse().unwrap();
    let mut run = CaptureRun::start(&config).unwrap();
    run_to_end(&mut run, &FrameBuffer::new(4, 4, FEED));
    let img = decode(&run);
    assert_eq!(img.get_pixel(0, img.height() - 1).0, [0xdb, 0xe9, 0xff]);
}

#[test]
fn missing_background_picture_fails_the_start() {
    let mut config = session("1x1");
    config.background = "image:/definitely/not/here.png".parse().unwrap();
    assert!(matches!(CaptureRun::start(&config), Err(striply::Error::Asset(_))));
}

#[test]
fn filter_reaches_the_strip() {
    let mut config = session("1x1");
    config.filter = "grayscale(100%)".parse().unwrap();
    let mut run = CaptureRun::start(&config).unwrap();
    run_to_end(&mut run, &FrameBuffer::new(8, 8, Rgb::hex(0xff0000)));
    let [r, g, b] = decode(&run).get_pixel(115, 115).0;
    assert_eq!(r, g);
    assert_eq!(g, b);
}
