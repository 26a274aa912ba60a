// Capture sequencer.
//
// A `CaptureRun` owns the strip canvas from start to finish:
//
// 1. `start` sizes the canvas and paints the background (pictures are fully
//    loaded before this returns).
// 2. `advance` lets time pass. Each cell gets its own countdown; when that
//    countdown resolves the shutter clicks and the frame on screen *right now*
//    is drawn into the cell.
// 3. After the last cell the timestamp footer is written and the canvas is
//    encoded as a `StripExport`.
//
// Ordering: cells are filled strictly row-major (rows outer, columns inner).
// Cell `i + 1`'s countdown is created only after cell `i` was drawn, and no
// draw happens before its own countdown resolved. A run can be cancelled; a
// cancelled run never produces an export.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::canvas::Canvas;
use crate::config::SessionConfig;
use crate::countdown::{Countdown, CountdownDisplay, CountdownState};
use crate::drawer::draw_rounded_image;
use crate::error::Result;
use crate::export::StripExport;
use crate::filter::FilterChain;
use crate::font::{self, TextStyle};
use crate::layout::{Layout, StripGeometry};
use crate::shutter::Shutter;
use crate::types::{CellRect, FrameBuffer, Rgb};

pub const FOOTER_TEXT_COLOR: Rgb = Rgb::hex(0x333333);
/// ~14px tall glyphs; shrinks to 1 when the label would not fit.
pub const FOOTER_TEXT_SCALE: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    /// The countdown label changed.
    Countdown(CountdownDisplay),
    /// Cell `index` was drawn at `rect`.
    CellCaptured { index: usize, rect: CellRect },
    /// Footer written, export ready.
    Finished,
}

enum Phase {
    Capturing { cell: usize, countdown: Countdown },
    Finished(StripExport),
    Cancelled,
}

pub struct CaptureRun {
    layout: Layout,
    geometry: StripGeometry,
    filter: FilterChain,
    countdown_secs: u32,
    canvas: Canvas,
    captured: Vec<CellRect>,
    /// Opening display of the first countdown, reported by the first `advance`.
    opening: Option<CountdownDisplay>,
    phase: Phase,
}

/// "Striply - 10/19/2026 3:04:05 PM"
pub fn timestamp_label(at: NaiveDateTime) -> String {
    format!("Striply - {}", at.format("%-m/%-d/%Y %-I:%M:%S %p"))
}

impl CaptureRun {
    /// Size the canvas for the session layout and paint its background.
    pub fn start(config: &SessionConfig) -> Result<Self> {
        let (w, h) = config.geometry.checked_canvas_size(config.layout)?;
        let mut canvas = Canvas::new(w as usize, h as usize);
        config.background.paint(&mut canvas)?;

        info!(
            layout = %config.layout,
            background = %config.background,
            filter = %config.filter,
            width = w,
            height = h,
            "capture run started"
        );

        let countdown = Countdown::new(config.countdown_secs);
        Ok(Self {
            layout: config.layout,
            geometry: config.geometry,
            filter: config.filter.clone(),
            countdown_secs: config.countdown_secs,
            canvas,
            captured: Vec::with_capacity(config.layout.cell_count()),
            opening: Some(countdown.display()),
            phase: Phase::Capturing { cell: 0, countdown },
        })
    }

    /// Current countdown label (blank when not counting).
    pub fn display(&self) -> CountdownDisplay {
        match &self.phase {
            Phase::Capturing { countdown, .. } => countdown.display(),
            _ => CountdownDisplay::Blank,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Capturing { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// (cells drawn, cells total)
    pub fn progress(&self) -> (usize, usize) {
        (self.captured.len(), self.layout.cell_count())
    }

    /// Rectangles drawn so far, in capture order.
    pub fn captured_cells(&self) -> &[CellRect] {
        &self.captured
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn export(&self) -> Option<&StripExport> {
        match &self.phase {
            Phase::Finished(export) => Some(export),
            _ => None,
        }
    }

    /// Let `dt` pass. `frame` is what the camera shows right now (`None` when
    /// there is no feed: the cell is left as background).
    pub fn advance(
        &mut self,
        dt: Duration,
        frame: Option<&FrameBuffer>,
        shutter: &mut dyn Shutter,
    ) -> Result<Vec<RunEvent>> {
        let mut events: Vec<RunEvent> = self.opening.take().map(RunEvent::Countdown).into_iter().collect();
        let Phase::Capturing { cell, countdown } = &mut self.phase else {
            return Ok(events);
        };

        let mut resolved = false;
        for state in countdown.advance(dt) {
            events.push(RunEvent::Countdown(match state {
                CountdownState::Counting(n) => CountdownDisplay::Number(n),
                CountdownState::Flash => CountdownDisplay::Flash,
                CountdownState::Done | CountdownState::Cancelled => CountdownDisplay::Blank,
            }));
            resolved |= state == CountdownState::Done;
        }
        if !resolved {
            return Ok(events);
        }

        let index = *cell;
        let rect = self.geometry.cell(self.layout, index);
        shutter.click();
        match frame {
            Some(f) => draw_rounded_image(&mut self.canvas, f, rect, &self.filter)?,
            None => warn!(index, "no live frame; cell left blank"),
        }
        self.captured.push(rect);
        events.push(RunEvent::CellCaptured { index, rect });
        info!(index, x = rect.x, y = rect.y, "cell captured");

        let next = index + 1;
        if next < self.layout.cell_count() {
            let countdown = Countdown::new(self.countdown_secs);
            events.push(RunEvent::Countdown(countdown.display()));
            self.phase = Phase::Capturing { cell: next, countdown };
        } else {
            let export = self.finish(Local::now().naive_local())?;
            self.phase = Phase::Finished(export);
            events.push(RunEvent::Finished);
        }
        Ok(events)
    }

    /// Stamp the footer and encode the strip.
    fn finish(&mut self, at: NaiveDateTime) -> Result<StripExport> {
        let label = timestamp_label(at);
        let w = self.canvas.width() as i32;
        let room = w - 2 * self.geometry.margin as i32;
        let scale = if font::text_width(&label, FOOTER_TEXT_SCALE) <= room { FOOTER_TEXT_SCALE } else { 1 };

        self.canvas.fill_text_centered(
            &label,
            w / 2,
            self.geometry.footer_baseline(self.layout),
            TextStyle::plain(FOOTER_TEXT_COLOR, scale),
        );

        let export = StripExport::encode(self.canvas.surface(), at)?;
        info!(%label, bytes = export.png_bytes().len(), "strip ready");
        Ok(export)
    }

    /// Abort the run. Returns false when it had already ended.
    pub fn cancel(&mut self) -> bool {
        let Phase::Capturing { cell, countdown } = &mut self.phase else {
            return false;
        };
        countdown.cancel();
        self.opening = None;
        info!(cell = *cell, "capture run cancelled");
        self.phase = Phase::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutter::Mute;
    use chrono::NaiveDate;

    struct CountingShutter(usize);

    impl Shutter for CountingShutter {
        fn click(&mut self) {
            self.0 += 1;
        }
    }

    fn config(layout: &str) -> SessionConfig {
        SessionConfig { layout: layout.parse().unwrap(), shutter_sound: None, ..Default::default() }
    }

    #[test]
    fn label_format() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(15, 4, 5).unwrap();
        assert_eq!(timestamp_label(at), "Striply - 10/19/2026 3:04:05 PM");
    }

    #[test]
    fn nothing_is_drawn_before_the_first_countdown_resolves() {
        let mut run = CaptureRun::start(&config("1x1")).unwrap();
        let frame = FrameBuffer::new(4, 4, Rgb::BLACK);
        let events = run.advance(Duration::from_millis(3599), Some(&frame), &mut Mute).unwrap();
        assert!(run.captured_cells().is_empty());
        assert!(events.iter().all(|e| matches!(e, RunEvent::Countdown(_))));

        let events = run.advance(Duration::from_millis(1), Some(&frame), &mut Mute).unwrap();
        assert_eq!(run.captured_cells().len(), 1);
        assert_eq!(events.last(), Some(&RunEvent::Finished));
        assert!(run.export().is_some());
    }

    #[test]
    fn first_advance_reports_the_opening_number() {
        let mut run = CaptureRun::start(&config("1x1")).unwrap();
        let events = run.advance(Duration::from_millis(10), None, &mut Mute).unwrap();
        assert_eq!(events, vec![RunEvent::Countdown(CountdownDisplay::Number(3))]);
        assert!(run.advance(Duration::from_millis(10), None, &mut Mute).unwrap().is_empty());
    }

    #[test]
    fn shutter_clicks_once_per_cell() {
        let mut run = CaptureRun::start(&config("2x2")).unwrap();
        let mut shutter = CountingShutter(0);
        while run.is_running() {
            run.advance(Duration::from_millis(500), None, &mut shutter).unwrap();
        }
        assert_eq!(shutter.0, 4);
    }

    #[test]
    fn missing_feed_leaves_cells_as_background() {
        let mut run = CaptureRun::start(&config("1x1")).unwrap();
        run.advance(Duration::from_secs(10), None, &mut Mute).unwrap();
        assert!(run.is_finished());
        assert_eq!(run.canvas().surface().get(115, 115), Rgb::WHITE);
    }

    #[test]
    fn cancel_stops_the_run_without_export() {
        let mut run = CaptureRun::start(&config("2x2")).unwrap();
        let frame = FrameBuffer::new(4, 4, Rgb::BLACK);
        run.advance(Duration::from_secs(4), Some(&frame), &mut Mute).unwrap();
        assert_eq!(run.progress(), (1, 4));
        assert!(run.cancel());
        assert!(!run.cancel());
        let events = run.advance(Duration::from_secs(60), Some(&frame), &mut Mute).unwrap();
        assert!(events.is_empty());
        assert!(run.export().is_none());
        assert_eq!(run.progress(), (1, 4));
    }
}
