// The interactive session.
//
// `Booth` owns everything the user can see and poke at: the session choices
// (layout, background, filter), the capture run in progress, the finished
// strip waiting to be downloaded, and the sticker overlay. It knows nothing
// about windows or cameras; the main loop feeds it commands, pointer events,
// elapsed time and the latest camera frame, and shows what `render` returns.
//
// Window layout, top to bottom: the live preview (camera size) and the
// sticker bar under it.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::SessionConfig;
use crate::countdown::{CountdownDisplay, FLASH_DWELL};
use crate::export::StripExport;
use crate::filter::{self, FilterChain};
use crate::flash::FlashFx;
use crate::font::{self, TextStyle};
use crate::gamma::GammaLut;
use crate::layout::{self, Layout};
use crate::pointer::PointerEvent;
use crate::sequencer::{CaptureRun, RunEvent};
use crate::shutter::Shutter;
use crate::sticker::{StickerBar, StickerLayer, StickerPalette};
use crate::types::{FrameBuffer, Rgb};

const NO_FEED_BG: Rgb = Rgb::hex(0x1e1e24);
const HUD_COLOR: Rgb = Rgb::WHITE;
const READY_COLOR: Rgb = Rgb::hex(0x9be89b);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begin a capture run (ignored while one is running).
    StartCapture,
    /// Cancel the running capture; quits when nothing is running.
    Cancel,
    CycleBackground,
    CycleFilter,
    CycleLayout,
    /// Save the finished strip as a PNG file.
    Download,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Booth {
    config: SessionConfig,
    preview: (usize, usize),
    run: Option<CaptureRun>,
    download: Option<StripExport>,
    palette: StickerPalette,
    stickers: StickerLayer,
    bar: StickerBar,
    flash: FlashFx,
    lut: GammaLut,
    shutter: Box<dyn Shutter>,
    status: String,
}

impl Booth {
    /// `preview` is the live feed size in pixels.
    pub fn new(
        config: SessionConfig,
        palette: StickerPalette,
        shutter: Box<dyn Shutter>,
        preview: (usize, usize),
    ) -> Self {
        Self {
            config,
            preview,
            run: None,
            download: None,
            palette,
            stickers: StickerLayer::new(),
            bar: StickerBar::below(preview.1),
            flash: FlashFx::new(),
            lut: GammaLut::new(),
            shutter,
            status: String::new(),
        }
    }

    /// Full window size: preview plus the sticker bar.
    pub fn window_size(&self) -> (usize, usize) {
        (self.preview.0, self.preview.1 + StickerBar::HEIGHT as usize)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn run(&self) -> Option<&CaptureRun> {
        self.run.as_ref()
    }

    pub fn is_capturing(&self) -> bool {
        self.run.as_ref().is_some_and(CaptureRun::is_running)
    }

    /// The strip that the download action would save, if it is on offer.
    pub fn download(&self) -> Option<&StripExport> {
        self.download.as_ref()
    }

    pub fn stickers(&self) -> &StickerLayer {
        &self.stickers
    }

    pub fn palette(&self) -> &StickerPalette {
        &self.palette
    }

    /// Last one-line message for the user (errors, saved paths).
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn command(&mut self, command: Command) -> Flow {
        match command {
            Command::StartCapture => self.start_capture(),
            Command::Cancel => {
                match self.run.as_mut() {
                    Some(run) if run.is_running() => {
                        run.cancel();
                        self.run = None;
                        self.status = "capture cancelled".into();
                    }
                    _ => return Flow::Quit,
                }
            }
            Command::CycleBackground => {
                self.config.background = self.config.background.next(&self.config.background_image);
                info!(background = %self.config.background, "background selected");
            }
            Command::CycleFilter => {
                let next = next_preset(filter::PRESETS, &self.config.filter.to_string());
                match next.parse::<FilterChain>() {
                    Ok(chain) => {
                        info!(filter = %chain, "filter selected");
                        self.config.filter = chain;
                    }
                    Err(e) => warn!(error = %e, "bad filter preset"),
                }
            }
            Command::CycleLayout => {
                let next = next_preset(layout::PRESETS, &self.config.layout.to_string());
                match next.parse::<Layout>() {
                    Ok(layout) => {
                        info!(%layout, "layout selected");
                        self.config.layout = layout;
                    }
                    Err(e) => warn!(error = %e, "bad layout preset"),
                }
            }
            Command::Download => self.save_download(),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn start_capture(&mut self) {
        if self.is_capturing() {
            return;
        }
        // The previous strip is withdrawn as soon as a new run begins.
        self.download = None;
        match CaptureRun::start(&self.config) {
            Ok(run) => {
                self.status.clear();
                if run.display() == CountdownDisplay::Flash {
                    self.flash.trigger(FLASH_DWELL);
                }
                self.run = Some(run);
            }
            Err(e) => {
                error!(error = %e, "could not start capture");
                self.status = e.to_string();
            }
        }
    }

    fn save_download(&mut self) {
        let Some(export) = &self.download else {
            self.status = "nothing to download yet".into();
            return;
        };
        match export.save(&self.config.output_dir) {
            Ok(path) => self.status = format!("saved {}", path.display()),
            Err(e) => {
                error!(error = %e, "download failed");
                self.status = e.to_string();
            }
        }
    }

    /// Route a pointer event in window coordinates. A press on a bar slot
    /// adds that sticker; everything else goes to the overlay.
    pub fn pointer(&mut self, event: PointerEvent) {
        if let PointerEvent::Press { x, y } = event {
            if !self.stickers.is_dragging() {
                if let Some(option) = self.bar.option_at(x, y, self.palette.len()) {
                    self.stickers.add(option);
                    return;
                }
            }
        }
        self.stickers.handle(event, &self.palette);
    }

    /// Let `dt` pass for the capture run. `frame` is the picture currently on
    /// screen.
    pub fn tick(&mut self, dt: Duration, frame: Option<&FrameBuffer>) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let events = match run.advance(dt, frame, self.shutter.as_mut()) {
            Ok(events) => events,
            Err(e) => {
                error!(error = %e, "capture run failed");
                self.status = e.to_string();
                self.run = None;
                return;
            }
        };

        for event in events {
            match event {
                RunEvent::Countdown(CountdownDisplay::Flash) => self.flash.trigger(FLASH_DWELL),
                RunEvent::Finished => {
                    if let Some(export) = run.export() {
                        self.status = "strip ready: press D to download".into();
                        self.download = Some(export.clone());
                    }
                }
                _ => {}
            }
        }
        if !run.is_running() {
            self.run = None;
        }
    }

    /// Compose one window frame.
    pub fn render(&mut self, frame: Option<&FrameBuffer>, dt: Duration) -> FrameBuffer {
        let (w, h) = self.window_size();
        let mut fb = FrameBuffer::new(w, h, NO_FEED_BG);

        match frame {
            Some(frame) => {
                let mut live = fit(frame, self.preview.0, self.preview.1);
                if let Err(e) = self.config.filter.apply(&mut live) {
                    warn!(error = %e, "preview filter failed");
                }
                fb.pixels[..live.pixels.len()].copy_from_slice(&live.pixels);
            }
            None => {
                let style = TextStyle::hud(Rgb::hex(0x8a8a96), 2);
                font::draw_text_centered(&mut fb, w as i32 / 2, self.preview.1 as i32 / 2, "NO CAMERA", style);
            }
        }

        self.flash.update_and_render(&mut fb, dt.as_secs_f32());
        self.stickers.render(&mut fb, &self.palette, &self.lut);
        self.draw_hud(&mut fb);
        self.bar.render(&mut fb, &self.palette, &self.lut);
        fb
    }

    fn draw_hud(&self, fb: &mut FrameBuffer) {
        let cx = self.preview.0 as i32 / 2;
        let cy = self.preview.1 as i32 / 2;

        if let Some(run) = &self.run {
            match run.display() {
                CountdownDisplay::Number(n) => {
                    font::draw_text_centered(fb, cx, cy + 28, &n.to_string(), TextStyle::hud(HUD_COLOR, 8));
                }
                CountdownDisplay::Flash => font::draw_camera_icon(fb, cx, cy, 6, HUD_COLOR),
                CountdownDisplay::Blank => {}
            }
            let (done, total) = run.progress();
            font::draw_text(fb, 8, 8, &format!("{}/{}", done + 1, total), TextStyle::hud(HUD_COLOR, 2));
        } else {
            let hint = format!(
                "SPACE START  L {}  B {}  F {}",
                self.config.layout, self.config.background, self.config.filter
            );
            font::draw_text(fb, 8, 8, &hint, TextStyle::hud(HUD_COLOR, 1));
        }

        if self.download.is_some() {
            font::draw_text(fb, 8, 20, "D DOWNLOAD", TextStyle::hud(READY_COLOR, 1));
        }

        if !self.status.is_empty() {
            let y = self.preview.1 as i32 - 14;
            font::draw_text(fb, 8, y, &self.status, TextStyle::hud(HUD_COLOR, 1));
        }
    }
}

/// Preset after `current`, wrapping; the first preset when `current` is not one.
fn next_preset<'a>(presets: &[&'a str], current: &str) -> &'a str {
    let at = presets.iter().position(|p| *p == current);
    let next = at.map_or(0, |i| (i + 1) % presets.len());
    presets[next]
}

/// Nearest-neighbour copy of `frame` into a `w x h` buffer.
fn fit(frame: &FrameBuffer, w: usize, h: usize) -> FrameBuffer {
    if frame.width == w && frame.height == h {
        return frame.clone();
    }
    let mut out = FrameBuffer::new(w, h, NO_FEED_BG);
    if frame.width == 0 || frame.height == 0 {
        return out;
    }
    for y in 0..h {
        let sy = y * frame.height / h;
        for x in 0..w {
            let sx = x * frame.width / w;
            out.pixels[y * w + x] = frame.pixels[sy * frame.width + sx];
        }
    }
    out
}
