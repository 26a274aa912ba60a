// What you SEE:
// • Live camera preview with the selected filter, sticker bar underneath.
// • SPACE starts a run: 3, 2, 1, flash, click; once per cell.
// • When the strip is done "D DOWNLOAD" shows up in the HUD; D saves it.
// • L / B / F cycle layout, background and filter. ESC cancels a run or quits.
// • Click a sticker in the bar to drop it on the preview, then drag it around.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use striply::booth::{Booth, Flow};
use striply::camera::{self, CameraCapture, DialogAlert};
use striply::config::{ConfigArgs, SessionConfig};
use striply::pointer::PointerTracker;
use striply::shutter::{Mute, Shutter, SoundShutter};
use striply::sticker::StickerPalette;
use striply::window::Screen;

#[derive(Parser, Debug)]
#[command(name = "striply", version, about = "Webcam photo booth that makes photo strips")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = SessionConfig::load(&cli.config).context("loading session config")?;

    /* --- Camera + window setup ---
       Visual: window opens with the live feed (or a NO CAMERA placeholder). */
    let (index, cw, ch) = (config.camera_index, config.camera_width, config.camera_height);
    let mut source = camera::acquire(|| CameraCapture::open(index, cw, ch), &mut DialogAlert, (cw, ch));
    let (w, h) = source.resolution();

    let shutter: Box<dyn Shutter> = match &config.shutter_sound {
        Some(path) => Box::new(SoundShutter::new(path.clone())),
        None => Box::new(Mute),
    };
    let palette = StickerPalette::from_paths(&config.stickers);

    let mut booth = Booth::new(config, palette, shutter, (w as usize, h as usize));
    let (ww, wh) = booth.window_size();
    let mut screen = Screen::new("Striply", ww, wh).context("opening window")?;
    let mut pointer = PointerTracker::new();
    info!(width = w, height = h, "booth ready");

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    'frames: while screen.is_open() {
        let now = Instant::now();
        let dt = now - last_frame_time; // drives countdowns and the flash fade
        last_frame_time = now;

        /* 1) The picture the camera shows right now. */
        let frame = source.current_frame().unwrap_or_else(|e| {
            warn!(error = %e, "dropped camera frame");
            None
        });

        /* 2) Inputs */
        for command in screen.commands() {
            if booth.command(command) == Flow::Quit {
                break 'frames;
            }
        }
        for event in pointer.sample(screen.left_mouse_down(), screen.mouse_pos()) {
            booth.pointer(event);
        }

        /* 3) Countdown / capture, then compose and present. */
        booth.tick(dt, frame.as_ref());
        let composed = booth.render(frame.as_ref(), dt);
        screen.present(&composed)?;

        /* 4) FPS, once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = frames_this_second as f32 / secs, "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
