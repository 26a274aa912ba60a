// The on-screen window: presents the composed preview and reports input.
// Keys are translated into booth commands here so the booth never sees minifb.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::booth::Command;
use crate::error::{Error, Result};
use crate::types::FrameBuffer;

const KEYMAP: &[(Key, Command)] = &[
    (Key::Space, Command::StartCapture),
    (Key::Escape, Command::Cancel),
    (Key::B, Command::CycleBackground),
    (Key::F, Command::CycleFilter),
    (Key::L, Command::CycleLayout),
    (Key::D, Command::Download),
    (Key::Q, Command::Quit),
];

pub struct Screen {
    window: Window,
}

impl Screen {
    /// Open a window of `width x height`, capped at 30 updates per second.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(30);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Commands for keys pressed since the last update (no key repeat).
    pub fn commands(&self) -> Vec<Command> {
        KEYMAP
            .iter()
            .filter(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
            .map(|(_, cmd)| *cmd)
            .collect()
    }

    /// Mouse position in window pixels, None when outside the window.
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }
}
