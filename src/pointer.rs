// Pointer input as explicit events, plus a drag gesture built on them.
// The window is polled once per frame; `PointerTracker` turns those samples
// into press / move / release edges so nothing else cares how input arrives.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release { x: i32, y: i32 },
}

/// Turns polled (button down?, position) samples into events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    down: bool,
    last: Option<(i32, i32)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll. A missing position (pointer outside the window) only
    /// matters for release: the last known position is used.
    pub fn sample(&mut self, down: bool, pos: Option<(i32, i32)>) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let moved = pos.is_some() && pos != self.last;

        match (self.down, down) {
            (false, true) => {
                if let Some((x, y)) = pos {
                    out.push(PointerEvent::Press { x, y });
                    self.down = true;
                }
            }
            (true, true) if moved => {
                if let Some((x, y)) = pos {
                    out.push(PointerEvent::Move { x, y });
                }
            }
            (true, false) => {
                if moved {
                    if let Some((x, y)) = pos {
                        out.push(PointerEvent::Move { x, y });
                    }
                }
                let (x, y) = pos.or(self.last).unwrap_or((0, 0));
                out.push(PointerEvent::Release { x, y });
                self.down = false;
            }
            _ => {}
        }

        if pos.is_some() {
            self.last = pos;
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Capture {
    target: usize,
    offset_x: i32,
    offset_y: i32,
}

/// Start / move / end of dragging one target.
///
/// On start the pointer's offset from the target's position is recorded; every
/// move places the target at pointer - offset. The result depends only on the
/// latest pointer position, not on how many moves came before it.
#[derive(Clone, Debug, Default)]
pub struct DragGesture {
    capture: Option<Capture>,
}

impl DragGesture {
    pub fn start(&mut self, target: usize, pointer: (i32, i32), position: (i32, i32)) {
        self.capture = Some(Capture {
            target,
            offset_x: pointer.0 - position.0,
            offset_y: pointer.1 - position.1,
        });
    }

    /// New (target, left, top) for a pointer move, or None when not dragging.
    pub fn move_to(&self, pointer: (i32, i32)) -> Option<(usize, i32, i32)> {
        self.capture
            .map(|c| (c.target, pointer.0 - c.offset_x, pointer.1 - c.offset_y))
    }

    pub fn end(&mut self) -> Option<usize> {
        self.capture.take().map(|c| c.target)
    }

    pub fn target(&self) -> Option<usize> {
        self.capture.map(|c| c.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_emits_edges() {
        let mut t = PointerTracker::new();
        assert!(t.sample(false, Some((1, 1))).is_empty());
        assert_eq!(t.sample(true, Some((1, 1))), vec![PointerEvent::Press { x: 1, y: 1 }]);
        assert!(t.sample(true, Some((1, 1))).is_empty());
        assert_eq!(t.sample(true, Some((4, 2))), vec![PointerEvent::Move { x: 4, y: 2 }]);
        assert_eq!(t.sample(false, None), vec![PointerEvent::Release { x: 4, y: 2 }]);
        assert!(t.sample(false, Some((9, 9))).is_empty());
    }

    #[test]
    fn press_outside_window_is_ignored() {
        let mut t = PointerTracker::new();
        assert!(t.sample(true, None).is_empty());
        assert!(t.sample(false, None).is_empty());
    }

    #[test]
    fn drag_keeps_the_grab_offset() {
        let mut d = DragGesture::default();
        d.start(3, (110, 130), (100, 100));
        assert_eq!(d.move_to((150, 140)), Some((3, 140, 110)));
        assert_eq!(d.end(), Some(3));
        assert_eq!(d.move_to((0, 0)), None);
    }
}
