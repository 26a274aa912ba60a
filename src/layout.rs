// Strip layout: how many cells, where they go, and how big the canvas is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::CellRect;

/// Layouts the booth cycles through with the `L` key.
pub const PRESETS: &[&str] = &["1x4", "2x2", "2x3", "3x3", "1x3"];

/// Largest strip canvas we agree to allocate (64 Mpx, 256 MiB of pixels).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

/// Grid of `columns x rows` photos. Both are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layout {
    columns: u32,
    rows: u32,
}

impl Layout {
    /// The classic vertical four-photo strip.
    pub const STRIP: Layout = Layout { columns: 1, rows: 4 };

    pub fn new(columns: u32, rows: u32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::layout(format!("{columns}x{rows} has no cells")));
        }
        let layout = Self { columns, rows };
        StripGeometry::default().checked_canvas_size(layout)?;
        Ok(layout)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::STRIP
    }
}

impl FromStr for Layout {
    type Err = Error;

    /// "<cols>x<rows>", e.g. "2x3". `strip` is an alias for 1x4.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("strip") {
            return Ok(Self::STRIP);
        }
        let (c, r) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::layout(format!("expected <cols>x<rows>, got {s:?}")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| Error::layout(format!("not a positive number: {v:?} in {s:?}")))
        };
        Self::new(parse(c)?, parse(r)?)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl TryFrom<String> for Layout {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Layout> for String {
    fn from(l: Layout) -> Self {
        l.to_string()
    }
}

/// Fixed per-cell measurements, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripGeometry {
    pub photo_size: u32,
    pub margin: u32,
    pub radius: u32,
    pub footer_height: u32,
}

impl Default for StripGeometry {
    fn default() -> Self {
        Self { photo_size: 200, margin: 15, radius: 40, footer_height: 80 }
    }
}

impl StripGeometry {
    /// width  = cols * size + (cols + 1) * margin
    /// height = rows * size + (rows + 1) * margin + footer
    ///
    /// Saturates instead of overflowing; use `checked_canvas_size` before
    /// allocating.
    pub fn canvas_size(&self, layout: Layout) -> (u32, u32) {
        let side = |n: u32| {
            n.saturating_mul(self.photo_size)
                .saturating_add(n.saturating_add(1).saturating_mul(self.margin))
        };
        (side(layout.columns), side(layout.rows).saturating_add(self.footer_height))
    }

    /// Canvas size, or `Error::Layout` when it overflows or would exceed
    /// `MAX_CANVAS_PIXELS`.
    pub fn checked_canvas_size(&self, layout: Layout) -> Result<(u32, u32)> {
        let side = |n: u32| {
            u64::from(n)
                .checked_mul(u64::from(self.photo_size))?
                .checked_add((u64::from(n) + 1).checked_mul(u64::from(self.margin))?)
        };
        let too_big = || Error::layout(format!("{layout} strip is too large"));
        let w = side(layout.columns).ok_or_else(too_big)?;
        let h = side(layout.rows)
            .and_then(|h| h.checked_add(u64::from(self.footer_height)))
            .ok_or_else(too_big)?;
        match w.checked_mul(h) {
            Some(px) if px <= MAX_CANVAS_PIXELS => Ok((w as u32, h as u32)),
            _ => Err(too_big()),
        }
    }

    /// Cell `index` in row-major order.
    pub fn cell(&self, layout: Layout, index: usize) -> CellRect {
        let col = (index as u32) % layout.columns;
        let row = (index as u32) / layout.columns;
        let step = self.photo_size + self.margin;
        CellRect {
            x: (self.margin + col * step) as i32,
            y: (self.margin + row * step) as i32,
            width: self.photo_size,
            height: self.photo_size,
            radius: self.radius,
        }
    }

    /// All cells, rows outer and columns inner.
    pub fn cells(&self, layout: Layout) -> impl Iterator<Item = CellRect> + '_ {
        (0..layout.cell_count()).map(move |i| self.cell(layout, i))
    }

    /// Baseline of the timestamp text, 30px above the bottom edge.
    pub fn footer_baseline(&self, layout: Layout) -> i32 {
        self.canvas_size(layout).1 as i32 - 30
    }
}
