// CSS-style filter expressions ("none", "grayscale(100%)", "sepia(60%) contrast(1.2)", ...).
// The same chain is applied to the live preview and to every captured cell, so
// what you see before the shutter is what lands in the strip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::blur::blur_in_place;
use crate::error::{Error, Result};
use crate::types::FrameBuffer;

/// Filter presets the booth cycles through with the `F` key.
pub const PRESETS: &[&str] = &[
    "none",
    "grayscale(100%)",
    "sepia(100%)",
    "contrast(140%) saturate(130%)",
    "brightness(120%) sepia(30%)",
    "hue-rotate(90deg)",
    "invert(100%)",
    "blur(2px)",
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    /// Degrees.
    HueRotate(f32),
    Invert(f32),
    Brightness(f32),
    Contrast(f32),
    /// Radius in pixels.
    Blur(f32),
}

/// A parsed filter list. `Display` gives back the expression it was parsed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterChain {
    ops: Vec<FilterOp>,
    source: String,
}

impl FilterChain {
    pub fn none() -> Self {
        Self { ops: Vec::new(), source: "none".into() }
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Run every op in order over the whole frame.
    pub fn apply(&self, frame: &mut FrameBuffer) -> Result<()> {
        for op in &self.ops {
            match *op {
                FilterOp::Blur(px) => blur_in_place(frame, px.round() as usize)?,
                color_op => {
                    let m = ColorOp::from(color_op);
                    for px in frame.pixels.iter_mut() {
                        *px = m.apply_packed(*px);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for FilterChain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::none());
        }

        let mut ops = Vec::new();
        let mut rest = trimmed;
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| Error::filter(format!("expected '(' in {rest:?}")))?;
            let close = rest[open..]
                .find(')')
                .map(|i| i + open)
                .ok_or_else(|| Error::filter(format!("unclosed '(' in {rest:?}")))?;
            let name = rest[..open].trim().to_ascii_lowercase();
            let arg = rest[open + 1..close].trim();
            ops.push(parse_op(&name, arg)?);
            rest = rest[close + 1..].trim_start();
        }

        Ok(Self { ops, source: trimmed.to_string() })
    }
}

impl TryFrom<String> for FilterChain {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FilterChain> for String {
    fn from(f: FilterChain) -> Self {
        f.source
    }
}

fn parse_op(name: &str, arg: &str) -> Result<FilterOp> {
    let op = match name {
        "grayscale" => FilterOp::Grayscale(amount(arg, 1.0)?.min(1.0)),
        "sepia" => FilterOp::Sepia(amount(arg, 1.0)?.min(1.0)),
        "invert" => FilterOp::Invert(amount(arg, 1.0)?.min(1.0)),
        "saturate" => FilterOp::Saturate(amount(arg, 1.0)?),
        "brightness" => FilterOp::Brightness(amount(arg, 1.0)?),
        "contrast" => FilterOp::Contrast(amount(arg, 1.0)?),
        "hue-rotate" => FilterOp::HueRotate(angle(arg)?),
        "blur" => FilterOp::Blur(length(arg)?),
        other => return Err(Error::filter(format!("unknown filter function {other:?}"))),
    };
    Ok(op)
}

/// `<number>` or `<percentage>`; empty means the function's default.
fn amount(arg: &str, default: f32) -> Result<f32> {
    if arg.is_empty() {
        return Ok(default);
    }
    let v = match arg.strip_suffix('%') {
        Some(pct) => number(pct)? / 100.0,
        None => number(arg)?,
    };
    if v < 0.0 {
        return Err(Error::filter(format!("negative amount {arg:?}")));
    }
    Ok(v)
}

fn angle(arg: &str) -> Result<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    if let Some(v) = arg.strip_suffix("deg") {
        return number(v);
    }
    if let Some(v) = arg.strip_suffix("turn") {
        return Ok(number(v)? * 360.0);
    }
    if let Some(v) = arg.strip_suffix("rad") {
        return Ok(number(v)?.to_degrees());
    }
    if number(arg)? == 0.0 {
        Ok(0.0)
    } else {
        Err(Error::filter(format!("angle needs a unit: {arg:?}")))
    }
}

fn length(arg: &str) -> Result<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    let v = match arg.strip_suffix("px") {
        Some(v) => number(v)?,
        None if number(arg)? == 0.0 => 0.0,
        None => return Err(Error::filter(format!("length needs px: {arg:?}"))),
    };
    if v < 0.0 {
        return Err(Error::filter(format!("negative blur {arg:?}")));
    }
    Ok(v)
}

fn number(s: &str) -> Result<f32> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| Error::filter(format!("not a number: {s:?}")))
}

/* ---------- Per-pixel color ops (Filter Effects color matrices) ---------- */

enum ColorOp {
    Matrix([[f32; 3]; 3]),
    Invert(f32),
    Linear { slope: f32, intercept: f32 },
}

impl From<FilterOp> for ColorOp {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::Grayscale(a) => {
                let k = 1.0 - a;
                ColorOp::Matrix([
                    [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
                ])
            }
            FilterOp::Sepia(a) => {
                let k = 1.0 - a;
                ColorOp::Matrix([
                    [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                    [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                    [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                ])
            }
            FilterOp::Saturate(s) => ColorOp::Matrix([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            FilterOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                ColorOp::Matrix([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            FilterOp::Invert(a) => ColorOp::Invert(a),
            FilterOp::Brightness(a) => ColorOp::Linear { slope: a, intercept: 0.0 },
            FilterOp::Contrast(a) => ColorOp::Linear { slope: a, intercept: 0.5 - 0.5 * a },
            FilterOp::Blur(_) => ColorOp::Linear { slope: 1.0, intercept: 0.0 },
        }
    }
}

impl ColorOp {
    #[inline]
    fn apply_packed(&self, px: u32) -> u32 {
        let r = ((px >> 16) & 0xFF) as f32 / 255.0;
        let g = ((px >> 8) & 0xFF) as f32 / 255.0;
        let b = (px & 0xFF) as f32 / 255.0;

        let (r, g, b) = match self {
            ColorOp::Matrix(m) => (
                m[0][0] * r + m[0][1] * g + m[0][2] * b,
                m[1][0] * r + m[1][1] * g + m[1][2] * b,
                m[2][0] * r + m[2][1] * g + m[2][2] * b,
            ),
            ColorOp::Invert(a) => {
                let inv = |c: f32| a * (1.0 - c) + (1.0 - a) * c;
                (inv(r), inv(g), inv(b))
            }
            ColorOp::Linear { slope, intercept } => {
                let lin = |c: f32| c * slope + intercept;
                (lin(r), lin(g), lin(b))
            }
        };

        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(r) << 16) | (q(g) << 8) | q(b)
    }
}
