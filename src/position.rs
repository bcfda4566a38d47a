//! Hotspot positions and the pointer-to-percentage math.

/// Radius of the rendered hotspot marker, in display pixels.
pub const DEFAULT_MARKER_HALF_SIZE: f64 = 6.0;

// ── Position ────────────────────────────────────────────────────────────────

/// A hotspot position as percentages of the displayed image size.
///
/// `None` means the axis was never written. Values are not clamped, so a
/// click in the padding around an image can produce negative or >100 values,
/// and a bad manual edit can store `NaN`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl Position {
    pub const UNSET: Position = Position {
        left: None,
        top: None,
    };

    pub const ZERO: Position = Position {
        left: Some(0.0),
        top: Some(0.0),
    };

    pub fn new(left: f64, top: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Left => self.left,
            Axis::Top => self.top,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Left => self.left = Some(value),
            Axis::Top => self.top = Some(value),
        }
    }

    /// Whether the marker should be drawn.
    ///
    /// Both axes must be set, nonzero and not NaN. A cleared `{0, 0}`
    /// position therefore reads as "not marked yet", as does a position with
    /// only one axis at exactly zero.
    pub fn is_marked(&self) -> bool {
        let truthy = |v: Option<f64>| matches!(v, Some(v) if v != 0.0 && !v.is_nan());
        truthy(self.left) && truthy(self.top)
    }

    /// Copy with both axes clamped into `[0, 100]`. NaN stays NaN.
    pub fn clamped(&self) -> Self {
        Self {
            left: self.left.map(clamp_percent),
            top: self.top.map(clamp_percent),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Left,
    Top,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Left, Axis::Top];

    pub fn name(self) -> &'static str {
        match self {
            Axis::Left => "left",
            Axis::Top => "top",
        }
    }
}

// ── Plotting ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A click on the displayed image.
///
/// `x`/`y` are relative to the image's top-left corner; `width`/`height` are
/// its size as displayed, not its pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotEvent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub button: PointerButton,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotOptions {
    pub marker_half_size: f64,
    /// Secondary-button clicks zero the position instead of plotting.
    pub secondary_clears: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            marker_half_size: DEFAULT_MARKER_HALF_SIZE,
            secondary_clears: true,
        }
    }
}

/// Position produced by a click.
///
/// The marker half size is subtracted so that the marker's center, not its
/// top-left corner, lands under the pointer.
pub fn plot_position(event: &PlotEvent, options: &PlotOptions) -> Position {
    if options.secondary_clears && event.button == PointerButton::Secondary {
        return Position::ZERO;
    }
    let left = round2((event.x - options.marker_half_size) / event.width * 100.0);
    let top = round2((event.y - options.marker_half_size) / event.height * 100.0);
    Position::new(left, top)
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0).round() / 100.0
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

// ── Text input ──────────────────────────────────────────────────────────────

/// Coerce text from a numeric field the way a browser's `Number(value)` does.
///
/// Empty input is `0`; anything that is not a number is `NaN`, never an
/// error. Accepts decimal and exponent forms, `0x`/`0o`/`0b` integers and
/// `Infinity`.
pub fn parse_numeric(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.starts_with('+') {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }

    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    // Rust also parses "inf" and "nan", which a numeric field does not.
    let numeric_chars = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !numeric_chars {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Stricter parse used when coordinate validation is switched on: rejects
/// empty, non-numeric and non-finite input.
pub fn parse_strict(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(parse_numeric(raw)).filter(|v| v.is_finite())
}
