/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// `#rrggbb`
    pub fn css_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as a CSS `rgba()` string.
    pub fn css_rgba(self, alpha: f64) -> String {
        format!("rgba({},{},{},{alpha})", self.r, self.g, self.b)
    }
}

/// Bucket boundaries; each bucket is half-open `[T(i-1), T(i))`.
pub const SCORE_THRESHOLDS: [f64; 4] = [4.0, 5.0, 6.0, 7.0];

/// Five-step diverging palette, lowest bucket first.
pub const SCORE_COLORS: [Color; 5] = [
    Color::from_hex(0xd0587e),
    Color::from_hex(0xdb8b95),
    Color::from_hex(0xe5b9ad),
    Color::from_hex(0x74ada2),
    Color::from_hex(0x009392),
];

/// Fill for boundaries with no usable score.
pub const NEUTRAL_COLOR: Color = Color::from_hex(0xdddddd);

pub const FILL_OPACITY: f64 = 0.7;

pub const LEGEND_TITLE: &str = "Happiness score";

/// Per-factor segment colors for the table bars, indexed by `SubFactor::index`.
pub const FACTOR_COLORS: [Color; 7] = [
    Color::from_hex(0x4e79a7),
    Color::from_hex(0xf28e2b),
    Color::from_hex(0x59a14f),
    Color::from_hex(0xedc948),
    Color::from_hex(0xb07aa1),
    Color::from_hex(0x9c755f),
    Color::from_hex(0xbab0ac),
];

/// Bucket index for a score, or `None` when the score is absent or NaN.
pub fn bucket_for(score: Option<f64>) -> Option<usize> {
    let score = score.filter(|s| !s.is_nan())?;
    Some(
        SCORE_THRESHOLDS
            .iter()
            .take_while(|&&threshold| score >= threshold)
            .count(),
    )
}

pub fn color_for(score: Option<f64>) -> Color {
    bucket_for(score)
        .map(|bucket| SCORE_COLORS[bucket])
        .unwrap_or(NEUTRAL_COLOR)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

/// Swatches for the map legend, built from the same constants as `color_for`.
pub fn legend_entries() -> Vec<LegendEntry> {
    let last = SCORE_COLORS.len() - 1;
    SCORE_COLORS
        .iter()
        .enumerate()
        .map(|(i, &color)| {
            let label = if i == 0 {
                format!("<{}", SCORE_THRESHOLDS[0])
            } else if i == last {
                format!(">{}", SCORE_THRESHOLDS[last - 1])
            } else {
                format!("{}-{}", SCORE_THRESHOLDS[i - 1], SCORE_THRESHOLDS[i])
            };
            LegendEntry { color, label }
        })
        .collect()
}
