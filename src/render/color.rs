use crate::pose::PoseClass;

/// RGB color used for strokes, fills and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

/// Display color per pose class, plus the neutral entry for "no class".
pub const POSE_COLORS: [[u8; 3]; 4] = [
    [37, 99, 235],  // #2563eb stand
    [147, 51, 234], // #9333ea sit
    [219, 39, 119], // #db2777 kneel
    [5, 150, 105],  // #059669 sleep
];

/// Neutral gray for skeletons without a pose class.
pub const NEUTRAL_COLOR: [u8; 3] = [75, 85, 99]; // #4b5563

/// Color for a pose class; gray when no class is set.
pub fn color_of(pose: Option<PoseClass>) -> Color {
    let [r, g, b] = match pose {
        Some(pose) => POSE_COLORS[pose.index()],
        None => NEUTRAL_COLOR,
    };
    Color(r, g, b)
}
