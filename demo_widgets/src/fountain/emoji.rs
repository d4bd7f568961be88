//! The closed set of emoji categories.

use bevy::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmojiKind {
    Grinning,
    HeartEyes,
    TongueOut,
    RaisedEyebrow,
    Dizzy,
    Sunglasses,
    SpiralEyes,
}

impl EmojiKind {
    pub const ALL: [EmojiKind; 7] = [
        EmojiKind::Grinning,
        EmojiKind::HeartEyes,
        EmojiKind::TongueOut,
        EmojiKind::RaisedEyebrow,
        EmojiKind::Dizzy,
        EmojiKind::Sunglasses,
        EmojiKind::SpiralEyes,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            EmojiKind::Grinning => "\u{1F600}",
            EmojiKind::HeartEyes => "\u{1F60D}",
            EmojiKind::TongueOut => "\u{1F61D}",
            EmojiKind::RaisedEyebrow => "\u{1F928}",
            EmojiKind::Dizzy => "\u{1F635}",
            EmojiKind::Sunglasses => "\u{1F60E}",
            EmojiKind::SpiralEyes => "\u{1F635}\u{200D}\u{1F4AB}",
        }
    }

    /// Single code point the bundled face font can draw for this kind.
    /// `None` when the font has no such face.
    pub fn outline_glyph(self) -> Option<char> {
        match self {
            EmojiKind::Grinning => Some('\u{1F600}'),
            EmojiKind::HeartEyes => Some('\u{1F60D}'),
            EmojiKind::TongueOut => Some('\u{1F61D}'),
            EmojiKind::RaisedEyebrow => None,
            EmojiKind::Dizzy => Some('\u{1F635}'),
            EmojiKind::Sunglasses => Some('\u{1F60E}'),
            // Base face of the ZWJ sequence.
            EmojiKind::SpiralEyes => Some('\u{1F635}'),
        }
    }

    /// Glyph color, and the disc color when there is no glyph to draw.
    pub fn tint(self) -> Color {
        match self {
            EmojiKind::Grinning => Color::srgb(1.0, 0.82, 0.2),
            EmojiKind::HeartEyes => Color::srgb(0.98, 0.36, 0.47),
            EmojiKind::TongueOut => Color::srgb(0.96, 0.55, 0.24),
            EmojiKind::RaisedEyebrow => Color::srgb(0.85, 0.75, 0.35),
            EmojiKind::Dizzy => Color::srgb(0.62, 0.5, 0.95),
            EmojiKind::Sunglasses => Color::srgb(0.25, 0.6, 0.95),
            EmojiKind::SpiralEyes => Color::srgb(0.4, 0.85, 0.6),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The next kind in cycle order, wrapping around.
    pub fn next(self) -> EmojiKind {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}
