use serde::{Deserialize, Serialize};

/// Player-visible state of a cell, as handed to a renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Closed,
    Flagged,
    Open(u8),
    Mine,
}

impl Tile {
    /// Whether the tile is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed | Self::Flagged)
    }

    /// Single character used by text renderers.
    pub const fn glyph(self) -> char {
        match self {
            Self::Closed => '#',
            Self::Flagged => 'F',
            Self::Open(0) => '.',
            Self::Open(count @ 1..=8) => (b'0' + count) as char,
            Self::Open(_) => '?',
            Self::Mine => '*',
        }
    }
}
