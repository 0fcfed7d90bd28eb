use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell hides under its cover.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    /// Safe cell with the number of adjacent mines (0-8).
    Clear(u8),
    Mine,
}

impl Default for Content {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// Cover state; opened and flagged are exclusive by construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    #[default]
    Closed,
    Flagged,
    Open,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pos: Coord2,
    content: Content,
    cover: Cover,
}

impl Cell {
    pub const fn new(pos: Coord2) -> Self {
        Self {
            pos,
            content: Content::Clear(0),
            cover: Cover::Closed,
        }
    }

    pub const fn pos(&self) -> Coord2 {
        self.pos
    }

    pub const fn content(&self) -> Content {
        self.content
    }

    pub const fn cover(&self) -> Cover {
        self.cover
    }

    pub const fn is_mine(&self) -> bool {
        matches!(self.content, Content::Mine)
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.cover, Cover::Open)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.cover, Cover::Closed)
    }

    /// Adjacent mine count, `None` for mines.
    pub const fn adjacent_count(&self) -> Option<u8> {
        match self.content {
            Content::Clear(count) => Some(count),
            Content::Mine => None,
        }
    }

    pub const fn tile(&self) -> Tile {
        match (self.cover, self.content) {
            (Cover::Closed, _) => Tile::Closed,
            (Cover::Flagged, _) => Tile::Flagged,
            (Cover::Open, Content::Clear(count)) => Tile::Open(count),
            (Cover::Open, Content::Mine) => Tile::Mine,
        }
    }

    pub(crate) fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    /// Opens a closed cell. Returns false for flagged or already open cells.
    pub(crate) fn open(&mut self) -> bool {
        if self.is_closed() {
            self.cover = Cover::Open;
            true
        } else {
            false
        }
    }

    /// Flips the flag on an unopened cell. Returns false when the cell is open.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        self.cover = match self.cover {
            Cover::Closed => Cover::Flagged,
            Cover::Flagged => Cover::Closed,
            Cover::Open => return false,
        };
        true
    }

    pub(crate) fn reset(&mut self) {
        self.content = Content::default();
        self.cover = Cover::Closed;
    }
}
