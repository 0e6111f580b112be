//! Named source rectangles within a sprite sheet.
//!
//! Atlas files are parsed elsewhere. Whatever loads them fills a
//! [`TextureAtlas`] with one pixel rectangle per named sub-texture, and those
//! rectangles are passed straight to `SpriteBatch::render` as the source.
//!
//! # Example
//!
//! ```
//! use sprig_core::geometry::Rect;
//! use sprig_render::TextureAtlas;
//!
//! let mut atlas = TextureAtlas::new();
//! atlas.insert("player_idle", Rect::new(0, 0, 32, 32));
//! atlas.insert("player_jump", Rect::new(32, 0, 32, 32));
//!
//! assert_eq!(atlas.get("player_jump"), Some(Rect::new(32, 0, 32, 32)));
//! ```

use ahash::HashMap;
use sprig_core::geometry::Rect;

#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    regions: HashMap<String, Rect<i32>>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named region, returning the previous rectangle.
    pub fn insert(&mut self, name: impl Into<String>, source: Rect<i32>) -> Option<Rect<i32>> {
        self.regions.insert(name.into(), source)
    }

    pub fn get(&self, name: &str) -> Option<Rect<i32>> {
        self.regions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterate over every region in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect<i32>)> {
        self.regions.iter().map(|(name, rect)| (name.as_str(), *rect))
    }
}

impl<S: Into<String>> FromIterator<(S, Rect<i32>)> for TextureAtlas {
    fn from_iter<I: IntoIterator<Item = (S, Rect<i32>)>>(iter: I) -> Self {
        Self {
            regions: iter
                .into_iter()
                .map(|(name, rect)| (name.into(), rect))
                .collect(),
        }
    }
}
