use crate::{bitmap::Glyph, geometry::Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// One glyph placed within a line fragment. `x` is relative to the
/// fragment's unaligned origin; the alignment shift is applied by the
/// consumer at draw time via [`LineFragment::origin_x`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedGlyph {
    pub char_code: u16,
    pub x: i32,
    pub glyph: Glyph,
}

impl PlacedGlyph {
    /// A space is drawn as a filled rectangle of its advance width; it
    /// has no image in the shared bitmap.
    pub fn is_space(&self) -> bool {
        self.char_code == u16::from(b' ')
    }
}

/// One laid-out line: a frame within the container, the glyphs placed on
/// it in order, and the total advance width they cover.
///
/// Fragments are never mutated after construction; a re-layout replaces
/// them wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFragment {
    pub frame: Rect,
    pub alignment: Alignment,
    pub glyphs: Vec<PlacedGlyph>,
    pub total_width: i32,
}

impl LineFragment {
    /// The aligned x origin for drawing. Alignment is resolved here, at
    /// draw time, never during width accumulation.
    pub fn origin_x(&self) -> i32 {
        match self.alignment {
            Alignment::Left => self.frame.origin.x,
            Alignment::Center => {
                self.frame.origin.x + (self.frame.width - self.total_width).div_euclid(2)
            }
            Alignment::Right => self.frame.origin.x + self.frame.width - self.total_width,
        }
    }

    /// Characters on the line, for measurement and tests.
    pub fn text(&self) -> String {
        self.glyphs
            .iter()
            .filter_map(|placed| char::from_u32(u32::from(placed.char_code)))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fragment(alignment: Alignment) -> LineFragment {
        LineFragment {
            frame: Rect::new(0, 0, 100, 10),
            alignment,
            glyphs: Vec::new(),
            total_width: 33,
        }
    }

    #[test]
    fn alignment_resolves_at_draw_time() {
        assert_eq!(fragment(Alignment::Left).origin_x(), 0);
        assert_eq!(fragment(Alignment::Center).origin_x(), 33);
        assert_eq!(fragment(Alignment::Right).origin_x(), 67);
    }
}
