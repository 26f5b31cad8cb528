//! Greedy line-breaking and glyph placement over a bitmap font's glyph
//! table. Words wrap at space boundaries; a word wider than the container
//! falls back to character wrapping.

use std::rc::Rc;

use crate::{bitmap::BitmapFont, bitmap::Glyph, geometry::Rect};

pub use fragment::{Alignment, LineFragment, PlacedGlyph};

mod fragment;

/// Layout state for one consumer: input text, alignment, container, and
/// the fragments built from them.
///
/// Fragments are invalidated by every setter and rebuilt in full on the
/// next access; there is no incremental re-layout.
#[derive(Debug)]
pub struct TextLayoutEngine {
    font: Rc<BitmapFont>,
    text: String,
    alignment: Alignment,
    container_width: i32,
    container_height: i32,
    validity: LayoutValidity,
    fragments: Vec<LineFragment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutValidity {
    Valid,
    Dirty,
}

impl TextLayoutEngine {
    pub fn new(font: Rc<BitmapFont>, container_width: i32, container_height: i32) -> Self {
        Self {
            font,
            text: String::new(),
            alignment: Alignment::Left,
            container_width,
            container_height,
            validity: LayoutValidity::Dirty,
            fragments: Vec::new(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate();
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.invalidate();
    }

    pub fn set_font(&mut self, font: Rc<BitmapFont>) {
        self.font = font;
        self.invalidate();
    }

    pub fn set_container_size(&mut self, width: i32, height: i32) {
        self.container_width = width;
        self.container_height = height;
        self.invalidate();
    }

    /// Drops the built fragments and marks the layout dirty. Called from
    /// every mutation entry point; also available to consumers whose font
    /// object changed underneath them.
    pub fn invalidate(&mut self) {
        self.validity = LayoutValidity::Dirty;
        self.fragments.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.validity == LayoutValidity::Dirty
    }

    /// The laid-out fragments, rebuilding first if an input changed.
    pub fn fragments(&mut self) -> &[LineFragment] {
        if self.validity == LayoutValidity::Dirty {
            self.rebuild();
            self.validity = LayoutValidity::Valid;
        }

        &self.fragments
    }

    /// Vertical extent of the built fragments.
    pub fn used_height(&mut self) -> i32 {
        let line_height = self.font.line_height();

        self.fragments().len() as i32 * line_height
    }

    fn rebuild(&mut self) {
        self.fragments.clear();

        let line_height = self.font.line_height();
        if line_height <= 0 || self.text.is_empty() {
            return;
        }

        // the fragment cap comes from how many whole lines fit the
        // container vertically
        let max_fragments = (self.container_height / line_height).max(0) as usize;
        if max_fragments == 0 {
            return;
        }

        let mut typesetter = Typesetter {
            font: &*self.font,
            kern_max: i32::from(self.font.record().kern_max),
            container_width: self.container_width,
            line_height,
            alignment: self.alignment,
            max_fragments,
            fragments: Vec::new(),
            line: Vec::new(),
            pen: 0,
            at_line_start: true,
            full: false,
        };

        typesetter.layout(&self.text);
        self.fragments = typesetter.fragments;
    }
}

/// One greedy layout pass. Builds fragments top to bottom, maintaining
/// the pen position within the current line.
struct Typesetter<'a> {
    font: &'a BitmapFont,
    kern_max: i32,
    container_width: i32,
    line_height: i32,
    alignment: Alignment,
    max_fragments: usize,
    fragments: Vec<LineFragment>,
    line: Vec<PlacedGlyph>,
    pen: i32,
    at_line_start: bool,
    full: bool,
}

impl Typesetter<'_> {
    fn layout(&mut self, text: &str) {
        for (index, paragraph) in text.split('\n').enumerate() {
            if index > 0 && !self.break_line() {
                return;
            }

            self.layout_paragraph(paragraph);

            if self.full {
                return;
            }
        }

        self.close_line();
    }

    fn layout_paragraph(&mut self, paragraph: &str) {
        for word in paragraph.split(' ') {
            if self.full {
                return;
            }

            let word_width = self.word_width(word);

            if word_width <= self.container_width {
                if !self.at_line_start {
                    if self.pen + self.space_width() + word_width > self.container_width {
                        if !self.break_line() {
                            return;
                        }
                    } else {
                        self.place_char(' ');
                    }
                }

                for ch in word.chars() {
                    self.place_char(ch);
                }
            } else {
                // the word alone overflows the container: place it
                // character by character, wrapping wherever the next
                // glyph would not fit
                if !self.at_line_start {
                    if self.pen + self.space_width() >= self.container_width {
                        if !self.break_line() {
                            return;
                        }
                    } else {
                        self.place_char(' ');
                    }
                }

                for ch in word.chars() {
                    let glyph = match self.lookup(ch) {
                        Some(glyph) => glyph,
                        None => continue,
                    };

                    if !self.at_line_start && self.pen + self.advance_of(&glyph) > self.container_width
                    {
                        if !self.break_line() {
                            return;
                        }
                    }

                    self.place(glyph);
                }
            }
        }
    }

    /// Width a word would occupy: the sum over its characters of
    /// `kernMax + offset + width`. Characters without a glyph contribute
    /// nothing.
    fn word_width(&self, word: &str) -> i32 {
        word.chars()
            .filter_map(|ch| self.lookup(ch))
            .map(|glyph| self.advance_of(&glyph))
            .sum()
    }

    fn space_width(&self) -> i32 {
        self.lookup(' ')
            .map(|glyph| self.advance_of(&glyph))
            .unwrap_or(0)
    }

    fn advance_of(&self, glyph: &Glyph) -> i32 {
        self.kern_max + i32::from(glyph.offset) + i32::from(glyph.width)
    }

    /// Glyph for a character, or `None` when the font has nothing to
    /// place (absent glyphs are silently skipped).
    fn lookup(&self, ch: char) -> Option<Glyph> {
        let code = u16::try_from(u32::from(ch)).ok()?;
        let glyph = self.font.glyph(code);

        (!glyph.is_missing()).then_some(glyph)
    }

    fn place_char(&mut self, ch: char) {
        if let Some(glyph) = self.lookup(ch) {
            self.place(glyph);
        }
    }

    fn place(&mut self, glyph: Glyph) {
        self.line.push(PlacedGlyph {
            char_code: glyph.char_code,
            x: self.pen,
            glyph,
        });

        self.pen += self.advance_of(&glyph);
        self.at_line_start = false;
    }

    /// Closes the current line into a fragment.
    fn close_line(&mut self) {
        let index = self.fragments.len() as i32;

        self.fragments.push(LineFragment {
            frame: Rect::new(
                0,
                index * self.line_height,
                self.container_width,
                self.line_height,
            ),
            alignment: self.alignment,
            glyphs: std::mem::take(&mut self.line),
            total_width: self.pen,
        });

        self.pen = 0;
        self.at_line_start = true;
    }

    /// Closes the current line and opens a new one, unless that would
    /// exceed the fragment cap, in which case layout stops with the
    /// fragments built so far.
    fn break_line(&mut self) -> bool {
        self.close_line();

        if self.fragments.len() >= self.max_fragments {
            self.full = true;
            return false;
        }

        true
    }
}
