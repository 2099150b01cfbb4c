//! Off-screen copy of the 3×16 character display.
//!
//! Text is written through [`DisplayBuffer::put_char`] or [`core::fmt::Write`]
//! and copied to the glass by the LCD driver. Control characters act on the
//! cursor immediately:
//!
//! | byte | effect |
//! |------|--------|
//! | `\n` | start of the next line (after line 3, line 1) |
//! | `\r` | blank the current line, cursor to its start |
//! | `\b` | cursor back one cell, stopping at 0 |
//! | `\f` | blank everything, cursor to 0 |
//!
//! Any other byte is stored at the cursor, which then advances and wraps
//! from the last cell back to the first.

use core::fmt;

use platform::lcd_dog::{GLYPH_DEGREE, GLYPH_RIGHT_ARROW, LINE_COUNT, LINE_WIDTH};

/// Number of character cells.
pub const CAPACITY: usize = LINE_WIDTH * LINE_COUNT;

const BLANK: u8 = b' ';
const BACKSPACE: u8 = 0x08;
const FORM_FEED: u8 = 0x0C;

/// Character cells plus a linear cursor in `0..CAPACITY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    lines: [[u8; LINE_WIDTH]; LINE_COUNT],
    cursor: usize,
}

impl DisplayBuffer {
    /// Blank buffer, cursor at the top-left cell.
    pub const fn new() -> Self {
        Self {
            lines: [[BLANK; LINE_WIDTH]; LINE_COUNT],
            cursor: 0,
        }
    }

    /// Blank every cell and home the cursor.
    pub fn clear(&mut self) {
        self.lines = [[BLANK; LINE_WIDTH]; LINE_COUNT];
        self.cursor = 0;
    }

    /// Linear cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Line the cursor is on, `0..LINE_COUNT`.
    pub fn cursor_line(&self) -> usize {
        self.cursor / LINE_WIDTH
    }

    /// Write one byte.
    #[allow(clippy::arithmetic_side_effects)] // cursor < CAPACITY, line < LINE_COUNT
    pub fn put_char(&mut self, byte: u8) {
        let line = self.cursor_line();
        match byte {
            b'\n' => self.cursor = ((line + 1) % LINE_COUNT) * LINE_WIDTH,
            b'\r' => {
                if let Some(cells) = self.lines.get_mut(line) {
                    *cells = [BLANK; LINE_WIDTH];
                }
                self.cursor = line * LINE_WIDTH;
            }
            BACKSPACE => self.cursor = self.cursor.saturating_sub(1),
            FORM_FEED => self.clear(),
            _ => {
                let column = self.cursor % LINE_WIDTH;
                if let Some(cell) = self.lines.get_mut(line).and_then(|l| l.get_mut(column)) {
                    *cell = byte;
                }
                self.cursor = (self.cursor + 1) % CAPACITY;
            }
        }
    }

    /// Write a byte string.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b);
        }
    }

    /// Raw cells of line `index`.
    pub fn line(&self, index: usize) -> Option<&[u8; LINE_WIDTH]> {
        self.lines.get(index)
    }

    /// All lines, top to bottom.
    pub fn lines(&self) -> &[[u8; LINE_WIDTH]; LINE_COUNT] {
        &self.lines
    }

    /// Line `index` as text, with display glyphs mapped back to Unicode.
    pub fn line_text(&self, index: usize) -> heapless::String<CAPACITY> {
        let mut text = heapless::String::new();
        if let Some(cells) = self.line(index) {
            for &b in cells {
                // 16 cells of at most 3 UTF-8 bytes fit in CAPACITY.
                let _ = text.push(glyph_to_char(b));
            }
        }
        text
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for DisplayBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.put_char(char_to_glyph(c));
        }
        Ok(())
    }
}

/// Display code for `c`. ASCII passes through; characters outside the
/// controller ROM become `?`.
pub fn char_to_glyph(c: char) -> u8 {
    match c {
        '°' => GLYPH_DEGREE,
        '→' => GLYPH_RIGHT_ARROW,
        c if c.is_ascii() => c as u8,
        _ => b'?',
    }
}

/// Inverse of [`char_to_glyph`] for the mapped glyphs.
pub fn glyph_to_char(b: u8) -> char {
    match b {
        GLYPH_DEGREE => '°',
        GLYPH_RIGHT_ARROW => '→',
        b if b.is_ascii_graphic() || b == b' ' => char::from(b),
        _ => '?',
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use core::fmt::Write;

    fn text(buf: &DisplayBuffer, line: usize) -> heapless::String<CAPACITY> {
        buf.line_text(line)
    }

    #[test]
    fn test_buffer_starts_blank() {
        let buf = DisplayBuffer::new();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(text(&buf, 0).as_str(), "                ");
        assert!(buf.line(3).is_none());
    }

    #[test]
    fn test_buffer_newline_moves_to_next_line() {
        let mut buf = DisplayBuffer::new();
        write!(buf, "ab\ncd\nef").unwrap();
        assert_eq!(&text(&buf, 0)[..2], "ab");
        assert_eq!(&text(&buf, 1)[..2], "cd");
        assert_eq!(&text(&buf, 2)[..2], "ef");
        assert_eq!(buf.cursor(), 34);
    }

    #[test]
    fn test_buffer_newline_on_last_line_wraps_to_first() {
        let mut buf = DisplayBuffer::new();
        buf.put_bytes(b"\n\n\n");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_buffer_carriage_return_clears_current_line() {
        let mut buf = DisplayBuffer::new();
        write!(buf, "keep\nerase me").unwrap();
        buf.put_char(b'\r');
        assert_eq!(buf.cursor(), 16);
        assert_eq!(&text(&buf, 0)[..4], "keep");
        assert_eq!(text(&buf, 1).as_str(), "                ");
    }

    #[test]
    fn test_buffer_backspace_saturates() {
        let mut buf = DisplayBuffer::new();
        buf.put_bytes(b"x\x08\x08");
        assert_eq!(buf.cursor(), 0);
        buf.put_char(b'y');
        assert_eq!(&text(&buf, 0)[..1], "y");
    }

    #[test]
    fn test_buffer_form_feed_clears_all() {
        let mut buf = DisplayBuffer::new();
        write!(buf, "one\ntwo").unwrap();
        buf.put_char(0x0C);
        assert_eq!(buf, DisplayBuffer::new());
    }

    #[test]
    fn test_buffer_cursor_wraps_after_last_cell() {
        let mut buf = DisplayBuffer::new();
        for _ in 0..CAPACITY {
            buf.put_char(b'#');
        }
        assert_eq!(buf.cursor(), 0);
        buf.put_char(b'!');
        assert_eq!(&text(&buf, 0)[..2], "!#");
    }

    #[test]
    fn test_buffer_maps_glyphs() {
        let mut buf = DisplayBuffer::new();
        write!(buf, "21°C→é").unwrap();
        assert_eq!(&buf.line(0).unwrap()[..6], &[b'2', b'1', 0xDF, b'C', 0x7E, b'?']);
        assert!(text(&buf, 0).starts_with("21°C→?"));
    }
}
