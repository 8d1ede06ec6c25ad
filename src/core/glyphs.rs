//! Bundled bitmap font used when no outline font can be loaded.
//!
//! Every glyph lives in a 5x10 cell: two rows for accents above, seven body
//! rows, one row for cedillas below. Each row is a 5 bit mask, MSB leftmost.

pub const CELL_WIDTH: u32 = 5;
pub const CELL_HEIGHT: u32 = 10;
/// Blank column between glyphs.
pub const SPACING: u32 = 1;

pub type GlyphRows = [u8; CELL_HEIGHT as usize];

const fn cell(above: [u8; 2], body: [u8; 7], below: u8) -> GlyphRows {
    [
        above[0], above[1], body[0], body[1], body[2], body[3], body[4], body[5], body[6], below,
    ]
}

const fn plain(body: [u8; 7]) -> GlyphRows {
    cell([0, 0], body, 0)
}

const A: [u8; 7] = [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11];
const C: [u8; 7] = [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E];
const G: [u8; 7] = [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F];
const I: [u8; 7] = [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E];
const O: [u8; 7] = [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E];
const S: [u8; 7] = [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E];
const U: [u8; 7] = [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E];

/// Hollow box drawn for characters without a glyph.
pub const MISSING: GlyphRows = plain([0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F]);

pub fn glyph(ch: char) -> Option<GlyphRows> {
    let ch = match ch {
        'ç' => 'Ç',
        'ğ' => 'Ğ',
        'ı' => 'I',
        'i' => 'İ',
        'ö' => 'Ö',
        'ş' => 'Ş',
        'ü' => 'Ü',
        c => c.to_ascii_uppercase(),
    };

    let rows = match ch {
        ' ' => plain([0; 7]),
        'A' => plain(A),
        'B' => plain([0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
        'C' => plain(C),
        'D' => plain([0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E]),
        'E' => plain([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
        'F' => plain([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
        'G' => plain(G),
        'H' => plain([0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        'I' => plain(I),
        'J' => plain([0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
        'K' => plain([0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
        'L' => plain([0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
        'M' => plain([0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
        'N' => plain([0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
        'O' => plain(O),
        'P' => plain([0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
        'Q' => plain([0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
        'R' => plain([0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
        'S' => plain(S),
        'T' => plain([0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
        'U' => plain(U),
        'V' => plain([0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
        'W' => plain([0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
        'X' => plain([0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
        'Y' => plain([0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04]),
        'Z' => plain([0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
        'Ç' => cell([0, 0], C, 0x04),
        'Ğ' => cell([0x11, 0x0E], G, 0),
        'İ' => cell([0, 0x04], I, 0),
        'Ö' => cell([0, 0x0A], O, 0),
        'Ş' => cell([0, 0], S, 0x04),
        'Ü' => cell([0, 0x0A], U, 0),
        '0' => plain([0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
        '1' => plain([0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        '2' => plain([0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
        '3' => plain([0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
        '4' => plain([0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
        '5' => plain([0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
        '6' => plain([0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
        '7' => plain([0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
        '8' => plain([0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
        '9' => plain([0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
        '+' => plain([0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
        '-' => plain([0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
        '.' => plain([0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
        ':' => plain([0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
        _ => return None,
    };
    Some(rows)
}

/// Whether the pixel at column `x`, row `y` of the cell is set.
pub fn is_set(rows: &GlyphRows, x: u32, y: u32) -> bool {
    rows[y as usize] & (0x10 >> x) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_letters_have_marks() {
        let dotted = glyph('İ').unwrap();
        assert!(is_set(&dotted, 2, 1));
        assert!(!is_set(&glyph('I').unwrap(), 2, 1));
        assert!(is_set(&glyph('Ş').unwrap(), 2, 9));
        assert_eq!(glyph('ç'), glyph('Ç'));
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(glyph('€'), None);
        assert!(glyph(' ').unwrap().iter().all(|r| *r == 0));
    }
}
