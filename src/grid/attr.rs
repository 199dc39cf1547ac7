use serde::{Deserialize, Serialize};

/// Packed display attribute.
///
/// Bits 4-6 hold the foreground colour, bits 0-2 the background colour,
/// bit 7 is bold and bit 3 is blink. Colours are the eight ANSI indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attr(pub u8);

const FG_SHIFT: u8 = 4;
const COLOR_MASK: u8 = 0x07;
const BOLD: u8 = 0x80;
const BLINK: u8 = 0x08;

impl Attr {
    /// White text on a black background.
    pub const DEFAULT: Attr = Attr(0x70);

    pub fn new(fg: u8, bg: u8) -> Self {
        Attr(((fg & COLOR_MASK) << FG_SHIFT) | (bg & COLOR_MASK))
    }

    pub fn fg(self) -> u8 {
        (self.0 >> FG_SHIFT) & COLOR_MASK
    }

    pub fn bg(self) -> u8 {
        self.0 & COLOR_MASK
    }

    pub fn bold(self) -> bool {
        self.0 & BOLD != 0
    }

    pub fn blink(self) -> bool {
        self.0 & BLINK != 0
    }

    pub fn with_fg(self, fg: u8) -> Self {
        Attr((self.0 & !(COLOR_MASK << FG_SHIFT)) | ((fg & COLOR_MASK) << FG_SHIFT))
    }

    pub fn with_bg(self, bg: u8) -> Self {
        Attr((self.0 & !COLOR_MASK) | (bg & COLOR_MASK))
    }

    pub fn with_bold(self, on: bool) -> Self {
        Attr(if on { self.0 | BOLD } else { self.0 & !BOLD })
    }

    pub fn with_blink(self, on: bool) -> Self {
        Attr(if on { self.0 | BLINK } else { self.0 & !BLINK })
    }
}

impl Default for Attr {
    fn default() -> Self {
        Attr::DEFAULT
    }
}
