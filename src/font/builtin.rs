//! The PDF base-14 fonts used without embedding.

/// A standard Type1 font every PDF viewer provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl BuiltinFont {
    /// Look up a builtin font by its PostScript name.
    pub fn from_name(name: &str) -> Option<Self> {
        let font = match name {
            "Helvetica" => BuiltinFont::Helvetica,
            "Helvetica-Bold" => BuiltinFont::HelveticaBold,
            "Helvetica-Oblique" => BuiltinFont::HelveticaOblique,
            "Helvetica-BoldOblique" => BuiltinFont::HelveticaBoldOblique,
            "Courier" => BuiltinFont::Courier,
            "Courier-Bold" => BuiltinFont::CourierBold,
            "Courier-Oblique" => BuiltinFont::CourierOblique,
            "Courier-BoldOblique" => BuiltinFont::CourierBoldOblique,
            _ => return None,
        };
        Some(font)
    }

    /// PostScript name written as `/BaseFont`.
    pub fn postscript_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn is_courier(&self) -> bool {
        matches!(
            self,
            BuiltinFont::Courier
                | BuiltinFont::CourierBold
                | BuiltinFont::CourierOblique
                | BuiltinFont::CourierBoldOblique
        )
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            BuiltinFont::HelveticaBold
                | BuiltinFont::HelveticaBoldOblique
                | BuiltinFont::CourierBold
                | BuiltinFont::CourierBoldOblique
        )
    }

    /// The member of this font's family with the requested weight and slant.
    pub fn variant(&self, bold: bool, italic: bool) -> Self {
        match (self.is_courier(), bold, italic) {
            (false, false, false) => BuiltinFont::Helvetica,
            (false, true, false) => BuiltinFont::HelveticaBold,
            (false, false, true) => BuiltinFont::HelveticaOblique,
            (false, true, true) => BuiltinFont::HelveticaBoldOblique,
            (true, false, false) => BuiltinFont::Courier,
            (true, true, false) => BuiltinFont::CourierBold,
            (true, false, true) => BuiltinFont::CourierOblique,
            (true, true, true) => BuiltinFont::CourierBoldOblique,
        }
    }

    /// Encode a character as a single WinAnsi byte.
    pub fn encode(&self, ch: char) -> Option<u8> {
        winansi_byte(ch)
    }

    /// Advance width of a character in 1/1000 em, `None` if not encodable.
    pub fn advance(&self, ch: char) -> Option<f32> {
        let byte = winansi_byte(ch)?;
        if self.is_courier() {
            return Some(600.0);
        }
        let width = match byte {
            0x20..=0x7E => {
                let table = if self.is_bold() {
                    &HELVETICA_BOLD_ASCII
                } else {
                    &HELVETICA_ASCII
                };
                table[(byte - 0x20) as usize]
            }
            0x95 => 350,
            0x85 | 0x89 | 0x97 => 1000,
            0x91 | 0x92 | 0x82 => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 | 0x84 => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            0x99 => 1000,
            0xA0 => 278,
            0xA9 | 0xAE => 737,
            0xAD => 333,
            0xB0 => 400,
            0xC6 => 1000,
            0xE6 => 889,
            _ => 556,
        };
        Some(width as f32)
    }

    /// Ascent in 1/1000 em.
    pub fn ascent(&self) -> f32 {
        if self.is_courier() {
            629.0
        } else {
            718.0
        }
    }

    /// Descent in 1/1000 em (negative).
    pub fn descent(&self) -> f32 {
        if self.is_courier() {
            -157.0
        } else {
            -207.0
        }
    }
}

/// Map a character to its Windows-1252 code.
pub fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    let byte = match code {
        0x20..=0x7E | 0xA0..=0xFF => code as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

// AFM widths for 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
