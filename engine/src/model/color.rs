use std::fmt;

/// An RGBA color parsed from a palette hex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == u8::MAX {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
pub fn parse_hex_color(hex: &str) -> Result<HexColor, &'static str> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err("Invalid hex color format");
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| "Invalid hex digit");

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                let value = digit.to_digit(16).ok_or("Invalid hex digit")? as u8;
                *slot = value * 17;
            }
            Ok(HexColor {
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
                a: u8::MAX,
            })
        }
        6 | 8 => Ok(HexColor {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
            a: if hex.len() == 8 {
                channel(&hex[6..8])?
            } else {
                u8::MAX
            },
        }),
        _ => Err("Invalid hex color format"),
    }
}
