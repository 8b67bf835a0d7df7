//! Lengths with CSS units and their conversion to user units

/// CSS pixels per inch
const DPI: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    Px,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
    Em,
    Ex,
    Percent,
}

/// A number with an optional unit suffix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub number: f64,
    pub unit: Unit,
}

impl Length {
    pub fn new(number: f64, unit: Unit) -> Self {
        Self { number, unit }
    }

    /// Parse a length such as `10`, `2.5mm`, `50%`
    pub fn parse(text: &str) -> Result<Length, String> {
        let text = text.trim();
        let (number, suffix) =
            split_number(text).ok_or_else(|| format!("expected a number, found '{}'", text))?;
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "" => Unit::None,
            "px" => Unit::Px,
            "pt" => Unit::Pt,
            "pc" => Unit::Pc,
            "mm" => Unit::Mm,
            "cm" => Unit::Cm,
            "in" => Unit::In,
            "em" => Unit::Em,
            "ex" => Unit::Ex,
            "%" => Unit::Percent,
            other => return Err(format!("unknown unit '{}'", other)),
        };
        Ok(Length { number, unit })
    }

    /// Convert to user units
    ///
    /// `percent_base` is the reference size for percentages; `None` makes a
    /// percentage an error.
    pub fn to_user_units(self, font_size: f64, percent_base: Option<f64>) -> Result<f64, String> {
        let n = self.number;
        Ok(match self.unit {
            Unit::None | Unit::Px => n,
            Unit::Pt => n * DPI / 72.0,
            Unit::Pc => n * DPI / 6.0,
            Unit::Mm => n * DPI / 25.4,
            Unit::Cm => n * DPI / 2.54,
            Unit::In => n * DPI,
            Unit::Em => n * font_size,
            Unit::Ex => n * font_size / 2.0,
            Unit::Percent => match percent_base {
                Some(base) => n * base / 100.0,
                None => return Err("a percentage needs a known viewport size".to_string()),
            },
        })
    }
}

/// Split the leading number off `text`
fn split_number(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut has_digits = i > int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        has_digits |= i > frac_start;
    }
    if !has_digits {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    let number = text[..i].parse::<f64>().ok()?;
    Some((number, &text[i..]))
}
