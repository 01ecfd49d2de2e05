//! Page number stamps.

use lopdf::content::Operation;
use lopdf::Object;
use tracing::debug;

use crate::document::{PdfFile, STAMP_FONT_KEY};
use crate::operations::OperationResult;

/// Distance from the page edge in points.
const MARGIN: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl NumberPosition {
    /// Lenient parse; anything unrecognized falls back to BottomCenter.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "top-left" => Self::TopLeft,
            "top-center" => Self::TopCenter,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            _ => Self::BottomCenter,
        }
    }

    fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Arabic,
    RomanLower,
    RomanUpper,
    AlphaLower,
    AlphaUpper,
}

impl NumberFormat {
    /// Lenient parse; anything unrecognized falls back to Arabic.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "roman" | "roman-lower" => Self::RomanLower,
            "roman-upper" => Self::RomanUpper,
            "letters" | "alpha" | "alpha-lower" => Self::AlphaLower,
            "alpha-upper" => Self::AlphaUpper,
            _ => Self::Arabic,
        }
    }

    /// Render a 1-based page number in this format.
    pub fn render(self, number: u32) -> String {
        match self {
            Self::Arabic => number.to_string(),
            Self::RomanLower => to_roman(number).to_ascii_lowercase(),
            Self::RomanUpper => to_roman(number),
            Self::AlphaLower => to_alpha(number),
            Self::AlphaUpper => to_alpha(number).to_ascii_uppercase(),
        }
    }
}

/// Uppercase roman numerals; 0 has no representation and renders as "0".
fn to_roman(mut number: u32) -> String {
    if number == 0 {
        return "0".to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while number >= value {
            out.push_str(digits);
            number -= value;
        }
    }
    out
}

/// Bijective base-26 letters: 1 -> "a", 26 -> "z", 27 -> "aa".
fn to_alpha(mut number: u32) -> String {
    if number == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while number > 0 {
        number -= 1;
        out.push(b'a' + (number % 26) as u8);
        number /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct PageNumberOptions {
    pub position: NumberPosition,
    pub format: NumberFormat,
    /// Number assigned to the first page.
    pub start_at: u32,
    pub font_size: f32,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            position: NumberPosition::default(),
            format: NumberFormat::default(),
            start_at: 1,
            font_size: 12.0,
        }
    }
}

/// Stamp a page number onto every page.
pub fn add_page_numbers(
    file: &mut PdfFile,
    options: &PageNumberOptions,
) -> OperationResult<()> {
    debug!(?options.position, ?options.format, options.start_at, "adding page numbers");

    let opts = options.clone();
    file.stamp_pages(None, move |index, (width, height)| {
        let label = opts.format.render(opts.start_at.saturating_add(index as u32));
        let advance = label.chars().count() as f32 * opts.font_size * 0.5;
        let width = width as f32;
        let height = height as f32;

        let x = match opts.position {
            NumberPosition::TopLeft | NumberPosition::BottomLeft => MARGIN,
            NumberPosition::TopCenter | NumberPosition::BottomCenter => {
                (width - advance) / 2.0
            }
            NumberPosition::TopRight | NumberPosition::BottomRight => {
                width - MARGIN - advance
            }
        };
        let y = if opts.position.is_top() {
            height - MARGIN - opts.font_size
        } else {
            MARGIN
        };

        vec![
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![STAMP_FONT_KEY.into(), Object::Real(opts.font_size)],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(label)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn roman_numerals() {
        assert_eq!(to_roman(1), "I");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(9), "IX");
        assert_eq!(to_roman(14), "XIV");
        assert_eq!(to_roman(1994), "MCMXCIV");
    }

    #[test]
    fn alpha_labels_roll_over_like_spreadsheet_columns() {
        assert_eq!(to_alpha(1), "a");
        assert_eq!(to_alpha(26), "z");
        assert_eq!(to_alpha(27), "aa");
        assert_eq!(to_alpha(52), "az");
        assert_eq!(to_alpha(53), "ba");
    }

    #[test]
    fn format_rendering() {
        assert_eq!(NumberFormat::Arabic.render(7), "7");
        assert_eq!(NumberFormat::RomanLower.render(12), "xii");
        assert_eq!(NumberFormat::RomanUpper.render(12), "XII");
        assert_eq!(NumberFormat::AlphaLower.render(2), "b");
        assert_eq!(NumberFormat::AlphaUpper.render(28), "AB");
    }

    #[test]
    fn parsing_is_lenient() {
        assert_eq!(NumberPosition::parse("top-right"), NumberPosition::TopRight);
        assert_eq!(
            NumberPosition::parse("somewhere"),
            NumberPosition::BottomCenter
        );
        assert_eq!(NumberFormat::parse("roman"), NumberFormat::RomanLower);
        assert_eq!(NumberFormat::parse("weird"), NumberFormat::Arabic);
    }

    #[test]
    fn stamps_sequential_labels_starting_at_start_at() {
        let mut file = sample_pdf(3);
        let options = PageNumberOptions {
            start_at: 5,
            ..PageNumberOptions::default()
        };
        add_page_numbers(&mut file, &options).unwrap();

        let texts = page_texts(&file);
        assert!(texts[0].contains("(5)"));
        assert!(texts[1].contains("(6)"));
        assert!(texts[2].contains("(7)"));
    }

    #[test]
    fn roman_stamps_render_per_page() {
        let mut file = sample_pdf(2);
        let options = PageNumberOptions {
            format: NumberFormat::RomanLower,
            ..PageNumberOptions::default()
        };
        add_page_numbers(&mut file, &options).unwrap();

        let texts = page_texts(&file);
        assert!(texts[0].contains("(i)"));
        assert!(texts[1].contains("(ii)"));
    }
}
