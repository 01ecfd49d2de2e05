//! Text watermarks stamped over every page.

use lopdf::content::Operation;
use lopdf::Object;
use tracing::debug;

use crate::document::{PdfFile, STAMP_FONT_KEY, STAMP_GS_KEY};
use crate::operations::{OperationError, OperationResult};

/// cos/sin of 45 degrees, for the diagonal text matrix.
const DIAG: f32 = 0.707_11;

/// Rough advance width of Helvetica text, good enough for centering.
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkPosition {
    Center,
    #[default]
    Diagonal,
    Tiled,
}

impl WatermarkPosition {
    /// Lenient parse; anything unrecognized falls back to Diagonal.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "center" => Self::Center,
            "tiled" => Self::Tiled,
            _ => Self::Diagonal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    pub position: WatermarkPosition,
    /// Opacity percentage, clamped into `[10, 100]`.
    pub opacity: u8,
    pub font_size: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: WatermarkPosition::default(),
            opacity: 30,
            font_size: 48.0,
        }
    }
}

/// Stamp `options.text` over every page of the document.
pub fn add_watermark(file: &mut PdfFile, options: &WatermarkOptions) -> OperationResult<()> {
    let text = options.text.trim();
    if text.is_empty() {
        return Err(OperationError::InvalidOptions(
            "watermark text must not be empty".to_string(),
        ));
    }
    let opacity = options.opacity.clamp(10, 100);
    let alpha = f32::from(opacity) / 100.0;
    debug!(?options.position, opacity, "adding watermark");

    let text = text.to_string();
    let font_size = options.font_size;
    let position = options.position;

    file.stamp_pages(Some(alpha), move |_, (width, height)| {
        let width = width as f32;
        let height = height as f32;
        let advance = text_width(&text, font_size);

        let mut ops = vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![STAMP_GS_KEY.into()]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![STAMP_FONT_KEY.into(), Object::Real(font_size)],
            ),
            Operation::new("g", vec![Object::Real(0.5)]),
        ];

        match position {
            WatermarkPosition::Center => {
                ops.push(Operation::new(
                    "Td",
                    vec![
                        Object::Real((width - advance) / 2.0),
                        Object::Real(height / 2.0),
                    ],
                ));
                ops.push(Operation::new("Tj", vec![Object::string_literal(text.clone())]));
            }
            WatermarkPosition::Diagonal => {
                // rotate -45 degrees around the page center
                ops.push(Operation::new(
                    "Tm",
                    vec![
                        Object::Real(DIAG),
                        Object::Real(-DIAG),
                        Object::Real(DIAG),
                        Object::Real(DIAG),
                        Object::Real(width / 2.0 - advance * DIAG / 2.0),
                        Object::Real(height / 2.0 + advance * DIAG / 2.0),
                    ],
                ));
                ops.push(Operation::new("Tj", vec![Object::string_literal(text.clone())]));
            }
            WatermarkPosition::Tiled => {
                let step_x = (advance + 80.0).max(160.0);
                let step_y = (font_size * 3.0).max(120.0);
                let mut y = step_y / 2.0;
                let mut row = 0;
                while y < height {
                    // stagger odd rows by half a step
                    let mut x = if row % 2 == 0 { 0.0 } else { step_x / 2.0 };
                    while x < width {
                        ops.push(Operation::new(
                            "Tm",
                            vec![
                                Object::Real(DIAG),
                                Object::Real(-DIAG),
                                Object::Real(DIAG),
                                Object::Real(DIAG),
                                Object::Real(x),
                                Object::Real(y),
                            ],
                        ));
                        ops.push(Operation::new(
                            "Tj",
                            vec![Object::string_literal(text.clone())],
                        ));
                        x += step_x;
                    }
                    y += step_y;
                    row += 1;
                }
            }
        }

        ops.push(Operation::new("ET", vec![]));
        ops.push(Operation::new("Q", vec![]));
        ops
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn position_parsing_is_lenient() {
        assert_eq!(WatermarkPosition::parse("center"), WatermarkPosition::Center);
        assert_eq!(WatermarkPosition::parse("TILED"), WatermarkPosition::Tiled);
        assert_eq!(
            WatermarkPosition::parse("sideways"),
            WatermarkPosition::Diagonal
        );
    }

    #[test]
    fn stamps_the_text_on_every_page() {
        let mut file = sample_pdf(3);
        let options = WatermarkOptions {
            text: "CONFIDENTIAL".to_string(),
            ..WatermarkOptions::default()
        };
        add_watermark(&mut file, &options).unwrap();

        assert_eq!(file.page_count(), 3);
        for text in page_texts(&file) {
            assert!(text.contains("CONFIDENTIAL"));
            // the original page content survives underneath
            assert!(text.contains("Page "));
        }
    }

    #[test]
    fn tiled_watermark_repeats_across_the_page() {
        let mut file = sample_pdf(1);
        let options = WatermarkOptions {
            text: "DRAFT".to_string(),
            position: WatermarkPosition::Tiled,
            ..WatermarkOptions::default()
        };
        add_watermark(&mut file, &options).unwrap();

        let text = &page_texts(&file)[0];
        assert!(text.matches("DRAFT").count() > 1);
    }

    #[test]
    fn rejects_blank_text() {
        let mut file = sample_pdf(1);
        let options = WatermarkOptions {
            text: "   ".to_string(),
            ..WatermarkOptions::default()
        };
        assert!(matches!(
            add_watermark(&mut file, &options),
            Err(OperationError::InvalidOptions(_))
        ));
    }

    #[test]
    fn stamped_output_reloads() {
        let mut file = sample_pdf(2);
        let options = WatermarkOptions {
            text: "SAMPLE".to_string(),
            opacity: 200, // clamped to 100
            ..WatermarkOptions::default()
        };
        add_watermark(&mut file, &options).unwrap();

        let bytes = file.to_bytes().unwrap();
        let reloaded = PdfFile::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 2);
    }
}
