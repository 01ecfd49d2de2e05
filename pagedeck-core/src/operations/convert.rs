//! Conversions between images and PDF.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::{debug, warn};

use crate::document::PdfFile;
use crate::operations::{OperationError, OperationResult};

/// Build a PDF with one page per decodable input image.
///
/// Each image is re-encoded as JPEG and embedded as a DCTDecode image
/// XObject on a page sized to the image's pixel dimensions (1 px = 1 pt).
/// Inputs that fail to decode are skipped; a batch where nothing decodes
/// is rejected.
pub fn images_to_pdf(inputs: &[Vec<u8>]) -> OperationResult<PdfFile> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for (i, bytes) in inputs.iter().enumerate() {
        let decoded = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!(input = i, error = %e, "skipping undecodable image");
                continue;
            }
        };
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut jpeg = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 85);
        encoder.encode_image(&rgb)?;

        // already JPEG-compressed, lopdf must not deflate it again
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false);
        let image_id = doc.add_object(stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width as f32),
                        0.into(),
                        0.into(),
                        Object::Real(height as f32),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im1".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im1" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    if kids.is_empty() {
        return Err(OperationError::EmptySelection(
            "no decodable images in the input".to_string(),
        ));
    }
    debug!(pages = kids.len(), "built PDF from images");

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => count,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(PdfFile::from_document(doc))
}

/// Rasterizing PDF pages requires a renderer this build does not carry.
pub fn pdf_to_images(_file: &PdfFile) -> OperationResult<Vec<Vec<u8>>> {
    Err(OperationError::Unsupported("pdf-to-images"))
}
