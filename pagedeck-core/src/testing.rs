//! In-memory PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::document::PdfFile;

/// Build a document with `n` pages, each carrying a single "Page N" text
/// line so tests can assert page identity after an operation.
pub(crate) fn sample_pdf(n: usize) -> PdfFile {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(n);
    for i in 0..n {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode fixture content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => n as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    PdfFile::from_document(doc)
}

/// Serialized form of [`sample_pdf`].
pub(crate) fn sample_pdf_bytes(n: usize) -> Vec<u8> {
    sample_pdf(n).to_bytes().expect("serialize fixture")
}

/// Raw content of every page in page-tree order, lossily decoded. The
/// fixture pages contain plain "Page N" literals, so substring checks are
/// enough to assert identity and order.
pub(crate) fn page_texts(file: &PdfFile) -> Vec<String> {
    let doc = file.document();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let data = doc.get_page_content(id).unwrap_or_default();
            String::from_utf8_lossy(&data).into_owned()
        })
        .collect()
}
