//! Merging several documents into one.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::document::PdfFile;
use crate::operations::{OperationError, OperationResult};

/// Concatenate `files` into a single document, pages in input order.
///
/// Object ids of each source are shifted past the previous document's
/// maximum so the object spaces never collide, then a fresh page tree and
/// catalog are built over all pages. Source catalogs, page trees and
/// outlines are discarded.
pub fn merge_files(files: Vec<PdfFile>) -> OperationResult<PdfFile> {
    if files.len() < 2 {
        return Err(OperationError::NotEnoughInputs);
    }
    debug!(inputs = files.len(), "merging documents");

    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut merged = Document::with_version("1.7");

    for file in files {
        let mut doc = file.into_document();
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for page_id in doc.get_pages().into_values() {
            let page = doc.get_object(page_id)?.clone();
            pages.push((page_id, page));
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    objects.insert(object_id, object);
                }
            }
        }
    }

    merged.objects.extend(objects);

    // extending `objects` directly leaves max_id at 0; without this the
    // fresh Pages/Catalog ids collide with kept source objects
    merged.max_id = max_id;

    let pages_id = merged.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for (page_id, page) in pages {
        let Object::Dictionary(dict) = page else {
            continue;
        };
        let mut dict = dict;
        dict.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(page_id, Object::Dictionary(dict));
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;

    merged.renumber_objects();
    merged.compress();

    Ok(PdfFile::from_document(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_pages_in_input_order() {
        let merged =
            merge_files(vec![sample_pdf(2), sample_pdf(1), sample_pdf(3)]).unwrap();

        assert_eq!(merged.page_count(), 6);
        let texts = page_texts(&merged);
        assert!(texts[0].contains("Page 1"));
        assert!(texts[1].contains("Page 2"));
        assert!(texts[2].contains("Page 1"));
        assert!(texts[3].contains("Page 1"));
        assert!(texts[5].contains("Page 3"));
    }

    #[test]
    fn merged_pages_keep_their_font_resources() {
        let merged = merge_files(vec![sample_pdf(2), sample_pdf(1)]).unwrap();
        let doc = merged.document();

        // every page's font reference must still resolve to a Font
        // dictionary, not to an object the page tree rebuild clobbered
        for page_id in doc.get_pages().into_values() {
            let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
            let font_id = fonts.get(b"F1").unwrap().as_reference().unwrap();
            let font = doc.get_object(font_id).unwrap().as_dict().unwrap();
            assert_eq!(
                font.get(b"Type").unwrap().as_name().unwrap(),
                b"Font".as_slice()
            );
            assert_eq!(
                font.get(b"BaseFont").unwrap().as_name().unwrap(),
                b"Helvetica".as_slice()
            );
        }
    }

    #[test]
    fn merged_output_survives_a_save_and_reload() {
        let mut merged = merge_files(vec![sample_pdf(1), sample_pdf(1)]).unwrap();
        let bytes = merged.to_bytes().unwrap();
        let reloaded = PdfFile::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 2);
    }

    #[test]
    fn rejects_fewer_than_two_inputs() {
        assert!(matches!(
            merge_files(vec![sample_pdf(3)]),
            Err(OperationError::NotEnoughInputs)
        ));
        assert!(matches!(
            merge_files(Vec::new()),
            Err(OperationError::NotEnoughInputs)
        ));
    }
}
