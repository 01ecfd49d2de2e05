//! Page reordering from an explicit sequence.

use tracing::debug;

use crate::document::{PagePick, PdfFile};
use crate::operations::{OperationError, OperationResult};
use crate::pagespec::PageSpec;

/// Rebuild the document in the order `spec` declares.
///
/// The specification is taken as a sequence, not a set: duplicates
/// duplicate the page and omissions drop it. References outside the
/// document are skipped; a sequence with nothing left is rejected.
pub fn reorder_pages(file: &PdfFile, spec: &PageSpec) -> OperationResult<PdfFile> {
    let order = spec.sequence(file.page_count());
    if order.is_empty() {
        return Err(OperationError::EmptySelection(
            "page order resolves to no pages".to_string(),
        ));
    }
    debug!(pages = order.len(), "reordering pages");

    let picks: Vec<PagePick> = order.into_iter().map(PagePick::copy).collect();
    file.assemble(&picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn reorders_to_the_declared_sequence() {
        let file = sample_pdf(3);
        let out = reorder_pages(&file, &PageSpec::parse("3,1,2")).unwrap();

        let texts = page_texts(&out);
        assert!(texts[0].contains("Page 3"));
        assert!(texts[1].contains("Page 1"));
        assert!(texts[2].contains("Page 2"));
    }

    #[test]
    fn duplicates_duplicate_and_omissions_drop() {
        let file = sample_pdf(3);
        let out = reorder_pages(&file, &PageSpec::parse("1,1,2")).unwrap();

        assert_eq!(out.page_count(), 3);
        let texts = page_texts(&out);
        assert!(texts[0].contains("Page 1"));
        assert!(texts[1].contains("Page 1"));
        assert!(texts[2].contains("Page 2"));
        assert!(!texts.iter().any(|t| t.contains("Page 3")));
    }

    #[test]
    fn out_of_bounds_references_are_skipped() {
        let file = sample_pdf(3);
        let out = reorder_pages(&file, &PageSpec::parse("9,2,1")).unwrap();

        assert_eq!(out.page_count(), 2);
        let texts = page_texts(&out);
        assert!(texts[0].contains("Page 2"));
        assert!(texts[1].contains("Page 1"));
    }

    #[test]
    fn rejects_an_empty_sequence() {
        let file = sample_pdf(3);
        let err = reorder_pages(&file, &PageSpec::parse("")).unwrap_err();
        assert!(matches!(err, OperationError::EmptySelection(_)));
    }
}
