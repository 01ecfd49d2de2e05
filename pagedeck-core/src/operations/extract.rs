//! Page extraction: a new document from the selected pages only.

use tracing::debug;

use crate::document::{PagePick, PdfFile};
use crate::operations::{OperationError, OperationResult};
use crate::pagespec::PageSpec;

/// Build a document containing only the pages named by `spec`, in document
/// order. The selection is intersected with the actual page count; an
/// intersection of nothing is rejected.
pub fn extract_pages(file: &PdfFile, spec: &PageSpec) -> OperationResult<PdfFile> {
    let indices = spec.indices(file.page_count());
    if indices.is_empty() {
        return Err(OperationError::EmptySelection(
            "no valid pages to extract".to_string(),
        ));
    }
    debug!(pages = indices.len(), "extracting pages");

    let picks: Vec<PagePick> = indices.into_iter().map(PagePick::copy).collect();
    file.assemble(&picks)
}
