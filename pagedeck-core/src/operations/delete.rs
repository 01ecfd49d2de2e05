//! Page deletion as the complement of a selection.

use tracing::debug;

use crate::document::{PagePick, PdfFile};
use crate::operations::{OperationError, OperationResult};
use crate::pagespec::PageSpec;

/// Indices that survive deleting `spec` from a document of `total_pages`.
///
/// The deletion set and the keep set partition the document: every index is
/// in exactly one of them. Fails when the deletion resolves to nothing or
/// when it would delete every page.
pub fn keep_indices(spec: &PageSpec, total_pages: usize) -> OperationResult<Vec<usize>> {
    let doomed = spec.indices(total_pages);
    if doomed.is_empty() {
        return Err(OperationError::EmptySelection(
            "no valid pages to delete".to_string(),
        ));
    }

    let kept: Vec<usize> = (0..total_pages)
        .filter(|index| !doomed.contains(index))
        .collect();
    if kept.is_empty() {
        return Err(OperationError::EmptySelection(
            "cannot delete every page of the document".to_string(),
        ));
    }
    Ok(kept)
}

/// Remove the pages named by `spec`, returning a document with the rest.
pub fn delete_pages(file: &PdfFile, spec: &PageSpec) -> OperationResult<PdfFile> {
    let kept = keep_indices(spec, file.page_count())?;
    debug!(kept = kept.len(), total = file.page_count(), "deleting pages");

    let picks: Vec<PagePick> = kept.into_iter().map(PagePick::copy).collect();
    file.assemble(&picks)
}
