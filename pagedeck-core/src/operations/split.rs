//! Splitting one document into several.

use tracing::debug;

use crate::document::{PagePick, PdfFile};
use crate::operations::output::group_filename;
use crate::operations::{OperationError, OperationResult};
use crate::pagespec::PageSpec;
use crate::ranges::PageRange;

/// How the split selection is expressed.
#[derive(Debug, Clone)]
pub enum SplitMode {
    /// Textual selection; every resolved page becomes its own output.
    Pages(PageSpec),
    /// Structured ranges; every range becomes one output.
    Ranges(Vec<PageRange>),
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub mode: SplitMode,
    /// Concatenate all groups into a single output document instead of one
    /// per group.
    pub merge: bool,
}

/// Split `file` into named output documents.
///
/// Groups that resolve to no pages (out-of-bounds or inverted ranges) are
/// dropped; a split where every group is empty is rejected. With `merge`
/// set the groups are concatenated in declared order into one document.
pub fn split_pdf(
    file: &PdfFile,
    options: &SplitOptions,
) -> OperationResult<Vec<(String, PdfFile)>> {
    let total = file.page_count();
    let mut groups: Vec<Vec<usize>> = match &options.mode {
        SplitMode::Pages(spec) => spec
            .indices(total)
            .into_iter()
            .map(|index| vec![index])
            .collect(),
        SplitMode::Ranges(ranges) => ranges
            .iter()
            .map(|range| range.indices(total))
            .filter(|indices| !indices.is_empty())
            .collect(),
    };
    if groups.is_empty() {
        return Err(OperationError::EmptySelection(
            "split selection resolves to no pages".to_string(),
        ));
    }

    if options.merge {
        groups = vec![groups.concat()];
    }
    debug!(outputs = groups.len(), total, "splitting document");

    groups
        .into_iter()
        .map(|indices| {
            let picks: Vec<PagePick> =
                indices.iter().copied().map(PagePick::copy).collect();
            let part = file.assemble(&picks)?;
            Ok((group_filename(&indices), part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_texts, sample_pdf};
    use pretty_assertions::assert_eq;

    #[test]
    fn page_mode_yields_one_output_per_page() {
        let file = sample_pdf(5);
        let options = SplitOptions {
            mode: SplitMode::Pages(PageSpec::parse("1,3")),
            merge: false,
        };
        let parts = split_pdf(&file, &options).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, "page-1.pdf");
        assert_eq!(parts[1].0, "page-3.pdf");
        assert!(page_texts(&parts[0].1)[0].contains("Page 1"));
        assert!(page_texts(&parts[1].1)[0].contains("Page 3"));
    }

    #[test]
    fn range_mode_yields_one_output_per_range() {
        let file = sample_pdf(6);
        let options = SplitOptions {
            mode: SplitMode::Ranges(vec![
                PageRange::new(1, 2),
                PageRange::new(3, 3),
                PageRange::new(4, 6),
            ]),
            merge: false,
        };
        let parts = split_pdf(&file, &options).unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].0, "pages-1-2.pdf");
        assert_eq!(parts[0].1.page_count(), 2);
        assert_eq!(parts[1].0, "page-3.pdf");
        assert_eq!(parts[1].1.page_count(), 1);
        assert_eq!(parts[2].0, "pages-4-6.pdf");
        assert_eq!(parts[2].1.page_count(), 3);
    }

    #[test]
    fn merge_concatenates_groups_into_one_document() {
        let file = sample_pdf(6);
        let options = SplitOptions {
            mode: SplitMode::Ranges(vec![PageRange::new(5, 6), PageRange::new(1, 1)]),
            merge: true,
        };
        let parts = split_pdf(&file, &options).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].1.page_count(), 3);
        let texts = page_texts(&parts[0].1);
        assert!(texts[0].contains("Page 5"));
        assert!(texts[1].contains("Page 6"));
        assert!(texts[2].contains("Page 1"));
    }

    #[test]
    fn empty_ranges_are_dropped_silently() {
        let file = sample_pdf(4);
        let options = SplitOptions {
            mode: SplitMode::Ranges(vec![
                PageRange::new(1, 2),
                PageRange::new(10, 12),
            ]),
            merge: false,
        };
        let parts = split_pdf(&file, &options).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn rejects_a_split_with_nothing_to_emit() {
        let file = sample_pdf(4);
        let options = SplitOptions {
            mode: SplitMode::Ranges(vec![PageRange::new(10, 12)]),
            merge: false,
        };
        assert!(matches!(
            split_pdf(&file, &options),
            Err(OperationError::EmptySelection(_))
        ));

        let options = SplitOptions {
            mode: SplitMode::Pages(PageSpec::parse("nonsense")),
            merge: true,
        };
        assert!(matches!(
            split_pdf(&file, &options),
            Err(OperationError::EmptySelection(_))
        ));
    }
}
