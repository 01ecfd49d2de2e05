//! # pagedeck
//!
//! Page-selection parsing and page-level PDF operations.
//!
//! The crate is built around a small mini-language for describing pages
//! ("1,3,5-7", "all", explicit reorder lists) and the index math that turns
//! those descriptions into concrete page transformations: split, merge,
//! delete, extract, reorder, rotate, watermark, page numbering and
//! compression. The physical PDF work is delegated to [`lopdf`] behind a
//! thin [`document::PdfFile`] wrapper.
//!
//! ## Example
//!
//! ```no_run
//! use pagedeck::{PageSpec, PdfFile};
//! use pagedeck::operations::extract_pages;
//!
//! let bytes = std::fs::read("report.pdf").unwrap();
//! let file = PdfFile::from_bytes(&bytes).unwrap();
//! let spec = PageSpec::parse("1,3,5-7");
//! let mut extracted = extract_pages(&file, &spec).unwrap();
//! std::fs::write("chapters.pdf", extracted.to_bytes().unwrap()).unwrap();
//! ```

pub mod document;
pub mod operations;
pub mod pagespec;
pub mod ranges;
pub mod visual;

pub use document::{PagePick, PdfFile};
pub use operations::{OperationError, OperationResult};
pub use pagespec::PageSpec;
pub use ranges::{MoveDirection, PageRange, RangeField, RangeList};
pub use visual::VisualPageState;

#[cfg(test)]
pub(crate) mod testing;
