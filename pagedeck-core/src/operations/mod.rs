//! Page-level document operations.
//!
//! Every operation follows the same contract: resolve the caller's page
//! selection to 0-based indices, reject the cases that would produce an
//! unusable document (an empty result, zero inputs), and delegate the
//! actual page-tree work to [`crate::document::PdfFile::assemble`].
//! Selection problems short of emptiness are not errors; the lenient
//! resolution in [`crate::pagespec`] already dropped them.

pub mod compress;
pub mod convert;
pub mod delete;
pub mod extract;
pub mod merge;
pub mod output;
pub mod page_numbers;
pub mod reorder;
pub mod rotate;
pub mod split;
pub mod watermark;

pub use compress::{compress_pdf, CompressionLevel, CompressionSummary};
pub use convert::{images_to_pdf, pdf_to_images};
pub use delete::delete_pages;
pub use extract::extract_pages;
pub use merge::merge_files;
pub use output::{group_filename, package, Output};
pub use page_numbers::{add_page_numbers, NumberFormat, NumberPosition, PageNumberOptions};
pub use reorder::reorder_pages;
pub use rotate::{rotate_pages, RotateOptions, RotationAngle};
pub use split::{split_pdf, SplitMode, SplitOptions};
pub use watermark::{add_watermark, WatermarkOptions, WatermarkPosition};

use thiserror::Error;

pub type OperationResult<T> = Result<T, OperationError>;

#[derive(Debug, Error)]
pub enum OperationError {
    /// The selection resolved to zero pages, or removing it would leave
    /// zero pages behind.
    #[error("selection is empty: {0}")]
    EmptySelection(String),

    /// A page index fell outside the document (index, page count).
    #[error("page index {0} out of bounds (document has {1} pages)")]
    PageIndexOutOfBounds(usize, usize),

    /// Rotation angle that is not a multiple of 90.
    #[error("invalid rotation angle: {0} (must be a multiple of 90)")]
    InvalidRotation(i32),

    /// The input could not be parsed as a PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Malformed or contradictory operation options.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The operation needs more input files than were provided.
    #[error("at least two input files are required")]
    NotEnoughInputs,

    /// A documented capability this build does not implement.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
