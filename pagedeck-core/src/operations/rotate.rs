//! Page rotation in quarter-turn increments.

use tracing::debug;

use crate::document::{PagePick, PdfFile};
use crate::operations::{OperationError, OperationResult};
use crate::pagespec::PageSpec;

/// A rotation restricted to multiples of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAngle {
    Quarter,
    Half,
    ThreeQuarters,
}

impl RotationAngle {
    /// Accepts any multiple of 90, including negatives and values beyond a
    /// full turn; everything is normalized first. A multiple of 360 is not
    /// a rotation and is rejected like any other invalid angle.
    pub fn from_degrees(degrees: i32) -> OperationResult<Self> {
        match degrees.rem_euclid(360) {
            90 => Ok(Self::Quarter),
            180 => Ok(Self::Half),
            270 => Ok(Self::ThreeQuarters),
            _ => Err(OperationError::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarters => 270,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotateOptions {
    /// Which pages to rotate; "all" rotates the whole document.
    pub pages: PageSpec,
    pub angle: RotationAngle,
}

/// Rotate the selected pages, keeping every page of the document.
///
/// Rotation is additive over each page's existing /Rotate value. Pages
/// outside the selection are copied unchanged.
pub fn rotate_pages(file: &PdfFile, options: &RotateOptions) -> OperationResult<PdfFile> {
    let total = file.page_count();
    let targets = options.pages.indices(total);
    if targets.is_empty() {
        return Err(OperationError::EmptySelection(
            "no valid pages to rotate".to_string(),
        ));
    }
    debug!(
        pages = targets.len(),
        degrees = options.angle.degrees(),
        "rotating pages"
    );

    let degrees = options.angle.degrees();
    let picks: Vec<PagePick> = (0..total)
        .map(|index| {
            if targets.contains(&index) {
                PagePick::rotated(index, degrees)
            } else {
                PagePick::copy(index)
            }
        })
        .collect();
    file.assemble(&picks)
}
