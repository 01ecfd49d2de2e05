//! Deciding the shape of a multi-document result.

use crate::document::PdfFile;
use crate::operations::{OperationError, OperationResult};

/// What a splitting operation hands back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Exactly one document came out; serve it directly as a PDF.
    Single { filename: String, bytes: Vec<u8> },
    /// Several documents; the transport packs them into one archive.
    Archive {
        filename: String,
        entries: Vec<(String, Vec<u8>)>,
    },
}

/// Filename for one output group of 0-based page indices.
pub fn group_filename(indices: &[usize]) -> String {
    match indices {
        [] => "pages.pdf".to_string(),
        [only] => format!("page-{}.pdf", only + 1),
        [first, .., last] => format!("pages-{}-{}.pdf", first + 1, last + 1),
    }
}

/// Serialize `parts` and decide between a single PDF and an archive.
///
/// One part becomes `<stem>.pdf` regardless of the part's own name; more
/// become entries of `<stem>.zip` under their group names.
pub fn package(stem: &str, parts: Vec<(String, PdfFile)>) -> OperationResult<Output> {
    if parts.is_empty() {
        return Err(OperationError::EmptySelection(
            "nothing to package".to_string(),
        ));
    }

    let mut serialized = Vec::with_capacity(parts.len());
    for (name, mut part) in parts {
        serialized.push((name, part.to_bytes()?));
    }

    if serialized.len() == 1 {
        let (_, bytes) = serialized.pop().unwrap_or_default();
        return Ok(Output::Single {
            filename: format!("{stem}.pdf"),
            bytes,
        });
    }
    Ok(Output::Archive {
        filename: format!("{stem}.zip"),
        entries: serialized,
    })
}
