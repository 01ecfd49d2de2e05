//! Whole-document compression.

use std::fmt;

use tracing::debug;

use crate::document::PdfFile;
use crate::operations::OperationResult;

/// How aggressively to rewrite the document.
///
/// Low only deflates content streams. Medium additionally prunes objects
/// that are no longer reachable from the catalog. High also drops the
/// document information dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionLevel {
    /// Lenient parse; anything unrecognized falls back to Medium.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Byte counts before and after compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSummary {
    pub original_size: usize,
    pub compressed_size: usize,
}

impl CompressionSummary {
    /// Percentage saved relative to the original, 0 when the rewrite grew
    /// the file.
    pub fn ratio_percent(&self) -> u32 {
        if self.original_size == 0 || self.compressed_size >= self.original_size {
            return 0;
        }
        let saved = self.original_size - self.compressed_size;
        (saved * 100 / self.original_size) as u32
    }
}

/// Re-serialize `bytes` at the given level and report the size change.
pub fn compress_pdf(
    bytes: &[u8],
    level: CompressionLevel,
) -> OperationResult<(Vec<u8>, CompressionSummary)> {
    let mut file = PdfFile::from_bytes(bytes)?;
    match level {
        CompressionLevel::Low => file.compress_streams(),
        CompressionLevel::Medium => file.repack(),
        CompressionLevel::High => {
            file.strip_info();
            file.repack();
        }
    }

    let out = file.to_bytes()?;
    let summary = CompressionSummary {
        original_size: bytes.len(),
        compressed_size: out.len(),
    };
    debug!(
        %level,
        original = summary.original_size,
        compressed = summary.compressed_size,
        "compressed document"
    );
    Ok((out, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_pdf_bytes;
    use pretty_assertions::assert_eq;

    #[test]
    fn level_parsing_is_lenient() {
        assert_eq!(CompressionLevel::parse("low"), CompressionLevel::Low);
        assert_eq!(CompressionLevel::parse(" HIGH "), CompressionLevel::High);
        assert_eq!(CompressionLevel::parse("medium"), CompressionLevel::Medium);
        assert_eq!(CompressionLevel::parse("maximum"), CompressionLevel::Medium);
        assert_eq!(CompressionLevel::parse(""), CompressionLevel::Medium);
    }

    #[test]
    fn output_is_a_loadable_pdf_with_all_pages() {
        let bytes = sample_pdf_bytes(4);
        let (out, summary) = compress_pdf(&bytes, CompressionLevel::High).unwrap();

        assert_eq!(summary.original_size, bytes.len());
        assert_eq!(summary.compressed_size, out.len());
        let reloaded = PdfFile::from_bytes(&out).unwrap();
        assert_eq!(reloaded.page_count(), 4);
    }

    #[test]
    fn ratio_is_zero_when_output_grew() {
        let summary = CompressionSummary {
            original_size: 100,
            compressed_size: 120,
        };
        assert_eq!(summary.ratio_percent(), 0);

        let summary = CompressionSummary {
            original_size: 200,
            compressed_size: 150,
        };
        assert_eq!(summary.ratio_percent(), 25);
    }
}
