use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagedeck::operations::{
    add_page_numbers, add_watermark, compress_pdf, delete_pages, extract_pages, images_to_pdf,
    merge_files, reorder_pages, rotate_pages, split_pdf, CompressionLevel, NumberFormat,
    NumberPosition, PageNumberOptions, RotateOptions, RotationAngle, SplitMode, SplitOptions,
    WatermarkOptions, WatermarkPosition,
};
use pagedeck::{PageRange, PageSpec, PdfFile};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pagedeck",
    about = "Page-level PDF operations: split, merge, rotate, stamp",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and per-page rotation of a PDF
    Info {
        /// Input PDF file
        input: PathBuf,
    },

    /// Merge multiple PDFs into one
    Merge {
        /// Input PDF files (at least two)
        files: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a PDF into multiple files
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output directory for the parts
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Page specification, one output per page (e.g. "1,3,5-7", "all")
        #[arg(short, long)]
        pages: Option<String>,

        /// JSON range list, one output per range
        /// (e.g. '[{"from":1,"to":3},{"from":7,"to":9}]')
        #[arg(short, long, conflicts_with = "pages")]
        ranges: Option<String>,

        /// Concatenate all parts into a single output
        #[arg(short, long)]
        merge: bool,
    },

    /// Delete pages from a PDF
    Delete {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to delete (e.g. "2,4", "5-9")
        #[arg(short, long)]
        pages: String,
    },

    /// Extract pages into a new PDF
    Extract {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to extract (e.g. "1,3,5-7", "all")
        #[arg(short, long)]
        pages: String,
    },

    /// Reorder pages by an explicit sequence
    Reorder {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// New page order (e.g. "3,1,2"; repeats duplicate, omissions drop)
        #[arg(long)]
        order: String,
    },

    /// Rotate pages in a PDF
    Rotate {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Rotation angle (90, 180, 270)
        #[arg(short, long, default_value = "90")]
        angle: i32,

        /// Pages to rotate (e.g. "all", "1,3,5", "2-6")
        #[arg(short = 'p', long, default_value = "all")]
        pages: String,
    },

    /// Stamp a text watermark over every page
    Watermark {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Watermark text
        #[arg(short, long)]
        text: String,

        /// Placement: center, diagonal or tiled
        #[arg(long, default_value = "diagonal")]
        position: String,

        /// Opacity percentage (10-100)
        #[arg(long, default_value = "30")]
        opacity: u8,
    },

    /// Stamp page numbers onto every page
    PageNumbers {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Position: top/bottom x left/center/right (e.g. "bottom-center")
        #[arg(long, default_value = "bottom-center")]
        position: String,

        /// Numeral format: arabic, roman, roman-upper, alpha, alpha-upper
        #[arg(long, default_value = "arabic")]
        format: String,

        /// Number assigned to the first page
        #[arg(long, default_value = "1")]
        start: u32,
    },

    /// Re-save a PDF with compression
    Compress {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Compression level: low, medium or high
        #[arg(short, long, default_value = "medium")]
        level: String,
    },

    /// Build a PDF from raster images, one page per image
    ImagesToPdf {
        /// Input image files
        images: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => {
            let file = load(&input)?;
            println!("{}: {} pages", input.display(), file.page_count());
            for index in 0..file.page_count() {
                let rotation = file.page_rotation(index);
                if rotation != 0 {
                    println!("  page {}: rotated {}°", index + 1, rotation);
                }
            }
        }

        Commands::Merge { files, output } => {
            let mut inputs = Vec::with_capacity(files.len());
            for path in &files {
                inputs.push(load(path)?);
            }
            let mut merged = merge_files(inputs)?;
            save(&mut merged, &output)?;
            println!("Merged {} files into {}", files.len(), output.display());
        }

        Commands::Split {
            input,
            output_dir,
            pages,
            ranges,
            merge,
        } => {
            let file = load(&input)?;
            let mode = match ranges {
                Some(raw) => {
                    let ranges: Vec<PageRange> =
                        serde_json::from_str(&raw).context("malformed --ranges JSON")?;
                    SplitMode::Ranges(ranges)
                }
                None => SplitMode::Pages(PageSpec::parse(pages.as_deref().unwrap_or("all"))),
            };
            let parts = split_pdf(&file, &SplitOptions { mode, merge })?;

            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("cannot create {}", output_dir.display()))?;
            let count = parts.len();
            for (name, mut part) in parts {
                save(&mut part, &output_dir.join(&name))?;
            }
            println!("Wrote {} files to {}", count, output_dir.display());
        }

        Commands::Delete {
            input,
            output,
            pages,
        } => {
            let file = load(&input)?;
            let mut out = delete_pages(&file, &PageSpec::parse(&pages))?;
            save(&mut out, &output)?;
            println!(
                "Deleted pages, {} remain in {}",
                out.page_count(),
                output.display()
            );
        }

        Commands::Extract {
            input,
            output,
            pages,
        } => {
            let file = load(&input)?;
            let mut out = extract_pages(&file, &PageSpec::parse(&pages))?;
            save(&mut out, &output)?;
            println!(
                "Extracted {} pages into {}",
                out.page_count(),
                output.display()
            );
        }

        Commands::Reorder {
            input,
            output,
            order,
        } => {
            let file = load(&input)?;
            let mut out = reorder_pages(&file, &PageSpec::parse(&order))?;
            save(&mut out, &output)?;
            println!("Reordered into {}", output.display());
        }

        Commands::Rotate {
            input,
            output,
            angle,
            pages,
        } => {
            let file = load(&input)?;
            let options = RotateOptions {
                pages: PageSpec::parse(&pages),
                angle: RotationAngle::from_degrees(angle)?,
            };
            let mut out = rotate_pages(&file, &options)?;
            save(&mut out, &output)?;
            println!("Rotated pages by {}° into {}", angle, output.display());
        }

        Commands::Watermark {
            input,
            output,
            text,
            position,
            opacity,
        } => {
            let mut file = load(&input)?;
            let options = WatermarkOptions {
                text,
                position: WatermarkPosition::parse(&position),
                opacity,
                ..WatermarkOptions::default()
            };
            add_watermark(&mut file, &options)?;
            save(&mut file, &output)?;
            println!("Watermarked into {}", output.display());
        }

        Commands::PageNumbers {
            input,
            output,
            position,
            format,
            start,
        } => {
            let mut file = load(&input)?;
            let options = PageNumberOptions {
                position: NumberPosition::parse(&position),
                format: NumberFormat::parse(&format),
                start_at: start,
                ..PageNumberOptions::default()
            };
            add_page_numbers(&mut file, &options)?;
            save(&mut file, &output)?;
            println!("Numbered pages into {}", output.display());
        }

        Commands::Compress {
            input,
            output,
            level,
        } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            let (out, summary) = compress_pdf(&bytes, CompressionLevel::parse(&level))?;
            std::fs::write(&output, out)
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!(
                "Compressed {} -> {} bytes ({}% saved) into {}",
                summary.original_size,
                summary.compressed_size,
                summary.ratio_percent(),
                output.display()
            );
        }

        Commands::ImagesToPdf { images, output } => {
            let mut inputs = Vec::with_capacity(images.len());
            for path in &images {
                inputs.push(
                    std::fs::read(path)
                        .with_context(|| format!("cannot read {}", path.display()))?,
                );
            }
            let mut file = images_to_pdf(&inputs)?;
            save(&mut file, &output)?;
            println!(
                "Converted {} images into {}",
                file.page_count(),
                output.display()
            );
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<PdfFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    PdfFile::from_bytes(&bytes).with_context(|| format!("cannot parse {}", path.display()))
}

fn save(file: &mut PdfFile, path: &Path) -> Result<()> {
    let bytes = file.to_bytes()?;
    std::fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))
}
