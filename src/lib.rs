//! Turn a book-tracking CSV export into a Markdown review log and reading list.
//!
//! ```no_run
//! use shelf2md::converter::date::DEFAULT_DATE_FORMATS;
//!
//! let export = shelf2md::convert_from_path("data.csv", DEFAULT_DATE_FORMATS).unwrap();
//! shelf2md::write_export(&export, "reviews.md", "list.md").unwrap();
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod generator;
pub mod library;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};

pub struct ExportFile {
    pub file_path: Option<PathBuf>,
    pub file_stream: Vec<u8>,
}

/// Both rendered documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub reviews: String,
    pub list: String,
    pub read_books: usize,
    pub to_read_books: usize,
}

// byte_stream -> Export
pub fn convert<S: AsRef<str>>(file: &ExportFile, date_formats: &[S]) -> Result<Export> {
    let _span = tracing::info_span!("convert", path = ?file.file_path).entered();

    let library = converter::csv2library::csv_to_library(&file.file_stream, date_formats)?;

    Ok(Export {
        reviews: generator::reviews::run(&library.read),
        list: generator::list::run(&library.to_read),
        read_books: library.read.len(),
        to_read_books: library.to_read.len(),
    })
}

pub fn convert_from_path<S: AsRef<str>>(
    file_path: impl AsRef<Path>,
    date_formats: &[S],
) -> Result<Export> {
    let file_path = file_path.as_ref();
    let file_stream = std::fs::read(file_path).map_err(|e| Error::io(file_path, e))?;

    let file = ExportFile {
        file_path: Some(file_path.to_path_buf()),
        file_stream,
    };

    convert(&file, date_formats)
}

/// Write both documents, creating parent directories as needed.
pub fn write_export(
    export: &Export,
    reviews_path: impl AsRef<Path>,
    list_path: impl AsRef<Path>,
) -> Result<()> {
    write_document(reviews_path.as_ref(), &export.reviews)?;
    write_document(list_path.as_ref(), &export.list)
}

fn write_document(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, markdown).map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = markdown.len(), "Wrote document");
    Ok(())
}
