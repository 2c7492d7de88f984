use csv::ReaderBuilder;
use serde::Deserialize;

use super::date::parse_date;
use crate::error::Result;
use crate::generator::html2md;
use crate::library::{Library, ReadBook, Shelf, ToReadBook};

/// The export columns we care about.
///
/// Every field is optional: a missing column, an empty cell and a row cut
/// short all read as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportRow {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Author")]
    author: Option<String>,
    #[serde(rename = "My Rating")]
    my_rating: Option<String>,
    #[serde(rename = "Number of Pages")]
    number_of_pages: Option<String>,
    #[serde(rename = "Year Published")]
    year_published: Option<String>,
    #[serde(rename = "Original Publication Year")]
    original_publication_year: Option<String>,
    #[serde(rename = "Date Read")]
    date_read: Option<String>,
    #[serde(rename = "Date Added")]
    date_added: Option<String>,
    #[serde(rename = "Read Count")]
    read_count: Option<String>,
    #[serde(rename = "Exclusive Shelf")]
    exclusive_shelf: Option<String>,
    #[serde(rename = "My Review")]
    my_review: Option<String>,
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

impl ExportRow {
    fn into_read_book<S: AsRef<str>>(self, date_formats: &[S]) -> Option<ReadBook> {
        let date_read = parse_date(field(&self.date_read), date_formats)
            .or_else(|| parse_date(field(&self.date_added), date_formats))?;
        Some(ReadBook {
            date_read,
            review: html2md::convert(field(&self.my_review)),
            title: or_default(self.title, "Unknown Title"),
            original_publication_year: or_default(self.original_publication_year, "Unknown"),
            author: or_default(self.author, "Unknown Author"),
            my_rating: or_default(self.my_rating, "Unrated"),
            number_of_pages: or_default(self.number_of_pages, "Unknown"),
            read_count: or_default(self.read_count, "1"),
        })
    }

    fn into_to_read_book<S: AsRef<str>>(self, date_formats: &[S]) -> Option<ToReadBook> {
        let date_added = parse_date(field(&self.date_added), date_formats)?;
        Some(ToReadBook {
            date_added,
            title: or_default(self.title, "Unknown Title"),
            year_published: or_default(self.year_published, "Unknown"),
            author: or_default(self.author, "Unknown Author"),
        })
    }
}

/// Read a CSV export into a sorted [`Library`].
///
/// Rows that fail to decode, or that lack a usable date, are skipped with a
/// warning. Only an unreadable header row is an error.
pub fn csv_to_library<S: AsRef<str>>(bytes: &[u8], date_formats: &[S]) -> Result<Library> {
    let _span = tracing::info_span!("csv_to_library", bytes = bytes.len()).entered();

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    // Surface header problems instead of skipping every row
    rdr.headers()?;

    let mut library = Library::default();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<ExportRow>() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                let line = err.position().map(|p| p.line());
                tracing::warn!(?line, error = %err, "Skipping malformed row");
                skipped += 1;
                continue;
            }
        };

        match Shelf::parse(field(&row.exclusive_shelf)) {
            Shelf::Read => {
                let title = field(&row.title).to_string();
                match row.into_read_book(date_formats) {
                    Some(book) => library.read.push(book),
                    None => {
                        tracing::warn!(%title, "Skipping read book without a usable date");
                        skipped += 1;
                    }
                }
            }
            Shelf::ToRead => {
                let title = field(&row.title).to_string();
                match row.into_to_read_book(date_formats) {
                    Some(book) => library.to_read.push(book),
                    None => {
                        tracing::warn!(%title, "Skipping to-read book without a usable date");
                        skipped += 1;
                    }
                }
            }
            Shelf::Other(shelf) => {
                tracing::debug!(%shelf, title = field(&row.title), "Ignoring book on other shelf");
            }
        }
    }

    library.sort();

    tracing::debug!(
        read = library.read.len(),
        to_read = library.to_read.len(),
        skipped,
        "CSV export loaded"
    );

    Ok(library)
}
