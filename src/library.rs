use chrono::{Datelike, NaiveDate};

/// Exclusive shelf a book sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shelf {
    Read,
    ToRead,
    Other(String),
}

impl Shelf {
    /// Case and surrounding whitespace are ignored.
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "read" => Shelf::Read,
            "to-read" => Shelf::ToRead,
            _ => Shelf::Other(normalized),
        }
    }
}

/// A finished book, ready for the review log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadBook {
    pub date_read: NaiveDate,
    pub title: String,
    pub original_publication_year: String,
    pub author: String,
    pub my_rating: String,
    pub number_of_pages: String,
    pub read_count: String,
    /// Markdown.
    pub review: String,
}

impl ReadBook {
    pub fn year(&self) -> i32 {
        self.date_read.year()
    }
}

/// A book waiting on the reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToReadBook {
    pub date_added: NaiveDate,
    pub title: String,
    pub year_published: String,
    pub author: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Library {
    pub read: Vec<ReadBook>,
    pub to_read: Vec<ToReadBook>,
}

impl Library {
    /// Most recent first. Books sharing a date keep their export order.
    pub fn sort(&mut self) {
        self.read.sort_by(|a, b| b.date_read.cmp(&a.date_read));
        self.to_read.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    }
}
