use crate::library::ToReadBook;

/// Render the reading list, one bullet per book, in the order given.
pub fn run(books: &[ToReadBook]) -> String {
    let mut markdown = String::new();
    for book in books {
        markdown.push_str(&format!(
            "- [[{}]] {} ({}) - {}\n",
            book.date_added.format("%Y-%m-%d"),
            book.title,
            book.year_published,
            book.author
        ));
    }
    markdown
}
