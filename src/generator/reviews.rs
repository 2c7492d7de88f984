use crate::library::ReadBook;

/// Render the review log.
///
/// Books are grouped under a `## {year}` heading per year, years in order of
/// first appearance, books in the order given.
pub fn run(books: &[ReadBook]) -> String {
    let mut years: Vec<(i32, Vec<&ReadBook>)> = Vec::new();
    for book in books {
        let year = book.year();
        match years.iter_mut().find(|(y, _)| *y == year) {
            Some((_, group)) => group.push(book),
            None => years.push((year, vec![book])),
        }
    }

    let mut markdown = String::new();
    for (year, group) in years {
        markdown.push_str(&format!("## {year}\n\n"));
        for book in group {
            push_entry(&mut markdown, book);
        }
    }
    markdown
}

fn push_entry(markdown: &mut String, book: &ReadBook) {
    markdown.push_str(&format!(
        "### {} ({})\n\n{}\n\n",
        book.title, book.original_publication_year, book.author
    ));
    markdown.push_str(&format!("- Completed: {}\n", book.date_read.format("%Y-%m-%d")));
    markdown.push_str(&format!("- My Rating: {}\n", book.my_rating));
    markdown.push_str(&format!("- Number of Pages: {}\n", book.number_of_pages));
    markdown.push_str(&format!("- Reads: {}\n\n", book.read_count));
    markdown.push_str(&book.review);
    markdown.push_str("\n\n---\n\n");
}
