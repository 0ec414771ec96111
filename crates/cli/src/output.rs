//! Terminal rendering for command results.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use booklend_client::api::{
    Author, AuthorBooks, Book, BookReviews, Category, MyReviews, Pagination, Profile,
};
use booklend_client::cart::CartSummary;
use booklend_client::checkout::format_date;
use booklend_client::loans::LoanRow;
use booklend_client::notice::{Notice, NoticeLevel};
use booklend_core::CartItem;

pub fn notice(notice: &Notice) {
    let marker = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "!!",
        NoticeLevel::Error => "xx",
    };
    println!("[{marker}] {notice}");
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

pub fn line(text: &str) {
    println!("{text}");
}

fn pagination(page: &Pagination) {
    if page.total_pages > 1 {
        println!("-- page {} of {} ({} total)", page.page, page.total_pages, page.total);
    }
}

// =============================================================================
// Catalog
// =============================================================================

pub fn book_row(book: &Book) {
    let author = book.author.as_ref().map_or("", |a| a.name.as_str());
    let availability = if book.is_available() {
        format!("{} available", book.available_copies)
    } else {
        "unavailable".to_string()
    };
    println!(
        "{:>5}  {}  by {}  ({:.1}*, {availability})",
        book.id, book.title, author, book.rating
    );
}

pub fn books(books: &[Book], page: Option<&Pagination>) {
    if books.is_empty() {
        println!("No books found");
        return;
    }
    for book in books {
        book_row(book);
    }
    if let Some(page) = page {
        pagination(page);
    }
}

pub fn book_detail(book: &Book) {
    println!("{} (#{})", book.title, book.id);
    if let Some(author) = &book.author {
        println!("Author:    {}", author.name);
    }
    if let Some(category) = &book.category {
        println!("Category:  {}", category.name);
    }
    if let Some(year) = book.published_year {
        println!("Published: {year}");
    }
    if !book.isbn.is_empty() {
        println!("ISBN:      {}", book.isbn);
    }
    println!(
        "Rating:    {:.1} ({} reviews)",
        book.rating, book.review_count
    );
    println!(
        "Copies:    {} of {} available",
        book.available_copies, book.total_copies
    );
    if !book.description.is_empty() {
        println!();
        println!("{}", book.description);
    }
}

pub fn authors(authors: &[Author]) {
    for author in authors {
        println!("{:>5}  {}", author.id, author.name);
    }
}

pub fn author_books(author: &AuthorBooks) {
    println!("{} (#{})", author.author.name, author.author.id);
    if !author.author.bio.is_empty() {
        println!("{}", author.author.bio);
    }
    println!();
    for book in &author.books {
        println!("{:>5}  {}", book.id, book.title);
    }
}

pub fn categories(categories: &[Category]) {
    for category in categories {
        println!("{:>5}  {}", category.id, category.name);
    }
}

// =============================================================================
// Reviews
// =============================================================================

pub fn reviews(reviews: &BookReviews) {
    if reviews.reviews.is_empty() {
        println!("No reviews yet");
        return;
    }
    for review in &reviews.reviews {
        let name = review.user.as_ref().map_or("Anonymous", |u| u.name.as_str());
        let date = review
            .created_at
            .map(|at| format_date(at.date_naive()))
            .unwrap_or_default();
        println!("{}  {name}  {date}", stars(review.star));
        if !review.comment.is_empty() {
            println!("    {}", review.comment);
        }
    }
    pagination(&reviews.pagination);
}

pub fn my_reviews(reviews: &MyReviews) {
    if reviews.reviews.is_empty() {
        println!("You have not reviewed any books");
        return;
    }
    for review in &reviews.reviews {
        println!("{}  {}", stars(review.star), review.book.title);
        if !review.comment.is_empty() {
            println!("    {}", review.comment);
        }
    }
    pagination(&reviews.pagination);
}

fn stars(star: u8) -> String {
    let star = usize::from(star.min(5));
    format!("{}{}", "*".repeat(star), ".".repeat(5 - star))
}

// =============================================================================
// Account, Cart & Loans
// =============================================================================

pub fn profile(profile: &Profile) {
    println!("{} <{}>", profile.name, profile.email);
    if let Some(phone) = &profile.phone {
        println!("Phone: {phone}");
    }
    if !profile.role.is_empty() {
        println!("Role:  {}", profile.role);
    }
}

pub fn cart(items: &[CartItem], summary: CartSummary) {
    if items.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in items {
        let mark = if item.is_checked { "x" } else { " " };
        let title = if item.title.is_empty() {
            format!("Book #{}", item.id)
        } else {
            item.title.clone()
        };
        println!("[{mark}] {:>5}  {title}  {}", item.id, item.author_name);
    }
    println!(
        "-- {} selected of {}{}",
        summary.selected,
        summary.items,
        if summary.all_checked { " (all)" } else { "" }
    );
}

pub fn loans(rows: &[LoanRow]) {
    if rows.is_empty() {
        println!("No loans found");
        return;
    }
    for row in rows {
        println!(
            "{:<9} {}  borrowed {}  due {}",
            row.status.to_string(),
            row.loan.book.title,
            format_date(row.loan.borrowed_at.date_naive()),
            format_date(row.loan.due_at.date_naive()),
        );
    }
}
