//! Booklend CLI - browse the library catalog, manage a cart and borrow books.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the password can also come from BOOKLEND_PASSWORD)
//! booklend login -e ann@library.test -p hunter22
//!
//! # Find a book and add it to the cart
//! booklend books list --category 3
//! booklend cart add 12
//!
//! # Select it and borrow everything selected for 5 days
//! booklend cart check 12
//! booklend checkout --days 5 --agree-return --agree-policy
//!
//! # See what is overdue
//! booklend loans --filter overdue
//! ```
//!
//! # Commands
//!
//! - `login`, `logout`, `register`, `whoami` - account
//! - `books`, `authors`, `categories` - catalog
//! - `reviews` - read and write reviews
//! - `cart` - the signed-in user's cart
//! - `checkout` - borrow the selected cart items
//! - `loans` - the signed-in user's loans

#![cfg_attr(not(test), forbid(unsafe_code))]

use booklend_client::config::ClientConfig;
use booklend_client::loans::LoanFilter;
use booklend_client::state::AppState;
use booklend_client::{ClientError, Result};
use booklend_core::{AuthorId, BookId, CategoryId, LoanDuration};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "booklend")]
#[command(author, version, about = "Library lending client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "BOOKLEND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session (the cart is kept)
    Logout,
    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Phone number (required, not sent to the library)
        #[arg(long)]
        phone: String,

        #[arg(short, long, env = "BOOKLEND_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "BOOKLEND_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Show the signed-in user's profile
    Whoami,
    /// Browse books
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// List authors, or one author's books
    Authors {
        /// Author to show books for
        #[arg(long)]
        id: Option<AuthorId>,
    },
    /// List categories
    Categories,
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Borrow every selected cart item
    Checkout {
        /// Loan duration in days (3, 5 or 10)
        #[arg(short, long, default_value = "3")]
        days: LoanDuration,

        /// Borrow date as YYYY-MM-DD (default: today)
        #[arg(long)]
        borrow_date: Option<NaiveDate>,

        /// Agree to return the books before the due date
        #[arg(long)]
        agree_return: bool,

        /// Accept the library borrowing policy
        #[arg(long)]
        agree_policy: bool,
    },
    /// List the signed-in user's loans
    Loans {
        /// all, active, returned or overdue
        #[arg(short, long, default_value = "all")]
        filter: LoanFilter,

        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[derive(Subcommand)]
enum BooksAction {
    /// List books, optionally in one category
    List {
        #[arg(short, long)]
        category: Option<CategoryId>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 8)]
        limit: u32,
    },
    /// Show one book with related books and reviews
    Show { id: BookId },
    /// Recommended books
    Recommend {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum ReviewsAction {
    /// Reviews for a book
    List {
        book: BookId,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Review a book
    Add {
        book: BookId,

        /// Rating from 1 to 5
        #[arg(short, long, default_value_t = 0)]
        star: u8,

        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Reviews written by the signed-in user
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    List,
    /// Add a book
    Add { id: BookId },
    /// Select a book for checkout
    Check { id: BookId },
    /// Deselect a book
    Uncheck { id: BookId },
    /// Select every book
    CheckAll,
    /// Deselect every book
    UncheckAll,
    /// Remove books
    Remove {
        #[arg(required = true)]
        ids: Vec<BookId>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "booklend_cli=info,booklend_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::debug!(error = %e, "Command failed");
        output::error(&e.user_message());
        // Flush Sentry before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let state = AppState::new(config).map_err(ClientError::Api)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(&state, email, password).await
        }
        Commands::Logout => commands::account::logout(&state),
        Commands::Register {
            name,
            email,
            phone,
            password,
            confirm_password,
        } => {
            commands::account::register(&state, name, email, phone, password, confirm_password)
                .await
        }
        Commands::Whoami => commands::account::whoami(&state).await,
        Commands::Books { action } => match action {
            BooksAction::List {
                category,
                page,
                limit,
            } => commands::catalog::list_books(&state, category, page, limit).await,
            BooksAction::Show { id } => commands::catalog::show_book(&state, id).await,
            BooksAction::Recommend { limit } => commands::catalog::recommend(&state, limit).await,
        },
        Commands::Authors { id } => commands::catalog::authors(&state, id).await,
        Commands::Categories => commands::catalog::categories(&state).await,
        Commands::Reviews { action } => match action {
            ReviewsAction::List { book, page, limit } => {
                commands::reviews::list(&state, book, page, limit).await
            }
            ReviewsAction::Add {
                book,
                star,
                comment,
            } => commands::reviews::add(&state, book, star, comment).await,
            ReviewsAction::Mine { page } => commands::reviews::mine(&state, page).await,
        },
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&state),
            CartAction::Add { id } => commands::cart::add(&state, id).await,
            CartAction::Check { id } => commands::cart::set_checked(&state, id, true),
            CartAction::Uncheck { id } => commands::cart::set_checked(&state, id, false),
            CartAction::CheckAll => commands::cart::set_checked_all(&state, true),
            CartAction::UncheckAll => commands::cart::set_checked_all(&state, false),
            CartAction::Remove { ids } => commands::cart::remove(&state, &ids),
        },
        Commands::Checkout {
            days,
            borrow_date,
            agree_return,
            agree_policy,
        } => {
            commands::checkout::run(&state, days, borrow_date, agree_return, agree_policy).await
        }
        Commands::Loans { filter, search } => commands::loans::list(&state, filter, &search).await,
    }
}
