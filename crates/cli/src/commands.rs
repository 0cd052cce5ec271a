// FILE: crates/cli/src/commands.rs

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use readstack_api::{build_router, AppState};
use readstack_config::Config;
use readstack_core::{BookId, BookStatus};
use readstack_database::{connect, optimize, run_migrations, verify_integrity, DatabaseConfig};
use readstack_library::{LibraryManager, NewBook};
use readstack_metadata::{GoogleBooksClient, GoogleBooksConfig, MetadataSource, SearchQuery};
use std::time::Duration;

async fn open_library(config: &Config) -> Result<LibraryManager> {
    let db_config = DatabaseConfig::new(&config.database.path)
        .with_max_connections(config.database.max_connections);
    let pool = connect(&db_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;
    Ok(LibraryManager::with_pool(
        pool,
        config.library.popular_genre_threshold,
    ))
}

fn metadata_client(config: &Config) -> Option<GoogleBooksClient> {
    if !config.metadata.enabled {
        return None;
    }
    Some(GoogleBooksClient::with_config(GoogleBooksConfig {
        base_url: config.metadata.base_url.clone(),
        api_key: config.metadata.api_key.clone(),
        timeout: Duration::from_secs(config.metadata.timeout_secs),
    }))
}

/// Run the REST API server until interrupted
pub async fn serve(config: Config) -> Result<()> {
    let manager = open_library(&config).await?;
    let metadata = metadata_client(&config);
    let state = AppState::new(manager, metadata);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    println!("Listening on http://{}", config.server.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;
    Ok(())
}

/// Initialize and check the database
pub async fn init(config: Config) -> Result<()> {
    let db_config = DatabaseConfig::new(&config.database.path);
    let pool = connect(&db_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;
    verify_integrity(&pool)
        .await
        .context("Database integrity check failed")?;
    optimize(&pool).await.context("Failed to optimize database")?;

    println!("Database initialized at {}", config.database.path);
    Ok(())
}

/// List books, optionally filtered by status
pub async fn list_books(config: Config, matches: &ArgMatches) -> Result<()> {
    let manager = open_library(&config).await?;
    let status_filter = matches
        .get_one::<String>("status")
        .and_then(|s| BookStatus::from_str(s));

    let books = manager.list_books().await?;
    let mut shown = 0;
    for book in books {
        if let Some(status) = status_filter {
            if book.status != status {
                continue;
            }
        }
        shown += 1;
        let pages = match book.total_pages {
            Some(total) => format!("{}/{}", book.current_page, total),
            None => format!("{}/?", book.current_page),
        };
        println!("{}  [{}] {} ({})", book.id, book.status, book.title, pages);
    }

    if shown == 0 {
        println!("No books found");
    }
    Ok(())
}

/// Add a book to the library
pub async fn add_book(config: Config, matches: &ArgMatches) -> Result<()> {
    let manager = open_library(&config).await?;

    let title = matches
        .get_one::<String>("title")
        .ok_or_else(|| anyhow!("Title is required"))?;
    let mut request = NewBook::titled(title);
    if let Some(pages) = matches.get_one::<String>("pages") {
        request.total_pages = Some(pages.parse().context("Invalid page count")?);
    }
    request.isbn = matches.get_one::<String>("isbn").cloned();

    let book = manager.create_book(request).await?;
    println!("Added '{}' ({})", book.title, book.id);
    Ok(())
}

/// Report reading progress
pub async fn report_progress(config: Config, matches: &ArgMatches) -> Result<()> {
    let manager = open_library(&config).await?;

    let id = parse_book_id(matches)?;
    let page: u32 = matches
        .get_one::<String>("page")
        .ok_or_else(|| anyhow!("Page is required"))?
        .parse()
        .context("Invalid page number")?;

    let book = manager.update_progress(id, page).await?;
    match book.completion_percentage {
        Some(pct) => println!(
            "'{}' is now [{}] at page {} ({:.1}%)",
            book.title, book.status, book.current_page, pct
        ),
        None => println!(
            "'{}' is now [{}] at page {}",
            book.title, book.status, book.current_page
        ),
    }
    Ok(())
}

/// Set a book's status directly
pub async fn set_status(config: Config, matches: &ArgMatches) -> Result<()> {
    let manager = open_library(&config).await?;

    let id = parse_book_id(matches)?;
    let status = matches
        .get_one::<String>("status")
        .and_then(|s| BookStatus::from_str(s))
        .ok_or_else(|| anyhow!("Invalid status"))?;

    let book = manager.change_status(id, status).await?;
    println!("'{}' is now [{}]", book.title, book.status);
    Ok(())
}

/// Print dashboard statistics
pub async fn show_stats(config: Config) -> Result<()> {
    let manager = open_library(&config).await?;

    let summary = manager.dashboard().await?;
    println!("Books:           {}", summary.total_books);
    println!("  reading:       {}", summary.status_counts.reading);
    println!("  finished:      {}", summary.status_counts.finished);
    println!("  wishlist:      {}", summary.status_counts.wishlist);
    println!("  abandoned:     {}", summary.status_counts.abandoned);
    println!("  on hold:       {}", summary.status_counts.on_hold);
    println!("Completion rate: {:.1}%", summary.completion_rate);
    match summary.average_total_pages {
        Some(avg) => println!("Average length:  {:.1} pages", avg),
        None => println!("Average length:  n/a"),
    }
    match summary.pages_per_day {
        Some(pace) => println!("Reading pace:    {:.1} pages/day", pace),
        None => println!("Reading pace:    n/a"),
    }

    let years = manager.yearly_history().await?;
    if !years.is_empty() {
        println!("Finished by year:");
        for entry in years {
            println!("  {}: {}", entry.year, entry.books_finished);
        }
    }

    let genres = manager.genre_popularity().await?;
    if !genres.is_empty() {
        println!("Genres:");
        for entry in genres.iter().take(10) {
            println!("  {} ({})", entry.name, entry.book_count);
        }
    }
    Ok(())
}

/// Export every book projection as pretty-printed JSON
pub async fn export_library(config: Config, matches: &ArgMatches) -> Result<()> {
    let manager = open_library(&config).await?;

    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("library_export.json");

    let books = manager.list_books().await?;
    let json = serde_json::to_string_pretty(&books).context("Failed to serialize library")?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write export to {}", output))?;

    println!("Exported {} books to {}", books.len(), output);
    Ok(())
}

/// Search the external metadata provider
pub async fn lookup(config: Config, matches: &ArgMatches) -> Result<()> {
    let client =
        metadata_client(&config).ok_or_else(|| anyhow!("Metadata lookup is disabled in config"))?;

    let query_text = matches
        .get_one::<String>("query")
        .ok_or_else(|| anyhow!("Query is required"))?;
    let limit: usize = matches
        .get_one::<String>("limit")
        .map(|s| s.as_str())
        .unwrap_or("5")
        .parse()
        .context("Invalid limit")?;

    let drafts = client
        .search(&SearchQuery::new(query_text).with_limit(limit))
        .await?;

    if drafts.is_empty() {
        println!("No results");
        return Ok(());
    }
    for draft in drafts {
        let authors = if draft.authors.is_empty() {
            "unknown".to_string()
        } else {
            draft.authors.join(", ")
        };
        let year = draft
            .published_date
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_else(|| "n.d.".to_string());
        println!("{}  {} - {} ({})", draft.source_id, draft.title, authors, year);
    }
    Ok(())
}

fn parse_book_id(matches: &ArgMatches) -> Result<BookId> {
    let raw = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("Book ID is required"))?;
    BookId::from_string(raw).map_err(|_| anyhow!("'{}' is not a valid book ID", raw))
}
