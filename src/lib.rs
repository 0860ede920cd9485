//! # Postdeck
//!
//! A terminal-first, offline-first browser for a remote photo collection.
//!
//! ## Architecture
//!
//! Postdeck follows a cache-coherent paging pipeline feeding MVI screens:
//!
//! ```text
//! Remote → SyncMediator → Store → PagedView → Screens → TUI
//! ```
//!
//! - [`remote`]: HTTP source of item records
//! - [`sync`]: Atomic replace of the local cache with the remote set
//! - [`store`]: SQLite persistence with an invalidation generation
//! - [`paging`]: Lazily loaded pages over the cache
//! - [`screens`]: List and detail state machines
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch the collection into the local cache
//! postdeck sync
//!
//! # Print the first cached page
//! postdeck list
//!
//! # Show one item
//! postdeck show 1
//!
//! # Launch TUI
//! postdeck
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the remote source, the sync mediator and the repository.
pub mod app;

/// Command-line interface using clap.
///
/// - `sync` - Reconcile the cache once
/// - `list [--page N]` - Print cached items
/// - `show <id>` - Print one cached item
/// - `tui` - Launch the TUI (default)
pub mod cli;

/// Configuration loaded from `~/.config/postdeck/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Item`](domain::Item): A cached item
/// - [`RemoteRecord`](domain::RemoteRecord): Wire shape of a remote item
/// - [`Outcome`](domain::Outcome): Loading/success/error result of a read
pub mod domain;

/// MVI primitives: state cell, effect queue, screen scope.
pub mod mvi;

/// Paged reads over the cache.
pub mod paging;

/// Remote item source.
///
/// - [`RemoteSource`](remote::RemoteSource): Async trait for listing items
/// - [`HttpRemoteSource`](remote::HttpRemoteSource): reqwest-based implementation
pub mod remote;

/// Read contracts used by the screens.
pub mod repository;

/// List and detail screen state machines.
pub mod screens;

/// SQLite persistence layer.
///
/// - [`ItemStore`](store::ItemStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Remote-to-cache reconciliation.
pub mod sync;

/// Terminal user interface.
///
/// A list view and a detail view driven by the screen state machines.
///
/// Keybindings: j/k navigate, Enter opens, Esc goes back, r retries,
/// R refreshes, o opens the image, q quits.
pub mod tui;
