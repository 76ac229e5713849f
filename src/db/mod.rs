pub mod watchlist;

pub use watchlist::FileWatchlistRepository;
pub use watchlist::WatchlistRepository;
