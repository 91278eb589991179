mod controller;

pub use controller::{FeedAdvance, FeedError, QuoteFeedController};
