pub mod fares;
pub mod quotes;
pub mod sessions;
pub mod suggestions;
