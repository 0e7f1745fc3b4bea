//! Services: feed download, record parsing and sink delivery.

pub mod fetcher;
pub mod message;
pub mod parser;
pub mod sink;

pub use fetcher::FeedFetcher;
pub use parser::{MIN_FIELDS, ParseWarning, parse_snapshot};
pub use sink::{DiscordWebhookSink, NotificationSink};
