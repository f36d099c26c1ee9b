//! Notifier module
//!
//! Best-effort, asynchronous publication of contact creation events.

mod config;
mod error;
mod transport;
mod worker;

pub use config::NotifierConfig;
pub use error::NotifyError;
pub use transport::{EventTransport, HttpTransport, EVENT_TYPE_HEADER};
pub use worker::{EventNotifier, NotifierStats, StatsSnapshot};
