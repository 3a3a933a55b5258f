pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod events;
pub mod extractor;
pub mod metrics;
pub mod notify;
pub mod search;
pub mod testing;
pub mod wizard;

pub use catalog::{Catalog, CatalogEntry, CatalogError, CatalogStore, InMemoryStore, JsonFileStore};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use dispatcher::Dispatcher;
pub use events::{
    create_event_loop, DispatchOutcome, EventHandle, EventLoop, EventLoopError, InboundEvent,
};
pub use extractor::{ExtractorConfig, ExtractorError, FeedPost, FieldExtractor};
pub use notify::{create_notifier, LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use search::{search, SearchResult};
pub use wizard::{SessionRegistry, Wizard, WizardError};
