pub mod backend;
pub mod config;
pub mod error;
pub mod ids;
pub mod seed;
pub mod source;
pub mod store;
pub mod types;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use config::{Config, ConfigPaths, LevelPolicy, StorageConfig, TrustConfig};
pub use error::VouchError;
pub use ids::{BusinessId, OpinionId, UserId};
pub use source::{ConnectionState, DataSource, DataSourceKind};
pub use store::RecordStore;
pub use types::{Business, BusinessDraft, Opinion, OpinionDraft, OpinionStatus, OpinionType};
