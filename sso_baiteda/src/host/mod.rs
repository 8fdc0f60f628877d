mod errors;
mod memory;
mod sqlite;
mod traits;
mod types;

pub use errors::{StoreError, UserError};
pub use memory::MemoryHost;
pub use sqlite::SqliteHost;
pub use traits::{ObjectStore, SessionStore, SettingsProvider, UserRepository};
pub use types::{NewUser, SessionRecord, SsoSettings, Toggle, Uid};
