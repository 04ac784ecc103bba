pub mod config;
pub mod constants;
pub mod error;
pub mod list;
pub mod schedule;
pub mod store;
pub mod sync;
pub mod topic;
pub mod wizard;

pub use config::CoreConfig;
pub use error::{ListError, StoreError};
pub use store::StateStore;
pub use sync::SyncPlan;
pub use topic::TopicKey;
pub use wizard::{EditAction, WizardState, WizardTable};
