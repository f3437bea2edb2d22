mod profile;
mod save_store;
mod trade;

pub use profile::{CandyType, Character, PersistentProfile, UpgradeId};
pub use save_store::{ProfileError, SaveStore, DEFAULT_SLOT};
pub use trade::{DeclineReason, TradeOutcome, UpgradeOffer};
