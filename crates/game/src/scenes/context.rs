use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::economy::{PersistentProfile, ProfileError, SaveStore, TradeOutcome};

/// State shared by every scene: the save store, the one live profile and
/// the RNG scenes draw from when they are built. Profile changes go through
/// [`SceneContext::transact`] or [`SceneContext::mutate`], which flush to
/// the active slot right away.
pub struct SceneContext {
    store: SaveStore,
    profile: PersistentProfile,
    rng: StdRng,
    save_failures: u32,
}

impl SceneContext {
    pub fn new(store: SaveStore, profile: PersistentProfile, rng: StdRng) -> Self {
        Self {
            store,
            profile,
            rng,
            save_failures: 0,
        }
    }

    pub fn open(store: SaveStore, rng: StdRng) -> Result<Self, ProfileError> {
        let profile = store.load_or_init()?;
        info!(
            slot = store.active_slot(),
            money = profile.money(),
            buyers = profile.buyer_count(),
            audio = profile.settings().audio,
            "profile_loaded"
        );
        Ok(Self::new(store, profile, rng))
    }

    pub fn profile(&self) -> &PersistentProfile {
        &self.profile
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn save_failures(&self) -> u32 {
        self.save_failures
    }

    pub fn transact<F>(&mut self, action: &'static str, apply: F) -> TradeOutcome
    where
        F: FnOnce(&mut PersistentProfile) -> TradeOutcome,
    {
        let outcome = apply(&mut self.profile);
        match outcome {
            TradeOutcome::Completed => {
                info!(
                    action,
                    money = self.profile.money(),
                    candy = self.profile.total_candy(),
                    "trade_completed"
                );
                self.persist(action);
            }
            TradeOutcome::Declined(reason) => {
                info!(action, reason = %reason, "trade_declined");
            }
        }
        outcome
    }

    pub fn mutate<T, F>(&mut self, reason: &'static str, apply: F) -> T
    where
        F: FnOnce(&mut PersistentProfile) -> T,
    {
        let result = apply(&mut self.profile);
        self.persist(reason);
        result
    }

    pub fn start_new_game(&mut self) {
        self.mutate("new_game", PersistentProfile::reset_to_defaults);
    }

    pub fn list_slots(&self) -> Result<Vec<String>, ProfileError> {
        self.store.list_slots()
    }

    pub fn next_slot_name(&self) -> Result<String, ProfileError> {
        self.store.next_slot_name()
    }

    pub fn select_slot(&mut self, slot: &str) -> Result<(), ProfileError> {
        let mut store = self.store.clone();
        store.select(slot)?;
        self.profile = store.load_or_init()?;
        self.store = store;
        Ok(())
    }

    pub fn create_next_slot(&mut self) -> Result<String, ProfileError> {
        let mut store = self.store.clone();
        self.profile = store.create_next_slot()?;
        self.store = store;
        Ok(self.store.active_slot().to_string())
    }

    fn persist(&mut self, reason: &'static str) {
        match self.store.save(&self.profile) {
            Ok(()) => debug!(reason, slot = self.store.active_slot(), "profile_saved"),
            Err(error) => {
                self.save_failures += 1;
                warn!(reason, error = %error, "profile_save_failed");
            }
        }
    }
}
