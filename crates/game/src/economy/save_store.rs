use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sugar_engine::storage::write_text_atomic;
use thiserror::Error;
use tracing::{info, warn};

use super::profile::{Character, PersistentProfile, MAX_BUYERS};

pub const DEFAULT_SLOT: &str = "save_data1";
const SLOT_PREFIX: &str = "save_data";
const SLOT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("read save '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write save '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("list saves in '{path}': {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encode save json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("{message}")]
    Parse { message: String },
    #[error("{message}")]
    Invalid { message: String },
    #[error("invalid save slot name '{0}'")]
    InvalidSlotName(String),
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
    active_slot: String,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>, slot: &str) -> Result<Self, ProfileError> {
        validate_slot_name(slot)?;
        Ok(Self {
            dir: dir.into(),
            active_slot: slot.to_string(),
        })
    }

    pub fn active_slot(&self) -> &str {
        &self.active_slot
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.{SLOT_EXTENSION}"))
    }

    pub fn active_path(&self) -> PathBuf {
        self.slot_path(&self.active_slot)
    }

    pub fn list_slots(&self) -> Result<Vec<String>, ProfileError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProfileError::List {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut slots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProfileError::List {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                slots.push(stem.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }

    /// Next unused `save_dataN`, one past the highest numbered slot on disk.
    pub fn next_slot_name(&self) -> Result<String, ProfileError> {
        let highest = self
            .list_slots()?
            .iter()
            .filter_map(|slot| slot.strip_prefix(SLOT_PREFIX))
            .filter(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{SLOT_PREFIX}{}", highest.saturating_add(1)))
    }

    pub fn create_next_slot(&mut self) -> Result<PersistentProfile, ProfileError> {
        let slot = self.next_slot_name()?;
        self.select(&slot)?;
        self.reset()
    }

    pub fn select(&mut self, slot: &str) -> Result<(), ProfileError> {
        validate_slot_name(slot)?;
        self.active_slot = slot.to_string();
        info!(slot, "save_slot_selected");
        Ok(())
    }

    /// Loads the active slot, writing defaults when the file is missing or
    /// cannot be used. Only a failure to write those defaults is an error.
    pub fn load_or_init(&self) -> Result<PersistentProfile, ProfileError> {
        match self.load() {
            Ok(profile) => Ok(profile),
            Err(ProfileError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                self.reset()
            }
            Err(error) => {
                warn!(slot = %self.active_slot, error = %error, "save_unreadable");
                self.reset()
            }
        }
    }

    pub fn load(&self) -> Result<PersistentProfile, ProfileError> {
        self.load_slot(&self.active_slot)
    }

    /// Reads any slot without selecting it or repairing it on disk.
    pub fn load_slot(&self, slot: &str) -> Result<PersistentProfile, ProfileError> {
        validate_slot_name(slot)?;
        let path = self.slot_path(slot);
        let raw = fs::read_to_string(&path).map_err(|source| ProfileError::Read {
            path: path.clone(),
            source,
        })?;
        let profile = parse_profile_json(&raw, &path)?;
        validate_profile(&profile)?;
        Ok(profile)
    }

    pub fn save(&self, profile: &PersistentProfile) -> Result<(), ProfileError> {
        let path = self.active_path();
        let json = serde_json::to_string_pretty(profile).map_err(ProfileError::Encode)?;
        write_text_atomic(&path, &json).map_err(|source| ProfileError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn reset(&self) -> Result<PersistentProfile, ProfileError> {
        let profile = PersistentProfile::default();
        self.save(&profile)?;
        info!(slot = %self.active_slot, "profile_defaults_written");
        Ok(profile)
    }
}

fn validate_slot_name(slot: &str) -> Result<(), ProfileError> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ProfileError::InvalidSlotName(slot.to_string()))
    }
}

fn parse_profile_json(raw: &str, path: &Path) -> Result<PersistentProfile, ProfileError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, PersistentProfile>(&mut deserializer) {
        Ok(profile) => Ok(profile),
        Err(error) => {
            let json_path = error.path().to_string();
            let source = error.into_inner();
            let message = if json_path.is_empty() || json_path == "." {
                format!("parse save json '{}': {source}", path.display())
            } else {
                format!("parse save json '{}' at {json_path}: {source}", path.display())
            };
            Err(ProfileError::Parse { message })
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> ProfileError {
    ProfileError::Invalid {
        message: format!("validation failed at {path}: {}", message.into()),
    }
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> ProfileError {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn validate_profile(profile: &PersistentProfile) -> Result<(), ProfileError> {
    for (character, field) in [
        (Character::Primary, "speed_by_character.primary"),
        (Character::Secondary, "speed_by_character.secondary"),
    ] {
        let speed = profile.speed(character);
        if !speed.is_finite() || speed <= 0.0 {
            return Err(expected_actual(field, "positive finite speed", speed));
        }
    }
    if profile.total_candy() > profile.capacity() {
        return Err(expected_actual(
            "candy",
            format!("at most {} total", profile.capacity()),
            profile.total_candy(),
        ));
    }
    if profile.buyer_count() > MAX_BUYERS {
        return Err(expected_actual(
            "buyer_count",
            format!("at most {MAX_BUYERS}"),
            profile.buyer_count(),
        ));
    }
    if let Some(seconds) = profile.carry_over_seconds() {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(expected_actual(
                "carry_over_seconds",
                "non-negative finite seconds",
                seconds,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::economy::profile::CandyType;

    fn store_in(dir: &Path) -> SaveStore {
        SaveStore::new(dir, DEFAULT_SLOT).expect("store")
    }

    #[test]
    fn missing_slot_is_created_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        let profile = store.load_or_init().expect("load");

        assert_eq!(profile, PersistentProfile::default());
        assert!(store.active_path().is_file());
    }

    #[test]
    fn reload_without_mutation_is_identical() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let mut profile = store.load_or_init().expect("init");
        profile.credit_money(17);
        profile.record_negotiation_win();
        profile.set_carry_over(12.5);
        store.save(&profile).expect("save");

        let first = store.load().expect("first load");
        let second = store.load().expect("second load");

        assert_eq!(first, profile);
        assert_eq!(first, second);
    }

    #[test]
    fn unparseable_slot_is_replaced_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        fs::write(store.active_path(), "{ not json").expect("write garbage");

        let profile = store.load_or_init().expect("recover");

        assert_eq!(profile, PersistentProfile::default());
        let reloaded = store.load().expect("defaults were written");
        assert_eq!(reloaded, PersistentProfile::default());
    }

    #[test]
    fn parse_error_names_the_offending_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let raw = json!({ "money": 3, "candy": { "common": "lots" } }).to_string();
        fs::write(store.active_path(), raw).expect("write");

        let err = store.load().expect_err("bad candy count");
        let message = err.to_string();
        assert!(message.contains("candy.common"), "{message}");
    }

    #[test]
    fn over_capacity_record_fails_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let raw = json!({ "candy": { "common": 51 } }).to_string();
        fs::write(store.active_path(), raw).expect("write");

        let err = store.load().expect_err("over capacity");
        assert!(err
            .to_string()
            .starts_with("validation failed at candy: expected at most 50 total"));

        let recovered = store.load_or_init().expect("recover");
        assert_eq!(recovered.candy(CandyType::Common), 15);
    }

    #[test]
    fn runaway_buyer_count_fails_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());
        let raw = json!({ "buyer_count": MAX_BUYERS + 1 }).to_string();
        fs::write(store.active_path(), raw).expect("write");

        let err = store.load().expect_err("too many buyers");
        assert!(err
            .to_string()
            .starts_with("validation failed at buyer_count: expected at most 1000"));

        let at_limit = json!({ "buyer_count": MAX_BUYERS }).to_string();
        fs::write(store.active_path(), at_limit).expect("write");
        assert_eq!(store.load().expect("at limit").buyer_count(), MAX_BUYERS);
    }

    #[test]
    fn load_slot_reads_other_slots_without_touching_them() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        store.select("save_data2").expect("select");
        let mut profile = store.reset().expect("write slot");
        profile.credit_money(40);
        store.save(&profile).expect("save");
        store.select(DEFAULT_SLOT).expect("select back");
        let corrupt = store.slot_path("save_data3");
        fs::write(&corrupt, "{ not json").expect("write garbage");

        assert_eq!(store.load_slot("save_data2").expect("load").money(), 40);
        assert!(matches!(
            store.load_slot("save_data3"),
            Err(ProfileError::Parse { .. })
        ));
        assert_eq!(
            fs::read_to_string(&corrupt).expect("still there"),
            "{ not json"
        );
        assert!(!store.active_path().exists());
        assert_eq!(store.active_slot(), DEFAULT_SLOT);
    }

    #[test]
    fn slots_list_sorted_and_next_name_skips_highest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path());
        for slot in ["save_data2", "save_data7", "custom"] {
            store.select(slot).expect("select");
            store.reset().expect("write slot");
        }
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write note");

        assert_eq!(
            store.list_slots().expect("list"),
            vec!["custom", "save_data2", "save_data7"]
        );
        assert_eq!(store.next_slot_name().expect("next"), "save_data8");

        store.create_next_slot().expect("create");
        assert_eq!(store.active_slot(), "save_data8");
        assert!(store.slot_path("save_data8").is_file());
    }

    #[test]
    fn next_slot_in_empty_dir_is_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::new(dir.path().join("missing"), DEFAULT_SLOT).expect("store");

        assert!(store.list_slots().expect("list").is_empty());
        assert_eq!(store.next_slot_name().expect("next"), "save_data1");
    }

    #[test]
    fn slot_names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(dir.path());

        assert!(matches!(
            store.select("../outside"),
            Err(ProfileError::InvalidSlotName(_))
        ));
        assert_eq!(store.active_slot(), DEFAULT_SLOT);
    }
}
