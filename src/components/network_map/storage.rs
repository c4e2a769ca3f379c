//! Browser-local persistence of satellite positions.
//!
//! Positions are stored as fractions of the canvas extent so a layout survives
//! window resizes. Three kinds of entries live under a common prefix:
//!
//! - `<prefix>.positions`: the "current" position set, rewritten after drags.
//! - `<prefix>.layouts`: the index of named layouts.
//! - `<prefix>.layout.<name>`: one record per named layout.
//!
//! Everything is best-effort. Corrupt entries read as empty and are logged.

use std::collections::BTreeMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("local storage is not available in this browser")]
	Unavailable,

	#[error("storage access failed: {0}")]
	Access(String),

	#[error("layout \"{0}\" not found")]
	NotFound(String),

	#[error("layout name must not be empty")]
	EmptyName,

	#[error("failed to encode layout data: {0}")]
	Encode(#[from] serde_json::Error),
}

impl From<JsValue> for StoreError {
	fn from(value: JsValue) -> Self {
		Self::Access(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A synchronous string key-value store.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> StoreResult<Option<String>>;
	fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
	fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// `window.localStorage`.
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
	pub fn open() -> StoreResult<Self> {
		let window = web_sys::window().ok_or(StoreError::Unavailable)?;
		window
			.local_storage()?
			.map(Self)
			.ok_or(StoreError::Unavailable)
	}
}

impl KeyValueStore for LocalStorage {
	fn get(&self, key: &str) -> StoreResult<Option<String>> {
		Ok(self.0.get_item(key)?)
	}

	fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
		Ok(self.0.set_item(key, value)?)
	}

	fn remove(&mut self, key: &str) -> StoreResult<()> {
		Ok(self.0.remove_item(key)?)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FractionalPosition {
	pub x: f64,
	pub y: f64,
}

/// Node name to fractional position.
pub type PositionMap = BTreeMap<String, FractionalPosition>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
	pub name: String,
	/// Milliseconds since the Unix epoch.
	pub created_at: f64,
	pub proxy_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
	pub name: String,
	pub created_at: f64,
	pub proxy_count: usize,
	pub positions: PositionMap,
}

impl LayoutRecord {
	pub fn summary(&self) -> LayoutSummary {
		LayoutSummary {
			name: self.name.clone(),
			created_at: self.created_at,
			proxy_count: self.proxy_count,
		}
	}
}

pub struct LayoutStore<S> {
	store: S,
	prefix: String,
}

impl LayoutStore<LocalStorage> {
	pub fn browser(prefix: &str) -> StoreResult<Self> {
		Ok(Self::new(LocalStorage::open()?, prefix))
	}
}

impl<S: KeyValueStore> LayoutStore<S> {
	pub fn new(store: S, prefix: &str) -> Self {
		Self {
			store,
			prefix: prefix.to_string(),
		}
	}

	fn current_key(&self) -> String {
		format!("{}.positions", self.prefix)
	}

	fn index_key(&self) -> String {
		format!("{}.layouts", self.prefix)
	}

	fn layout_key(&self, name: &str) -> String {
		format!("{}.layout.{}", self.prefix, name)
	}

	/// Reads and decodes `key`, treating unreadable or corrupt data as absent.
	fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let raw = match self.store.get(key) {
			Ok(raw) => raw?,
			Err(err) => {
				warn!("Could not read {key}: {err}");
				return None;
			}
		};
		match serde_json::from_str(&raw) {
			Ok(value) => Some(value),
			Err(err) => {
				warn!("Ignoring corrupt entry {key}: {err}");
				None
			}
		}
	}

	fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> StoreResult<()> {
		let raw = serde_json::to_string(value)?;
		self.store.set(key, &raw)
	}

	pub fn load_current(&self) -> PositionMap {
		self.read_json(&self.current_key()).unwrap_or_default()
	}

	pub fn save_current(&mut self, positions: &PositionMap) -> StoreResult<()> {
		let key = self.current_key();
		self.write_json(&key, positions)
	}

	pub fn clear_current(&mut self) -> StoreResult<()> {
		let key = self.current_key();
		self.store.remove(&key)
	}

	pub fn list_layouts(&self) -> Vec<LayoutSummary> {
		self.read_json(&self.index_key()).unwrap_or_default()
	}

	pub fn contains(&self, name: &str) -> bool {
		let name = name.trim();
		self.list_layouts().iter().any(|layout| layout.name == name)
	}

	/// Stores `positions` under `name`, replacing any layout of the same name.
	pub fn save_layout(
		&mut self,
		name: &str,
		positions: &PositionMap,
		created_at: f64,
	) -> StoreResult<LayoutSummary> {
		let name = name.trim();
		if name.is_empty() {
			return Err(StoreError::EmptyName);
		}
		let record = LayoutRecord {
			name: name.to_string(),
			created_at,
			proxy_count: positions.len(),
			positions: positions.clone(),
		};
		let key = self.layout_key(name);
		let previous = self.store.get(&key)?;
		self.write_json(&key, &record)?;

		let mut index = self.list_layouts();
		index.retain(|layout| layout.name != name);
		index.push(record.summary());
		let index_key = self.index_key();
		if let Err(err) = self.write_json(&index_key, &index) {
			// No record may outlive a failed index write.
			let rollback = match previous {
				Some(raw) => self.store.set(&key, &raw),
				None => self.store.remove(&key),
			};
			if let Err(rollback_err) = rollback {
				warn!("Could not roll back layout \"{name}\": {rollback_err}");
			}
			return Err(err);
		}
		Ok(record.summary())
	}

	pub fn load_layout(&self, name: &str) -> StoreResult<LayoutRecord> {
		let name = name.trim();
		self.read_json(&self.layout_key(name))
			.ok_or_else(|| StoreError::NotFound(name.to_string()))
	}

	pub fn delete_layout(&mut self, name: &str) -> StoreResult<()> {
		let name = name.trim();
		let mut index = self.list_layouts();
		let before = index.len();
		index.retain(|layout| layout.name != name);
		let key = self.layout_key(name);
		let had_record = self.store.get(&key)?.is_some();
		if index.len() == before && !had_record {
			return Err(StoreError::NotFound(name.to_string()));
		}
		self.store.remove(&key)?;
		let index_key = self.index_key();
		self.write_json(&index_key, &index)
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::collections::HashMap;

	use super::*;

	#[derive(Default)]
	pub struct MemoryStore {
		pub entries: HashMap<String, String>,
		/// Writes to keys ending with this suffix fail, like a full quota.
		pub reject_suffix: Option<String>,
	}

	impl KeyValueStore for MemoryStore {
		fn get(&self, key: &str) -> StoreResult<Option<String>> {
			Ok(self.entries.get(key).cloned())
		}

		fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
			if self
				.reject_suffix
				.as_deref()
				.is_some_and(|suffix| key.ends_with(suffix))
			{
				return Err(StoreError::Access(format!("quota exceeded writing {key}")));
			}
			self.entries.insert(key.to_string(), value.to_string());
			Ok(())
		}

		fn remove(&mut self, key: &str) -> StoreResult<()> {
			self.entries.remove(key);
			Ok(())
		}
	}

	pub fn memory_layouts() -> LayoutStore<MemoryStore> {
		LayoutStore::new(MemoryStore::default(), "networkMap")
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::testing::memory_layouts;
	use super::*;

	fn positions(entries: &[(&str, f64, f64)]) -> PositionMap {
		entries
			.iter()
			.map(|&(name, x, y)| (name.to_string(), FractionalPosition { x, y }))
			.collect()
	}

	#[test]
	fn save_then_load_restores_positions() {
		let mut layouts = memory_layouts();
		let saved = positions(&[("proxy-a", 0.25, 0.75), ("proxy-b", 0.1, 0.9)]);
		let summary = layouts.save_layout("A", &saved, 1_700_000_000_000.0).unwrap();
		assert_eq!(summary.proxy_count, 2);

		let record = layouts.load_layout("A").unwrap();
		assert_eq!(record.positions, saved);
		assert_eq!(layouts.list_layouts(), vec![summary]);
	}

	#[test]
	fn saving_an_existing_name_replaces_it() {
		let mut layouts = memory_layouts();
		layouts.save_layout("ops", &positions(&[("a", 0.1, 0.1)]), 1.0).unwrap();
		layouts
			.save_layout(" ops ", &positions(&[("a", 0.5, 0.5), ("b", 0.2, 0.2)]), 2.0)
			.unwrap();

		let index = layouts.list_layouts();
		assert_eq!(index.len(), 1);
		assert_eq!(index[0].created_at, 2.0);
		assert_eq!(layouts.load_layout("ops").unwrap().positions.len(), 2);
	}

	#[test]
	fn delete_removes_index_entry_and_record() {
		let mut layouts = memory_layouts();
		layouts.save_layout("A", &positions(&[("a", 0.3, 0.3)]), 1.0).unwrap();
		layouts.save_layout("B", &positions(&[("a", 0.6, 0.6)]), 2.0).unwrap();

		layouts.delete_layout("A").unwrap();
		assert!(!layouts.contains("A"));
		assert!(layouts.contains("B"));
		assert!(matches!(layouts.load_layout("A"), Err(StoreError::NotFound(name)) if name == "A"));
		assert!(matches!(layouts.delete_layout("A"), Err(StoreError::NotFound(_))));
	}

	#[test]
	fn failed_index_write_leaves_no_orphan_record() {
		let mut layouts = memory_layouts();
		layouts.store.reject_suffix = Some(".layouts".into());

		let err = layouts.save_layout("night", &positions(&[("a", 0.2, 0.4)]), 1.0);
		assert!(matches!(err, Err(StoreError::Access(_))));
		assert!(!layouts.store.entries.contains_key("networkMap.layout.night"));
		assert!(layouts.list_layouts().is_empty());
		assert!(matches!(layouts.load_layout("night"), Err(StoreError::NotFound(_))));
	}

	#[test]
	fn failed_overwrite_keeps_the_previous_record() {
		let mut layouts = memory_layouts();
		let original = positions(&[("a", 0.1, 0.1)]);
		layouts.save_layout("day", &original, 1.0).unwrap();
		layouts.store.reject_suffix = Some(".layouts".into());

		assert!(
			layouts
				.save_layout("day", &positions(&[("a", 0.9, 0.9), ("b", 0.5, 0.5)]), 2.0)
				.is_err()
		);
		let record = layouts.load_layout("day").unwrap();
		assert_eq!(record.created_at, 1.0);
		assert_eq!(record.positions, original);
		assert_eq!(layouts.list_layouts()[0].created_at, 1.0);
	}

	#[test]
	fn empty_names_are_rejected() {
		let mut layouts = memory_layouts();
		assert!(matches!(
			layouts.save_layout("   ", &PositionMap::new(), 0.0),
			Err(StoreError::EmptyName)
		));
		assert!(layouts.list_layouts().is_empty());
	}

	#[test]
	fn current_positions_round_trip_and_clear() {
		let mut layouts = memory_layouts();
		assert!(layouts.load_current().is_empty());

		let current = positions(&[("edge", 0.42, 0.17)]);
		layouts.save_current(&current).unwrap();
		assert_eq!(layouts.load_current(), current);

		layouts.clear_current().unwrap();
		assert!(layouts.load_current().is_empty());
	}

	#[test]
	fn corrupt_entries_read_as_empty() {
		let mut layouts = memory_layouts();
		layouts.store.set("networkMap.positions", "{oops").unwrap();
		layouts.store.set("networkMap.layouts", "42").unwrap();
		layouts.store.set("networkMap.layout.bad", "[]").unwrap();

		assert!(layouts.load_current().is_empty());
		assert!(layouts.list_layouts().is_empty());
		assert!(matches!(layouts.load_layout("bad"), Err(StoreError::NotFound(_))));
	}
}
