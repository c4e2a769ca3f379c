use log::{debug, info};

use super::state::MapState;
use super::storage::{KeyValueStore, LayoutStore, StoreResult};

/// A request coming from the layout panel.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutAction {
	Save(String),
	Load(String),
	Delete(String),
	Reset,
	Refresh,
}

/// Writes the current positions as the set restored on the next page load.
pub fn persist_current<S: KeyValueStore>(
	map: &MapState,
	layouts: &mut LayoutStore<S>,
) -> StoreResult<()> {
	let positions = map.fractional_positions();
	layouts.save_current(&positions)?;
	debug!("Persisted {} proxy positions", positions.len());
	Ok(())
}

/// Runs `action` against the map and the store.
///
/// `confirm_overwrite` is asked before a save replaces an existing layout;
/// declining leaves everything untouched.
pub fn apply_action<S: KeyValueStore>(
	map: &mut MapState,
	layouts: &mut LayoutStore<S>,
	action: LayoutAction,
	now: f64,
	confirm_overwrite: impl FnOnce(&str) -> bool,
) -> StoreResult<()> {
	match action {
		LayoutAction::Save(name) => {
			let name = name.trim();
			if layouts.contains(name) && !confirm_overwrite(name) {
				debug!("Kept existing layout {name}");
				return Ok(());
			}
			let summary = layouts.save_layout(name, &map.fractional_positions(), now)?;
			info!(
				"Saved layout {} with {} proxies",
				summary.name, summary.proxy_count
			);
		}
		LayoutAction::Load(name) => {
			let record = layouts.load_layout(&name)?;
			let applied = map.apply_positions(&record.positions);
			info!(
				"Loaded layout {} ({applied} of {} proxies matched)",
				record.name,
				map.proxies.len()
			);
			persist_current(map, layouts)?;
		}
		LayoutAction::Delete(name) => {
			layouts.delete_layout(&name)?;
			info!("Deleted layout {}", name.trim());
		}
		LayoutAction::Reset => {
			layouts.clear_current()?;
			map.reset_positions();
			info!("Restored default layout");
		}
		LayoutAction::Refresh => {}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::network_map::config::MapConfig;
	use crate::components::network_map::storage::StoreError;
	use crate::components::network_map::storage::testing::memory_layouts;
	use crate::components::network_map::types::{ProxyDescriptor, StatusCategory};

	fn map() -> MapState {
		let proxies: Vec<ProxyDescriptor> = ["alpha", "beta", "gamma"]
			.iter()
			.map(|name| ProxyDescriptor {
				name: name.to_string(),
				status: StatusCategory::Ok,
				..Default::default()
			})
			.collect();
		MapState::new(&proxies, 900.0, 700.0, MapConfig::default())
	}

	fn drag(map: &mut MapState, idx: usize, dx: f64, dy: f64) {
		let start = map.proxies[idx].position();
		assert!(map.begin_drag(start.x, start.y));
		map.drag_to(start.x + dx, start.y + dy);
		assert!(map.end_drag());
	}

	#[test]
	fn dragged_positions_survive_reinitialization() {
		let mut layouts = memory_layouts();
		let mut first = map();
		drag(&mut first, 1, -40.0, 30.0);
		persist_current(&first, &mut layouts).unwrap();

		let mut reloaded = map();
		assert_eq!(reloaded.apply_positions(&layouts.load_current()), 3);
		let (a, b) = (first.proxies[1].position(), reloaded.proxies[1].position());
		assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
	}

	#[test]
	fn save_and_load_named_layout() {
		let mut layouts = memory_layouts();
		let mut state = map();
		drag(&mut state, 0, 15.0, 60.0);
		let saved = state.fractional_positions();
		apply_action(&mut state, &mut layouts, LayoutAction::Save("A".into()), 5.0, |_| true).unwrap();

		state.reset_positions();
		apply_action(&mut state, &mut layouts, LayoutAction::Load("A".into()), 6.0, |_| true).unwrap();
		for (name, pos) in state.fractional_positions() {
			assert!((pos.x - saved[&name].x).abs() < 1e-9);
			assert!((pos.y - saved[&name].y).abs() < 1e-9);
		}
		let current = layouts.load_current();
		assert_eq!(current.len(), 3);
		for (name, pos) in state.fractional_positions() {
			assert!((pos.x - current[&name].x).abs() < 1e-9);
		}
	}

	#[test]
	fn declining_overwrite_keeps_the_old_layout() {
		let mut layouts = memory_layouts();
		let mut state = map();
		apply_action(&mut state, &mut layouts, LayoutAction::Save("ops".into()), 1.0, |_| true).unwrap();
		let original = layouts.load_layout("ops").unwrap();

		drag(&mut state, 2, 30.0, 30.0);
		let mut asked = None;
		apply_action(
			&mut state,
			&mut layouts,
			LayoutAction::Save("ops".into()),
			2.0,
			|name| {
				asked = Some(name.to_string());
				false
			},
		)
		.unwrap();
		assert_eq!(asked.as_deref(), Some("ops"));
		assert_eq!(layouts.load_layout("ops").unwrap(), original);
	}

	#[test]
	fn loading_a_deleted_layout_is_not_found() {
		let mut layouts = memory_layouts();
		let mut state = map();
		apply_action(&mut state, &mut layouts, LayoutAction::Save("tmp".into()), 1.0, |_| true).unwrap();
		apply_action(&mut state, &mut layouts, LayoutAction::Delete("tmp".into()), 2.0, |_| true).unwrap();

		assert!(layouts.list_layouts().is_empty());
		let result = apply_action(&mut state, &mut layouts, LayoutAction::Load("tmp".into()), 3.0, |_| true);
		assert!(matches!(result, Err(StoreError::NotFound(_))));
	}

	#[test]
	fn reset_clears_current_and_restores_defaults() {
		let mut layouts = memory_layouts();
		let defaults = map().fractional_positions();
		let mut state = map();
		drag(&mut state, 0, 50.0, 50.0);
		persist_current(&state, &mut layouts).unwrap();

		apply_action(&mut state, &mut layouts, LayoutAction::Reset, 1.0, |_| true).unwrap();
		assert!(layouts.load_current().is_empty());
		assert_eq!(state.fractional_positions(), defaults);
	}
}
