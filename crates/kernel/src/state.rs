use glam::Vec3;
use hubworld_common::{AreaId, ItemId, ObjectiveId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Player spawn/reset position.
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// An event record produced by every effective mutation of the hub state.
///
/// Views drain the log once per frame; a non-empty drain means their
/// snapshot is stale and must be re-rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// Player position was overwritten. Emitted on every write.
    PositionChanged { position: Vec3 },
    /// An area was newly unlocked. Not emitted for re-unlocks.
    AreaUnlocked { area: AreaId },
    /// An item was newly collected. Not emitted for re-collects.
    ItemCollected { item: ItemId },
    /// An objective's completion flag changed value.
    ObjectiveUpdated {
        objective: ObjectiveId,
        completed: bool,
    },
    /// The whole state was restored to the initial snapshot.
    Reset,
}

/// A single objective shown on the HUD. Only `completed` ever mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub label: String,
    pub completed: bool,
}

impl Objective {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: ObjectiveId::from(id),
            label: label.to_owned(),
            completed: false,
        }
    }
}

/// The authoritative hub state.
///
/// All mutations go through explicit operations; views and the renderer
/// read through selectors and never mutate. Sets use BTreeSet so HUD
/// listings iterate in a stable order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubState {
    position: Vec3,
    unlocked_areas: BTreeSet<AreaId>,
    collected_items: BTreeSet<ItemId>,
    objectives: Vec<Objective>,
    /// Append-only log of mutations since the last drain.
    #[serde(skip)]
    event_log: Vec<StateEvent>,
}

impl Default for HubState {
    fn default() -> Self {
        Self::new()
    }
}

impl HubState {
    /// Create the initial snapshot: player at spawn, the central plaza
    /// unlocked, nothing collected, all objectives incomplete.
    pub fn new() -> Self {
        let mut unlocked_areas = BTreeSet::new();
        unlocked_areas.insert(AreaId::from("central-plaza"));
        Self {
            position: INITIAL_POSITION,
            unlocked_areas,
            collected_items: BTreeSet::new(),
            objectives: vec![
                Objective::new("meet-guide", "Meet the guide at the plaza."),
                Objective::new("collect-crystal", "Collect the elemental crystal."),
                Objective::new("activate-teleporter", "Activate a teleporter."),
            ],
            event_log: Vec::new(),
        }
    }

    // --- Selectors ---

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn unlocked_areas(&self) -> &BTreeSet<AreaId> {
        &self.unlocked_areas
    }

    pub fn collected_items(&self) -> &BTreeSet<ItemId> {
        &self.collected_items
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn is_area_unlocked(&self, area: &AreaId) -> bool {
        self.unlocked_areas.contains(area)
    }

    pub fn has_item(&self, item: &ItemId) -> bool {
        self.collected_items.contains(item)
    }

    pub fn objective(&self, id: &ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|o| &o.id == id)
    }

    /// Drain and return all events logged since the last drain.
    pub fn drain_events(&mut self) -> Vec<StateEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the pending event log.
    pub fn events(&self) -> &[StateEvent] {
        &self.event_log
    }

    // --- Mutations ---

    /// Unconditionally overwrite the player position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.event_log.push(StateEvent::PositionChanged { position });
    }

    /// Add an area to the unlocked set. Idempotent: re-unlocking an
    /// already-unlocked area changes nothing and logs nothing.
    pub fn unlock_area(&mut self, area: AreaId) {
        if self.unlocked_areas.insert(area.clone()) {
            tracing::debug!(area = %area, "area unlocked");
            self.event_log.push(StateEvent::AreaUnlocked { area });
        }
    }

    /// Add an item to the collected set. Idempotent like `unlock_area`.
    pub fn collect_item(&mut self, item: ItemId) {
        if self.collected_items.insert(item.clone()) {
            tracing::debug!(item = %item, "item collected");
            self.event_log.push(StateEvent::ItemCollected { item });
        }
    }

    /// Set the completion flag of the objective with the matching id.
    /// Unknown ids are silently ignored; writing the current value again
    /// changes nothing and logs nothing.
    pub fn set_objective_complete(&mut self, id: &ObjectiveId, completed: bool) {
        let Some(objective) = self.objectives.iter_mut().find(|o| &o.id == id) else {
            return;
        };
        if objective.completed == completed {
            return;
        }
        objective.completed = completed;
        tracing::debug!(objective = %id, completed, "objective updated");
        self.event_log.push(StateEvent::ObjectiveUpdated {
            objective: id.clone(),
            completed,
        });
    }

    /// Restore the initial snapshot. The pending event log survives with a
    /// `Reset` appended so views drop their stale snapshots.
    pub fn reset(&mut self) {
        let initial = Self::new();
        self.position = initial.position;
        self.unlocked_areas = initial.unlocked_areas;
        self.collected_items = initial.collected_items;
        self.objectives = initial.objectives;
        tracing::debug!("state reset to initial snapshot");
        self.event_log.push(StateEvent::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot() {
        let state = HubState::new();
        assert_eq!(state.position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(state.unlocked_areas().len(), 1);
        assert!(state.is_area_unlocked(&AreaId::from("central-plaza")));
        assert!(state.collected_items().is_empty());
        assert_eq!(state.objectives().len(), 3);
        assert!(state.objectives().iter().all(|o| !o.completed));
    }

    #[test]
    fn unlock_area_is_idempotent() {
        let mut state = HubState::new();
        for _ in 0..5 {
            state.unlock_area(AreaId::from("crystal-cavern"));
        }
        assert_eq!(state.unlocked_areas().len(), 2);

        // Only the first unlock logs an event
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StateEvent::AreaUnlocked { .. }));
    }

    #[test]
    fn collect_item_is_idempotent() {
        let mut state = HubState::new();
        state.collect_item(ItemId::from("elemental-crystal"));
        state.collect_item(ItemId::from("elemental-crystal"));
        assert_eq!(state.collected_items().len(), 1);
        assert!(state.has_item(&ItemId::from("elemental-crystal")));
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn set_objective_complete_targets_matching_id_only() {
        let mut state = HubState::new();
        state.set_objective_complete(&ObjectiveId::from("collect-crystal"), true);

        let collect = state.objective(&ObjectiveId::from("collect-crystal")).unwrap();
        assert!(collect.completed);
        let others: Vec<_> = state
            .objectives()
            .iter()
            .filter(|o| o.id.as_str() != "collect-crystal")
            .collect();
        assert!(others.iter().all(|o| !o.completed));
    }

    #[test]
    fn unknown_objective_is_a_noop() {
        let mut state = HubState::new();
        state.set_objective_complete(&ObjectiveId::from("nonexistent"), true);
        assert!(state.objectives().iter().all(|o| !o.completed));
        assert!(state.events().is_empty());
    }

    #[test]
    fn objective_can_be_cleared_again() {
        let mut state = HubState::new();
        let id = ObjectiveId::from("meet-guide");
        state.set_objective_complete(&id, true);
        assert!(state.objective(&id).unwrap().completed);
        state.set_objective_complete(&id, false);
        assert!(!state.objective(&id).unwrap().completed);
    }

    #[test]
    fn redundant_objective_write_logs_nothing() {
        let mut state = HubState::new();
        let id = ObjectiveId::from("meet-guide");
        state.set_objective_complete(&id, true);
        state.drain_events();
        state.set_objective_complete(&id, true);
        assert!(state.events().is_empty());
    }

    #[test]
    fn reset_restores_initial_snapshot() {
        let mut state = HubState::new();
        state.set_position(Vec3::new(9.0, 2.0, -4.0));
        state.unlock_area(AreaId::from("crystal-cavern"));
        state.unlock_area(AreaId::from("sky-garden"));
        state.collect_item(ItemId::from("elemental-crystal"));
        state.set_objective_complete(&ObjectiveId::from("collect-crystal"), true);
        state.set_objective_complete(&ObjectiveId::from("activate-teleporter"), true);

        state.reset();

        assert_eq!(state.position(), Vec3::new(0.0, 1.0, 0.0));
        let areas: Vec<&str> = state.unlocked_areas().iter().map(|a| a.as_str()).collect();
        assert_eq!(areas, vec!["central-plaza"]);
        assert!(state.collected_items().is_empty());
        assert!(state.objectives().iter().all(|o| !o.completed));
    }

    #[test]
    fn position_writes_always_log() {
        let mut state = HubState::new();
        state.set_position(Vec3::ZERO);
        state.set_position(Vec3::ZERO);
        assert_eq!(state.events().len(), 2);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut state = HubState::new();
        state.unlock_area(AreaId::from("crystal-cavern"));
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(state.events().is_empty());
    }

    #[test]
    fn objective_order_is_stable() {
        let state = HubState::new();
        let ids: Vec<&str> = state.objectives().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["meet-guide", "collect-crystal", "activate-teleporter"]);
    }
}
