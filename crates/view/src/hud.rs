use hubworld_kernel::HubState;

/// Static controls legend shown on the HUD.
pub const CONTROLS: &[(&str, &str)] = &[
    ("WASD", "Move"),
    ("Space", "Jump"),
    ("Shift", "Sprint"),
    ("E", "Interact"),
];

/// One objective row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudObjective {
    pub label: String,
    pub completed: bool,
}

/// Snapshot of everything the HUD overlay displays.
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub objectives: Vec<HudObjective>,
    pub unlocked_areas: Vec<String>,
    /// Collected item ids; render the `Empty` placeholder when this is empty.
    pub inventory: Vec<String>,
    pub position: [f32; 3],
}

impl HudModel {
    /// Project the HUD snapshot out of the current state.
    pub fn project(state: &HubState) -> Self {
        let position = state.position();
        Self {
            objectives: state
                .objectives()
                .iter()
                .map(|o| HudObjective {
                    label: o.label.clone(),
                    completed: o.completed,
                })
                .collect(),
            unlocked_areas: state.unlocked_areas().iter().map(|a| a.to_string()).collect(),
            inventory: state.collected_items().iter().map(|i| i.to_string()).collect(),
            position: [position.x, position.y, position.z],
        }
    }

    /// Position formatted to one decimal per axis, e.g. `0.0, 1.1, 0.0`.
    pub fn position_text(&self) -> String {
        format!(
            "{:.1}, {:.1}, {:.1}",
            self.position[0], self.position[1], self.position[2]
        )
    }
}

/// Plain-text HUD rendering for the CLI and for tests.
#[derive(Debug, Default)]
pub struct TextHud;

impl TextHud {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, model: &HudModel) -> String {
        let mut out = String::new();
        out.push_str("Objectives:\n");
        for objective in &model.objectives {
            let mark = if objective.completed { 'x' } else { ' ' };
            out.push_str(&format!("  [{mark}] {}\n", objective.label));
        }

        out.push_str(&format!("Status: {}\n", model.position_text()));

        out.push_str("Unlocked:");
        for area in &model.unlocked_areas {
            out.push_str(&format!(" {area}"));
        }
        out.push('\n');

        out.push_str("Inventory:");
        if model.inventory.is_empty() {
            out.push_str(" Empty");
        } else {
            for item in &model.inventory {
                out.push_str(&format!(" {item}"));
            }
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use hubworld_common::{AreaId, ItemId, ObjectiveId};

    #[test]
    fn projection_of_initial_state() {
        let state = HubState::new();
        let model = HudModel::project(&state);
        assert_eq!(model.objectives.len(), 3);
        assert!(model.objectives.iter().all(|o| !o.completed));
        assert_eq!(model.unlocked_areas, vec!["central-plaza"]);
        assert!(model.inventory.is_empty());
    }

    #[test]
    fn position_formats_to_one_decimal() {
        let mut state = HubState::new();
        state.set_position(Vec3::new(1.234, -0.06, 9.99));
        let model = HudModel::project(&state);
        assert_eq!(model.position_text(), "1.2, -0.1, 10.0");
    }

    #[test]
    fn empty_inventory_shows_placeholder() {
        let state = HubState::new();
        let text = TextHud::new().render(&HudModel::project(&state));
        assert!(text.contains("Inventory: Empty"));
    }

    #[test]
    fn collected_item_replaces_placeholder() {
        let mut state = HubState::new();
        state.collect_item(ItemId::from("elemental-crystal"));
        let text = TextHud::new().render(&HudModel::project(&state));
        assert!(text.contains("Inventory: elemental-crystal"));
        assert!(!text.contains("Empty"));
    }

    #[test]
    fn completed_objectives_are_marked() {
        let mut state = HubState::new();
        state.set_objective_complete(&ObjectiveId::from("meet-guide"), true);
        let text = TextHud::new().render(&HudModel::project(&state));
        assert!(text.contains("[x] Meet the guide at the plaza."));
        assert!(text.contains("[ ] Collect the elemental crystal."));
    }

    #[test]
    fn unlocked_areas_list_in_stable_order() {
        let mut state = HubState::new();
        state.unlock_area(AreaId::from("sky-garden"));
        state.unlock_area(AreaId::from("crystal-cavern"));
        let model = HudModel::project(&state);
        assert_eq!(
            model.unlocked_areas,
            vec!["central-plaza", "crystal-cavern", "sky-garden"]
        );
    }
}
