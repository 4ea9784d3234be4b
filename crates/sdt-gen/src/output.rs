use std::collections::BTreeMap;

use sdt_core::errors::{ErrorInfo, SdtError};

use crate::profile::RespondentDraw;

/// Placeholder name to value, as handed to the survey platform.
pub type PlaceholderMap = BTreeMap<String, String>;

/// Key holding the attribute name at `position` of `task` (`F-t-a`).
pub fn attribute_key(task: usize, position: usize) -> String {
    format!("F-{task}-{position}")
}

/// Key holding the level at `position` of `profile` in `task` (`F-t-p-a`).
pub fn level_key(task: usize, profile: usize, position: usize) -> String {
    format!("F-{task}-{profile}-{position}")
}

impl RespondentDraw {
    /// Flattens the draw into 1-based placeholder keys.
    pub fn to_placeholders(&self) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();
        for (task_index, task) in self.tasks.iter().enumerate() {
            let task_number = task_index + 1;
            for (position, name) in self.order.iter().enumerate() {
                map.insert(attribute_key(task_number, position + 1), name.clone());
            }
            for (profile_index, profile) in task.profiles.iter().enumerate() {
                for (position, level) in profile.levels.iter().enumerate() {
                    map.insert(
                        level_key(task_number, profile_index + 1, position + 1),
                        level.clone(),
                    );
                }
            }
        }
        map
    }

    /// Serializes the placeholder map as a JSON object.
    pub fn to_json(&self) -> Result<String, SdtError> {
        serde_json::to_string(&self.to_placeholders())
            .map_err(|err| SdtError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
    }
}
