//! JSON activity-list loader.
//!
//! ```json
//! [
//!   { "code": "go-home", "priority": 2, "severity": "hard",
//!     "conditions": [ { "type": "timeOfDay", "fromHour": 20, "toHour": 6 } ],
//!     "actions": [
//!       { "type": "goTo", "target": { "x": 0, "y": 0, "z": 0 }, "speed": 2 },
//!       { "type": "playAnimation", "code": "sleep", "secs": 30 }
//!     ],
//!     "cooldownSecs": 600 }
//! ]
//! ```

use std::io::Read;
use std::path::Path;

use crate::{Activity, ActivityError, ActivityResult};

pub fn parse_activities(json: &str) -> ActivityResult<Vec<Activity>> {
    validate(serde_json::from_str(json)?)
}

pub fn load_activities_reader<R: Read>(reader: R) -> ActivityResult<Vec<Activity>> {
    validate(serde_json::from_reader(reader)?)
}

pub fn load_activities_json(path: &Path) -> ActivityResult<Vec<Activity>> {
    let file = std::fs::File::open(path)?;
    load_activities_reader(std::io::BufReader::new(file))
}

fn validate(activities: Vec<Activity>) -> ActivityResult<Vec<Activity>> {
    if let Some(empty) = activities.iter().find(|a| a.actions.is_empty()) {
        return Err(ActivityError::NoActions { code: empty.code.clone() });
    }
    Ok(activities)
}
