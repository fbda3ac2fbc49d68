//! Per-section shallow merge of a saved document over defaults
//!
//! Top-level scalars and arrays from the save replace the default. Top-level
//! objects (upgrades, structures, stats, ...) are merged one level deep, so
//! a section saved by an older build keeps the default for any key it lacks.
//! `null` never overwrites a default.

use serde::de::Error as _;
use serde_json::{Map, Value};

/// Merge `saved` into `defaults` in place
pub fn merge_sections(defaults: &mut Value, saved: Value) -> Result<(), serde_json::Error> {
    let Value::Object(saved) = saved else {
        return Err(serde_json::Error::custom("save root must be a JSON object"));
    };
    let Value::Object(defaults) = defaults else {
        return Err(serde_json::Error::custom("defaults must be a JSON object"));
    };

    for (key, value) in saved {
        if value.is_null() {
            continue;
        }
        match (defaults.get_mut(&key), value) {
            (Some(Value::Object(section)), Value::Object(saved_section)) => {
                merge_one_level(section, saved_section);
            }
            (_, value) => {
                defaults.insert(key, value);
            }
        }
    }
    Ok(())
}

fn merge_one_level(section: &mut Map<String, Value>, saved: Map<String, Value>) {
    for (key, value) in saved {
        if !value.is_null() {
            section.insert(key, value);
        }
    }
}
