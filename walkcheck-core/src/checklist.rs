//! Packing checklist derived from the same observation as the advisory.
//!
//! Unlike the advisory, every rule group is evaluated independently and items
//! are never de-duplicated: a freezing, snowy day lists "Winter boots" twice.

use serde::Serialize;

use crate::model::Observation;

const BASE_ITEMS: [&str; 3] = ["Phone", "Keys", "Wallet"];
const RAIN_ITEMS: [&str; 3] = ["Umbrella", "Rain jacket", "Waterproof shoes"];
const SNOW_ITEMS: [&str; 3] = ["Winter boots", "Extra socks", "Scarf"];

/// Lower than the advisory's "very windy" threshold on purpose.
const WINDBREAKER_ABOVE_KPH: f64 = 25.0;

/// Items for one temperature band; only the first matching band applies.
fn temperature_items(temp_f: f64) -> &'static [&'static str] {
    if temp_f > 85.0 {
        &["Water bottle", "Sunglasses", "Hat", "Sunscreen"]
    } else if temp_f > 70.0 {
        &["Water bottle", "Sunglasses", "Hat"]
    } else if temp_f < 32.0 {
        &["Heavy jacket", "Gloves", "Hat", "Winter boots"]
    } else if temp_f < 45.0 {
        &["Warm jacket", "Gloves", "Hat"]
    } else if temp_f < 60.0 {
        &["Light jacket"]
    } else {
        &[]
    }
}

/// Recommended items, base items first, in rule order.
///
/// `condition` is matched by substring and should already be lowercase.
pub fn recommended_items(
    temp_f: f64,
    condition: &str,
    wind_kph: f64,
    precipitation_mm: f64,
) -> Vec<&'static str> {
    let mut items = BASE_ITEMS.to_vec();

    items.extend_from_slice(temperature_items(temp_f));

    if precipitation_mm > 0.0 || condition.contains("rain") {
        items.extend_from_slice(&RAIN_ITEMS);
    }
    if condition.contains("snow") {
        items.extend_from_slice(&SNOW_ITEMS);
    }
    if wind_kph > WINDBREAKER_ABOVE_KPH {
        items.push("Windbreaker");
    }

    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub label: String,
    pub checked: bool,
}

/// Rendered checklist; entries start unchecked and can be ticked off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Checklist {
    entries: Vec<ChecklistEntry>,
}

impl Checklist {
    pub fn for_observation(obs: &Observation) -> Self {
        let condition = obs.sky_condition.to_lowercase();
        let items =
            recommended_items(obs.temperature_f(), &condition, obs.wind_kph(), obs.precipitation_mm);

        Self {
            entries: items
                .into_iter()
                .map(|label| ChecklistEntry { label: label.to_string(), checked: false })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip the checked state of the entry at `index`.
    /// Returns the new state, or `None` if `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let entry = self.entries.get_mut(index)?;
        entry.checked = !entry.checked;
        Some(entry.checked)
    }
}
