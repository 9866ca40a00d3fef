use serde::Serialize;

use crate::{
    advisory::{Advisory, classify},
    checklist::Checklist,
    display::DisplayFields,
    model::Observation,
};

/// Everything derived from one observation, computed in one go so a sink
/// never sees a half-updated result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub display: DisplayFields,
    pub advisory: Advisory,
    pub checklist: Checklist,
}

impl WeatherReport {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            display: DisplayFields::from_observation(obs),
            advisory: classify(obs),
            checklist: Checklist::for_observation(obs),
        }
    }
}
