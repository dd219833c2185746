use super::scenario::Scenario;
use crate::services::decision::types::CallResponse;

/// Holder for the selected scenario and the last displayed response.
/// No behaviour beyond get/set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioStore {
    scenario: Scenario,
    response: Option<CallResponse>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn set_response(&mut self, response: Option<CallResponse>) {
        self.response = response;
    }

    pub fn response(&self) -> Option<&CallResponse> {
        self.response.as_ref()
    }
}
