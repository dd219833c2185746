use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const VIP_CALLER: &str = "VIP Client";
pub const UNKNOWN_CALLER: &str = "Stranger";

/// Situational context picked by the user before triggering a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    BusinessHours,
    Evening,
    Vip,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::BusinessHours
    }
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::BusinessHours, Scenario::Evening, Scenario::Vip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::BusinessHours => "business_hours",
            Scenario::Evening => "evening",
            Scenario::Vip => "vip",
        }
    }

    /// Selector label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::BusinessHours => "Business Hours (Standard)",
            Scenario::Evening => "After Hours (Calendar Link)",
            Scenario::Vip => "VIP Client (Priority)",
        }
    }

    pub fn caller_name(&self) -> &'static str {
        match self {
            Scenario::Vip => VIP_CALLER,
            _ => UNKNOWN_CALLER,
        }
    }

    pub fn time_of_day(&self) -> &'static str {
        match self {
            Scenario::Evening => "evening",
            _ => "business_hours",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario '{0}' (expected business_hours, evening or vip)")]
pub struct ScenarioParseError(pub String);

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business_hours" => Ok(Scenario::BusinessHours),
            "evening" => Ok(Scenario::Evening),
            "vip" => Ok(Scenario::Vip),
            _ => Err(ScenarioParseError(s.to_string())),
        }
    }
}

/// Body of `POST /api/missed-call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub caller_name: String,
    pub time_of_day: String,
}

impl From<Scenario> for CallRequest {
    fn from(scenario: Scenario) -> Self {
        Self {
            caller_name: scenario.caller_name().to_string(),
            time_of_day: scenario.time_of_day().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_derivation() {
        let vip = CallRequest::from(Scenario::Vip);
        assert_eq!(vip.caller_name, "VIP Client");
        assert_eq!(vip.time_of_day, "business_hours");

        let evening = CallRequest::from(Scenario::Evening);
        assert_eq!(evening.caller_name, "Stranger");
        assert_eq!(evening.time_of_day, "evening");

        let standard = CallRequest::from(Scenario::BusinessHours);
        assert_eq!(standard.caller_name, "Stranger");
        assert_eq!(standard.time_of_day, "business_hours");
    }

    #[test]
    fn request_wire_shape() {
        let body = serde_json::to_value(CallRequest::from(Scenario::Vip)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "caller_name": "VIP Client", "time_of_day": "business_hours" })
        );
    }

    #[test]
    fn parse_round_trips_names() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.as_str().parse::<Scenario>().unwrap(), scenario);
        }
        assert_eq!(" VIP ".parse::<Scenario>().unwrap(), Scenario::Vip);
        assert!("morning".parse::<Scenario>().is_err());
    }

    #[test]
    fn default_is_business_hours() {
        assert_eq!(Scenario::default(), Scenario::BusinessHours);
    }
}
