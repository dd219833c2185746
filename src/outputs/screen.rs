use std::fmt;

use crate::kernel::phase::Phase;
use crate::kernel::scenario::{Scenario, VIP_CALLER};
use crate::kernel::view::SimView;

pub const CLOCK: &str = "09:41";
pub const WAITING_FOR_TRIGGER: &str = "Waiting for trigger...";

/// What the virtual phone shows for a given view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Incoming { caller: String },
    Messages { contact: String, reply: Option<String> },
}

/// PURE FUNCTION: SimView -> Screen
pub fn project(view: &SimView) -> Screen {
    let scenario = view.display_scenario();
    match view.phase {
        Phase::Idle => Screen::Home,
        Phase::Ringing => Screen::Incoming {
            caller: caller_label(scenario).to_string(),
        },
        Phase::Missed | Phase::Texted => Screen::Messages {
            contact: contact_label(scenario).to_string(),
            reply: match view.phase {
                Phase::Texted => view.response.as_ref().map(|r| r.message_body.clone()),
                _ => None,
            },
        },
    }
}

fn caller_label(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Vip => VIP_CALLER,
        _ => "Unknown Caller",
    }
}

fn contact_label(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Vip => VIP_CALLER,
        _ => "Unknown",
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Home => {
                writeln!(f, "  {}", CLOCK)?;
                write!(f, "  No New Notifications")
            }
            Screen::Incoming { caller } => {
                writeln!(f, "  [{}]", caller)?;
                writeln!(f, "  Incoming Call...")?;
                write!(f, "  Slide to answer")
            }
            Screen::Messages { contact, reply } => {
                writeln!(f, "  < Messages   {}   Details", contact)?;
                write!(f, "  -- Missed Call at {} --", CLOCK)?;
                if let Some(body) = reply {
                    write!(f, "\n  > {}", body)?;
                }
                Ok(())
            }
        }
    }
}

pub fn trigger_label(view: &SimView) -> &'static str {
    if view.can_trigger() {
        "Call Phone"
    } else {
        "Calling..."
    }
}

/// The "backend logic" panel: pretty JSON of the stored response.
pub fn backend_log(view: &SimView) -> String {
    match &view.response {
        Some(response) => {
            serde_json::to_string_pretty(response).unwrap_or_else(|_| response.message_body.clone())
        }
        None => WAITING_FOR_TRIGGER.to_string(),
    }
}

/// Everything a console frontend prints for one view.
pub fn render(view: &SimView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Scenario: {} | Phase: {} | [{}]{}\n",
        view.scenario.label(),
        view.phase,
        trigger_label(view),
        if view.can_trigger() { "" } else { " (disabled)" },
    ));
    out.push_str(&project(view).to_string());
    out.push('\n');
    if let Some(kind) = view.failure {
        out.push_str(&format!("  ! decision call failed ({:?}), reset to try again\n", kind));
    }
    out.push_str("Backend Logic:\n");
    out.push_str(&backend_log(view));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::kernel::event::RunId;
    use crate::services::decision::types::CallResponse;

    fn view(phase: Phase, scenario: Scenario) -> SimView {
        SimView {
            phase,
            scenario,
            run: (phase != Phase::Idle).then_some(RunId(1)),
            run_scenario: (phase != Phase::Idle).then_some(scenario),
            ..SimView::default()
        }
    }

    #[test]
    fn idle_is_home() {
        let v = view(Phase::Idle, Scenario::Vip);
        assert_eq!(project(&v), Screen::Home);
        assert_eq!(trigger_label(&v), "Call Phone");
        assert_eq!(backend_log(&v), WAITING_FOR_TRIGGER);
    }

    #[test]
    fn ringing_names_caller() {
        assert_eq!(
            project(&view(Phase::Ringing, Scenario::Vip)),
            Screen::Incoming { caller: "VIP Client".into() }
        );
        assert_eq!(
            project(&view(Phase::Ringing, Scenario::Evening)),
            Screen::Incoming { caller: "Unknown Caller".into() }
        );
        assert_eq!(trigger_label(&view(Phase::Ringing, Scenario::Vip)), "Calling...");
    }

    #[test]
    fn uses_run_snapshot_not_live_selection() {
        let mut v = view(Phase::Ringing, Scenario::Vip);
        v.scenario = Scenario::BusinessHours;
        assert_eq!(project(&v), Screen::Incoming { caller: "VIP Client".into() });
    }

    #[test]
    fn reply_bubble_only_when_texted() {
        let mut missed = view(Phase::Missed, Scenario::BusinessHours);
        missed.response = Some(CallResponse::new(2.0, "Hi"));
        assert_eq!(
            project(&missed),
            Screen::Messages { contact: "Unknown".into(), reply: None }
        );

        let mut texted = view(Phase::Texted, Scenario::BusinessHours);
        texted.response = Some(CallResponse::new(2.0, "Hi").with_field("action", "Standard Auto-Response"));
        let screen = project(&texted);
        assert_eq!(
            screen,
            Screen::Messages { contact: "Unknown".into(), reply: Some("Hi".into()) }
        );
        assert!(screen.to_string().contains("Missed Call at 09:41"));
        assert!(backend_log(&texted).contains("Standard Auto-Response"));
    }

    #[test]
    fn backend_log_shows_payload_as_received() {
        let body = r#"{"status":"success","action":"A","message_body":"Hi","simulated_delay":2,"timestamp":"t"}"#;
        let mut v = view(Phase::Texted, Scenario::BusinessHours);
        v.response = Some(serde_json::from_str(body).unwrap());

        let log = backend_log(&v);
        assert!(log.contains(r#""simulated_delay": 2"#), "{}", log);
        assert!(!log.contains("2.0"), "{}", log);
        let shown: serde_json::Value = serde_json::from_str(&log).unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(shown, sent);
    }

    #[test]
    fn render_reports_failure() {
        let mut v = view(Phase::Missed, Scenario::Evening);
        v.failure = Some(FailureKind::Status);
        let text = render(&v);
        assert!(text.contains("After Hours (Calendar Link)"));
        assert!(text.contains("(disabled)"));
        assert!(text.contains("Status"));
    }
}
