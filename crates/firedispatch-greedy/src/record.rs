use std::fmt;

use serde::Serialize;

/// One line of the greedy dispatch log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub fire_id: String,
    pub outcome: DispatchOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No base lies within range of the fire.
    NoInitialResponse,
    /// Bases in range cannot jointly cover the need; nothing was sent.
    NoAdditionalDispatch,
    Sent {
        base_name: String,
        model: String,
        sent: u32,
        /// Size of the base before this run.
        nominal: u32,
    },
}

impl DispatchRecord {
    pub fn sent(&self) -> u32 {
        match self.outcome {
            DispatchOutcome::Sent { sent, .. } => sent,
            _ => 0,
        }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self.outcome, DispatchOutcome::Sent { .. })
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::NoInitialResponse => f.write_str("no initial response possible"),
            DispatchOutcome::NoAdditionalDispatch => f.write_str("no additional dispatch possible"),
            DispatchOutcome::Sent { sent, nominal, .. } => write!(f, "{sent}/{nominal}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_renders_as_fraction_of_nominal() {
        let outcome = DispatchOutcome::Sent {
            base_name: "Hoengseong".into(),
            model: "S-64".into(),
            sent: 2,
            nominal: 5,
        };
        assert_eq!(outcome.to_string(), "2/5");
    }

    #[test]
    fn markers_send_nothing() {
        let record = DispatchRecord {
            fire_id: "F1".into(),
            outcome: DispatchOutcome::NoAdditionalDispatch,
        };
        assert!(record.is_marker());
        assert_eq!(record.sent(), 0);
    }

    #[test]
    fn serializes_with_status_tag() {
        let record = DispatchRecord {
            fire_id: "F1".into(),
            outcome: DispatchOutcome::NoInitialResponse,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["outcome"]["status"], "no_initial_response");
    }
}
