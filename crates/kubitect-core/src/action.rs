//! Lifecycle actions an apply invocation can request.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::KubitectError;

/// Selects the rule set and the downstream pipeline of one apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyAction {
    #[default]
    Create,
    Upgrade,
    Scale,
}

impl ApplyAction {
    pub const ALL: [ApplyAction; 3] = [ApplyAction::Create, ApplyAction::Upgrade, ApplyAction::Scale];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplyAction::Create => "create",
            ApplyAction::Upgrade => "upgrade",
            ApplyAction::Scale => "scale",
        }
    }
}

impl std::fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyAction {
    type Err = KubitectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "create" => Ok(ApplyAction::Create),
            "upgrade" => Ok(ApplyAction::Upgrade),
            "scale" => Ok(ApplyAction::Scale),
            other => Err(KubitectError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for action in ApplyAction::ALL {
            assert_eq!(action.to_string().parse::<ApplyAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_empty_defaults_to_create() {
        assert_eq!("".parse::<ApplyAction>().unwrap(), ApplyAction::Create);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = "destroy".parse::<ApplyAction>().unwrap_err();
        assert!(matches!(err, KubitectError::UnknownAction { action } if action == "destroy"));
    }
}
