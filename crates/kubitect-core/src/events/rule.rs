//! Declarative event rules.

use serde::Serialize;

use crate::diff::Action;

/// How a triggered rule affects the apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Allowed silently
    Ok,
    /// Allowed after confirmation
    Warn,
    /// Aborts the apply
    Block,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Ok => "ok",
            Severity::Warn => "warn",
            Severity::Block => "block",
        })
    }
}

/// Node action a rule reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Any,
    Create,
    Delete,
    Modify,
}

impl RuleAction {
    pub fn accepts(self, action: Action) -> bool {
        match self {
            RuleAction::Any => action.is_change(),
            RuleAction::Create => action == Action::Create,
            RuleAction::Delete => action == Action::Delete,
            RuleAction::Modify => action == Action::Modify,
        }
    }
}

/// A `(severity, action, paths, message)` rule over generic paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRule {
    severity: Severity,
    action: RuleAction,
    paths: Vec<String>,
    message: String,
}

impl EventRule {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            action: RuleAction::Any,
            paths: Vec::new(),
            message: String::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(Severity::Ok)
    }

    pub fn warn() -> Self {
        Self::new(Severity::Warn)
    }

    pub fn block() -> Self {
        Self::new(Severity::Block)
    }

    pub fn on(mut self, action: RuleAction) -> Self {
        self.action = action;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn patterns(&self) -> &[String] {
        &self.paths
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    /// Exact string match of a generic path against one of the patterns
    pub fn covers(&self, generic_path: &str) -> bool {
        self.paths.iter().any(|p| p == generic_path)
    }

    /// A pattern equals the path or is one of its dotted prefixes
    pub fn covers_prefix(&self, generic_path: &str) -> bool {
        self.paths.iter().any(|p| {
            generic_path == p
                || generic_path
                    .strip_prefix(p.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn triggers(&self, generic_path: &str, action: Action) -> bool {
        self.action.accepts(action) && self.covers(generic_path)
    }
}
