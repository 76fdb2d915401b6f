//! Automated-sender filtering.
//!
//! Every write the bridge makes to GitHub triggers a new webhook whose
//! sender is the bridge's own app account. Those events must be dropped
//! before any remote call, otherwise each sync re-triggers itself.

use std::collections::HashSet;

use crate::domain::models::SenderPolicyConfig;

/// Verdict for a single sender login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderVerdict {
    Process,
    /// Login is on the deny list.
    Denied,
    /// Login carries the automated-account suffix.
    Automated,
}

impl SenderVerdict {
    pub const fn should_process(self) -> bool {
        matches!(self, Self::Process)
    }
}

/// Allow/deny policy applied to webhook senders.
///
/// Precedence: deny list, then allow list, then the bot suffix. Logins are
/// compared case-insensitively because GitHub logins are.
#[derive(Debug, Clone)]
pub struct SenderPolicy {
    bot_suffix: String,
    allow: HashSet<String>,
    deny: HashSet<String>,
}

impl SenderPolicy {
    pub fn new(
        bot_suffix: impl Into<String>,
        allow: impl IntoIterator<Item = String>,
        deny: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            bot_suffix: bot_suffix.into().to_lowercase(),
            allow: allow.into_iter().map(|l| l.to_lowercase()).collect(),
            deny: deny.into_iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &SenderPolicyConfig) -> Self {
        Self::new(
            config.bot_suffix.clone(),
            config.allow_logins.iter().cloned(),
            config.deny_logins.iter().cloned(),
        )
    }

    pub fn evaluate(&self, login: &str) -> SenderVerdict {
        let login = login.to_lowercase();
        if self.deny.contains(&login) {
            SenderVerdict::Denied
        } else if self.allow.contains(&login) {
            SenderVerdict::Process
        } else if !self.bot_suffix.is_empty() && login.ends_with(&self.bot_suffix) {
            SenderVerdict::Automated
        } else {
            SenderVerdict::Process
        }
    }
}

impl Default for SenderPolicy {
    fn default() -> Self {
        Self::from_config(&SenderPolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks_bot_suffix() {
        let policy = SenderPolicy::default();
        assert_eq!(policy.evaluate("snow-bridge[bot]"), SenderVerdict::Automated);
        assert_eq!(policy.evaluate("dependabot[BOT]"), SenderVerdict::Automated);
        assert_eq!(policy.evaluate("octocat"), SenderVerdict::Process);
        assert_eq!(policy.evaluate("robot"), SenderVerdict::Process);
    }

    #[test]
    fn test_allow_overrides_suffix() {
        let policy = SenderPolicy::new("[bot]", vec!["triage[bot]".to_string()], vec![]);
        assert!(policy.evaluate("Triage[bot]").should_process());
        assert!(!policy.evaluate("other[bot]").should_process());
    }

    #[test]
    fn test_deny_beats_allow() {
        let policy = SenderPolicy::new(
            "[bot]",
            vec!["svc-account".to_string()],
            vec!["SVC-Account".to_string()],
        );
        assert_eq!(policy.evaluate("svc-account"), SenderVerdict::Denied);
    }

    #[test]
    fn test_empty_suffix_disables_suffix_rule() {
        let policy = SenderPolicy::new("", vec![], vec![]);
        assert!(policy.evaluate("anything[bot]").should_process());
    }

    #[test]
    fn test_from_config() {
        let config = SenderPolicyConfig {
            bot_suffix: "-automation".into(),
            allow_logins: vec![],
            deny_logins: vec!["mallory".into()],
        };
        let policy = SenderPolicy::from_config(&config);
        assert_eq!(policy.evaluate("ci-automation"), SenderVerdict::Automated);
        assert_eq!(policy.evaluate("mallory"), SenderVerdict::Denied);
        assert_eq!(policy.evaluate("snow-bridge[bot]"), SenderVerdict::Process);
    }
}
