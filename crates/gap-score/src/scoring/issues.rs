use serde::Serialize;

use super::domain::{Issue, Severity};

/// Red/Amber/Green breakdown of outstanding issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RagTally {
    pub red: usize,
    pub amber: usize,
    pub green: usize,
}

impl RagTally {
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues
            .iter()
            .fold(Self::default(), |tally, issue| tally.with(issue.severity))
    }

    fn with(self, severity: Severity) -> Self {
        match severity {
            Severity::Red => Self {
                red: self.red + 1,
                ..self
            },
            Severity::Amber => Self {
                amber: self.amber + 1,
                ..self
            },
            Severity::Green => Self {
                green: self.green + 1,
                ..self
            },
        }
    }

    pub fn total(&self) -> usize {
        self.red + self.amber + self.green
    }
}

/// Ordered, de-duplicated issue list plus its tally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueAggregator {
    issues: Vec<Issue>,
    tally: RagTally,
}

impl IssueAggregator {
    /// Merge compliance issues (catalog order) with website issues (predicate order).
    ///
    /// The sort is stable, so declaration order survives within a severity. The first issue
    /// for a key wins.
    pub fn merge(compliance: Vec<Issue>, website: Vec<Issue>) -> Self {
        let mut issues: Vec<Issue> = Vec::with_capacity(compliance.len() + website.len());
        for issue in compliance.into_iter().chain(website) {
            if issues.iter().all(|existing| existing.key != issue.key) {
                issues.push(issue);
            }
        }
        issues.sort_by_key(|issue| issue.severity);

        let tally = RagTally::from_issues(&issues);
        Self { issues, tally }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn tally(&self) -> RagTally {
        self.tally
    }

    pub fn keys_with(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity == severity)
            .map(|issue| issue.key.as_str())
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
