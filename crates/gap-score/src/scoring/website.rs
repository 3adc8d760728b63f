use serde::Serialize;

use super::compliance::clamp_pct;
use super::domain::{has_http_scheme, Issue, IssueSource, Severity};
use super::fetch::{PageFetch, PageText};

/// Perception when no scannable website was supplied.
pub const NO_WEBSITE_PERCEPTION: u8 = 45;
/// Perception when the fetch failed.
pub const FETCH_FAILED_PERCEPTION: u8 = 40;
/// Base perception for a fetched page before any signal is counted.
const PERCEPTION_BASE: f64 = 45.0;
/// Perception available on top of the base when every predicate matches.
const PERCEPTION_SPAN: f64 = 55.0;

pub const FETCH_FAILED_KEY: &str = "fetch_failed";
pub const FETCH_FAILED_LABEL: &str = "Website fetch failed";

/// Prefix keeping website issue keys apart from questionnaire keys.
const ISSUE_KEY_PREFIX: &str = "web_";

enum Check {
    HttpsScheme,
    AnyOf(&'static [&'static str]),
}

struct Predicate {
    key: &'static str,
    label: &'static str,
    miss_severity: Severity,
    check: Check,
}

const PREDICATES: &[Predicate] = &[
    Predicate {
        key: "https",
        label: "HTTPS",
        miss_severity: Severity::Green,
        check: Check::HttpsScheme,
    },
    Predicate {
        key: "privacy",
        label: "Privacy policy",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&["privacy"]),
    },
    Predicate {
        key: "contact",
        label: "Contact details",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&["contact"]),
    },
    Predicate {
        key: "cookie",
        label: "Cookie notice",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&["cookie"]),
    },
    Predicate {
        key: "accessibility",
        label: "Accessibility statement",
        miss_severity: Severity::Amber,
        check: Check::AnyOf(&["accessibility", "wcag"]),
    },
    Predicate {
        key: "company_number",
        label: "Company number",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&["company number", "registered in", "company no"]),
    },
    Predicate {
        key: "social_proof",
        label: "Case studies or reviews",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&[
            "case stud",
            "testimonial",
            "trustpilot",
            "google reviews",
        ]),
    },
    Predicate {
        key: "modern_slavery",
        label: "Modern slavery statement",
        miss_severity: Severity::Green,
        check: Check::AnyOf(&["modern slavery"]),
    },
    Predicate {
        key: "cyber_essentials",
        label: "Cyber Essentials",
        miss_severity: Severity::Amber,
        check: Check::AnyOf(&["cyber essentials", "iasme"]),
    },
];

impl Predicate {
    fn matches(&self, url: &str, page: &PageText) -> bool {
        match self.check {
            Check::HttpsScheme => url
                .get(..8)
                .map(|scheme| scheme.eq_ignore_ascii_case("https://"))
                .unwrap_or(false),
            Check::AnyOf(needles) => needles.iter().any(|needle| page.contains(needle)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteFinding {
    pub key: &'static str,
    pub label: &'static str,
    pub present: bool,
    #[serde(skip)]
    miss_severity: Severity,
}

impl WebsiteFinding {
    pub fn miss_severity(&self) -> Severity {
        self.miss_severity
    }
}

/// Perception outcome for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebsiteScan {
    /// No website, or one without an http(s) scheme.
    NotSupplied,
    /// The single fetch attempt failed.
    FetchFailed,
    Scanned {
        findings: Vec<WebsiteFinding>,
        perception_pct: u8,
    },
}

impl WebsiteScan {
    pub fn perception_pct(&self) -> u8 {
        match self {
            Self::NotSupplied => NO_WEBSITE_PERCEPTION,
            Self::FetchFailed => FETCH_FAILED_PERCEPTION,
            Self::Scanned { perception_pct, .. } => *perception_pct,
        }
    }

    pub fn present_labels(&self) -> Vec<&'static str> {
        match self {
            Self::Scanned { findings, .. } => findings
                .iter()
                .filter(|finding| finding.present)
                .map(|finding| finding.label)
                .collect(),
            Self::NotSupplied | Self::FetchFailed => Vec::new(),
        }
    }

    pub fn missing_labels(&self) -> Vec<&'static str> {
        match self {
            Self::NotSupplied => Vec::new(),
            Self::FetchFailed => vec![FETCH_FAILED_LABEL],
            Self::Scanned { findings, .. } => findings
                .iter()
                .filter(|finding| !finding.present)
                .map(|finding| finding.label)
                .collect(),
        }
    }

    /// Missing findings classified by severity, in predicate order.
    pub fn issues(&self) -> Vec<Issue> {
        match self {
            Self::NotSupplied => Vec::new(),
            Self::FetchFailed => vec![Issue {
                key: format!("{ISSUE_KEY_PREFIX}{FETCH_FAILED_KEY}"),
                label: FETCH_FAILED_LABEL.to_string(),
                severity: Severity::Green,
                source: IssueSource::Website,
            }],
            Self::Scanned { findings, .. } => findings
                .iter()
                .filter(|finding| !finding.present)
                .map(|finding| Issue {
                    key: format!("{ISSUE_KEY_PREFIX}{}", finding.key),
                    label: finding.label.to_string(),
                    severity: finding.miss_severity,
                    source: IssueSource::Website,
                })
                .collect(),
        }
    }

    pub fn is_supplied(&self) -> bool {
        !matches!(self, Self::NotSupplied)
    }
}

/// Evaluates the fixed predicate list against one fetched page.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebsiteSignalExtractor;

impl WebsiteSignalExtractor {
    pub fn predicate_count() -> usize {
        PREDICATES.len()
    }

    pub fn scan(&self, url: Option<&str>, page: Option<&PageFetch>) -> WebsiteScan {
        let Some(url) = url.filter(|url| has_http_scheme(url)) else {
            return WebsiteScan::NotSupplied;
        };

        match page {
            Some(PageFetch::Fetched(text)) => self.scan_page(url, text),
            Some(PageFetch::Failed) | None => WebsiteScan::FetchFailed,
        }
    }

    fn scan_page(&self, url: &str, page: &PageText) -> WebsiteScan {
        let findings: Vec<WebsiteFinding> = PREDICATES
            .iter()
            .map(|predicate| WebsiteFinding {
                key: predicate.key,
                label: predicate.label,
                present: predicate.matches(url, page),
                miss_severity: predicate.miss_severity,
            })
            .collect();

        let satisfied = findings.iter().filter(|finding| finding.present).count();
        let fraction = satisfied as f64 / findings.len() as f64;
        let perception_pct = clamp_pct(PERCEPTION_BASE + PERCEPTION_SPAN * fraction);

        WebsiteScan::Scanned {
            findings,
            perception_pct,
        }
    }
}
