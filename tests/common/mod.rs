//! Common test utilities for integration tests
//!
//! In-memory recording fakes for the three ports, plus webhook payload
//! fixtures shared across the engine and router tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use snow_bridge::domain::models::{IncidentDraft, IncidentRecord};
use snow_bridge::domain::ports::{
    CreatedIssue, IncidentStore, InstallationResolver, IssueTracker, IssueUpdate,
};
use snow_bridge::{DomainError, DomainResult};

pub const SNOW_BASE: &str = "https://dev64641.service-now.com";

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// One call observed by [`RecordingIncidentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentCall {
    Create(IncidentDraft),
    Update { sys_id: String, draft: IncidentDraft },
    WorkNote { sys_id: String, note: String },
}

/// [`IncidentStore`] that records calls and answers with canned records.
pub struct RecordingIncidentStore {
    calls: Mutex<Vec<IncidentCall>>,
    created: IncidentRecord,
    fail: bool,
}

impl RecordingIncidentStore {
    pub fn new(number: &str, sys_id: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            created: IncidentRecord {
                number: number.to_string(),
                sys_id: sys_id.to_string(),
            },
            fail: false,
        })
    }

    /// A store whose every call fails with a 500.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            created: IncidentRecord {
                number: String::new(),
                sys_id: String::new(),
            },
            fail: true,
        })
    }

    pub fn calls(&self) -> Vec<IncidentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: IncidentCall) -> DomainResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(DomainError::servicenow(Some(500), "instance unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl IncidentStore for RecordingIncidentStore {
    async fn create_incident(&self, draft: &IncidentDraft) -> DomainResult<IncidentRecord> {
        self.record(IncidentCall::Create(draft.clone()))?;
        Ok(self.created.clone())
    }

    async fn update_incident(
        &self,
        sys_id: &str,
        draft: &IncidentDraft,
    ) -> DomainResult<IncidentRecord> {
        self.record(IncidentCall::Update {
            sys_id: sys_id.to_string(),
            draft: draft.clone(),
        })?;
        Ok(IncidentRecord {
            number: self.created.number.clone(),
            sys_id: sys_id.to_string(),
        })
    }

    async fn add_work_note(&self, sys_id: &str, note: &str) -> DomainResult<()> {
        self.record(IncidentCall::WorkNote {
            sys_id: sys_id.to_string(),
            note: note.to_string(),
        })
    }

    fn record_url(&self, sys_id: &str) -> String {
        format!("{SNOW_BASE}/nav_to.do?uri=/incident.do?sys_id={sys_id}")
    }
}

/// One call observed by [`RecordingIssueTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    UpdateIssue { number: u64, update: IssueUpdate },
    CreateIssue { title: String, body: String },
    CreateComment { issue_number: u64, body: String },
    UpdateComment { comment_id: u64, body: String },
}

/// [`IssueTracker`] that records calls; created issues are numbered from
/// `next_issue`.
pub struct RecordingIssueTracker {
    calls: Mutex<Vec<TrackerCall>>,
    next_issue: AtomicU64,
}

impl RecordingIssueTracker {
    pub fn new(next_issue: u64) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            next_issue: AtomicU64::new(next_issue),
        })
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TrackerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IssueTracker for RecordingIssueTracker {
    async fn update_issue(&self, issue_number: u64, update: &IssueUpdate) -> DomainResult<()> {
        self.record(TrackerCall::UpdateIssue {
            number: issue_number,
            update: update.clone(),
        });
        Ok(())
    }

    async fn create_issue(&self, title: &str, body: &str) -> DomainResult<CreatedIssue> {
        self.record(TrackerCall::CreateIssue {
            title: title.to_string(),
            body: body.to_string(),
        });
        let number = self.next_issue.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedIssue {
            number,
            html_url: format!("https://github.com/acme/printers/issues/{number}"),
        })
    }

    async fn create_comment(&self, issue_number: u64, body: &str) -> DomainResult<()> {
        self.record(TrackerCall::CreateComment {
            issue_number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> DomainResult<()> {
        self.record(TrackerCall::UpdateComment {
            comment_id,
            body: body.to_string(),
        });
        Ok(())
    }
}

/// [`InstallationResolver`] granting one owner every repository.
pub struct SingleOwnerInstallations {
    owner: String,
    tracker: Arc<RecordingIssueTracker>,
    resolutions: AtomicUsize,
}

impl SingleOwnerInstallations {
    pub fn new(owner: &str, tracker: Arc<RecordingIssueTracker>) -> Arc<Self> {
        Arc::new(Self {
            owner: owner.to_string(),
            tracker,
            resolutions: AtomicUsize::new(0),
        })
    }

    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstallationResolver for SingleOwnerInstallations {
    async fn resolve(&self, owner: &str, repo: &str) -> DomainResult<Arc<dyn IssueTracker>> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        if owner.eq_ignore_ascii_case(&self.owner) {
            let tracker: Arc<dyn IssueTracker> = self.tracker.clone();
            Ok(tracker)
        } else {
            Err(DomainError::UnauthorizedInstallation {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
        }
    }
}

/// The fakes wired together for owner `acme`.
pub struct Harness {
    pub incidents: Arc<RecordingIncidentStore>,
    pub tracker: Arc<RecordingIssueTracker>,
    pub installations: Arc<SingleOwnerInstallations>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(RecordingIncidentStore::new("INC0010016", "2f1e3c"))
    }

    pub fn with_store(incidents: Arc<RecordingIncidentStore>) -> Self {
        let tracker = RecordingIssueTracker::new(42);
        let installations = SingleOwnerInstallations::new("acme", Arc::clone(&tracker));
        Self {
            incidents,
            tracker,
            installations,
        }
    }

    pub fn incident_store(&self) -> Arc<dyn IncidentStore> {
        self.incidents.clone()
    }

    pub fn resolver(&self) -> Arc<dyn InstallationResolver> {
        self.installations.clone()
    }
}

/// `issues` webhook payload for `acme/printers`.
pub fn issues_payload(action: &str, number: u64, title: &str, body: Option<&str>, sender: &str) -> Value {
    json!({
        "action": action,
        "issue": issue_json(number, title, body),
        "repository": repository_json(),
        "sender": { "login": sender },
    })
}

/// `issue_comment` webhook payload for `acme/printers`.
pub fn comment_payload(
    action: &str,
    issue_body: Option<&str>,
    comment_id: u64,
    comment_body: &str,
    sender: &str,
) -> Value {
    json!({
        "action": action,
        "issue": issue_json(3, "Printer broken", issue_body),
        "comment": {
            "id": comment_id,
            "url": format!("https://api.github.com/repos/acme/printers/issues/comments/{comment_id}"),
            "html_url": format!("https://github.com/acme/printers/issues/3#issuecomment-{comment_id}"),
            "body": comment_body,
            "user": { "login": sender },
        },
        "repository": repository_json(),
        "sender": { "login": sender },
    })
}

fn issue_json(number: u64, title: &str, body: Option<&str>) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": body,
        "url": format!("https://api.github.com/repos/acme/printers/issues/{number}"),
        "html_url": format!("https://github.com/acme/printers/issues/{number}"),
        "user": { "login": "octocat" },
    })
}

fn repository_json() -> Value {
    json!({
        "name": "printers",
        "full_name": "acme/printers",
        "owner": { "login": "acme" },
    })
}
