//! Task types and the task instance entity.
//!
//! A task is in exactly one of three logical states at any time:
//! queued (in the store's queue), active (in the store's single slot),
//! or resolved (completed or expired, never touched again).

use crate::types::{GameMinutes, TaskId};
use serde::{Deserialize, Serialize};

/// Every kind of broker task the engine can spawn.
/// Variants are appended only. The tutorial order lives in config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    AcordForm,
    CarrierSubmission,
    QuoteComparison,
    CoiIssuance,
    FollowUpEmail,
    RenewalProcessing,
    DiscoveryCall,
    ProposalPresentation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Routine paperwork.
    Admin,
    /// Reading quotes side by side.
    Comparison,
    /// Relationship work. Never automatable.
    Gold,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        TaskType::AcordForm,
        TaskType::CarrierSubmission,
        TaskType::QuoteComparison,
        TaskType::CoiIssuance,
        TaskType::FollowUpEmail,
        TaskType::RenewalProcessing,
        TaskType::DiscoveryCall,
        TaskType::ProposalPresentation,
    ];

    pub const ADMIN: [TaskType; 5] = [
        TaskType::AcordForm,
        TaskType::CarrierSubmission,
        TaskType::CoiIssuance,
        TaskType::FollowUpEmail,
        TaskType::RenewalProcessing,
    ];

    pub const GOLD: [TaskType; 2] = [TaskType::DiscoveryCall, TaskType::ProposalPresentation];

    pub fn category(&self) -> TaskCategory {
        match self {
            Self::DiscoveryCall | Self::ProposalPresentation => TaskCategory::Gold,
            Self::QuoteComparison => TaskCategory::Comparison,
            _ => TaskCategory::Admin,
        }
    }

    pub fn is_gold(&self) -> bool {
        self.category() == TaskCategory::Gold
    }

    /// Stable kebab-case name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AcordForm => "acord-form",
            Self::CarrierSubmission => "carrier-submission",
            Self::QuoteComparison => "quote-comparison",
            Self::CoiIssuance => "coi-issuance",
            Self::FollowUpEmail => "follow-up-email",
            Self::RenewalProcessing => "renewal-processing",
            Self::DiscoveryCall => "discovery-call",
            Self::ProposalPresentation => "proposal-presentation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AcordForm => "ACORD 125 Application",
            Self::CarrierSubmission => "Carrier Submission",
            Self::QuoteComparison => "Quote Comparison",
            Self::CoiIssuance => "Certificate of Insurance",
            Self::FollowUpEmail => "Underwriter Follow-up",
            Self::RenewalProcessing => "Renewal Review",
            Self::DiscoveryCall => "Discovery Call",
            Self::ProposalPresentation => "Proposal Presentation",
        }
    }

    /// The automation tool that takes over this task type once unlocked.
    /// Gold types have none.
    pub fn assisting_tool(&self) -> Option<&'static str> {
        match self {
            Self::AcordForm | Self::CarrierSubmission => Some("smart-applications"),
            Self::QuoteComparison => Some("instant-quote"),
            Self::CoiIssuance => Some("auto-coi"),
            Self::RenewalProcessing => Some("renewal-autopilot"),
            Self::FollowUpEmail => Some("smart-followups"),
            Self::DiscoveryCall | Self::ProposalPresentation => None,
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskInstance {
    pub id:                TaskId,
    pub task_type:         TaskType,
    pub client_name:       String,
    pub business_name:     String,
    /// Opaque data for the widget that renders this task.
    pub scenario:          serde_json::Value,
    pub created_at_game_minutes: GameMinutes,
    pub remaining_deadline_seconds: f64,
    pub original_deadline_seconds:  f64,
    pub is_gold:           bool,
    /// Fixed at creation. A task spawned before the unlock stays unassisted.
    pub capability_assisted: bool,
    pub status:            TaskStatus,
}

impl TaskInstance {
    /// Fraction of the original deadline still left, in [0, 1].
    /// Display only.
    pub fn urgency_ratio(&self) -> f64 {
        if self.original_deadline_seconds <= 0.0 {
            return 0.0;
        }
        (self.remaining_deadline_seconds / self.original_deadline_seconds).clamp(0.0, 1.0)
    }
}
