use super::super::domain::ValidationDecision::{Approved, Rejected};
use super::super::domain::{ReviewTrack, ValidationDecision};
use super::latest::LatestDecisions;
use super::ResolvedStatus;

pub(crate) fn decide_status(
    latest: &LatestDecisions<'_>,
    requires_technical: bool,
) -> ResolvedStatus {
    let sales = latest.decision(ReviewTrack::Sales);

    if !requires_technical {
        // Tech records on a non-technical candidate carry no weight.
        return match sales {
            None => ResolvedStatus::PendingSales,
            Some(Approved) => ResolvedStatus::Validated,
            Some(Rejected) => ResolvedStatus::Rejected,
        };
    }

    decide_technical(latest.decision(ReviewTrack::Tech), sales)
}

fn decide_technical(
    tech: Option<ValidationDecision>,
    sales: Option<ValidationDecision>,
) -> ResolvedStatus {
    match (tech, sales) {
        (Some(Rejected), _) => ResolvedStatus::Rejected,
        (Some(Approved), Some(Approved)) => ResolvedStatus::Validated,
        (Some(Approved), None) => ResolvedStatus::PendingSales,
        // Once tech has signed off, a sales rejection cannot block the candidate.
        (Some(Approved), Some(Rejected)) => ResolvedStatus::Validated,
        (None, _) => ResolvedStatus::PendingTech,
    }
}

pub(crate) fn rationale(
    status: ResolvedStatus,
    latest: &LatestDecisions<'_>,
    requires_technical: bool,
) -> String {
    let sales = latest.decision(ReviewTrack::Sales);
    let tech = latest.decision(ReviewTrack::Tech);

    match status {
        ResolvedStatus::PendingSales if requires_technical => {
            "technical review approved; awaiting sales review".to_string()
        }
        ResolvedStatus::PendingSales => "awaiting sales review".to_string(),
        ResolvedStatus::PendingTech => match sales {
            Some(decision) => format!(
                "awaiting technical review (sales already {})",
                decision.label()
            ),
            None => "awaiting technical review".to_string(),
        },
        ResolvedStatus::Validated if requires_technical && sales == Some(Rejected) => {
            "technical approval takes precedence over sales rejection".to_string()
        }
        ResolvedStatus::Validated if requires_technical => {
            "approved by technical and sales reviewers".to_string()
        }
        ResolvedStatus::Validated => "approved by sales reviewer".to_string(),
        ResolvedStatus::Rejected if requires_technical && tech == Some(Rejected) => {
            "rejected by technical reviewer".to_string()
        }
        ResolvedStatus::Rejected => "rejected by sales reviewer".to_string(),
        ResolvedStatus::Pending => "pending validation".to_string(),
    }
}
