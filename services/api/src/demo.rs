use crate::infra::{InMemoryActivityLog, InMemoryCandidateRepository};
use clap::Args;
use recruit_ai::error::AppError;
use recruit_ai::workflows::candidates::{
    CandidateId, CandidateValidationService, NewCandidate, Resolution, ReviewTrack, ReviewerId,
    StatusResolver, ValidationDecision, ValidationSubmission,
};
use recruit_ai::workflows::validation_export::{ValidationExportImporter, ValidationHistories};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatusResolveArgs {
    /// Validation export CSV (id,candidate_id,user_id,type,status,justification,created_at)
    #[arg(long)]
    pub(crate) validations: PathBuf,
    /// Treat candidates as technical positions requiring a tech review
    #[arg(long)]
    pub(crate) technical: bool,
    /// Only resolve the given candidate
    #[arg(long)]
    pub(crate) candidate: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the technical candidate walkthrough.
    #[arg(long)]
    pub(crate) skip_technical: bool,
}

pub(crate) fn run_status_resolve(args: StatusResolveArgs) -> Result<(), AppError> {
    let StatusResolveArgs {
        validations,
        technical,
        candidate,
    } = args;

    let histories = ValidationExportImporter::from_path(&validations)?;
    let resolutions = resolve_histories(&histories, technical, candidate.as_deref());

    if resolutions.is_empty() {
        println!("No matching candidates in {}", validations.display());
        return Ok(());
    }

    println!(
        "Resolved {} candidate(s) ({} review)",
        resolutions.len(),
        if technical { "technical" } else { "sales-only" }
    );
    for (candidate_id, resolution) in resolutions {
        println!(
            "- {}: {} ({})",
            candidate_id, resolution.status, resolution.rationale
        );
    }

    Ok(())
}

pub(crate) fn resolve_histories(
    histories: &ValidationHistories,
    technical: bool,
    only: Option<&str>,
) -> Vec<(CandidateId, Resolution)> {
    histories
        .iter()
        .filter(|(candidate_id, _)| only.map_or(true, |wanted| candidate_id.0 == wanted))
        .map(|(candidate_id, records)| {
            (
                candidate_id.clone(),
                StatusResolver.explain(records, technical),
            )
        })
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryCandidateRepository::default());
    let activity = Arc::new(InMemoryActivityLog::default());
    let service = CandidateValidationService::new(repository, activity.clone());

    println!("Candidate validation demo");

    let mut walkthroughs = vec![(
        NewCandidate {
            full_name: "Lea Martin".to_string(),
            position: "Account Executive".to_string(),
            is_technical_position: false,
        },
        vec![approval("sales-lead", ReviewTrack::Sales)],
    )];
    if !args.skip_technical {
        walkthroughs.push((
            NewCandidate {
                full_name: "Hugo Bernard".to_string(),
                position: "Platform Engineer".to_string(),
                is_technical_position: true,
            },
            vec![
                approval("sales-lead", ReviewTrack::Sales),
                approval("tech-lead", ReviewTrack::Tech),
            ],
        ));
        walkthroughs.push((
            NewCandidate {
                full_name: "Nora Petit".to_string(),
                position: "Data Engineer".to_string(),
                is_technical_position: true,
            },
            vec![
                approval("sales-lead", ReviewTrack::Sales),
                rejection(
                    "tech-lead",
                    ReviewTrack::Tech,
                    "system design interview below bar",
                ),
            ],
        ));
    }

    for (candidate, submissions) in walkthroughs {
        let record = match service.register(candidate) {
            Ok(record) => record,
            Err(err) => {
                println!("  Registration failed: {}", err);
                continue;
            }
        };
        let id = record.profile.candidate_id.clone();
        println!(
            "\n{} ({}, technical: {})",
            record.profile.full_name, record.profile.position, record.profile.is_technical_position
        );

        match service.submit_for_review(&id) {
            Ok(record) => println!("  submitted -> {}", record.status),
            Err(err) => {
                println!("  Submission failed: {}", err);
                continue;
            }
        }

        for submission in submissions {
            let reviewer = submission.reviewer_id.clone();
            match service.record_validation(&id, submission) {
                Ok(receipt) => println!(
                    "  {} {} by {}: {} -> {}",
                    receipt.record.track,
                    receipt.record.decision.label(),
                    reviewer,
                    receipt.previous_status,
                    receipt.status
                ),
                Err(err) => println!("  Validation refused for {}: {}", reviewer, err),
            }
        }

        match service.get(&id) {
            Ok(record) => {
                let view = record.status_view();
                println!("  final status: {} ({})", view.status, view.rationale);
            }
            Err(err) => println!("  Lookup failed: {}", err),
        }
    }

    let events = activity.events();
    println!("\nActivity log: {} event(s)", events.len());
    for event in events {
        match event.transition {
            Some(transition) => println!(
                "  - {:?} {} ({} -> {})",
                event.kind, event.candidate_id, transition.from, transition.to
            ),
            None => println!("  - {:?} {}", event.kind, event.candidate_id),
        }
    }

    Ok(())
}

fn approval(reviewer: &str, track: ReviewTrack) -> ValidationSubmission {
    ValidationSubmission {
        reviewer_id: ReviewerId(reviewer.to_string()),
        track,
        decision: ValidationDecision::Approved,
        justification: None,
        submitted_at: None,
    }
}

fn rejection(reviewer: &str, track: ReviewTrack, reason: &str) -> ValidationSubmission {
    ValidationSubmission {
        decision: ValidationDecision::Rejected,
        justification: Some(reason.to_string()),
        ..approval(reviewer, track)
    }
}
