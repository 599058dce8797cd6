pub mod column;
pub mod decision;
pub mod lead;
pub mod processing;

pub use column::CanonicalColumn;
pub use decision::{DecisionAction, MappingDecision, MappingDecisionRecord};
pub use lead::{Lead, LeadIdentity, LeadStatus};
pub use processing::{IngestOutcome, MappingRequest, PendingUpload, ProcessingRun, RunSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_rates() {
        let summary = RunSummary::new("leads.csv", 3, 1, 1, 1);
        assert_eq!(summary.success_rate, 33.3);
        let empty = RunSummary::new("empty.csv", 0, 0, 0, 0);
        assert_eq!(empty.success_rate, 0.0);
        let full = RunSummary::new("leads.csv", 1, 1, 0, 0);
        assert_eq!(full.success_rate, 100.0);
    }

    #[test]
    fn status_round_trips() {
        assert_eq!("active".parse::<LeadStatus>().unwrap(), LeadStatus::Active);
        assert_eq!(
            "Duplicate".parse::<LeadStatus>().unwrap(),
            LeadStatus::Duplicate
        );
        assert!("archived".parse::<LeadStatus>().is_err());
        assert_eq!(LeadStatus::Active.as_str(), "Active");
    }

    #[test]
    fn decision_serializes_tagged() {
        let decision = MappingDecision::CreateColumn {
            header: "Zip Code".to_string(),
            name: "zip_code".to_string(),
            required: false,
        };
        let json = serde_json::to_string(&decision).expect("serialize decision");
        assert!(json.contains("\"action\":\"create_column\""));
        let round: MappingDecision = serde_json::from_str(&json).expect("deserialize decision");
        assert_eq!(round, decision);
        assert_eq!(round.target_column(), "zip_code");
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = IngestOutcome::Success(RunSummary::new("leads.csv", 2, 2, 0, 0));
        let json = serde_json::to_string(&outcome).expect("serialize outcome");
        assert!(json.contains("\"status\":\"success\""));
        let round: IngestOutcome = serde_json::from_str(&json).expect("deserialize outcome");
        assert_eq!(round.summary().map(|s| s.new_leads), Some(2));
    }
}
