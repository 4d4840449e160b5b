/// Credit points awarded to the submitter when a report is approved
pub const CREDIT_AWARD_PER_APPROVAL: i64 = 1;

/// Reasoning text stored when the model reply carried none
pub const DEFAULT_REASONING: &str = "No reasoning provided.";
