pub mod egress_webhook;
pub mod interview_credits;
pub mod payments;
pub mod recordings;
