pub mod interviewer;
pub mod job;
