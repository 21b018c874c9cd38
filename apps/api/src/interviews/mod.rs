// Interview preparation: free-form notes, a question bank, and scheduled interviews.

pub mod handlers;
pub mod notes;
pub mod questions;
pub mod scheduled;
pub mod validation;

pub use notes::InterviewNoteService;
pub use questions::InterviewQuestionService;
pub use scheduled::ScheduledInterviewService;
