use std::sync::Arc;

use crate::applications::ApplicationService;
use crate::config::Config;
use crate::documents::DocumentService;
use crate::interviews::{InterviewNoteService, InterviewQuestionService, ScheduledInterviewService};
use crate::reminders::ReminderService;
use crate::store::RecordStore;
use crate::templates::TemplateService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Backing record store. Every service below holds a handle to the same store.
    pub store: Arc<dyn RecordStore>,
    pub applications: ApplicationService,
    pub documents: DocumentService,
    pub reminders: ReminderService,
    pub notes: InterviewNoteService,
    pub questions: InterviewQuestionService,
    pub interviews: ScheduledInterviewService,
    pub templates: TemplateService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            applications: ApplicationService::new(Arc::clone(&store)),
            documents: DocumentService::new(Arc::clone(&store)),
            reminders: ReminderService::new(Arc::clone(&store)),
            notes: InterviewNoteService::new(Arc::clone(&store)),
            questions: InterviewQuestionService::new(Arc::clone(&store)),
            interviews: ScheduledInterviewService::new(Arc::clone(&store)),
            templates: TemplateService::new(Arc::clone(&store)),
            config,
            store,
        }
    }
}
