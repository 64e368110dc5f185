//! The 4-step create wizard and the single-screen edit form.

use uuid::Uuid;

use crate::event::{
    validate_amounts, validate_event_draft, validate_organizers, EventDraft, EventError,
    EventParticipants, FlyerUpload, OrganizerKind, Schedule, ScheduleEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    /// Subject and organizers.
    Basics,
    Schedule,
    Participants,
    /// Finances and flyer.
    Details,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Basics,
        WizardStep::Schedule,
        WizardStep::Participants,
        WizardStep::Details,
    ];

    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Basics => "Subject & organizers",
            WizardStep::Schedule => "Schedule",
            WizardStep::Participants => "Participants",
            WizardStep::Details => "Finances & media",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.number()).copied()
    }

    fn previous(self) -> Option<Self> {
        self.number().checked_sub(2).map(|i| Self::ALL[i])
    }
}

/// Everything the create orchestrator needs, collected by the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSubmission {
    pub draft: EventDraft,
    pub schedules: Vec<ScheduleEntry>,
    pub participants: EventParticipants,
    pub flyer: Option<FlyerUpload>,
}

/// Create flow state.
///
/// Advancing validates the current step; going back never does.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWizard {
    step: WizardStep,
    pub draft: EventDraft,
    pub schedule: Schedule,
    pub participants: EventParticipants,
    pub flyer: Option<FlyerUpload>,
}

impl CreateWizard {
    pub fn new(draft: EventDraft) -> Self {
        Self {
            step: WizardStep::Basics,
            draft,
            schedule: Schedule::new(),
            participants: EventParticipants::new(),
            flyer: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step == WizardStep::Details
    }

    /// Validates the current step on its own.
    pub fn validate_step(&self) -> Result<(), EventError> {
        match self.step {
            WizardStep::Basics => {
                if self.draft.subject.trim().is_empty() {
                    return Err(EventError::EmptySubject);
                }
                validate_organizers(&self.participants)
            }
            WizardStep::Schedule => {
                if self.schedule.is_empty() {
                    return Err(EventError::EmptySchedule);
                }
                Ok(())
            }
            WizardStep::Participants => Ok(()),
            WizardStep::Details => validate_amounts(&self.draft),
        }
    }

    /// Moves to the next step if the current one is valid.
    pub fn next(&mut self) -> Result<WizardStep, EventError> {
        self.validate_step()?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Validates every step and hands the collected data over.
    ///
    /// The wizard is left untouched on error so the user can fix it.
    pub fn finish(&self) -> Result<EventSubmission, EventError> {
        let schedules = self.schedule.entries().to_vec();
        let first = schedules.first().ok_or(EventError::EmptySchedule)?;
        validate_event_draft(&self.draft.for_schedule(first))?;
        validate_organizers(&self.participants)?;

        Ok(EventSubmission {
            draft: self.draft.clone(),
            schedules,
            participants: self.participants.clone(),
            flyer: self.flyer.clone(),
        })
    }
}

/// Edit flow state: one screen, validated on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub draft: EventDraft,
    pub participants: EventParticipants,
    opened_as: OrganizerKind,
    opened_organizers: Vec<Uuid>,
}

impl EditForm {
    pub fn new(draft: EventDraft, participants: EventParticipants) -> Self {
        Self {
            opened_as: draft.organizer_type,
            opened_organizers: participants.organizer_ids.clone(),
            draft,
            participants,
        }
    }

    pub fn validate(&self) -> Result<(), EventError> {
        validate_event_draft(&self.draft)
    }

    /// Participants to submit.
    ///
    /// Organizer ids belong to one category namespace. When the organizer kind
    /// changed and the organizers were not picked again, the old ids are dropped.
    pub fn submitted_participants(&self) -> EventParticipants {
        let mut participants = self.participants.clone();
        if self.draft.organizer_type != self.opened_as
            && participants.organizer_ids == self.opened_organizers
        {
            participants.organizer_ids.clear();
        }
        participants
    }
}
