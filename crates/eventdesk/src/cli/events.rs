//! Event CLI commands.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use eventdesk_core::event::{EventDraft, EventParticipants, OrganizerKind};
use eventdesk_core::storage::DateRange;

use super::{parse_month, parse_time};

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// CLI organizer kind (with clap ValueEnum).
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Organizer {
    /// Organized by meeting categories.
    #[default]
    Committee,
    /// Organized by event categories.
    Category,
}

impl From<Organizer> for OrganizerKind {
    fn from(o: Organizer) -> Self {
        match o {
            Organizer::Committee => OrganizerKind::MeetingCategory,
            Organizer::Category => OrganizerKind::Category,
        }
    }
}

/// Organizers, invitees and attendees.
#[derive(Debug, Clone, Args)]
pub struct ParticipantArgs {
    /// Organizer ID (repeatable).
    #[arg(long = "organizer")]
    pub organizers: Vec<Uuid>,
    /// Invitee participant ID (repeatable).
    #[arg(long = "invitee")]
    pub invitees: Vec<Uuid>,
    /// In-person attendee participant ID (repeatable).
    #[arg(long = "in-person")]
    pub in_person: Vec<Uuid>,
    /// Online attendee participant ID (repeatable).
    #[arg(long = "online")]
    pub online: Vec<Uuid>,
}

impl ParticipantArgs {
    pub fn is_empty(&self) -> bool {
        self.organizers.is_empty()
            && self.invitees.is_empty()
            && self.in_person.is_empty()
            && self.online.is_empty()
    }

    pub fn into_participants(self) -> EventParticipants {
        EventParticipants::new()
            .with_organizers(self.organizers)
            .with_invitees(self.invitees)
            .with_in_person_attendees(self.in_person)
            .with_online_attendees(self.online)
    }
}

/// Fields of `events create`.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Event subject.
    #[arg(long)]
    pub subject: String,
    /// Which kind of category organizes the event.
    #[arg(long, value_enum, default_value = "committee")]
    pub organizer_kind: Organizer,
    /// Event date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    /// Repeat the event every day up to this date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    pub until: Option<NaiveDate>,
    /// Start time (HH:MM).
    #[arg(long, value_parser = parse_time)]
    pub start: NaiveTime,
    /// End time (HH:MM).
    #[arg(long, value_parser = parse_time)]
    pub end: NaiveTime,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub investment: Option<f64>,
    #[arg(long)]
    pub revenue: Option<f64>,
    /// Participants not registered in the system.
    #[arg(long, default_value = "0")]
    pub external: u32,
    /// Flyer image to upload.
    #[arg(long)]
    pub flyer: Option<PathBuf>,
    #[command(flatten)]
    pub participants: ParticipantArgs,
}

impl CreateArgs {
    /// Builds the draft from the scalar fields.
    pub fn draft(&self) -> EventDraft {
        let mut draft = EventDraft::new(
            self.subject.clone(),
            self.organizer_kind.into(),
            self.date,
            self.start,
            self.end,
        )
        .with_finances(self.cost, self.investment, self.revenue)
        .with_external_participants(self.external);
        draft.location = self.location.clone();
        draft.description = self.description.clone();
        draft
    }
}

/// Fields of `events update`. Omitted fields keep their current value.
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Event ID.
    pub id: Uuid,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long, value_enum)]
    pub organizer_kind: Option<Organizer>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_time)]
    pub start: Option<NaiveTime>,
    #[arg(long, value_parser = parse_time)]
    pub end: Option<NaiveTime>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub investment: Option<f64>,
    #[arg(long)]
    pub revenue: Option<f64>,
    #[arg(long)]
    pub external: Option<u32>,
    /// Replaces every participant list when any participant flag is given.
    #[command(flatten)]
    pub participants: ParticipantArgs,
}

impl UpdateArgs {
    /// Applies the given fields on top of the current draft.
    pub fn apply(&self, mut draft: EventDraft) -> EventDraft {
        if let Some(subject) = &self.subject {
            draft.subject = subject.clone();
        }
        if let Some(kind) = self.organizer_kind {
            draft.organizer_type = kind.into();
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(start) = self.start {
            draft.start_time = start;
        }
        if let Some(end) = self.end {
            draft.end_time = end;
        }
        if self.location.is_some() {
            draft.location = self.location.clone();
        }
        if self.description.is_some() {
            draft.description = self.description.clone();
        }
        draft.cost = self.cost.or(draft.cost);
        draft.investment = self.investment.or(draft.investment);
        draft.revenue = self.revenue.or(draft.revenue);
        if let Some(external) = self.external {
            draft.external_participants_count = external;
        }
        draft
    }
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events of a month.
    List {
        /// Month (YYYY-MM). Defaults to the current month.
        #[arg(long, value_parser = parse_month)]
        month: Option<DateRange>,
        /// Case-insensitive match on subject and location.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show an event with its participants.
    Show {
        /// Event ID.
        id: Uuid,
    },
    /// Create one event, or one per day with --until.
    Create(CreateArgs),
    /// Update an event and its participants.
    Update(UpdateArgs),
    /// Delete an event and its links.
    Delete {
        /// Event ID.
        id: Uuid,
    },
    /// Cancel an event, or restore it with --restore.
    Cancel {
        /// Event ID.
        id: Uuid,
        #[arg(long)]
        restore: bool,
    },
    /// Email the attendees of an event.
    Notify {
        /// Event ID.
        id: Uuid,
    },
}
