mod error;
mod links;
mod operations;
mod requests;
mod schedule;
mod types;

pub use error::{EventError, ScheduleError};
pub use links::{diff_links, EventLinks, LinkDiff};
pub use operations::{
    filter_events, matches_search, tally_organizers, validate_amounts, validate_event_draft,
    validate_organizers, CategoryCount, OrganizerIndex, UNSPECIFIED_ORGANIZER,
};
pub use requests::{EventDraft, EventParticipants, FlyerUpload};
pub use schedule::{expand_date_range, Schedule, ScheduleEntry};
pub use types::{
    AttendanceType, Category, CategoryKind, Event, EventAttendee, EventInvitee,
    EventOrganizingCategory, EventOrganizingMeetingCategory, Meeting, OrganizerKind,
    ParticipantMeetingCategory,
};
