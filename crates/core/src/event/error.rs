use thiserror::Error;

/// Errors that can occur when validating an event before it is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event subject cannot be empty")]
    EmptySubject,
    #[error("Event subject too long (max 200 characters)")]
    SubjectTooLong,
    #[error("At least one organizer is required")]
    MissingOrganizer,
    #[error("At least one schedule entry is required")]
    EmptySchedule,
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Errors that can occur while building a schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("End date must be after or equal to start date")]
    InvalidDateRange,
    #[error("Schedule entry already added for {0}")]
    Duplicate(chrono::NaiveDate),
    #[error("No schedule entry at position {0}")]
    OutOfBounds(usize),
}
