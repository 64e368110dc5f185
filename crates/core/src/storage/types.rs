use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DateRangeError;

/// A single row as exchanged with the hosted store.
pub type Row = serde_json::Map<String, Value>;

/// Tables exposed by the hosted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Events,
    MeetingCategories,
    EventCategories,
    EventOrganizingMeetingCategories,
    EventOrganizingCategories,
    EventInvitees,
    EventAttendees,
    ParticipantMeetingCategories,
    Meetings,
}

impl Table {
    /// Every table, in a stable order.
    pub const ALL: [Table; 9] = [
        Table::Events,
        Table::MeetingCategories,
        Table::EventCategories,
        Table::EventOrganizingMeetingCategories,
        Table::EventOrganizingCategories,
        Table::EventInvitees,
        Table::EventAttendees,
        Table::ParticipantMeetingCategories,
        Table::Meetings,
    ];

    /// Returns the table name used by the hosted store.
    ///
    /// Meeting categories predate the rename and still live in the
    /// `commissions` family of tables.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Events => "events",
            Table::MeetingCategories => "commissions",
            Table::EventCategories => "event_categories",
            Table::EventOrganizingMeetingCategories => "event_organizing_commissions",
            Table::EventOrganizingCategories => "event_organizing_categories",
            Table::EventInvitees => "event_invitees",
            Table::EventAttendees => "event_attendees",
            Table::ParticipantMeetingCategories => "participant_commissions",
            Table::Meetings => "meetings",
        }
    }

    /// Returns true for many-to-many link tables.
    pub fn is_link_table(&self) -> bool {
        matches!(
            self,
            Table::EventOrganizingMeetingCategories
                | Table::EventOrganizingCategories
                | Table::EventInvitees
                | Table::EventAttendees
                | Table::ParticipantMeetingCategories
        )
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-column filter understood by the hosted store.
///
/// Filters passed together are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: &'static str, value: Value },
    /// `column IN (values...)`
    In {
        column: &'static str,
        values: Vec<Value>,
    },
}

impl Filter {
    /// Equality filter.
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq {
            column,
            value: value.into(),
        }
    }

    /// Equality filter on an id column.
    pub fn eq_id(column: &'static str, id: uuid::Uuid) -> Self {
        Self::eq(column, id.to_string())
    }

    /// Membership filter.
    pub fn is_in<I, V>(column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Membership filter on an id column.
    pub fn in_ids<'a, I>(column: &'static str, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a uuid::Uuid>,
    {
        Self::is_in(column, ids.into_iter().map(|id| id.to_string()))
    }

    /// Returns the column this filter applies to.
    pub fn column(&self) -> &'static str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } => column,
        }
    }

    /// Evaluates the filter against a row.
    ///
    /// A missing column never matches.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };
        match self {
            Filter::Eq { value, .. } => actual == value,
            Filter::In { values, .. } => values.contains(actual),
        }
    }
}

/// Returns true if the row satisfies every filter.
pub fn matches_all(filters: &[Filter], row: &Row) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

/// Opaque handle to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub bucket: String,
    pub path: String,
}

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for an entire month.
    ///
    /// Returns `None` if the year/month combination is invalid.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }?;
        let end = next.pred_opt()?;
        Some(Self { start, end })
    }

    /// Creates the month range containing the given date.
    pub fn month_of(date: NaiveDate) -> Self {
        // The first day of a valid date's month always exists.
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// Returns the month range following this one's start month.
    pub fn next_month(&self) -> Self {
        let next = self
            .start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(self.start);
        Self::month_of(next)
    }

    /// Returns the month range preceding this one's start month.
    pub fn previous_month(&self) -> Self {
        let previous = self
            .start
            .checked_sub_months(chrono::Months::new(1))
            .unwrap_or(self.start);
        Self::month_of(previous)
    }

    /// Returns true if the date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Events.name(), "events");
        assert_eq!(Table::MeetingCategories.name(), "commissions");
        assert_eq!(
            Table::EventOrganizingMeetingCategories.name(),
            "event_organizing_commissions"
        );
        assert_eq!(
            Table::ParticipantMeetingCategories.name(),
            "participant_commissions"
        );
        assert_eq!(Table::EventAttendees.to_string(), "event_attendees");
    }

    #[test]
    fn test_link_tables() {
        let links: Vec<_> = Table::ALL.iter().filter(|t| t.is_link_table()).collect();
        assert_eq!(links.len(), 5);
        assert!(!Table::Events.is_link_table());
        assert!(!Table::Meetings.is_link_table());
    }

    #[test]
    fn test_eq_filter_matches() {
        let id = Uuid::nil();
        let filter = Filter::eq_id("event_id", id);
        assert!(filter.matches(&row(json!({"event_id": id.to_string()}))));
        assert!(!filter.matches(&row(json!({"event_id": "other"}))));
        assert!(!filter.matches(&row(json!({"participant_id": id.to_string()}))));
    }

    #[test]
    fn test_in_filter_matches() {
        let filter = Filter::is_in("attendance_type", ["in_person", "online"]);
        assert!(filter.matches(&row(json!({"attendance_type": "online"}))));
        assert!(!filter.matches(&row(json!({"attendance_type": "remote"}))));
    }

    #[test]
    fn test_matches_all_combines_with_and() {
        let filters = [
            Filter::eq("event_id", "a"),
            Filter::is_in("participant_id", ["p1", "p2"]),
        ];
        assert!(matches_all(
            &filters,
            &row(json!({"event_id": "a", "participant_id": "p2"}))
        ));
        assert!(!matches_all(
            &filters,
            &row(json!({"event_id": "b", "participant_id": "p2"}))
        ));
        assert!(matches_all(&[], &row(json!({}))));
    }

    #[test]
    fn test_valid_range_construction() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let range = DateRange::new(start, end).unwrap();

        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert_eq!(
            DateRange::new(start, end),
            Err(DateRangeError::InvalidRange)
        );
    }

    #[test]
    fn test_month_factory_february_leap_year() {
        let range = DateRange::month(2024, 2).unwrap();

        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(DateRange::month(2024, 13).is_none());
    }

    #[test]
    fn test_month_navigation_crosses_years() {
        let december = DateRange::month(2023, 12).unwrap();
        let january = december.next_month();

        assert_eq!(january, DateRange::month(2024, 1).unwrap());
        assert_eq!(january.previous_month(), december);
    }

    #[test]
    fn test_month_of_mid_month_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 17).unwrap();
        assert_eq!(DateRange::month_of(date), DateRange::month(2024, 4).unwrap());
    }

    #[test]
    fn test_days_are_inclusive_and_ascending() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();

        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            ]
        );
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()));
    }
}
