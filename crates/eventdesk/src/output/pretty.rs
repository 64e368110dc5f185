//! Pretty output formatting.

use eventdesk_core::event::{CategoryCount, Event, EventParticipants};

use crate::views::{CategoryRow, Sidebar};

fn money(label: &str, amount: Option<f64>) -> String {
    amount
        .map(|a| format!("\n  {}: {:.2}", label, a))
        .unwrap_or_default()
}

/// Format an event for display.
pub fn format_event(event: &Event, organizer: &str) -> String {
    let status = if event.is_cancelled { " [cancelled]" } else { "" };
    let mut output = format!(
        "{}{}\n  ID: {}\n  Organizer: {}\n  When: {} {}-{}",
        event.subject,
        status,
        event.id,
        organizer,
        event.date,
        event.start_time.format("%H:%M"),
        event.end_time.format("%H:%M"),
    );
    if let Some(location) = &event.location {
        output.push_str(&format!("\n  Location: {}", location));
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[(&Event, String)]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for (event, organizer) in events {
        output.push_str(&format!("\n{}", format_event(event, organizer)));
        output.push('\n');
    }
    output
}

/// Format an event with its details and participants.
pub fn format_event_detail(event: &Event, organizer: &str, participants: &EventParticipants) -> String {
    let mut output = format_event(event, organizer);
    if let Some(description) = &event.description {
        output.push_str(&format!("\n  Description: {}", description));
    }
    output.push_str(&money("Cost", event.cost));
    output.push_str(&money("Investment", event.investment));
    output.push_str(&money("Revenue", event.revenue));
    if let Some(url) = &event.flyer_url {
        output.push_str(&format!("\n  Flyer: {}", url));
    }
    output.push_str(&format!(
        "\n  Invitees: {}\n  Attendees: {} in person, {} online, {} external",
        participants.invitee_ids.len(),
        participants.attendee_in_person_ids.len(),
        participants.attendee_online_ids.len(),
        event.external_participants_count,
    ));
    output
}

/// Format category rows for display.
pub fn format_category_rows(title: &str, rows: &[CategoryRow]) -> String {
    if rows.is_empty() {
        return format!("No {} found.", title.to_lowercase());
    }
    let mut output = format!("{} ({})\n", title.to_uppercase(), rows.len());
    output.push_str(&"-".repeat(40));
    for row in rows {
        output.push_str(&format!(
            "\n{}\n  ID: {}\n  Events: {}",
            row.name, row.id, row.events
        ));
        if row.participants > 0 || row.meetings > 0 {
            output.push_str(&format!(
                "\n  Participants: {}\n  Meetings: {}",
                row.participants, row.meetings
            ));
        }
        output.push('\n');
    }
    output
}

fn format_counts(title: &str, counts: &[CategoryCount]) -> String {
    let mut output = format!("{}\n", title);
    output.push_str(&"-".repeat(40));
    if counts.is_empty() {
        output.push_str("\n  (none)");
    }
    for count in counts {
        output.push_str(&format!("\n  {:<30} {:>5}", count.name, count.count));
    }
    output
}

/// Format the sidebar counts for display.
pub fn format_sidebar(sidebar: &Sidebar) -> String {
    format!(
        "{}\n\n{}",
        format_counts("COMMITTEES", &sidebar.meeting_categories),
        format_counts("CATEGORIES", &sidebar.event_categories)
    )
}
