//! Alert selection and rendering.
//!
//! Decides which scraped ticket events are worth mailing subscribers about
//! and renders the HTML alert body.

use std::collections::HashSet;

use crate::models::event::TicketEvent;

pub const ALERT_SUBJECT: &str = "🚨 TICKETS WAITING FOR YOU!";

/// Statuses that never trigger an alert.
const QUIET_STATUSES: [&str; 2] = ["COMING SOON", "SOLD OUT"];

/// Pick the events worth alerting on: an active ticket status we have not
/// alerted on before. Identity is the full (date, teams, status) triple, so
/// a status flip on a known event alerts again.
pub fn find_new_status_events(
    events: &[TicketEvent],
    already_held: &[TicketEvent],
) -> Vec<TicketEvent> {
    let held: HashSet<_> = already_held
        .iter()
        .map(|e| (e.date.as_str(), e.teams.as_slice(), e.status.as_str()))
        .collect();

    events
        .iter()
        .filter(|e| !QUIET_STATUSES.contains(&e.status.as_str()))
        .filter(|e| !held.contains(&(e.date.as_str(), e.teams.as_slice(), e.status.as_str())))
        .cloned()
        .collect()
}

/// Render the responsive HTML alert body for a batch of new events.
pub fn render_alert_email(events: &[TicketEvent], shop_url: &str) -> String {
    let mut rows = String::new();
    for event in events {
        rows.push_str(&format!(
            r#"                <tr style="background-color: #f9f9f9; border-bottom: 1px solid #e5e5e5;">
                    <td class="table-cell" style="padding: 14px 20px; font-size: 16px; color: #333333;">{}</td>
                    <td class="table-cell" style="padding: 14px 20px; font-size: 16px; color: #333333;">{}</td>
                    <td class="table-cell" style="padding: 14px 20px; font-size: 16px; color: #28a745; font-weight: bold;">{}</td>
                </tr>
"#,
            event.date,
            event.teams.join(" vs "),
            event.status,
        ));
    }

    format!(
        r#"<html>
<head>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        @media only screen and (max-width: 600px) {{
            .container {{ padding: 20px !important; }}
            .table-header, .table-cell {{ display: block; width: 100% !important; text-align: left !important; }}
            .cta-button {{ padding: 12px 20px !important; font-size: 16px !important; }}
            .header-text {{ font-size: 24px !important; }}
            .sub-text {{ font-size: 16px !important; }}
        }}
    </style>
</head>
<body style="font-family: 'Helvetica Neue', Arial, sans-serif; background-color: #f7f9fc; padding: 50px;">
    <div class="container" style="background-color: #ffffff; padding: 40px; border-radius: 12px; border: 1px solid #e5e5e5; max-width: 650px; margin: auto;">
        <div style="text-align: center; margin-bottom: 30px;">
            <h2 class="header-text" style="color: #d6336c; font-size: 32px; margin-top: 20px; font-weight: 600;">🚨 New Ticket Alert! 🚨</h2>
            <p class="sub-text" style="font-size: 18px; color: #555555; line-height: 1.6; max-width: 500px; margin: auto;">Below are the latest updates on ticket availability for upcoming events.</p>
        </div>
        <div style="text-align: center; margin-top: 30px;">
            <a href="{shop_url}" class="cta-button" style="background-color: #d6336c; color: white; padding: 15px 30px; font-size: 18px; font-weight: 600; border-radius: 8px; text-decoration: none; display: inline-block;">Grab Your Tickets Now! 🎟️</a>
        </div>
        <table style="width: 100%; border-collapse: collapse; margin-bottom: 30px; margin-top: 30px;">
            <thead>
                <tr>
                    <th class="table-header" style="background-color: #d6336c; color: #ffffff; padding: 12px 18px; text-align: left; font-weight: 600; font-size: 16px;">Date</th>
                    <th class="table-header" style="background-color: #d6336c; color: #ffffff; padding: 12px 18px; text-align: left; font-weight: 600; font-size: 16px;">Teams</th>
                    <th class="table-header" style="background-color: #d6336c; color: #ffffff; padding: 12px 18px; text-align: left; font-weight: 600; font-size: 16px;">Status</th>
                </tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
        <div style="margin-top: 40px; text-align: center; font-size: 14px; color: #888888;">
            <p>This is an automated alert from <strong>Ticket Alert</strong>.</p>
        </div>
    </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str, teams: &[&str], status: &str) -> TicketEvent {
        TicketEvent {
            date: date.to_string(),
            teams: teams.iter().map(|t| t.to_string()).collect(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_quiet_statuses_never_alert() {
        let events = vec![
            event("Apr 12, 2025 07:30 PM", &["A", "B"], "COMING SOON"),
            event("Apr 13, 2025 07:30 PM", &["A", "C"], "SOLD OUT"),
        ];
        assert!(find_new_status_events(&events, &[]).is_empty());
    }

    #[test]
    fn test_active_status_alerts_once() {
        let active = event("Apr 12, 2025 07:30 PM", &["A", "B"], "BUY NOW");
        let fresh = find_new_status_events(std::slice::from_ref(&active), &[]);
        assert_eq!(fresh, vec![active.clone()]);

        // Once held, the same signature is quiet.
        let again = find_new_status_events(std::slice::from_ref(&active), &fresh);
        assert!(again.is_empty());
    }

    #[test]
    fn test_status_flip_alerts_again() {
        let held = vec![event("Apr 12, 2025 07:30 PM", &["A", "B"], "FAST FILLING")];
        let now = vec![event("Apr 12, 2025 07:30 PM", &["A", "B"], "BUY NOW")];
        assert_eq!(find_new_status_events(&now, &held).len(), 1);
    }

    #[test]
    fn test_render_includes_every_event_row() {
        let events = vec![
            event("Apr 12, 2025 07:30 PM", &["A", "B"], "BUY NOW"),
            event("Apr 13, 2025 07:30 PM", &["C"], "FAST FILLING"),
        ];
        let body = render_alert_email(&events, "https://shop.example.com/ticket");

        assert!(body.contains("A vs B"));
        assert!(body.contains("BUY NOW"));
        assert!(body.contains("FAST FILLING"));
        assert!(body.contains("https://shop.example.com/ticket"));
    }
}
