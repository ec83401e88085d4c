//! Scan analytics aggregation.
//!
//! Pure functions over visit and reminder rows fetched elsewhere. Day
//! buckets are computed in UTC relative to an explicit `now`.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Days covered by the overview chart.
pub const OVERVIEW_DAYS: u32 = 30;
/// Days covered by the per-reminder chart.
pub const DETAIL_DAYS: u32 = 7;
/// Title shown for visits whose reminder no longer exists.
pub const REMOVED_REMINDER_TITLE: &str = "Removed reminder";

/// How a scanner viewed the reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Flat message card.
    Card,
    /// AR avatar overlay.
    Ar,
}

/// One recorded QR scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Reminder the QR belongs to.
    pub reminder_id: String,
    /// When the scan happened.
    pub visited_at: DateTime<Utc>,
    /// How it was viewed, when known.
    #[serde(default)]
    pub view_mode: Option<ViewMode>,
    /// Scanner user agent, when recorded.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// A reminder as needed for labelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderInfo {
    /// Reminder id.
    pub id: String,
    /// Reminder title.
    pub title: String,
    /// Location name, when the reminder has one.
    #[serde(default)]
    pub location: Option<String>,
}

/// Visits on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// `dd/MM` label.
    pub date: String,
    /// Number of visits.
    pub count: u64,
}

/// Per-reminder totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderVisits {
    /// Reminder id.
    pub reminder_id: String,
    /// Title, or [`REMOVED_REMINDER_TITLE`].
    pub title: String,
    /// Location name.
    pub location: Option<String>,
    /// Number of visits.
    pub total_visits: u64,
    /// Most recent visit.
    pub last_visit: Option<DateTime<Utc>>,
    /// Card views.
    pub card_views: u64,
    /// AR views.
    pub ar_views: u64,
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    /// All visits.
    pub total_visits: u64,
    /// Visits since the first day of the current month.
    pub visits_this_month: u64,
    /// Visits per distinct scanned reminder.
    pub avg_per_qr: f64,
    /// Daily counts, oldest first.
    pub visits_by_day: Vec<DayCount>,
    /// Per-reminder rows, busiest first.
    pub visits_by_qr: Vec<ReminderVisits>,
}

/// Summary for a single reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDetail {
    /// All visits.
    pub total_visits: u64,
    /// Card views.
    pub card_views: u64,
    /// AR views.
    pub ar_views: u64,
    /// Daily counts, oldest first.
    pub visits_by_day: Vec<DayCount>,
    /// Visits from phones and tablets.
    pub mobile_visits: u64,
    /// Visits from other agents.
    pub desktop_visits: u64,
}

/// Whether a user agent looks like a phone or tablet.
#[must_use]
pub fn is_mobile_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ["mobile", "android", "iphone", "ipad"]
        .iter()
        .any(|needle| ua.contains(needle))
}

/// Count visits per day for the `days` days ending today, oldest first.
#[must_use]
pub fn daily_counts(visits: &[Visit], now: DateTime<Utc>, days: u32) -> Vec<DayCount> {
    let today = now.date_naive();
    let dates: Vec<NaiveDate> = (0..days)
        .rev()
        .map(|i| today - Duration::days(i64::from(i)))
        .collect();
    let mut counts: HashMap<NaiveDate, u64> = dates.iter().map(|d| (*d, 0)).collect();
    for visit in visits {
        if let Some(count) = counts.get_mut(&visit.visited_at.date_naive()) {
            *count += 1;
        }
    }
    dates
        .into_iter()
        .map(|d| DayCount {
            date: d.format("%d/%m").to_string(),
            count: counts.get(&d).copied().unwrap_or(0),
        })
        .collect()
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Build the dashboard overview.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overview(
    visits: &[Visit],
    reminders: &[ReminderInfo],
    now: DateTime<Utc>,
) -> AnalyticsOverview {
    let since = month_start(now);
    let visits_this_month = visits.iter().filter(|v| v.visited_at >= since).count() as u64;

    let mut per_qr: HashMap<&str, ReminderVisits> = HashMap::new();
    for visit in visits {
        let row = per_qr
            .entry(visit.reminder_id.as_str())
            .or_insert_with(|| ReminderVisits {
                reminder_id: visit.reminder_id.clone(),
                title: String::new(),
                location: None,
                total_visits: 0,
                last_visit: None,
                card_views: 0,
                ar_views: 0,
            });
        row.total_visits += 1;
        if row.last_visit < Some(visit.visited_at) {
            row.last_visit = Some(visit.visited_at);
        }
        match visit.view_mode {
            Some(ViewMode::Card) => row.card_views += 1,
            Some(ViewMode::Ar) => row.ar_views += 1,
            None => {}
        }
    }

    let by_id: HashMap<&str, &ReminderInfo> =
        reminders.iter().map(|r| (r.id.as_str(), r)).collect();
    let mut visits_by_qr: Vec<ReminderVisits> = per_qr
        .into_values()
        .map(|mut row| {
            match by_id.get(row.reminder_id.as_str()) {
                Some(info) => {
                    row.title.clone_from(&info.title);
                    row.location.clone_from(&info.location);
                }
                None => row.title = REMOVED_REMINDER_TITLE.to_string(),
            }
            row
        })
        .collect();
    visits_by_qr.sort_by(|a, b| {
        b.total_visits
            .cmp(&a.total_visits)
            .then_with(|| a.reminder_id.cmp(&b.reminder_id))
    });

    let total_visits = visits.len() as u64;
    let unique: HashSet<&str> = visits.iter().map(|v| v.reminder_id.as_str()).collect();
    let avg_per_qr = if unique.is_empty() {
        0.0
    } else {
        total_visits as f64 / unique.len() as f64
    };

    tracing::debug!(total_visits, reminders = unique.len(), "computed analytics overview");

    AnalyticsOverview {
        total_visits,
        visits_this_month,
        avg_per_qr,
        visits_by_day: daily_counts(visits, now, OVERVIEW_DAYS),
        visits_by_qr,
    }
}

/// Build the detail view for one reminder. Visits for other reminders are
/// ignored.
#[must_use]
pub fn detail(reminder_id: &str, visits: &[Visit], now: DateTime<Utc>) -> QrDetail {
    let own: Vec<Visit> = visits
        .iter()
        .filter(|v| v.reminder_id == reminder_id)
        .cloned()
        .collect();

    let mut stats = QrDetail {
        total_visits: own.len() as u64,
        card_views: 0,
        ar_views: 0,
        visits_by_day: daily_counts(&own, now, DETAIL_DAYS),
        mobile_visits: 0,
        desktop_visits: 0,
    };
    for visit in &own {
        match visit.view_mode {
            Some(ViewMode::Card) => stats.card_views += 1,
            Some(ViewMode::Ar) => stats.ar_views += 1,
            None => {}
        }
        if let Some(agent) = &visit.user_agent {
            if is_mobile_agent(agent) {
                stats.mobile_visits += 1;
            } else {
                stats.desktop_visits += 1;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid date")
    }

    fn visit(id: &str, when: DateTime<Utc>, mode: Option<ViewMode>, ua: Option<&str>) -> Visit {
        Visit {
            reminder_id: id.to_string(),
            visited_at: when,
            view_mode: mode,
            user_agent: ua.map(str::to_string),
        }
    }

    #[test]
    fn test_mobile_detection() {
        assert!(is_mobile_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"));
        assert!(is_mobile_agent("something ANDROID something"));
        assert!(!is_mobile_agent("Mozilla/5.0 (X11; Linux x86_64)"));
    }

    #[test]
    fn test_daily_counts_window() {
        let now = at(2026, 3, 10, 12);
        let visits = vec![
            visit("a", at(2026, 3, 10, 1), None, None),
            visit("a", at(2026, 3, 4, 23), None, None),
            visit("a", at(2026, 3, 3, 23), None, None),
        ];
        let days = daily_counts(&visits, now, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "04/03");
        assert_eq!(days[0].count, 1);
        assert_eq!(days[6].date, "10/03");
        assert_eq!(days[6].count, 1);
        assert_eq!(days.iter().map(|d| d.count).sum::<u64>(), 2);
    }

    #[test]
    fn test_overview() {
        let now = at(2026, 3, 10, 12);
        let visits = vec![
            visit("a", at(2026, 3, 9, 8), Some(ViewMode::Ar), None),
            visit("a", at(2026, 3, 2, 8), Some(ViewMode::Card), None),
            visit("a", at(2026, 2, 20, 8), Some(ViewMode::Card), None),
            visit("gone", at(2026, 3, 1, 0), None, None),
        ];
        let reminders = vec![ReminderInfo {
            id: "a".into(),
            title: "Water plants".into(),
            location: Some("Home".into()),
        }];
        let stats = overview(&visits, &reminders, now);
        assert_eq!(stats.total_visits, 4);
        assert_eq!(stats.visits_this_month, 3);
        assert!((stats.avg_per_qr - 2.0).abs() < f64::EPSILON);
        assert_eq!(stats.visits_by_day.len(), 30);

        let first = &stats.visits_by_qr[0];
        assert_eq!(first.reminder_id, "a");
        assert_eq!(first.title, "Water plants");
        assert_eq!(first.total_visits, 3);
        assert_eq!(first.card_views, 2);
        assert_eq!(first.ar_views, 1);
        assert_eq!(first.last_visit, Some(at(2026, 3, 9, 8)));
        assert_eq!(stats.visits_by_qr[1].title, REMOVED_REMINDER_TITLE);
    }

    #[test]
    fn test_empty_overview() {
        let stats = overview(&[], &[], at(2026, 1, 1, 0));
        assert_eq!(stats.total_visits, 0);
        assert!(stats.avg_per_qr.abs() < f64::EPSILON);
        assert!(stats.visits_by_qr.is_empty());
    }

    #[test]
    fn test_detail() {
        let now = at(2026, 3, 10, 12);
        let visits = vec![
            visit("a", at(2026, 3, 10, 8), Some(ViewMode::Ar), Some("Android 14")),
            visit("a", at(2026, 3, 9, 8), Some(ViewMode::Card), Some("Windows NT 10.0")),
            visit("a", at(2026, 1, 9, 8), None, None),
            visit("b", at(2026, 3, 10, 8), Some(ViewMode::Ar), Some("iPhone")),
        ];
        let stats = detail("a", &visits, now);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.ar_views, 1);
        assert_eq!(stats.card_views, 1);
        assert_eq!(stats.mobile_visits, 1);
        assert_eq!(stats.desktop_visits, 1);
        assert_eq!(stats.visits_by_day.len(), 7);
        assert_eq!(stats.visits_by_day[6].count, 1);
    }

    #[test]
    fn test_visit_json() {
        let json = r#"{"reminder_id":"a","visited_at":"2026-03-10T08:00:00Z","view_mode":"ar"}"#;
        let v: Visit = serde_json::from_str(json).expect("parse");
        assert_eq!(v.view_mode, Some(ViewMode::Ar));
        assert_eq!(v.user_agent, None);
    }
}
