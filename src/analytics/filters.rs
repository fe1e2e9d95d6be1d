// Filter state and date-preset resolution for the analytics dashboard
use crate::error::{Result, SarthiError};
use crate::records::{Application, ApplicationStatus};
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DatePreset {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "6m")]
    Last6Months,
    #[default]
    #[serde(rename = "all")]
    AllTime,
    #[serde(rename = "custom")]
    Custom,
}

impl DatePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePreset::Last7Days => "7d",
            DatePreset::Last30Days => "30d",
            DatePreset::Last6Months => "6m",
            DatePreset::AllTime => "all",
            DatePreset::Custom => "custom",
        }
    }

    /// Resolve against today's UTC date
    pub fn resolve_now(&self) -> DateRange {
        parse_date_preset(*self, Utc::now().date_naive())
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePreset {
    type Err = SarthiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "7d" => Ok(DatePreset::Last7Days),
            "30d" => Ok(DatePreset::Last30Days),
            "6m" => Ok(DatePreset::Last6Months),
            "all" => Ok(DatePreset::AllTime),
            "custom" => Ok(DatePreset::Custom),
            other => Err(SarthiError::InvalidFilterValue {
                key: FilterKey::DatePreset.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Concrete, inclusive date bounds; `None` means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Map a preset to date bounds ending `today`.
///
/// `AllTime` is unbounded. `Custom` carries no bounds of its own and also
/// resolves to unbounded; callers supply custom bounds explicitly.
pub fn parse_date_preset(preset: DatePreset, today: NaiveDate) -> DateRange {
    let from = match preset {
        DatePreset::Last7Days => today.checked_sub_signed(Duration::days(7)),
        DatePreset::Last30Days => today.checked_sub_signed(Duration::days(30)),
        DatePreset::Last6Months => today.checked_sub_months(Months::new(6)),
        DatePreset::AllTime | DatePreset::Custom => return DateRange::default(),
    };

    DateRange {
        date_from: from,
        date_to: Some(today),
    }
}

/// Settable filter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    DatePreset,
    Scheme,
    State,
    Status,
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKey::DatePreset => "datePreset",
            FilterKey::Scheme => "scheme",
            FilterKey::State => "state",
            FilterKey::Status => "status",
        })
    }
}

impl FromStr for FilterKey {
    type Err = SarthiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "datePreset" | "date_preset" => Ok(FilterKey::DatePreset),
            "scheme" => Ok(FilterKey::Scheme),
            "state" => Ok(FilterKey::State),
            "status" => Ok(FilterKey::Status),
            other => Err(SarthiError::UnknownFilterKey(other.to_string())),
        }
    }
}

/// Dashboard filter selection
///
/// When `date_preset` is not `Custom`, the bounds are the preset's
/// resolution at the time it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub date_preset: DatePreset,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub scheme: String,
    pub state: String,
    pub status: String,
}

impl FilterState {
    /// Payload for the aggregator: blank fields become "unset"
    pub fn normalized(&self) -> ServiceFilters {
        fn non_empty(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        ServiceFilters {
            date_from: self.date_from,
            date_to: self.date_to,
            scheme: non_empty(&self.scheme),
            state: non_empty(&self.state),
            status: non_empty(&self.status),
        }
    }
}

/// Normalized filters consumed by an [`Aggregator`](super::Aggregator)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub scheme: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
}

impl ServiceFilters {
    /// Whether `applied` falls in the window. The end day is included
    /// through the following midnight.
    pub fn in_window(&self, applied: DateTime<Utc>) -> bool {
        if let Some(from) = self.date_from {
            if applied < from.and_time(chrono::NaiveTime::MIN).and_utc() {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            let end = to.and_time(chrono::NaiveTime::MIN).and_utc() + Duration::days(1);
            if applied > end {
                return false;
            }
        }
        true
    }

    /// Scheme, status and date checks. The state filter needs the user
    /// table and is applied by the aggregator.
    pub fn matches(&self, app: &Application) -> bool {
        if !self.in_window(app.date_applied) {
            return false;
        }
        if let Some(scheme) = &self.scheme {
            if &app.service_id != scheme {
                return false;
            }
        }
        if let Some(status) = &self.status {
            match status.parse::<ApplicationStatus>() {
                Ok(status) if status == app.status => {}
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_presets_resolve_relative_to_today() {
        let today = date(2026, 3, 31);

        assert_eq!(
            parse_date_preset(DatePreset::Last7Days, today),
            DateRange {
                date_from: Some(date(2026, 3, 24)),
                date_to: Some(today)
            }
        );
        assert_eq!(
            parse_date_preset(DatePreset::Last30Days, today).date_from,
            Some(date(2026, 3, 1))
        );
        // Month arithmetic clamps to the end of a shorter month
        assert_eq!(
            parse_date_preset(DatePreset::Last6Months, today).date_from,
            Some(date(2025, 9, 30))
        );
        assert_eq!(
            parse_date_preset(DatePreset::AllTime, today),
            DateRange::default()
        );
        assert_eq!(
            parse_date_preset(DatePreset::Custom, today),
            DateRange::default()
        );
    }

    #[test]
    fn test_resolve_now_ends_today() {
        let range = DatePreset::Last30Days.resolve_now();
        let today = Utc::now().date_naive();
        // Tolerate a run that straddles midnight
        assert!(range.date_to == Some(today) || range.date_to == today.pred_opt());
        assert_eq!(DatePreset::AllTime.resolve_now(), DateRange::default());
    }

    #[test]
    fn test_preset_tokens() {
        for preset in [
            DatePreset::Last7Days,
            DatePreset::Last30Days,
            DatePreset::Last6Months,
            DatePreset::AllTime,
            DatePreset::Custom,
        ] {
            assert_eq!(preset.as_str().parse::<DatePreset>().unwrap(), preset);
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
        assert!(matches!(
            "1y".parse::<DatePreset>(),
            Err(SarthiError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn test_filter_keys() {
        assert_eq!("datePreset".parse::<FilterKey>().unwrap(), FilterKey::DatePreset);
        assert_eq!("date_preset".parse::<FilterKey>().unwrap(), FilterKey::DatePreset);
        assert!(matches!(
            "category".parse::<FilterKey>(),
            Err(SarthiError::UnknownFilterKey(_))
        ));
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let state = FilterState {
            scheme: "pm-kisan".to_string(),
            state: "  ".to_string(),
            ..FilterState::default()
        };
        let filters = state.normalized();
        assert_eq!(filters.scheme.as_deref(), Some("pm-kisan"));
        assert_eq!(filters.state, None);
        assert_eq!(filters.status, None);
        assert_eq!(FilterState::default().normalized(), ServiceFilters::default());
    }

    #[test]
    fn test_window_includes_end_day() {
        let filters = ServiceFilters {
            date_from: Some(date(2026, 1, 10)),
            date_to: Some(date(2026, 1, 20)),
            ..ServiceFilters::default()
        };

        let at = |d, h| Utc.with_ymd_and_hms(2026, 1, d, h, 0, 0).unwrap();
        assert!(!filters.in_window(at(9, 23)));
        assert!(filters.in_window(at(10, 0)));
        assert!(filters.in_window(at(20, 23)));
        assert!(filters.in_window(at(21, 0)));
        assert!(!filters.in_window(at(21, 1)));
    }
}
