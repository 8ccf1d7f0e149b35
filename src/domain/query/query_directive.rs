use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// What a single query line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDirective {
    TimeFrom(i64),
    TimeTo(i64),
    MetricPath(String),
}

type LineMatcher = fn(&str) -> Option<QueryDirective>;

/// Evaluated in order; the first hit wins.
const MATCHERS: [LineMatcher; 4] = [epoch_from, epoch_to, date_from, date_to];

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y/%m/%d %H:%M:%S%z",
];

const NAIVE_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Classify one trimmed, non-blank line. Anything unrecognised is a metric path.
pub fn classify_line(line: &str) -> QueryDirective {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(line))
        .unwrap_or_else(|| QueryDirective::MetricPath(line.to_string()))
}

fn epoch_from(line: &str) -> Option<QueryDirective> {
    line.strip_prefix("from=").and_then(parse_epoch).map(QueryDirective::TimeFrom)
}

fn epoch_to(line: &str) -> Option<QueryDirective> {
    line.strip_prefix("to=").and_then(parse_epoch).map(QueryDirective::TimeTo)
}

fn date_from(line: &str) -> Option<QueryDirective> {
    line.strip_prefix("from=")
        .and_then(parse_freeform_date)
        .map(QueryDirective::TimeFrom)
}

fn date_to(line: &str) -> Option<QueryDirective> {
    line.strip_prefix("to=")
        .and_then(parse_freeform_date)
        .map(QueryDirective::TimeTo)
}

fn parse_epoch(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Parse a human-written timestamp into epoch seconds. Values without an offset are UTC.
pub fn parse_freeform_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.timestamp());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_directives() {
        assert_eq!(classify_line("from=1609459200"), QueryDirective::TimeFrom(1609459200));
        assert_eq!(classify_line("to=1609462800"), QueryDirective::TimeTo(1609462800));
    }

    #[test]
    fn iso_dates_become_epoch_seconds() {
        assert_eq!(
            classify_line("from=2021-01-01T00:00:00Z"),
            QueryDirective::TimeFrom(1609459200)
        );
        assert_eq!(
            classify_line("to=2021-01-01 01:00:00"),
            QueryDirective::TimeTo(1609462800)
        );
        assert_eq!(
            classify_line("from=2021-01-01T09:00:00+09:00"),
            QueryDirective::TimeFrom(1609459200)
        );
        assert_eq!(classify_line("to=2021/01/02"), QueryDirective::TimeTo(1609545600));
    }

    #[test]
    fn metric_paths_pass_through() {
        assert_eq!(
            classify_line("/services/web/metrics?name=custom.cpu"),
            QueryDirective::MetricPath("/services/web/metrics?name=custom.cpu".into())
        );
    }

    #[test]
    fn unparseable_directive_falls_back_to_path() {
        assert_eq!(
            classify_line("from=yesterday-ish"),
            QueryDirective::MetricPath("from=yesterday-ish".into())
        );
        assert_eq!(classify_line("to="), QueryDirective::MetricPath("to=".into()));
    }

    #[test]
    fn signed_numbers_are_not_epochs() {
        assert_eq!(parse_epoch("-5"), None);
        assert_eq!(parse_epoch("+5"), None);
        assert_eq!(parse_epoch("42"), Some(42));
    }
}
