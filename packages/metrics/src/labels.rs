//! Text that surrounds a chart: period subtitles and tooltip lines.

use chrono::{Datelike as _, Months, NaiveDate};
use justice_metrics_models::{DataPoint, MetricPeriod, RatePoint};

/// First day of the window `period` covers, given today's date.
///
/// The window spans the current month plus the `months - 1` months
/// before it.
#[must_use]
pub fn period_start(period: MetricPeriod, today: NaiveDate) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month
        .checked_sub_months(Months::new(period.months() - 1))
        .unwrap_or(first_of_month)
}

/// Describes the window as `"M/D/YYYY to present"`.
#[must_use]
pub fn period_label(period: MetricPeriod, today: NaiveDate) -> String {
    format!(
        "{} to present",
        period_start(period, today).format("%-m/%-d/%Y")
    )
}

/// Chart subtitle, e.g. `"Last 3 months (2/1/2019 to present)"`.
#[must_use]
pub fn period_subtitle(period: MetricPeriod, today: NaiveDate) -> String {
    format!(
        "{} ({})",
        period.trailing_label(),
        period_label(period, today)
    )
}

/// Tooltip line for a single data point.
///
/// Rates get a percent sign; counts are shown as-is.
#[must_use]
pub fn tooltip(dataset_label: &str, point: &DataPoint) -> String {
    match point {
        DataPoint::Count(count) => format!("{dataset_label}: {count}"),
        DataPoint::Rate(rate) => format!("{dataset_label}: {}%", rate.rate),
    }
}

/// Tooltip line for a rate that also shows its raw counts, e.g.
/// `"Caucasian: 12.50% (1/8)"`.
#[must_use]
pub fn nested_rate_tooltip(dataset_label: &str, point: &RatePoint) -> String {
    format!(
        "{dataset_label}: {}% ({}/{})",
        point.rate, point.numerator, point.denominator
    )
}

#[cfg(test)]
mod tests {
    use justice_metrics_models::Rate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_labels() {
        let today = date(2019, 7, 15);
        assert_eq!(period_label(MetricPeriod::OneMonth, today), "7/1/2019 to present");
        assert_eq!(period_label(MetricPeriod::ThreeMonths, today), "5/1/2019 to present");
        assert_eq!(period_label(MetricPeriod::SixMonths, today), "2/1/2019 to present");
        assert_eq!(period_label(MetricPeriod::TwelveMonths, today), "8/1/2018 to present");
        assert_eq!(
            period_label(MetricPeriod::ThirtySixMonths, today),
            "8/1/2016 to present"
        );
    }

    #[test]
    fn subtitle_combines_trailing_and_period() {
        assert_eq!(
            period_subtitle(MetricPeriod::SixMonths, date(2020, 1, 31)),
            "Last 6 months (8/1/2019 to present)"
        );
    }

    #[test]
    fn tooltips() {
        let point = RatePoint {
            rate: Rate::from_hundredths(1250),
            numerator: 1,
            denominator: 8,
        };
        assert_eq!(tooltip("Revocations", &DataPoint::Count(7)), "Revocations: 7");
        assert_eq!(
            tooltip("Revocation rate", &DataPoint::Rate(point)),
            "Revocation rate: 12.50%"
        );
        assert_eq!(nested_rate_tooltip("Caucasian", &point), "Caucasian: 12.50% (1/8)");
    }
}
