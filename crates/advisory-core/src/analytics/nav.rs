use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AdvisoryError;
use crate::types::{Money, Rate};
use crate::AdvisoryResult;

/// One net-asset-value observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    #[serde(alias = "valor_cuota")]
    pub value: Money,
}

/// A NAV history with at least two points, strictly increasing dates and
/// positive values.
#[derive(Debug, Clone)]
pub struct NavSeries {
    points: Vec<NavPoint>,
}

impl NavSeries {
    pub fn new(points: Vec<NavPoint>) -> AdvisoryResult<Self> {
        if points.len() < 2 {
            return Err(AdvisoryError::InsufficientData(format!(
                "At least 2 NAV points required, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| p.value <= Decimal::ZERO) {
            return Err(AdvisoryError::invalid_input(
                "value",
                format!("NAV on {} must be positive, got {}", p.date, p.value),
            ));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AdvisoryError::invalid_input(
                "date",
                format!(
                    "dates must be strictly increasing ({} follows {})",
                    w[1].date, w[0].date
                ),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> NavPoint {
        self.points[0]
    }

    pub fn last(&self) -> NavPoint {
        self.points[self.points.len() - 1]
    }
}

/// Simple return ending on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayReturn {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub value: Rate,
}

/// Simple period returns `v[i] / v[i-1] − 1`, one per point after the first.
///
/// A ratio outside the decimal range is an input error, not a panic.
pub fn daily_returns(series: &NavSeries) -> AdvisoryResult<Vec<DayReturn>> {
    series
        .points
        .windows(2)
        .map(|w| {
            let ratio = w[1].value.checked_div(w[0].value).ok_or_else(|| {
                AdvisoryError::invalid_input(
                    "value",
                    format!(
                        "return from {} to {} overflows ({} / {})",
                        w[0].date, w[1].date, w[1].value, w[0].value
                    ),
                )
            })?;
            Ok(DayReturn {
                date: w[1].date,
                value: ratio - Decimal::ONE,
            })
        })
        .collect()
}

/// Trailing calendar window, anchored on the last observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWindow {
    #[serde(alias = "1m")]
    OneMonth,
    #[serde(alias = "3m")]
    ThreeMonths,
    #[serde(alias = "6m")]
    SixMonths,
    #[serde(alias = "1y")]
    OneYear,
    #[serde(alias = "ytd")]
    YearToDate,
    #[default]
    #[serde(alias = "todo")]
    All,
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisWindow::OneMonth => "1m",
            AnalysisWindow::ThreeMonths => "3m",
            AnalysisWindow::SixMonths => "6m",
            AnalysisWindow::OneYear => "1y",
            AnalysisWindow::YearToDate => "ytd",
            AnalysisWindow::All => "all",
        };
        f.write_str(s)
    }
}

impl AnalysisWindow {
    /// First date inside the window ending on `end`, or `None` for `All`.
    pub fn start_date(self, end: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            AnalysisWindow::All => return None,
            AnalysisWindow::YearToDate => return NaiveDate::from_ymd_opt(end.year(), 1, 1),
            AnalysisWindow::OneMonth => 1,
            AnalysisWindow::ThreeMonths => 3,
            AnalysisWindow::SixMonths => 6,
            AnalysisWindow::OneYear => 12,
        };
        end.checked_sub_months(Months::new(months))
    }

    /// Points on or after the window start. Input order is preserved.
    pub fn trim(self, points: &[NavPoint]) -> Vec<NavPoint> {
        let Some(end) = points.iter().map(|p| p.date).max() else {
            return Vec::new();
        };
        match self.start_date(end) {
            Some(start) => points.iter().copied().filter(|p| p.date >= start).collect(),
            None => points.to_vec(),
        }
    }
}
