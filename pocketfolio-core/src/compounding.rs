//! Compounding engine — one pocket's month-by-month trajectory.
//!
//! Monthly compounding at `annual_rate / 12`, contribution paid at the end of
//! each month:
//!
//! ```text
//! nominal(m) = nominal(m-1) * (1 + r) + monthly
//! real(m)    = (real(m-1) * (1 + r)) / (1 + i) + monthly / (1 + i)
//! contribution(m) = initial + monthly * m
//! ```
//!
//! with `r = annual_rate / 12`, `i = inflation / 12` and
//! `nominal(0) = real(0) = initial`. Values are never rounded.

use crate::domain::ProjectionPoint;
use crate::labels::{month_labels, LabelStyle};
use chrono::NaiveDate;
use thiserror::Error;

/// Lowest annual rate (exclusive) the engine accepts: −100 %.
pub const RATE_FLOOR: f64 = -1.0;

/// Months per year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest horizon the engine projects, in years.
pub const MAX_YEARS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("annual return {rate} is out of range (must be finite and above -100%)")]
    RateOutOfRange { rate: f64 },

    #[error("inflation rate {rate} is out of range (must be finite and above -100%)")]
    InflationOutOfRange { rate: f64 },

    #[error("horizon of {years} years exceeds the {max}-year limit", max = MAX_YEARS)]
    HorizonTooLong { years: u32 },
}

/// Parameters of a single-pocket projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionRequest {
    pub initial: f64,
    pub monthly: f64,
    pub annual_rate: f64,
    pub years: u32,
    pub inflation: f64,
    pub label_style: LabelStyle,
}

impl ProjectionRequest {
    /// Request with zero inflation and French labels.
    pub fn new(initial: f64, monthly: f64, annual_rate: f64, years: u32) -> Self {
        Self {
            initial,
            monthly,
            annual_rate,
            years,
            inflation: 0.0,
            label_style: LabelStyle::default(),
        }
    }

    pub fn with_inflation(mut self, inflation: f64) -> Self {
        self.inflation = inflation;
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    /// Number of monthly points the projection produces.
    pub fn months(&self) -> u32 {
        self.years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        check_years(self.years)?;
        check_annual_rate(self.annual_rate)?;
        check_inflation(self.inflation)
    }
}

/// Reject horizons longer than [`MAX_YEARS`].
pub fn check_years(years: u32) -> Result<(), ProjectionError> {
    if years <= MAX_YEARS {
        Ok(())
    } else {
        Err(ProjectionError::HorizonTooLong { years })
    }
}

/// Reject non-finite returns and returns at or below −100 %.
pub fn check_annual_rate(rate: f64) -> Result<(), ProjectionError> {
    if rate.is_finite() && rate > RATE_FLOOR {
        Ok(())
    } else {
        Err(ProjectionError::RateOutOfRange { rate })
    }
}

/// Reject non-finite inflation and inflation at or below −100 %.
pub fn check_inflation(rate: f64) -> Result<(), ProjectionError> {
    if rate.is_finite() && rate > RATE_FLOOR {
        Ok(())
    } else {
        Err(ProjectionError::InflationOutOfRange { rate })
    }
}

/// Project one pocket month by month from `anchor`.
///
/// Returns `years * 12` points (none when `years == 0`). Labels name the
/// calendar month `anchor + m months`.
pub fn project(
    request: &ProjectionRequest,
    anchor: NaiveDate,
) -> Result<Vec<ProjectionPoint>, ProjectionError> {
    request.validate()?;
    let labels = month_labels(anchor, request.months(), request.label_style);
    project_with_labels(request, labels)
}

/// Same as [`project`] with labels computed by the caller (one per month).
///
/// Used by the portfolio projector, which shares one label vector across
/// every pocket of a run.
pub(crate) fn project_with_labels(
    request: &ProjectionRequest,
    labels: Vec<String>,
) -> Result<Vec<ProjectionPoint>, ProjectionError> {
    request.validate()?;
    debug_assert_eq!(labels.len(), request.months() as usize);

    let growth = 1.0 + request.annual_rate / 12.0;
    let deflator = 1.0 + request.inflation / 12.0;

    let mut nominal = request.initial;
    let mut real = request.initial;
    let mut points = Vec::with_capacity(labels.len());

    for (label, month) in labels.into_iter().zip(1..) {
        nominal = nominal * growth + request.monthly;
        real = (real * growth) / deflator + request.monthly / deflator;
        points.push(ProjectionPoint {
            month,
            label,
            nominal,
            real,
            contribution: request.initial + request.monthly * month as f64,
        });
    }

    Ok(points)
}
