//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Month sequence — contiguous, 1-based, `years * 12` long
//! 2. Zero-rate linearity — `nominal(m) == initial + monthly * m`
//! 3. Monotonicity — non-negative contributions and rates never shrink the total
//! 4. Aggregation consistency — totals equal the per-pocket sums at every month
//! 5. KPI identity — value == contributions + interest, to rounding, at every horizon
//! 6. Allocation — strictly positive entries summing to the positive balances
//! 7. Idempotence — same inputs and anchor give identical output

use chrono::NaiveDate;
use pocketfolio_core::allocation::{allocate, allocated_total};
use pocketfolio_core::compounding::{project, ProjectionRequest};
use pocketfolio_core::domain::{ExternalHolding, Pocket, PocketSet, Portfolio, PriceSnapshot};
use pocketfolio_core::kpi::{kpi_at_years, KPI_HORIZONS};
use pocketfolio_core::projector::{project_portfolio, ProjectionSettings};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn arb_balance() -> impl Strategy<Value = f64> {
    (0.0..250_000.0_f64).prop_map(|b| (b * 100.0).round() / 100.0)
}

fn arb_contribution() -> impl Strategy<Value = f64> {
    (0.0..3_000.0_f64).prop_map(|c| (c * 100.0).round() / 100.0)
}

fn arb_rate() -> impl Strategy<Value = f64> {
    0.0..0.15_f64
}

fn arb_years() -> impl Strategy<Value = u32> {
    prop_oneof![Just(5u32), Just(10u32), Just(20u32), 0u32..4]
}

/// Between one and eight pockets with unique keys.
fn arb_portfolio() -> impl Strategy<Value = Portfolio> {
    prop::collection::vec(
        (
            -5_000.0..250_000.0_f64,
            -200.0..3_000.0_f64,
            -0.05..0.15_f64,
        ),
        1..8,
    )
    .prop_map(|legs| {
        let pockets: Vec<Pocket> = legs
            .into_iter()
            .enumerate()
            .map(|(i, (balance, monthly, rate))| {
                Pocket::new(format!("p{i}"), format!("Pocket {i}"), balance, monthly, rate)
            })
            .collect();
        Portfolio::new(PocketSet::try_from(pockets).unwrap())
            .with_holding(ExternalHolding::new("p0", "bitcoin", 0.25))
    })
}

fn arb_prices() -> impl Strategy<Value = PriceSnapshot> {
    prop_oneof![
        Just(PriceSnapshot::new()),
        (1_000.0..100_000.0_f64).prop_map(|p| PriceSnapshot::single("bitcoin", p)),
    ]
}

// ── 1–2. Single-pocket engine ────────────────────────────────────────

proptest! {
    #[test]
    fn month_sequence_is_contiguous(
        initial in arb_balance(),
        monthly in arb_contribution(),
        rate in arb_rate(),
        years in arb_years(),
    ) {
        let points = project(&ProjectionRequest::new(initial, monthly, rate, years), anchor()).unwrap();
        prop_assert_eq!(points.len(), (years * 12) as usize);
        for (i, p) in points.iter().enumerate() {
            prop_assert_eq!(p.month as usize, i + 1);
        }
    }

    #[test]
    fn zero_rate_is_linear(
        initial in 0u32..100_000,
        monthly in 0u32..5_000,
        years in 1u32..21,
    ) {
        let (initial, monthly) = (initial as f64, monthly as f64);
        let points = project(&ProjectionRequest::new(initial, monthly, 0.0, years), anchor()).unwrap();
        for p in &points {
            prop_assert_eq!(p.nominal, initial + monthly * p.month as f64);
            prop_assert_eq!(p.contribution, p.nominal);
        }
    }
}

// ── 3. Monotonicity ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn non_negative_inputs_never_decrease(
        legs in prop::collection::vec((arb_balance(), arb_contribution(), arb_rate()), 1..7),
        years in 1u32..21,
    ) {
        let pockets: Vec<Pocket> = legs
            .into_iter()
            .enumerate()
            .map(|(i, (b, c, r))| Pocket::new(format!("p{i}"), format!("P{i}"), b, c, r))
            .collect();
        let portfolio = Portfolio::new(PocketSet::try_from(pockets).unwrap());
        let series = project_portfolio(
            &portfolio,
            &PriceSnapshot::new(),
            &ProjectionSettings::new(years),
            anchor(),
        )
        .unwrap();
        let curve = series.nominal_curve();
        for pair in curve.windows(2) {
            prop_assert!(pair[1] >= pair[0], "{} then {}", pair[0], pair[1]);
        }
    }
}

// ── 4–7. Portfolio-level invariants ──────────────────────────────────

proptest! {
    #[test]
    fn totals_equal_sum_of_pockets(
        portfolio in arb_portfolio(),
        prices in arb_prices(),
        years in arb_years(),
    ) {
        let series = project_portfolio(&portfolio, &prices, &ProjectionSettings::new(years), anchor()).unwrap();
        for (i, total) in series.points().iter().enumerate() {
            let mut nominal = 0.0;
            let mut real = 0.0;
            for pocket in series.pocket_series() {
                nominal += pocket.points[i].nominal;
                real += pocket.points[i].real;
            }
            prop_assert_eq!(total.nominal, nominal);
            prop_assert_eq!(total.real, real);
        }
    }

    #[test]
    fn kpi_identity_holds(
        portfolio in arb_portfolio(),
        prices in arb_prices(),
        years in arb_years(),
    ) {
        let series = project_portfolio(&portfolio, &prices, &ProjectionSettings::new(years), anchor()).unwrap();
        let total_initial = portfolio.total_initial(&prices);
        let total_monthly = portfolio.total_monthly();
        for y in KPI_HORIZONS.iter().copied().chain(0..3) {
            let k = kpi_at_years(series.points(), total_initial, total_monthly, y);
            let scale = k.value.abs().max(k.contributions.abs()).max(1.0);
            prop_assert!((k.contributions + k.interest - k.value).abs() <= 4.0 * f64::EPSILON * scale);
        }
    }

    #[test]
    fn allocation_is_positive_and_complete(
        portfolio in arb_portfolio(),
        prices in arb_prices(),
    ) {
        let entries = allocate(&portfolio, &prices);
        prop_assert!(entries.iter().all(|e| e.value > 0.0));

        let mut expected = 0.0;
        for (_, balance) in portfolio.effective_balances(&prices) {
            if balance > 0.0 {
                expected += balance;
            }
        }
        let total = allocated_total(&entries);
        prop_assert!((total - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn recomputation_is_idempotent(
        portfolio in arb_portfolio(),
        prices in arb_prices(),
        years in arb_years(),
    ) {
        let settings = ProjectionSettings::new(years).with_inflation(0.02);
        let a = project_portfolio(&portfolio, &prices, &settings, anchor()).unwrap();
        let b = project_portfolio(&portfolio, &prices, &settings, anchor()).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(allocate(&portfolio, &prices), allocate(&portfolio, &prices));
    }
}
