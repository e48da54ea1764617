// ═══════════════════════════════════════════════════════════════════
// Service Tests — normalizer, merger, projection, impact, zoom,
// analytics, ChartService
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use performance_chart_core::models::chart::{ChartView, MergedRow, VisionRow};
use performance_chart_core::models::query::HistorySnapshot;
use performance_chart_core::models::scenario::{Scenario, VisionSettings};
use performance_chart_core::models::series::{NormalizedPoint, RawPoint, SeriesId};
use performance_chart_core::models::settings::{ChartMode, ChartSettings};
use performance_chart_core::models::window::Window;
use performance_chart_core::services::analytics_service::{portfolio_stats, vision_ticks, y_domain};
use performance_chart_core::services::chart_service::ChartService;
use performance_chart_core::services::impact::{opportunity_cost, simulate_impact};
use performance_chart_core::services::merger::{merge, merge_raw};
use performance_chart_core::services::normalizer::{change_percent, normalize, normalize_sorted};
use performance_chart_core::services::projection::{month_offset, project, summarize, ProjectionInput};
use performance_chart_core::services::zoom::{
    apply_window, apply_window_bounds, window_view, zoom, ZoomDirection,
};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn raw(y: i32, m: u32, d: u32, value: f64) -> RawPoint {
    RawPoint::on_day(day(y, m, d), value)
}

fn norm(y: i32, m: u32, d: u32, pct: f64) -> NormalizedPoint {
    NormalizedPoint {
        date: day(y, m, d).and_hms_opt(0, 0, 0).unwrap().and_utc(),
        change_percent: pct,
    }
}

fn input(present_value: f64, hist: f64, contribution: f64, rate: f64, months: u32) -> ProjectionInput {
    ProjectionInput {
        present_value,
        historical_return_percent: hist,
        monthly_contribution: contribution,
        monthly_rate: rate,
        horizon_months: months,
        anchor_date: day(2024, 1, 31),
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// Normalizer
// ═══════════════════════════════════════════════════════════════════

mod normalizer {
    use super::*;

    #[test]
    fn empty_series() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn first_point_is_zero() {
        let out = normalize(&[raw(2024, 1, 1, 200.0), raw(2024, 1, 2, 250.0), raw(2024, 1, 3, 150.0)]);
        assert_eq!(out[0].change_percent, 0.0);
        assert!(approx(out[1].change_percent, 25.0));
        assert!(approx(out[2].change_percent, -25.0));
    }

    #[test]
    fn zero_reference_yields_zero_everywhere() {
        let out = normalize(&[raw(2024, 1, 1, 0.0), raw(2024, 1, 2, 5.0)]);
        assert_eq!(out[0].change_percent, 0.0);
        assert_eq!(out[1].change_percent, 0.0);
        assert!(out.iter().all(|p| p.change_percent.is_finite()));
    }

    #[test]
    fn order_is_preserved() {
        let out = normalize(&[raw(2024, 1, 3, 100.0), raw(2024, 1, 1, 110.0)]);
        assert_eq!(out[0].day(), day(2024, 1, 3));
        assert_eq!(out[1].day(), day(2024, 1, 1));
    }

    #[test]
    fn sorted_variant_reorders_first() {
        let out = normalize_sorted(vec![raw(2024, 1, 3, 110.0), raw(2024, 1, 1, 100.0)]);
        assert_eq!(out[0].day(), day(2024, 1, 1));
        assert_eq!(out[0].change_percent, 0.0);
        assert!(approx(out[1].change_percent, 10.0));
    }

    #[test]
    fn change_percent_guard() {
        assert_eq!(change_percent(10.0, 0.0), 0.0);
        assert!(approx(change_percent(110.0, 100.0), 10.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Merger
// ═══════════════════════════════════════════════════════════════════

mod merger {
    use super::*;

    #[test]
    fn union_of_days_sorted() {
        let portfolio = vec![norm(2024, 1, 2, 0.0), norm(2024, 1, 4, 1.0)];
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert(
            SeriesId::new("SPX"),
            vec![norm(2024, 1, 1, 0.0), norm(2024, 1, 2, 0.5), norm(2024, 1, 3, 0.7)],
        );

        let rows = merge(&portfolio, &benchmarks);
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 3), day(2024, 1, 4)]
        );
    }

    #[test]
    fn benchmark_only_day_has_zero_portfolio() {
        let portfolio = vec![norm(2024, 1, 2, 3.0)];
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert(SeriesId::new("GOLD"), vec![norm(2024, 1, 1, 0.0)]);

        let rows = merge(&portfolio, &benchmarks);
        assert_eq!(rows[0].date, day(2024, 1, 1));
        assert_eq!(rows[0].portfolio, 0.0);
        assert_eq!(rows[0].value("GOLD"), Some(0.0));
        assert_eq!(rows[1].portfolio, 3.0);
        assert_eq!(rows[1].value("GOLD"), None);
    }

    #[test]
    fn same_day_later_point_wins() {
        let portfolio = vec![norm(2024, 1, 1, 1.0), norm(2024, 1, 1, 2.0)];
        let rows = merge(&portfolio, &BTreeMap::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].portfolio, 2.0);
    }

    #[test]
    fn intraday_timestamps_share_a_day() {
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 5, 1, 21, 0, 0).unwrap();
        let portfolio = vec![RawPoint::new(morning, 100.0)];
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert(SeriesId::new("BTC"), vec![RawPoint::new(evening, 60_000.0)]);

        let rows = merge_raw(&portfolio, &benchmarks);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("BTC"), Some(0.0));
    }

    #[test]
    fn merge_raw_sorts_benchmarks_before_normalizing() {
        let portfolio = vec![raw(2024, 1, 1, 100.0), raw(2024, 1, 2, 110.0)];
        let mut benchmarks = BTreeMap::new();
        benchmarks.insert(
            SeriesId::new("SPX"),
            vec![raw(2024, 1, 2, 4_400.0), raw(2024, 1, 1, 4_000.0)],
        );

        let rows = merge_raw(&portfolio, &benchmarks);
        assert_eq!(rows[0].value("SPX"), Some(0.0));
        assert!(approx(rows[1].value("SPX").unwrap(), 10.0));
        assert!(approx(rows[1].portfolio, 10.0));
    }

    #[test]
    fn no_input_no_rows() {
        assert!(merge(&[], &BTreeMap::new()).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// ProjectionEngine
// ═══════════════════════════════════════════════════════════════════

mod projection {
    use super::*;

    #[test]
    fn exact_horizon_length() {
        assert_eq!(project(&input(1_000.0, 0.0, 0.0, 0.01, 120)).len(), 120);
        assert!(project(&input(1_000.0, 0.0, 0.0, 0.01, 0)).is_empty());
    }

    #[test]
    fn flat_growth_continues_historical_return() {
        let points = project(&input(1_000.0, 25.0, 0.0, 0.0, 3));
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| approx(p.projected_change_percent, 25.0)));
    }

    #[test]
    fn compounding() {
        let points = project(&input(1_000.0, 0.0, 0.0, 0.01, 2));
        assert!(approx(points[0].projected_value, 1_010.0));
        assert!(approx(points[1].projected_value, 1_020.1));
        assert!(approx(points[1].projected_change_percent, 2.01));
    }

    #[test]
    fn contribution_added_after_growth() {
        let points = project(&input(1_000.0, 0.0, 100.0, 0.01, 2));
        assert!(approx(points[0].projected_value, 1_110.0));
        assert!(approx(points[1].projected_value, 1_110.0 * 1.01 + 100.0));
    }

    #[test]
    fn zero_present_value_stays_finite() {
        let points = project(&input(0.0, 12.0, 50.0, 0.01, 12));
        assert!(approx(points[0].projected_value, 50.0));
        assert!(points.iter().all(|p| p.projected_change_percent == 12.0));
    }

    #[test]
    fn dates_step_one_month_from_anchor() {
        let points = project(&input(1_000.0, 0.0, 0.0, 0.0, 3));
        // anchor is Jan 31; shorter months clamp without drifting
        assert_eq!(points[0].date, day(2024, 2, 29));
        assert_eq!(points[1].date, day(2024, 3, 31));
        assert_eq!(points[2].date, day(2024, 4, 30));
        assert_eq!(month_offset(day(2024, 1, 31), 12), day(2025, 1, 31));
    }

    #[test]
    fn no_impact_columns_on_base_projection() {
        let points = project(&input(1_000.0, 0.0, 0.0, 0.01, 2));
        assert!(points.iter().all(|p| p.impact_value.is_none()));
    }

    #[test]
    fn summary_splits_growth_from_contributions() {
        let inp = input(1_000.0, 0.0, 100.0, 0.01, 12);
        let points = project(&inp);
        let summary = summarize(&inp, &points);
        assert_eq!(summary.horizon_months, 12);
        assert!(approx(summary.total_contributed, 1_200.0));
        assert!(approx(summary.end_value, points[11].projected_value));
        assert!(approx(
            summary.growth,
            summary.end_value - 1_000.0 - 1_200.0
        ));
        assert!(summary.impact_end_value.is_none());
        assert!(summary.impact_effect.is_none());
    }

    #[test]
    fn from_vision_divides_annual_rate() {
        let vision = VisionSettings {
            years: 2,
            monthly_contribution: 250.0,
            scenario: Scenario::Bull,
            impact_amount: 0.0,
        };
        let inp = ProjectionInput::from_vision(&vision, 5_000.0, 3.0, day(2024, 6, 1));
        assert_eq!(inp.horizon_months, 24);
        assert!(approx(inp.monthly_rate, 0.15 / 12.0));
        assert_eq!(inp.monthly_contribution, 250.0);
        assert_eq!(inp.historical_return_percent, 3.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ImpactSimulator
// ═══════════════════════════════════════════════════════════════════

mod impact {
    use super::*;

    #[test]
    fn zero_amount_means_no_ghost() {
        assert!(simulate_impact(&input(1_000.0, 0.0, 0.0, 0.01, 12), 0.0).is_none());
        assert!(simulate_impact(&input(1_000.0, 0.0, 0.0, 0.01, 12), f64::NAN).is_none());
    }

    #[test]
    fn base_columns_match_plain_projection() {
        let inp = input(1_000.0, 5.0, 50.0, 0.008, 24);
        let plain = project(&inp);
        let with_ghost = simulate_impact(&inp, 500.0).unwrap();
        for (a, b) in plain.iter().zip(&with_ghost) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.projected_value, b.projected_value);
            assert_eq!(a.projected_change_percent, b.projected_change_percent);
        }
    }

    #[test]
    fn percent_relative_to_base_present_value() {
        let points = simulate_impact(&input(1_000.0, 0.0, 0.0, 0.0, 1), 500.0).unwrap();
        assert!(approx(points[0].impact_value.unwrap(), 1_500.0));
        assert!(approx(points[0].impact_change_percent.unwrap(), 50.0));
        assert!(approx(points[0].projected_change_percent, 0.0));
    }

    #[test]
    fn delta_compounds_with_rate() {
        let points = simulate_impact(&input(1_000.0, 0.0, 0.0, 0.01, 2), 100.0).unwrap();
        assert!(approx(points[0].impact_delta().unwrap(), 101.0));
        assert!(approx(points[1].impact_delta().unwrap(), 102.01));
    }

    #[test]
    fn negative_amount_is_not_floored() {
        let points = simulate_impact(&input(1_000.0, 0.0, 0.0, 0.01, 3), -2_000.0).unwrap();
        assert!(points[0].impact_value.unwrap() < 0.0);
        assert!(points.iter().all(|p| p.impact_delta().unwrap() < 0.0));
    }

    #[test]
    fn summary_reports_effect() {
        let inp = input(1_000.0, 0.0, 0.0, 0.01, 2);
        let points = simulate_impact(&inp, 100.0).unwrap();
        let summary = summarize(&inp, &points);
        assert!(approx(summary.impact_effect.unwrap(), 102.01));
    }

    #[test]
    fn opportunity_cost_compounds_annually() {
        let cost = opportunity_cost(1_000.0, 10.0, 2);
        assert!(approx(cost.future_value, 1_210.0));
        assert!(approx(cost.profit, 210.0));

        let zero_years = opportunity_cost(1_000.0, 10.0, 0);
        assert!(approx(zero_years.future_value, 1_000.0));

        let loss = opportunity_cost(1_000.0, -50.0, 1);
        assert!(approx(loss.profit, -500.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Window / Zoom
// ═══════════════════════════════════════════════════════════════════

mod zoom_window {
    use super::*;

    #[test]
    fn narrow_window_keeps_two_rows() {
        let rows: Vec<u32> = (0..100).collect();
        let visible = apply_window_bounds(&rows, 49.0, 50.0);
        assert!(visible.len() >= 2);
        assert_eq!(visible[0], 49);
    }

    #[test]
    fn full_window_returns_everything() {
        let rows: Vec<u32> = (0..37).collect();
        assert_eq!(apply_window(&rows, &Window::full()), rows.as_slice());
    }

    #[test]
    fn slices_by_floor_and_ceil() {
        let rows: Vec<u32> = (0..10).collect();
        let w = Window::new(15.0, 55.0).unwrap();
        // floor(1.5) = 1, ceil(5.5) = 6
        assert_eq!(apply_window(&rows, &w), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_rows() {
        let rows: Vec<u32> = Vec::new();
        assert!(apply_window(&rows, &Window::full()).is_empty());
    }

    #[test]
    fn zoom_in_and_out() {
        let w = zoom(&Window::full(), ZoomDirection::In).unwrap();
        assert_eq!(w.left_percent(), 2.0);
        assert_eq!(w.right_percent(), 98.0);
        let back = zoom(&w, ZoomDirection::Out).unwrap();
        assert!(back.is_full());
    }

    #[test]
    fn zoom_out_clamps_to_bounds() {
        let w = Window::new(1.0, 99.5).unwrap();
        let out = zoom(&w, ZoomDirection::Out).unwrap();
        assert_eq!(out.left_percent(), 0.0);
        assert_eq!(out.right_percent(), 100.0);
    }

    #[test]
    fn zoom_in_below_min_span_rejected() {
        let w = Window::new(45.0, 53.0).unwrap();
        assert!(zoom(&w, ZoomDirection::In).is_none());
    }

    #[test]
    fn repeated_zoom_in_never_breaks_min_span() {
        let mut w = Window::full();
        for _ in 0..100 {
            if let Some(next) = zoom(&w, ZoomDirection::In) {
                w = next;
            }
            assert!(w.span() >= 5.0);
        }
        assert!(w.span() < 9.0);
    }

    #[test]
    fn wheel_direction() {
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), ZoomDirection::Out);
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), ZoomDirection::In);
    }

    #[test]
    fn window_view_keeps_projection_summary() {
        let service = ChartService::new();
        let vision = VisionSettings::default();
        let full = service.projection_view(&vision, &[], 1_000.0, day(2024, 1, 1));
        let view = ChartView::Projection(full.clone());
        let w = Window::new(50.0, 60.0).unwrap();

        match window_view(&view, &w) {
            ChartView::Projection(v) => {
                assert!(v.rows.len() < full.rows.len());
                assert_eq!(v.summary, full.summary);
            }
            ChartView::Historical(_) => panic!("mode changed"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Analytics
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    #[test]
    fn stats_from_first_and_last() {
        let history = vec![raw(2024, 1, 1, 1_000.0), raw(2024, 1, 2, 900.0), raw(2024, 1, 3, 1_100.0)];
        let stats = portfolio_stats(&history, 2_000.0);
        assert!(approx(stats.change_percent, 10.0));
        assert!(approx(stats.change, 200.0));
        assert_eq!(stats.value, 2_000.0);
        assert!(stats.is_positive());
    }

    #[test]
    fn stats_empty_or_zero_start() {
        assert_eq!(portfolio_stats(&[], 500.0).change_percent, 0.0);
        let history = vec![raw(2024, 1, 1, 0.0), raw(2024, 1, 2, 10.0)];
        assert_eq!(portfolio_stats(&history, 500.0).change, 0.0);
    }

    fn rows() -> Vec<MergedRow> {
        let mut a = MergedRow::new(day(2024, 1, 1), 0.0);
        a.benchmarks.insert(SeriesId::new("SPX"), 0.0);
        let mut b = MergedRow::new(day(2024, 1, 2), 10.0);
        b.benchmarks.insert(SeriesId::new("SPX"), -10.0);
        vec![a, b]
    }

    #[test]
    fn y_domain_pads_ten_percent() {
        let d = y_domain(&rows(), true, &[SeriesId::new("SPX")]).unwrap();
        assert!(approx(d.min, -12.0));
        assert!(approx(d.max, 12.0));
    }

    #[test]
    fn y_domain_ignores_hidden_portfolio() {
        let d = y_domain(&rows(), false, &[SeriesId::new("SPX")]).unwrap();
        assert!(approx(d.min, -11.0));
        assert!(approx(d.max, 1.0));
    }

    #[test]
    fn y_domain_flat_pads_by_one() {
        let d = y_domain(&rows()[..1], true, &[]).unwrap();
        assert_eq!(d.min, -1.0);
        assert_eq!(d.max, 1.0);
    }

    #[test]
    fn y_domain_nothing_visible() {
        assert!(y_domain(&rows(), false, &[]).is_none());
        assert!(y_domain(&[], true, &[]).is_none());
    }

    #[test]
    fn vision_ticks_nice_steps() {
        let mut row = VisionRow::historical(day(2024, 1, 1), 0.0);
        row.projected_change_percent = Some(87.0);
        // 87 / 5 = 17.4 → 20
        assert_eq!(vision_ticks(&[row]), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn vision_ticks_flat_or_empty() {
        assert!(vision_ticks(&[]).is_empty());
        let row = VisionRow::historical(day(2024, 1, 1), -5.0);
        let ticks = vision_ticks(&[row]);
        assert_eq!(ticks.len(), 6);
        assert!(approx(ticks[5], 1.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart_service {
    use super::*;

    fn snapshot() -> HistorySnapshot {
        let mut snapshot = HistorySnapshot {
            portfolio: vec![raw(2024, 1, 1, 1_000.0), raw(2024, 1, 2, 1_050.0), raw(2024, 1, 3, 1_100.0)],
            benchmarks: BTreeMap::new(),
        };
        snapshot.benchmarks.insert(
            SeriesId::new("SPX"),
            vec![raw(2024, 1, 1, 4_000.0), raw(2024, 1, 3, 4_200.0)],
        );
        snapshot.benchmarks.insert(
            SeriesId::new("GOLD"),
            vec![raw(2024, 1, 1, 2_000.0), raw(2024, 1, 2, 2_020.0)],
        );
        snapshot
    }

    #[test]
    fn historical_view_only_selected_benchmarks() {
        let mut settings = ChartSettings::for_user("alice");
        settings.benchmarks = vec![SeriesId::new("SPX")];
        let view = ChartService::new().build_view(&settings, &snapshot(), 1_100.0, day(2024, 1, 3));

        let ChartView::Historical(view) = view else {
            panic!("expected historical view");
        };
        assert_eq!(view.rows.len(), 3);
        assert!(view.rows.iter().all(|r| r.value("GOLD").is_none()));
        assert!(approx(view.rows[2].value("SPX").unwrap(), 5.0));
        assert!(approx(view.rows[2].portfolio, 10.0));
    }

    #[test]
    fn vision_view_excludes_benchmarks_and_stitches() {
        let mut settings = ChartSettings::for_user("alice");
        settings.benchmarks = vec![SeriesId::new("SPX")];
        settings.mode = ChartMode::Vision;
        settings.vision.years = 1;
        settings.vision.scenario = Scenario::Custom(0.0);

        let view = ChartService::new().build_view(&settings, &snapshot(), 1_100.0, day(2030, 1, 1));
        let ChartView::Projection(view) = view else {
            panic!("expected projection view");
        };

        // 3 historical days + 12 projected months
        assert_eq!(view.rows.len(), 15);
        let last_hist = &view.rows[2];
        assert!(approx(last_hist.portfolio.unwrap(), 10.0));
        assert!(!last_hist.is_projected());

        let first_proj = &view.rows[3];
        assert_eq!(first_proj.date, day(2024, 2, 3));
        assert!(first_proj.portfolio.is_none());
        assert!(approx(first_proj.projected_change_percent.unwrap(), 10.0));
        assert_eq!(view.summary.horizon_months, 12);
    }

    #[test]
    fn vision_view_with_impact() {
        let mut vision = VisionSettings::default();
        vision.years = 1;
        vision.impact_amount = 1_000.0;
        let view = ChartService::new().projection_view(&vision, &snapshot().portfolio, 1_000.0, day(2024, 1, 3));
        let projected: Vec<&VisionRow> = view.rows.iter().filter(|r| r.is_projected()).collect();
        assert_eq!(projected.len(), 12);
        assert!(projected.iter().all(|r| r.impact_value.is_some()));
        assert!(view.summary.impact_effect.unwrap() > 1_000.0);
    }

    #[test]
    fn empty_history_anchors_projection_today() {
        let vision = VisionSettings::default();
        let view = ChartService::new().projection_view(&vision, &[], 1_000.0, day(2024, 5, 15));
        assert_eq!(view.rows.len(), 120);
        assert_eq!(view.rows[0].date, day(2024, 6, 15));
        assert!(view.rows.iter().all(|r| r.portfolio.is_none()));
    }

    #[test]
    fn identical_inputs_identical_output() {
        let mut settings = ChartSettings::for_user("alice");
        settings.benchmarks = vec![SeriesId::new("SPX"), SeriesId::new("GOLD")];
        let service = ChartService::new();
        let a = service.build_view(&settings, &snapshot(), 1_100.0, day(2024, 1, 3));
        let b = service.build_view(&settings, &snapshot(), 1_100.0, day(2024, 1, 3));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
