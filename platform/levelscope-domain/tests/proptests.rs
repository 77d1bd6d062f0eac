use levelscope_domain::services::extrema::{detect_extrema, PeakSearch};
use levelscope_domain::services::fibonacci::fibonacci_levels;
use levelscope_domain::services::gann::gann_levels;
use levelscope_domain::services::labels::{layout_labels, DrawArea, FnAxis};
use levelscope_domain::services::weekly::{aggregate_weekly, week_start_day, WeeklyWindow};
use levelscope_domain::value_objects::bar::{Bar, MAX_PRICE, MILLIS_PER_DAY};
use levelscope_domain::value_objects::level::{Level, LevelKind};
use levelscope_domain::value_objects::series::Series;
use proptest::prelude::*;

// 2024-01-01
const BASE_DAY: i64 = 19_723;

fn arb_bars() -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(
        (
            1i64..4,
            0.01f64..1_000.0,
            0.0f64..50.0,
            0.0f64..=1.0,
            0.0f64..=1.0,
            0u64..1_000_000,
        ),
        1..120,
    )
    .prop_map(|rows| {
        let mut day = BASE_DAY;
        rows.into_iter()
            .map(|(step, low, spread, open_frac, close_frac, volume)| {
                day += step;
                Bar {
                    timestamp: day * MILLIS_PER_DAY,
                    open: low + spread * open_frac,
                    high: low + spread,
                    low,
                    close: low + spread * close_frac,
                    volume,
                }
            })
            .collect()
    })
}

fn series(bars: Vec<Bar>) -> Series {
    Series::from_bars(bars).expect("generated bars are valid")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lowest_low_is_first_arg_min(bars in arb_bars()) {
        let series = series(bars);
        let extrema = detect_extrema(&series, &PeakSearch::unbounded()).expect("non-empty");
        let lows: Vec<f64> = series.bars().iter().map(|b| b.low).collect();
        let min = lows.iter().copied().fold(f64::INFINITY, f64::min);
        let first = lows.iter().position(|&l| l == min).expect("min exists");
        prop_assert_eq!(extrema.lowest_low.index, first);
        prop_assert_eq!(extrema.lowest_low.price, min);
    }

    #[test]
    fn detected_peak_is_first_strict_local_max_after_low(bars in arb_bars()) {
        let series = series(bars);
        let extrema = detect_extrema(&series, &PeakSearch::unbounded()).expect("non-empty");
        let highs: Vec<f64> = series.bars().iter().map(|b| b.high).collect();
        let is_peak = |i: usize| i > 0 && i + 1 < highs.len() && highs[i] > highs[i - 1] && highs[i] > highs[i + 1];
        let low = extrema.lowest_low.index;

        match extrema.first_peak {
            Some(peak) => {
                prop_assert!(peak.index > low);
                prop_assert!(is_peak(peak.index));
                prop_assert_eq!(peak.price, highs[peak.index]);
                prop_assert!((low + 1..peak.index).all(|i| !is_peak(i)));
            }
            None => prop_assert!((low + 1..highs.len()).all(|i| !is_peak(i))),
        }
    }

    #[test]
    fn gann_levels_strictly_increase(
        low in prop_oneof![0.0f64..100_000.0, 0.0f64..=MAX_PRICE],
        gap in prop::option::of(-50.0f64..5_000.0),
    ) {
        let peak = gap.map(|g| low + g);
        let levels = gann_levels(low, peak).levels;
        prop_assert_eq!(levels.len(), 3);
        prop_assert!(levels[0].price < levels[1].price);
        prop_assert!(levels[1].price < levels[2].price);
    }

    #[test]
    fn fibonacci_levels_strictly_increase_from_peak(low in 0.0f64..10_000.0, gap in 0.01f64..5_000.0) {
        let peak = low + gap;
        let levels = fibonacci_levels(low, Some(peak));
        prop_assert_eq!(levels.len(), 4);
        prop_assert_eq!(levels[0].price, peak);
        prop_assert!(levels.windows(2).all(|w| w[0].price < w[1].price));
    }

    #[test]
    fn weekly_bars_bound_their_days(bars in arb_bars()) {
        let series = series(bars);
        let weeks = aggregate_weekly(&series, &WeeklyWindow { max_weeks: usize::MAX, as_of: None });
        let truncated = aggregate_weekly(&series, &WeeklyWindow::default());
        prop_assert!(truncated.len() <= 26);
        prop_assert_eq!(&weeks[weeks.len() - truncated.len()..], &truncated[..]);

        for week in &weeks {
            let start = week.timestamp / MILLIS_PER_DAY;
            let days: Vec<&Bar> = series
                .bars()
                .iter()
                .filter(|b| week_start_day(b.epoch_day()) == start)
                .collect();
            prop_assert!(!days.is_empty());
            prop_assert!(days.iter().all(|d| d.high <= week.high && d.low >= week.low));
            prop_assert_eq!(days.iter().map(|d| d.volume).sum::<u64>(), week.volume);
            prop_assert_eq!(days[0].open, week.open);
            prop_assert_eq!(days[days.len() - 1].close, week.close);
        }
    }

    #[test]
    fn label_positions_are_spaced(
        prices in prop::collection::vec(0.0f64..600.0, 0..40),
        spacing in 1.0f64..30.0,
    ) {
        let levels: Vec<Level> = prices
            .iter()
            .map(|&p| Level::new(LevelKind::Gann { degrees: 180 }, p, "#000", "x"))
            .collect();
        let axis = FnAxis::new(DrawArea::new(0.0, 500.0).expect("area"), |p| p);
        let placed = layout_labels(&levels, &axis, spacing).expect("layout");
        prop_assert_eq!(placed.len(), prices.iter().filter(|&&p| p <= 500.0).count());
        for pair in placed.windows(2) {
            prop_assert!(pair[1].y > pair[0].y);
            prop_assert!(pair[1].y - pair[0].y >= spacing - 1e-9);
        }
    }
}
