use proptest::prelude::*;
use spectrum_rs::api::{SeriesStore, StoreConfig};
use spectrum_rs::core::{
    DenseSamples, Extent, ExtremumRule, SeriesAccessors, SeriesData, SeriesWindow, bin_series,
    orient, window_points,
};
use spectrum_rs::parse::ParsedSeries;

fn dense(values: Vec<f64>) -> DenseSamples {
    let len = values.len() as f64;
    DenseSamples::new(values, Extent::new(0.0, len).expect("extent"))
}

fn parsed(id: String, x: (f64, f64), y: (f64, f64)) -> ParsedSeries {
    let x_limits = Extent::new(x.0, x.1).expect("x extent");
    let y_limits = Extent::new(y.0, y.1).expect("y extent");
    ParsedSeries {
        id,
        title: None,
        accessors: SeriesAccessors::new("x", "y"),
        x_limits,
        y_limits,
        data: SeriesData::Dense(DenseSamples::new(vec![y_limits.min, y_limits.max], x_limits)),
    }
}

proptest! {
    #[test]
    fn orientation_is_an_involution(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
        descending in any::<bool>()
    ) {
        prop_assert_eq!(orient(descending, orient(descending, (a, b))), (a, b));
        prop_assert_eq!(orient(false, (a, b)), (a, b));
    }

    #[test]
    fn shrinking_domain_never_widens_the_window(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 2..400),
        insets in prop::collection::vec((0.0f64..0.05, 0.0f64..0.05), 1..12),
        pixel_width in 1u32..800
    ) {
        let source = dense(values);
        let len = source.values().len() as f64;
        let mut window = SeriesWindow::full(source.values().len());
        let (mut x0, mut x1) = (0.0, len);

        for (left, right) in insets {
            let next_x0 = x0 + left * len;
            let next_x1 = x1 - right * len;
            if next_x1 <= next_x0 {
                break;
            }
            x0 = next_x0;
            x1 = next_x1;

            let pass = bin_series(&source, window, (x0, x1), pixel_width, 1.0, ExtremumRule::Max);
            prop_assert!(pass.window.low >= window.low);
            prop_assert!(pass.window.high <= window.high);
            window = pass.window;
        }
    }

    #[test]
    fn binned_points_stay_in_domain_and_ordered(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..600),
        lo_frac in 0.0f64..0.5,
        hi_frac in 0.5f64..1.0,
        pixel_width in 1u32..500,
        bin_width_px in 0.5f64..8.0
    ) {
        let source = dense(values);
        let len = source.values().len() as f64;
        let extent = (lo_frac * len, hi_frac * len);

        let pass = bin_series(
            &source,
            SeriesWindow::full(source.values().len()),
            extent,
            pixel_width,
            bin_width_px,
            ExtremumRule::Max,
        );
        let points = pass.outcome.points();
        let bin_count = (f64::from(pixel_width) / bin_width_px).ceil().max(1.0) as usize;

        prop_assert!(points.len() <= bin_count);
        for point in points {
            prop_assert!(point.x >= extent.0 && point.x <= extent.1);
        }
        for pair in points.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
    }

    #[test]
    fn full_domain_binning_preserves_the_global_extremum(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..600),
        pixel_width in 1u32..300,
        use_min in any::<bool>()
    ) {
        let expected = if use_min {
            values.iter().copied().fold(f64::INFINITY, f64::min)
        } else {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        };
        let rule = if use_min { ExtremumRule::Min } else { ExtremumRule::Max };
        let source = dense(values);
        let len = source.values().len();

        let extent = (0.0, len as f64);
        let pass = bin_series(&source, SeriesWindow::full(len), extent, pixel_width, 1.0, rule);
        let ys = pass.outcome.points().iter().map(|point| point.y);
        let actual = if use_min {
            ys.fold(f64::INFINITY, f64::min)
        } else {
            ys.fold(f64::NEG_INFINITY, f64::max)
        };
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn windowed_points_match_a_linear_filter(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 1..300),
        lo_frac in 0.0f64..1.0,
        width_frac in 0.0f64..1.0
    ) {
        let source = dense(values);
        let len = source.values().len() as f64;
        let x0 = lo_frac * len;
        let x1 = x0 + width_frac * (len - x0);

        let pass = window_points(&source, SeriesWindow::full(source.values().len()), (x0, x1));
        let indices: Vec<usize> = pass.outcome.points().iter().map(|point| point.index).collect();
        let expected: Vec<usize> = (0..source.values().len())
            .filter(|&index| {
                let x = index as f64;
                x >= x0 && x <= x1
            })
            .collect();
        prop_assert_eq!(indices, expected);
    }

    #[test]
    fn merged_extents_contain_both_inputs(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
        c in -1.0e6f64..1.0e6,
        d in -1.0e6f64..1.0e6
    ) {
        let left = Extent::new(a, b).expect("left");
        let right = Extent::new(c, d).expect("right");
        let merged = left.merge(right);

        prop_assert!(merged.min <= left.min && merged.min <= right.min);
        prop_assert!(merged.max >= left.max && merged.max >= right.max);
        prop_assert_eq!(Extent::EMPTY.merge(left), left);
    }

    #[test]
    fn store_extents_never_shrink_across_loads_and_removals(
        bounds in prop::collection::vec(
            ((-1.0e4f64..1.0e4, -1.0e4f64..1.0e4), (-1.0e4f64..1.0e4, -1.0e4f64..1.0e4)),
            1..16
        ),
        removals in prop::collection::vec(0usize..16, 0..8)
    ) {
        let mut store = SeriesStore::new(StoreConfig::default()).expect("store init");
        let mut previous = (store.global_x_extent(), store.global_y_extent());

        for (index, (x, y)) in bounds.into_iter().enumerate() {
            store.insert(parsed(format!("s{index}"), x, y)).expect("unique id");
            let current = (store.global_x_extent(), store.global_y_extent());
            prop_assert!(current.0.min <= previous.0.min && current.0.max >= previous.0.max);
            prop_assert!(current.1.min <= previous.1.min && current.1.max >= previous.1.max);
            previous = current;
        }

        for index in removals {
            store.remove(index);
            prop_assert_eq!(store.global_x_extent(), previous.0);
            prop_assert_eq!(store.global_y_extent(), previous.1);
        }
    }
}
