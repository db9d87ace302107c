//! Property tests over randomly generated price paths

use chrono::NaiveDate;
use ohlcv_features::config::FeatureConfig;
use ohlcv_features::data::write_features;
use ohlcv_features::pipeline::FeaturePipeline;
use ohlcv_features::table::PriceTable;
use ohlcv_features::types::PriceRow;
use proptest::prelude::*;

fn build(steps: &[(f64, u32)]) -> PriceTable {
    let start = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();
    let mut close = 100.0;
    let rows = steps
        .iter()
        .enumerate()
        .map(|(i, &(change, volume))| {
            close = (close * (1.0 + change)).max(1.0);
            PriceRow::new(
                start + chrono::Duration::days(i as i64),
                close,
                close * 1.01,
                close * 0.99,
                close,
                volume as f64,
            )
        })
        .collect();
    PriceTable::new(rows).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn obv_steps_by_signed_volume(steps in prop::collection::vec((-0.05f64..0.05, 0u32..100_000), 20..80)) {
        let pipeline = FeaturePipeline::standard(&FeatureConfig::default()).unwrap();
        let features = pipeline.run(&build(&steps)).unwrap();

        let obv = features.column("on_balance_volume").unwrap();
        let change = features.column("dollar_pnl").unwrap();
        let volume = features.column("volume").unwrap();
        for i in 1..features.len() {
            let expected = if change[i] < 0.0 { -volume[i] } else { volume[i] };
            prop_assert_eq!(obv[i] - obv[i - 1], expected);
        }
    }

    #[test]
    fn pipeline_is_deterministic(steps in prop::collection::vec((-0.05f64..0.05, 1u32..50_000), 20..120)) {
        let prices = build(&steps);
        let pipeline = FeaturePipeline::standard(&FeatureConfig::default()).unwrap();

        let mut first = Vec::new();
        let mut second = Vec::new();
        write_features(&pipeline.run(&prices).unwrap(), &mut first).unwrap();
        write_features(&pipeline.run(&prices).unwrap(), &mut second).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn returns_match_close_ratio(steps in prop::collection::vec((-0.05f64..0.05, 1u32..1_000), 20..60)) {
        let prices = build(&steps);
        let pipeline = FeaturePipeline::standard(&FeatureConfig::default()).unwrap();
        let features = pipeline.run(&prices).unwrap();

        prop_assert_eq!(features.len(), prices.len() - 2);
        let returns = features.column("return").unwrap();
        let rows = prices.rows();
        for (i, r) in returns.iter().enumerate() {
            prop_assert_eq!(*r, rows[i + 1].close / rows[i].close);
        }
    }
}
