//! Example: full scoring pipeline on a synthetic monthly panel.
//!
//! 1. Clip and standardize factor exposures per month
//! 2. Append industry dummies and neutralize every factor against them
//! 3. Score with each rank-weighting method and the cap-scenario method
//! 4. Rebuild returns with the lagged cross-sectional regression
//!
//! Run with: `cargo run -p segovia --example full_pipeline`

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, LogNormal, Normal};
use segovia::{
    math::{ExtremeMethod, ScaleMethod},
    model::{NeutralizeConfig, Neutralizer, Regressor},
    primitives::{Date, Direction, FactorName, Panel, StratifiedIcRecord, Stratum, Symbol},
    score::{DirectionSpec, ScoreConfig, ScoreMethod, Scorer},
    utils::{DirectionTable, IndustryTable, StratifiedIcTable, add_industry, de_extreme, standardize_panel},
};

const MONTHS: usize = 24;
const SYMBOLS: usize = 200;
const FACTORS: [&str; 4] = ["M001", "M002", "M003", "M004"];
const INDUSTRIES: [&str; 4] = ["banks", "energy", "software", "utilities"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let mut rng = StdRng::seed_from_u64(42);

    let raw = synthetic_panel(&mut rng)?;
    println!("raw panel: {} rows, factors {:?}", raw.len(), raw.factor_names());

    // Step 1: per-month outlier clipping and standardization
    let clean = standardize_panel(&de_extreme(&raw, 3.0, ExtremeMethod::Mad)?, ScaleMethod::Normal)?;

    // Step 2: industry neutralization
    let industries = industry_table(&mut rng);
    let with_dummies = add_industry(&clean, &industries)?;
    let neutralizer = Neutralizer::with_config(NeutralizeConfig {
        explanatory: INDUSTRIES.iter().map(ToString::to_string).collect(),
        ..Default::default()
    })?;
    let neutral = neutralizer.neutralize_by_date(&with_dummies.to_frame()?)?.drop_many(INDUSTRIES);
    let panel = Panel::from_frame(&neutral)?;
    println!("neutralized factors: {:?}", panel.factor_names());

    // Step 3: scoring
    let directions: DirectionTable = FACTORS
        .iter()
        .map(|code| (FactorName::from(*code), Direction::from_ascend_flag(*code == "M004")))
        .collect();
    let stratified = StratifiedIcTable::new("M004023", stratified_records(&mut rng));
    for method in ScoreMethod::ALL {
        let scorer = Scorer::with_config(ScoreConfig { method, ..Default::default() })
            .with_direction_source(Arc::new(directions.clone()))
            .with_stratified_ic_source(Arc::new(stratified.clone()));
        let scored = scorer.score(&panel)?;
        let finite = scored.values().iter().filter(|v| v.is_finite()).count();
        println!("\n{method}: {finite} finite scores\n{}", scored.to_frame()?.head(Some(5)));
    }

    // Step 4: lagged regression
    let modeled = Regressor::new().regress(&panel)?;
    println!(
        "\nmodeled returns for {} of {} rows\n{}",
        modeled.values().len(),
        panel.len(),
        modeled.to_frame()?.head(Some(5))
    );

    Ok(())
}

/// Month-end panel where `M001` predicts next-month returns and `M004` is
/// reversed.
fn synthetic_panel(rng: &mut StdRng) -> Result<Panel, Box<dyn std::error::Error>> {
    let normal = Normal::new(0.0, 1.0)?;
    let caps = LogNormal::new(22.0, 1.5)?;
    let rows = MONTHS * SYMBOLS;
    let mut dates = Vec::with_capacity(rows);
    let mut symbols = Vec::with_capacity(rows);
    let mut factors: Vec<Vec<f64>> = vec![Vec::with_capacity(rows); FACTORS.len()];
    let mut ret = Vec::with_capacity(rows);
    let mut cap = Vec::with_capacity(rows);

    for m in 0..MONTHS {
        let date = Date::from_ymd_opt(2022 + (m / 12) as i32, (m % 12) as u32 + 1, 28)
            .ok_or("invalid month")?;
        for s in 0..SYMBOLS {
            dates.push(date);
            symbols.push(Symbol::new(format!("{:06}", 600_000 + s)));
            let x: Vec<f64> = (0..FACTORS.len()).map(|_| normal.sample(rng)).collect();
            ret.push(0.02 * x[0] - 0.01 * x[3] + 0.05 * normal.sample(rng));
            for (column, value) in factors.iter_mut().zip(&x) {
                column.push(if rng.gen_bool(0.02) { f64::NAN } else { *value });
            }
            cap.push(caps.sample(rng));
        }
    }

    let mut builder = Panel::builder(dates, symbols).ret(ret).cap(cap);
    for (name, values) in FACTORS.iter().zip(factors) {
        builder = builder.factor(*name, values);
    }
    Ok(builder.build()?)
}

fn industry_table(rng: &mut StdRng) -> IndustryTable {
    IndustryTable::new(
        (0..SYMBOLS)
            .map(|s| {
                let label = INDUSTRIES[rng.gen_range(0..INDUSTRIES.len())];
                (Symbol::new(format!("{:06}", 600_000 + s)), label.to_string())
            })
            .collect(),
    )
}

/// Monthly stratified IC reference: `M001` works best among large caps.
fn stratified_records(rng: &mut StdRng) -> Vec<StratifiedIcRecord> {
    let mut records = Vec::new();
    for m in 0..MONTHS {
        let Some(date) = Date::from_ymd_opt(2022 + (m / 12) as i32, (m % 12) as u32 + 1, 28) else {
            continue;
        };
        for stratum in Stratum::ALL {
            for code in FACTORS {
                let centre = match (code, stratum) {
                    ("M001", Stratum::High) => 0.08,
                    ("M001", Stratum::Low) => 0.03,
                    _ => 0.01,
                };
                let ic = centre + rng.gen_range(-0.02..0.02);
                records.push(StratifiedIcRecord { date, stratum, factor: code.into(), ic });
            }
        }
    }
    records
}
