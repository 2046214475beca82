//! Industry dummy columns from a classification source.

use std::collections::{BTreeSet, HashMap};

use segovia_primitives::{FactorName, Panel, Symbol};
use segovia_traits::IndustrySource;
use tracing::info;

use crate::UtilsError;

/// Maximum number of symbols sent to the industry source per request.
pub const INDUSTRY_BATCH_SIZE: usize = 100;

/// Append one `0/1` column per industry label found for the panel's symbols.
///
/// Columns are named after the labels and sorted. Unclassified securities
/// get `0` in every industry column.
///
/// # Errors
///
/// Returns an error if the source fails or a label collides with an existing
/// or reserved column.
pub fn add_industry(panel: &Panel, source: &dyn IndustrySource) -> Result<Panel, UtilsError> {
    let symbols: BTreeSet<&Symbol> = panel.index().symbols().iter().collect();
    let symbols: Vec<Symbol> = symbols.into_iter().cloned().collect();

    let mut industry: HashMap<Symbol, String> = HashMap::with_capacity(symbols.len());
    let mut batches = 0;
    for batch in symbols.chunks(INDUSTRY_BATCH_SIZE) {
        industry.extend(source.industries(batch)?);
        batches += 1;
    }

    let labels: BTreeSet<&String> = industry.values().collect();
    let columns: Vec<(FactorName, Vec<f64>)> = labels
        .iter()
        .map(|&label| {
            let dummy = panel
                .index()
                .symbols()
                .iter()
                .map(|s| if industry.get(s) == Some(label) { 1.0 } else { 0.0 })
                .collect();
            (FactorName::new(label.as_str()), dummy)
        })
        .collect();

    info!(industries = columns.len(), batches, "industry dummies added");
    Ok(panel.with_factor_columns(columns)?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use segovia_primitives::Date;
    use segovia_traits::SourceError;

    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
        largest: AtomicUsize,
    }

    impl IndustrySource for Counting {
        fn industries(&self, batch: &[Symbol]) -> Result<HashMap<Symbol, String>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.largest.fetch_max(batch.len(), Ordering::SeqCst);
            Ok(batch
                .iter()
                .filter(|s| s.as_str() != "S0003")
                .map(|s| {
                    let n: usize = s.as_str()[1..].parse().unwrap_or(0);
                    let label = if n % 2 == 0 { "banks" } else { "energy" };
                    (s.clone(), label.to_string())
                })
                .collect())
        }
    }

    fn panel(n: usize) -> Panel {
        let date = Date::from_ymd_opt(2024, 1, 31).unwrap();
        Panel::builder(vec![date; n], (0..n).map(|i| Symbol::new(format!("S{i:04}"))).collect())
            .factor("M001", vec![1.0; n])
            .ret(vec![0.0; n])
            .build()
            .unwrap()
    }

    #[test]
    fn queries_in_batches() {
        let source = Counting::default();
        add_industry(&panel(250), &source).unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(source.largest.load(Ordering::SeqCst), INDUSTRY_BATCH_SIZE);
    }

    #[test]
    fn builds_sorted_dummies() {
        let enriched = add_industry(&panel(4), &Counting::default()).unwrap();
        let names: Vec<&str> = enriched.factor_names().iter().map(FactorName::as_str).collect();
        assert_eq!(names, vec!["M001", "banks", "energy"]);
        assert_eq!(enriched.factor("banks").unwrap().to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
        // S0003 is unclassified
        assert_eq!(enriched.factor("energy").unwrap().to_vec(), vec![0.0, 1.0, 0.0, 0.0]);
    }
}
