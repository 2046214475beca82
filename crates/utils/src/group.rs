//! Per-date grouping of a panel column.

use segovia_math::assign_groups;
use segovia_primitives::Panel;
use serde::{Deserialize, Serialize};

use crate::UtilsError;

/// Configuration for [`add_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Number of groups per date.
    pub num_group: usize,
    /// Rank ascending (smallest value in `Q01`) instead of descending.
    pub ascending: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self { num_group: 5, ascending: false }
    }
}

/// Label every row with its group (`Q01..Qk`) inside its date by `column`.
///
/// `column` may be a factor, `ret`, `cap` or `benchmark_returns`. The labels
/// are stored as the panel's `group` column.
///
/// # Errors
///
/// Returns an error if the column does not exist or `num_group` is zero.
pub fn add_group(panel: &Panel, column: &str, config: GroupConfig) -> Result<Panel, UtilsError> {
    let values = panel.column(column).ok_or_else(|| UtilsError::MissingColumn(column.to_string()))?;
    let mut labels = vec![String::new(); panel.len()];
    for slice in panel.date_slices() {
        let groups = assign_groups(
            values.slice(ndarray::s![slice.start..slice.end]),
            config.num_group,
            config.ascending,
        )?;
        for (label, group) in labels[slice.range()].iter_mut().zip(groups) {
            *label = group.to_string();
        }
    }
    Ok(panel.with_group(labels)?)
}

#[cfg(test)]
mod tests {
    use segovia_primitives::Date;

    use super::*;

    fn panel() -> Panel {
        let d1 = Date::from_ymd_opt(2024, 1, 31).unwrap();
        let d2 = Date::from_ymd_opt(2024, 2, 29).unwrap();
        Panel::builder(
            vec![d1, d1, d1, d2, d2, d2],
            vec!["A".into(), "B".into(), "C".into(), "A".into(), "B".into(), "C".into()],
        )
        .factor("value", vec![3.0, 1.0, 2.0, 1.0, 2.0, 3.0])
        .ret(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
        .build()
        .unwrap()
    }

    #[test]
    fn groups_within_each_date() {
        let grouped = add_group(&panel(), "value", GroupConfig { num_group: 2, ascending: false })
            .unwrap();
        let labels = grouped.group().unwrap();
        assert_eq!(labels, &["Q01", "Q02", "Q01", "Q02", "Q01", "Q01"]);
    }

    #[test]
    fn groups_by_return_column() {
        let grouped =
            add_group(&panel(), "ret", GroupConfig { num_group: 3, ascending: true }).unwrap();
        assert_eq!(grouped.group().unwrap()[0], "Q01");
        assert_eq!(grouped.group().unwrap()[2], "Q03");
    }

    #[test]
    fn unknown_column_errors() {
        let err = add_group(&panel(), "missing", GroupConfig::default()).unwrap_err();
        assert!(matches!(err, UtilsError::MissingColumn(_)));
    }
}
