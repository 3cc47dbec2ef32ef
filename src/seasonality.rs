use crate::models::{MonthAverage, MonthlySnapshot, SeasonalityExtremes};

/// Best and worst calendar months for new-patient acquisition.
///
/// Snapshots are grouped by their stored `month_name` (case-sensitive) so
/// the same month across years lands in one group. Ties keep the group that
/// appeared first in the sequence. Empty input has no extremes.
pub fn analyze_seasonality(snapshots: &[MonthlySnapshot]) -> Option<SeasonalityExtremes> {
    if snapshots.is_empty() {
        return None;
    }

    // Insertion-ordered groups; N is at most a few dozen months, so the
    // linear scan beats bringing in an ordered map.
    let mut groups: Vec<(String, Vec<i64>)> = Vec::new();
    for snapshot in snapshots {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == snapshot.month_name)
        {
            Some((_, samples)) => samples.push(snapshot.entered),
            None => groups.push((snapshot.month_name.clone(), vec![snapshot.entered])),
        }
    }

    let averages: Vec<MonthAverage> = groups
        .into_iter()
        .map(|(month_name, samples)| MonthAverage {
            month_name,
            average_entries: samples.iter().sum::<i64>() as f64 / samples.len() as f64,
        })
        .collect();

    let mut best = &averages[0];
    let mut worst = &averages[0];
    for candidate in &averages[1..] {
        if candidate.average_entries > best.average_entries {
            best = candidate;
        }
        if candidate.average_entries < worst.average_entries {
            worst = candidate;
        }
    }

    Some(SeasonalityExtremes {
        best_month: best.clone(),
        worst_month: worst.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(month_number: i32, month_name: &str, year: i32, entered: i64) -> MonthlySnapshot {
        MonthlySnapshot::from_raw(
            month_number,
            Some(month_name.to_string()),
            year,
            Some(50),
            Some(entered),
            Some(1),
            Some(0.08),
            Some(0.85),
        )
    }

    #[test]
    fn empty_input_has_no_extremes() {
        assert_eq!(analyze_seasonality(&[]), None);
    }

    #[test]
    fn averages_span_multiple_years_of_the_same_month() {
        let extremes = analyze_seasonality(&[
            snapshot(1, "Janeiro", 2025, 10),
            snapshot(7, "Julho", 2025, 5),
            snapshot(13, "Janeiro", 2026, 20),
            snapshot(19, "Julho", 2026, 3),
        ])
        .unwrap();
        assert_eq!(extremes.best_month.month_name, "Janeiro");
        assert_eq!(extremes.best_month.average_entries, 15.0);
        assert_eq!(extremes.worst_month.month_name, "Julho");
        assert_eq!(extremes.worst_month.average_entries, 4.0);
    }

    #[test]
    fn ties_keep_the_first_encountered_month() {
        let extremes = analyze_seasonality(&[
            snapshot(1, "Março", 2026, 8),
            snapshot(2, "Abril", 2026, 8),
        ])
        .unwrap();
        assert_eq!(extremes.best_month.month_name, "Março");
        assert_eq!(extremes.worst_month.month_name, "Março");
    }

    #[test]
    fn grouping_is_case_sensitive_on_the_stored_label() {
        let extremes = analyze_seasonality(&[
            snapshot(1, "janeiro", 2025, 2),
            snapshot(13, "Janeiro", 2026, 10),
        ])
        .unwrap();
        assert_eq!(extremes.best_month.month_name, "Janeiro");
        assert_eq!(extremes.worst_month.month_name, "janeiro");
    }

    #[test]
    fn single_group_is_both_best_and_worst() {
        let extremes = analyze_seasonality(&[snapshot(1, "Maio", 2026, 6)]).unwrap();
        assert_eq!(extremes.best_month, extremes.worst_month);
    }
}
