use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Consecutive days with at least one submission, walking backward from
/// `as_of`. Several submissions on one day count once; the first gap stops
/// the walk, so a user who skipped `as_of` has a streak of 0.
pub fn consecutive_days(days: &HashSet<NaiveDate>, as_of: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = as_of;

    while days.contains(&cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(previous) => previous,
            None => break, // ran off the calendar
        };
    }

    streak
}

/// Current streak for an author, ending at `as_of`.
pub async fn current_streak(
    db: &PgPool,
    author_id: Uuid,
    as_of: NaiveDate,
) -> Result<u32, sqlx::Error> {
    let rows: Vec<(NaiveDate,)> = sqlx::query_as(
        "SELECT DISTINCT prompt_date FROM submissions WHERE author_id = $1 AND prompt_date <= $2",
    )
    .bind(author_id)
    .bind(as_of)
    .fetch_all(db)
    .await?;

    let days: HashSet<NaiveDate> = rows.into_iter().map(|(d,)| d).collect();

    Ok(consecutive_days(&days, as_of))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_submission_on_as_of_means_zero() {
        let days = HashSet::from([date(2025, 6, 9)]);
        assert_eq!(consecutive_days(&days, date(2025, 6, 10)), 0);
    }

    #[test]
    fn test_single_day_streak() {
        let days = HashSet::from([date(2025, 6, 10)]);
        assert_eq!(consecutive_days(&days, date(2025, 6, 10)), 1);
    }

    #[test]
    fn test_three_days_then_gap() {
        let days = HashSet::from([
            date(2025, 6, 10),
            date(2025, 6, 9),
            date(2025, 6, 8),
            // gap at the 7th
            date(2025, 6, 6),
        ]);
        assert_eq!(consecutive_days(&days, date(2025, 6, 10)), 3);
    }

    #[test]
    fn test_walk_crosses_month_boundaries() {
        let days = HashSet::from([date(2025, 7, 1), date(2025, 6, 30)]);
        assert_eq!(consecutive_days(&days, date(2025, 7, 1)), 2);
    }

    #[test]
    fn test_duplicate_days_collapse() {
        let rows = vec![date(2025, 6, 10), date(2025, 6, 10), date(2025, 6, 9)];
        let days: HashSet<NaiveDate> = rows.into_iter().collect();
        assert_eq!(consecutive_days(&days, date(2025, 6, 10)), 2);
    }
}
