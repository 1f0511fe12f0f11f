//! Activity reorder engine.
//!
//! Per-day activity lists are never stored. They are derived from the flat
//! activity collection on every call, and a move produces a diff against
//! that derived view. Callers persist only the diff.

use chrono::NaiveDate;
use shared::{Activity, ActivityChange};

use super::models::{DayPosition, ReorderError, ReorderPlan};
use super::timeline::activities_on;

/// Activities of one day in display order
pub fn day_list<'a>(activities: &'a [Activity], date: NaiveDate) -> Vec<&'a Activity> {
    activities_on(activities, date)
}

/// Plan moving `activity_id` to `destination_index` on `destination_date`
///
/// The index is clamped to the destination day's length once the moving
/// activity has been taken out. Only activities whose `(date, order)`
/// differ afterwards appear in the plan's changes; a move onto the
/// activity's own position yields an empty plan.
pub fn plan_move(
    activities: &[Activity],
    activity_id: &str,
    destination_date: NaiveDate,
    destination_index: usize,
) -> Result<ReorderPlan, ReorderError> {
    let moving = activities
        .iter()
        .find(|activity| activity.id == activity_id)
        .ok_or_else(|| ReorderError::UnknownActivity(activity_id.to_string()))?;

    let source_date = moving.date;
    let mut source_list = day_list(activities, source_date);
    let source_index = source_list
        .iter()
        .position(|activity| activity.id == activity_id)
        .unwrap_or_default();
    source_list.remove(source_index);

    let mut destination_list = if destination_date == source_date {
        source_list.clone()
    } else {
        day_list(activities, destination_date)
    };
    let insert_at = destination_index.min(destination_list.len());

    let from = DayPosition {
        date: source_date,
        index: source_index,
    };
    let to = DayPosition {
        date: destination_date,
        index: insert_at,
    };

    if from == to {
        return Ok(ReorderPlan {
            activity_id: activity_id.to_string(),
            from,
            to,
            changes: Vec::new(),
        });
    }

    destination_list.insert(insert_at, moving);

    let mut changes = renumber(&destination_list, destination_date);
    if destination_date != source_date {
        changes.extend(renumber(&source_list, source_date));
    }

    Ok(ReorderPlan {
        activity_id: activity_id.to_string(),
        from,
        to,
        changes,
    })
}

/// Positions that differ from `(date, index)` after renumbering a day
fn renumber(list: &[&Activity], date: NaiveDate) -> Vec<ActivityChange> {
    list.iter()
        .enumerate()
        .filter_map(|(index, activity)| {
            let order = index as i64;
            if activity.date == date && activity.order == order {
                None
            } else {
                Some(ActivityChange {
                    activity_id: activity.id.clone(),
                    date,
                    order,
                })
            }
        })
        .collect()
}

/// Apply a diff to a copy of the collection
///
/// Changes for ids that are not in the collection are skipped.
pub fn apply_changes(activities: &[Activity], changes: &[ActivityChange]) -> Vec<Activity> {
    let mut updated = activities.to_vec();
    for change in changes {
        if let Some(activity) = updated.iter_mut().find(|activity| activity.id == change.activity_id) {
            activity.date = change.date;
            activity.order = change.order;
        }
    }
    updated
}
