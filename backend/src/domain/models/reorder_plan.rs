use chrono::NaiveDate;
use shared::{ActivityChange, EntityId};

/// Position of an activity: its day and 0-based index within that day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPosition {
    pub date: NaiveDate,
    pub index: usize,
}

/// Full diff of one drag-and-drop move, computed before anything is written
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub activity_id: EntityId,
    pub from: DayPosition,
    pub to: DayPosition,
    /// Only the activities whose (date, order) actually changes
    pub changes: Vec<ActivityChange>,
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes_day(&self) -> bool {
        self.from.date != self.to.date
    }
}
