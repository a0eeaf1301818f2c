use std::time::SystemTime;

use indexmap::IndexMap;
use time::{Date, OffsetDateTime, UtcOffset, macros::format_description};

use crate::dao::models::MatchEntity;

/// Label shown when there is nothing to browse.
pub const EMPTY_LABEL: &str = "No matches";

/// Records carrying the moment they were created.
pub trait Timestamped {
    /// Creation instant used to place the record on a calendar day.
    fn created_at(&self) -> SystemTime;
}

impl Timestamped for MatchEntity {
    fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

/// Calendar date of `instant` at the given offset.
pub fn local_date(instant: SystemTime, offset: UtcOffset) -> Date {
    OffsetDateTime::from(instant).to_offset(offset).date()
}

/// Group records by local calendar day, most recent day first.
///
/// Records keep their relative order inside a day.
pub fn bucket_by_day<T: Timestamped>(
    records: impl IntoIterator<Item = T>,
    offset: UtcOffset,
) -> IndexMap<Date, Vec<T>> {
    let mut buckets: IndexMap<Date, Vec<T>> = IndexMap::new();
    for record in records {
        let day = local_date(record.created_at(), offset);
        buckets.entry(day).or_default().push(record);
    }
    buckets.sort_by(|left, _, right, _| right.cmp(left));
    buckets
}

/// Human readable header for a day relative to `today`.
pub fn day_label(day: Option<Date>, today: Date) -> String {
    let Some(day) = day else {
        return EMPTY_LABEL.to_owned();
    };
    if day == today {
        return "Today".to_owned();
    }
    if today.previous_day() == Some(day) {
        return "Yesterday".to_owned();
    }
    day.format(format_description!("[month repr:long] [day padding:none], [year]"))
        .unwrap_or_else(|_| day.to_string())
}

/// `MM:SS` rendering of a match duration.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Day-by-day browser over stored records.
///
/// Index 0 is the most recent day; "previous" walks towards older days.
#[derive(Debug, Clone)]
pub struct MatchHistory<T> {
    offset: UtcOffset,
    days: IndexMap<Date, Vec<T>>,
    selected: usize,
}

impl<T: Timestamped> MatchHistory<T> {
    /// Empty history bucketing days at `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            offset,
            days: IndexMap::new(),
            selected: 0,
        }
    }

    /// Replace the records and select today's bucket when there is one,
    /// otherwise the most recent day.
    pub fn reload(&mut self, records: impl IntoIterator<Item = T>, today: Date) {
        self.days = bucket_by_day(records, self.offset);
        self.selected = self.days.get_index_of(&today).unwrap_or(0);
    }

    /// Move to the next older day, if any.
    pub fn go_to_previous(&mut self) {
        if self.can_go_previous() {
            self.selected += 1;
        }
    }

    /// Move to the next newer day, if any.
    pub fn go_to_next(&mut self) {
        if self.can_go_next() {
            self.selected -= 1;
        }
    }

    /// Whether an older day exists.
    pub fn can_go_previous(&self) -> bool {
        self.selected + 1 < self.days.len()
    }

    /// Whether a newer day exists.
    pub fn can_go_next(&self) -> bool {
        self.selected > 0
    }

    /// Day currently shown, `None` when there are no records.
    pub fn selected_date(&self) -> Option<Date> {
        self.days.get_index(self.selected).map(|(day, _)| *day)
    }

    /// Records of the selected day in stored order.
    pub fn selected_records(&self) -> &[T] {
        self.days
            .get_index(self.selected)
            .map(|(_, records)| records.as_slice())
            .unwrap_or_default()
    }

    /// Position of the selected day, 0 being the most recent.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Number of distinct days holding at least one record.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Header for the selected day.
    pub fn label(&self, today: Date) -> String {
        day_label(self.selected_date(), today)
    }

    /// Today's date at this history's offset.
    pub fn today(&self) -> Date {
        local_date(SystemTime::now(), self.offset)
    }
}
