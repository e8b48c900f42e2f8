//! Secondary tracking domains: expenses, sleep, calories, journal, mood.
//!
//! Plain dated records over the same namespaced store as tasks. Each domain
//! supports `add` (assign id + timestamp, append, persist) and `list`
//! (newest first). The cross-domain dashboard summary lives here too.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{Priority, Status};
use crate::store::{RecordStore, Storage};
use crate::task::Task;

/// A dated record in one of the secondary domains.
pub trait Entry: Serialize + DeserializeOwned + Clone {
    const COLLECTION: &'static str;

    fn id(&self) -> u64;
    fn assign(&mut self, id: u64, created_at: DateTime<Utc>);
    /// Date used for newest-first ordering.
    fn entry_date(&self) -> NaiveDate;
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidRecord {
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(user_id: &str, amount: f64, description: &str, category: &str, date: NaiveDate) -> Self {
        Expense {
            id: 0,
            user_id: user_id.into(),
            amount,
            description: description.into(),
            category: category.into(),
            date,
            created_at: Utc::now(),
        }
    }
}

impl Entry for Expense {
    const COLLECTION: &'static str = "expenses";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn entry_date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(invalid("expense amount must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: u64,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 1 (poor) to 5 (excellent).
    pub quality: u8,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SleepEntry {
    pub fn new(
        user_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        quality: u8,
        notes: Option<String>,
    ) -> Self {
        SleepEntry {
            id: 0,
            user_id: user_id.into(),
            start_time,
            end_time,
            quality,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn hours_slept(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

impl Entry for SleepEntry {
    const COLLECTION: &'static str = "sleep";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn entry_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(invalid("sleep end time must be after start time"));
        }
        if !(1..=5).contains(&self.quality) {
            return Err(invalid("sleep quality must be between 1 and 5"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEntry {
    pub id: u64,
    pub user_id: String,
    pub calories: u32,
    pub meal_type: String,
    pub food_items: Vec<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl CalorieEntry {
    pub fn new(
        user_id: &str,
        calories: u32,
        meal_type: &str,
        food_items: Vec<String>,
        date: NaiveDate,
    ) -> Self {
        CalorieEntry {
            id: 0,
            user_id: user_id.into(),
            calories,
            meal_type: meal_type.into(),
            food_items,
            date,
            created_at: Utc::now(),
        }
    }
}

impl Entry for CalorieEntry {
    const COLLECTION: &'static str = "calories";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn entry_date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if self.calories == 0 {
            return Err(invalid("calories must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub user_id: String,
    pub content: String,
    pub mood_tag: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(user_id: &str, content: &str, mood_tag: Option<String>, date: NaiveDate) -> Self {
        JournalEntry {
            id: 0,
            user_id: user_id.into(),
            content: content.into(),
            mood_tag,
            date,
            created_at: Utc::now(),
        }
    }
}

impl Entry for JournalEntry {
    const COLLECTION: &'static str = "journal";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn entry_date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(invalid("journal entry cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: u64,
    pub user_id: String,
    /// 1 (low) to 10 (high).
    pub mood_level: u8,
    /// 1 (low) to 10 (high).
    pub energy_level: u8,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(
        user_id: &str,
        mood_level: u8,
        energy_level: u8,
        notes: Option<String>,
        date: NaiveDate,
    ) -> Self {
        MoodEntry {
            id: 0,
            user_id: user_id.into(),
            mood_level,
            energy_level,
            notes,
            date,
            created_at: Utc::now(),
        }
    }
}

impl Entry for MoodEntry {
    const COLLECTION: &'static str = "mood";

    fn id(&self) -> u64 {
        self.id
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn entry_date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.mood_level) || !(1..=10).contains(&self.energy_level) {
            return Err(invalid("mood and energy levels must be between 1 and 10"));
        }
        Ok(())
    }
}

/// Append/list access to the secondary-domain collections.
pub struct EntryStore<S: Storage> {
    store: RecordStore<S>,
}

impl<S: Storage> EntryStore<S> {
    pub fn new(storage: S) -> Self {
        EntryStore {
            store: RecordStore::new(storage),
        }
    }

    pub fn add<T: Entry>(&mut self, user: &str, mut entry: T) -> Result<T> {
        entry.validate()?;
        let mut entries: Vec<T> = self.store.load(T::COLLECTION, user)?;
        let id = entries.iter().map(Entry::id).max().unwrap_or(0) + 1;
        entry.assign(id, Utc::now());
        entries.push(entry.clone());
        self.store.save(T::COLLECTION, user, &entries)?;
        Ok(entry)
    }

    /// Entries newest first, id breaking same-day ties.
    pub fn list<T: Entry>(&self, user: &str) -> Result<Vec<T>> {
        let mut entries: Vec<T> = self.store.load(T::COLLECTION, user)?;
        entries.sort_by(|a, b| {
            b.entry_date()
                .cmp(&a.entry_date())
                .then(b.id().cmp(&a.id()))
        });
        Ok(entries)
    }
}

/// Aggregated averages over the mood log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    pub average_mood: f64,
    pub average_energy: f64,
    pub total_entries: usize,
}

pub fn mood_stats(entries: &[MoodEntry]) -> MoodStats {
    if entries.is_empty() {
        return MoodStats {
            average_mood: 0.0,
            average_energy: 0.0,
            total_entries: 0,
        };
    }
    let n = entries.len() as f64;
    MoodStats {
        average_mood: entries.iter().map(|e| e.mood_level as f64).sum::<f64>() / n,
        average_energy: entries.iter().map(|e| e.energy_level as f64).sum::<f64>() / n,
        total_entries: entries.len(),
    }
}

/// Cross-domain snapshot for the dashboard view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub tasks_urgent: usize,
    pub spent_today: f64,
    pub latest_sleep: Option<SleepEntry>,
    pub calories_today: u32,
}

pub fn dashboard_summary(
    tasks: &[Task],
    expenses: &[Expense],
    sleep: &[SleepEntry],
    calories: &[CalorieEntry],
    today: NaiveDate,
) -> DashboardSummary {
    DashboardSummary {
        tasks_total: tasks.len(),
        tasks_completed: tasks.iter().filter(|t| t.status == Status::Done).count(),
        tasks_urgent: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        spent_today: expenses
            .iter()
            .filter(|e| e.date == today)
            .map(|e| e.amount)
            .sum(),
        latest_sleep: sleep.first().cloned(),
        calories_today: calories
            .iter()
            .filter(|c| c.date == today)
            .map(|c| c.calories)
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use chrono::TimeZone;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn add_assigns_ids_and_list_is_newest_first() {
        let mut store = EntryStore::new(MemoryStorage::new());
        store
            .add("u1", Expense::new("u1", 4.5, "coffee", "food", date(10)))
            .unwrap();
        store
            .add("u1", Expense::new("u1", 30.0, "groceries", "food", date(24)))
            .unwrap();
        store
            .add("u1", Expense::new("u1", 12.0, "lunch", "food", date(17)))
            .unwrap();

        let listed: Vec<Expense> = store.list("u1").unwrap();
        let descriptions: Vec<_> = listed.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["groceries", "lunch", "coffee"]);
        assert_eq!(listed.iter().map(|e| e.id).max(), Some(3));
    }

    #[test]
    fn domains_are_isolated_per_user_and_collection() {
        let mut store = EntryStore::new(MemoryStorage::new());
        store
            .add("u1", Expense::new("u1", 5.0, "snack", "food", date(1)))
            .unwrap();
        store
            .add(
                "u1",
                JournalEntry::new("u1", "a quiet day", None, date(1)),
            )
            .unwrap();

        assert_eq!(store.list::<Expense>("u1").unwrap().len(), 1);
        assert_eq!(store.list::<JournalEntry>("u1").unwrap().len(), 1);
        assert!(store.list::<Expense>("u2").unwrap().is_empty());
    }

    #[test]
    fn validation_rejects_out_of_range_records() {
        let mut store = EntryStore::new(MemoryStorage::new());
        assert!(store
            .add("u1", Expense::new("u1", -1.0, "refund", "misc", date(1)))
            .is_err());
        assert!(store
            .add("u1", MoodEntry::new("u1", 11, 5, None, date(1)))
            .is_err());
        assert!(store
            .add("u1", JournalEntry::new("u1", "  ", None, date(1)))
            .is_err());

        let start = Utc.with_ymd_and_hms(2026, 8, 24, 23, 0, 0).unwrap();
        assert!(store
            .add("u1", SleepEntry::new("u1", start, start, 3, None))
            .is_err());
    }

    #[test]
    fn sleep_hours_are_derived_from_interval() {
        let start = Utc.with_ymd_and_hms(2026, 8, 24, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 8, 25, 6, 30, 0).unwrap();
        let entry = SleepEntry::new("u1", start, end, 4, None);
        assert!((entry.hours_slept() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mood_stats_averages() {
        let entries = vec![
            MoodEntry::new("u1", 6, 4, None, date(1)),
            MoodEntry::new("u1", 8, 6, None, date(2)),
        ];
        let stats = mood_stats(&entries);
        assert_eq!(stats.total_entries, 2);
        assert!((stats.average_mood - 7.0).abs() < f64::EPSILON);
        assert!((stats.average_energy - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dashboard_counts_today_only() {
        use crate::task::NewTask;
        let mut repo = crate::repo::TaskRepository::new(MemoryStorage::new());
        let mut urgent = NewTask::new("urgent", "u1");
        urgent.priority = Priority::High;
        let mut done = NewTask::new("done", "u1");
        done.status = Status::Done;
        repo.create(urgent).unwrap();
        repo.create(done).unwrap();
        let tasks = repo.list("u1").unwrap();

        let today = date(25);
        let expenses = vec![
            Expense::new("u1", 10.0, "today", "misc", today),
            Expense::new("u1", 99.0, "yesterday", "misc", date(24)),
        ];
        let calories = vec![
            CalorieEntry::new("u1", 600, "lunch", vec![], today),
            CalorieEntry::new("u1", 800, "dinner", vec![], date(24)),
        ];

        let summary = dashboard_summary(&tasks, &expenses, &[], &calories, today);
        assert_eq!(summary.tasks_total, 2);
        assert_eq!(summary.tasks_completed, 1);
        assert_eq!(summary.tasks_urgent, 1);
        assert!((summary.spent_today - 10.0).abs() < f64::EPSILON);
        assert_eq!(summary.calories_today, 600);
        assert!(summary.latest_sleep.is_none());
    }
}
