//! Activity management and drag-and-drop moves on the planner.
//!
//! A move is planned in full by the reorder engine before anything is
//! written, then persisted as one batch through
//! [`ActivityStorage::apply_position_changes`]. Ids that vanished between
//! planning and writing are dropped from the batch and reported.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use shared::Activity;

use super::commands::activities::{CreateActivityCommand, MoveActivityCommand, MoveActivityResult};
use super::models::{PlannerError, ReorderError, ReorderPlan};
use super::reorder::{day_list, plan_move};
use crate::storage::{ActivityStorage, Connection, TripScopedStorage, TripStorage};

/// Service for a trip's activities
#[derive(Clone)]
pub struct ActivityService<C: Connection> {
    trip_repository: C::TripRepository,
    activity_repository: C::ActivityRepository,
}

impl<C: Connection> ActivityService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            activity_repository: connection.create_activity_repository(),
        }
    }

    /// Add an activity; without an explicit order it goes after the last
    /// activity of its day
    pub async fn add_activity(&self, command: CreateActivityCommand) -> Result<Activity> {
        info!("Adding activity '{}' to trip {} on {}", command.name, command.trip_id, command.date);

        let name = command.name.trim();
        if name.is_empty() {
            return Err(PlannerError::EmptyField("Activity name").into());
        }
        if command.cost.is_some_and(|cost| cost < 0.0) {
            return Err(PlannerError::NegativeAmount("Activity cost").into());
        }
        if self.trip_repository.get_trip(&command.trip_id).await?.is_none() {
            return Err(PlannerError::TripNotFound(command.trip_id).into());
        }

        let order = match command.order {
            Some(order) => order,
            None => {
                let existing = self.activity_repository.list_by_trip(&command.trip_id).await?;
                day_list(&existing, command.date)
                    .last()
                    .map_or(0, |last| last.order + 1)
            }
        };

        let mut activity = Activity {
            id: String::new(),
            trip_id: command.trip_id,
            name: name.to_string(),
            date: command.date,
            link: command.link,
            notes: command.notes,
            duration: command.duration,
            cost: command.cost,
            currency: command.currency,
            is_confirmed: command.is_confirmed,
            order,
            created_at: Utc::now().to_rfc3339(),
        };
        activity.id = self.activity_repository.create(&activity).await?;

        info!("Successfully added activity {} at order {}", activity.id, activity.order);
        Ok(activity)
    }

    pub async fn update_activity(&self, activity: Activity) -> Result<Activity> {
        info!("Updating activity: {}", activity.id);

        if activity.name.trim().is_empty() {
            return Err(PlannerError::EmptyField("Activity name").into());
        }
        if activity.cost.is_some_and(|cost| cost < 0.0) {
            return Err(PlannerError::NegativeAmount("Activity cost").into());
        }
        if !self.activity_repository.update(&activity).await? {
            return Err(PlannerError::RecordNotFound(activity.id).into());
        }
        Ok(activity)
    }

    pub async fn set_activity_confirmed(&self, activity_id: &str, is_confirmed: bool) -> Result<Activity> {
        let activity = self
            .activity_repository
            .modify(activity_id, &|activity: &mut Activity| activity.is_confirmed = is_confirmed)
            .await?
            .ok_or_else(|| PlannerError::RecordNotFound(activity_id.to_string()))?;
        Ok(activity)
    }

    pub async fn delete_activity(&self, activity_id: &str) -> Result<bool> {
        info!("Deleting activity: {}", activity_id);
        self.activity_repository.delete(activity_id).await
    }

    pub async fn get_activity(&self, activity_id: &str) -> Result<Option<Activity>> {
        self.activity_repository.get(activity_id).await
    }

    /// Activities of a trip by date, then rank within the date
    pub async fn list_activities(&self, trip_id: &str) -> Result<Vec<Activity>> {
        let mut activities = self.activity_repository.list_by_trip(trip_id).await?;
        activities.sort_by_key(|a| (a.date, a.order));
        Ok(activities)
    }

    /// Move an activity using the stored activities as the view
    pub async fn move_activity(&self, command: MoveActivityCommand) -> Result<MoveActivityResult> {
        let activities = self.activity_repository.list_by_trip(&command.trip_id).await?;
        self.move_activity_in_view(&activities, command).await
    }

    /// Plan a move against a caller-held view without writing anything
    pub fn plan_move_in_view(
        &self,
        view: &[Activity],
        command: &MoveActivityCommand,
    ) -> std::result::Result<ReorderPlan, ReorderError> {
        plan_move(
            view,
            &command.activity_id,
            command.destination_date,
            command.destination_index,
        )
    }

    /// Move an activity planned against a caller-held view
    ///
    /// The view may be stale; changes for activities deleted in the
    /// meantime are dropped rather than failing the move.
    pub async fn move_activity_in_view(
        &self,
        view: &[Activity],
        command: MoveActivityCommand,
    ) -> Result<MoveActivityResult> {
        info!(
            "Moving activity {} to {} at index {}",
            command.activity_id, command.destination_date, command.destination_index
        );

        let plan = self.plan_move_in_view(view, &command)?;
        if plan.is_noop() {
            debug!("Activity {} already at requested position; nothing to write", command.activity_id);
            return Ok(MoveActivityResult::default());
        }

        let outcome = self.activity_repository.apply_position_changes(&plan.changes).await?;
        if !outcome.dropped_ids.is_empty() {
            warn!(
                "Dropped {} stale activity reference(s) while moving {}: {:?}",
                outcome.dropped_ids.len(),
                command.activity_id,
                outcome.dropped_ids
            );
        }

        info!(
            "Successfully moved activity {}: {} record(s) updated",
            command.activity_id,
            outcome.applied.len()
        );
        Ok(MoveActivityResult {
            applied: outcome.applied,
            dropped_ids: outcome.dropped_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{date, sample_trip, TestEnvironment};
    use crate::storage::csv::CsvConnection;
    use shared::{ActivityChange, CurrencyCode};

    async fn setup(env: &TestEnvironment) -> (ActivityService<CsvConnection>, String) {
        let trip_id = env
            .connection
            .create_trip_repository()
            .store_trip(&sample_trip("Japan", "2024-01-01", "2024-01-04"))
            .await
            .unwrap();
        (ActivityService::new(&env.connection), trip_id)
    }

    fn command(trip_id: &str, name: &str, day: &str) -> CreateActivityCommand {
        CreateActivityCommand {
            trip_id: trip_id.to_string(),
            name: name.to_string(),
            date: date(day),
            link: None,
            notes: None,
            duration: Some(90),
            cost: Some(20.0),
            currency: CurrencyCode::eur(),
            is_confirmed: false,
            order: None,
        }
    }

    async fn add(service: &ActivityService<CsvConnection>, trip_id: &str, name: &str, day: &str) -> Activity {
        service.add_activity(command(trip_id, name, day)).await.unwrap()
    }

    fn names_on(activities: &[Activity], day: &str) -> Vec<(String, i64)> {
        day_list(activities, date(day))
            .into_iter()
            .map(|a| (a.name.clone(), a.order))
            .collect()
    }

    #[tokio::test]
    async fn test_new_activities_append_to_their_day() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;

        let first = add(&service, &trip_id, "Temple", "2024-01-02").await;
        let second = add(&service, &trip_id, "Market", "2024-01-02").await;
        let other_day = add(&service, &trip_id, "Museum", "2024-01-03").await;

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(other_day.order, 0);
    }

    #[tokio::test]
    async fn test_add_activity_validation() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;

        let mut negative = command(&trip_id, "Temple", "2024-01-02");
        negative.cost = Some(-5.0);
        let error = service.add_activity(negative).await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<PlannerError>(),
            Some(&PlannerError::NegativeAmount("Activity cost"))
        );

        let orphan = command("trip::missing", "Temple", "2024-01-02");
        assert!(service.add_activity(orphan).await.is_err());
        assert!(service.list_activities(&trip_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_activity() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        let temple = add(&service, &trip_id, "Temple", "2024-01-02").await;

        let confirmed = service.set_activity_confirmed(&temple.id, true).await.unwrap();
        assert!(confirmed.is_confirmed);
        assert_eq!(service.get_activity(&temple.id).await.unwrap(), Some(confirmed));

        assert!(service.delete_activity(&temple.id).await.unwrap());
        let error = service.set_activity_confirmed(&temple.id, false).await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<PlannerError>(),
            Some(&PlannerError::RecordNotFound(temple.id.clone()))
        );
        assert!(service.list_activities(&trip_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_move_activity_persists_only_changed_records() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        add(&service, &trip_id, "A", "2024-01-01").await;
        let b = add(&service, &trip_id, "B", "2024-01-01").await;
        let c = add(&service, &trip_id, "C", "2024-01-01").await;

        let result = service
            .move_activity(MoveActivityCommand {
                trip_id: trip_id.clone(),
                activity_id: b.id.clone(),
                destination_date: date("2024-01-02"),
                destination_index: 0,
            })
            .await
            .unwrap();

        let mut applied = result.applied.clone();
        applied.sort_by_key(|change| change.order);
        assert_eq!(
            applied,
            vec![
                ActivityChange { activity_id: b.id.clone(), date: date("2024-01-02"), order: 0 },
                ActivityChange { activity_id: c.id.clone(), date: date("2024-01-01"), order: 1 },
            ]
        );
        assert!(result.dropped_ids.is_empty());

        let stored = service.list_activities(&trip_id).await.unwrap();
        assert_eq!(names_on(&stored, "2024-01-01"), vec![("A".to_string(), 0), ("C".to_string(), 1)]);
        assert_eq!(names_on(&stored, "2024-01-02"), vec![("B".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_noop_move_writes_nothing() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        let a = add(&service, &trip_id, "A", "2024-01-01").await;

        let result = service
            .move_activity(MoveActivityCommand {
                trip_id: trip_id.clone(),
                activity_id: a.id.clone(),
                destination_date: date("2024-01-01"),
                destination_index: 0,
            })
            .await
            .unwrap();

        assert_eq!(result, MoveActivityResult::default());
    }

    #[tokio::test]
    async fn test_move_unknown_activity_is_rejected() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        add(&service, &trip_id, "A", "2024-01-01").await;

        let error = service
            .move_activity(MoveActivityCommand {
                trip_id: trip_id.clone(),
                activity_id: "activity::ghost".to_string(),
                destination_date: date("2024-01-02"),
                destination_index: 0,
            })
            .await
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<ReorderError>(),
            Some(&ReorderError::UnknownActivity("activity::ghost".to_string()))
        );
        let stored = service.list_activities(&trip_id).await.unwrap();
        assert_eq!(names_on(&stored, "2024-01-01"), vec![("A".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_stale_view_drops_deleted_activity() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        add(&service, &trip_id, "A", "2024-01-01").await;
        let b = add(&service, &trip_id, "B", "2024-01-01").await;
        let c = add(&service, &trip_id, "C", "2024-01-01").await;

        let view = service.list_activities(&trip_id).await.unwrap();
        // C disappears while the user is dragging
        service.delete_activity(&c.id).await.unwrap();

        let result = service
            .move_activity_in_view(
                &view,
                MoveActivityCommand {
                    trip_id: trip_id.clone(),
                    activity_id: b.id.clone(),
                    destination_date: date("2024-01-02"),
                    destination_index: 0,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.dropped_ids, vec![c.id.clone()]);
        assert_eq!(result.applied.len(), 1);
        let stored = service.list_activities(&trip_id).await.unwrap();
        assert_eq!(names_on(&stored, "2024-01-02"), vec![("B".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_plan_move_in_view_does_not_write() {
        let env = TestEnvironment::new().await.unwrap();
        let (service, trip_id) = setup(&env).await;
        let a = add(&service, &trip_id, "A", "2024-01-01").await;
        add(&service, &trip_id, "B", "2024-01-01").await;

        let view = service.list_activities(&trip_id).await.unwrap();
        let plan = service
            .plan_move_in_view(
                &view,
                &MoveActivityCommand {
                    trip_id: trip_id.clone(),
                    activity_id: a.id.clone(),
                    destination_date: date("2024-01-01"),
                    destination_index: 1,
                },
            )
            .unwrap();

        assert_eq!(plan.changes.len(), 2);
        assert_eq!(service.list_activities(&trip_id).await.unwrap(), view);
    }
}
