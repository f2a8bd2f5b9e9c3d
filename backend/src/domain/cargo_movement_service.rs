//! Cargo movement service domain logic.
//!
//! Records movements, lists a cargo's movements newest first and aggregates
//! movement counts per cargo id.
//!
//! ## Business Rules
//!
//! - A movement without a date is dated "now + 3 hours" (a fixed offset, not a
//!   time zone conversion)
//! - Listing a cargo with no recorded movements is a not-found failure,
//!   whether or not the cargo itself exists in the cargo service
//! - Counts are sparse: ids without movements are absent from the result

use chrono::{DateTime, Duration, Utc};
use shared::{CargoMovementCountsResponse, CargoMovementResponse};
use std::sync::Arc;
use tracing::{error, info, instrument, Span};

use crate::domain::commands::cargo_movement::{CargoMovementListQuery, CreateCargoMovementCommand};
use crate::domain::errors::CargoMovementError;
use crate::domain::mappers::cargo_movement_mapper::CargoMovementMapper;
use crate::storage::{CargoMovementStorage, Connection};

const MILLISECONDS_IN_HOUR: i64 = 3_600_000;
const UTC_PLUS_3_OFFSET_MS: i64 = 3 * MILLISECONDS_IN_HOUR;

pub const ENTITY_NOT_SAVED_MESSAGE: &str = "Error in creating cargoMovement in service";

/// Date assigned to a movement created without one
pub fn default_movement_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::milliseconds(UTC_PLUS_3_OFFSET_MS)
}

#[derive(Clone)]
pub struct CargoMovementService<C: Connection> {
    cargo_movement_repository: C::CargoMovementRepository,
    span: Span,
}

impl<C: Connection> CargoMovementService<C> {
    /// Create a service whose events are recorded under `span`
    pub fn new(connection: Arc<C>, span: Span) -> Self {
        let cargo_movement_repository = connection.create_cargo_movement_repository();
        Self {
            cargo_movement_repository,
            span,
        }
    }

    /// Persist a new movement, assigning the default date when absent.
    ///
    /// Any mapping or storage failure is logged and reported as
    /// [`CargoMovementError::EntityNotSaved`].
    #[instrument(parent = &self.span, skip_all, fields(cargo_id = command.cargo_id))]
    pub async fn create_cargo_movement(
        &self,
        mut command: CreateCargoMovementCommand,
    ) -> Result<CargoMovementResponse, CargoMovementError> {
        if command.movement_date.is_none() {
            command.movement_date = Some(default_movement_date(Utc::now()));
        }

        match self.save(command).await {
            Ok(response) => {
                info!("Created cargo movement {}", response.id);
                Ok(response)
            }
            Err(e) => {
                error!(error = %e, "{}", ENTITY_NOT_SAVED_MESSAGE);
                Err(CargoMovementError::EntityNotSaved(ENTITY_NOT_SAVED_MESSAGE.to_string()))
            }
        }
    }

    async fn save(&self, command: CreateCargoMovementCommand) -> Result<CargoMovementResponse, CargoMovementError> {
        let record = CargoMovementMapper::to_record(command)?;
        let document = self.cargo_movement_repository.store_cargo_movement(&record).await?;
        CargoMovementMapper::to_response(document)
    }

    /// List one page of a cargo's movements ordered by date descending
    #[instrument(parent = &self.span, skip_all, fields(cargo_id = query.cargo_id, size = query.size, from = query.from))]
    pub async fn list_cargo_movements(
        &self,
        query: CargoMovementListQuery,
    ) -> Result<Vec<CargoMovementResponse>, CargoMovementError> {
        let cargo_id = query.cargo_id.to_string();

        if !self.cargo_movement_repository.cargo_movement_exists(&cargo_id).await? {
            return Err(CargoMovementError::EntityNotFound(format!(
                "Cargo with ID {} does not exist.",
                query.cargo_id
            )));
        }

        let documents = self
            .cargo_movement_repository
            .list_cargo_movements(&cargo_id, query.from, query.size)
            .await?;

        info!("Listing {} cargo movements", documents.len());
        documents.into_iter().map(CargoMovementMapper::to_response).collect()
    }

    /// Count movements per cargo id. Ids with no movements are left out.
    #[instrument(parent = &self.span, skip_all, fields(requested = cargo_ids.len()))]
    pub async fn count_by_cargo_ids(
        &self,
        cargo_ids: &[String],
    ) -> Result<CargoMovementCountsResponse, CargoMovementError> {
        let counts = self.cargo_movement_repository.count_by_cargo_ids(cargo_ids).await?;

        Ok(counts
            .into_iter()
            .map(|entry| (entry.cargo_id, entry.count))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::cargo_movement::{
        CargoMovementCount, CargoMovementDocument, NewCargoMovement,
    };
    use crate::storage::DbConnection;
    use async_trait::async_trait;
    use chrono::TimeZone;

    async fn setup_test_service() -> CargoMovementService<DbConnection> {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        CargoMovementService::new(Arc::new(db), Span::none())
    }

    fn command(cargo_id: i64, movement_date: Option<DateTime<Utc>>) -> CreateCargoMovementCommand {
        CreateCargoMovementCommand {
            cargo_id,
            movement_date,
            from_location: "Odesa".to_string(),
            to_location: "Gdansk".to_string(),
        }
    }

    fn day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap()
    }

    /// Connection whose repository fails every write
    #[derive(Clone)]
    struct FailingConnection;

    #[derive(Clone)]
    struct FailingRepository;

    #[async_trait]
    impl CargoMovementStorage for FailingRepository {
        async fn store_cargo_movement(&self, _: &NewCargoMovement) -> anyhow::Result<CargoMovementDocument> {
            Err(anyhow::anyhow!("disk full"))
        }

        async fn cargo_movement_exists(&self, _: &str) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn list_cargo_movements(&self, _: &str, _: u32, _: u32) -> anyhow::Result<Vec<CargoMovementDocument>> {
            // A row that lost its destination
            Ok(vec![CargoMovementDocument {
                id: Some("1".to_string()),
                cargo_id: Some("1".to_string()),
                movement_date: Some(day(1)),
                from_location: Some("A".to_string()),
                to_location: None,
            }])
        }

        async fn count_by_cargo_ids(&self, _: &[String]) -> anyhow::Result<Vec<CargoMovementCount>> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    impl Connection for FailingConnection {
        type CargoMovementRepository = FailingRepository;

        fn create_cargo_movement_repository(&self) -> Self::CargoMovementRepository {
            FailingRepository
        }
    }

    #[test]
    fn test_default_movement_date_is_three_hours_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 22, 15, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 5, 21, 1, 15, 0).unwrap();
        assert_eq!(default_movement_date(now), expected);
    }

    #[tokio::test]
    async fn test_create_keeps_given_date() {
        let service = setup_test_service().await;

        let response = service.create_cargo_movement(command(5, Some(day(3)))).await.unwrap();

        assert_eq!(response.cargo_id, "5");
        assert_eq!(response.movement_date, day(3));
        assert_eq!(response.from_location, "Odesa");
        assert_eq!(response.to_location, "Gdansk");
        assert!(!response.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_default_date() {
        let service = setup_test_service().await;

        let before = Utc::now();
        let response = service.create_cargo_movement(command(5, None)).await.unwrap();
        let after = Utc::now();

        let offset = Duration::hours(3);
        assert!(response.movement_date >= before + offset);
        assert!(response.movement_date <= after + offset);
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_entity_not_saved() {
        let service = CargoMovementService::new(Arc::new(FailingConnection), Span::none());

        let error = service.create_cargo_movement(command(5, None)).await.unwrap_err();

        match error {
            CargoMovementError::EntityNotSaved(message) => assert_eq!(message, ENTITY_NOT_SAVED_MESSAGE),
            other => panic!("expected EntityNotSaved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_without_movements_is_not_found() {
        let service = setup_test_service().await;
        service.create_cargo_movement(command(1, Some(day(1)))).await.unwrap();

        let error = service
            .list_cargo_movements(CargoMovementListQuery::new(2, None, None))
            .await
            .unwrap_err();

        match error {
            CargoMovementError::EntityNotFound(message) => {
                assert_eq!(message, "Cargo with ID 2 does not exist.")
            }
            other => panic!("expected EntityNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let service = setup_test_service().await;
        for d in 1..=5 {
            service.create_cargo_movement(command(9, Some(day(d)))).await.unwrap();
        }

        let query = CargoMovementListQuery::new(9, Some(2), Some(1));
        let page = service.list_cargo_movements(query).await.unwrap();

        let dates: Vec<DateTime<Utc>> = page.iter().map(|m| m.movement_date).collect();
        assert_eq!(dates, vec![day(4), day(3)]);
    }

    #[tokio::test]
    async fn test_list_default_page_size() {
        let service = setup_test_service().await;
        for d in 1..=12 {
            service.create_cargo_movement(command(9, Some(day(d)))).await.unwrap();
        }

        let page = service.list_cargo_movements(CargoMovementListQuery::new(9, None, None)).await.unwrap();

        assert_eq!(page.len(), 10);
        assert_eq!(page[0].movement_date, day(12));
    }

    #[tokio::test]
    async fn test_list_is_repeatable() {
        let service = setup_test_service().await;
        for d in [2, 2, 1, 3] {
            service.create_cargo_movement(command(4, Some(day(d)))).await.unwrap();
        }

        let first = service.list_cargo_movements(CargoMovementListQuery::new(4, None, None)).await.unwrap();
        let second = service.list_cargo_movements(CargoMovementListQuery::new(4, None, None)).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_drifted_row_fails_mapping() {
        let service = CargoMovementService::new(Arc::new(FailingConnection), Span::none());

        let error = service
            .list_cargo_movements(CargoMovementListQuery::new(1, None, None))
            .await
            .unwrap_err();

        assert!(matches!(error, CargoMovementError::InvalidInput { field: "toLocation" }));
    }

    #[tokio::test]
    async fn test_counts_are_sparse() {
        let service = setup_test_service().await;
        for d in 1..=3 {
            service.create_cargo_movement(command(1, Some(day(d)))).await.unwrap();
        }
        service.create_cargo_movement(command(2, Some(day(1)))).await.unwrap();

        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let counts = service.count_by_cargo_ids(&ids).await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("1"), Some(&3));
        assert_eq!(counts.get("2"), Some(&1));
        assert!(!counts.contains_key("3"));
    }

    #[tokio::test]
    async fn test_counts_storage_failure_is_propagated() {
        let service = CargoMovementService::new(Arc::new(FailingConnection), Span::none());

        let error = service.count_by_cargo_ids(&["1".to_string()]).await.unwrap_err();

        assert!(matches!(error, CargoMovementError::Storage(_)));
    }
}
