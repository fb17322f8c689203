use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{Layout, SeatState};
use crate::services::{SeatChange, SeatRepository};

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed");
        Ok(())
    }
}

fn to_db_index(index: usize) -> Result<i32, sqlx::Error> {
    i32::try_from(index).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

#[async_trait]
impl SeatRepository for Database {
    type Error = sqlx::Error;

    async fn ensure_layout(&self, layout: Layout) -> Result<(), Self::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO seats (seat_index, row_number, col_number)
            SELECT i, i / $2, i % $2
            FROM generate_series(0, $1 - 1) AS i
            ON CONFLICT (seat_index) DO NOTHING
            "#,
        )
        .bind(to_db_index(layout.capacity())?)
        .bind(to_db_index(layout.seats_per_row())?)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!(inserted, "created seat records");
        }
        Ok(())
    }

    async fn load_states(&self, _layout: Layout) -> Result<Vec<SeatState>, Self::Error> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT seat_index, status FROM seats ORDER BY seat_index",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .enumerate()
            .map(|(expected, (index, status))| {
                if usize::try_from(index).ok() != Some(expected) {
                    return Err(sqlx::Error::Protocol(format!(
                        "seat index gap: expected {expected}, found {index}"
                    )));
                }
                SeatState::parse(&status).ok_or_else(|| {
                    sqlx::Error::Decode(format!("unknown seat status {status:?}").into())
                })
            })
            .collect()
    }

    async fn apply(&self, change: &SeatChange) -> Result<(), Self::Error> {
        match change {
            SeatChange::Booked(indices) => {
                let indices = indices
                    .iter()
                    .map(|&i| to_db_index(i))
                    .collect::<Result<Vec<i32>, _>>()?;
                let updated = sqlx::query(
                    "UPDATE seats SET status = 'booked', updated_at = NOW() WHERE seat_index = ANY($1)",
                )
                .bind(indices.as_slice())
                .execute(&self.pool)
                .await?
                .rows_affected();
                debug!(updated, "persisted booking");
            }
            SeatChange::Reset => {
                let updated = sqlx::query(
                    "UPDATE seats SET status = 'available', updated_at = NOW() WHERE status <> 'available'",
                )
                .execute(&self.pool)
                .await?
                .rows_affected();
                info!(updated, "persisted reset");
            }
        }
        Ok(())
    }
}
