//! `PostgreSQL`-backed [`ProducerStore`].
//!
//! Each operation is a single parameterized statement executed on a pooled
//! connection. The connection is acquired for the duration of the query
//! and returned to the pool when the future completes.

use async_trait::async_trait;
use agro_core::{DashboardStats, NewProducer, Producer};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use crate::storage::DatabaseConfig;
use crate::traits::{ProducerStore, StoreResult};

const CREATE_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS producers (
    id              SERIAL PRIMARY KEY,
    cpf_cnpj        VARCHAR(14) NOT NULL,
    producer_name   TEXT NOT NULL,
    farm_name       TEXT NOT NULL,
    city            TEXT NOT NULL,
    state           TEXT NOT NULL,
    total_area      DOUBLE PRECISION NOT NULL,
    cultivable_area DOUBLE PRECISION NOT NULL,
    vegetation_area DOUBLE PRECISION NOT NULL,
    crops           TEXT[] NOT NULL DEFAULT '{}'
)";

const SELECT_ALL_SQL: &str = "SELECT id, cpf_cnpj, producer_name, farm_name, city, state, \
     total_area, cultivable_area, vegetation_area, crops FROM producers";

const SELECT_ONE_SQL: &str = "SELECT id, cpf_cnpj, producer_name, farm_name, city, state, \
     total_area, cultivable_area, vegetation_area, crops FROM producers WHERE id = $1";

const INSERT_SQL: &str = "INSERT INTO producers \
     (cpf_cnpj, producer_name, farm_name, city, state, total_area, cultivable_area, vegetation_area, crops) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
     RETURNING id, cpf_cnpj, producer_name, farm_name, city, state, \
     total_area, cultivable_area, vegetation_area, crops";

const UPDATE_SQL: &str = "UPDATE producers SET \
     cpf_cnpj = $1, producer_name = $2, farm_name = $3, city = $4, state = $5, \
     total_area = $6, cultivable_area = $7, vegetation_area = $8, crops = $9 \
     WHERE id = $10 \
     RETURNING id, cpf_cnpj, producer_name, farm_name, city, state, \
     total_area, cultivable_area, vegetation_area, crops";

const DELETE_SQL: &str = "DELETE FROM producers WHERE id = $1 \
     RETURNING id, cpf_cnpj, producer_name, farm_name, city, state, \
     total_area, cultivable_area, vegetation_area, crops";

const AGGREGATE_SQL: &str = "SELECT COUNT(*), \
     COALESCE(SUM(total_area), 0)::DOUBLE PRECISION FROM producers";

/// Row shape of the `producers` table.
#[derive(Debug, FromRow)]
struct ProducerRow {
    id: i32,
    cpf_cnpj: String,
    producer_name: String,
    farm_name: String,
    city: String,
    state: String,
    total_area: f64,
    cultivable_area: f64,
    vegetation_area: f64,
    crops: Vec<String>,
}

impl From<ProducerRow> for Producer {
    fn from(row: ProducerRow) -> Self {
        Self {
            id: row.id,
            cpf_cnpj: row.cpf_cnpj,
            producer_name: row.producer_name,
            farm_name: row.farm_name,
            city: row.city,
            state: row.state,
            total_area: row.total_area,
            cultivable_area: row.cultivable_area,
            vegetation_area: row.vegetation_area,
            crops: row.crops,
        }
    }
}

/// Producer storage over a `PgPool`.
///
/// The pool is constructed once at startup and injected; cloning the store
/// shares the same pool.
#[derive(Clone)]
pub struct PostgresProducerStore {
    pool: PgPool,
}

impl PostgresProducerStore {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool with the configured limits and verifies connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the first connection
    /// cannot be established.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        info!(
            max_connections = config.max_connections,
            "connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ProducerStore for PostgresProducerStore {
    async fn list_all(&self) -> StoreResult<Vec<Producer>> {
        let rows = sqlx::query_as::<_, ProducerRow>(SELECT_ALL_SQL)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = rows.len(), "listed producers");
        Ok(rows.into_iter().map(Producer::from).collect())
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Producer>> {
        let row = sqlx::query_as::<_, ProducerRow>(SELECT_ONE_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Producer::from))
    }

    async fn create(&self, producer: &NewProducer) -> StoreResult<Producer> {
        let row = sqlx::query_as::<_, ProducerRow>(INSERT_SQL)
            .bind(&producer.cpf_cnpj)
            .bind(&producer.producer_name)
            .bind(&producer.farm_name)
            .bind(&producer.city)
            .bind(&producer.state)
            .bind(producer.total_area)
            .bind(producer.cultivable_area)
            .bind(producer.vegetation_area)
            .bind(&producer.crops)
            .fetch_one(&self.pool)
            .await?;
        debug!(id = row.id, "inserted producer");
        Ok(row.into())
    }

    async fn update(&self, id: i32, producer: &NewProducer) -> StoreResult<Option<Producer>> {
        let row = sqlx::query_as::<_, ProducerRow>(UPDATE_SQL)
            .bind(&producer.cpf_cnpj)
            .bind(&producer.producer_name)
            .bind(&producer.farm_name)
            .bind(&producer.city)
            .bind(&producer.state)
            .bind(producer.total_area)
            .bind(producer.cultivable_area)
            .bind(producer.vegetation_area)
            .bind(&producer.crops)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        debug!(id, matched = row.is_some(), "updated producer");
        Ok(row.map(Producer::from))
    }

    async fn delete(&self, id: i32) -> StoreResult<Option<Producer>> {
        let row = sqlx::query_as::<_, ProducerRow>(DELETE_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        debug!(id, matched = row.is_some(), "deleted producer");
        Ok(row.map(Producer::from))
    }

    async fn aggregate(&self) -> StoreResult<DashboardStats> {
        let (total_farms, total_area) = sqlx::query_as::<_, (i64, f64)>(AGGREGATE_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(DashboardStats {
            total_farms,
            total_area,
        })
    }

    async fn initialize(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        info!("producers table ready");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
