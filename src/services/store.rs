use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::models::{BloodGroup, BloodRequest, Donor, NewBloodRequest, NewDonor};

/// Errors that can occur when interacting with the registry database
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

const DONOR_COLUMNS: &str = "id, full_name, email, phone, blood_group, date_of_birth, city, \
     region, available, last_donation_date, created_at";

const REQUEST_COLUMNS: &str = "id, patient_name, contact_person, email, phone, \
     blood_group_needed, units_required, hospital_name, city, created_at";

/// SQLite-backed store for donors and blood requests
///
/// Every write runs in its own transaction. Reads return rows in insertion
/// order.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    pool: SqlitePool,
}

impl RegistryStore {
    /// Open (creating if needed) the database at `database_url` and apply the
    /// embedded migrations
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout);

        // Each connection to an in-memory database sees its own empty
        // database, so the single connection must never be recycled.
        if database_url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!("Opening registry database at {}", settings.url);

        Self::connect(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
        )
        .await
    }

    /// Private in-memory database, for tests and benchmarks
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1, 1, Duration::from_secs(5)).await
    }

    /// Persist a new donor
    pub async fn insert_donor(&self, new_donor: &NewDonor) -> Result<Donor, StoreError> {
        let mut tx = self.pool.begin().await?;
        let donor = insert_donor_row(&mut tx, new_donor).await?;
        tx.commit().await?;

        tracing::debug!("Inserted donor {} ({})", donor.id, donor.blood_group);

        Ok(donor)
    }

    /// Persist a new blood request
    pub async fn insert_request(
        &self,
        new_request: &NewBloodRequest,
    ) -> Result<BloodRequest, StoreError> {
        let mut tx = self.pool.begin().await?;
        let request = insert_request_row(&mut tx, new_request).await?;
        tx.commit().await?;

        tracing::debug!(
            "Inserted blood request {} ({} in {})",
            request.id,
            request.blood_group_needed,
            request.city
        );

        Ok(request)
    }

    /// Persist donors and requests together; either all rows land or none
    pub async fn insert_batch(
        &self,
        donors: &[NewDonor],
        requests: &[NewBloodRequest],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for donor in donors {
            insert_donor_row(&mut tx, donor).await?;
        }
        for request in requests {
            insert_request_row(&mut tx, request).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Available donors of `blood_group` living in exactly `city`
    ///
    /// City comparison is byte-for-byte, as SQLite's default collation is.
    pub async fn find_candidates(
        &self,
        blood_group: BloodGroup,
        city: &str,
    ) -> Result<Vec<Donor>, StoreError> {
        let query = format!(
            "SELECT {} FROM donors \
             WHERE available = 1 AND blood_group = ?1 AND city = ?2 \
             ORDER BY rowid",
            DONOR_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(blood_group.as_str())
            .bind(city)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(donor_from_row).collect()
    }

    /// Available donors, optionally restricted to one blood group
    pub async fn available_donors(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<Donor>, StoreError> {
        let rows = match blood_group {
            Some(group) => {
                let query = format!(
                    "SELECT {} FROM donors WHERE available = 1 AND blood_group = ?1 ORDER BY rowid",
                    DONOR_COLUMNS
                );
                sqlx::query(&query)
                    .bind(group.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {} FROM donors WHERE available = 1 ORDER BY rowid",
                    DONOR_COLUMNS
                );
                sqlx::query(&query).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(donor_from_row).collect()
    }

    /// Every donor, in registration order
    pub async fn all_donors(&self) -> Result<Vec<Donor>, StoreError> {
        let query = format!("SELECT {} FROM donors ORDER BY rowid", DONOR_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(donor_from_row).collect()
    }

    pub async fn count_donors(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(*) AS count FROM donors").await
    }

    pub async fn count_requests(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(*) AS count FROM blood_requests").await
    }

    /// Number of distinct donor cities
    pub async fn count_cities(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(DISTINCT city) AS count FROM donors").await
    }

    async fn count(&self, query: &str) -> Result<i64, StoreError> {
        let row = sqlx::query(query).fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }
}

async fn insert_donor_row(
    conn: &mut SqliteConnection,
    new_donor: &NewDonor,
) -> Result<Donor, StoreError> {
    let donor = Donor {
        id: Uuid::new_v4(),
        full_name: new_donor.full_name.clone(),
        email: new_donor.email.clone(),
        phone: new_donor.phone.clone(),
        blood_group: new_donor.blood_group,
        date_of_birth: new_donor.date_of_birth,
        city: new_donor.city.clone(),
        region: new_donor.region.clone(),
        available: new_donor.available,
        last_donation_date: new_donor.last_donation_date,
        created_at: Utc::now(),
    };

    let query = format!(
        "INSERT INTO donors ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        DONOR_COLUMNS
    );

    sqlx::query(&query)
        .bind(donor.id)
        .bind(&donor.full_name)
        .bind(&donor.email)
        .bind(&donor.phone)
        .bind(donor.blood_group.as_str())
        .bind(donor.date_of_birth)
        .bind(&donor.city)
        .bind(&donor.region)
        .bind(donor.available)
        .bind(donor.last_donation_date)
        .bind(donor.created_at)
        .execute(&mut *conn)
        .await?;

    Ok(donor)
}

async fn insert_request_row(
    conn: &mut SqliteConnection,
    new_request: &NewBloodRequest,
) -> Result<BloodRequest, StoreError> {
    let request = BloodRequest {
        id: Uuid::new_v4(),
        patient_name: new_request.patient_name.clone(),
        contact_person: new_request.contact_person.clone(),
        email: new_request.email.clone(),
        phone: new_request.phone.clone(),
        blood_group_needed: new_request.blood_group_needed,
        units_required: new_request.units_required,
        hospital_name: new_request.hospital_name.clone(),
        city: new_request.city.clone(),
        created_at: Utc::now(),
    };

    let query = format!(
        "INSERT INTO blood_requests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        REQUEST_COLUMNS
    );

    sqlx::query(&query)
        .bind(request.id)
        .bind(&request.patient_name)
        .bind(&request.contact_person)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.blood_group_needed.as_str())
        .bind(i64::from(request.units_required))
        .bind(&request.hospital_name)
        .bind(&request.city)
        .bind(request.created_at)
        .execute(&mut *conn)
        .await?;

    Ok(request)
}

fn parse_group(raw: &str) -> Result<BloodGroup, StoreError> {
    raw.parse::<BloodGroup>()
        .map_err(|e| StoreError::CorruptRow(e.to_string()))
}

fn donor_from_row(row: &SqliteRow) -> Result<Donor, StoreError> {
    let blood_group: String = row.try_get("blood_group")?;

    Ok(Donor {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        blood_group: parse_group(&blood_group)?,
        date_of_birth: row.try_get::<Option<NaiveDate>, _>("date_of_birth")?,
        city: row.try_get("city")?,
        region: row.try_get("region")?,
        available: row.try_get("available")?,
        last_donation_date: row.try_get::<Option<NaiveDate>, _>("last_donation_date")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
