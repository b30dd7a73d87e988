use async_trait::async_trait;

use chrono::{DateTime, Utc};

use sqlx::{PgExecutor, PgPool};

use uuid::Uuid;

use crate::domain::RequiredText;

/// Validated contact form submission, ready to be stored
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: RequiredText,
    pub email: RequiredText,
    pub phone: RequiredText,
    /// Free-form values, stored as supplied
    pub date: Option<String>,
    pub message: Option<String>,
    /// Assigned by the server when the request is handled
    pub created_at: DateTime<Utc>,
}

/// Stored contact submission record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Durable storage for contact submissions
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, new_contact: &NewContact) -> sqlx::Result<ContactSubmission>;
}

#[async_trait]
impl ContactStore for PgPool {
    async fn insert(&self, new_contact: &NewContact) -> sqlx::Result<ContactSubmission> {
        match ContactRepo::insert(self, new_contact).await {
            // The database was unreachable at startup, so migrations never ran
            Err(error) if is_undefined_table(&error) => {
                tracing::warn!("Contacts table missing, running migrations");
                ContactRepo::migrate(self).await?;
                ContactRepo::insert(self, new_contact).await
            }
            result => result,
        }
    }
}

/// Postgres `undefined_table` error code
const UNDEFINED_TABLE: &str = "42P01";

fn is_undefined_table(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == UNDEFINED_TABLE)
}

/// Repository for interfacing with the contacts table
pub struct ContactRepo;

impl ContactRepo {
    #[tracing::instrument(name = "Run database migrations", skip(pool))]
    pub async fn migrate(pool: &PgPool) -> sqlx::Result<()> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Insert contact submission", skip(executor, new_contact))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_contact: &NewContact,
    ) -> sqlx::Result<ContactSubmission> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, ContactSubmission>(
            "insert into contacts(id, name, email, phone, date, message, created_at) \
             values ($1, $2, $3, $4, $5, $6, $7) \
             returning id, name, email, phone, date, message, created_at",
        )
        .bind(id)
        .bind(new_contact.name.as_ref())
        .bind(new_contact.email.as_ref())
        .bind(new_contact.phone.as_ref())
        .bind(new_contact.date.as_deref())
        .bind(new_contact.message.as_deref())
        .bind(new_contact.created_at)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Count contact submissions", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("select count(*) from contacts")
            .fetch_one(executor)
            .await
    }
}
