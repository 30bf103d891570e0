use super::{validate::validate, Contact, ContactInput};
use crate::ServiceError;
use chrono::Utc;
use log::*;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, email, phone, age, created_at, updated_at";

/// How [`ContactStore::search`] compares the query against each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCase {
    Sensitive,
    Insensitive,
}

/// Every read and write against the `contacts` table goes through here, one SQL statement per
/// operation. Cloning is cheap; clones share the same pool.
#[derive(Clone, Debug)]
pub struct ContactStore {
    pool: SqlitePool,
    search_case: SearchCase,
}

impl ContactStore {
    pub fn new(pool: SqlitePool, search_case: SearchCase) -> Self {
        Self { pool, search_case }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether the database answers at all.
    pub async fn ping(&self) -> bool {
        crate::data::ping(&self.pool).await
    }

    /// All contacts, newest first.
    pub async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        let sql = format!("SELECT {} FROM contacts ORDER BY created_at DESC, id DESC", COLUMNS);
        Ok(sqlx::query_as::<_, Contact>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get(&self, id: i64) -> Result<Contact, ServiceError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = ?", COLUMNS);
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Validates `input` and inserts it, returning the stored row with its generated id and
    /// timestamps. A duplicate email is a [`ServiceError::Conflict`].
    pub async fn create(&self, input: &ContactInput) -> Result<Contact, ServiceError> {
        let fields = validate(input).map_err(ServiceError::Invalid)?;
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO contacts ( name, email, phone, age, created_at, updated_at ) \
                VALUES ( ?, ?, ?, ?, ?, ? ) \
                RETURNING {}",
            COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.phone)
            .bind(fields.age)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        debug!("created contact {}", contact.id);
        Ok(contact)
    }

    /// Validates `input` and replaces all four business fields of contact `id` with it,
    /// refreshing `updated_at`. A clock that steps backwards never moves `updated_at` back.
    pub async fn update(&self, id: i64, input: &ContactInput) -> Result<Contact, ServiceError> {
        let fields = validate(input).map_err(ServiceError::Invalid)?;

        let sql = format!(
            "UPDATE contacts \
                SET name = ?, email = ?, phone = ?, age = ?, updated_at = MAX(?, updated_at) \
                WHERE id = ? \
                RETURNING {}",
            COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.phone)
            .bind(fields.age)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound)?;

        debug!("updated contact {}", contact.id);
        Ok(contact)
    }

    /// Hard-deletes contact `id`. Deleting an id that isn't there is [`ServiceError::NotFound`],
    /// however many times it's tried.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let removed = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(ServiceError::NotFound);
        }
        debug!("deleted contact {}", id);
        Ok(())
    }

    /// Contacts whose name, email or phone contains `query`, newest first. The match is a plain
    /// substring test, so an empty query matches everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Contact>, ServiceError> {
        let clause = match self.search_case {
            SearchCase::Sensitive => {
                "instr(name, ?) > 0 OR instr(email, ?) > 0 OR instr(phone, ?) > 0"
            }
            SearchCase::Insensitive => {
                "instr(lower(name), lower(?)) > 0 \
                    OR instr(lower(email), lower(?)) > 0 \
                    OR instr(lower(phone), lower(?)) > 0"
            }
        };
        let sql = format!(
            "SELECT {} FROM contacts WHERE {} ORDER BY created_at DESC, id DESC",
            COLUMNS, clause
        );

        Ok(sqlx::query_as::<_, Contact>(&sql)
            .bind(query)
            .bind(query)
            .bind(query)
            .fetch_all(&self.pool)
            .await?)
    }
}
