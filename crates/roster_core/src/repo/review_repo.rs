//! Review repository contract and SQLite implementation.

use super::identity_map::IdentityMap;
use super::{collect_rows, required_column, RepoError, RepoResult};
use crate::model::review::{Review, ReviewRecord, SharedReview};
use crate::model::validation::ReferenceLookup;
use crate::model::RecordId;
use log::info;
use rusqlite::{params, Connection, Row, ToSql};
use std::rc::Rc;

const TABLE: &str = "reviews";

const REVIEW_SELECT_SQL: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Repository interface for review persistence.
///
/// Reviews have no name column, so there is no `find_by_name`.
pub trait ReviewRepository {
    fn create_table(&self) -> RepoResult<()>;
    fn drop_table(&self) -> RepoResult<()>;
    fn save(&self, review: &SharedReview) -> RepoResult<RecordId>;
    fn create(&self, year: i64, summary: &str, employee_id: RecordId)
        -> RepoResult<SharedReview>;
    fn update(&self, review: &Review) -> RepoResult<()>;
    fn delete(&self, review: &Review) -> RepoResult<()>;
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedReview>>;
    fn get_all(&self) -> RepoResult<Vec<SharedReview>>;
    /// Reviews written for `employee_id`, in row order.
    fn list_for_employee(&self, employee_id: RecordId) -> RepoResult<Vec<SharedReview>>;
}

/// SQLite-backed review repository; `E` answers employee existence checks.
pub struct SqliteReviewRepository<'conn, E> {
    conn: &'conn Connection,
    cache: &'conn IdentityMap<Review>,
    employees: E,
}

impl<'conn, E> SqliteReviewRepository<'conn, E>
where
    E: ReferenceLookup<Error = RepoError>,
{
    pub fn new(conn: &'conn Connection, cache: &'conn IdentityMap<Review>, employees: E) -> Self {
        Self {
            conn,
            cache,
            employees,
        }
    }

    pub fn employees(&self) -> &E {
        &self.employees
    }

    /// Points `review` at another employee; call `update` to persist it.
    pub fn reassign(&self, review: &Review, employee_id: RecordId) -> RepoResult<()> {
        review.set_employee_id(employee_id, &self.employees)
    }

    fn resolve(&self, record: ReviewRecord) -> RepoResult<SharedReview> {
        let id = record
            .id
            .ok_or_else(|| RepoError::InvalidData("reviews row without id".to_string()))?;
        let fresh = Review::from_record(record, &self.employees)?;
        Ok(self.cache.resolve(id, fresh, Review::refresh_from))
    }

    fn resolve_all(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<SharedReview>> {
        collect_rows(self.conn, sql, params, parse_review_row)?
            .into_iter()
            .map(|record| self.resolve(record))
            .collect()
    }
}

impl<E> ReviewRepository for SqliteReviewRepository<'_, E>
where
    E: ReferenceLookup<Error = RepoError>,
{
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                year INTEGER,
                summary TEXT,
                employee_id INTEGER,
                FOREIGN KEY (employee_id) REFERENCES employees(id)
            );",
        )?;
        info!("event=table_create module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS reviews;")?;
        info!("event=table_drop module=repo table={TABLE} status=ok");
        Ok(())
    }

    fn save(&self, review: &SharedReview) -> RepoResult<RecordId> {
        if let Some(id) = review.id() {
            return Err(RepoError::AlreadyPersisted { table: TABLE, id });
        }

        self.conn.execute(
            "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3);",
            params![review.year(), review.summary(), review.employee_id()],
        )?;
        let id = self.conn.last_insert_rowid();
        review.assign_id(Some(id));
        self.cache.insert(id, Rc::clone(review));

        info!(
            "event=record_insert module=repo table={TABLE} status=ok id={id} employee_id={}",
            review.employee_id()
        );
        Ok(id)
    }

    fn create(
        &self,
        year: i64,
        summary: &str,
        employee_id: RecordId,
    ) -> RepoResult<SharedReview> {
        let review = Rc::new(Review::new(year, summary, employee_id, &self.employees)?);
        self.save(&review)?;
        Ok(review)
    }

    fn update(&self, review: &Review) -> RepoResult<()> {
        let id = review.id().ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self.conn.execute(
            "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4;",
            params![review.year(), review.summary(), review.employee_id(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }

        info!("event=record_update module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn delete(&self, review: &Review) -> RepoResult<()> {
        let id = review.id().ok_or(RepoError::NotPersisted { table: TABLE })?;

        let changed = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { table: TABLE, id });
        }
        self.cache.evict(id);
        review.assign_id(None);

        info!("event=record_delete module=repo table={TABLE} status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<SharedReview>> {
        let mut found =
            self.resolve_all(&format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"), &[&id])?;
        Ok(found.pop())
    }

    fn get_all(&self) -> RepoResult<Vec<SharedReview>> {
        self.resolve_all(&format!("{REVIEW_SELECT_SQL} ORDER BY id;"), &[])
    }

    fn list_for_employee(&self, employee_id: RecordId) -> RepoResult<Vec<SharedReview>> {
        self.resolve_all(
            &format!("{REVIEW_SELECT_SQL} WHERE employee_id = ?1 ORDER BY id;"),
            &[&employee_id],
        )
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<ReviewRecord> {
    Ok(ReviewRecord {
        id: Some(row.get("id")?),
        year: required_column(row, TABLE, "year")?,
        summary: required_column(row, TABLE, "summary")?,
        employee_id: required_column(row, TABLE, "employee_id")?,
    })
}
