//! Performance review entity.

use super::department::DisplayId;
use super::validation::{
    existing_reference, non_blank, review_year, ReferenceLookup, ValidationError,
};
use super::RecordId;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The one in-memory handle for a review row.
pub type SharedReview = Rc<Review>;

/// Plain review values, as stored in one `reviews` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Option<RecordId>,
    pub year: i64,
    pub summary: String,
    pub employee_id: RecordId,
}

/// Yearly review written for one employee.
#[derive(Debug)]
pub struct Review {
    id: Cell<Option<RecordId>>,
    year: Cell<i64>,
    summary: RefCell<String>,
    employee_id: Cell<RecordId>,
}

impl Review {
    pub fn new<L: ReferenceLookup>(
        year: i64,
        summary: impl Into<String>,
        employee_id: RecordId,
        employees: &L,
    ) -> Result<Self, L::Error> {
        Self::from_record(
            ReviewRecord {
                id: None,
                year,
                summary: summary.into(),
                employee_id,
            },
            employees,
        )
    }

    pub fn with_id<L: ReferenceLookup>(
        id: RecordId,
        year: i64,
        summary: impl Into<String>,
        employee_id: RecordId,
        employees: &L,
    ) -> Result<Self, L::Error> {
        Self::from_record(
            ReviewRecord {
                id: Some(id),
                year,
                summary: summary.into(),
                employee_id,
            },
            employees,
        )
    }

    pub fn from_record<L: ReferenceLookup>(
        record: ReviewRecord,
        employees: &L,
    ) -> Result<Self, L::Error> {
        let year = review_year(record.year)?;
        let summary = non_blank("summary", record.summary)?;
        let employee_id =
            existing_reference("employee_id", "employee", record.employee_id, employees)?;
        Ok(Self {
            id: Cell::new(record.id),
            year: Cell::new(year),
            summary: RefCell::new(summary),
            employee_id: Cell::new(employee_id),
        })
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id.get()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.get().is_some()
    }

    pub fn year(&self) -> i64 {
        self.year.get()
    }

    pub fn summary(&self) -> String {
        self.summary.borrow().clone()
    }

    pub fn employee_id(&self) -> RecordId {
        self.employee_id.get()
    }

    pub fn set_year(&self, year: i64) -> Result<(), ValidationError> {
        self.year.set(review_year(year)?);
        Ok(())
    }

    pub fn set_summary(&self, summary: impl Into<String>) -> Result<(), ValidationError> {
        let summary = non_blank("summary", summary.into())?;
        self.summary.replace(summary);
        Ok(())
    }

    pub fn set_employee_id<L: ReferenceLookup>(
        &self,
        employee_id: RecordId,
        employees: &L,
    ) -> Result<(), L::Error> {
        let employee_id = existing_reference("employee_id", "employee", employee_id, employees)?;
        self.employee_id.set(employee_id);
        Ok(())
    }

    pub fn snapshot(&self) -> ReviewRecord {
        ReviewRecord {
            id: self.id(),
            year: self.year(),
            summary: self.summary(),
            employee_id: self.employee_id(),
        }
    }

    pub(crate) fn assign_id(&self, id: Option<RecordId>) {
        self.id.set(id);
    }

    pub(crate) fn refresh_from(&self, fresh: Review) {
        self.year.set(fresh.year.get());
        self.summary.replace(fresh.summary.into_inner());
        self.employee_id.set(fresh.employee_id.get());
    }
}

impl Display for Review {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Review {}: {}, {}, Employee: {}>",
            DisplayId(self.id()),
            self.year(),
            self.summary.borrow(),
            self.employee_id()
        )
    }
}
