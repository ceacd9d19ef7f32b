//! Employee entity.
//!
//! # Invariants
//! - `name` and `job_title` always contain a non-whitespace character.
//! - `department_id` named an existing department when it was assigned.
//!   Nothing re-checks it afterwards.

use super::department::DisplayId;
use super::validation::{existing_reference, non_blank, ReferenceLookup, ValidationError};
use super::RecordId;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The one in-memory handle for an employee row.
pub type SharedEmployee = Rc<Employee>;

/// Plain employee values, as stored in one `employees` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: Option<RecordId>,
    pub name: String,
    pub job_title: String,
    pub department_id: RecordId,
}

/// Staff member assigned to one department.
#[derive(Debug)]
pub struct Employee {
    id: Cell<Option<RecordId>>,
    name: RefCell<String>,
    job_title: RefCell<String>,
    department_id: Cell<RecordId>,
}

impl Employee {
    /// Builds an unsaved employee; `departments` must know `department_id`.
    pub fn new<L: ReferenceLookup>(
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: RecordId,
        departments: &L,
    ) -> Result<Self, L::Error> {
        Self::from_record(
            EmployeeRecord {
                id: None,
                name: name.into(),
                job_title: job_title.into(),
                department_id,
            },
            departments,
        )
    }

    /// Builds an employee that claims an existing row identity.
    pub fn with_id<L: ReferenceLookup>(
        id: RecordId,
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: RecordId,
        departments: &L,
    ) -> Result<Self, L::Error> {
        Self::from_record(
            EmployeeRecord {
                id: Some(id),
                name: name.into(),
                job_title: job_title.into(),
                department_id,
            },
            departments,
        )
    }

    /// Validates text fields first, then runs the department lookup.
    pub fn from_record<L: ReferenceLookup>(
        record: EmployeeRecord,
        departments: &L,
    ) -> Result<Self, L::Error> {
        let name = non_blank("name", record.name)?;
        let job_title = non_blank("job_title", record.job_title)?;
        let department_id = existing_reference(
            "department_id",
            "department",
            record.department_id,
            departments,
        )?;
        Ok(Self {
            id: Cell::new(record.id),
            name: RefCell::new(name),
            job_title: RefCell::new(job_title),
            department_id: Cell::new(department_id),
        })
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id.get()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.get().is_some()
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn job_title(&self) -> String {
        self.job_title.borrow().clone()
    }

    pub fn department_id(&self) -> RecordId {
        self.department_id.get()
    }

    pub fn set_name(&self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = non_blank("name", name.into())?;
        self.name.replace(name);
        Ok(())
    }

    pub fn set_job_title(&self, job_title: impl Into<String>) -> Result<(), ValidationError> {
        let job_title = non_blank("job_title", job_title.into())?;
        self.job_title.replace(job_title);
        Ok(())
    }

    /// Moves the employee to another department after a live existence check.
    pub fn set_department_id<L: ReferenceLookup>(
        &self,
        department_id: RecordId,
        departments: &L,
    ) -> Result<(), L::Error> {
        let department_id =
            existing_reference("department_id", "department", department_id, departments)?;
        self.department_id.set(department_id);
        Ok(())
    }

    pub fn snapshot(&self) -> EmployeeRecord {
        EmployeeRecord {
            id: self.id(),
            name: self.name(),
            job_title: self.job_title(),
            department_id: self.department_id(),
        }
    }

    pub(crate) fn assign_id(&self, id: Option<RecordId>) {
        self.id.set(id);
    }

    pub(crate) fn refresh_from(&self, fresh: Employee) {
        self.name.replace(fresh.name.into_inner());
        self.job_title.replace(fresh.job_title.into_inner());
        self.department_id.set(fresh.department_id.get());
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Employee {}: {}, {}, Dept ID: {}>",
            DisplayId(self.id()),
            self.name.borrow(),
            self.job_title.borrow(),
            self.department_id()
        )
    }
}
