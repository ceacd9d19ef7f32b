//! Department entity.
//!
//! # Invariants
//! - `name` and `location` always contain a non-whitespace character.
//! - `id` is `None` until the department is saved and again after delete.

use super::validation::{non_blank, ValidationError};
use super::RecordId;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The one in-memory handle for a department row.
pub type SharedDepartment = Rc<Department>;

/// Plain department values, as stored in one `departments` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub id: Option<RecordId>,
    pub name: String,
    pub location: String,
}

/// Organizational unit that employees belong to.
#[derive(Debug)]
pub struct Department {
    id: Cell<Option<RecordId>>,
    name: RefCell<String>,
    location: RefCell<String>,
}

impl Department {
    /// Builds an unsaved department.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::from_record(DepartmentRecord {
            id: None,
            name: name.into(),
            location: location.into(),
        })
    }

    /// Builds a department that claims an existing row identity.
    pub fn with_id(
        id: RecordId,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::from_record(DepartmentRecord {
            id: Some(id),
            name: name.into(),
            location: location.into(),
        })
    }

    /// Validates every field of `record` in declaration order.
    pub fn from_record(record: DepartmentRecord) -> Result<Self, ValidationError> {
        Ok(Self {
            name: RefCell::new(non_blank("name", record.name)?),
            location: RefCell::new(non_blank("location", record.location)?),
            id: Cell::new(record.id),
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

    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = non_blank("name", name.into())?;
        self.name.replace(name);
        Ok(())
    }

    pub fn set_location(&self, location: impl Into<String>) -> Result<(), ValidationError> {
        let location = non_blank("location", location.into())?;
        self.location.replace(location);
        Ok(())
    }

    /// Copies the current values out.
    pub fn snapshot(&self) -> DepartmentRecord {
        DepartmentRecord {
            id: self.id(),
            name: self.name(),
            location: self.location(),
        }
    }

    pub(crate) fn assign_id(&self, id: Option<RecordId>) {
        self.id.set(id);
    }

    /// Overwrites field values with an already validated department.
    pub(crate) fn refresh_from(&self, fresh: Department) {
        self.name.replace(fresh.name.into_inner());
        self.location.replace(fresh.location.into_inner());
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Department {}: {}, {}>",
            DisplayId(self.id()),
            self.name.borrow(),
            self.location.borrow()
        )
    }
}

/// Renders a missing id as `None`.
pub(crate) struct DisplayId(pub Option<RecordId>);

impl Display for DisplayId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("None"),
        }
    }
}
