use roster_core::{
    DepartmentRepository, Employee, EmployeeRepository, RepoError, Roster, ValidationError,
};
use std::rc::Rc;

fn roster() -> Roster {
    let roster = Roster::open_in_memory().unwrap();
    roster.create_tables().unwrap();
    roster
}

#[test]
fn create_requires_existing_department() {
    let roster = roster();

    let err = roster.employees().create("Ada", "Engineer", 99).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingReference {
            field: "department_id",
            target: "department",
            id: 99,
        })
    ));
    assert!(roster.employees().get_all().unwrap().is_empty());
}

#[test]
fn create_accepts_just_created_department() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let department_id = department.id().unwrap();

    let employee = roster
        .employees()
        .create("Ada", "Engineer", department_id)
        .unwrap();

    let loaded = roster
        .employees()
        .find_by_id(employee.id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name(), "Ada");
    assert_eq!(loaded.job_title(), "Engineer");
    assert_eq!(loaded.department_id(), department_id);
}

#[test]
fn text_validation_runs_before_department_lookup() {
    let roster = roster();

    let err = roster.employees().create("Ada", " ", 99).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankText { field: "job_title" })
    ));
}

#[test]
fn failed_setters_keep_previous_values() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department.id().unwrap())
        .unwrap();

    assert!(employee.set_name("").is_err());
    assert!(employee.set_job_title("\t").is_err());
    let err = roster.employees().reassign(&employee, 1234).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingReference { id: 1234, .. })
    ));
    assert_eq!(employee.name(), "Ada");
    assert_eq!(employee.job_title(), "Engineer");
    assert_eq!(employee.department_id(), department.id().unwrap());
}

#[test]
fn reassign_then_update_moves_employee() {
    let roster = roster();
    let engineering = roster.departments().create("Engineering", "Building A").unwrap();
    let research = roster.departments().create("Research", "Building C").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", engineering.id().unwrap())
        .unwrap();

    roster
        .employees()
        .reassign(&employee, research.id().unwrap())
        .unwrap();
    employee.set_job_title("Researcher").unwrap();
    roster.employees().update(&employee).unwrap();

    roster.reset_caches();
    let loaded = roster
        .employees()
        .find_by_id(employee.id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.department_id(), research.id().unwrap());
    assert_eq!(loaded.job_title(), "Researcher");
    assert!(roster.employees_of(&engineering).unwrap().is_empty());
}

#[test]
fn new_employee_can_be_built_with_repository_lookup_and_saved() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employees = roster.employees();

    let employee = Rc::new(
        Employee::new(
            "Grace",
            "Admiral",
            department.id().unwrap(),
            employees.departments(),
        )
        .unwrap(),
    );
    let id = employees.save(&employee).unwrap();

    let found = employees.find_by_name("Grace").unwrap().unwrap();
    assert!(Rc::ptr_eq(&found, &employee));
    assert_eq!(found.id(), Some(id));
    assert!(employees.find_by_name("Linus").unwrap().is_none());
}

#[test]
fn delete_evicts_and_clears_id() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department.id().unwrap())
        .unwrap();
    let id = employee.id().unwrap();

    roster.employees().delete(&employee).unwrap();

    assert!(!employee.is_persisted());
    assert!(!roster.employee_cache().contains(id));
    assert!(roster.employees().find_by_id(id).unwrap().is_none());
    assert!(roster.employees().get_all().unwrap().is_empty());
}

#[test]
fn save_twice_is_rejected() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department.id().unwrap())
        .unwrap();

    let err = roster.employees().save(&employee).unwrap_err();

    assert!(matches!(err, RepoError::AlreadyPersisted { table: "employees", .. }));
    assert_eq!(roster.employees().get_all().unwrap().len(), 1);
}
