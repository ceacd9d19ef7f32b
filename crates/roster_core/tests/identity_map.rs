use roster_core::{
    DepartmentRepository, EmployeeRepository, RepoError, ReviewRepository, Roster,
    ValidationError,
};
use std::rc::Rc;

fn roster() -> Roster {
    let roster = Roster::open_in_memory().unwrap();
    roster.create_tables().unwrap();
    roster
}

#[test]
fn repeated_find_by_id_returns_identical_instance() {
    let roster = roster();
    let created = roster.departments().create("Engineering", "Building A").unwrap();
    let id = created.id().unwrap();

    let first = roster.departments().find_by_id(id).unwrap().unwrap();
    let second = roster.departments().find_by_id(id).unwrap().unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&first, &created));
    assert_eq!(roster.department_cache().len(), 1);
}

#[test]
fn refetch_refreshes_cached_instance_in_place() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let id = department.id().unwrap();
    roster
        .connection()
        .execute(
            "UPDATE departments SET location = 'Building Z' WHERE id = ?1;",
            [id],
        )
        .unwrap();

    let refetched = roster.departments().find_by_id(id).unwrap().unwrap();

    assert!(Rc::ptr_eq(&refetched, &department));
    assert_eq!(department.location(), "Building Z");
}

#[test]
fn invalid_row_leaves_cached_instance_untouched() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let id = department.id().unwrap();
    roster
        .connection()
        .execute(
            "UPDATE departments SET name = '   ', location = 'Building Z' WHERE id = ?1;",
            [id],
        )
        .unwrap();

    let err = roster.departments().find_by_id(id).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankText { field: "name" })
    ));
    assert_eq!(department.name(), "Engineering");
    assert_eq!(department.location(), "Building A");
}

#[test]
fn rows_materialized_once_are_shared_by_every_query() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let department_id = department.id().unwrap();
    roster
        .connection()
        .execute(
            "INSERT INTO employees (name, job_title, department_id) VALUES ('Ada', 'Engineer', ?1);",
            [department_id],
        )
        .unwrap();
    assert!(roster.employee_cache().is_empty());

    let by_name = roster.employees().find_by_name("Ada").unwrap().unwrap();
    let listed = roster.employees().get_all().unwrap();
    let related = roster.employees_of(&department).unwrap();

    assert_eq!(roster.employee_cache().len(), 1);
    assert!(Rc::ptr_eq(&by_name, &listed[0]));
    assert!(Rc::ptr_eq(&by_name, &related[0]));
}

#[test]
fn reset_caches_detaches_previous_instances() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department.id().unwrap())
        .unwrap();
    roster
        .reviews()
        .create(2023, "Great work", employee.id().unwrap())
        .unwrap();

    roster.reset_caches();
    assert!(roster.department_cache().is_empty());
    assert!(roster.employee_cache().is_empty());
    assert!(roster.review_cache().is_empty());

    let fresh = roster
        .departments()
        .find_by_id(department.id().unwrap())
        .unwrap()
        .unwrap();
    assert!(!Rc::ptr_eq(&fresh, &department));
    assert_eq!(fresh.name(), department.name());
}

#[test]
fn referential_check_materializes_the_referenced_row() {
    let roster = roster();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let department_id = department.id().unwrap();
    roster.reset_caches();

    roster
        .employees()
        .create("Ada", "Engineer", department_id)
        .unwrap();

    assert!(roster.department_cache().contains(department_id));
}
