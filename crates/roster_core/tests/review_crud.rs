use roster_core::{
    DepartmentRepository, EmployeeRepository, RepoError, ReviewRepository, Roster,
    SharedEmployee, ValidationError, MIN_REVIEW_YEAR,
};

fn roster_with_employee() -> (Roster, SharedEmployee) {
    let roster = Roster::open_in_memory().unwrap();
    roster.create_tables().unwrap();
    let department = roster.departments().create("Engineering", "Building A").unwrap();
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department.id().unwrap())
        .unwrap();
    (roster, employee)
}

#[test]
fn year_boundary_is_inclusive() {
    let (roster, employee) = roster_with_employee();
    let employee_id = employee.id().unwrap();

    let err = roster
        .reviews()
        .create(MIN_REVIEW_YEAR - 1, "Too early", employee_id)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::YearOutOfRange {
            year: 1999,
            minimum: 2000
        })
    ));

    let review = roster
        .reviews()
        .create(2000, "First year", employee_id)
        .unwrap();
    assert_eq!(review.year(), 2000);
}

#[test]
fn create_requires_existing_employee() {
    let (roster, _employee) = roster_with_employee();

    let err = roster.reviews().create(2023, "Great work", 77).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingReference {
            field: "employee_id",
            target: "employee",
            id: 77,
        })
    ));
}

#[test]
fn blank_summary_is_rejected_and_previous_value_kept() {
    let (roster, employee) = roster_with_employee();
    let review = roster
        .reviews()
        .create(2023, "Great work", employee.id().unwrap())
        .unwrap();

    assert!(roster
        .reviews()
        .create(2023, "   ", employee.id().unwrap())
        .is_err());
    assert_eq!(
        review.set_summary(""),
        Err(ValidationError::BlankText { field: "summary" })
    );
    assert!(review.set_year(1980).is_err());

    assert_eq!(review.summary(), "Great work");
    assert_eq!(review.year(), 2023);
}

#[test]
fn update_persists_year_and_summary() {
    let (roster, employee) = roster_with_employee();
    let review = roster
        .reviews()
        .create(2023, "Great work", employee.id().unwrap())
        .unwrap();

    review.set_year(2024).unwrap();
    review.set_summary("Even better").unwrap();
    roster.reviews().update(&review).unwrap();

    roster.reset_caches();
    let loaded = roster
        .reviews()
        .find_by_id(review.id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.year(), 2024);
    assert_eq!(loaded.summary(), "Even better");
}

#[test]
fn reassign_checks_employee_existence() {
    let (roster, employee) = roster_with_employee();
    let review = roster
        .reviews()
        .create(2023, "Great work", employee.id().unwrap())
        .unwrap();

    assert!(roster.reviews().reassign(&review, 500).is_err());
    assert_eq!(review.employee_id(), employee.id().unwrap());
}

#[test]
fn delete_removes_review_from_get_all() {
    let (roster, employee) = roster_with_employee();
    let reviews = roster.reviews();
    let first = reviews
        .create(2022, "Solid", employee.id().unwrap())
        .unwrap();
    let second = reviews
        .create(2023, "Great work", employee.id().unwrap())
        .unwrap();
    let first_id = first.id().unwrap();

    reviews.delete(&first).unwrap();

    assert_eq!(first.id(), None);
    assert!(reviews.find_by_id(first_id).unwrap().is_none());
    let remaining = reviews.get_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), second.id());
    assert!(matches!(
        reviews.update(&first).unwrap_err(),
        RepoError::NotPersisted { table: "reviews" }
    ));
}
