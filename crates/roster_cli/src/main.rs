//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a roster database (first argument, in-memory when omitted).
//! - Seed one department, employee and review, then print every table.
//!
//! Logging is enabled when `ROSTER_LOG_DIR` is set; the level comes from
//! `ROSTER_LOG_LEVEL` or the build default.

use roster_core::{
    core_version, default_log_level, init_logging, DepartmentRepository, EmployeeRepository,
    RepoError, RepoResult, ReviewRepository, Roster,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("ROSTER_LOG_DIR") {
        let level =
            std::env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("roster_core version={}", core_version());

    let opened = match std::env::args().nth(1) {
        Some(path) => Roster::open(path),
        None => Roster::open_in_memory(),
    };
    let result = opened.and_then(|roster| run(&roster));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(roster: &Roster) -> RepoResult<()> {
    roster.create_tables()?;

    let department = match roster.departments().find_by_name("Engineering")? {
        Some(existing) => existing,
        None => roster.departments().create("Engineering", "Building A")?,
    };
    let department_id = department.id().ok_or(RepoError::NotPersisted {
        table: "departments",
    })?;
    let employee = roster
        .employees()
        .create("Ada", "Engineer", department_id)?;
    let employee_id = employee.id().ok_or(RepoError::NotPersisted {
        table: "employees",
    })?;
    roster.reviews().create(2023, "Great work", employee_id)?;

    for department in roster.departments().get_all()? {
        println!("{department}");
        for employee in roster.employees_of(&department)? {
            println!("  {employee}");
            for review in roster.reviews_of(&employee)? {
                println!("    {review}");
            }
        }
    }
    Ok(())
}
