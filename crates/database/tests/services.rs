use anyhow::Result;
use chrono::NaiveDate;
use database::entities::{assignments, courses, enrollments, grades, sections, terms, users};
use database::error::ServiceError;
use database::services::assignment::{AssignmentService, ScoreUpdate};
use database::services::enrollment::{EnrollmentService, FinalGradeUpdate};
use database::services::section::SectionService;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter,
};

/// Fresh in-memory database with the full schema applied
async fn setup_db() -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

struct Fixture {
    section_no: i32,
    enrollment_alice: i32,
    enrollment_bob: i32,
    alice_id: i32,
}

/// One Fall 2025 term (Aug 20 - Dec 15), one course, one section taught by
/// dwisneski@csumb.edu, with Alice and Bob enrolled.
async fn seed(db: &DatabaseConnection) -> Result<Fixture> {
    let term = terms::ActiveModel {
        year: Set(2025),
        semester: Set("Fall".to_string()),
        start_date: Set(date(2025, 8, 20)),
        end_date: Set(date(2025, 12, 15)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    courses::ActiveModel {
        course_id: Set("cst438".to_string()),
        title: Set("Software Engineering".to_string()),
        credits: Set(4),
    }
    .insert(db)
    .await?;

    let section = sections::ActiveModel {
        sec_id: Set(1),
        building: Set("052".to_string()),
        room: Set("100".to_string()),
        times: Set("M W 10:00-11:50".to_string()),
        course_id: Set("cst438".to_string()),
        term_id: Set(term.term_id),
        instructor_email: Set(Some("dwisneski@csumb.edu".to_string())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    users::ActiveModel {
        name: Set("David Wisneski".to_string()),
        email: Set("dwisneski@csumb.edu".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let alice = users::ActiveModel {
        name: Set("Alice Adams".to_string()),
        email: Set("alice@csumb.edu".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let bob = users::ActiveModel {
        name: Set("Bob Baker".to_string()),
        email: Set("bob@csumb.edu".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let enrollment_alice = enrollments::ActiveModel {
        grade: Set(None),
        user_id: Set(alice.id),
        section_no: Set(section.section_no),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let enrollment_bob = enrollments::ActiveModel {
        grade: Set(None),
        user_id: Set(bob.id),
        section_no: Set(section.section_no),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(Fixture {
        section_no: section.section_no,
        enrollment_alice: enrollment_alice.enrollment_id,
        enrollment_bob: enrollment_bob.enrollment_id,
        alice_id: alice.id,
    })
}

#[tokio::test]
async fn create_assignment_inside_term_window() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (assignment, section) =
        AssignmentService::create(&db, "db homework 1", date(2025, 9, 15), fx.section_no).await?;

    assert!(assignment.assignment_id > 0);
    assert_eq!(section.section_no, fx.section_no);

    let persisted = assignments::Entity::find_by_id(assignment.assignment_id)
        .one(&db)
        .await?
        .expect("assignment row");
    assert_eq!(persisted.title, "db homework 1");
    assert_eq!(persisted.due_date, date(2025, 9, 15));
    assert_eq!(persisted.section_no, fx.section_no);

    Ok(())
}

#[tokio::test]
async fn create_assignment_outside_term_window() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let err = AssignmentService::create(&db, "late homework", date(2026, 1, 10), fx.section_no)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::BadRequest(_)));
    assert_eq!(err.to_string(), "Due date is outside the course dates");

    // The term boundaries themselves are valid due dates
    AssignmentService::create(&db, "first day", date(2025, 8, 20), fx.section_no).await?;
    AssignmentService::create(&db, "last day", date(2025, 12, 15), fx.section_no).await?;

    Ok(())
}

#[tokio::test]
async fn create_assignment_unknown_section() -> Result<()> {
    let db = setup_db().await?;
    seed(&db).await?;

    let err = AssignmentService::create(&db, "homework", date(2025, 9, 15), 999)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::BadRequest(_)));
    assert_eq!(err.to_string(), "Section not found");

    Ok(())
}

#[tokio::test]
async fn update_assignment_revalidates_due_date() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (assignment, _) =
        AssignmentService::create(&db, "draft", date(2025, 9, 1), fx.section_no).await?;

    let (updated, _) =
        AssignmentService::update(&db, assignment.assignment_id, "final", date(2025, 10, 1))
            .await?;
    assert_eq!(updated.title, "final");
    assert_eq!(updated.due_date, date(2025, 10, 1));
    assert_eq!(updated.section_no, fx.section_no);

    let err = AssignmentService::update(&db, assignment.assignment_id, "final", date(2026, 2, 1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Due date is outside the course dates");

    let err = AssignmentService::update(&db, 999, "ghost", date(2025, 10, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
    assert_eq!(err.to_string(), "Assignment not found");

    Ok(())
}

#[tokio::test]
async fn delete_assignment_removes_row_and_grades() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (assignment, _) =
        AssignmentService::create(&db, "quiz 1", date(2025, 9, 10), fx.section_no).await?;

    // Materialize grade rows first so the cascade has something to delete
    AssignmentService::grades_for_assignment(&db, assignment.assignment_id).await?;
    let grade_count = grades::Entity::find()
        .filter(grades::Column::AssignmentId.eq(assignment.assignment_id))
        .count(&db)
        .await?;
    assert_eq!(grade_count, 2);

    AssignmentService::delete(&db, assignment.assignment_id).await?;

    let gone = assignments::Entity::find_by_id(assignment.assignment_id)
        .one(&db)
        .await?;
    assert!(gone.is_none());

    let orphaned = grades::Entity::find()
        .filter(grades::Column::AssignmentId.eq(assignment.assignment_id))
        .count(&db)
        .await?;
    assert_eq!(orphaned, 0);

    let err = AssignmentService::delete(&db, assignment.assignment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "Assignment not found");

    Ok(())
}

#[tokio::test]
async fn list_by_section_orders_by_due_date() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    AssignmentService::create(&db, "second", date(2025, 10, 1), fx.section_no).await?;
    AssignmentService::create(&db, "first", date(2025, 9, 1), fx.section_no).await?;
    AssignmentService::create(&db, "third", date(2025, 11, 1), fx.section_no).await?;

    let (_, listed) = AssignmentService::list_by_section(&db, fx.section_no).await?;
    let titles: Vec<&str> = listed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["first", "second", "third"]);

    Ok(())
}

#[tokio::test]
async fn list_by_section_empty_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    // A real section with zero assignments 404s, same as a missing section
    let err = AssignmentService::list_by_section(&db, fx.section_no)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(
        err.to_string(),
        "Section not found or no assignments for section"
    );

    let err = AssignmentService::list_by_section(&db, 999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn grades_for_assignment_materializes_once() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (assignment, _) =
        AssignmentService::create(&db, "quiz 1", date(2025, 9, 10), fx.section_no).await?;

    let (_, _, first) =
        AssignmentService::grades_for_assignment(&db, assignment.assignment_id).await?;
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|(grade, _)| grade.score == 0));

    // Ordered by student name ascending
    let names: Vec<&str> = first.iter().map(|(_, s)| s.name.as_str()).collect();
    assert_eq!(names, ["Alice Adams", "Bob Baker"]);

    // Bump one score, then re-read: no new rows, scores preserved
    AssignmentService::update_grade_scores(
        &db,
        &[ScoreUpdate {
            grade_id: first[0].0.grade_id,
            score: 95,
        }],
    )
    .await?;

    let (_, _, second) =
        AssignmentService::grades_for_assignment(&db, assignment.assignment_id).await?;
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].0.grade_id, first[0].0.grade_id);
    assert_eq!(second[0].0.score, 95);
    assert_eq!(second[1].0.score, 0);

    let total = grades::Entity::find()
        .filter(grades::Column::AssignmentId.eq(assignment.assignment_id))
        .count(&db)
        .await?;
    assert_eq!(total, 2);

    Ok(())
}

#[tokio::test]
async fn grades_for_unknown_assignment_is_bad_request() -> Result<()> {
    let db = setup_db().await?;
    seed(&db).await?;

    let err = AssignmentService::grades_for_assignment(&db, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
    assert_eq!(err.to_string(), "Assignment not found");

    Ok(())
}

#[tokio::test]
async fn update_grade_scores_is_all_or_nothing() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (assignment, _) =
        AssignmentService::create(&db, "quiz 1", date(2025, 9, 10), fx.section_no).await?;
    let (_, _, rows) =
        AssignmentService::grades_for_assignment(&db, assignment.assignment_id).await?;

    let err = AssignmentService::update_grade_scores(
        &db,
        &[
            ScoreUpdate {
                grade_id: rows[0].0.grade_id,
                score: 80,
            },
            ScoreUpdate {
                grade_id: 9999,
                score: 70,
            },
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
    assert_eq!(err.to_string(), "Grade not found 9999");

    // The valid entry before the bad id must not have committed
    let unchanged = grades::Entity::find_by_id(rows[0].0.grade_id)
        .one(&db)
        .await?
        .expect("grade row");
    assert_eq!(unchanged.score, 0);

    Ok(())
}

#[tokio::test]
async fn assignments_for_student_annotates_scores() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let (quiz, _) =
        AssignmentService::create(&db, "quiz 1", date(2025, 9, 10), fx.section_no).await?;
    let (hw, _) =
        AssignmentService::create(&db, "homework 1", date(2025, 10, 10), fx.section_no).await?;

    // Give Alice a score on the quiz only
    grades::ActiveModel {
        enrollment_id: Set(fx.enrollment_alice),
        assignment_id: Set(quiz.assignment_id),
        score: Set(88),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let rows =
        AssignmentService::assignments_for_student(&db, fx.alice_id, 2025, "Fall").await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.assignment_id, quiz.assignment_id);
    assert_eq!(rows[0].2, Some(88));
    assert_eq!(rows[1].0.assignment_id, hw.assignment_id);
    assert_eq!(rows[1].2, None);

    // Read-only: the missing grade row must not have been materialized
    let total = grades::Entity::find().count(&db).await?;
    assert_eq!(total, 1);

    Ok(())
}

#[tokio::test]
async fn assignments_for_student_empty_is_not_found() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    // Enrolled, but the section has no assignments
    let err = AssignmentService::assignments_for_student(&db, fx.alice_id, 2025, "Fall")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "No assignments found for the given criteria");

    // Wrong term
    AssignmentService::create(&db, "quiz 1", date(2025, 9, 10), fx.section_no).await?;
    let err = AssignmentService::assignments_for_student(&db, fx.alice_id, 2025, "Spring")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn enrollments_ordered_by_name_then_id() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    // A second "Alice Adams" to exercise the tie-break
    let twin = users::ActiveModel {
        name: Set("Alice Adams".to_string()),
        email: Set("alice2@csumb.edu".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let enrollment_twin = enrollments::ActiveModel {
        grade: Set(None),
        user_id: Set(twin.id),
        section_no: Set(fx.section_no),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let (section, course, term, rows) =
        EnrollmentService::list_by_section(&db, fx.section_no).await?;
    assert_eq!(section.section_no, fx.section_no);
    assert_eq!(course.course_id, "cst438");
    assert_eq!(term.year, 2025);

    let order: Vec<i32> = rows.iter().map(|(e, _)| e.enrollment_id).collect();
    assert_eq!(
        order,
        [fx.enrollment_alice, enrollment_twin.enrollment_id, fx.enrollment_bob]
    );

    Ok(())
}

#[tokio::test]
async fn enrollments_for_missing_or_empty_section() -> Result<()> {
    let db = setup_db().await?;
    seed(&db).await?;

    let err = EnrollmentService::list_by_section(&db, 999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "Section not found 999");

    // A section that exists but has no enrollments
    let term = terms::Entity::find().one(&db).await?.expect("term row");
    let empty_section = sections::ActiveModel {
        sec_id: Set(2),
        building: Set("052".to_string()),
        room: Set("200".to_string()),
        times: Set("T Th 12:00-13:50".to_string()),
        course_id: Set("cst438".to_string()),
        term_id: Set(term.term_id),
        instructor_email: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let err = EnrollmentService::list_by_section(&db, empty_section.section_no)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "Nobody has enrolled");

    Ok(())
}

#[tokio::test]
async fn final_grades_persist_exactly() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    EnrollmentService::update_final_grades(
        &db,
        &[
            FinalGradeUpdate {
                enrollment_id: fx.enrollment_alice,
                grade: Some("A".to_string()),
            },
            FinalGradeUpdate {
                enrollment_id: fx.enrollment_bob,
                grade: Some("B".to_string()),
            },
        ],
    )
    .await?;

    let alice = enrollments::Entity::find_by_id(fx.enrollment_alice)
        .one(&db)
        .await?
        .expect("enrollment row");
    assert_eq!(alice.grade.as_deref(), Some("A"));

    let bob = enrollments::Entity::find_by_id(fx.enrollment_bob)
        .one(&db)
        .await?
        .expect("enrollment row");
    assert_eq!(bob.grade.as_deref(), Some("B"));

    Ok(())
}

#[tokio::test]
async fn final_grades_reject_empty_and_unknown_ids() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let err = EnrollmentService::update_final_grades(&db, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "Please provide the enrollments");

    let err = EnrollmentService::update_final_grades(
        &db,
        &[
            FinalGradeUpdate {
                enrollment_id: fx.enrollment_alice,
                grade: Some("A".to_string()),
            },
            FinalGradeUpdate {
                enrollment_id: 9999,
                grade: Some("F".to_string()),
            },
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(err.to_string(), "Enrollment not found 9999");

    // All-or-nothing: the batch must not have touched Alice
    let alice = enrollments::Entity::find_by_id(fx.enrollment_alice)
        .one(&db)
        .await?
        .expect("enrollment row");
    assert_eq!(alice.grade, None);

    Ok(())
}

#[tokio::test]
async fn instructor_sections_denormalized() -> Result<()> {
    let db = setup_db().await?;
    let fx = seed(&db).await?;

    let rows =
        SectionService::for_instructor(&db, "dwisneski@csumb.edu", 2025, "Fall").await?;
    assert_eq!(rows.len(), 1);

    let (section, course, term, instructor) = &rows[0];
    assert_eq!(section.section_no, fx.section_no);
    assert_eq!(course.title, "Software Engineering");
    assert_eq!(term.semester, "Fall");
    assert_eq!(instructor.as_ref().map(|u| u.name.as_str()), Some("David Wisneski"));

    Ok(())
}

#[tokio::test]
async fn instructor_sections_unmatched_is_empty() -> Result<()> {
    let db = setup_db().await?;
    seed(&db).await?;

    // Empty list, never an error, for a valid-but-empty query
    let rows = SectionService::for_instructor(&db, "nobody@csumb.edu", 2025, "Fall").await?;
    assert!(rows.is_empty());

    let rows = SectionService::for_instructor(&db, "dwisneski@csumb.edu", 2024, "Fall").await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn instructor_without_user_row_yields_none() -> Result<()> {
    let db = setup_db().await?;
    seed(&db).await?;

    let term = terms::Entity::find().one(&db).await?.expect("term row");
    sections::ActiveModel {
        sec_id: Set(3),
        building: Set("052".to_string()),
        room: Set("300".to_string()),
        times: Set("F 09:00-11:50".to_string()),
        course_id: Set("cst438".to_string()),
        term_id: Set(term.term_id),
        instructor_email: Set(Some("adjunct@csumb.edu".to_string())),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let rows = SectionService::for_instructor(&db, "adjunct@csumb.edu", 2025, "Fall").await?;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].3.is_none());

    Ok(())
}
