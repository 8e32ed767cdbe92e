use crate::entities::{assignments, enrollments, grades, sections, terms, users};
use crate::error::ServiceError;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, TransactionTrait, sea_query::OnConflict,
};
use std::collections::HashMap;

/// A grade-score edit for one grade row
pub struct ScoreUpdate {
    pub grade_id: i32,
    pub score: i32,
}

pub struct AssignmentService;

impl AssignmentService {
    /// All assignments of a section ordered by due date. An empty result maps
    /// to NotFound; a missing section and an assignment-less section are
    /// indistinguishable here.
    pub async fn list_by_section(
        db: &DatabaseConnection,
        section_no: i32,
    ) -> Result<(sections::Model, Vec<assignments::Model>), ServiceError> {
        let assignments = assignments::Entity::find()
            .filter(assignments::Column::SectionNo.eq(section_no))
            .order_by_asc(assignments::Column::DueDate)
            .all(db)
            .await?;

        if assignments.is_empty() {
            return Err(ServiceError::NotFound(
                "Section not found or no assignments for section".to_string(),
            ));
        }

        // A non-empty result implies the section row exists
        let section = sections::Entity::find_by_id(section_no)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("section {section_no}")))?;

        Ok((section, assignments))
    }

    /// Create an assignment for a section. The caller must be the section's
    /// instructor; that check belongs to the auth layer at the HTTP boundary.
    pub async fn create(
        db: &DatabaseConnection,
        title: &str,
        due_date: NaiveDate,
        section_no: i32,
    ) -> Result<(assignments::Model, sections::Model), ServiceError> {
        let section = sections::Entity::find_by_id(section_no)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::BadRequest("Section not found".to_string()))?;

        Self::check_due_date(db, &section, due_date).await?;

        let assignment = assignments::ActiveModel {
            title: Set(title.to_string()),
            due_date: Set(due_date),
            section_no: Set(section_no),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok((assignment, section))
    }

    /// Update an assignment's title and due date. Section affiliation is
    /// immutable; the due date is re-validated against the current term window.
    pub async fn update(
        db: &DatabaseConnection,
        assignment_id: i32,
        title: &str,
        due_date: NaiveDate,
    ) -> Result<(assignments::Model, sections::Model), ServiceError> {
        let assignment = assignments::Entity::find_by_id(assignment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::BadRequest("Assignment not found".to_string()))?;

        let section = sections::Entity::find_by_id(assignment.section_no)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("section {}", assignment.section_no)))?;

        Self::check_due_date(db, &section, due_date).await?;

        let mut active: assignments::ActiveModel = assignment.into();
        active.title = Set(title.to_string());
        active.due_date = Set(due_date);
        let assignment = active.update(db).await?;

        Ok((assignment, section))
    }

    /// Delete an assignment and its dependent grade rows in one transaction.
    pub async fn delete(db: &DatabaseConnection, assignment_id: i32) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        let assignment = assignments::Entity::find_by_id(assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Assignment not found".to_string()))?;

        grades::Entity::delete_many()
            .filter(grades::Column::AssignmentId.eq(assignment.assignment_id))
            .exec(&txn)
            .await?;

        assignments::Entity::delete_by_id(assignment.assignment_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Grades for every enrollment of the assignment's section, ordered by
    /// student name. Enrollments without a grade row get one materialized with
    /// score 0; the whole read-materialize sequence runs in one transaction.
    pub async fn grades_for_assignment(
        db: &DatabaseConnection,
        assignment_id: i32,
    ) -> Result<
        (
            assignments::Model,
            sections::Model,
            Vec<(grades::Model, users::Model)>,
        ),
        ServiceError,
    > {
        let txn = db.begin().await?;

        let assignment = assignments::Entity::find_by_id(assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::BadRequest("Assignment not found".to_string()))?;

        let section = sections::Entity::find_by_id(assignment.section_no)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("section {}", assignment.section_no)))?;

        let enrollments: Vec<(enrollments::Model, Option<users::Model>)> =
            enrollments::Entity::find()
                .find_also_related(users::Entity)
                .filter(enrollments::Column::SectionNo.eq(section.section_no))
                .order_by_asc(users::Column::Name)
                .order_by_asc(enrollments::Column::EnrollmentId)
                .all(&txn)
                .await?;

        let mut rows = Vec::new();
        for (enrollment, student) in enrollments {
            let student = student
                .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", enrollment.user_id)))?;
            let grade = Self::materialize_grade(
                &txn,
                enrollment.enrollment_id,
                assignment.assignment_id,
            )
            .await?;
            rows.push((grade, student));
        }

        txn.commit().await?;
        Ok((assignment, section, rows))
    }

    /// Every assignment in sections the student is enrolled in for the given
    /// term, ordered by due date, annotated with the student's score when a
    /// grade row exists. Strictly read-only; no rows are materialized.
    pub async fn assignments_for_student(
        db: &DatabaseConnection,
        student_id: i32,
        year: i32,
        semester: &str,
    ) -> Result<Vec<(assignments::Model, sections::Model, Option<i32>)>, ServiceError> {
        // Assignments are joined against the student's own enrollments for the
        // term rather than re-resolved per assignment.
        let enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(student_id))
            .join(JoinType::InnerJoin, enrollments::Relation::Section.def())
            .join(JoinType::InnerJoin, sections::Relation::Term.def())
            .filter(terms::Column::Year.eq(year))
            .filter(terms::Column::Semester.eq(semester))
            .all(db)
            .await?;

        if enrollments.is_empty() {
            return Err(ServiceError::NotFound(
                "No assignments found for the given criteria".to_string(),
            ));
        }

        let enrollment_by_section: HashMap<i32, &enrollments::Model> =
            enrollments.iter().map(|e| (e.section_no, e)).collect();

        let section_nos: Vec<i32> = enrollments.iter().map(|e| e.section_no).collect();
        let assignments = assignments::Entity::find()
            .filter(assignments::Column::SectionNo.is_in(section_nos.clone()))
            .order_by_asc(assignments::Column::DueDate)
            .all(db)
            .await?;

        if assignments.is_empty() {
            return Err(ServiceError::NotFound(
                "No assignments found for the given criteria".to_string(),
            ));
        }

        let sections: HashMap<i32, sections::Model> = sections::Entity::find()
            .filter(sections::Column::SectionNo.is_in(section_nos))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.section_no, s))
            .collect();

        let enrollment_ids: Vec<i32> = enrollments.iter().map(|e| e.enrollment_id).collect();
        let assignment_ids: Vec<i32> = assignments.iter().map(|a| a.assignment_id).collect();
        let scores: HashMap<(i32, i32), i32> = grades::Entity::find()
            .filter(grades::Column::EnrollmentId.is_in(enrollment_ids))
            .filter(grades::Column::AssignmentId.is_in(assignment_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|g| ((g.enrollment_id, g.assignment_id), g.score))
            .collect();

        let mut rows = Vec::new();
        for assignment in assignments {
            let enrollment = enrollment_by_section
                .get(&assignment.section_no)
                .ok_or_else(|| {
                    ServiceError::NotFound("Enrollment not found for student".to_string())
                })?;
            let section = sections
                .get(&assignment.section_no)
                .cloned()
                .ok_or_else(|| {
                    DbErr::RecordNotFound(format!("section {}", assignment.section_no))
                })?;
            let score = scores
                .get(&(enrollment.enrollment_id, assignment.assignment_id))
                .copied();
            rows.push((assignment, section, score));
        }

        Ok(rows)
    }

    /// Bulk score update. Any unknown grade id aborts the whole batch.
    pub async fn update_grade_scores(
        db: &DatabaseConnection,
        updates: &[ScoreUpdate],
    ) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        for update in updates {
            let grade = grades::Entity::find_by_id(update.grade_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::BadRequest(format!("Grade not found {}", update.grade_id))
                })?;

            let mut active: grades::ActiveModel = grade.into();
            active.score = Set(update.score);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn check_due_date<C: ConnectionTrait>(
        conn: &C,
        section: &sections::Model,
        due_date: NaiveDate,
    ) -> Result<(), ServiceError> {
        let term = terms::Entity::find_by_id(section.term_id)
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("term {}", section.term_id)))?;

        if due_date < term.start_date || due_date > term.end_date {
            return Err(ServiceError::BadRequest(
                "Due date is outside the course dates".to_string(),
            ));
        }

        Ok(())
    }

    /// Fetch the (enrollment, assignment) grade row, inserting a zero-score
    /// row when none exists. An insert conflict means a concurrent caller
    /// created the row first; re-read instead of failing.
    async fn materialize_grade(
        txn: &DatabaseTransaction,
        enrollment_id: i32,
        assignment_id: i32,
    ) -> Result<grades::Model, ServiceError> {
        let existing = grades::Entity::find()
            .filter(grades::Column::EnrollmentId.eq(enrollment_id))
            .filter(grades::Column::AssignmentId.eq(assignment_id))
            .one(txn)
            .await?;

        if let Some(grade) = existing {
            return Ok(grade);
        }

        let insert = grades::Entity::insert(grades::ActiveModel {
            enrollment_id: Set(enrollment_id),
            assignment_id: Set(assignment_id),
            score: Set(0),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([grades::Column::EnrollmentId, grades::Column::AssignmentId])
                .do_nothing()
                .to_owned(),
        )
        .exec(txn)
        .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(err) => return Err(err.into()),
        }

        grades::Entity::find()
            .filter(grades::Column::EnrollmentId.eq(enrollment_id))
            .filter(grades::Column::AssignmentId.eq(assignment_id))
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::Db(DbErr::RecordNotFound(format!(
                    "grade for enrollment {enrollment_id} and assignment {assignment_id}"
                )))
            })
    }
}
