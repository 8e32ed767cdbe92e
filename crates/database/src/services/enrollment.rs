use crate::entities::{courses, enrollments, sections, terms, users};
use crate::error::ServiceError;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

/// A final-grade edit for one enrollment
pub struct FinalGradeUpdate {
    pub enrollment_id: i32,
    pub grade: Option<String>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// A section's enrollments ordered by student name (ties broken by
    /// enrollment id), with the course and term rows for display fields.
    pub async fn list_by_section(
        db: &DatabaseConnection,
        section_no: i32,
    ) -> Result<
        (
            sections::Model,
            courses::Model,
            terms::Model,
            Vec<(enrollments::Model, users::Model)>,
        ),
        ServiceError,
    > {
        let section = sections::Entity::find_by_id(section_no)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Section not found {section_no}")))?;

        let enrollments: Vec<(enrollments::Model, Option<users::Model>)> =
            enrollments::Entity::find()
                .find_also_related(users::Entity)
                .filter(enrollments::Column::SectionNo.eq(section_no))
                .order_by_asc(users::Column::Name)
                .order_by_asc(enrollments::Column::EnrollmentId)
                .all(db)
                .await?;

        if enrollments.is_empty() {
            return Err(ServiceError::NotFound("Nobody has enrolled".to_string()));
        }

        let course = courses::Entity::find_by_id(section.course_id.clone())
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("course {}", section.course_id)))?;

        let term = terms::Entity::find_by_id(section.term_id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("term {}", section.term_id)))?;

        let rows = enrollments
            .into_iter()
            .filter_map(|(enrollment, student)| student.map(|s| (enrollment, s)))
            .collect();

        Ok((section, course, term, rows))
    }

    /// Bulk final-grade upload. All-or-nothing: a missing enrollment id
    /// aborts the whole batch before anything commits.
    pub async fn update_final_grades(
        db: &DatabaseConnection,
        updates: &[FinalGradeUpdate],
    ) -> Result<(), ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::NotFound(
                "Please provide the enrollments".to_string(),
            ));
        }

        let txn = db.begin().await?;

        for update in updates {
            let enrollment = enrollments::Entity::find_by_id(update.enrollment_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Enrollment not found {}",
                        update.enrollment_id
                    ))
                })?;

            let mut active: enrollments::ActiveModel = enrollment.into();
            active.grade = Set(update.grade.clone());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }
}
