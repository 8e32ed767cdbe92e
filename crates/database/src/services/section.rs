use crate::entities::{courses, sections, terms, users};
use crate::error::ServiceError;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait,
};
use std::collections::HashMap;

pub struct SectionService;

impl SectionService {
    /// Sections taught by the given instructor email in the given term. An
    /// unmatched query returns an empty list, not an error.
    pub async fn for_instructor(
        db: &DatabaseConnection,
        email: &str,
        year: i32,
        semester: &str,
    ) -> Result<
        Vec<(
            sections::Model,
            courses::Model,
            terms::Model,
            Option<users::Model>,
        )>,
        ServiceError,
    > {
        let sections = sections::Entity::find()
            .filter(sections::Column::InstructorEmail.eq(email))
            .join(JoinType::InnerJoin, sections::Relation::Term.def())
            .filter(terms::Column::Year.eq(year))
            .filter(terms::Column::Semester.eq(semester))
            .all(db)
            .await?;

        if sections.is_empty() {
            return Ok(vec![]);
        }

        let course_ids: Vec<String> = sections.iter().map(|s| s.course_id.clone()).collect();
        let courses: HashMap<String, courses::Model> = courses::Entity::find()
            .filter(courses::Column::CourseId.is_in(course_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.course_id.clone(), c))
            .collect();

        let term_ids: Vec<i32> = sections.iter().map(|s| s.term_id).collect();
        let terms: HashMap<i32, terms::Model> = terms::Entity::find()
            .filter(terms::Column::TermId.is_in(term_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.term_id, t))
            .collect();

        // Display name/email; None when the email matches no user row
        let instructor = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        let mut rows = Vec::new();
        for section in sections {
            let course = courses
                .get(&section.course_id)
                .cloned()
                .ok_or_else(|| DbErr::RecordNotFound(format!("course {}", section.course_id)))?;
            let term = terms
                .get(&section.term_id)
                .cloned()
                .ok_or_else(|| DbErr::RecordNotFound(format!("term {}", section.term_id)))?;
            rows.push((section, course, term, instructor.clone()));
        }

        Ok(rows)
    }
}
