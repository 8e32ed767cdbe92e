use crate::dtos::section::{InstructorSectionParams, SectionDto};
use crate::error::ApiError;
use axum::{Json, extract::Query};
use database::{db::create_connection, error::ServiceError, services::section::SectionService};

/// Get the sections taught by an instructor in a term. An unmatched query
/// returns an empty list.
#[utoipa::path(
    get,
    path = "/sections",
    params(InstructorSectionParams),
    responses(
        (status = 200, description = "Sections with course and instructor display fields", body = [SectionDto])
    ),
    tag = "Sections"
)]
pub async fn get_instructor_sections(
    Query(params): Query<InstructorSectionParams>,
) -> Result<Json<Vec<SectionDto>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let rows =
        SectionService::for_instructor(&db, &params.email, params.year, &params.semester).await?;

    let dtos = rows
        .into_iter()
        .map(|(section, course, term, instructor)| SectionDto {
            sec_no: section.section_no,
            year: term.year,
            semester: term.semester,
            course_id: course.course_id,
            title: course.title,
            sec_id: section.sec_id,
            building: section.building,
            room: section.room,
            times: section.times,
            instructor_name: instructor.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            instructor_email: instructor.map(|u| u.email).unwrap_or_default(),
        })
        .collect();

    Ok(Json(dtos))
}
