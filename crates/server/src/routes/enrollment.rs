use crate::dtos::enrollment::EnrollmentDto;
use crate::error::ApiError;
use axum::{Json, extract::Path};
use database::{
    db::create_connection,
    error::ServiceError,
    services::enrollment::{EnrollmentService, FinalGradeUpdate},
};

/// Get a section's enrollments ordered by student name
#[utoipa::path(
    get,
    path = "/sections/{section_no}/enrollments",
    params(
        ("section_no" = i32, Path, description = "Section number")
    ),
    responses(
        (status = 200, description = "Enrollments with student, course, and term fields", body = [EnrollmentDto]),
        (status = 404, description = "Section not found, or nobody has enrolled")
    ),
    tag = "Enrollments"
)]
pub async fn get_enrollments(
    Path(section_no): Path<i32>,
) -> Result<Json<Vec<EnrollmentDto>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let (section, course, term, rows) =
        EnrollmentService::list_by_section(&db, section_no).await?;

    let dtos = rows
        .into_iter()
        .map(|(enrollment, student)| EnrollmentDto {
            enrollment_id: enrollment.enrollment_id,
            grade: enrollment.grade,
            student_id: student.id,
            name: student.name,
            email: student.email,
            course_id: course.course_id.clone(),
            title: course.title.clone(),
            sec_id: section.sec_id,
            section_no: section.section_no,
            building: section.building.clone(),
            room: section.room.clone(),
            times: section.times.clone(),
            credits: course.credits,
            year: term.year,
            semester: term.semester.clone(),
        })
        .collect();

    Ok(Json(dtos))
}

/// Upload final grades for a section's enrollments
#[utoipa::path(
    put,
    path = "/enrollments",
    request_body = [EnrollmentDto],
    responses(
        (status = 200, description = "Final grades updated"),
        (status = 404, description = "Empty list, or enrollment id not found")
    ),
    tag = "Enrollments"
)]
pub async fn update_final_grades(Json(dtos): Json<Vec<EnrollmentDto>>) -> Result<(), ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let updates: Vec<FinalGradeUpdate> = dtos
        .into_iter()
        .map(|dto| FinalGradeUpdate {
            enrollment_id: dto.enrollment_id,
            grade: dto.grade,
        })
        .collect();

    EnrollmentService::update_final_grades(&db, &updates).await?;

    Ok(())
}
