use crate::dtos::assignment::{AssignmentDto, AssignmentStudentDto, StudentAssignmentParams};
use crate::dtos::grade::GradeDto;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Path, Query},
};
use database::{
    db::create_connection,
    entities::{assignments, sections},
    error::ServiceError,
    services::assignment::{AssignmentService, ScoreUpdate},
};

/// Get a section's assignments ordered by due date
#[utoipa::path(
    get,
    path = "/sections/{section_no}/assignments",
    params(
        ("section_no" = i32, Path, description = "Section number")
    ),
    responses(
        (status = 200, description = "List of assignments for the section", body = [AssignmentDto]),
        (status = 404, description = "Section not found or no assignments for section")
    ),
    tag = "Assignments"
)]
pub async fn get_section_assignments(
    Path(section_no): Path<i32>,
) -> Result<Json<Vec<AssignmentDto>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let (section, assignments) = AssignmentService::list_by_section(&db, section_no).await?;

    let dtos = assignments
        .into_iter()
        .map(|assignment| convert_to_assignment_dto(assignment, &section))
        .collect();

    Ok(Json(dtos))
}

/// Create an assignment for a section. Instructor-only; the auth layer in
/// front of this service enforces that the caller teaches the section.
#[utoipa::path(
    post,
    path = "/assignments",
    request_body = AssignmentDto,
    responses(
        (status = 200, description = "Created assignment with its generated id", body = AssignmentDto),
        (status = 400, description = "Section not found, or due date outside the course dates")
    ),
    tag = "Assignments"
)]
pub async fn create_assignment(
    Json(dto): Json<AssignmentDto>,
) -> Result<Json<AssignmentDto>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let (assignment, section) =
        AssignmentService::create(&db, &dto.title, dto.due_date, dto.sec_no).await?;

    Ok(Json(convert_to_assignment_dto(assignment, &section)))
}

/// Update an assignment's title and due date
#[utoipa::path(
    put,
    path = "/assignments",
    request_body = AssignmentDto,
    responses(
        (status = 200, description = "Updated assignment", body = AssignmentDto),
        (status = 400, description = "Assignment not found, or due date outside the course dates")
    ),
    tag = "Assignments"
)]
pub async fn update_assignment(
    Json(dto): Json<AssignmentDto>,
) -> Result<Json<AssignmentDto>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let (assignment, section) =
        AssignmentService::update(&db, dto.id, &dto.title, dto.due_date).await?;

    Ok(Json(convert_to_assignment_dto(assignment, &section)))
}

/// Delete an assignment along with its grade rows
#[utoipa::path(
    delete,
    path = "/assignments/{assignment_id}",
    params(
        ("assignment_id" = i32, Path, description = "Assignment id")
    ),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments"
)]
pub async fn delete_assignment(Path(assignment_id): Path<i32>) -> Result<(), ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    AssignmentService::delete(&db, assignment_id).await?;

    Ok(())
}

/// Get the grade roster for an assignment, ordered by student name. Missing
/// grade rows are filled in with score 0.
#[utoipa::path(
    get,
    path = "/assignments/{assignment_id}/grades",
    params(
        ("assignment_id" = i32, Path, description = "Assignment id")
    ),
    responses(
        (status = 200, description = "One grade row per enrollment", body = [GradeDto]),
        (status = 400, description = "Assignment not found")
    ),
    tag = "Assignments"
)]
pub async fn get_assignment_grades(
    Path(assignment_id): Path<i32>,
) -> Result<Json<Vec<GradeDto>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let (assignment, section, rows) =
        AssignmentService::grades_for_assignment(&db, assignment_id).await?;

    let dtos = rows
        .into_iter()
        .map(|(grade, student)| GradeDto {
            grade_id: grade.grade_id,
            student_name: student.name,
            student_email: student.email,
            assignment_title: assignment.title.clone(),
            course_id: section.course_id.clone(),
            sec_id: section.sec_id,
            score: grade.score,
        })
        .collect();

    Ok(Json(dtos))
}

/// Upload scores for existing grade rows
#[utoipa::path(
    put,
    path = "/grades",
    request_body = [GradeDto],
    responses(
        (status = 200, description = "Scores updated"),
        (status = 400, description = "Grade id not found")
    ),
    tag = "Assignments"
)]
pub async fn update_grades(Json(dtos): Json<Vec<GradeDto>>) -> Result<(), ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let updates: Vec<ScoreUpdate> = dtos
        .into_iter()
        .map(|dto| ScoreUpdate {
            grade_id: dto.grade_id,
            score: dto.score,
        })
        .collect();

    AssignmentService::update_grade_scores(&db, &updates).await?;

    Ok(())
}

/// Get a student's assignments for a term, each with the student's score
#[utoipa::path(
    get,
    path = "/assignments",
    params(StudentAssignmentParams),
    responses(
        (status = 200, description = "Assignments ordered by due date", body = [AssignmentStudentDto]),
        (status = 404, description = "No assignments found for the given criteria")
    ),
    tag = "Assignments"
)]
pub async fn get_student_assignments(
    Query(params): Query<StudentAssignmentParams>,
) -> Result<Json<Vec<AssignmentStudentDto>>, ApiError> {
    let db = create_connection().await.map_err(ServiceError::from)?;

    let rows = AssignmentService::assignments_for_student(
        &db,
        params.student_id,
        params.year,
        &params.semester,
    )
    .await?;

    let dtos = rows
        .into_iter()
        .map(|(assignment, section, score)| AssignmentStudentDto {
            assignment_id: assignment.assignment_id,
            title: assignment.title,
            due_date: assignment.due_date,
            course_id: section.course_id,
            sec_id: section.sec_id,
            score,
        })
        .collect();

    Ok(Json(dtos))
}

fn convert_to_assignment_dto(
    assignment: assignments::Model,
    section: &sections::Model,
) -> AssignmentDto {
    AssignmentDto {
        id: assignment.assignment_id,
        title: assignment.title,
        due_date: assignment.due_date,
        course_id: section.course_id.clone(),
        sec_id: section.sec_id,
        sec_no: section.section_no,
    }
}
