use crate::routes::{assignment, enrollment, health, root, section};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        assignment::get_section_assignments,
        assignment::create_assignment,
        assignment::update_assignment,
        assignment::delete_assignment,
        assignment::get_assignment_grades,
        assignment::update_grades,
        assignment::get_student_assignments,
        enrollment::get_enrollments,
        enrollment::update_final_grades,
        section::get_instructor_sections
    ),
    tags(
        (name = "Assignments", description = "Assignment and grade endpoints"),
        (name = "Enrollments", description = "Enrollment roster and final-grade endpoints"),
        (name = "Sections", description = "Section lookup endpoints"),
        (name = "Health", description = "Service health"),
    ),
    info(
        title = "Gradebook API",
        version = "1.0.0",
        description = "Course management backend",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
