use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Enrollment row denormalized for client display; doubles as the
/// final-grade upload body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
    pub enrollment_id: i32,
    pub grade: Option<String>,
    pub student_id: i32,
    pub name: String,
    pub email: String,
    pub course_id: String,
    pub title: String,
    pub sec_id: i32,
    pub section_no: i32,
    pub building: String,
    pub room: String,
    pub times: String,
    pub credits: i32,
    pub year: i32,
    pub semester: String,
}
