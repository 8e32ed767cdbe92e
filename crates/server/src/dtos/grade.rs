use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One roster row for an assignment; doubles as the score-update body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeDto {
    pub grade_id: i32,
    pub student_name: String,
    pub student_email: String,
    pub assignment_title: String,
    pub course_id: String,
    pub sec_id: i32,
    pub score: i32,
}
