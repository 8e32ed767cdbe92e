use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Section denormalized with course and instructor display fields. The
/// instructor name/email are empty strings when no instructor is assigned.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub sec_no: i32,
    pub year: i32,
    pub semester: String,
    pub course_id: String,
    pub title: String,
    pub sec_id: i32,
    pub building: String,
    pub room: String,
    pub times: String,
    pub instructor_name: String,
    pub instructor_email: String,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct InstructorSectionParams {
    pub email: String,
    pub year: i32,
    pub semester: String,
}
