use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Assignment as seen by instructors; doubles as the create/update body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub id: i32,
    pub title: String,
    pub due_date: NaiveDate,
    pub course_id: String,
    pub sec_id: i32,
    pub sec_no: i32,
}

/// Assignment annotated with the student's own score, if one exists
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStudentDto {
    pub assignment_id: i32,
    pub title: String,
    pub due_date: NaiveDate,
    pub course_id: String,
    pub sec_id: i32,
    pub score: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentParams {
    pub student_id: i32,
    pub year: i32,
    pub semester: String,
}
