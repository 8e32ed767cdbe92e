pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod sections;
pub mod terms;
pub mod users;
