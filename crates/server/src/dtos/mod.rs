pub mod assignment;
pub mod enrollment;
pub mod grade;
pub mod section;
