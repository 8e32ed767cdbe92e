pub mod assignment;
pub mod enrollment;
pub mod section;
