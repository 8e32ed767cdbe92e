pub mod assignment;
pub mod enrollment;
pub mod health;
pub mod root;
pub mod section;
