pub mod resume;
pub mod saved_resume;
