pub mod bands;
pub mod questionnaire;
pub mod scoring;
