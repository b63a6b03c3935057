// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod resume;
pub mod scoring;
pub mod trending;

pub use filters::{matches_filter, recommendation_cascade};
pub use matcher::{Matcher, RankedJobs};
pub use resume::{extract_fallback, extract_pdf_text, MAX_RESUME_BYTES};
pub use scoring::calculate_match_score;
pub use trending::{count_skills, demand_label, trending_skills};
