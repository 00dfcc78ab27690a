// Candidate screening: ranks resumes against a job description.
// normalize → skills → classifier / similarity → match_scoring → pipeline.
// The model bundle is loaded once at startup and shared read-only.

pub mod classifier;
pub mod extraction;
pub mod handlers;
pub mod match_scoring;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod similarity;
pub mod skills;
pub mod vocabulary;
