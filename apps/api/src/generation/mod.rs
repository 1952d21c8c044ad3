// Text generation: CV, cover letter, ATS analysis and interview Q&A.
// All model calls go through llm_client::ContentProvider.

pub mod cleanup;
pub mod generator;
pub mod handlers;
pub mod keywords;
pub mod prompts;
