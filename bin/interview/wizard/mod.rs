//! Interactive wizard
//!
//! Walks the user through the generation form:
//! 1. Resume selection
//! 2. Job description and interview settings
//! 3. API key
//! 4. Submission, rendering and export

pub mod generate_wizard;

pub use generate_wizard::run_generate_wizard;
