//! Extractors Crate
//!
//! This crate turns one noisy professional-profile page into a clean, validated
//! `ProfileRecord`. Every component is a stateless value that takes its input
//! by reference and returns new values, so one pipeline can serve many pages.
//!
//! # Architecture
//!
//! - **Types**: records, reports and the `SectionLocator` trait live in the `shared-types` crate
//! - **Implementations**: parsing, filtering, sanitizing and validation live in this crate
//!
//! # Components
//!
//! - `DurationParser`: free-text role duration to months
//! - `AggregateFilter` / `ExperienceAggregator`: drop company roll-up rows, total the rest
//! - `TextSanitizer`: ordered rule table that strips social noise from narrative text
//! - `EmailResolver`: merges several discovery strategies and picks the candidate's address
//! - `ProfileValidator`: audits the record and repairs implausible totals once
//! - `ProfilePipeline`: runs all of the above in order
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{ProfileDocument, ProfileInput, ProfilePipeline, StaticSections};
//!
//! let document = ProfileDocument::from_html(&html);
//! let sections = StaticSections::from_json(&sections_json)?;
//! let output = ProfilePipeline::new().run(&ProfileInput {
//!     document: &document,
//!     display_name: "Alice Smith",
//!     sections: &sections,
//!     profile_id: None,
//! });
//! ```

pub mod config;
pub mod document;
pub mod email;
pub mod experience;
pub mod locator;
pub mod pipeline;
pub mod sanitizer;
pub mod validator;

// Re-export commonly used types
pub use config::{PipelineConfig, RoleOverride, ValidationLimits};
pub use document::ProfileDocument;
pub use email::{select_candidate, EmailDenylist, EmailResolution, EmailResolver};
pub use experience::{
    AggregateFilter, AggregateRule, DurationParser, ExperienceAggregator, ExperienceSummary,
};
pub use locator::{StaticSections, TextSectionLocator};
pub use pipeline::{ProfileInput, ProfilePipeline};
pub use sanitizer::{sanitize_text, TextSanitizer};
pub use validator::ProfileValidator;

// Re-export the locator trait from shared-types for convenience
pub use shared_types::SectionLocator;
