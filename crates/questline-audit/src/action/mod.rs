//! Audit actions and reviewer overrides.
//!
//! - [`engine::suggest_action`]: deviation tier to remediation step
//! - [`overrides::OverrideTrail`]: append-only reviewer decisions per submission
//! - [`artifact`]: digest-sealed export of the trail

pub mod artifact;
pub mod engine;
pub mod overrides;

pub use artifact::{read_override_artifact, write_override_artifact, OverrideTrailArtifact};
pub use engine::suggest_action;
pub use overrides::{OverrideLogEntry, OverrideTrail};
