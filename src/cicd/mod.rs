//! CI integration: snapshot artifacts and report publishing
//!
//! - [`snapshot`]: the JSON snapshots uploaded after every run
//! - [`store`]: where snapshots are fetched from and uploaded to
//! - [`publish`]: comment and issue upserts

pub mod publish;
pub mod snapshot;
pub mod store;

pub use publish::{
    publish_comment, publish_issue, CommentStrategy, LocalPublisher, MatchKey, PublishOutcome,
    ReportPublisher, ReportTarget,
};
pub use snapshot::{artifact_name, ArtifactFile, BundleSnapshot, ARTIFACT_NAME_PREFIX};
pub use store::{ArtifactStore, LocalArtifactStore};
