//! # campus-api
//!
//! What page collaborators call: typed CRUD over courses, students and
//! enrollments, query-string list filters, stale-response sequencing,
//! transient notices, and [`CampusClient`], which wires storage, session,
//! and transport together.

pub mod client;
pub mod models;
pub mod notices;
pub mod query;
pub mod resources;
pub mod sequencer;
pub mod text;

pub use client::CampusClient;
pub use models::{Course, Enrollment, RecordId, Resource, Student};
pub use notices::{Notice, NoticeBoard, NoticeKind};
pub use query::{ListQuery, SortOrder};
pub use resources::{Page, ResourceApi};
pub use sequencer::{LatestWins, Ticket, ViewSequencer};
pub use text::plain_text;
