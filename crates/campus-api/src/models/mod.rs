//! Wire models for the three resources.
//!
//! Everything except the id is optional on the wire; the server decides
//! which fields are required and reports violations as field errors.

pub mod course;
pub mod enrollment;
pub mod id;
pub mod student;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use course::Course;
pub use enrollment::Enrollment;
pub use id::RecordId;
pub use student::Student;

/// A REST collection the resource API can list and edit.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path, e.g. `/courses`.
    const COLLECTION: &'static str;
    /// Query-string filter keys the collection understands.
    const FILTERS: &'static [&'static str];

    fn id(&self) -> Option<&RecordId>;

    fn item_path(id: &RecordId) -> String {
        format!("{}/{}", Self::COLLECTION, id.path_segment())
    }
}
