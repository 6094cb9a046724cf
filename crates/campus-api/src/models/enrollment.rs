use serde::{Deserialize, Serialize};

use super::{RecordId, Resource};

/// A student's enrollment in a course. The name fields are filled in by the
/// server on reads and ignored on writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrollment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<RecordId>,
    pub course_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    pub student_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

impl Enrollment {
    pub fn new(student_id: impl Into<RecordId>, course_id: impl Into<RecordId>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            course_id: Some(course_id.into()),
            ..Self::default()
        }
    }
}

impl Resource for Enrollment {
    const COLLECTION: &'static str = "/enrollments";
    const FILTERS: &'static [&'static str] = &["courseId", "studentId"];

    fn id(&self) -> Option<&RecordId> {
        self.enrollment_id.as_ref()
    }
}
