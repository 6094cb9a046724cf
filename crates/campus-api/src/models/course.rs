use serde::{Deserialize, Serialize};

use super::{RecordId, Resource};
use crate::text::plain_text;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<RecordId>,
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub credit: Option<u32>,
    pub instructor: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub schedule: Option<String>,
}

impl Course {
    /// Description, escaped for display.
    pub fn description_text(&self) -> String {
        plain_text(self.description.as_deref().unwrap_or_default())
    }

    /// Schedule, escaped for display.
    pub fn schedule_text(&self) -> String {
        plain_text(self.schedule.as_deref().unwrap_or_default())
    }
}

impl Resource for Course {
    const COLLECTION: &'static str = "/courses";
    const FILTERS: &'static [&'static str] = &[
        "courseId",
        "courseName",
        "instructor",
        "department",
        "creditMin",
        "creditMax",
        "schedule",
    ];

    fn id(&self) -> Option<&RecordId> {
        self.course_id.as_ref()
    }
}
