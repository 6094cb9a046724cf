use serde::{Deserialize, Serialize};

use super::{RecordId, Resource};
use crate::text::plain_text;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<RecordId>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub grade: Option<i32>,
}

impl Student {
    pub fn address_text(&self) -> String {
        plain_text(self.address.as_deref().unwrap_or_default())
    }
}

impl Resource for Student {
    const COLLECTION: &'static str = "/students";
    const FILTERS: &'static [&'static str] = &[
        "studentName",
        "email",
        "phoneNumber",
        "address",
        "gradeMin",
        "gradeMax",
    ];

    fn id(&self) -> Option<&RecordId> {
        self.student_id.as_ref()
    }
}
