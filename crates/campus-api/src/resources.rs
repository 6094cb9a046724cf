//! CRUD over the REST collections.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use campus_core::errors::ApiError;
use campus_core::models::{Pagination, Submission};
use campus_core::traits::Transport;
use campus_transport::{ApiResponse, HttpClient};

use crate::models::{Course, RecordId, Resource, Student};
use crate::query::ListQuery;

/// One page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub pagination: Option<Pagination>,
}

impl<R> Page<R> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct ResourceApi<T: Transport> {
    http: Arc<HttpClient<T>>,
}

impl<T: Transport> ResourceApi<T> {
    pub fn new(http: Arc<HttpClient<T>>) -> Self {
        Self { http }
    }

    /// List a collection. A 404 means "no matches" and yields an empty page.
    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        let path = query.restricted_to(R::FILTERS).path_for(R::COLLECTION);
        match self.http.get(&path).await {
            Ok(response) => {
                let envelope = response.envelope::<Option<Vec<R>>>()?;
                Ok(Page {
                    items: envelope.data.unwrap_or_default(),
                    pagination: envelope.pagination,
                })
            }
            Err(ApiError::NotFound { .. }) => {
                debug!(collection = R::COLLECTION, "no matches");
                Ok(Page::empty())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get<R: Resource>(&self, id: &RecordId) -> Result<R, ApiError> {
        data(&self.http.get(&R::item_path(id)).await?)
    }

    /// Create a record. Field errors come back as `Rejected`.
    pub async fn create<R: Resource>(&self, record: &R) -> Result<Submission<R>, ApiError> {
        let body = to_body(R::COLLECTION, record)?;
        submission(self.http.post(R::COLLECTION, body).await)
    }

    /// Replace a record by id. Field errors come back as `Rejected`.
    pub async fn update<R: Resource>(&self, id: &RecordId, record: &R) -> Result<Submission<R>, ApiError> {
        let path = R::item_path(id);
        let body = to_body(&path, record)?;
        submission(self.http.put(&path, body).await)
    }

    pub async fn delete<R: Resource>(&self, id: &RecordId) -> Result<(), ApiError> {
        self.http.delete(&R::item_path(id)).await.map(|_| ())
    }

    /// Students enrolled in a course. None enrolled (404) is an empty list.
    pub async fn students_in_course(&self, course_id: &RecordId) -> Result<Vec<Student>, ApiError> {
        let path = format!("{}/students", Course::item_path(course_id));
        match self.http.get(&path).await {
            Ok(response) => Ok(response
                .envelope::<Option<Vec<Student>>>()?
                .data
                .unwrap_or_default()),
            Err(ApiError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

fn data<R: DeserializeOwned>(response: &ApiResponse) -> Result<R, ApiError> {
    Ok(response.envelope::<R>()?.data)
}

fn submission<R: DeserializeOwned>(
    result: Result<ApiResponse, ApiError>,
) -> Result<Submission<R>, ApiError> {
    match result {
        Ok(response) => Ok(Submission::Saved(data(&response)?)),
        Err(ApiError::Validation(errors)) => Ok(Submission::Rejected(errors)),
        Err(e) => Err(e),
    }
}

fn to_body<R: Resource>(path: &str, record: &R) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(record).map_err(|e| ApiError::MalformedResponse {
        path: path.to_string(),
        reason: format!("record did not serialize: {e}"),
    })
}
