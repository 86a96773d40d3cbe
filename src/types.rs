use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub file_type: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct LibraryResponse {
    pub books: Vec<Book>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BookUploadResponse {
    #[serde(rename = "bookData")]
    pub book_data: Book,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Partial metadata edit; unset fields are left alone by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BookMetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BookMetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

/// Who the stored access token says is logged in. For display only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// The API reports failures as `{"detail": ...}`; fall back to the raw body.
pub(crate) fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}
