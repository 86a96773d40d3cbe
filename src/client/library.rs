use tracing::info;

use crate::dispatcher::{FilePart, RequestOptions};
use crate::errors::Error;
use crate::storage::ACCESS_TOKEN_KEY;
use crate::token;
use crate::types::{Book, BookMetadataUpdate, BookUploadResponse, LibraryResponse, MessageResponse};

use super::{BookshelfClient, read_json};

const ALLOWED_EXTENSIONS: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("epub", "application/epub+zip"),
];

impl BookshelfClient {
    pub async fn list_books(&self, user_id: i64) -> Result<Vec<Book>, Error> {
        let resp = self
            .dispatch(&format!("library/{user_id}"), RequestOptions::get())
            .await?;
        let library: LibraryResponse = read_json("list books", resp).await?;
        info!(user_id, count = library.books.len(), "library listed");
        Ok(library.books)
    }

    /// Lists the books of whoever the stored access token belongs to.
    pub async fn my_books(&self) -> Result<Vec<Book>, Error> {
        let access_token = self
            .dispatcher
            .store()
            .get(ACCESS_TOKEN_KEY)?
            .ok_or_else(|| Error::Auth("no access token".into()))?;
        let user_id = token::subject_of(Some(&access_token))
            .and_then(|sub| sub.parse::<i64>().ok())
            .ok_or_else(|| Error::Auth("access token carries no user id".into()))?;
        self.list_books(user_id).await
    }

    /// Uploads one `.pdf` or `.epub` file as multipart field `file`.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<BookUploadResponse, Error> {
        let mime = mime_for(file_name)?;
        let bytes = bytes.into();
        let size = bytes.len();
        let options = RequestOptions::post().file(FilePart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            bytes,
            mime: Some(mime.to_string()),
        });
        let resp = self.dispatch("upload", options).await?;
        let uploaded: BookUploadResponse = read_json("upload", resp).await?;
        info!(
            "upload ok: file='{}' bytes={} id='{}'",
            file_name, size, uploaded.book_data.id
        );
        Ok(uploaded)
    }

    /// Returns `None` when the server reports nothing to update.
    pub async fn edit_metadata(
        &self,
        book_id: &str,
        update: &BookMetadataUpdate,
    ) -> Result<Option<MessageResponse>, Error> {
        if update.is_empty() {
            return Err(Error::InvalidInput(
                "At least one field (title or author) must be provided".into(),
            ));
        }
        let endpoint = format!("edit/{}", urlencoding::encode(book_id));
        let resp = self
            .dispatch(&endpoint, RequestOptions::put().json(update)?)
            .await?;
        let edited = read_json("edit metadata", resp).await?;
        info!(book_id, "metadata edited");
        Ok(edited)
    }

    pub async fn delete_book(&self, book_id: &str) -> Result<MessageResponse, Error> {
        let endpoint = format!("delete/{}", urlencoding::encode(book_id));
        let resp = self.dispatch(&endpoint, RequestOptions::delete()).await?;
        let deleted = read_json("delete book", resp).await?;
        info!(book_id, "book deleted");
        Ok(deleted)
    }

    pub fn thumbnail_url(&self, book_id: &str) -> String {
        self.dispatcher
            .resolve(&format!("thumbnails/{}.jpg", urlencoding::encode(book_id)))
    }

    pub fn book_file_url(&self, book_id: &str) -> String {
        self.dispatcher
            .resolve(&format!("books/{}.pdf", urlencoding::encode(book_id)))
    }
}

fn mime_for(file_name: &str) -> Result<&'static str, Error> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    ALLOWED_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Unsupported file type for '{}': expected .pdf or .epub",
                file_name
            ))
        })
}
