//! Book record and its partial-update form.

use serde::{Deserialize, Serialize};

/// A stored book. Field order matches the `books` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Fields to overwrite on an existing book. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BookPatch {
    /// True when the patch changes nothing. `isbn` is a key, not a change.
    pub fn is_empty(&self) -> bool {
        self.amazon_url.is_none()
            && self.author.is_none()
            && self.language.is_none()
            && self.pages.is_none()
            && self.publisher.is_none()
            && self.title.is_none()
            && self.year.is_none()
    }
}

impl Book {
    /// Overwrite the fields present in `patch`. The isbn never changes.
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(v) = &patch.amazon_url {
            self.amazon_url = v.clone();
        }
        if let Some(v) = &patch.author {
            self.author = v.clone();
        }
        if let Some(v) = &patch.language {
            self.language = v.clone();
        }
        if let Some(v) = patch.pages {
            self.pages = v;
        }
        if let Some(v) = &patch.publisher {
            self.publisher = v.clone();
        }
        if let Some(v) = &patch.title {
            self.title = v.clone();
        }
        if let Some(v) = patch.year {
            self.year = v;
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_book() -> Book {
    Book {
        isbn: "0000000000000".into(),
        amazon_url: "http://example.com".into(),
        author: "Test Author".into(),
        language: "English".into(),
        pages: 100,
        publisher: "Test Publisher".into(),
        title: "Test Book".into(),
        year: 2023,
    }
}
