//! Object client abstraction.
//!
//! Discovery only needs four read operations from the remote service. The
//! trait keeps resolvers independent of the backend (fullnode JSON-RPC,
//! in-memory fixtures). Implementations report network errors verbatim and do
//! not retry; retry and pacing are applied by callers.

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use sui_kiosk_types::{Address, ObjectId};

use crate::records::{DynamicFieldEntry, RawObjectRecord};

/// Which optional blocks the remote should populate.
///
/// Callers request exactly the blocks they read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_type: bool,
    pub show_content: bool,
    pub show_display: bool,
    pub show_owner: bool,
}

impl ObjectDataOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self) -> Self {
        self.show_type = true;
        self
    }

    pub fn with_content(mut self) -> Self {
        self.show_content = true;
        self
    }

    pub fn with_display(mut self) -> Self {
        self.show_display = true;
        self
    }


    pub fn to_json(self) -> Value {
        json!({
            "showType": self.show_type,
            "showContent": self.show_content,
            "showDisplay": self.show_display,
            "showOwner": self.show_owner,
        })
    }
}

/// Server-side filter for owned-object queries.
///
/// Support varies between fullnode versions and providers; callers must be
/// ready for the query to be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectFilter {
    StructType(String),
}

impl ObjectFilter {
    pub fn to_json(&self) -> Value {
        match self {
            ObjectFilter::StructType(t) => json!({ "StructType": t }),
        }
    }
}

/// Filter and display options for `get_owned_objects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedObjectsQuery {
    pub filter: Option<ObjectFilter>,
    pub options: ObjectDataOptions,
}

impl OwnedObjectsQuery {
    pub fn new(options: ObjectDataOptions) -> Self {
        Self {
            filter: None,
            options,
        }
    }

    pub fn with_filter(mut self, filter: ObjectFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut query = json!({ "options": self.options.to_json() });
        if let Some(filter) = &self.filter {
            query["filter"] = filter.to_json();
        }
        query
    }
}

/// One page of a cursor-paginated response.
///
/// `next_cursor` is `None` on the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
        }
    }
}

/// Read access to the remote object graph.
#[async_trait::async_trait]
pub trait ObjectClient: Send + Sync {
    /// Endpoint this client is bound to. Fixed for the client's lifetime.
    fn endpoint(&self) -> &str;

    /// Fetch one object. A missing or deleted object is `Ok(None)`.
    async fn get_object(
        &self,
        id: &ObjectId,
        options: ObjectDataOptions,
    ) -> Result<Option<RawObjectRecord>>;

    /// Fetch several objects in one round trip. Missing objects are omitted.
    ///
    /// Callers must chunk to [`crate::MAX_MULTI_GET`].
    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
        options: ObjectDataOptions,
    ) -> Result<Vec<RawObjectRecord>>;

    /// One page of objects owned by `owner`.
    async fn get_owned_objects(
        &self,
        owner: &Address,
        query: &OwnedObjectsQuery,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<RawObjectRecord>>;

    /// One page of the dynamic-field index of `parent`.
    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<DynamicFieldEntry>>;
}
