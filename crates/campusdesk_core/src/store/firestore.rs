//! Firestore REST document store.
//!
//! # Responsibility
//! - Map the `DocumentStore` contract onto the Firestore v1 REST API.
//! - Translate HTTP status codes into semantic store errors.
//!
//! # Invariants
//! - One attempt per call: no retries, only client-level timeouts.
//! - Credentials are sent as `key` query parameter and/or bearer header and
//!   never logged.

use crate::config::{FirestoreConfig, HttpConfig};
use crate::store::firestore_value::{decode_fields, encode_fields, encode_value};
use crate::store::{
    Direction, Document, DocumentQuery, DocumentStore, Fields, StoreError, StoreResult,
};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Remote document store talking to Firestore over REST.
pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    bearer_token: Option<String>,
}

impl FirestoreStore {
    /// Builds a client for the configured project and database.
    pub fn new(config: &FirestoreConfig, http: &HttpConfig) -> StoreResult<Self> {
        let client = http.blocking_client()?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            client,
            documents_url: documents_url(base_url, &config.project_id, &config.database),
            api_key: non_empty(config.api_key.as_deref()),
            bearer_token: non_empty(config.bearer_token.as_deref()),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends one request, returning the raw response for 2xx and 404.
    fn send(&self, op: &str, builder: RequestBuilder) -> StoreResult<Response> {
        let started_at = Instant::now();
        let response = builder.send()?;
        let status = response.status();
        debug!(
            "event=firestore_call module=store op={op} status_code={} duration_ms={}",
            status.as_u16(),
            started_at.elapsed().as_millis()
        );

        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let body = response
            .text()
            .unwrap_or_else(|_| "failed to read error body".to_string());
        warn!(
            "event=firestore_call module=store op={op} status=error status_code={}",
            status.as_u16()
        );
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_url)
    }

    fn not_found(collection: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl DocumentStore for FirestoreStore {
    fn add(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        let url = format!("{}/{collection}", self.documents_url);
        let builder = self
            .request(Method::POST, &url)
            .json(&json!({ "fields": encode_fields(fields) }));
        let response = self.send("add", builder)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let created: Value = response.json()?;
        document_id_from_name(&created)
    }

    fn set(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let builder = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .json(&json!({ "fields": encode_fields(fields) }));
        let response = self.send("set", builder)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found(collection, id));
        }
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let mut builder = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .query(&[("currentDocument.exists", "true")]);
        for key in fields.keys() {
            builder = builder.query(&[("updateMask.fieldPaths", key.as_str())]);
        }
        let builder = builder.json(&json!({ "fields": encode_fields(fields) }));

        let response = self.send("update", builder)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found(collection, id));
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let builder = self.request(Method::DELETE, &self.document_url(collection, id));
        self.send("delete", builder)?;
        Ok(())
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let builder = self.request(Method::GET, &self.document_url(collection, id));
        let response = self.send("get", builder)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document: Value = response.json()?;
        parse_document(&document).map(Some)
    }

    fn query(&self, collection: &str, query: &DocumentQuery) -> StoreResult<Vec<Document>> {
        query.validate()?;
        let url = format!("{}:runQuery", self.documents_url);
        let builder = self
            .request(Method::POST, &url)
            .json(&json!({ "structuredQuery": structured_query(collection, query) }));
        let response = self.send("query", builder)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> = response.json()?;
        entries
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(parse_document)
            .collect()
    }
}

fn documents_url(base_url: &str, project_id: &str, database: &str) -> String {
    format!("{base_url}/projects/{project_id}/databases/{database}/documents")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Builds the `structuredQuery` payload for `:runQuery`.
pub(crate) fn structured_query(collection: &str, query: &DocumentQuery) -> Value {
    let mut structured = json!({ "from": [{ "collectionId": collection }] });

    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|filter| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": "EQUAL",
                    "value": encode_value(&filter.value)
                }
            })
        })
        .collect();

    match filters.len() {
        0 => {}
        1 => {
            structured["where"] = filters.into_iter().next().unwrap_or(Value::Null);
        }
        _ => {
            structured["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            });
        }
    }

    if let Some((field, direction)) = &query.order_by {
        let direction = match direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured["orderBy"] = json!([{ "field": { "fieldPath": field }, "direction": direction }]);
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }

    structured
}

/// Extracts the document id: the last segment of the resource `name`.
pub(crate) fn document_id_from_name(document: &Value) -> StoreResult<String> {
    document
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::Codec("document response is missing `name`".to_string()))
}

fn parse_document(document: &Value) -> StoreResult<Document> {
    Ok(Document {
        id: document_id_from_name(document)?,
        fields: decode_fields(document.get("fields"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::{document_id_from_name, documents_url, structured_query, FirestoreStore};
    use crate::config::FirestoreConfig;
    use crate::store::{Direction, DocumentQuery, DocumentStore, Fields, StoreError};
    use crate::test_support::{local_http, StubServer};
    use serde_json::{json, Value};

    fn remote_store(server: &StubServer) -> FirestoreStore {
        let config = FirestoreConfig {
            project_id: "campus-app".to_string(),
            api_key: Some("web-key".to_string()),
            bearer_token: Some("session-token".to_string()),
            base_url: Some(server.base_url().to_string()),
            ..FirestoreConfig::default()
        };
        FirestoreStore::new(&config, &local_http()).unwrap()
    }

    fn fields(value: Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn documents_url_targets_named_database() {
        assert_eq!(
            documents_url("https://firestore.googleapis.com/v1", "campus-app", "(default)"),
            "https://firestore.googleapis.com/v1/projects/campus-app/databases/(default)/documents"
        );
    }

    #[test]
    fn single_filter_query_uses_field_filter() {
        let query = DocumentQuery::new()
            .where_eq("isActive", true)
            .order_by("day", Direction::Ascending);
        let structured = structured_query("timetable", &query);

        assert_eq!(structured["from"][0]["collectionId"], "timetable");
        assert_eq!(
            structured["where"]["fieldFilter"]["field"]["fieldPath"],
            "isActive"
        );
        assert_eq!(
            structured["where"]["fieldFilter"]["value"],
            json!({ "booleanValue": true })
        );
        assert_eq!(structured["orderBy"][0]["direction"], "ASCENDING");
        assert!(structured.get("limit").is_none());
    }

    #[test]
    fn multiple_filters_compose_with_and() {
        let query = DocumentQuery::new()
            .where_eq("isActive", true)
            .where_eq("branch", "CSE")
            .limit(5);
        let structured = structured_query("timetable", &query);

        let composite = &structured["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"].as_array().unwrap().len(), 2);
        assert_eq!(structured["limit"], 5);
    }

    #[test]
    fn id_is_last_segment_of_resource_name() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/banners/Xy12Ab"
        });
        assert_eq!(document_id_from_name(&document).unwrap(), "Xy12Ab");
        assert!(document_id_from_name(&json!({})).is_err());
    }

    #[test]
    fn add_posts_encoded_fields_and_reads_generated_id() {
        let server = StubServer::serve(vec![(
            200,
            r#"{"name":"projects/campus-app/databases/(default)/documents/notices/N7x2","fields":{}}"#
                .to_string(),
        )]);
        let store = remote_store(&server);

        let id = store
            .add("notices", &fields(json!({ "title": "Exam schedule" })))
            .unwrap();
        assert_eq!(id, "N7x2");

        let requests = server.finish();
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert!(request.target.contains("/projects/campus-app/databases/"));
        assert!(request.target.contains("/documents/notices?"));
        assert!(request.target.contains("key=web-key"));
        assert_eq!(request.header("authorization"), Some("Bearer session-token"));

        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body["fields"]["title"],
            json!({ "stringValue": "Exam schedule" })
        );
    }

    #[test]
    fn get_decodes_document_and_maps_missing_to_none() {
        let server = StubServer::serve(vec![
            (
                200,
                r#"{"name":"projects/campus-app/databases/(default)/documents/faculty/f1","fields":{"name":{"stringValue":"Dr. Rao"},"isActive":{"booleanValue":true}}}"#
                    .to_string(),
            ),
            (404, r#"{"error":{"code":404,"status":"NOT_FOUND"}}"#.to_string()),
        ]);
        let store = remote_store(&server);

        let document = store.get("faculty", "f1").unwrap().unwrap();
        assert_eq!(document.id, "f1");
        assert_eq!(document.fields["name"], json!("Dr. Rao"));
        assert_eq!(document.fields["isActive"], json!(true));

        assert!(store.get("faculty", "missing").unwrap().is_none());

        let requests = server.finish();
        assert_eq!(requests[0].method, "GET");
        assert!(requests[1].target.contains("/documents/faculty/missing"));
    }

    #[test]
    fn update_requires_existing_document_and_masks_fields() {
        let server = StubServer::serve(vec![(
            404,
            r#"{"error":{"code":404,"status":"NOT_FOUND"}}"#.to_string(),
        )]);
        let store = remote_store(&server);

        let err = store
            .update("faculty", "ghost", &fields(json!({ "isActive": false })))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref id, .. } if id == "ghost"));

        let requests = server.finish();
        let request = &requests[0];
        assert_eq!(request.method, "PATCH");
        assert!(request.target.contains("currentDocument.exists=true"));
        assert!(request.target.contains("updateMask.fieldPaths=isActive"));
    }

    #[test]
    fn server_error_surfaces_status_and_body() {
        let server = StubServer::serve(vec![(
            500,
            r#"{"error":{"message":"backend unavailable"}}"#.to_string(),
        )]);
        let store = remote_store(&server);

        let err = store
            .set("banners", "b1", &fields(json!({ "title": "Open day" })))
            .unwrap_err();
        server.finish();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("backend unavailable"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_query_skips_entries_without_document() {
        let server = StubServer::serve(vec![(
            200,
            r#"[
                {"document":{"name":"projects/campus-app/databases/(default)/documents/timetable/t1","fields":{"day":{"stringValue":"Monday"}}},"readTime":"2024-01-01T00:00:00Z"},
                {"readTime":"2024-01-01T00:00:00Z"}
            ]"#
            .to_string(),
        )]);
        let store = remote_store(&server);

        let query = DocumentQuery::new().where_eq("branch", "CSE");
        let documents = store.query("timetable", &query).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "t1");
        assert_eq!(documents[0].fields["day"], json!("Monday"));

        let requests = server.finish();
        assert!(requests[0].target.contains("/documents:runQuery"));
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body["structuredQuery"]["from"][0]["collectionId"],
            "timetable"
        );
    }
}
