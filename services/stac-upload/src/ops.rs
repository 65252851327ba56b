//! The uploader's operations.
//!
//! Each prints the raw response body. Batch operations stop at the first
//! response that is not a success and report `false`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{document_str, Reply, StacClient};

pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn report(what: &str, reply: &Reply) -> bool {
    println!("{}", reply.body);
    if reply.is_success() {
        info!(status = reply.status.as_u16(), "{} succeeded", what);
    } else {
        warn!(status = reply.status.as_u16(), "{} failed", what);
    }
    reply.is_success()
}

pub async fn list_collections(client: &StacClient) -> Result<bool> {
    let reply = client.list_collections().await?;
    Ok(report("List collections", &reply))
}

pub async fn get_collection(client: &StacClient, id: &str) -> Result<bool> {
    let reply = client.get_collection(id).await?;
    Ok(report("Get collection", &reply))
}

pub async fn add_collection(client: &StacClient, path: &Path) -> Result<bool> {
    let collection = read_document(path)?;
    let reply = client.add_collection(&collection).await?;
    Ok(report("Add collection", &reply))
}

pub async fn modify_collection(client: &StacClient, path: &Path) -> Result<bool> {
    let collection = read_document(path)?;
    let reply = client.modify_collection(&collection).await?;
    Ok(report("Modify collection", &reply))
}

pub async fn remove_collection(client: &StacClient, path: &Path) -> Result<bool> {
    let collection = read_document(path)?;
    let reply = client.remove_collection(document_str(&collection, "id")?).await?;
    Ok(report("Remove collection", &reply))
}

/// Number of features in the collection's item listing, `None` on failure.
pub async fn count_items(client: &StacClient, collection_id: &str) -> Result<Option<usize>> {
    let reply = client.get_items(collection_id).await?;
    if !reply.is_success() {
        report("Get items", &reply);
        return Ok(None);
    }

    let listing: Value = serde_json::from_str(&reply.body).context("Item listing is not JSON")?;
    let count = listing
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::len)
        .context("Item listing has no 'features' array")?;
    Ok(Some(count))
}

pub async fn add_items(client: &StacClient, paths: &[PathBuf]) -> Result<bool> {
    for path in paths {
        let item = read_document(path)?;
        let reply = client.add_item(&item).await?;
        if !report(&format!("Add item {}", path.display()), &reply) {
            return Ok(false);
        }
    }
    Ok(true)
}

pub async fn remove_items(client: &StacClient, paths: &[PathBuf]) -> Result<bool> {
    for path in paths {
        let item = read_document(path)?;
        let reply = client.remove_item(&item).await?;
        if !report(&format!("Remove item {}", path.display()), &reply) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Auth, Credentials};
    use crate::client::http_client;
    use axum::extract::{Path as UrlPath, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        auth: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn record(&self, call: String, headers: &HeaderMap) {
            self.calls.lock().unwrap().push(call);
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            self.auth.lock().unwrap().push(auth);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn add_item(
        State(rec): State<Recorder>,
        UrlPath(collection): UrlPath<String>,
        headers: HeaderMap,
        Json(item): Json<Value>,
    ) -> StatusCode {
        let id = item["id"].as_str().unwrap_or_default().to_string();
        rec.record(format!("POST {}/{}", collection, id), &headers);
        if id == "duplicate" {
            StatusCode::CONFLICT
        } else {
            StatusCode::CREATED
        }
    }

    async fn remove_item(
        State(rec): State<Recorder>,
        UrlPath((collection, id)): UrlPath<(String, String)>,
        headers: HeaderMap,
    ) -> StatusCode {
        rec.record(format!("DELETE {}/{}", collection, id), &headers);
        StatusCode::OK
    }

    async fn list_items(State(rec): State<Recorder>, UrlPath(collection): UrlPath<String>, headers: HeaderMap) -> Json<Value> {
        rec.record(format!("GET {}", collection), &headers);
        Json(json!({"type": "FeatureCollection", "features": [{"id": "a"}, {"id": "b"}]}))
    }

    async fn token() -> Json<Value> {
        Json(json!({"access_token": "t0ken", "token_type": "bearer"}))
    }

    async fn spawn(rec: Recorder) -> String {
        let router = Router::new()
            .route("/api/collections/:collection/items", post(add_item).get(list_items))
            .route("/api/collections/:collection/items/:id", delete(remove_item))
            .route("/token", post(token))
            .with_state(rec);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn write_items(dir: &Path, ids: &[&str]) -> Vec<PathBuf> {
        ids.iter()
            .map(|id| {
                let path = dir.join(format!("{}.geojson", id));
                let item = json!({"type": "Feature", "id": id, "collection": "sst"});
                std::fs::write(&path, item.to_string()).unwrap();
                path
            })
            .collect()
    }

    fn basic_client(root: &str) -> StacClient {
        let auth = Auth::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        StacClient::new(http_client().unwrap(), &format!("{}/api/", root), auth).unwrap()
    }

    #[tokio::test]
    async fn test_add_items_stops_on_first_failure() {
        let rec = Recorder::default();
        let root = spawn(rec.clone()).await;
        let dir = tempfile::tempdir().unwrap();
        let paths = write_items(dir.path(), &["a", "duplicate", "b"]);

        let ok = add_items(&basic_client(&root), &paths).await.unwrap();
        assert!(!ok);
        assert_eq!(rec.calls(), vec!["POST sst/a", "POST sst/duplicate"]);
        assert!(rec.auth.lock().unwrap()[0].starts_with("Basic "));
    }

    #[tokio::test]
    async fn test_remove_items_deletes_by_id() {
        let rec = Recorder::default();
        let root = spawn(rec.clone()).await;
        let dir = tempfile::tempdir().unwrap();
        let paths = write_items(dir.path(), &["a", "b"]);

        assert!(remove_items(&basic_client(&root), &paths).await.unwrap());
        assert_eq!(rec.calls(), vec!["DELETE sst/a", "DELETE sst/b"]);
    }

    #[tokio::test]
    async fn test_count_items_with_bearer_token() {
        let rec = Recorder::default();
        let root = spawn(rec.clone()).await;

        let http = http_client().unwrap();
        let creds = Credentials::select(None, None, Some(&format!("{}/token", root)), Some("id"), Some("secret")).unwrap();
        let auth = creds.authorize(&http).await.unwrap();
        let client = StacClient::new(http, &format!("{}/api/", root), auth).unwrap();

        assert_eq!(count_items(&client, "sst").await.unwrap(), Some(2));
        assert_eq!(rec.auth.lock().unwrap()[0], "Bearer t0ken");
    }

    #[tokio::test]
    async fn test_failed_request_is_not_an_error() {
        let rec = Recorder::default();
        let root = spawn(rec).await;

        let ok = get_collection(&basic_client(&root), "unknown").await.unwrap();
        assert!(!ok);
    }
}
