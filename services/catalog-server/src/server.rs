//! Static file server for a generated catalog tree.
//!
//! Every response carries permissive CORS headers and cache-busting headers
//! so an online STAC browser always sees the latest files.

use std::path::{Path, PathBuf};

use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use walkdir::WalkDir;

/// Folder below the root that the converter writes into by convention.
pub const CATALOG_DIR: &str = "stac-generated";

const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

fn always(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Router serving `root` as static files.
pub fn create_router(root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(cors)
        .layer(always(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(always(header::ACCESS_CONTROL_ALLOW_METHODS, "*"))
        .layer(always(header::ACCESS_CONTROL_ALLOW_HEADERS, "*"))
        .layer(always(header::CACHE_CONTROL, NO_CACHE))
}

/// URLs of every `.geojson` file under `<root>/stac-generated`, sorted.
pub fn catalog_urls(root: &Path, host: &str, port: u16) -> Vec<String> {
    let mut files: Vec<PathBuf> = WalkDir::new(root.join(CATALOG_DIR))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "geojson"))
        .collect();
    files.sort();

    files
        .iter()
        .filter_map(|path| path.strip_prefix(root).ok())
        .map(|rel| {
            let segments: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            format!("http://{}:{}/{}", host, port, segments.join("/"))
        })
        .collect()
}

/// Serve until the process is stopped.
pub async fn run_server(root: PathBuf, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(&root);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    info!(host = %host, port = port, root = %root.display(), "Serving catalog");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let items = root.path().join(CATALOG_DIR).join("sst-items/2022/01");
        std::fs::create_dir_all(&items).unwrap();
        std::fs::write(root.path().join(CATALOG_DIR).join("sst-collection.geojson"), "{}").unwrap();
        std::fs::write(items.join("a.geojson"), r#"{"id":"a"}"#).unwrap();
        std::fs::write(items.join("a-kerchunk.json"), "{}").unwrap();
        root
    }

    #[test]
    fn test_catalog_urls() {
        let root = catalog();
        let urls = catalog_urls(root.path(), "localhost", 9002);
        assert_eq!(
            urls,
            vec![
                "http://localhost:9002/stac-generated/sst-collection.geojson",
                "http://localhost:9002/stac-generated/sst-items/2022/01/a.geojson",
            ]
        );
    }

    #[test]
    fn test_catalog_urls_without_catalog_dir() {
        let root = tempfile::tempdir().unwrap();
        assert!(catalog_urls(root.path(), "localhost", 9002).is_empty());
    }

    #[tokio::test]
    async fn test_serves_files_with_headers() {
        let root = catalog();
        let app = create_router(root.path());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = format!("http://{}/{}/sst-items/2022/01/a.geojson", addr, CATALOG_DIR);
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "*");
        assert_eq!(headers["access-control-allow-headers"], "*");
        assert_eq!(headers["cache-control"], NO_CACHE);
        assert_eq!(response.text().await.unwrap(), r#"{"id":"a"}"#);

        let missing = reqwest::get(format!("http://{}/nothing.json", addr)).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
