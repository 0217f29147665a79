use std::path::PathBuf;

use rocket::fs::NamedFile;
use rocket::State;

use crate::config::Config;
use crate::util::contained_path;

pub async fn app_index_file(c: &State<Config>) -> Option<NamedFile> {
    let index = c.public_content.as_path().join("index.html");
    match NamedFile::open(&index).await {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!("unable to open '{}': {}", index.display(), e);
            None
        }
    }
}

#[get("/")]
pub async fn app(c: &State<Config>) -> Option<NamedFile> {
    app_index_file(c).await
}

/// Serves front-end assets. Unknown paths get the index page so client-side
/// routes resolve.
#[get("/<path..>", rank = 10)]
pub async fn app_path(path: PathBuf, c: &State<Config>) -> Option<NamedFile> {
    if let Some(file) = contained_path(&c.public_content, &path) {
        if let Ok(file) = NamedFile::open(file).await {
            return Some(file);
        }
    }
    app_index_file(c).await
}
