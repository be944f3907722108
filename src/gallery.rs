//! The reference gallery of dermatoscopic images served by the backend.

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;

use crate::backend::DermaBackend;
use crate::error::DermaError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    /// The image's filename
    pub id: String,
    /// Filename up to its first `.`
    pub title: String,
    pub description: String,
    pub url: String,
}

impl GalleryEntry {
    fn new(name: &str, url: String) -> Self {
        let title = name.split('.').next().unwrap_or(name).to_string();
        Self {
            id: name.to_string(),
            title,
            description: format!("Descripción de {name}"),
            url,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub description: String,
    pub entries: Vec<GalleryEntry>,
}

/// List the gallery images, then fetch the gallery's description.
pub async fn load_gallery<B: DermaBackend>(backend: &B) -> Result<Gallery, DermaError> {
    let names = backend.list_gallery_images().await?;
    let description = backend.gallery_description().await?;
    let entries = names
        .iter()
        .map(|name| GalleryEntry::new(name, backend.gallery_image_url(name)))
        .collect();
    tracing::info!(count = names.len(), "gallery loaded");
    Ok(Gallery {
        description,
        entries,
    })
}

/// Fetch several gallery images, at most `concurrency` at a time.
///
/// The result is in the same order as `names`.
pub async fn download_images<B: DermaBackend + Sync>(
    backend: &B,
    names: &[String],
    concurrency: usize,
) -> Result<Vec<(String, Bytes)>, DermaError> {
    stream::iter(names)
        .map(|name| async move {
            let bytes = backend.fetch_gallery_image(name).await?;
            tracing::debug!(name = name.as_str(), size = bytes.len(), "gallery image fetched");
            Ok::<_, DermaError>((name.clone(), bytes))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
