//! Per-user local copy of the profile picture.

use crate::models::ProfileImage;
use crate::storage::{KeyValueStore, StorageResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::Arc;

/// Profile pictures cached as data URLs, keyed by username
#[derive(Clone)]
pub struct LocalImageCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalImageCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key for a user's cached picture
    pub fn key_for(username: &str) -> String {
        let username = if username.is_empty() {
            "unknown"
        } else {
            username
        };
        format!("local_profile_{}", username)
    }

    /// Cached picture as a data URL
    pub fn load(&self, username: &str) -> Option<String> {
        self.store.get(&Self::key_for(username))
    }

    /// Cache a picture, replacing any previous one
    pub fn save(&self, username: &str, image: &ProfileImage) -> StorageResult<String> {
        let url = data_url(&image.mime_type, &image.bytes);
        self.store.set(&Self::key_for(username), &url)?;
        Ok(url)
    }

    pub fn remove(&self, username: &str) -> StorageResult<()> {
        self.store.remove(&Self::key_for(username))
    }
}

/// Encode bytes as a `data:` URL
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_key_for() {
        assert_eq!(LocalImageCache::key_for("alice"), "local_profile_alice");
        assert_eq!(LocalImageCache::key_for(""), "local_profile_unknown");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_save_load_remove_per_user() {
        let cache = LocalImageCache::new(Arc::new(MemoryStore::new()));
        let image = ProfileImage::from_file_name("a.png", b"hi".to_vec());

        let url = cache.save("alice", &image).unwrap();
        assert_eq!(cache.load("alice"), Some(url));
        assert!(cache.load("bob").is_none());

        cache.remove("alice").unwrap();
        assert!(cache.load("alice").is_none());
    }
}
