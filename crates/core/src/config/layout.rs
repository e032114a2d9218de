use std::path::{Path, PathBuf};

/// Logical layout of a client root on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct ClientLayout {
    /// Root directory of the client.
    pub root: PathBuf,
    /// Directory for internal metadata (.zcall).
    pub meta_dir: PathBuf,
    /// Path to the client config file (JSON).
    pub config_path: PathBuf,
    /// Path to the object store file.
    pub store_path: PathBuf,
}

impl ClientLayout {
    /// Compute the default layout for a client rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".zcall");
        let config_path = meta_dir.join("config.json");
        let store_path = meta_dir.join("objects.db");

        Self { root, meta_dir, config_path, store_path }
    }

    /// Store path string suitable for `ClientConfig`, relative to `root` when possible.
    pub fn store_path_relative_string(&self) -> String {
        match self.store_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.store_path.to_string_lossy().to_string(),
        }
    }
}
