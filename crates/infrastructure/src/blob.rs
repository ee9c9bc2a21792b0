//! 文件系统对象存储
//!
//! 把上传的字节写到本地目录，返回按配置前缀拼出的公开URL。
//! 由外部的静态文件服务负责实际对外提供访问。

use std::path::PathBuf;

use application::{BlobStore, UploadError};
use async_trait::async_trait;
use tracing::debug;

pub struct FsBlobStore {
    root_dir: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let mut public_base_url = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Self {
            root_dir: root_dir.into(),
            public_base_url,
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, UploadError> {
        // 文件名只保留安全字符，防止路径穿越
        let name: String = suggested_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect();
        if name.is_empty() || name.chars().all(|c| c == '.') {
            return Err(UploadError::failed("无效的文件名"));
        }

        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|err| UploadError::failed(err.to_string()))?;

        let path = self.root_dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| UploadError::failed(err.to_string()))?;

        debug!(path = %path.display(), "对象已写入");
        Ok(format!("{}/{}", self.public_base_url, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080/blobs/");

        let url = store
            .put(b"image-bytes".to_vec(), "u1-1700000000.png")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/blobs/u1-1700000000.png");
        let written = tokio::fs::read(dir.path().join("u1-1700000000.png"))
            .await
            .unwrap();
        assert_eq!(written, b"image-bytes");
    }

    #[tokio::test]
    async fn test_put_strips_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080/blobs");

        let url = store.put(b"x".to_vec(), "../../etc/passwd").await.unwrap();
        assert_eq!(url, "http://localhost:8080/blobs/....etcpasswd");
        assert!(dir.path().join("....etcpasswd").exists());
    }
}
