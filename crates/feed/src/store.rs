//! 피드 저장소 — 내려받은 피드의 로컬 캐시 디렉터리
//!
//! 피드 하나당 압축을 푼 JSON(`nvdcve-1.0-{feed}.json`)과 서버 메타
//! (`nvdcve-1.0-{feed}.meta`) 두 파일을 평평한 디렉터리에 보관합니다.
//! 캐시 신선도 판정에 쓰는 SHA-256 해시 유틸리티도 여기 있습니다.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::FeedFetchError;
use crate::id::FeedId;

/// 파일 해시 버퍼 크기
const HASH_CHUNK_SIZE: usize = 8192;

/// 피드 캐시 디렉터리 핸들
#[derive(Debug, Clone)]
pub struct FeedStore {
    root: PathBuf,
}

impl FeedStore {
    /// `root` 디렉터리를 캐시 루트로 사용하는 저장소를 만듭니다.
    /// 디렉터리는 [`ensure_dir`](Self::ensure_dir) 호출 전까지 생성되지 않습니다.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FeedStore { root: root.into() }
    }

    /// 캐시 루트 경로
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 캐시 루트 디렉터리를 (중간 경로 포함) 생성합니다.
    pub async fn ensure_dir(&self) -> Result<(), FeedFetchError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| self.store_error(&self.root, source))
    }

    /// 압축 해제된 피드 JSON 경로
    pub fn data_path(&self, feed: FeedId) -> PathBuf {
        self.root.join(feed.data_filename())
    }

    /// 피드 메타 파일 경로
    pub fn meta_path(&self, feed: FeedId) -> PathBuf {
        self.root.join(feed.meta_filename())
    }

    /// 캐시된 피드 JSON의 SHA-256을 계산합니다. 파일이 없으면 `None`.
    pub async fn cached_digest(&self, feed: FeedId) -> Result<Option<String>, FeedFetchError> {
        let path = self.data_path(feed);
        let hashed = tokio::task::spawn_blocking(move || hash_file(&path))
            .await
            .map_err(|e| FeedFetchError::Task {
                feed,
                reason: format!("spawn_blocking failed: {e}"),
            })?;

        match hashed {
            Ok(digest) => Ok(Some(digest)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.store_error(&self.data_path(feed), source)),
        }
    }

    /// 압축 해제된 피드 JSON을 기록합니다.
    pub async fn write_data(&self, feed: FeedId, bytes: &[u8]) -> Result<(), FeedFetchError> {
        let path = self.data_path(feed);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| self.store_error(&path, source))
    }

    /// 서버에서 받은 `.meta` 본문을 그대로 기록합니다.
    pub async fn write_meta(&self, feed: FeedId, text: &str) -> Result<(), FeedFetchError> {
        let path = self.meta_path(feed);
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| self.store_error(&path, source))
    }

    /// 캐시된 피드 JSON을 읽어옵니다.
    pub async fn read_data(&self, feed: FeedId) -> Result<Vec<u8>, FeedFetchError> {
        let path = self.data_path(feed);
        tokio::fs::read(&path)
            .await
            .map_err(|source| self.store_error(&path, source))
    }

    /// 캐시에 들어 있는 피드 목록 (연도 오름차순, 증분 피드는 뒤)
    pub async fn cached_feeds(&self) -> Result<Vec<FeedId>, FeedFetchError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|source| self.store_error(&self.root, source))?;

        let mut feeds = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| self.store_error(&self.root, source))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name
                .strip_prefix("nvdcve-1.0-")
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            if let Ok(feed) = stem.parse::<FeedId>() {
                feeds.push(feed);
            }
        }

        feeds.sort_by_key(|feed| sort_key(*feed));
        Ok(feeds)
    }

    fn store_error(&self, path: &Path, source: io::Error) -> FeedFetchError {
        FeedFetchError::StoreIo {
            path: path.display().to_string(),
            source,
        }
    }
}

fn sort_key(feed: FeedId) -> (u8, u16) {
    match feed {
        FeedId::Year(year) => (0, year),
        FeedId::Recent => (1, 0),
        FeedId::Modified => (2, 0),
    }
}

/// 바이트 슬라이스의 SHA-256 다이제스트 (소문자 16진수)
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    to_hex(&hasher.finalize())
}

/// 파일 내용의 SHA-256 다이제스트 (소문자 16진수). 블로킹 호출.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn hash_bytes_matches_known_vectors() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_file_matches_hash_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, b"{\"CVE_Items\":[]}").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            hash_bytes(b"{\"CVE_Items\":[]}")
        );
    }

    #[test]
    fn paths_follow_feed_filenames() {
        let store = FeedStore::new("/var/cache/nvdex");
        assert_eq!(
            store.data_path(FeedId::Year(2019)),
            PathBuf::from("/var/cache/nvdex/nvdcve-1.0-2019.json")
        );
        assert_eq!(
            store.meta_path(FeedId::Recent),
            PathBuf::from("/var/cache/nvdex/nvdcve-1.0-recent.meta")
        );
    }

    #[tokio::test]
    async fn write_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = FeedStore::new(dir.path());
        store.ensure_dir().await.unwrap();

        store
            .write_data(FeedId::Year(2020), b"{\"CVE_Items\":[]}")
            .await
            .unwrap();
        let bytes = store.read_data(FeedId::Year(2020)).await.unwrap();
        assert_eq!(bytes, b"{\"CVE_Items\":[]}");
    }

    #[tokio::test]
    async fn cached_digest_is_none_for_missing_feed() {
        let dir = tempdir().unwrap();
        let store = FeedStore::new(dir.path());
        store.ensure_dir().await.unwrap();

        assert_eq!(store.cached_digest(FeedId::Year(2002)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn cached_digest_matches_written_content() {
        let dir = tempdir().unwrap();
        let store = FeedStore::new(dir.path());
        store.ensure_dir().await.unwrap();

        store.write_data(FeedId::Modified, b"payload").await.unwrap();
        assert_eq!(
            store.cached_digest(FeedId::Modified).await.unwrap(),
            Some(hash_bytes(b"payload"))
        );
    }

    #[tokio::test]
    async fn cached_feeds_lists_json_files_in_order() {
        let dir = tempdir().unwrap();
        let store = FeedStore::new(dir.path());
        store.ensure_dir().await.unwrap();

        store.write_data(FeedId::Modified, b"{}").await.unwrap();
        store.write_data(FeedId::Year(2005), b"{}").await.unwrap();
        store.write_data(FeedId::Year(2003), b"{}").await.unwrap();
        store.write_meta(FeedId::Year(2003), "sha256:aa").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        assert_eq!(
            store.cached_feeds().await.unwrap(),
            vec![FeedId::Year(2003), FeedId::Year(2005), FeedId::Modified]
        );
    }

    #[tokio::test]
    async fn ensure_dir_creates_nested_root() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FeedStore::new(&nested);

        store.ensure_dir().await.unwrap();
        assert!(nested.is_dir());
    }
}
