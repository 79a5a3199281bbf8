use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use system::uuid::Uuid;
use system::{serde_json, CanvasId, Element, UserId};
use tokio::fs;

const CANVAS_FILE_EXT: &str = "canvas";

/// Persisted form of a canvas: metadata plus the last explicitly saved
/// element snapshot. The snapshot may lag the live room; it is only a
/// point-in-time export of whatever the saving client held.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasFile {
    pub title: String,
    pub owner: UserId,
    pub shared_with: Vec<UserId>,
    pub elements: Vec<Element>,
}

impl CanvasFile {
    pub fn new(title: String, owner: UserId) -> Self {
        Self {
            title,
            owner,
            shared_with: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn can_access(&self, user: &UserId) -> bool {
        self.owner == *user || self.shared_with.contains(user)
    }
}

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    AccessDenied,
    Invalid(&'static str),
    Corrupt,
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "canvas not found"),
            StoreError::AccessDenied => write!(f, "canvas not accessible by this user"),
            StoreError::Invalid(reason) => write!(f, "{}", reason),
            StoreError::Corrupt => write!(f, "canvas file is corrupt"),
            StoreError::Io(err) => write!(f, "canvas store io error: {}", err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound
        } else {
            StoreError::Io(err)
        }
    }
}

/// File-backed canvas store, one JSON file per canvas under `dir`. A save
/// is a whole-file overwrite: concurrent savers race and the last write
/// wins, which is the contract for explicit snapshots. The realtime path
/// never waits on this store.
#[derive(Clone)]
pub struct CanvasStore {
    dir: PathBuf,
}

impl CanvasStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_path(&self, canvas_id: &CanvasId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", canvas_id, CANVAS_FILE_EXT))
    }

    pub async fn create(&self, title: &str, owner: &UserId) -> Result<CanvasId, StoreError> {
        let canvas_id = Uuid::new_v4();
        let canvas = CanvasFile::new(title.to_owned(), owner.clone());
        self.write(&canvas_id, &canvas).await?;
        log::info!("created canvas {} owned by {}", canvas_id, owner);
        Ok(canvas_id)
    }

    pub async fn read(&self, canvas_id: &CanvasId) -> Result<CanvasFile, StoreError> {
        let bytes = fs::read(self.file_path(canvas_id)).await?;
        serde_json::from_slice(&bytes).map_err(|_| StoreError::Corrupt)
    }

    /// Committed-element seed for a freshly created room. No access check:
    /// realtime events come from sessions the surrounding layers already
    /// authenticated.
    pub async fn read_elements(&self, canvas_id: &CanvasId) -> Result<Vec<Element>, StoreError> {
        self.read(canvas_id).await.map(|canvas| canvas.elements)
    }

    pub async fn load(
        &self,
        canvas_id: &CanvasId,
        user: &UserId,
    ) -> Result<CanvasFile, StoreError> {
        let canvas = self.read(canvas_id).await?;
        if !canvas.can_access(user) {
            return Err(StoreError::AccessDenied);
        }
        Ok(canvas)
    }

    /// The explicit save: overwrite the persisted snapshot with the
    /// caller's current view. Owner or shared users only.
    pub async fn save_elements(
        &self,
        canvas_id: &CanvasId,
        user: &UserId,
        elements: Vec<Element>,
    ) -> Result<CanvasFile, StoreError> {
        let mut canvas = self.load(canvas_id, user).await?;
        canvas.elements = elements;
        self.write(canvas_id, &canvas).await?;
        Ok(canvas)
    }

    /// Canvases the user owns or was shared into.
    pub async fn list(&self, user: &UserId) -> Result<Vec<(CanvasId, CanvasFile)>, StoreError> {
        let mut result = Vec::new();

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let file_name = match file_name.to_str() {
                Some(name) => name,
                None => continue,
            };
            if !file_name.ends_with(&format!(".{}", CANVAS_FILE_EXT)) {
                continue;
            }
            let canvas_id = match file_name
                .split('.')
                .next()
                .and_then(|stem| stem.parse::<CanvasId>().ok())
            {
                Some(canvas_id) => canvas_id,
                None => continue,
            };
            match self.read(&canvas_id).await {
                Ok(canvas) => {
                    if canvas.can_access(user) {
                        result.push((canvas_id, canvas));
                    }
                }
                Err(err) => log::warn!("skipping unreadable canvas {}: {}", canvas_id, err),
            }
        }

        Ok(result)
    }

    /// Owner-only. Sharing with the owner or an already-shared user is
    /// rejected.
    pub async fn share(
        &self,
        canvas_id: &CanvasId,
        owner: &UserId,
        target: &UserId,
    ) -> Result<CanvasFile, StoreError> {
        let mut canvas = self.read(canvas_id).await?;
        if canvas.owner != *owner {
            return Err(StoreError::AccessDenied);
        }
        if canvas.owner == *target {
            return Err(StoreError::Invalid("owner cannot be added to the shared list"));
        }
        if canvas.shared_with.contains(target) {
            return Err(StoreError::Invalid("canvas is already shared with this user"));
        }
        canvas.shared_with.push(target.clone());
        self.write(canvas_id, &canvas).await?;
        Ok(canvas)
    }

    pub async fn unshare(
        &self,
        canvas_id: &CanvasId,
        owner: &UserId,
        target: &UserId,
    ) -> Result<CanvasFile, StoreError> {
        let mut canvas = self.read(canvas_id).await?;
        if canvas.owner != *owner {
            return Err(StoreError::AccessDenied);
        }
        canvas.shared_with.retain(|user| user != target);
        self.write(canvas_id, &canvas).await?;
        Ok(canvas)
    }

    async fn write(&self, canvas_id: &CanvasId, canvas: &CanvasFile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(canvas).map_err(|_| StoreError::Corrupt)?;
        fs::write(self.file_path(canvas_id), bytes).await?;
        Ok(())
    }
}
