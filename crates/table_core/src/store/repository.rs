use super::error::RepositoryError;
use super::format::{decompress_and_deserialize, serialize_and_compress};
use crate::models::{MatchId, MatchSnapshot, PeriodKey};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Persistence collaborator for match snapshots.
///
/// The controller treats saves as best-effort: a failure is reported as a
/// warning event and never rolls back in-memory state.
pub trait MatchRepository {
    fn load(&self, match_id: &MatchId) -> Result<MatchSnapshot, RepositoryError>;
    fn save(&mut self, match_id: &MatchId, snapshot: &MatchSnapshot) -> Result<(), RepositoryError>;
}

/// Snapshots kept in memory. Clones share storage, so a caller can hand one
/// clone to the controller and inspect saves through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Rc<RefCell<HashMap<MatchId, MatchSnapshot>>>,
    saves: Rc<RefCell<u32>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful saves
    pub fn save_count(&self) -> u32 {
        *self.saves.borrow()
    }

    pub fn latest(&self, match_id: &MatchId) -> Option<MatchSnapshot> {
        self.snapshots.borrow().get(match_id).cloned()
    }
}

impl MatchRepository for InMemoryRepository {
    fn load(&self, match_id: &MatchId) -> Result<MatchSnapshot, RepositoryError> {
        self.latest(match_id).ok_or_else(|| RepositoryError::NotFound { match_id: match_id.clone() })
    }

    fn save(&mut self, match_id: &MatchId, snapshot: &MatchSnapshot) -> Result<(), RepositoryError> {
        self.snapshots.borrow_mut().insert(match_id.clone(), snapshot.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// One compressed, checksummed file per match in a directory.
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, match_id: &MatchId) -> PathBuf {
        self.dir.join(format!("{}.table", match_id))
    }

    pub fn exists(&self, match_id: &MatchId) -> bool {
        self.path_for(match_id).exists()
    }

    pub fn delete(&self, match_id: &MatchId) -> Result<(), RepositoryError> {
        let path = self.path_for(match_id);
        if path.exists() {
            remove_file(&path)?;
            log::info!("Deleted stored match {}", match_id);
        }
        Ok(())
    }

    /// Metadata of every readable snapshot in the directory, most recent first.
    pub fn list(&self) -> Result<Vec<StoredMatchInfo>, RepositoryError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("table") {
                continue;
            }
            match Self::read_path(&path) {
                Ok(snapshot) => infos.push(StoredMatchInfo::from(&snapshot)),
                Err(err) => log::debug!("Skipping unreadable snapshot {:?}: {}", path, err),
            }
        }
        infos.sort_by(|a, b| b.taken_at_unix.cmp(&a.taken_at_unix));
        Ok(infos)
    }

    /// Read a snapshot file directly, wherever it lives.
    pub fn read_path(path: &Path) -> Result<MatchSnapshot, RepositoryError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = decompress_and_deserialize(&data)?;
        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }

    fn write_path(path: &Path, snapshot: &MatchSnapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serialize_and_compress(snapshot)?;

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }
}

impl MatchRepository for FileRepository {
    fn load(&self, match_id: &MatchId) -> Result<MatchSnapshot, RepositoryError> {
        let path = self.path_for(match_id);
        if !path.exists() {
            return Err(RepositoryError::NotFound { match_id: match_id.clone() });
        }
        let snapshot = Self::read_path(&path)?;
        log::info!("Match {} loaded (revision {})", match_id, snapshot.revision);
        Ok(snapshot)
    }

    fn save(&mut self, match_id: &MatchId, snapshot: &MatchSnapshot) -> Result<(), RepositoryError> {
        Self::write_path(&self.path_for(match_id), snapshot)?;
        log::info!(
            "Match {} saved at {} (revision {})",
            match_id,
            snapshot.period.current,
            snapshot.revision
        );
        Ok(())
    }
}

/// Summary of a stored snapshot for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMatchInfo {
    pub match_id: MatchId,
    pub revision: u64,
    pub period: PeriodKey,
    pub finished: bool,
    pub score: (u32, u32),
    pub taken_at_unix: i64,
}

impl From<&MatchSnapshot> for StoredMatchInfo {
    fn from(snapshot: &MatchSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id.clone(),
            revision: snapshot.revision,
            period: snapshot.period.current,
            finished: snapshot.finished,
            score: (snapshot.score.local, snapshot.score.visitor),
            taken_at_unix: snapshot.taken_at.timestamp(),
        }
    }
}

impl StoredMatchInfo {
    pub fn format_taken_at(&self) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        OffsetDateTime::from_unix_timestamp(self.taken_at_unix)
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn display_text(&self) -> String {
        format!(
            "{} {} {}-{} (revision {}{})",
            self.match_id,
            self.period,
            self.score.0,
            self.score.1,
            self.revision,
            if self.finished { ", final" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::engine::{ManualTimeSource, MatchController};
    use crate::models::{MatchFixture, PlayerId, PlayerIdentity, ShotKind, StatAction, TeamRoster, TeamSide};
    use tempfile::TempDir;

    fn roster(prefix: &str) -> TeamRoster {
        TeamRoster::new(
            prefix.to_uppercase(),
            (1..=6).map(|i| PlayerIdentity::new(format!("{}{}", prefix, i), "Player", i)).collect(),
        )
    }

    fn sample_snapshot() -> MatchSnapshot {
        let fixture = MatchFixture::pending("m-100", roster("l"), roster("v"));
        let mut ctl =
            MatchController::open(fixture, TableConfig::default(), ManualTimeSource::new()).unwrap();
        for (side, prefix) in [(TeamSide::Local, "l"), (TeamSide::Visitor, "v")] {
            let ids: Vec<PlayerId> =
                (1..=5).map(|i| PlayerId::new(format!("{}{}", prefix, i))).collect();
            ctl.confirm_lineup(side, &ids).unwrap();
        }
        ctl.start_period(crate::models::PeriodKey::Q1).unwrap();
        ctl.apply_stat(TeamSide::Local, &PlayerId::from("l2"), StatAction::made(ShotKind::ThreePointer))
            .unwrap();
        ctl.apply_stat(TeamSide::Visitor, &PlayerId::from("v1"), StatAction::Foul).unwrap();
        ctl.snapshot()
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::new(temp_dir.path().join("matches"));
        let snapshot = sample_snapshot();

        repo.save(&snapshot.match_id, &snapshot).unwrap();
        let loaded = repo.load(&snapshot.match_id).unwrap();
        assert_eq!(loaded, snapshot);

        // Temp file is renamed away
        assert!(!repo.path_for(&snapshot.match_id).with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_match() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileRepository::new(temp_dir.path());
        let err = repo.load(&MatchId::new("nope")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_tampered_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::new(temp_dir.path());
        let snapshot = sample_snapshot();
        repo.save(&snapshot.match_id, &snapshot).unwrap();

        let path = repo.path_for(&snapshot.match_id);
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[6] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let err = repo.load(&snapshot.match_id).unwrap_err();
        assert!(matches!(err, RepositoryError::ChecksumMismatch));
        assert!(!err.is_recoverable());

        std::fs::write(&path, [0u8; 8]).unwrap();
        assert!(matches!(repo.load(&snapshot.match_id), Err(RepositoryError::Corrupted)));
    }

    #[test]
    fn test_list_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = FileRepository::new(temp_dir.path());
        let snapshot = sample_snapshot();
        repo.save(&snapshot.match_id, &snapshot).unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let infos = repo.list().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].score, (3, 0));
        assert_eq!(infos[0].period, crate::models::PeriodKey::Q1);
        assert!(infos[0].format_taken_at().contains('T'));

        repo.delete(&snapshot.match_id).unwrap();
        assert!(!repo.exists(&snapshot.match_id));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_clones_share_storage() {
        let repo = InMemoryRepository::new();
        let mut handle = repo.clone();
        let snapshot = sample_snapshot();
        handle.save(&snapshot.match_id, &snapshot).unwrap();

        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load(&snapshot.match_id).unwrap(), snapshot);
    }
}
