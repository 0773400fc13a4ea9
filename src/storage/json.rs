use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::models::{FinalDataset, SEDES};
use crate::storage::DatasetSink;

/// Writes one directory per term:
///
/// ```text
/// {root}/{term}/
/// ├── sedes.json  term.json  programs.json
/// ├── materias.json  catedras.json  sections.json  meets.json
/// └── indexes/
///     └── byProgram.json  byCatedra.json  byMateria.json  byDaySede.json  bySectionId.json
/// ```
///
/// Files go to a hidden staging directory first, which replaces the term
/// directory only once every file is written.
pub struct JsonStorage {
    root_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn term_dir(&self, term_id: &str) -> PathBuf {
        self.root_dir.join(term_id)
    }

    fn staging_dir(&self, term_id: &str) -> PathBuf {
        self.root_dir.join(format!(".{}.partial", term_id))
    }
}

async fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    let body = serde_json::to_string_pretty(value)?;
    fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[async_trait]
impl DatasetSink for JsonStorage {
    async fn persist(&self, dataset: &FinalDataset) -> Result<()> {
        let term_id = dataset.term.id.as_str();
        let staging = self.staging_dir(term_id);
        let indexes = staging.join("indexes");

        if fs::try_exists(&staging).await? {
            fs::remove_dir_all(&staging).await?;
        }
        fs::create_dir_all(&indexes)
            .await
            .with_context(|| format!("Failed to create {}", indexes.display()))?;

        write_json(&staging, "sedes.json", SEDES).await?;
        write_json(&staging, "term.json", &dataset.term).await?;
        write_json(&staging, "programs.json", &dataset.programs).await?;
        write_json(&staging, "materias.json", &dataset.materias).await?;
        write_json(&staging, "catedras.json", &dataset.catedras).await?;
        write_json(&staging, "sections.json", &dataset.sections).await?;
        write_json(&staging, "meets.json", &dataset.meets).await?;

        let idx = &dataset.indices;
        write_json(&indexes, "byProgram.json", &idx.by_program).await?;
        write_json(&indexes, "byCatedra.json", &idx.by_catedra).await?;
        write_json(&indexes, "byMateria.json", &idx.by_materia).await?;
        write_json(&indexes, "byDaySede.json", &idx.by_day_sede).await?;
        write_json(&indexes, "bySectionId.json", &idx.by_section_id).await?;

        let target = self.term_dir(term_id);
        if fs::try_exists(&target).await? {
            fs::remove_dir_all(&target)
                .await
                .with_context(|| format!("Failed to replace {}", target.display()))?;
        }
        fs::rename(&staging, &target).await?;

        info!(
            "Done. Wrote {} sections and {} meets to {}",
            dataset.sections.len(),
            dataset.meets.len(),
            target.display()
        );
        Ok(())
    }
}
