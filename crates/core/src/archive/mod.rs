//! Materializes completed projects to disk.
//!
//! Layout under the output root:
//!
//! ```text
//! <output_root>/<folder_name>/<file.path>               one per generated file
//! <output_root>/<folder_name>/<folder_name>-project.zip  every file, same paths
//! ```
//!
//! The bundle is written to its own temporary file next to the final path
//! and renamed into place, so concurrent builds of one project never share
//! a partial file.

use crate::error::{ArchiveError, ForgeError, ForgeResult};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tf_protocol::{GeneratedFile, Project, ProjectStatus};
use tracing::{debug, info};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const MAX_SLUG_LEN: usize = 40;

/// Deterministic folder name for a project.
///
/// Lowercases the description, keeps only alphanumerics, whitespace and
/// hyphens, turns each whitespace run into one hyphen, cuts the result to 40
/// characters without a trailing hyphen and appends `_` plus the first 8 hex
/// digits of the id.
pub fn folder_name(description: &str, id: Uuid) -> String {
    let lowered = description.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let slug = kept.split_whitespace().collect::<Vec<_>>().join("-");
    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    let truncated = if slug.chars().count() > MAX_SLUG_LEN {
        truncated.trim_end_matches('-').to_string()
    } else {
        truncated
    };

    let simple = id.simple().to_string();
    format!("{}_{}", truncated, &simple[..8])
}

/// Writes project folders and zip bundles below one output root.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    output_root: PathBuf,
}

impl ArchiveBuilder {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Folder that holds the project's files and bundle.
    pub fn project_dir(&self, project: &Project) -> PathBuf {
        self.output_root
            .join(folder_name(&project.description, project.id))
    }

    /// Write every file of a completed project and build its zip bundle.
    ///
    /// Safe to call repeatedly: files are overwritten and the bundle is
    /// rebuilt from the same content.
    ///
    /// # Returns
    ///
    /// The path of the zip bundle.
    ///
    /// # Errors
    ///
    /// Returns `NotCompleted` if the project has not completed, and
    /// `Archive` if a file path is unsafe or any write fails.
    pub async fn build(&self, project: &Project) -> ForgeResult<PathBuf> {
        if project.status != ProjectStatus::Completed {
            return Err(ForgeError::NotCompleted {
                project_id: project.id,
                status: project.status,
            });
        }
        for file in &project.files {
            check_relative_path(&file.path)?;
        }

        let folder = folder_name(&project.description, project.id);
        let dir = self.output_root.join(&folder);
        let files = project.files.clone();
        let project_id = project.id;

        let zip_path = tokio::task::spawn_blocking(move || write_bundle(&dir, &folder, &files))
            .await
            .map_err(|err| ArchiveError::Join(err.to_string()))??;

        info!(project_id = %project_id, path = %zip_path.display(), "project archive created");
        Ok(zip_path)
    }
}

/// Reject paths that would land outside the project folder.
fn check_relative_path(path: &str) -> Result<(), ArchiveError> {
    if path.trim().is_empty() {
        return Err(ArchiveError::UnsafePath(path.to_string()));
    }
    let safe = Path::new(path)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(())
    } else {
        Err(ArchiveError::UnsafePath(path.to_string()))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_bundle(dir: &Path, folder: &str, files: &[GeneratedFile]) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    for file in files {
        let target = dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&target, &file.content).map_err(io_error(&target))?;
    }

    let zip_path = dir.join(format!("{folder}-project.zip"));
    let temp = write_zip(dir, files)?;
    persist(temp, &zip_path)?;

    debug!(entries = files.len(), path = %zip_path.display(), "zip bundle written");
    Ok(zip_path)
}

fn persist(temp: NamedTempFile, target: &Path) -> Result<(), ArchiveError> {
    temp.persist(target)
        .map(|_| ())
        .map_err(|err| io_error(target)(err.error))
}

/// A path repeated across stages appears once in the bundle, at its first
/// position, with the content that was written to disk last.
fn zip_entries(files: &[GeneratedFile]) -> Vec<&GeneratedFile> {
    let mut entries: Vec<&GeneratedFile> = Vec::with_capacity(files.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for file in files {
        match positions.get(file.path.as_str()) {
            Some(&index) => entries[index] = file,
            None => {
                positions.insert(file.path.as_str(), entries.len());
                entries.push(file);
            }
        }
    }
    entries
}

/// Write the bundle into a fresh temporary file inside `dir`.
fn write_zip(dir: &Path, files: &[GeneratedFile]) -> Result<NamedTempFile, ArchiveError> {
    let temp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    let temp_path = temp.path().to_path_buf();
    let mut writer = ZipWriter::new(BufWriter::new(temp));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in zip_entries(files) {
        writer.start_file(file.path.as_str(), options)?;
        writer
            .write_all(file.content.as_bytes())
            .map_err(io_error(&temp_path))?;
    }

    let buffered = writer.finish()?;
    buffered
        .into_inner()
        .map_err(|err| io_error(&temp_path)(err.into_error()))
}
