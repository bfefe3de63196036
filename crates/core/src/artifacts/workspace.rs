use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::ArtifactSet;

/// Directory name under the output dir holding per-request workspaces.
const WORK_DIR: &str = ".work";

/// Where one pipeline run keeps its artifacts.
///
/// Isolated workspaces live in `{output}/.work/{uuid}` and only their
/// deliverables are moved into the output directory. A shared workspace is
/// the output directory itself.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
    output_dir: PathBuf,
    isolated: bool,
}

impl Workspace {
    /// Picks the directory for one run. Nothing is created until
    /// [`Workspace::prepare`].
    pub fn new(output_dir: &Path, isolate: bool) -> Self {
        let dir = if isolate {
            output_dir.join(WORK_DIR).join(Uuid::new_v4().to_string())
        } else {
            output_dir.to_path_buf()
        };

        Self {
            dir,
            output_dir: output_dir.to_path_buf(),
            isolated: isolate,
        }
    }

    /// Creates the output directory and, for an isolated workspace, the
    /// working directory under it.
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        if self.isolated {
            tokio::fs::create_dir_all(&self.dir).await?;
            debug!("Created isolated workspace {:?}", self.dir);
        }
        Ok(())
    }

    /// Directory artifacts are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Moves the deliverables into the output directory.
    ///
    /// Returns the final `(output, subtitle)` paths. Existing files with the
    /// same names are replaced. Either both deliverables are published or
    /// neither is: when the subtitle cannot be moved the video is moved back.
    pub async fn promote(&self, artifacts: &ArtifactSet) -> io::Result<(PathBuf, PathBuf)> {
        if !self.isolated {
            return Ok((
                artifacts.final_output.clone(),
                artifacts.subtitle.clone(),
            ));
        }

        let final_output = self.output_dir.join(file_name(&artifacts.final_output)?);
        let subtitle = self.output_dir.join(file_name(&artifacts.subtitle)?);

        tokio::fs::rename(&artifacts.final_output, &final_output).await?;
        if let Err(e) = tokio::fs::rename(&artifacts.subtitle, &subtitle).await {
            if let Err(undo) = tokio::fs::rename(&final_output, &artifacts.final_output).await {
                warn!("Failed to withdraw {:?}: {}", final_output, undo);
                if let Err(rm) = tokio::fs::remove_file(&final_output).await {
                    warn!("Failed to remove {:?}: {}", final_output, rm);
                }
            }
            return Err(e);
        }

        Ok((final_output, subtitle))
    }

    /// Removes an isolated workspace with whatever it still contains.
    /// A shared workspace is left alone.
    pub async fn discard(&self) {
        if !self.isolated {
            return;
        }
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove workspace {:?}: {}", self.dir, e);
            }
        }
    }
}

fn file_name(path: &Path) -> io::Result<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("artifact path has no file name: {}", path.display()),
        )
    })
}
