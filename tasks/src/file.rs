//! Task file handling

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::task::Task;

#[derive(Debug, Eq, PartialEq)]
pub struct TaskFile {
    path: PathBuf,
}

const BACKUP_HISTORY_LEN: usize = 3;

impl TaskFile {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let dir = parent
            .canonicalize()
            .with_context(|| format!("Directory {parent:?} does not exist"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Path {path:?} has no file name"))?;
        Ok(Self {
            path: dir.join(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_tasks(&self) -> anyhow::Result<Vec<Task>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{:?} does not exist yet", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        reader
            .lines()
            .enumerate()
            .filter(|(_, l)| l.as_ref().map_or(true, |l| !l.is_empty()))
            .map(|(i, l)| {
                l.map_err(anyhow::Error::from)
                    .and_then(|l| l.parse::<Task>())
                    .with_context(|| format!("Invalid task at {}:{}", self.path.display(), i + 1))
            })
            .collect()
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()> {
        // Create new file
        let new_file = tempfile::NamedTempFile::new_in(self.dir())?;
        let mut new_file_writer = BufWriter::new(new_file);

        // Write tasks to it
        for task in tasks {
            writeln!(new_file_writer, "{task}")?;
        }

        // Backup
        self.backup()?;

        // Overwrite task file
        let new_file = new_file_writer.into_inner()?;
        new_file.persist(&self.path)?;
        log::debug!("Saved {} task(s) to {:?}", tasks.len(), self.path);

        Ok(())
    }

    fn dir(&self) -> &Path {
        // new() guarantees a parent
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    fn backup(&self) -> anyhow::Result<()> {
        if !self.path.is_file() {
            return Ok(());
        }
        let latest = self.backup_path(1);
        if latest.is_file() && Self::same_content(&self.path, &latest)? {
            log::debug!("{latest:?} is up to date");
            return Ok(());
        }
        for src_idx in (1..BACKUP_HISTORY_LEN).rev() {
            let src = self.backup_path(src_idx);
            if !src.is_file() {
                continue;
            }
            let dst = self.backup_path(src_idx + 1);
            log::debug!("{src:?} -> {dst:?}");
            fs::rename(src, dst)?;
        }
        let dst = self.backup_path(1);
        log::debug!("{:?} -> {:?}", self.path, dst);
        fs::copy(&self.path, dst)?;
        Ok(())
    }

    fn same_content(path1: &Path, path2: &Path) -> anyhow::Result<bool> {
        if path1.metadata()?.len() == path2.metadata()?.len() {
            Ok(fs::read(path1)? == fs::read(path2)?)
        } else {
            Ok(false)
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_owned();
        name.push(format!(".bak.{index}"));
        self.path.with_file_name(name)
    }
}
