//! Filesystem quote file store.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, trace, warn};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;

use quote_storage_core::errors::{Error, FilesystemError, Result};
use quote_storage_core::quotes::{
    parse_file_date, sort_descriptions, FileDescription, QuoteContent, QuoteFileStore,
    QuoteProvider, QuoteUpload, FILE_EXTENSION,
};

use crate::layout::QuoteFileLayout;
use crate::temp_file::TempFileGuard;

/// Ranges wider than this many days are listed by reading each provider
/// directory once instead of probing every day.
pub const DIRECTORY_SCAN_THRESHOLD_DAYS: i64 = 366;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Stores quote files under `<base>/<ProviderName>/<YYYYMMDD>.csv`.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    layout: QuoteFileLayout,
}

impl FileSystemStorage {
    /// The base directory is expected to exist; configuration validation
    /// guarantees it.
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            layout: QuoteFileLayout::new(base_directory),
        }
    }

    async fn is_stored(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FilesystemError::Read {
                path: path.to_path_buf(),
                source,
            }
            .into()),
        }
    }

    async fn list_by_probing(
        &self,
        providers: &[QuoteProvider],
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        let mut descriptions = Vec::new();
        for date in date_from.iter_days().take_while(|d| *d <= date_to) {
            for &provider in providers {
                if self.is_stored(&self.layout.file_path(provider, date)).await? {
                    descriptions.push(FileDescription::new(provider, date));
                }
            }
        }
        Ok(descriptions)
    }

    async fn list_by_directory_scan(
        &self,
        providers: &[QuoteProvider],
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        let mut descriptions = Vec::new();
        for &provider in providers {
            let dir = self.layout.provider_dir(provider);
            let list_err = |source| FilesystemError::ListDir {
                path: dir.clone(),
                source,
            };

            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(list_err(source).into()),
            };

            while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
                let Some(date) = entry
                    .file_name()
                    .to_str()
                    .and_then(stored_file_date)
                    .filter(|d| *d >= date_from && *d <= date_to)
                else {
                    continue;
                };
                if self.is_stored(&entry.path()).await? {
                    descriptions.push(FileDescription::new(provider, date));
                }
            }
        }
        sort_descriptions(&mut descriptions);
        Ok(descriptions)
    }
}

/// Creates the temp file on a detached task.
///
/// `tokio::fs` finishes a create on the blocking pool even after its future is
/// dropped. If nobody is left to receive the handle, the task deletes the file
/// itself.
async fn create_temp_file(path: PathBuf) -> io::Result<fs::File> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let created = fs::File::create(&path).await;
        if let Err(Ok(file)) = tx.send(created) {
            drop(file);
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove temp file {}: {}", path.display(), e),
            }
        }
    });
    rx.await
        .map_err(|_| io::Error::other("temp file creation was aborted"))?
}

/// Date of a stored file name such as `20230708.csv`.
fn stored_file_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(FILE_EXTENSION)?.strip_suffix('.')?;
    parse_file_date(stem)
}

#[async_trait]
impl QuoteFileStore for FileSystemStorage {
    async fn get_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<QuoteContent>> {
        let path = self.layout.file_path(provider, date);
        debug!("Start get file {}", path.display());

        let read_err = |source| FilesystemError::Read {
            path: path.clone(),
            source,
        };
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("File not exist {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(read_err(source).into()),
        };
        if !file.metadata().await.map_err(read_err)?.is_file() {
            info!("Not a regular file {}", path.display());
            return Ok(None);
        }

        info!("File found {}", path.display());
        let content: QuoteContent = Box::pin(file);
        Ok(Some(content))
    }

    async fn save_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
        content: QuoteUpload<'_>,
    ) -> Result<()> {
        let dir = self.layout.provider_dir(provider);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| FilesystemError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let target = self.layout.file_path(provider, date);
        let guard = TempFileGuard::new(self.layout.temp_path(provider, date));
        let write_err = |source| FilesystemError::Write {
            path: target.clone(),
            source,
        };
        trace!("Try save file {} via {}", target.display(), guard.path().display());

        let mut file = create_temp_file(guard.path().to_path_buf())
            .await
            .map_err(write_err)?;

        // Read failures belong to the upload, write failures to the target.
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = content.read(&mut buf).await.map_err(Error::UploadRead)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).await.map_err(write_err)?;
            written += n as u64;
        }
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        fs::rename(guard.path(), &target).await.map_err(write_err)?;
        guard.disarm();

        info!("Saved {} bytes to file {}", written, target.display());
        Ok(())
    }

    async fn get_quote_list(
        &self,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        let providers = QuoteProvider::selection(provider);
        let span_days = (date_to - date_from).num_days() + 1;
        debug!(
            "Listing {:?} over {} day(s) in {}",
            providers,
            span_days,
            self.layout.base_directory().display()
        );

        if span_days > DIRECTORY_SCAN_THRESHOLD_DAYS {
            self.list_by_directory_scan(&providers, date_from, date_to)
                .await
        } else {
            self.list_by_probing(&providers, date_from, date_to).await
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
