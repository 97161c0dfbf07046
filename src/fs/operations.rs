use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::{self, File},
    io::{self, AsyncWriteExt},
};
use tracing::debug;

const LOCK_SUFFIX: &str = ".lock";
const TEMP_SUFFIX: &str = ".tmp";

/// `path` with `suffix` appended to its file name, in the same directory.
fn sibling(path: &Path, suffix: &str) -> Result<PathBuf, io::Error> {
    let Some(name) = path.file_name() else {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("{path:?} does not name a file"),
        ));
    };
    let mut name = OsString::from(name);
    name.push(suffix);
    Ok(path.with_file_name(name))
}

/// The data file itself gets replaced on every rewrite, so readers and writers agree on a
/// separate lock file that stays put.
async fn open_lock(path: &Path) -> Result<File, io::Error> {
    File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(sibling(path, LOCK_SUFFIX)?)
        .await
}

/// Reads the whole file under a shared lock. A missing file is not an error.
pub async fn read_locked(path: &Path) -> Result<Option<String>, io::Error> {
    let lock = open_lock(path).await?;
    lock.lock_shared()?;
    let result = match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    };
    lock.unlock_async().await?;
    result
}

/// Replaces the contents of a file under an exclusive lock, creating it if needed. The new
/// contents are written and synced to a temporary sibling first and then renamed over `path`, so
/// a failed write leaves the previous contents untouched.
pub async fn rewrite_locked(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let lock = open_lock(path).await?;
    lock.lock_exclusive()?;
    let result = replace_file(path, contents).await;
    lock.unlock_async().await?;
    result
}

async fn replace_file(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let temp = sibling(path, TEMP_SUFFIX)?;
    let result = async {
        write_synced(&temp, contents).await?;
        fs::rename(&temp, path).await
    }
    .await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp).await {
            debug!("Could not remove {temp:?}: {e}");
        }
    }
    result
}

async fn write_synced(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let mut file = File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_data().await?;
    Ok(())
}
