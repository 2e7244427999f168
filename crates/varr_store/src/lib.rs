//! Snapshot persistence for dynamic arrays.
//!
//! A snapshot is a single binary file per call: a small versioned header followed by the
//! bincode-encoded element sequence. The logical length is persisted in the header and
//! cross-checked against the payload on load, so a round trip restores both the elements and the
//! length exactly.
//!
//! Callers pass the file name *without* an extension; the fixed [`SNAPSHOT_EXTENSION`] is
//! appended by this crate. Failures are never swallowed: every operation returns a
//! [`SnapshotError`] the caller can react to.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use varr_common::collections::{DynArray, GrowthStrategy};

/// File extension appended to every snapshot name.
pub const SNAPSHOT_EXTENSION: &str = "arr";

/// Bumped whenever the on-disk layout changes.
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Error produced by the snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] bincode::Error),
    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("snapshot length mismatch: header says {expected} elements, payload holds {found}")]
    LengthMismatch { expected: u64, found: u64 },
}

/// Header written before the element payload.
#[derive(Serialize, Deserialize, Debug)]
struct SnapshotHeader {
    format_version: u16,
    len: u64,
}

/// Resolves the on-disk path for a snapshot `name`.
///
/// The extension is appended, never substituted, so a caller-supplied `friends.v2` becomes
/// `friends.v2.arr`.
pub fn snapshot_path<P: AsRef<Path>>(name: P) -> PathBuf {
    let mut path = name.as_ref().as_os_str().to_os_string();
    path.push(".");
    path.push(SNAPSHOT_EXTENSION);
    PathBuf::from(path)
}

/// Writes `arr` to the snapshot file for `name`, creating or overwriting it, and returns the path
/// of the written file.
///
/// The file is flushed and synced before this returns.
pub fn write_snapshot<T, G, P>(arr: &DynArray<T, G>, name: P) -> Result<PathBuf, SnapshotError>
where
    T: Serialize,
    G: GrowthStrategy,
    P: AsRef<Path>,
{
    let path = snapshot_path(name);
    let mut writer = BufWriter::new(File::create(&path)?);

    let header = SnapshotHeader {
        format_version: SNAPSHOT_FORMAT_VERSION,
        len: arr.len() as u64,
    };
    bincode::serialize_into(&mut writer, &header).map_err(SnapshotError::Encode)?;
    bincode::serialize_into(&mut writer, arr).map_err(SnapshotError::Encode)?;

    writer.flush()?;
    writer.get_ref().sync_all()?;

    tracing::debug!(path = %path.display(), len = arr.len(), "snapshot written");
    Ok(path)
}

/// Reads the snapshot file for `name` into a fresh array.
///
/// The restored array's length always equals the persisted length; a header whose element count
/// disagrees with the payload is rejected rather than trusted.
pub fn read_snapshot<T, P>(name: P) -> Result<DynArray<T>, SnapshotError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = snapshot_path(name);
    let mut reader = BufReader::new(File::open(&path)?);

    let header: SnapshotHeader =
        bincode::deserialize_from(&mut reader).map_err(SnapshotError::Decode)?;
    if header.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: header.format_version,
            expected: SNAPSHOT_FORMAT_VERSION,
        });
    }

    let arr: DynArray<T> =
        bincode::deserialize_from(&mut reader).map_err(SnapshotError::Decode)?;
    if arr.len() as u64 != header.len {
        return Err(SnapshotError::LengthMismatch {
            expected: header.len,
            found: arr.len() as u64,
        });
    }

    tracing::debug!(path = %path.display(), len = arr.len(), "snapshot read");
    Ok(arr)
}

/// Reads the snapshot file for `name` into an existing array, replacing its contents and length.
///
/// The array is only touched once the whole snapshot has decoded successfully; on any error it is
/// left exactly as it was.
pub fn read_snapshot_into<T, G, P>(arr: &mut DynArray<T, G>, name: P) -> Result<(), SnapshotError>
where
    T: DeserializeOwned,
    G: GrowthStrategy,
    P: AsRef<Path>,
{
    let loaded = read_snapshot::<T, _>(name)?;
    arr.clear();
    arr.extend(loaded);
    Ok(())
}
