//! Random-access byte images
//!
//! Everything the importer reads and every strategy that patches a ROM goes
//! through `RomImage`. File-backed images are staged in memory and written
//! back in one step by `RomFile::commit`, so a failed export never leaves a
//! half-patched ROM behind.

use crate::common::{TextError, TextResult};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Byte image addressed by absolute offsets
pub trait RomImage {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` from `offset`; reading past the end is `TruncatedInput`
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> TextResult<()>;

    /// Write `data` at `offset`, growing the image with zeros if needed
    fn write_at(&mut self, offset: u64, data: &[u8]) -> TextResult<()>;
}

impl RomImage for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> TextResult<()> {
        let available = self.as_slice().len() as u64;
        let end = offset + buf.len() as u64;
        if end > available {
            let have = available.saturating_sub(offset);
            return Err(TextError::truncated(offset.max(available), (end - offset - have) as usize));
        }
        let start = offset as usize;
        buf.copy_from_slice(&self[start..start + buf.len()]);
        Ok(())
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> TextResult<()> {
        let start = offset as usize;
        let end = start + data.len();
        if end > self.as_slice().len() {
            self.resize(end, 0);
        }
        self[start..end].copy_from_slice(data);
        Ok(())
    }
}

/// ROM file staged in memory
#[derive(Debug, Clone)]
pub struct RomFile {
    path: PathBuf,
    data: Vec<u8>,
}

impl RomFile {
    /// Load an image for reading
    pub fn open(path: impl AsRef<Path>) -> TextResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| TextError::image_unavailable(path, e))?;
        log::debug!("loaded {} ({} bytes)", path.display(), data.len());
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Load an image that will be patched in place. Fails up front if the
    /// file cannot be opened for writing.
    pub fn open_for_update(path: impl AsRef<Path>) -> TextResult<Self> {
        let path = path.as_ref();
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| TextError::image_unavailable(path, e))?;
        Self::open(path)
    }

    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Replace the file on disk with the staged bytes
    pub fn commit(&self) -> TextResult<()> {
        write_atomic(&self.path, &self.data)
    }
}

impl RomImage for RomFile {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> TextResult<()> {
        self.data.read_at(offset, buf)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> TextResult<()> {
        self.data.write_at(offset, data)
    }
}

/// Write `bytes` to a sibling temporary file, then rename it over `path`.
/// Either the whole new content lands or the old file is untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> TextResult<()> {
    let staging = staging_path(path);
    write_staged(&staging, path, bytes).map_err(|e| {
        let _ = fs::remove_file(&staging);
        TextError::image_unavailable(path, e)
    })
}

/// Replace several files as one unit. Every file is staged before any target
/// is touched, and existing targets are moved aside until the last rename
/// lands. A failure at any point puts every target back and removes the
/// staging files.
pub fn write_atomic_all(files: &[(&Path, &[u8])]) -> TextResult<()> {
    let mut staged = Vec::with_capacity(files.len());
    for &(path, bytes) in files {
        let staging = staging_path(path);
        if let Err(e) = check_replaceable(path).and_then(|()| stage(&staging, bytes)) {
            let _ = fs::remove_file(&staging);
            discard(&staged);
            return Err(TextError::image_unavailable(path, e));
        }
        staged.push((staging, path));
    }

    let mut replaced = Vec::with_capacity(staged.len());
    for (staging, path) in &staged {
        match replace_keeping_backup(staging, path) {
            Ok(backup) => replaced.push((*path, backup)),
            Err(e) => {
                restore(&replaced);
                discard(&staged);
                return Err(TextError::image_unavailable(*path, e));
            }
        }
    }

    for (_, backup) in replaced {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(())
}

/// A directory in the way cannot be swapped out by a rename
fn check_replaceable(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(io::Error::other("target is a directory")),
        _ => Ok(()),
    }
}

/// Rename `staging` over `path`, moving the old file to a backup first.
/// Returns the backup, if there was an old file.
fn replace_keeping_backup(staging: &Path, path: &Path) -> io::Result<Option<PathBuf>> {
    let backup = if fs::symlink_metadata(path).is_ok() {
        let backup = backup_path(path);
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(staging, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(e);
    }
    Ok(backup)
}

/// Undo renames that already happened, newest first
fn restore(replaced: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in replaced.iter().rev() {
        let _ = fs::remove_file(path);
        if let Some(backup) = backup {
            if let Err(e) = fs::rename(backup, path) {
                log::error!("could not restore {} from {}: {e}", path.display(), backup.display());
            }
        }
    }
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (staging, _) in staged {
        let _ = fs::remove_file(staging);
    }
}

fn write_staged(staging: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    stage(staging, bytes)?;
    fs::rename(staging, path)
}

fn stage(staging: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(staging)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn staging_path(path: &Path) -> PathBuf {
    sibling(path, "octext-tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "octext-bak")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{suffix}"))
}

/// Big-endian cursor over a `RomImage`
pub struct ImageReader<'a> {
    image: &'a dyn RomImage,
    pos: u64,
}

impl<'a> ImageReader<'a> {
    pub fn new(image: &'a dyn RomImage, pos: u64) -> Self {
        Self { image, pos }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn seek(&mut self, pos: u64) {
        self.pos = pos;
    }

    pub fn read_bytes<const N: usize>(&mut self) -> TextResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.image.read_at(self.pos, &mut buf)?;
        self.pos += N as u64;
        Ok(buf)
    }

    pub fn read_vec(&mut self, len: usize) -> TextResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.image.read_at(self.pos, &mut buf)?;
        self.pos += len as u64;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> TextResult<u8> {
        Ok(self.read_bytes::<1>()?[0])
    }

    pub fn read_i16(&mut self) -> TextResult<i16> {
        Ok(i16::from_be_bytes(self.read_bytes()?))
    }

    pub fn read_u32(&mut self) -> TextResult<u32> {
        Ok(u32::from_be_bytes(self.read_bytes()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("octext-image-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_vec_read_past_end_is_truncated() {
        let image = vec![1u8, 2, 3];
        let mut buf = [0u8; 2];
        image.read_at(1, &mut buf).unwrap();
        assert_eq!(buf, [2, 3]);

        let err = image.read_at(2, &mut buf).unwrap_err();
        assert!(matches!(err, TextError::TruncatedInput { offset: 3, needed: 1 }));
    }

    #[test]
    fn test_vec_write_grows() {
        let mut image = vec![0xFFu8; 2];
        image.write_at(4, &[0xAA, 0xBB]).unwrap();
        assert_eq!(image, vec![0xFF, 0xFF, 0, 0, 0xAA, 0xBB]);
    }

    #[test]
    fn test_reader_is_big_endian() {
        let image = vec![0xFF, 0xFC, 0x07, 0x00, 0x00, 0x10, 0x42];
        let mut reader = ImageReader::new(&image, 0);
        assert_eq!(reader.read_i16().unwrap(), -4);
        assert_eq!(reader.read_u32().unwrap(), 0x0700_0010);
        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.position(), 7);
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_commit_replaces_file() {
        let dir = scratch_dir("commit");
        let path = dir.join("rom.z64");
        fs::write(&path, [0u8; 8]).unwrap();

        let mut rom = RomFile::open_for_update(&path).unwrap();
        rom.write_at(2, &[1, 2]).unwrap();
        rom.commit().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 1, 2, 0, 0, 0, 0]);
        assert!(!staging_path(&path).exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_all_stages_before_renaming() {
        let dir = scratch_dir("write-all");
        let a = dir.join("a.bin");
        let missing = dir.join("nested").join("b.bin");
        fs::write(&a, b"old").unwrap();

        let new: &[u8] = b"new";
        let data: &[u8] = b"data";
        let err = write_atomic_all(&[(a.as_path(), new), (missing.as_path(), data)]).unwrap_err();
        assert!(matches!(err, TextError::ImageUnavailable { .. }));
        assert_eq!(fs::read(&a).unwrap(), b"old".to_vec());
        assert!(!staging_path(&a).exists());

        let b = dir.join("b.bin");
        write_atomic_all(&[(a.as_path(), new), (b.as_path(), data)]).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"new".to_vec());
        assert_eq!(fs::read(&b).unwrap(), b"data".to_vec());
        let _ = fs::remove_dir_all(&dir);
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_all_refuses_directory_target() {
        let dir = scratch_dir("write-all-dir");
        let a = dir.join("a.bin");
        let b = dir.join("b.bin");
        fs::write(&a, b"old").unwrap();
        fs::create_dir_all(b.join("inside")).unwrap();

        let new: &[u8] = b"new";
        let err = write_atomic_all(&[(a.as_path(), new), (b.as_path(), new)]).unwrap_err();
        assert!(matches!(err, TextError::ImageUnavailable { ref path, .. } if path == &b));
        assert_eq!(fs::read(&a).unwrap(), b"old".to_vec());
        assert_eq!(entries(&dir), vec!["a.bin".to_string(), "b.bin".to_string()]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_all_rolls_back_on_failed_rename() {
        let dir = scratch_dir("write-all-rollback");
        let a = dir.join("a.bin");
        let b = dir.join("b.bin");
        fs::write(&a, b"old a").unwrap();
        fs::write(&b, b"old b").unwrap();
        // b cannot be moved aside while this directory holds its backup name
        let blocked = backup_path(&b);
        fs::create_dir_all(blocked.join("inside")).unwrap();

        let new: &[u8] = b"new";
        let err = write_atomic_all(&[(a.as_path(), new), (b.as_path(), new)]).unwrap_err();
        assert!(matches!(err, TextError::ImageUnavailable { ref path, .. } if path == &b));
        assert_eq!(fs::read(&a).unwrap(), b"old a".to_vec());
        assert_eq!(fs::read(&b).unwrap(), b"old b".to_vec());
        assert_eq!(
            entries(&dir),
            vec![".b.bin.octext-bak".to_string(), "a.bin".to_string(), "b.bin".to_string()]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_all_leaves_no_backups() {
        let dir = scratch_dir("write-all-clean");
        let a = dir.join("a.bin");
        fs::write(&a, b"old").unwrap();

        let new: &[u8] = b"new";
        write_atomic_all(&[(a.as_path(), new)]).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"new".to_vec());
        assert_eq!(entries(&dir), vec!["a.bin".to_string()]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_image_is_unavailable() {
        let dir = scratch_dir("missing");
        let err = RomFile::open_for_update(dir.join("absent.z64")).unwrap_err();
        assert!(matches!(err, TextError::ImageUnavailable { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
