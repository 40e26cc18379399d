// ============================================================
// Layer 4 - bAbI Archive Loader
// ============================================================
// Fetches the bAbI tarball once and reads task files out of it.
//
// The archive is a .tar.gz holding every task in both sizes:
//
//   babi_tasks_1-20_v1-2.tar.gz
//     └── tasks_1-20_v1-2/
//           ├── en/       qa1_..._train.txt, qa1_..._test.txt, ...
//           └── en-10k/   qa1_..._train.txt, qa1_..._test.txt, ...
//
// Members are read straight from the gzip stream with the tar
// crate, so nothing is extracted to disk.
//
// Download failure is the one recoverable situation: we print how
// to fetch the file by hand and then hand the error back, which
// ends the run.
//
// Reference: flate2 and tar crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::domain::task::{member_path, SampleSize, Split, Task};
use crate::domain::traits::StorySource;

/// Where the dataset lives upstream
pub const DATASET_URL: &str =
    "https://s3.amazonaws.com/text-datasets/babi_tasks_1-20_v1-2.tar.gz";

/// Mirror given in the manual-download instructions
pub const MIRROR_URL: &str =
    "http://www.thespermwhale.com/jaseweston/babi/tasks_1-20_v1-2.tar.gz";

/// File name used inside the cache directory
pub const ARCHIVE_NAME: &str = "babi-tasks-v1-2.tar.gz";

/// Return the cached archive path, downloading it first if needed.
pub fn ensure_archive(cache_dir: &Path, url: &str) -> Result<PathBuf> {
    let target = cache_dir.join(ARCHIVE_NAME);
    if target.exists() {
        tracing::info!("Using cached dataset '{}'", target.display());
        return Ok(target);
    }

    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Cannot create cache directory '{}'", cache_dir.display()))?;

    tracing::info!("Downloading bAbI tasks from {}", url);
    if let Err(e) = download(url, &target) {
        fs::remove_file(target.with_extension("partial")).ok();
        println!("Error downloading dataset, please download it manually:");
        println!("$ wget {MIRROR_URL}");
        println!("$ mv tasks_1-20_v1-2.tar.gz {}", target.display());
        return Err(e);
    }

    Ok(target)
}

/// Stream `url` into `target`, going through a temporary file so a
/// broken transfer never leaves a truncated archive behind.
fn download(url: &str, target: &Path) -> Result<()> {
    let partial = target.with_extension("partial");

    let response = ureq::get(url)
        .call()
        .with_context(|| format!("Request to '{url}' failed"))?;

    let mut reader = response.into_reader();
    let mut file   = fs::File::create(&partial)
        .with_context(|| format!("Cannot create '{}'", partial.display()))?;
    let bytes = io::copy(&mut reader, &mut file)
        .with_context(|| format!("Download from '{url}' was interrupted"))?;

    fs::rename(&partial, target)
        .with_context(|| format!("Cannot move download to '{}'", target.display()))?;

    tracing::info!("Downloaded {} bytes to '{}'", bytes, target.display());
    Ok(())
}

/// Read a single member of a gzipped tarball as UTF-8 text.
pub fn read_member<R: Read>(reader: R, member: &str) -> Result<String> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));

    for entry in archive.entries().context("Cannot read tar entries")? {
        let mut entry = entry?;
        if entry.path()? == Path::new(member) {
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .with_context(|| format!("Member '{member}' is not valid UTF-8"))?;
            return Ok(text);
        }
    }

    Err(anyhow!("Member '{member}' not found in archive"))
}

/// A task + sample size inside a local copy of the archive.
/// Implements the StorySource trait from Layer 3.
pub struct BabiArchive {
    path: PathBuf,
    task: Task,
    size: SampleSize,
}

impl BabiArchive {
    pub fn new(path: impl Into<PathBuf>, task: Task, size: SampleSize) -> Self {
        Self { path: path.into(), task, size }
    }
}

impl StorySource for BabiArchive {
    fn read_split(&self, split: Split) -> Result<String> {
        let member = member_path(self.task, self.size, split);
        let file   = fs::File::open(&self.path)
            .with_context(|| format!("Cannot open archive '{}'", self.path.display()))?;

        tracing::debug!("Reading '{}' from '{}'", member, self.path.display());
        read_member(io::BufReader::new(file), &member)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};

    fn build_tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (path, body) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, body.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_read_member_finds_the_right_file() {
        let gz = build_tar_gz(&[
            ("tasks_1-20_v1-2/en/a_train.txt", "1 one\n"),
            ("tasks_1-20_v1-2/en/b_train.txt", "1 two\n"),
        ]);
        let text = read_member(io::Cursor::new(gz), "tasks_1-20_v1-2/en/b_train.txt").unwrap();
        assert_eq!(text, "1 two\n");
    }

    #[test]
    fn test_missing_member_is_an_error() {
        let gz = build_tar_gz(&[("x.txt", "1 x\n")]);
        assert!(read_member(io::Cursor::new(gz), "y.txt").is_err());
    }

    #[test]
    fn test_archive_source_reads_both_splits() {
        let task  = Task::new(1).unwrap();
        let train = member_path(task, SampleSize::OneK, Split::Train);
        let test  = member_path(task, SampleSize::OneK, Split::Test);
        let gz    = build_tar_gz(&[(train.as_str(), "1 train line\n"), (test.as_str(), "1 test line\n")]);

        let path = std::env::temp_dir()
            .join(format!("babi-archive-test-{}.tar.gz", std::process::id()));
        fs::write(&path, gz).unwrap();

        let source = BabiArchive::new(&path, task, SampleSize::OneK);
        assert_eq!(source.read_split(Split::Train).unwrap(), "1 train line\n");
        assert_eq!(source.read_split(Split::Test).unwrap(), "1 test line\n");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_cached_archive_skips_download() {
        let dir = std::env::temp_dir()
            .join(format!("babi-cache-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(ARCHIVE_NAME), b"cached").unwrap();

        // An unroutable URL proves no request is made
        let path = ensure_archive(&dir, "http://127.0.0.1:9/never").unwrap();
        assert_eq!(path, dir.join(ARCHIVE_NAME));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_download_returns_error_and_leaves_nothing() {
        let dir = std::env::temp_dir()
            .join(format!("babi-download-fail-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();

        let result = ensure_archive(&dir, "http://127.0.0.1:9/never");
        assert!(result.is_err());
        assert!(!dir.join(ARCHIVE_NAME).exists());
        assert!(!dir.join(ARCHIVE_NAME).with_extension("partial").exists());

        fs::remove_dir_all(&dir).ok();
    }
}
