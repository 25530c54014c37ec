use crate::context::Context;
use crate::error::Error;
use crate::manifest::Manifest;
use crate::result::Result;
use crate::utils;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Outcome of writing the archive
#[derive(Debug)]
pub struct BuildReport {
    pub archive_path: PathBuf,
    /// Entry names in the order they were written
    pub entries: Vec<String>,
    /// Root files that were listed but not found
    pub missing: Vec<String>,
    /// Size of the finished archive on disk
    pub size: u64,
}

/// A file to be stored in the archive
#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    name_in_archive: String,
}

pub fn create_xpi(ctx: &Context, manifest: &Manifest) -> Result<BuildReport> {
    let archive_path = ctx.base_dir.join(&manifest.output);

    if archive_path.exists() {
        if ctx.verbose {
            println!("Removing existing {}", archive_path.display());
        }
        fs::remove_file(&archive_path)?;
    }

    let (entries, missing) = write_archive(ctx, manifest, &archive_path)?;

    let size = fs::metadata(&archive_path)?.len();
    println!();
    println!("Created {} ({} bytes)", manifest.output, size);

    Ok(BuildReport {
        archive_path,
        entries,
        missing,
        size,
    })
}

/// The writer lives only for the duration of this call and is finished
/// before returning.
fn write_archive(
    ctx: &Context,
    manifest: &Manifest,
    archive_path: &Path,
) -> Result<(Vec<String>, Vec<String>)> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let mut entries = Vec::new();
    let mut missing = Vec::new();

    for name in &manifest.root_files {
        let entry = FileEntry {
            path: ctx.base_dir.join(name),
            name_in_archive: name.clone(),
        };
        if entry.path.is_file() {
            add_file(ctx, &mut zip, &entry)?;
            entries.push(entry.name_in_archive);
        } else {
            eprintln!("WARNING: {} not found", name);
            missing.push(name.clone());
        }
    }

    for directory in &manifest.directories {
        for entry in collect_directory(ctx, directory, manifest.sort, archive_path)? {
            add_file(ctx, &mut zip, &entry)?;
            entries.push(entry.name_in_archive);
        }
    }

    zip.finish()?.flush()?;
    Ok((entries, missing))
}

fn add_file<W: Write + Seek>(ctx: &Context, zip: &mut ZipWriter<W>, entry: &FileEntry) -> Result<()> {
    let mut source = File::open(&entry.path)?;
    zip.start_file(entry.name_in_archive.as_str(), entry_options(&entry.path)?)?;
    io::copy(&mut source, zip)?;

    println!("Added: {}", entry.name_in_archive);
    if ctx.verbose {
        println!("  from {}", entry.path.display());
    }
    Ok(())
}

fn entry_options(path: &Path) -> Result<SimpleFileOptions> {
    let metadata = fs::metadata(path)?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= u64::from(u32::MAX));

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    };

    Ok(options)
}

/// Every regular file below `directory`, top-down: a directory's own files
/// come before the contents of its subdirectories.
fn collect_directory(
    ctx: &Context,
    directory: &str,
    sort: bool,
    archive_path: &Path,
) -> Result<Vec<FileEntry>> {
    let root = ctx.base_dir.join(directory);
    if root.exists() && !root.is_dir() {
        return Err(Error::InvalidConfig(format!("{} is not a directory", directory)));
    }

    let walker = WalkDir::new(&root).sort_by(move |a, b| walk_order(a, b, sort));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path == archive_path {
            continue;
        }

        let relative = path.strip_prefix(&root)?;
        files.push(FileEntry {
            path: path.to_path_buf(),
            name_in_archive: utils::archive_name(&Path::new(directory).join(relative)),
        });
    }

    Ok(files)
}

// The sort is stable, so without `sort` files keep the filesystem's order.
fn walk_order(a: &DirEntry, b: &DirEntry, sort: bool) -> Ordering {
    let kind = a.file_type().is_dir().cmp(&b.file_type().is_dir());
    if sort {
        kind.then_with(|| a.file_name().cmp(b.file_name()))
    } else {
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn plan(root_files: &[&str], directories: &[&str], sort: bool) -> Manifest {
        Manifest {
            title: "test".to_string(),
            output: "test.xpi".to_string(),
            root_files: root_files.iter().map(|s| s.to_string()).collect(),
            directories: directories.iter().map(|s| s.to_string()).collect(),
            sort,
        }
    }

    fn names_in(path: &Path) -> Vec<String> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn root_files_come_first_in_listed_order() {
        let dir = TempDir::new().unwrap();
        for name in ["icon.png", "prefs.js", "bootstrap.js", "manifest.json", "content/ocr.js"] {
            write(&dir, name, name);
        }
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let manifest = plan(
            &["manifest.json", "bootstrap.js", "prefs.js", "icon.png"],
            &["content"],
            false,
        );

        let report = create_xpi(&ctx, &manifest).unwrap();
        let names = names_in(&report.archive_path);

        assert_eq!(
            names,
            vec!["manifest.json", "bootstrap.js", "prefs.js", "icon.png", "content/ocr.js"]
        );
        assert_eq!(names, report.entries);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn missing_root_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.txt", "a");
        write(&dir, "d/x.txt", "x");
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let report = create_xpi(&ctx, &plan(&["a.txt", "b.txt"], &["d"], false)).unwrap();

        assert_eq!(names_in(&report.archive_path), vec!["a.txt", "d/x.txt"]);
        assert_eq!(report.missing, vec!["b.txt"]);
    }

    #[test]
    fn directory_files_appear_once_with_forward_slashes() {
        let dir = TempDir::new().unwrap();
        for name in [
            "content/a.js",
            "content/b.xhtml",
            "content/icons/x.svg",
            "content/icons/deep/y.svg",
            "locale/en-US/ocr.ftl",
            "locale/de/ocr.ftl",
        ] {
            write(&dir, name, name);
        }
        fs::create_dir_all(dir.path().join("content/empty")).unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let report = create_xpi(&ctx, &plan(&[], &["content", "locale"], false)).unwrap();
        let mut names = names_in(&report.archive_path);

        assert!(names.iter().all(|n| !n.contains('\\')));
        assert!(names[..4].iter().all(|n| n.starts_with("content/")));
        assert!(names[4..].iter().all(|n| n.starts_with("locale/")));

        names.sort();
        assert_eq!(
            names,
            vec![
                "content/a.js",
                "content/b.xhtml",
                "content/icons/deep/y.svg",
                "content/icons/x.svg",
                "locale/de/ocr.ftl",
                "locale/en-US/ocr.ftl",
            ]
        );
    }

    #[test]
    fn files_precede_subdirectories_when_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["d/z.txt", "d/a.txt", "d/sub/m.txt", "d/sub/b.txt", "d/aaa/k.txt"] {
            write(&dir, name, name);
        }
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let report = create_xpi(&ctx, &plan(&[], &["d"], true)).unwrap();

        assert_eq!(
            names_in(&report.archive_path),
            vec!["d/a.txt", "d/z.txt", "d/aaa/k.txt", "d/sub/b.txt", "d/sub/m.txt"]
        );
    }

    #[test]
    fn rebuild_replaces_previous_archive() {
        let dir = TempDir::new().unwrap();
        write(&dir, "d/keep.txt", "keep");
        write(&dir, "d/drop.txt", "drop");
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let manifest = plan(&[], &["d"], true);

        let first = create_xpi(&ctx, &manifest).unwrap();
        assert_eq!(names_in(&first.archive_path), vec!["d/drop.txt", "d/keep.txt"]);

        fs::remove_file(dir.path().join("d/drop.txt")).unwrap();
        let second = create_xpi(&ctx, &manifest).unwrap();
        assert_eq!(names_in(&second.archive_path), vec!["d/keep.txt"]);
    }

    #[test]
    fn reported_size_matches_disk() {
        let dir = TempDir::new().unwrap();
        write(&dir, "manifest.json", "{\"name\": \"mistral-ocr\"}");
        write(&dir, "content/ocr.js", &"let x = 1;\n".repeat(500));
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let report = create_xpi(&ctx, &plan(&["manifest.json"], &["content"], false)).unwrap();

        assert_eq!(report.size, fs::metadata(&report.archive_path).unwrap().len());
    }

    #[test]
    fn entries_are_deflated_and_intact() {
        let dir = TempDir::new().unwrap();
        let script = "Zotero.debug('Mistral OCR');\n".repeat(100);
        write(&dir, "bootstrap.js", &script);
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let report = create_xpi(&ctx, &plan(&["bootstrap.js"], &[], false)).unwrap();

        let mut archive = ZipArchive::new(File::open(&report.archive_path).unwrap()).unwrap();
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());

        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, script);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "manifest.json", "{}");
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = create_xpi(&ctx, &plan(&["manifest.json"], &["content"], false)).unwrap_err();
        assert!(matches!(err, Error::WalkDir(_)));
    }

    #[test]
    fn archive_inside_packaged_directory_is_not_added_to_itself() {
        let dir = TempDir::new().unwrap();
        write(&dir, "build/readme.txt", "readme");
        write(&dir, "build/out.xpi", "stale");
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let mut manifest = plan(&[], &["build"], true);
        manifest.output = "build/out.xpi".to_string();

        let report = create_xpi(&ctx, &manifest).unwrap();
        assert_eq!(names_in(&report.archive_path), vec!["build/readme.txt"]);
    }
}
