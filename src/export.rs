//! CSV snapshot export.
//!
//! Rows are projected onto a fixed column list. The file is staged in a
//! temporary file next to the destination and renamed into place only once
//! every row has been written, so a failed export never leaves a partial or
//! corrupted file behind. The replacement keeps the permissions of the file
//! it replaces, and a symlink at the destination is written through.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::Value;
use tempfile::{Builder, NamedTempFile};

use crate::error::{ProcwatchError, Result};
use crate::record::RawRecord;

/// Exported columns, in file order.
pub const CSV_COLUMNS: [&str; 14] = [
    "pid",
    "ppid",
    "name",
    "user",
    "cpu_usage",
    "memory_usage",
    "memory_percent",
    "status",
    "threads",
    "network_connections",
    "is_container",
    "container_id",
    "gpu_memory",
    "command",
];

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub exported_at: DateTime<Local>,
}

/// Render one JSON value as a CSV cell.
pub fn cell_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Project a raw record onto [`CSV_COLUMNS`].
pub fn project_row(record: &RawRecord) -> Vec<String> {
    CSV_COLUMNS
        .iter()
        .map(|column| {
            let value = match (*column, record.get(*column)) {
                ("status", None) => record.get("state"),
                (_, value) => value,
            };
            cell_value(value)
        })
        .collect()
}

/// Write the header and one row per record to `writer`.
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(writer: W, records: &[RawRecord]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;
    for record in records {
        csv_writer.write_record(project_row(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Export `records` to `path`, replacing any existing file atomically.
pub fn export_to_file(path: &Path, records: &[RawRecord]) -> Result<ExportSummary> {
    let export_error = |source: io::Error| ProcwatchError::Export {
        path: path.to_path_buf(),
        source,
    };

    let target = resolve_target(path).map_err(export_error)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = stage_file(dir, &target).map_err(export_error)?;
    let rows = write_csv(staged.as_file_mut(), records)?;
    staged.as_file().sync_all().map_err(export_error)?;
    staged.persist(&target).map_err(|e| export_error(e.error))?;

    log::debug!("Wrote {} rows to {}", rows, target.display());

    Ok(ExportSummary {
        path: path.to_path_buf(),
        rows,
        exported_at: Local::now(),
    })
}

/// Follow a symlink at `path` so the rename replaces the file it points to.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    let is_link = fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink());
    if !is_link {
        return Ok(path.to_path_buf());
    }
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }

    // Dangling link: create the file it names.
    let link = fs::read_link(path)?;
    Ok(match path.parent() {
        Some(parent) if link.is_relative() => parent.join(link),
        _ => link,
    })
}

/// Create the staging file with the mode a plain create would give it, or
/// with the permissions of the file being replaced.
fn stage_file(dir: &Path, target: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".procwatch-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to the umask, like File::create.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder.tempfile_in(dir)?;

    if let Ok(existing) = fs::metadata(target) {
        if existing.is_file() {
            staged.as_file().set_permissions(existing.permissions())?;
        }
    }
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    fn full_record() -> RawRecord {
        raw(json!({
            "pid": 1234,
            "ppid": 1,
            "name": "nginx",
            "user": "www-data",
            "cpu_usage": 12.5,
            "memory_usage": 20480,
            "memory_percent": 0.25,
            "status": "sleeping",
            "threads": 4,
            "network_connections": 12,
            "is_container": true,
            "container_id": "abc123",
            "gpu_memory": 0,
            "command": "nginx -g daemon off;"
        }))
    }

    fn write_to_string(records: &[RawRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_lists_fourteen_columns_in_order() {
        let out = write_to_string(&[]);
        assert_eq!(
            out,
            "pid,ppid,name,user,cpu_usage,memory_usage,memory_percent,status,threads,network_connections,is_container,container_id,gpu_memory,command\n"
        );
    }

    #[test]
    fn test_full_record_row() {
        assert_eq!(
            project_row(&full_record()),
            vec![
                "1234",
                "1",
                "nginx",
                "www-data",
                "12.5",
                "20480",
                "0.25",
                "sleeping",
                "4",
                "12",
                "true",
                "abc123",
                "0",
                "nginx -g daemon off;"
            ]
        );
    }

    #[test]
    fn test_missing_and_null_fields_become_empty() {
        let row = project_row(&raw(json!({"pid": 7, "container_id": null})));
        assert_eq!(row.len(), CSV_COLUMNS.len());
        assert_eq!(row[0], "7");
        assert!(row[1..].iter().all(String::is_empty));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut record = full_record();
        record.insert("start_time".to_string(), json!(123456));
        record.insert("nice".to_string(), json!(-5));
        assert_eq!(project_row(&record), project_row(&full_record()));
    }

    #[test]
    fn test_state_used_when_status_missing() {
        let row = project_row(&raw(json!({"pid": 1, "state": "R"})));
        assert_eq!(row[7], "R");

        let row = project_row(&raw(json!({"pid": 1, "status": "running", "state": "R"})));
        assert_eq!(row[7], "running");
    }

    #[test]
    fn test_nested_values_render_as_json() {
        assert_eq!(cell_value(Some(&json!([1, 2]))), "[1,2]");
        assert_eq!(cell_value(Some(&json!({"a": 1}))), "{\"a\":1}");
        assert_eq!(cell_value(Some(&json!(false))), "false");
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let out = write_to_string(&[raw(json!({
            "pid": 1,
            "name": "a,b",
            "command": "say \"hi\"\nbye"
        }))]);
        let data = out.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert!(data.contains("\"a,b\""));
        assert!(data.contains("\"say \"\"hi\"\"\nbye\""));
    }

    #[test]
    fn test_one_row_per_record_in_input_order() {
        let records = vec![
            raw(json!({"pid": 30})),
            raw(json!({"pid": 10})),
            raw(json!({"pid": 20})),
        ];
        let out = write_to_string(&records);
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let pids: Vec<String> = reader
            .records()
            .map(|r| r.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(pids, vec!["30", "10", "20"]);
    }

    #[test]
    fn test_export_to_file_writes_and_reports() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.csv");

        let summary = export_to_file(&path, &[full_record(), raw(json!({"pid": 2}))]).unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.path, path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("pid,ppid,"));
    }

    #[test]
    fn test_export_to_file_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.csv");
        fs::write(&path, "old contents\nmore\nlines\nhere\n").unwrap();

        export_to_file(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(!content.contains("old contents"));
    }

    #[test]
    fn test_export_to_missing_directory_fails_without_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("snapshot.csv");

        let err = export_to_file(&path, &[full_record()]).unwrap_err();

        assert!(matches!(err, ProcwatchError::Export { .. }));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_export_leaves_previous_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        // A directory at the destination makes the final rename fail.
        let path = temp_dir.path().join("snapshot.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "previous").unwrap();

        let result = export_to_file(&path, &[full_record()]);

        assert!(result.is_err());
        assert!(path.is_dir());
        assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "previous");
        // Only the original entry remains; the staged file was cleaned up.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.csv");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        export_to_file(&path, &[full_record()]).unwrap();
        assert_eq!(mode_of(&path), 0o644);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        export_to_file(&path, &[full_record()]).unwrap();
        assert_eq!(mode_of(&path), 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_create_mode() {
        let temp_dir = TempDir::new().unwrap();
        let reference = temp_dir.path().join("plain.txt");
        fs::write(&reference, "").unwrap();
        let path = temp_dir.path().join("snapshot.csv");

        export_to_file(&path, &[full_record()]).unwrap();

        assert_eq!(mode_of(&path), mode_of(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_export_writes_through_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.csv");
        fs::write(&real, "old\n").unwrap();
        let link = temp_dir.path().join("snapshot.csv");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let summary = export_to_file(&link, &[full_record()]).unwrap();

        assert_eq!(summary.path, link);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let content = fs::read_to_string(&real).unwrap();
        assert!(content.starts_with("pid,ppid,"));
        assert_eq!(content.lines().count(), 2);
    }
}
