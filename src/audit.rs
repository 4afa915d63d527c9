use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append an entry to the audit log kept next to the data files
///
/// Every mutating taxonomy operation is recorded here with a timestamp.
pub fn log(data_dir: &Path, entry: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join("audit.log");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        entry
    )?;
    Ok(())
}
