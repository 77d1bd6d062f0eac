use levelscope_domain::value_objects::raw_bar::RawBar;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a JSON array of bar objects (`date`/`Date`, `open`/`Open`, ...).
pub fn load_json(path: &Path) -> Result<Vec<RawBar>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open bars JSON {}: {}", path.display(), err))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("failed to parse bars JSON {}: {}", path.display(), err))
}

/// Reads a headed CSV (`Date,Open,High,Low,Close,Volume`). Extra columns are ignored.
pub fn load_csv(path: &Path) -> Result<Vec<RawBar>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open bars CSV {}: {}", path.display(), err))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<RawBar>().enumerate() {
        let record = result.map_err(|err| {
            format!(
                "failed to parse CSV row {} in {}: {}",
                line + 1,
                path.display(),
                err
            )
        })?;
        rows.push(record);
    }
    Ok(rows)
}
