use chrono::NaiveDate;
use levelscope_application::analysis::{analyze, analyze_symbol, AnalysisOptions, LabeledChart};
use levelscope_application::config::{load_config, Config};
use levelscope_domain::repositories::market_data::BarQuery;
use levelscope_domain::services::weekly::WeeklyWindow;
use levelscope_domain::value_objects::raw_bar::RawBar;
use levelscope_infrastructure::market_data::{load_csv, load_json, FileMarketData};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Symbol { symbol: String, data_dir: PathBuf },
}

#[derive(Debug, Clone)]
pub struct AnalyzeCommand {
    pub source: Source,
    pub config: Option<PathBuf>,
    pub weekly: bool,
    pub as_of: Option<String>,
    pub pretty: bool,
}

/// Runs one analysis and renders it as JSON.
pub fn execute(command: &AnalyzeCommand) -> Result<String, String> {
    let config = match &command.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let options = resolve_options(&config, command)?;
    let layout = config.layout_options()?;

    let analysis = match &command.source {
        Source::File(path) => {
            let raw = load_bar_file(path)?;
            analyze(&raw, &options)
                .map_err(|err| format!("analysis of {} failed: {}", path.display(), err))?
        }
        Source::Symbol { symbol, data_dir } => {
            let repository = FileMarketData::new(data_dir);
            let query = BarQuery {
                symbol: symbol.clone(),
            };
            analyze_symbol(&repository, &query, &options)?
        }
    };

    let charted = analysis
        .with_labels(&layout)
        .map_err(|err| format!("label layout failed: {err}"))?;
    render(&charted, command.pretty)
}

fn resolve_options(config: &Config, command: &AnalyzeCommand) -> Result<AnalysisOptions, String> {
    let mut options = config.analysis_options();
    if command.weekly && options.weekly.is_none() {
        options.weekly = Some(WeeklyWindow::default());
    }
    if let Some(raw) = &command.as_of {
        let as_of = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|err| format!("invalid --as-of {raw:?} (expected YYYY-MM-DD): {err}"))?;
        match options.weekly.as_mut() {
            Some(window) => window.as_of = Some(as_of),
            None => tracing::warn!(%as_of, "--as-of only applies to the weekly view; ignoring"),
        }
    }
    Ok(options)
}

fn load_bar_file(path: &Path) -> Result<Vec<RawBar>, String> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv(path)
    } else {
        load_json(path)
    }
}

fn render(charted: &LabeledChart, pretty: bool) -> Result<String, String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(charted)
    } else {
        serde_json::to_string(charted)
    };
    rendered.map_err(|err| format!("failed to serialize analysis: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{execute, AnalyzeCommand, Source};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_tmp_dir(name: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!(
            "levelscope_cli_{name}_{}_{}",
            std::process::id(),
            now
        ));
        fs::create_dir_all(&dir).expect("create tmp dir");
        dir
    }

    const CSV: &str = "Date,Open,High,Low,Close,Volume\n\
2024-03-01,12.0,12.5,11.5,12.2,1000\n\
2024-03-04,11.0,11.2,10.0,10.8,1200\n\
2024-03-05,10.8,14.0,10.6,13.5,3000\n\
2024-03-06,13.5,13.8,12.9,13.0,1800\n\
2024-03-07,13.0,13.4,12.5,13.1,900\n";

    fn command(source: Source) -> AnalyzeCommand {
        AnalyzeCommand {
            source,
            config: None,
            weekly: false,
            as_of: None,
            pretty: false,
        }
    }

    #[test]
    fn analyzes_a_csv_file() {
        let dir = unique_tmp_dir("csv");
        let path = dir.join("acme.csv");
        fs::write(&path, CSV).expect("write csv");

        let output = execute(&command(Source::File(path))).expect("execute");
        let _ = fs::remove_dir_all(&dir);

        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["extrema"]["lowest_low"]["index"], 1);
        assert_eq!(value["levels"].as_array().map(|l| l.len()), Some(9));
        assert_eq!(value["labels"].as_array().map(|l| l.len()), Some(9));
    }

    #[test]
    fn analyzes_a_symbol_with_weekly_view_and_config() {
        let dir = unique_tmp_dir("symbol");
        fs::write(dir.join("ACME.csv"), CSV).expect("write csv");
        let config_path = dir.join("levelscope.toml");
        fs::write(&config_path, "[layout]\nmin_spacing_px = 20.0\n").expect("write config");

        let mut cmd = command(Source::Symbol {
            symbol: "ACME".to_string(),
            data_dir: dir.clone(),
        });
        cmd.config = Some(config_path);
        cmd.weekly = true;
        cmd.as_of = Some("2024-03-03".to_string());
        let output = execute(&cmd).expect("execute");
        let _ = fs::remove_dir_all(&dir);

        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        let weeks = value["weekly"].as_array().expect("weekly present");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0]["volume"], 1000);
    }

    #[test]
    fn bad_as_of_is_rejected() {
        let mut cmd = command(Source::File(PathBuf::from("/nonexistent/bars.json")));
        cmd.weekly = true;
        cmd.as_of = Some("03/03/2024".to_string());
        let err = execute(&cmd).expect_err("bad date");
        assert!(err.contains("--as-of"));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let err = execute(&command(Source::File(PathBuf::from("/nonexistent/bars.json"))))
            .expect_err("missing file");
        assert!(err.contains("/nonexistent/bars.json"));
    }
}
