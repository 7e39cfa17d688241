use crate::models::{Line, OutcomeRange, ValidationIssue};
use crate::LineAnalysis;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load lines from a JSON or CSV file, picked by extension
pub fn load_lines(path: &Path) -> Result<Vec<Line>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_lines_from_json(path),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_lines_from_csv(path),
        _ => bail!(
            "Unsupported lines file {:?}, expected a .json or .csv file",
            path
        ),
    }
}

/// Load lines from a JSON array of `{direction, threshold, odds}` objects
pub fn load_lines_from_json(path: &Path) -> Result<Vec<Line>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lines file {:?}", path))?;
    let lines: Vec<Line> =
        serde_json::from_str(&json).context("Failed to deserialize lines JSON")?;
    Ok(lines)
}

/// Load lines from a CSV file with a `direction,threshold,odds` header
pub fn load_lines_from_csv(path: &Path) -> Result<Vec<Line>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open lines file {:?}", path))?;

    let mut lines = Vec::new();
    for (i, record) in reader.deserialize::<Line>().enumerate() {
        // Row numbers are 1-based and skip the header
        let line = record.with_context(|| format!("Invalid line on row {}", i + 2))?;
        lines.push(line);
    }
    Ok(lines)
}

/// Save outcome ranges to CSV
pub fn save_ranges_to_csv(ranges: &[OutcomeRange], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV file")?;

    writer.write_record(["Outcome", "Min", "Max", "Probability (%)", "Fair Odds"])?;

    for range in ranges {
        writer.write_record([
            range.label.clone(),
            range.min.map(|v| v.to_string()).unwrap_or_default(),
            range.max.map(|v| v.to_string()).unwrap_or_default(),
            format!("{:.2}", range.probability * 100.0),
            range
                .fair_odds()
                .map(|odds| format!("{:+}", odds))
                .unwrap_or_default(),
        ])?;
    }

    writer.flush().context("Failed to write CSV file")?;
    Ok(())
}

/// Save validation issues to CSV
pub fn save_issues_to_csv(issues: &[ValidationIssue], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV file")?;

    writer.write_record(["Severity", "Kind", "Message", "Margin (%)"])?;

    for issue in issues {
        writer.write_record([
            issue.severity.to_string(),
            issue.kind.to_string(),
            issue.message.clone(),
            issue
                .margin
                .map(|m| format!("{:.2}", m * 100.0))
                .unwrap_or_default(),
        ])?;
    }

    writer.flush().context("Failed to write CSV file")?;
    Ok(())
}

/// Save a full analysis as pretty JSON
pub fn save_analysis_to_json(analysis: &LineAnalysis, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(analysis).context("Failed to serialize analysis")?;
    std::fs::write(path, json).context("Failed to write analysis file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;
    use crate::models::Direction;

    #[test]
    fn test_load_lines_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.json");
        std::fs::write(
            &path,
            r#"[
                {"direction": "over", "threshold": 25.5, "odds": -110},
                {"direction": "Under", "threshold": 27.5, "odds": 150}
            ]"#,
        )
        .unwrap();

        let lines = load_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Line::over(25.5, -110).unwrap());
        assert_eq!(lines[1].direction, Direction::Under);
    }

    #[test]
    fn test_load_lines_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.csv");
        std::fs::write(
            &path,
            "direction,threshold,odds\nover,28.5,-110\nOver, 29.5, 150\n",
        )
        .unwrap();

        let lines = load_lines(&path).unwrap();
        assert_eq!(
            lines,
            vec![
                Line::over(28.5, -110).unwrap(),
                Line::over(29.5, 150).unwrap()
            ]
        );
    }

    #[test]
    fn test_load_lines_rejects_zero_odds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.csv");
        std::fs::write(&path, "direction,threshold,odds\nover,28.5,0\n").unwrap();

        let err = load_lines(&path).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_load_lines_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "").unwrap();
        assert!(load_lines(&path).is_err());
    }

    #[test]
    fn test_save_results() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analyze(&[
            Line::over(30.0, -120).unwrap(),
            Line::under(30.0, -120).unwrap(),
        ]);

        let ranges_path = dir.path().join("ranges.csv");
        save_ranges_to_csv(&analysis.ranges, &ranges_path).unwrap();
        let ranges_csv = std::fs::read_to_string(&ranges_path).unwrap();
        let rows: Vec<&str> = ranges_csv.lines().collect();
        assert_eq!(rows[0], "Outcome,Min,Max,Probability (%),Fair Odds");
        assert_eq!(rows[1], "≤30,,30,50.00,-100");
        assert_eq!(rows.len(), 3);

        let issues_path = dir.path().join("issues.csv");
        save_issues_to_csv(&analysis.validation.issues, &issues_path).unwrap();
        let issues_csv = std::fs::read_to_string(&issues_path).unwrap();
        assert!(issues_csv.contains("info,vig,"));
        assert!(issues_csv.contains(",9.09"));

        let json_path = dir.path().join("analysis.json");
        save_analysis_to_json(&analysis, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["validation"]["is_valid"], serde_json::json!(true));
        assert_eq!(value["ranges"].as_array().unwrap().len(), 2);
    }
}
