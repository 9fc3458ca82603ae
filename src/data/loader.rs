use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ChartError, Result};
use crate::state::data_series::ScenarioSeries;

/// Load aligned scenario series from a CSV file.
///
/// The first row is a header: an age column followed by one column per
/// scenario, whose header cell becomes the series label. Every following row
/// holds an age and one count per scenario.
pub fn load_csv(path: &Path) -> Result<Vec<ScenarioSeries>> {
    let file = std::fs::File::open(path)?;
    let series = read_series(file)?;
    tracing::info!(
        "Loaded {} scenario series from {:?}",
        series.len(),
        path
    );
    for s in &series {
        tracing::debug!(
            "series '{}': {} ages, largest count {:?}",
            s.label,
            s.len(),
            s.max_count()
        );
    }
    Ok(series)
}

/// Read aligned scenario series from any CSV source.
pub fn read_series<R: Read>(source: R) -> Result<Vec<ScenarioSeries>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(ChartError::EmptyInput("CSV needs an age column and at least one scenario column"));
    }
    let age_column = headers[0].to_string();
    let mut series: Vec<ScenarioSeries> = headers
        .iter()
        .skip(1)
        .map(ScenarioSeries::new)
        .collect();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        // header is row 1
        let row = row_idx + 2;
        let age_cell = record.get(0).unwrap_or_default();
        let age = age_cell.parse::<u32>().map_err(|_| ChartError::InvalidValue {
            row,
            column: age_column.clone(),
            value: age_cell.to_string(),
        })?;

        for (col_idx, s) in series.iter_mut().enumerate() {
            let cell = record.get(col_idx + 1).unwrap_or_default();
            let count = parse_count(cell).ok_or_else(|| ChartError::InvalidValue {
                row,
                column: s.label.clone(),
                value: cell.to_string(),
            })?;
            s.insert(age, count);
        }
    }

    Ok(series)
}

fn parse_count(cell: &str) -> Option<Decimal> {
    if cell.is_empty() {
        return None;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()
}
