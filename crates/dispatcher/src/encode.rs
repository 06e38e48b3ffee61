//! Delimited-text encoding of merged tables and resampled series

use std::io::Write;

use contracts::{ContractError, FieldValue, MergedTable, UniformSeries};

/// Render a number the way a JavaScript `String(n)` would for the values
/// this pipeline produces: integral values without a trailing `.0`, negative
/// zero as `0`, non-finite values as `NaN` / `Infinity` / `-Infinity`.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

fn field_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(v) => format_number(*v),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Null => String::new(),
    }
}

fn encode_error(e: impl std::fmt::Display) -> ContractError {
    ContractError::Other(format!("csv encode error: {e}"))
}

/// Write `table` as CSV: header row in column order, one line per record,
/// nulls as empty fields.
pub fn write_csv<W: Write>(table: &MergedTable, writer: W) -> Result<(), ContractError> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);

    out.write_record(table.columns()).map_err(encode_error)?;
    for row in table.rows() {
        out.write_record(row.iter().map(field_text))
            .map_err(encode_error)?;
    }
    out.flush()?;
    Ok(())
}

/// CSV text of `table`
pub fn encode_csv(table: &MergedTable) -> Result<String, ContractError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(encode_error)
}

/// Write a resampled series as CSV: `time_column` followed by every
/// resampled channel, times in full precision
pub fn write_series_csv<W: Write>(
    series: &UniformSeries,
    time_column: &str,
    writer: W,
) -> Result<(), ContractError> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);

    let header = std::iter::once(time_column).chain(series.channels().iter().map(|c| c.name.as_str()));
    out.write_record(header).map_err(encode_error)?;

    for (i, t) in series.time.iter().enumerate() {
        let record = std::iter::once(format_number(*t)).chain(
            series
                .channels()
                .iter()
                .map(|c| c.values[i].map(format_number).unwrap_or_default()),
        );
        out.write_record(record).map_err(encode_error)?;
    }
    out.flush()?;
    Ok(())
}
