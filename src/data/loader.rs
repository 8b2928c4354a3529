use std::path::Path;

use encoding_rs::SHIFT_JIS;

use super::model::{Capture, ChannelMap};
use crate::error::{AnalysisError, Result};

/// Zero-based line of the column header; everything above is logger preamble.
pub const HEADER_LINE: usize = 41;

/// Trailing summary lines the logger appends after the samples.
pub const FOOTER_LINES: usize = 3;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one cycle capture.
///
/// File layout, as exported by the data logger:
/// * lines `0..41` – free-form acquisition preamble (ignored)
/// * line `41`     – column header
/// * sample rows, comma separated
/// * last 3 lines  – summary footer (ignored)
///
/// The whole file is Shift-JIS encoded.
pub fn load_capture(path: &Path, channels: &ChannelMap) -> Result<Capture> {
    let bytes = std::fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
    let (text, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        return Err(AnalysisError::malformed(path, "not valid Shift-JIS text"));
    }
    let capture = parse_capture(&text, path, channels)?;
    log::debug!("Loaded {} samples from {}", capture.len(), path.display());
    Ok(capture)
}

// ---------------------------------------------------------------------------
// Table parsing
// ---------------------------------------------------------------------------

/// Parse decoded capture text. `path` is only used for error reporting.
pub fn parse_capture(text: &str, path: &Path, channels: &ChannelMap) -> Result<Capture> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() < HEADER_LINE + 1 + FOOTER_LINES {
        return Err(AnalysisError::malformed(
            path,
            format!(
                "{} lines, expected a header at line {} and {FOOTER_LINES} footer lines",
                lines.len(),
                HEADER_LINE + 1
            ),
        ));
    }
    let table = lines[HEADER_LINE..lines.len() - FOOTER_LINES].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnalysisError::malformed(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::malformed(path, format!("missing column '{name}'")))
    };
    let t_idx = column(&channels.timestamp)?;
    let force_idx = column(&channels.force)?;
    let disp_idx = column(&channels.displacement)?;
    let hum_idx = column(&channels.humidity)?;
    let motor_idx = channels.motor.as_deref().map(column).transpose()?;

    let mut capture = Capture {
        path: path.to_path_buf(),
        motor: motor_idx.map(|_| Vec::new()),
        ..Default::default()
    };

    for (row_no, result) in reader.records().enumerate() {
        let line = HEADER_LINE + 2 + row_no;
        let record =
            result.map_err(|e| AnalysisError::malformed(path, format!("line {line}: {e}")))?;

        let cell = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(AnalysisError::malformed(
                    path,
                    format!("line {line}, column '{name}': '{raw}' is not a number"),
                )),
            }
        };

        capture.timestamps_us.push(cell(t_idx, &channels.timestamp)?);
        capture.force.push(cell(force_idx, &channels.force)?);
        capture.displacement.push(cell(disp_idx, &channels.displacement)?);
        capture.humidity.push(cell(hum_idx, &channels.humidity)?);
        if let (Some(idx), Some(name), Some(motor)) =
            (motor_idx, channels.motor.as_deref(), capture.motor.as_mut())
        {
            motor.push(cell(idx, name)?);
        }
    }

    Ok(capture)
}

// ---------------------------------------------------------------------------
// Writer (sample generation and tests)
// ---------------------------------------------------------------------------

/// Write `capture` in the logger's on-disk layout, Shift-JIS encoded.
///
/// The motor column is written only when both the channel map names one and
/// the capture carries it.
pub fn write_capture(path: &Path, channels: &ChannelMap, capture: &Capture) -> Result<()> {
    let mut text = String::new();
    text.push_str("ロガー出力,合成データ\n");
    for i in 1..HEADER_LINE {
        text.push_str(&format!("条件{i},\n"));
    }

    let motor = channels.motor.as_deref().zip(capture.motor.as_ref());

    let mut header = vec![
        channels.timestamp.as_str(),
        channels.force.as_str(),
        channels.displacement.as_str(),
    ];
    if let Some((name, _)) = motor {
        header.push(name);
    }
    header.push(channels.humidity.as_str());
    text.push_str(&header.join(","));
    text.push('\n');

    for i in 0..capture.len() {
        let mut row = vec![
            format!("{}", capture.timestamps_us[i]),
            format!("{}", capture.force[i]),
            format!("{}", capture.displacement[i]),
        ];
        if let Some((_, values)) = motor {
            row.push(format!("{}", values[i]));
        }
        row.push(format!("{}", capture.humidity[i]));
        text.push_str(&row.join(","));
        text.push('\n');
    }

    text.push_str("最大,,,\n最小,,,\n平均,,,\n");

    let (bytes, _, _) = SHIFT_JIS.encode(&text);
    std::fs::write(path, bytes).map_err(|e| AnalysisError::io(path, e))
}
