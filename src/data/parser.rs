use std::ops::RangeInclusive;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};

use crate::config::FormatConfig;
use crate::error::ParseError;

use super::model::{
    AbsorbanceSpectrumDataset, AcquisitionMode, Dataset, HeaderBlock, HeaderValue, InstrumentInfo,
    MeltingCurveDataset, SpectrumDataset, TemperatureSeriesDataset,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse raw export text under the declared acquisition mode.
///
/// Pure function of its inputs; the only side effects are `log` diagnostics.
pub fn parse(text: &str, mode: AcquisitionMode, config: &FormatConfig) -> Result<Dataset, ParseError> {
    match mode {
        AcquisitionMode::SingleSpectrum => {
            parse_spectrum(text, config).map(Dataset::SingleSpectrum)
        }
        AcquisitionMode::TemperatureRamp => {
            parse_temperature_ramp(text, config).map(Dataset::TemperatureRamp)
        }
        AcquisitionMode::MeltingCurve => {
            parse_melting_curve(text, config).map(Dataset::MeltingCurve)
        }
        AcquisitionMode::Absorbance => parse_absorbance(text, config).map(Dataset::Absorbance),
    }
}

/// Like [`parse`], with the mode given as its selector string
/// (`"single_spectrum"`, `"temperature_ramp"`, `"melting_curve"`,
/// `"absorbance"`). Unknown selectors fail with
/// [`ParseError::UnsupportedMode`] before the text is looked at.
pub fn parse_named(text: &str, mode: &str, config: &FormatConfig) -> Result<Dataset, ParseError> {
    let mode: AcquisitionMode = mode.parse()?;
    parse(text, mode, config)
}

/// Parse a single CD spectrum export (`wavelength;CD[;HT[;Abs]]` rows).
pub fn parse_spectrum(text: &str, config: &FormatConfig) -> Result<SpectrumDataset, ParseError> {
    let rows = read_rows(text, config)?;
    let block = parse_xy_block(&rows, 2..=4, config)?;
    let mut cols = block.columns.into_iter();
    let wavelength = cols.next().unwrap_or_default();
    let signal = cols.next().unwrap_or_default();
    let ht = cols.next();
    let absorbance = cols.next();
    let data_pitch = unit_value(&block.metadata, &config.data_pitch_key, config);

    debug!(
        "parsed spectrum {:?}: {} points",
        block.info.title(),
        wavelength.len()
    );
    Ok(SpectrumDataset {
        info: block.info,
        metadata: block.metadata,
        wavelength,
        signal,
        ht,
        absorbance,
        data_pitch,
    })
}

/// Parse a melting-curve export (`temperature;CD[;HT[;Abs]]` rows).
pub fn parse_melting_curve(
    text: &str,
    config: &FormatConfig,
) -> Result<MeltingCurveDataset, ParseError> {
    let rows = read_rows(text, config)?;
    let block = parse_xy_block(&rows, 2..=4, config)?;
    let mut cols = block.columns.into_iter();
    let temperature = cols.next().unwrap_or_default();
    let signal = cols.next().unwrap_or_default();
    let ht = cols.next();
    let absorbance = cols.next();
    let monitor_wavelength = unit_value(&block.metadata, &config.monitor_wavelength_key, config);

    debug!(
        "parsed melting curve {:?}: {} points at {:?} nm",
        block.info.title(),
        temperature.len(),
        monitor_wavelength
    );
    Ok(MeltingCurveDataset {
        info: block.info,
        metadata: block.metadata,
        temperature,
        signal,
        ht,
        absorbance,
        monitor_wavelength,
    })
}

/// Parse an absorbance spectrum export (`wavelength;Abs` rows).
pub fn parse_absorbance(
    text: &str,
    config: &FormatConfig,
) -> Result<AbsorbanceSpectrumDataset, ParseError> {
    let rows = read_rows(text, config)?;
    let block = parse_xy_block(&rows, 2..=2, config)?;
    let mut cols = block.columns.into_iter();
    let wavelength = cols.next().unwrap_or_default();
    let absorbance = cols.next().unwrap_or_default();
    let data_pitch = unit_value(&block.metadata, &config.data_pitch_key, config);

    debug!(
        "parsed absorbance spectrum {:?}: {} points",
        block.info.title(),
        wavelength.len()
    );
    Ok(AbsorbanceSpectrumDataset {
        info: block.info,
        metadata: block.metadata,
        wavelength,
        absorbance,
        data_pitch,
    })
}

/// Parse a temperature-interval export: a `Channel 1` signal matrix and a
/// `Channel 2` HT matrix, wavelength rows by temperature columns.
pub fn parse_temperature_ramp(
    text: &str,
    config: &FormatConfig,
) -> Result<TemperatureSeriesDataset, ParseError> {
    let rows = read_rows(text, config)?;
    let (info, start) = parse_header(&rows, &config.channel1_marker, config)?;

    // Temperature axis: header row right after the channel marker, with an
    // empty lead cell over the wavelength index column.
    let header = rows
        .get(start)
        .ok_or_else(|| ParseError::malformed(last_line(&rows), "missing temperature header row"))?;
    let temperatures = parse_axis_header(header, config)?;
    let n_temps = temperatures.len();
    if !is_strictly_monotonic(&temperatures) {
        return Err(ParseError::malformed(
            header.line,
            "temperature axis is not strictly increasing or decreasing",
        ));
    }

    // Signal rows until the second channel marker.
    let mut wavelength: Vec<f64> = Vec::new();
    let mut signal_rows: Vec<Vec<f64>> = Vec::new();
    let mut idx = start + 1;
    let mut saw_channel2 = false;
    while let Some(row) = rows.get(idx) {
        idx += 1;
        if row.key() == config.channel2_marker {
            saw_channel2 = true;
            break;
        }
        let (wv, values) = parse_matrix_row(row, n_temps, config)?;
        wavelength.push(wv);
        signal_rows.push(values);
    }
    if !saw_channel2 {
        return Err(ParseError::malformed(
            last_line(&rows),
            format!("missing {:?} marker", config.channel2_marker),
        ));
    }

    // HT block: its own header row, then rows over the same wavelength axis.
    let ht_header = rows
        .get(idx)
        .ok_or_else(|| ParseError::malformed(last_line(&rows), "missing HT header row"))?;
    let ht_temps = parse_axis_header(ht_header, config)?;
    if ht_temps.len() != n_temps {
        return Err(ParseError::malformed(
            ht_header.line,
            format!(
                "HT block has {} temperature columns, signal block has {n_temps}",
                ht_temps.len()
            ),
        ));
    }
    idx += 1;

    let mut ht_rows: Vec<Vec<f64>> = Vec::new();
    while let Some(row) = rows.get(idx) {
        idx += 1;
        if row.key() == config.extended_marker {
            break;
        }
        let (wv, values) = parse_matrix_row(row, n_temps, config)?;
        match wavelength.get(ht_rows.len()) {
            Some(&w) if (w - wv).abs() <= 1e-9 => {}
            _ => {
                return Err(ParseError::malformed(
                    row.line,
                    format!("HT wavelength {wv} does not match the signal axis"),
                ));
            }
        }
        ht_rows.push(values);
    }
    if ht_rows.len() != signal_rows.len() {
        return Err(ParseError::malformed(
            last_line(&rows),
            format!(
                "HT block has {} rows, signal block has {}",
                ht_rows.len(),
                signal_rows.len()
            ),
        ));
    }

    if signal_rows.is_empty() {
        warn!("temperature-interval export {:?} has no data rows", info.title());
    }

    let delta_x = unit_value(&info.fields, &config.delta_x_key, config).map(f64::abs);
    let signal = transpose(&signal_rows, n_temps);
    let ht = transpose(&ht_rows, n_temps);

    debug!(
        "parsed temperature ramp {:?}: {n_temps} temperatures x {} wavelengths",
        info.title(),
        wavelength.len()
    );
    Ok(TemperatureSeriesDataset {
        info,
        wavelength,
        temperatures,
        signal,
        ht,
        delta_x,
    })
}

// ---------------------------------------------------------------------------
// Raw record access
// ---------------------------------------------------------------------------

/// One record of the export with its 1-based line number.
struct Row {
    line: u64,
    rec: StringRecord,
}

impl Row {
    fn field(&self, idx: usize) -> &str {
        self.rec.get(idx).unwrap_or("")
    }

    /// First field, trimmed: section markers and `key;value` keys live here.
    fn key(&self) -> &str {
        self.field(0).trim()
    }

    fn width(&self) -> usize {
        self.rec.len()
    }
}

fn read_rows(text: &str, config: &FormatConfig) -> Result<Vec<Row>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let fallback = idx as u64 + 1;
        let rec = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(fallback);
            ParseError::malformed(line, format!("unreadable record: {e}"))
        })?;
        let line = rec.position().map(|p| p.line()).unwrap_or(fallback);
        rows.push(Row { line, rec });
    }
    Ok(rows)
}

fn last_line(rows: &[Row]) -> u64 {
    rows.last().map(|r| r.line).unwrap_or(1)
}

// ---------------------------------------------------------------------------
// Shared header parsing (title record + key;value info block)
// ---------------------------------------------------------------------------

/// Parse the title record and the info block up to `stop_marker`. Returns
/// the info and the index of the row after the marker.
fn parse_header(
    rows: &[Row],
    stop_marker: &str,
    config: &FormatConfig,
) -> Result<(InstrumentInfo, usize), ParseError> {
    let first = rows
        .first()
        .ok_or_else(|| ParseError::malformed(1, "empty file"))?;
    if first.key() != config.title_key {
        return Err(ParseError::malformed(
            first.line,
            format!(
                "expected {:?} header record, found {:?}",
                config.title_key,
                first.key()
            ),
        ));
    }
    let mut info = InstrumentInfo {
        title: first.field(1).trim().to_string(),
        fields: HeaderBlock::new(),
    };

    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.key() == stop_marker {
            return Ok((info, i + 1));
        }
        if row.width() >= 2 {
            info.fields
                .insert(row.key().to_string(), HeaderValue::guess(row.field(1), config));
        } else {
            debug!("line {}: info record {:?} has no value", row.line, row.key());
        }
    }
    Err(ParseError::malformed(
        last_line(rows),
        format!("missing {stop_marker:?} marker"),
    ))
}

// ---------------------------------------------------------------------------
// XY layout (single spectrum, melting curve, absorbance)
// ---------------------------------------------------------------------------

struct XyBlock {
    info: InstrumentInfo,
    metadata: HeaderBlock,
    /// Column-major numeric data; `columns.len()` is the row width.
    columns: Vec<Vec<f64>>,
}

fn parse_xy_block(
    rows: &[Row],
    allowed_widths: RangeInclusive<usize>,
    config: &FormatConfig,
) -> Result<XyBlock, ParseError> {
    let (info, start) = parse_header(rows, &config.data_marker, config)?;

    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut metadata = HeaderBlock::new();
    let mut in_extended = false;

    for row in &rows[start..] {
        if !in_extended {
            if row.key() == config.extended_marker {
                in_extended = true;
                continue;
            }
            push_data_row(row, &mut columns, &allowed_widths, config)?;
        } else {
            let key = row.key();
            if key.starts_with('[') && key.ends_with(']') {
                debug!("line {}: skipping metadata section heading {key:?}", row.line);
                continue;
            }
            if row.width() < 2 {
                continue;
            }
            metadata.insert(key.to_string(), HeaderValue::guess(row.field(1), config));
        }
    }

    if columns.is_empty() {
        warn!("export {:?} has no data rows", info.title());
        columns = vec![Vec::new(); *allowed_widths.start()];
    }
    Ok(XyBlock {
        info,
        metadata,
        columns,
    })
}

fn push_data_row(
    row: &Row,
    columns: &mut Vec<Vec<f64>>,
    allowed_widths: &RangeInclusive<usize>,
    config: &FormatConfig,
) -> Result<(), ParseError> {
    if columns.is_empty() {
        let width = row.width();
        if !allowed_widths.contains(&width) {
            let (lo, hi) = (allowed_widths.start(), allowed_widths.end());
            let expected = if lo == hi {
                format!("{lo} columns")
            } else {
                format!("{lo} to {hi} columns")
            };
            return Err(ParseError::malformed(
                row.line,
                format!("expected {expected}, found {width}"),
            ));
        }
        *columns = vec![Vec::new(); width];
    } else if row.width() != columns.len() {
        return Err(ParseError::malformed(
            row.line,
            format!(
                "inconsistent column count: expected {}, found {}",
                columns.len(),
                row.width()
            ),
        ));
    }

    for (col, cell) in row.rec.iter().enumerate() {
        let value = config.parse_number(cell).ok_or_else(|| {
            ParseError::malformed(
                row.line,
                format!("column {}: {:?} is not a number", col + 1, cell.trim()),
            )
        })?;
        columns[col].push(value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Matrix layout helpers (temperature-interval exports)
// ---------------------------------------------------------------------------

/// Header row of a channel block: empty lead cell, then the numeric axis.
fn parse_axis_header(row: &Row, config: &FormatConfig) -> Result<Vec<f64>, ParseError> {
    if row.width() < 2 {
        return Err(ParseError::malformed(
            row.line,
            "channel header row has no temperature columns",
        ));
    }
    if !row.key().is_empty() {
        debug!(
            "line {}: channel header lead cell is {:?}, expected empty",
            row.line,
            row.key()
        );
    }
    row.rec
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, cell)| {
            config.parse_number(cell).ok_or_else(|| {
                ParseError::malformed(
                    row.line,
                    format!("column {}: {:?} is not a number", i + 2, cell.trim()),
                )
            })
        })
        .collect()
}

/// One matrix row: wavelength in the lead cell, one value per temperature.
fn parse_matrix_row(
    row: &Row,
    n_temps: usize,
    config: &FormatConfig,
) -> Result<(f64, Vec<f64>), ParseError> {
    if row.width() != n_temps + 1 {
        return Err(ParseError::malformed(
            row.line,
            format!(
                "inconsistent column count: expected {}, found {}",
                n_temps + 1,
                row.width()
            ),
        ));
    }
    let mut values = Vec::with_capacity(n_temps + 1);
    for (col, cell) in row.rec.iter().enumerate() {
        let value = config.parse_number(cell).ok_or_else(|| {
            ParseError::malformed(
                row.line,
                format!("column {}: {:?} is not a number", col + 1, cell.trim()),
            )
        })?;
        values.push(value);
    }
    let wv = values.remove(0);
    Ok((wv, values))
}

fn is_strictly_monotonic(axis: &[f64]) -> bool {
    if axis.len() < 2 {
        return true;
    }
    axis.windows(2).all(|w| w[1] > w[0]) || axis.windows(2).all(|w| w[1] < w[0])
}

/// Row-major (per wavelength) to column-major (per temperature).
fn transpose(rows: &[Vec<f64>], n_cols: usize) -> Vec<Vec<f64>> {
    (0..n_cols)
        .map(|c| rows.iter().map(|r| r[c]).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Well-known metadata values with unit suffixes ("0,1 nm", "100 nm/min")
// ---------------------------------------------------------------------------

/// Read a numeric metadata value, tolerating a trailing unit. Takes the
/// leading numeric run of the cell, so `"0,1 nm"` yields `0.1`.
fn unit_value(block: &HeaderBlock, key: &str, config: &FormatConfig) -> Option<f64> {
    match block.get(key)? {
        HeaderValue::Float(v) => Some(*v),
        HeaderValue::Integer(i) => Some(*i as f64),
        HeaderValue::String(s) => {
            let numeric: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | ',' | '.'))
                .collect();
            config.parse_number(&numeric)
        }
        HeaderValue::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CD_SPECTRUM: &str = "\
TITLE;Lysozyme far-UV
DATA TYPE;
ORIGIN;JASCO
OWNER;
DATE;24/03/15
TIME;14:05:22
SPECTROMETER/DATA SYSTEM;J-810
XUNITS;NANOMETERS
YUNITS;CD [mdeg]
Y2UNITS;HT [V]
FIRSTX;260,0
LASTX;250,0
NPOINTS;3
XYDATA
260,0;-1,23;245,6
255,0;-2,5;250,1
250,0;-3,75;255,9
##### Extended Information
[Comments]
Sample name;lysozyme
[Detailed Information]
Data pitch;5 nm
Scanning speed;100 nm/min
Band width;1 nm
";

    const MELTING_CURVE: &str = "\
TITLE;Unfolding at 222 nm
XUNITS;Temperature [C]
YUNITS;CD [mdeg]
Y2UNITS;HT [V]
XYDATA
20,0;-10,5;301,2
30,0;-9,8;303,4
40,0;-7,1;305,0
50,0;-3,2;307,9
##### Extended Information
Monitor wavelength;222 nm
Temperature gradient;1 C/min
";

    const ABS_SPECTRUM: &str = "\
TITLE;Protein scan
XUNITS;NANOMETERS
YUNITS;ABSORBANCE
XYDATA
340,0;0,012
320,0;0,034
300,0;0,21
280,0;0,58
260,0;0,33
##### Extended Information
Data pitch;20 nm
";

    const RAMP: &str = "\
TITLE;Thermal unfolding
DELTAX;-1,0
XUNITS;NANOMETERS
YUNITS;CD [mdeg]
Channel 1
;25,0;45,0;65,0
222,0;-10,0;-7,5;-3,0
221,0;-10,2;-7,6;-3,1
220,0;-10,4;-7,7;-3,2
Channel 2
;25,0;45,0;65,0
222,0;300,0;310,0;320,0
221,0;301,0;311,0;321,0
220,0;302,0;312,0;322,0
";

    fn cfg() -> FormatConfig {
        FormatConfig::default()
    }

    #[test]
    fn spectrum_point_count_matches_data_rows() {
        let ds = parse_spectrum(CD_SPECTRUM, &cfg()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.info().title(), "Lysozyme far-UV");
        assert_eq!(ds.points().next(), Some((260.0, -1.23)));
        assert_eq!(ds.points().last(), Some((250.0, -3.75)));
        assert_eq!(ds.ht(), Some(&[245.6, 250.1, 255.9][..]));
        assert_eq!(ds.absorbance(), None);
        assert_eq!(ds.wv_min(), Some(250.0));
        assert_eq!(ds.wv_max(), Some(260.0));
        assert_eq!(ds.data_pitch(), Some(5.0));
        assert_eq!(
            ds.info().x_units(),
            Some(&HeaderValue::String("NANOMETERS".to_string()))
        );
        assert_eq!(ds.info().timestamp().unwrap(), "24/03/15 14:05:22");
    }

    #[test]
    fn missing_data_marker_is_malformed() {
        let text = CD_SPECTRUM.replace("XYDATA\n", "");
        let err = parse_spectrum(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { message, .. } => {
                assert!(message.contains("XYDATA"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn missing_title_is_malformed() {
        let text = CD_SPECTRUM.replace("TITLE;", "NOTES;");
        let err = parse_spectrum(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("TITLE"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn inconsistent_row_width_is_malformed() {
        // Second data row (line 16) loses its HT cell.
        let text = CD_SPECTRUM.replace("255,0;-2,5;250,1", "255,0;-2,5");
        let err = parse_spectrum(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { line, message } => {
                assert_eq!(line, 16);
                assert!(message.contains("inconsistent column count"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let text = CD_SPECTRUM.replace("250,1", "n/a");
        let err = parse_spectrum(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { line, message } => {
                assert_eq!(line, 16);
                assert!(message.contains("\"n/a\" is not a number"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn melting_curve_monitor_wavelength() {
        let ds = parse_melting_curve(MELTING_CURVE, &cfg()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.monitor_wavelength(), Some(222.0));
        assert_eq!(ds.temp_min(), Some(20.0));
        assert_eq!(ds.temp_max(), Some(50.0));
        assert_eq!(ds.points().next(), Some((20.0, -10.5)));
    }

    #[test]
    fn absorbance_spectrum() {
        let ds = parse_absorbance(ABS_SPECTRUM, &cfg()).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.points().nth(3), Some((280.0, 0.58)));
        assert_eq!(ds.data_pitch(), Some(20.0));
    }

    #[test]
    fn absorbance_rejects_extra_channels() {
        // A 3-column CD export is not an absorbance layout.
        let err = parse_absorbance(CD_SPECTRUM, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { message, .. } => {
                assert!(message.contains("expected 2 columns, found 3"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn ramp_has_one_entry_per_temperature_column() {
        let ds = parse_temperature_ramp(RAMP, &cfg()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.temperatures(), &[25.0, 45.0, 65.0]);
        assert_eq!(ds.wavelength(), &[222.0, 221.0, 220.0]);
        assert_eq!(ds.signal()[0], vec![-10.0, -10.2, -10.4]);
        assert_eq!(ds.signal()[2], vec![-3.0, -3.1, -3.2]);
        assert_eq!(ds.ht()[1], vec![310.0, 311.0, 312.0]);
        assert_eq!(ds.delta_x(), Some(1.0));
        assert_eq!(ds.triples().count(), 9);

        // Every temperature entry shares the wavelength axis.
        for i in 0..ds.len() {
            let sp = ds.spectrum_at(i).unwrap();
            assert_eq!(sp.wavelength(), ds.wavelength());
            assert_eq!(sp.len(), 3);
        }
    }

    #[test]
    fn ramp_requires_second_channel() {
        let text = RAMP.split("Channel 2").next().unwrap().to_string();
        let err = parse_temperature_ramp(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { message, .. } => {
                assert!(message.contains("Channel 2"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn ramp_temperatures_must_be_monotonic() {
        let text = RAMP.replace(";25,0;45,0;65,0\n222,0;-10,0", ";25,0;65,0;45,0\n222,0;-10,0");
        let err = parse_temperature_ramp(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { message, .. } => {
                assert!(message.contains("monotonic") || message.contains("increasing"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn ramp_ht_axis_must_match_signal_axis() {
        let text = RAMP.replace("221,0;301,0", "219,0;301,0");
        let err = parse_temperature_ramp(&text, &cfg()).unwrap_err();
        match err {
            ParseError::MalformedFile { message, .. } => {
                assert!(message.contains("does not match"), "{message}");
            }
            other => panic!("expected MalformedFile, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_by_mode() {
        let ds = parse(CD_SPECTRUM, AcquisitionMode::SingleSpectrum, &cfg()).unwrap();
        assert_eq!(ds.mode(), AcquisitionMode::SingleSpectrum);
        let ds = parse(RAMP, AcquisitionMode::TemperatureRamp, &cfg()).unwrap();
        assert_eq!(ds.mode(), AcquisitionMode::TemperatureRamp);
    }

    #[test]
    fn unknown_mode_string_fails_before_reading() {
        let err = parse_named(CD_SPECTRUM, "xyz", &cfg()).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedMode(s) if s == "xyz"));
        // Content is irrelevant.
        let err = parse_named("not a spectrum at all", "xyz", &cfg()).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedMode(_)));
    }

    #[test]
    fn comma_delimited_spec_example() {
        // 51 rows from "200,1.23" down to "250,0.98" at 1 nm steps.
        let mut text = String::from("TITLE,slope\nXUNITS,NANOMETERS\nXYDATA\n");
        for i in 0..=50u32 {
            let wv = 200.0 + i as f64;
            let y = 1.23 - 0.005 * i as f64;
            text.push_str(&format!("{wv},{y}\n"));
        }
        let ds = parse_spectrum(&text, &FormatConfig::comma_delimited()).unwrap();
        assert_eq!(ds.len(), 51);
        assert_eq!(ds.points().next(), Some((200.0, 1.23)));
        let (wv, y) = ds.points().last().unwrap();
        assert_eq!(wv, 250.0);
        assert!((y - 0.98).abs() < 1e-12);
    }
}
