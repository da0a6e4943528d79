use csv::WriterBuilder;

use crate::config::FormatConfig;
use crate::data::model::{Dataset, HeaderBlock, HeaderValue, InstrumentInfo};

type CsvWriter = csv::Writer<Vec<u8>>;

// ---------------------------------------------------------------------------
// Vendor CSV export
// ---------------------------------------------------------------------------

/// Serialize a dataset back into the vendor export layout it was parsed
/// from, under the same dialect. Re-parsing the output under the same
/// [`FormatConfig`] and mode reproduces the dataset.
pub fn to_vendor_csv(dataset: &Dataset, config: &FormatConfig) -> csv::Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    match dataset {
        Dataset::SingleSpectrum(ds) => {
            write_preamble(&mut writer, &ds.info, config)?;
            writer.write_record([config.data_marker.as_str()])?;
            let channels: Vec<&[f64]> = [Some(ds.signal.as_slice()), ds.ht(), ds.absorbance()]
                .into_iter()
                .flatten()
                .collect();
            write_xy_rows(&mut writer, &ds.wavelength, &channels, config)?;
            write_metadata(&mut writer, &ds.metadata, config)?;
        }
        Dataset::MeltingCurve(ds) => {
            write_preamble(&mut writer, &ds.info, config)?;
            writer.write_record([config.data_marker.as_str()])?;
            let channels: Vec<&[f64]> = [Some(ds.signal.as_slice()), ds.ht(), ds.absorbance()]
                .into_iter()
                .flatten()
                .collect();
            write_xy_rows(&mut writer, &ds.temperature, &channels, config)?;
            write_metadata(&mut writer, &ds.metadata, config)?;
        }
        Dataset::Absorbance(ds) => {
            write_preamble(&mut writer, &ds.info, config)?;
            writer.write_record([config.data_marker.as_str()])?;
            write_xy_rows(
                &mut writer,
                &ds.wavelength,
                &[ds.absorbance.as_slice()],
                config,
            )?;
            write_metadata(&mut writer, &ds.metadata, config)?;
        }
        Dataset::TemperatureRamp(ds) => {
            write_preamble(&mut writer, &ds.info, config)?;
            writer.write_record([config.channel1_marker.as_str()])?;
            write_matrix(&mut writer, &ds.wavelength, &ds.temperatures, &ds.signal, config)?;
            writer.write_record([config.channel2_marker.as_str()])?;
            write_matrix(&mut writer, &ds.wavelength, &ds.temperatures, &ds.ht, config)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serialize a dataset as pretty-printed JSON.
pub fn to_json(dataset: &Dataset) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dataset)
}

// ---------------------------------------------------------------------------
// Section writers
// ---------------------------------------------------------------------------

fn write_preamble(
    writer: &mut CsvWriter,
    info: &InstrumentInfo,
    config: &FormatConfig,
) -> csv::Result<()> {
    writer.write_record([config.title_key.as_str(), info.title()])?;
    for (key, value) in info.fields() {
        let rendered = render_header_value(value, config);
        writer.write_record([key.as_str(), rendered.as_str()])?;
    }
    Ok(())
}

fn write_xy_rows(
    writer: &mut CsvWriter,
    x: &[f64],
    channels: &[&[f64]],
    config: &FormatConfig,
) -> csv::Result<()> {
    for (i, &xv) in x.iter().enumerate() {
        let mut record = Vec::with_capacity(1 + channels.len());
        record.push(config.format_number(xv));
        for channel in channels {
            record.push(config.format_number(channel[i]));
        }
        writer.write_record(&record)?;
    }
    Ok(())
}

fn write_metadata(
    writer: &mut CsvWriter,
    metadata: &HeaderBlock,
    config: &FormatConfig,
) -> csv::Result<()> {
    if metadata.is_empty() {
        return Ok(());
    }
    writer.write_record([config.extended_marker.as_str()])?;
    for (key, value) in metadata {
        let rendered = render_header_value(value, config);
        writer.write_record([key.as_str(), rendered.as_str()])?;
    }
    Ok(())
}

/// One channel block of a temperature-interval export: the temperature
/// header row, then one row per wavelength.
fn write_matrix(
    writer: &mut CsvWriter,
    wavelength: &[f64],
    temperatures: &[f64],
    values: &[Vec<f64>],
    config: &FormatConfig,
) -> csv::Result<()> {
    let mut header = Vec::with_capacity(1 + temperatures.len());
    header.push(String::new());
    header.extend(temperatures.iter().map(|&t| config.format_number(t)));
    writer.write_record(&header)?;

    for (wi, &wv) in wavelength.iter().enumerate() {
        let mut record = Vec::with_capacity(1 + values.len());
        record.push(config.format_number(wv));
        for column in values {
            record.push(config.format_number(column[wi]));
        }
        writer.write_record(&record)?;
    }
    Ok(())
}

/// Header cells keep their guessed type on re-parse: floats always carry a
/// decimal marker so an integral float does not come back as an integer.
fn render_header_value(value: &HeaderValue, config: &FormatConfig) -> String {
    match value {
        HeaderValue::Float(v) => {
            let s = if v.is_finite() && v.fract() == 0.0 {
                format!("{v:.1}")
            } else {
                format!("{v}")
            };
            if config.decimal_comma {
                s.replace('.', ",")
            } else {
                s
            }
        }
        HeaderValue::Integer(i) => i.to_string(),
        HeaderValue::String(s) => s.clone(),
        HeaderValue::Null => String::new(),
    }
}
