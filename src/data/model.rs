use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::FormatConfig;
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// AcquisitionMode – which export layout the caller declares
// ---------------------------------------------------------------------------

/// The acquisition mode of an export, declared by the caller. Each mode
/// corresponds to one dataset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionMode {
    /// One CD spectrum: ellipticity over a wavelength range.
    SingleSpectrum,
    /// Temperature-interval run: one spectrum per temperature step.
    TemperatureRamp,
    /// Ellipticity at one fixed wavelength across a temperature ramp.
    MeltingCurve,
    /// One absorbance spectrum: optical density over a wavelength range.
    Absorbance,
}

impl FromStr for AcquisitionMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_spectrum" => Ok(AcquisitionMode::SingleSpectrum),
            "temperature_ramp" => Ok(AcquisitionMode::TemperatureRamp),
            "melting_curve" => Ok(AcquisitionMode::MeltingCurve),
            "absorbance" => Ok(AcquisitionMode::Absorbance),
            other => Err(ParseError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionMode::SingleSpectrum => "single_spectrum",
            AcquisitionMode::TemperatureRamp => "temperature_ramp",
            AcquisitionMode::MeltingCurve => "melting_curve",
            AcquisitionMode::Absorbance => "absorbance",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// HeaderValue – a single cell in an info or metadata block
// ---------------------------------------------------------------------------

/// A dynamically-typed header cell. Instrument software writes numbers,
/// counts, and free text into the same `key;value` blocks, so the value type
/// is guessed per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeaderValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl HeaderValue {
    /// Guess the type of a raw cell under the given dialect.
    pub fn guess(raw: &str, config: &FormatConfig) -> HeaderValue {
        let raw = raw.trim();
        if raw.is_empty() {
            return HeaderValue::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return HeaderValue::Integer(i);
        }
        if let Some(f) = config.parse_number(raw) {
            return HeaderValue::Float(f);
        }
        HeaderValue::String(raw.to_string())
    }

    /// Interpret the value as an `f64` where possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Float(v) => Some(*v),
            HeaderValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::String(s) => write!(f, "{s}"),
            HeaderValue::Integer(i) => write!(f, "{i}"),
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Null => Ok(()),
        }
    }
}

/// `key → value` block, as found before `XYDATA` (info) and after the
/// extended-information marker (metadata).
pub type HeaderBlock = BTreeMap<String, HeaderValue>;

// ---------------------------------------------------------------------------
// InstrumentInfo – the header block written before the data
// ---------------------------------------------------------------------------

/// The instrument header: experiment title plus the raw `key;value` fields
/// the acquisition software wrote (DATA TYPE, ORIGIN, DATE, TIME, XUNITS,
/// YUNITS, FIRSTX, LASTX, NPOINTS, DELTAX, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub(crate) title: String,
    pub(crate) fields: HeaderBlock,
}

impl InstrumentInfo {
    /// Experiment title from the `TITLE` record.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Look up a raw header field.
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.get(key)
    }

    /// All header fields in key order.
    pub fn fields(&self) -> &HeaderBlock {
        &self.fields
    }

    /// Units of the x axis (`XUNITS`).
    pub fn x_units(&self) -> Option<&HeaderValue> {
        self.fields.get("XUNITS")
    }

    /// Units of the primary y channel (`YUNITS`).
    pub fn y_units(&self) -> Option<&HeaderValue> {
        self.fields.get("YUNITS")
    }

    /// Acquisition timestamp, `DATE` and `TIME` joined. Kept as text; the
    /// instrument's date format depends on its locale.
    pub fn timestamp(&self) -> Option<String> {
        match (self.fields.get("DATE"), self.fields.get("TIME")) {
            (Some(d), Some(t)) => Some(format!("{d} {t}")),
            (Some(d), None) => Some(d.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SpectrumDataset – one spectrum over a wavelength range
// ---------------------------------------------------------------------------

/// A single CD spectrum: (wavelength, ellipticity) pairs plus the optional
/// HT and absorbance channels the instrument records alongside.
///
/// Immutable once parsed; the transformation methods return new datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumDataset {
    pub(crate) info: InstrumentInfo,
    pub(crate) metadata: HeaderBlock,
    pub(crate) wavelength: Vec<f64>,
    pub(crate) signal: Vec<f64>,
    /// Photomultiplier voltage per point, when the export carries it.
    pub(crate) ht: Option<Vec<f64>>,
    /// Absorbance per point, when the export carries it.
    pub(crate) absorbance: Option<Vec<f64>>,
    /// Wavelength step from the `Data pitch` metadata entry.
    pub(crate) data_pitch: Option<f64>,
}

impl SpectrumDataset {
    pub fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    /// Trailing metadata block of the export.
    pub fn metadata(&self) -> &HeaderBlock {
        &self.metadata
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    /// Ellipticity (mdeg) per wavelength.
    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn ht(&self) -> Option<&[f64]> {
        self.ht.as_deref()
    }

    pub fn absorbance(&self) -> Option<&[f64]> {
        self.absorbance.as_deref()
    }

    /// Number of (wavelength, signal) points.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// (wavelength, signal) pairs in export order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .iter()
            .zip(self.signal.iter())
            .map(|(&w, &s)| (w, s))
    }

    /// Smallest recorded wavelength.
    pub fn wv_min(&self) -> Option<f64> {
        self.wavelength.iter().copied().reduce(f64::min)
    }

    /// Largest recorded wavelength.
    pub fn wv_max(&self) -> Option<f64> {
        self.wavelength.iter().copied().reduce(f64::max)
    }

    /// Wavelength step, from the `Data pitch` metadata entry.
    pub fn data_pitch(&self) -> Option<f64> {
        self.data_pitch
    }
}

// ---------------------------------------------------------------------------
// TemperatureSeriesDataset – one spectrum per temperature step
// ---------------------------------------------------------------------------

/// A temperature-interval run: a shared wavelength axis, a monotonic
/// temperature axis, and one signal row (plus one HT row) per temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSeriesDataset {
    pub(crate) info: InstrumentInfo,
    pub(crate) wavelength: Vec<f64>,
    /// Strictly increasing or strictly decreasing, per the export order.
    pub(crate) temperatures: Vec<f64>,
    /// `signal[t][w]`: ellipticity at `temperatures[t]`, `wavelength[w]`.
    pub(crate) signal: Vec<Vec<f64>>,
    /// Same shape as `signal`.
    pub(crate) ht: Vec<Vec<f64>>,
    /// Wavelength step from the `DELTAX` header field.
    pub(crate) delta_x: Option<f64>,
}

impl TemperatureSeriesDataset {
    pub fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn signal(&self) -> &[Vec<f64>] {
        &self.signal
    }

    pub fn ht(&self) -> &[Vec<f64>] {
        &self.ht
    }

    /// Number of temperature entries.
    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    pub fn delta_x(&self) -> Option<f64> {
        self.delta_x
    }

    /// The spectrum recorded at temperature index `idx`, as an owned
    /// [`SpectrumDataset`] sharing this run's header.
    pub fn spectrum_at(&self, idx: usize) -> Option<SpectrumDataset> {
        let signal = self.signal.get(idx)?.clone();
        let ht = self.ht.get(idx).cloned();
        Some(SpectrumDataset {
            info: self.info.clone(),
            metadata: HeaderBlock::new(),
            wavelength: self.wavelength.clone(),
            signal,
            ht,
            absorbance: None,
            data_pitch: self.delta_x,
        })
    }

    /// All (temperature, wavelength, signal) triples in export order.
    pub fn triples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.temperatures
            .iter()
            .zip(self.signal.iter())
            .flat_map(move |(&t, row)| {
                self.wavelength
                    .iter()
                    .zip(row.iter())
                    .map(move |(&w, &s)| (t, w, s))
            })
    }
}

// ---------------------------------------------------------------------------
// MeltingCurveDataset – signal at one wavelength across a temperature ramp
// ---------------------------------------------------------------------------

/// Ellipticity at one monitored wavelength as temperature ramps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeltingCurveDataset {
    pub(crate) info: InstrumentInfo,
    pub(crate) metadata: HeaderBlock,
    pub(crate) temperature: Vec<f64>,
    pub(crate) signal: Vec<f64>,
    pub(crate) ht: Option<Vec<f64>>,
    pub(crate) absorbance: Option<Vec<f64>>,
    /// Fixed wavelength from the `Monitor wavelength` metadata entry.
    pub(crate) monitor_wavelength: Option<f64>,
}

impl MeltingCurveDataset {
    pub fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    pub fn metadata(&self) -> &HeaderBlock {
        &self.metadata
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn ht(&self) -> Option<&[f64]> {
        self.ht.as_deref()
    }

    pub fn absorbance(&self) -> Option<&[f64]> {
        self.absorbance.as_deref()
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// (temperature, signal) pairs in export order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.temperature
            .iter()
            .zip(self.signal.iter())
            .map(|(&t, &s)| (t, s))
    }

    pub fn temp_min(&self) -> Option<f64> {
        self.temperature.iter().copied().reduce(f64::min)
    }

    pub fn temp_max(&self) -> Option<f64> {
        self.temperature.iter().copied().reduce(f64::max)
    }

    /// The fixed wavelength the signal was monitored at.
    pub fn monitor_wavelength(&self) -> Option<f64> {
        self.monitor_wavelength
    }
}

// ---------------------------------------------------------------------------
// AbsorbanceSpectrumDataset – optical density over a wavelength range
// ---------------------------------------------------------------------------

/// An absorbance spectrum: (wavelength, absorbance) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorbanceSpectrumDataset {
    pub(crate) info: InstrumentInfo,
    pub(crate) metadata: HeaderBlock,
    pub(crate) wavelength: Vec<f64>,
    pub(crate) absorbance: Vec<f64>,
    pub(crate) data_pitch: Option<f64>,
}

impl AbsorbanceSpectrumDataset {
    pub fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    pub fn metadata(&self) -> &HeaderBlock {
        &self.metadata
    }

    pub fn wavelength(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn absorbance(&self) -> &[f64] {
        &self.absorbance
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// (wavelength, absorbance) pairs in export order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .iter()
            .zip(self.absorbance.iter())
            .map(|(&w, &a)| (w, a))
    }

    pub fn wv_min(&self) -> Option<f64> {
        self.wavelength.iter().copied().reduce(f64::min)
    }

    pub fn wv_max(&self) -> Option<f64> {
        self.wavelength.iter().copied().reduce(f64::max)
    }

    pub fn data_pitch(&self) -> Option<f64> {
        self.data_pitch
    }
}

// ---------------------------------------------------------------------------
// Dataset – tagged union over the four acquisition modes
// ---------------------------------------------------------------------------

/// The result of a parse: one variant per acquisition mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dataset {
    SingleSpectrum(SpectrumDataset),
    TemperatureRamp(TemperatureSeriesDataset),
    MeltingCurve(MeltingCurveDataset),
    Absorbance(AbsorbanceSpectrumDataset),
}

impl Dataset {
    /// The mode this dataset was parsed under.
    pub fn mode(&self) -> AcquisitionMode {
        match self {
            Dataset::SingleSpectrum(_) => AcquisitionMode::SingleSpectrum,
            Dataset::TemperatureRamp(_) => AcquisitionMode::TemperatureRamp,
            Dataset::MeltingCurve(_) => AcquisitionMode::MeltingCurve,
            Dataset::Absorbance(_) => AcquisitionMode::Absorbance,
        }
    }

    pub fn info(&self) -> &InstrumentInfo {
        match self {
            Dataset::SingleSpectrum(d) => d.info(),
            Dataset::TemperatureRamp(d) => d.info(),
            Dataset::MeltingCurve(d) => d.info(),
            Dataset::Absorbance(d) => d.info(),
        }
    }
}
