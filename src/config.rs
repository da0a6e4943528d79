// ---------------------------------------------------------------------------
// FormatConfig – vendor CSV dialect and header schema
// ---------------------------------------------------------------------------

/// The export dialect: delimiter, decimal convention, and the marker /
/// header keys that delimit the sections of a file.
///
/// Instrument software is configurable, so none of this is hard-coded in the
/// parser; the default matches a JASCO J-series export with European
/// regional settings (semicolon delimiter, decimal comma).
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Numbers use `,` as the decimal separator (`260,5` instead of `260.5`).
    pub decimal_comma: bool,
    /// Key of the first record, whose value is the experiment title.
    pub title_key: String,
    /// Marker record that starts the XY data block.
    pub data_marker: String,
    /// Marker record that ends the XY data block and starts the trailing
    /// metadata section.
    pub extended_marker: String,
    /// Marker record that starts the signal matrix of a temperature-interval
    /// export.
    pub channel1_marker: String,
    /// Marker record that starts the HT matrix of a temperature-interval
    /// export.
    pub channel2_marker: String,
    /// Metadata key holding the data pitch, e.g. `Data pitch;0,1 nm`.
    pub data_pitch_key: String,
    /// Metadata key holding the fixed wavelength of a melting-curve run.
    pub monitor_wavelength_key: String,
    /// Info-block key holding the x step of a temperature-interval export.
    pub delta_x_key: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            delimiter: b';',
            decimal_comma: true,
            title_key: "TITLE".to_string(),
            data_marker: "XYDATA".to_string(),
            extended_marker: "##### Extended Information".to_string(),
            channel1_marker: "Channel 1".to_string(),
            channel2_marker: "Channel 2".to_string(),
            data_pitch_key: "Data pitch".to_string(),
            monitor_wavelength_key: "Monitor wavelength".to_string(),
            delta_x_key: "DELTAX".to_string(),
        }
    }
}

impl FormatConfig {
    /// Convenience for exports written with Anglo regional settings
    /// (comma delimiter, decimal point).
    pub fn comma_delimited() -> Self {
        FormatConfig {
            delimiter: b',',
            decimal_comma: false,
            ..FormatConfig::default()
        }
    }

    /// Parse one numeric cell under this dialect.
    pub(crate) fn parse_number(&self, cell: &str) -> Option<f64> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        if self.decimal_comma {
            cell.replace(',', ".").parse::<f64>().ok()
        } else {
            cell.parse::<f64>().ok()
        }
    }

    /// Render one numeric cell under this dialect. `f64`'s shortest display
    /// form round-trips exactly.
    pub(crate) fn format_number(&self, value: f64) -> String {
        let s = format!("{value}");
        if self.decimal_comma {
            s.replace('.', ",")
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_comma_numbers() {
        let cfg = FormatConfig::default();
        assert_eq!(cfg.parse_number("260,5"), Some(260.5));
        assert_eq!(cfg.parse_number(" -0,123 "), Some(-0.123));
        assert_eq!(cfg.parse_number("abc"), None);
        assert_eq!(cfg.format_number(-0.123), "-0,123");
    }

    #[test]
    fn decimal_point_numbers() {
        let cfg = FormatConfig::comma_delimited();
        assert_eq!(cfg.parse_number("1.23"), Some(1.23));
        assert_eq!(cfg.parse_number("1,23"), None);
        assert_eq!(cfg.format_number(200.0), "200");
    }
}
