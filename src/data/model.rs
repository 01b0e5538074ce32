use std::fmt;

/// Display name used for a category parsed with an empty label.
pub const WHOLE_SPECTRUM: &str = "whole spectrum";

// ---------------------------------------------------------------------------
// CountValue – a single counts cell
// ---------------------------------------------------------------------------

/// A counts reading: the numeric value used for peak search plus the
/// trimmed source token, which is what the result files echo back.
/// The token is kept verbatim (`1234`, `1e3`), not re-rendered as a float.
#[derive(Debug, Clone, PartialEq)]
pub struct CountValue {
    pub value: f64,
    pub text: String,
}

impl CountValue {
    /// Parse a trimmed token; `None` when it is not a number.
    pub fn parse(token: &str) -> Option<Self> {
        let text = token.trim();
        let value = text.parse::<f64>().ok()?;
        Some(CountValue {
            value,
            text: text.to_string(),
        })
    }
}

impl From<f64> for CountValue {
    fn from(value: f64) -> Self {
        CountValue {
            value,
            text: value.to_string(),
        }
    }
}

impl fmt::Display for CountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// CategorySpectrum – one `Region` block of the export
// ---------------------------------------------------------------------------

/// The spectrum of one measured category (one `Region` section).
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpectrum {
    /// Category label, e.g. an element symbol. Empty for the survey scan.
    pub label: String,
    /// Binding energy axis, in source order.
    pub energy: Vec<f64>,
    /// Counts axis – same length as `energy`.
    pub counts: Vec<CountValue>,
}

impl CategorySpectrum {
    pub fn new(label: impl Into<String>, energy: Vec<f64>, counts: Vec<CountValue>) -> Self {
        debug_assert_eq!(energy.len(), counts.len());
        CategorySpectrum {
            label: label.into(),
            energy,
            counts,
        }
    }

    /// Name used in titles and file names; an empty label is the whole spectrum.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            WHOLE_SPECTRUM
        } else {
            &self.label
        }
    }

    /// Number of data points.
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Numeric counts, index-aligned with `energy`.
    pub fn count_values(&self) -> Vec<f64> {
        self.counts.iter().map(|c| c.value).collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete parsed export
// ---------------------------------------------------------------------------

/// All categories of one export, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub categories: Vec<CategorySpectrum>,
}

impl Dataset {
    pub fn new(categories: Vec<CategorySpectrum>) -> Self {
        Dataset { categories }
    }

    /// Labels of every category, in source order.
    pub fn labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    /// Indices of every category whose label equals `label`.
    pub fn positions_of(&self, label: &str) -> Vec<usize> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| c.label == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategorySpectrum> {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_value_keeps_source_text() {
        let c = CountValue::parse(" 1234.0 ").unwrap();
        assert_eq!(c.value, 1234.0);
        assert_eq!(c.to_string(), "1234.0");
        assert!(CountValue::parse("abc").is_none());
        assert!(CountValue::parse("").is_none());
    }

    #[test]
    fn empty_label_displays_as_whole_spectrum() {
        let sp = CategorySpectrum::new("", vec![1.0], vec![CountValue::from(2.0)]);
        assert_eq!(sp.display_name(), WHOLE_SPECTRUM);
        let sp = CategorySpectrum::new("Fe", vec![1.0], vec![CountValue::from(2.0)]);
        assert_eq!(sp.display_name(), "Fe");
    }

    #[test]
    fn positions_of_finds_every_match() {
        let mk = |l: &str| CategorySpectrum::new(l, vec![0.0], vec![CountValue::from(0.0)]);
        let ds = Dataset::new(vec![mk(""), mk("C"), mk("O"), mk("C")]);
        assert_eq!(ds.labels(), vec!["", "C", "O", "C"]);
        assert_eq!(ds.positions_of("C"), vec![1, 3]);
        assert!(ds.positions_of("N").is_empty());
    }
}
