use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;
use thiserror::Error;

use super::model::{CategorySpectrum, CountValue, Dataset};
use crate::config::ParserConfig;

/// Marker token that opens a category section.
pub const REGION_MARKER: &str = "Region";
/// Marker token of a nested header inside a data block.
pub const LAYER_MARKER: &str = "Layer";

/// Malformed-input conditions. Line numbers are 1-based.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("input contains no `Region` sections")]
    NoSections,
    #[error("line {line}: expected a `Region` marker before any data, found {content:?}")]
    MissingRegionMarker { line: usize, content: String },
    #[error("line {line}: no category label of the form `false <label> 7` in {content:?}")]
    LabelNotFound { line: usize, content: String },
    #[error("section starting at line {line}: input ends inside the section header")]
    TruncatedHeader { line: usize },
    #[error("line {line}: expected two tab-separated numeric fields, found {content:?}")]
    MalformedRow { line: usize, content: String },
    #[error("section `{label}` starting at line {line} has no data rows")]
    EmptySection { label: String, line: usize },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse an XPS text export.
pub fn load_file(path: &Path, config: &ParserConfig) -> Result<Dataset> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading XPS export {}", path.display()))?;
    let dataset =
        parse_str(&text, config).with_context(|| format!("parsing {}", path.display()))?;
    Ok(dataset)
}

/// Parse the whole export into one [`CategorySpectrum`] per `Region` section.
pub fn parse_str(text: &str, config: &ParserConfig) -> Result<Dataset, ParseError> {
    let mut parser = RecordParser::new(config);
    for (i, line) in text.lines().enumerate() {
        parser.feed(i + 1, line)?;
    }
    let dataset = parser.finish()?;
    info!(
        "found {} categories: {:?}",
        dataset.len(),
        dataset.iter().map(|c| c.display_name()).collect::<Vec<_>>()
    );
    Ok(dataset)
}

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"false\s(.*?)\s7").unwrap());

/// Extract the category label from the line following a `Region` marker.
pub fn extract_label(line: &str) -> Option<String> {
    LABEL_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Parse the first two tab-separated fields of a data row.
fn parse_row(line: &str) -> Option<(f64, CountValue)> {
    let mut fields = line.split('\t');
    let energy = fields.next()?.trim().parse::<f64>().ok()?;
    let counts = CountValue::parse(fields.next()?)?;
    Some((energy, counts))
}

// ---------------------------------------------------------------------------
// Line state machine
// ---------------------------------------------------------------------------

/// Where the parser is relative to the section grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first `Region` marker.
    Start,
    /// Marker seen; next line carries the label.
    Label,
    /// Discarding the fixed header after the label line.
    RegionHeader { remaining: usize },
    /// Reading numeric rows.
    Data,
    /// Discarding the remainder of a `Layer` sub-header.
    LayerHeader { remaining: usize },
}

/// Section under construction.
struct Section {
    label: String,
    start_line: usize,
    energy: Vec<f64>,
    counts: Vec<CountValue>,
    layers: usize,
}

struct RecordParser<'a> {
    config: &'a ParserConfig,
    state: State,
    current: Option<Section>,
    start_line: usize,
    categories: Vec<CategorySpectrum>,
}

impl<'a> RecordParser<'a> {
    fn new(config: &'a ParserConfig) -> Self {
        RecordParser {
            config,
            state: State::Start,
            current: None,
            start_line: 0,
            categories: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        self.state = match self.state {
            State::Start => {
                if !line.contains(REGION_MARKER) {
                    return Err(ParseError::MissingRegionMarker {
                        line: line_no,
                        content: line.to_string(),
                    });
                }
                self.start_line = line_no;
                State::Label
            }
            State::Label => {
                let label = extract_label(line).ok_or_else(|| ParseError::LabelNotFound {
                    line: line_no,
                    content: line.to_string(),
                })?;
                self.current = Some(Section {
                    label,
                    start_line: self.start_line,
                    energy: Vec::new(),
                    counts: Vec::new(),
                    layers: 0,
                });
                Self::skip(self.config.region_header_lines, |remaining| {
                    State::RegionHeader { remaining }
                })
            }
            State::RegionHeader { remaining } => {
                Self::skip(remaining - 1, |remaining| State::RegionHeader { remaining })
            }
            State::LayerHeader { remaining } => {
                Self::skip(remaining - 1, |remaining| State::LayerHeader { remaining })
            }
            State::Data => {
                if line.contains(REGION_MARKER) {
                    self.close_section()?;
                    self.start_line = line_no;
                    State::Label
                } else if line.contains(LAYER_MARKER) {
                    if let Some(section) = self.current.as_mut() {
                        section.layers += 1;
                    }
                    // The marker line itself is the first of the skipped lines.
                    Self::skip(self.config.layer_header_lines.saturating_sub(1), |remaining| {
                        State::LayerHeader { remaining }
                    })
                } else {
                    let (energy, counts) =
                        parse_row(line).ok_or_else(|| ParseError::MalformedRow {
                            line: line_no,
                            content: line.to_string(),
                        })?;
                    if let Some(section) = self.current.as_mut() {
                        section.energy.push(energy);
                        section.counts.push(counts);
                    }
                    State::Data
                }
            }
        };
        Ok(())
    }

    /// Enter a skipping state, or go straight to data when nothing is left to skip.
    fn skip(remaining: usize, state: impl FnOnce(usize) -> State) -> State {
        if remaining == 0 {
            State::Data
        } else {
            state(remaining)
        }
    }

    fn close_section(&mut self) -> Result<(), ParseError> {
        let Some(section) = self.current.take() else {
            return Ok(());
        };
        if section.energy.is_empty() {
            return Err(ParseError::EmptySection {
                label: section.label,
                line: section.start_line,
            });
        }
        debug!(
            "section `{}` (line {}): {} points, {} layer sub-headers skipped",
            section.label,
            section.start_line,
            section.energy.len(),
            section.layers
        );
        self.categories.push(CategorySpectrum::new(
            section.label,
            section.energy,
            section.counts,
        ));
        Ok(())
    }

    fn finish(mut self) -> Result<Dataset, ParseError> {
        match self.state {
            State::Start => return Err(ParseError::NoSections),
            State::Label | State::RegionHeader { .. } => {
                return Err(ParseError::TruncatedHeader {
                    line: self.start_line,
                })
            }
            State::Data | State::LayerHeader { .. } => self.close_section()?,
        }
        Ok(Dataset::new(self.categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Kinetic Energy\tCounts\nh1\nh2\nh3\n";

    fn section(label: &str, rows: &[(f64, f64)]) -> String {
        let mut s = format!("Region\t1\n1\tfalse {label} 7\t0\n{HEADER}");
        for (e, c) in rows {
            s.push_str(&format!("{e}\t{c}\n"));
        }
        s
    }

    fn parse(text: &str) -> Result<Dataset, ParseError> {
        parse_str(text, &ParserConfig::default())
    }

    #[test]
    fn extracts_labels() {
        assert_eq!(extract_label("1\tfalse C 7\t0").as_deref(), Some("C"));
        assert_eq!(extract_label("x false  Fe2p  7").as_deref(), Some("Fe2p"));
        assert_eq!(extract_label("false  7").as_deref(), Some(""));
        assert_eq!(extract_label("true C 7"), None);
    }

    #[test]
    fn one_category_per_region_in_source_order() {
        let text = [
            section("", &[(1000.0, 10.0), (999.0, 11.0)]),
            section("C", &[(286.0, 5.0), (284.6, 9.0), (283.0, 2.0)]),
            section("O", &[(530.0, 1.0), (529.0, 1.0)]),
        ]
        .concat();
        let ds = parse(&text).unwrap();
        assert_eq!(ds.labels(), vec!["", "C", "O"]);
        for c in ds.iter() {
            assert_eq!(c.energy.len(), c.counts.len());
            assert!(!c.is_empty());
        }
        assert_eq!(ds.categories[1].energy, vec![286.0, 284.6, 283.0]);
        assert_eq!(ds.categories[1].count_values(), vec![5.0, 9.0, 2.0]);
    }

    #[test]
    fn counts_keep_their_source_text() {
        let text = "Region\nfalse C 7\na\nb\nc\nd\n285.0\t0012.50\textra\n";
        let ds = parse(text).unwrap();
        assert_eq!(ds.categories[0].counts[0].text, "0012.50");
        assert_eq!(ds.categories[0].counts[0].value, 12.5);
    }

    #[test]
    fn layer_sub_header_is_skipped() {
        let text = "Region\nfalse N 7\na\nb\nc\nd\n\
                    400.0\t1\n\
                    Layer\t2\nx\ny\nz\n\
                    399.0\t2\n\
                    Layer\t3\nx\ny\nz\n\
                    398.0\t3\n";
        let ds = parse(text).unwrap();
        assert_eq!(ds.categories[0].energy, vec![400.0, 399.0, 398.0]);
        assert_eq!(ds.categories[0].count_values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn layer_skip_length_is_configurable() {
        let config = ParserConfig {
            region_header_lines: 0,
            layer_header_lines: 1,
        };
        let text = "Region\nfalse N 7\n400.0\t1\nLayer\n399.0\t2\n";
        let ds = parse_str(text, &config).unwrap();
        assert_eq!(ds.categories[0].energy, vec![400.0, 399.0]);
    }

    #[test]
    fn single_field_row_is_malformed() {
        let text = "Region\nfalse C 7\na\nb\nc\nd\n285.0\t3\n284.0\n";
        assert_eq!(
            parse(text),
            Err(ParseError::MalformedRow {
                line: 8,
                content: "284.0".into()
            })
        );
    }

    #[test]
    fn blank_row_is_malformed() {
        let text = "Region\nfalse C 7\na\nb\nc\nd\n285.0\t3\n\n284.0\t2\n";
        assert!(matches!(parse(text), Err(ParseError::MalformedRow { line: 8, .. })));
    }

    #[test]
    fn missing_label_pattern_fails() {
        let text = "Region\nno label here\na\nb\nc\nd\n285.0\t3\n";
        assert!(matches!(parse(text), Err(ParseError::LabelNotFound { line: 2, .. })));
    }

    #[test]
    fn structural_failures() {
        assert_eq!(parse(""), Err(ParseError::NoSections));
        assert!(matches!(
            parse("junk\nRegion\n"),
            Err(ParseError::MissingRegionMarker { line: 1, .. })
        ));
        assert_eq!(
            parse("Region\nfalse C 7\na\nb\n"),
            Err(ParseError::TruncatedHeader { line: 1 })
        );
        assert_eq!(
            parse(&format!("{}{}", section("C", &[]), section("O", &[(1.0, 1.0)]))),
            Err(ParseError::EmptySection {
                label: "C".into(),
                line: 1
            })
        );
    }

    #[test]
    fn crlf_input_is_accepted() {
        let text = section("C", &[(285.0, 1.0)]).replace('\n', "\r\n");
        let ds = parse(&text).unwrap();
        assert_eq!(ds.categories[0].energy, vec![285.0]);
    }
}
