//! Parser for CDL, the text form of a NetCDF file printed by `ncdump`.
//!
//! Only the parts needed to pull numeric grids out of a file are kept:
//! dimension lengths, variable declarations, attributes (as raw text) and
//! numeric data sections. String and character data are skipped.

use std::collections::BTreeMap;

use crate::error::{NetCdfError, NetCdfResult};

const TYPE_KEYWORDS: &[&str] = &[
    "byte", "ubyte", "char", "short", "ushort", "int", "uint", "int64", "uint64", "long",
    "float", "real", "double", "string",
];

/// One variable of a CDL document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CdlVariable {
    /// Declared type keyword (`float`, `short`, ...).
    pub data_type: String,
    /// Dimension names, slowest varying first.
    pub dims: Vec<String>,
    /// Attribute values exactly as written, without the trailing `;`.
    pub attributes: BTreeMap<String, String>,
    /// Numeric data, with `_` fill markers turned into `NaN`.
    pub data: Option<Vec<f64>>,
}

impl CdlVariable {
    /// First numeric value of an attribute.
    pub fn attribute_f64(&self, name: &str) -> Option<f64> {
        let raw = self.attributes.get(name)?;
        raw.split(',').next().and_then(parse_number)
    }
}

/// A parsed CDL document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CdlDocument {
    pub dimensions: BTreeMap<String, usize>,
    pub variables: BTreeMap<String, CdlVariable>,
    pub global_attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Dimensions,
    Variables,
    Data,
    Done,
}

impl CdlDocument {
    /// Parse `ncdump` output.
    pub fn parse(text: &str) -> NetCdfResult<Self> {
        let mut doc = CdlDocument::default();
        let mut section = Section::Preamble;
        let mut pending = String::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let (code, comment) = split_comment(raw);
            let trimmed = code.trim();

            if pending.trim().is_empty() {
                match trimmed {
                    "dimensions:" => {
                        section = Section::Dimensions;
                        continue;
                    }
                    "variables:" => {
                        section = Section::Variables;
                        continue;
                    }
                    "data:" => {
                        section = Section::Data;
                        continue;
                    }
                    "}" => {
                        section = Section::Done;
                        continue;
                    }
                    _ => {}
                }
                if section == Section::Preamble && trimmed.starts_with("netcdf") {
                    continue;
                }
            }

            if trimmed.is_empty() {
                continue;
            }

            match section {
                Section::Dimensions => doc.parse_dimensions(trimmed, comment, line_no)?,
                Section::Variables | Section::Data => {
                    pending.push_str(code);
                    pending.push(' ');

                    while let Some(end) = find_unquoted(&pending, ';') {
                        let statement = pending[..end].trim().to_string();
                        pending.drain(..=end);
                        if statement.is_empty() {
                            continue;
                        }
                        if section == Section::Variables {
                            doc.parse_declaration(&statement, line_no)?;
                        } else {
                            doc.parse_data(&statement, line_no)?;
                        }
                    }
                }
                Section::Preamble | Section::Done => {
                    return Err(NetCdfError::Malformed(format!(
                        "line {}: unexpected content outside of a CDL section",
                        line_no
                    )));
                }
            }
        }

        if !pending.trim().is_empty() {
            return Err(NetCdfError::Malformed(
                "unterminated CDL statement at end of input".to_string(),
            ));
        }

        Ok(doc)
    }

    pub fn dimension(&self, name: &str) -> Option<usize> {
        self.dimensions.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<&CdlVariable> {
        self.variables.get(name)
    }

    /// First of `names` that is declared in the document.
    pub fn find_variable<'a>(&'a self, names: &'a [String]) -> Option<(&'a str, &'a CdlVariable)> {
        names
            .iter()
            .find_map(|name| self.variables.get(name).map(|var| (name.as_str(), var)))
    }

    fn parse_dimensions(&mut self, line: &str, comment: Option<&str>, line_no: usize) -> NetCdfResult<()> {
        for entry in line.split([',', ';']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                NetCdfError::Malformed(format!("line {}: bad dimension '{}'", line_no, entry))
            })?;
            let value = value.trim();
            let len = if value.eq_ignore_ascii_case("UNLIMITED") {
                comment.and_then(unlimited_length).unwrap_or(0)
            } else {
                value.parse::<usize>().map_err(|_| {
                    NetCdfError::Malformed(format!(
                        "line {}: bad dimension length '{}'",
                        line_no, value
                    ))
                })?
            };
            self.dimensions.insert(name.trim().to_string(), len);
        }
        Ok(())
    }

    fn parse_declaration(&mut self, statement: &str, line_no: usize) -> NetCdfResult<()> {
        if let Some((lhs, value)) = split_unquoted_once(statement, '=') {
            let lhs = lhs.trim();
            let (var, attr) = lhs.split_once(':').ok_or_else(|| {
                NetCdfError::Malformed(format!("line {}: bad attribute '{}'", line_no, lhs))
            })?;
            let value = value.trim().to_string();
            let attr = attr.trim().to_string();
            let var = var.trim();
            // Attributes may be written with an explicit type prefix
            let var = var.rsplit(char::is_whitespace).next().unwrap_or(var);
            if var.is_empty() {
                self.global_attributes.insert(attr, value);
            } else {
                self.variables
                    .entry(var.to_string())
                    .or_default()
                    .attributes
                    .insert(attr, value);
            }
            return Ok(());
        }

        let (data_type, rest) = statement
            .split_once(char::is_whitespace)
            .ok_or_else(|| {
                NetCdfError::Malformed(format!("line {}: bad declaration '{}'", line_no, statement))
            })?;
        if !TYPE_KEYWORDS.contains(&data_type) {
            return Err(NetCdfError::Malformed(format!(
                "line {}: unknown type '{}'",
                line_no, data_type
            )));
        }

        for decl in split_top_level(rest) {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            let (name, dims) = match decl.split_once('(') {
                Some((name, dims)) => {
                    let dims = dims.trim_end().trim_end_matches(')');
                    let dims = dims
                        .split(',')
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty())
                        .collect();
                    (name.trim(), dims)
                }
                None => (decl, Vec::new()),
            };
            let var = self.variables.entry(name.to_string()).or_default();
            var.data_type = data_type.to_string();
            var.dims = dims;
        }
        Ok(())
    }

    fn parse_data(&mut self, statement: &str, line_no: usize) -> NetCdfResult<()> {
        let (name, values) = statement.split_once('=').ok_or_else(|| {
            NetCdfError::Malformed(format!("line {}: bad data section '{}'", line_no, statement))
        })?;
        let name = name.trim();

        // Character data and formatted times are not needed
        if values.contains('"') || values.contains('\'') {
            return Ok(());
        }

        let mut data = Vec::new();
        for token in values.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token == "_" {
                data.push(f64::NAN);
                continue;
            }
            let value = parse_number(token).ok_or_else(|| {
                NetCdfError::Malformed(format!(
                    "line {}: bad value '{}' in {}",
                    line_no, token, name
                ))
            })?;
            data.push(value);
        }

        self.variables.entry(name.to_string()).or_default().data = Some(data);
        Ok(())
    }
}

/// Parse a CDL numeric literal, dropping any type suffix (`f`, `s`, `b`,
/// `L`, `UL`, ...).
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if let Ok(v) = token.parse::<f64>() {
        return Some(v);
    }
    let stripped = token.trim_end_matches(['f', 'F', 's', 'S', 'b', 'B', 'l', 'L', 'u', 'U']);
    if stripped.is_empty() || stripped.len() == token.len() {
        return None;
    }
    stripped.parse::<f64>().ok()
}

/// Split a line into code and trailing `//` comment, ignoring `//` inside
/// string literals.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quote => i += 1,
            b'"' => in_quote = !in_quote,
            b'/' if !in_quote && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], Some(&line[i + 2..]));
            }
            _ => {}
        }
        i += 1;
    }
    (line, None)
}

fn find_unquoted(text: &str, needle: char) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            c if c == needle && !in_quote => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted_once(text: &str, needle: char) -> Option<(&str, &str)> {
    let idx = find_unquoted(text, needle)?;
    Some((&text[..idx], &text[idx + needle.len_utf8()..]))
}

/// Split on commas that are not inside parentheses.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Length of an unlimited dimension from ncdump's `// (N currently)` note.
fn unlimited_length(comment: &str) -> Option<usize> {
    let inner = comment.trim().strip_prefix('(')?;
    inner.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"netcdf dt_global_allsat_phy_l4_20200115 {
dimensions:
	time = UNLIMITED ; // (1 currently)
	lat = 2 ;
	lon = 3 ;
variables:
	float lat(lat) ;
		lat:units = "degrees_north" ;
	float lon(lon) ;
		lon:units = "degrees_east" ;
	int adt(time, lat, lon) ;
		adt:_FillValue = -2147483647 ;
		adt:scale_factor = 0.0001 ;
		adt:add_offset = 0. ;
		adt:comment = "see http://example.org; details" ;

// global attributes:
		:title = "DT merged all satellites" ;
data:

 lat = -0.125, 0.125 ;

 lon = 0.125, 0.375,
    0.625 ;

 adt = 1000, _, 3000,
    4000, 5000, 6000 ;
}
"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = CdlDocument::parse(SAMPLE).unwrap();

        assert_eq!(doc.dimension("time"), Some(1));
        assert_eq!(doc.dimension("lat"), Some(2));
        assert_eq!(doc.dimension("lon"), Some(3));

        let adt = doc.variable("adt").unwrap();
        assert_eq!(adt.data_type, "int");
        assert_eq!(adt.dims, vec!["time", "lat", "lon"]);
        assert_eq!(adt.attribute_f64("scale_factor"), Some(0.0001));
        assert_eq!(adt.attribute_f64("_FillValue"), Some(-2147483647.0));
        assert!(adt.attributes["comment"].contains("http://example.org; details"));

        let data = adt.data.as_ref().unwrap();
        assert_eq!(data.len(), 6);
        assert!(data[1].is_nan());
        assert_eq!(data[5], 6000.0);

        assert_eq!(doc.variable("lon").unwrap().data, Some(vec![0.125, 0.375, 0.625]));
        assert!(doc.global_attributes.contains_key("title"));
    }

    #[test]
    fn test_parse_number_suffixes() {
        assert_eq!(parse_number("0.0001f"), Some(0.0001));
        assert_eq!(parse_number("-32767s"), Some(-32767.0));
        assert_eq!(parse_number("1.e+20f"), Some(1e20));
        assert_eq!(parse_number("12b"), Some(12.0));
        assert_eq!(parse_number("5UL"), Some(5.0));
        assert!(parse_number("NaNf").unwrap().is_nan());
        assert_eq!(parse_number("degrees"), None);
        assert_eq!(parse_number("f"), None);
    }

    #[test]
    fn test_multiple_declarations_per_statement() {
        let text = "netcdf x {\ndimensions:\n\tlat = 1, lon = 2 ;\nvariables:\n\tdouble lat(lat), lon(lon) ;\n}\n";
        let doc = CdlDocument::parse(text).unwrap();
        assert_eq!(doc.dimension("lon"), Some(2));
        assert_eq!(doc.variable("lat").unwrap().dims, vec!["lat"]);
        assert_eq!(doc.variable("lon").unwrap().data_type, "double");
    }

    #[test]
    fn test_bad_value_reported() {
        let text = "netcdf x {\ndimensions:\n\tlat = 1 ;\nvariables:\n\tfloat lat(lat) ;\ndata:\n lat = abc ;\n}\n";
        let err = CdlDocument::parse(text).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_unterminated_statement() {
        let text = "netcdf x {\nvariables:\n\tfloat lat(lat)\n";
        assert!(CdlDocument::parse(text).is_err());
    }
}
