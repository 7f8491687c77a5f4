use std::collections::HashMap;

use crate::error::ParseError;

/// A parsed raw HTTP request that is replayed once per round.
///
/// Templates are built once at startup by [`parse`] and never change
/// afterwards. The dispatch loop shares them read-only across every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    method: String,
    url: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Template {
    /// Attach the name the loader derived from the template's source.
    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Parse a raw request (`METHOD path[ version]`, header lines, blank line,
/// body) into a [`Template`]. CRLF and LF line endings are both accepted.
///
/// Header lines without a colon are skipped. Duplicate header names keep the
/// last value. The body is everything after the blank line, byte for byte.
pub fn parse(data: &[u8]) -> Result<Template, ParseError> {
    let mut lines = Lines::new(data);

    let request_line = match lines.next() {
        Some(Line::Terminated(line)) => line,
        _ => return Err(ParseError::MissingRequestLine),
    };
    let request_line =
        std::str::from_utf8(request_line).map_err(|_| ParseError::MissingRequestLine)?;

    // The path field may be empty ("GET  /x" splits into "GET", "", "/x");
    // only a missing field or an empty method is malformed.
    let mut parts = request_line.trim().splitn(3, ' ');
    let method = parts.next().unwrap_or_default();
    let path = match parts.next() {
        Some(path) if !method.is_empty() => path,
        _ => return Err(ParseError::MalformedRequestLine(request_line.trim().to_string())),
    };

    let mut headers = HashMap::new();
    while let Some(line) = lines.next() {
        let line = std::str::from_utf8(line.bytes())
            .map_err(|_| ParseError::HeaderReadFailure(lines.line_no))?
            .trim();
        if line.is_empty() {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            tracing::trace!("skipping header line without colon: {:?}", line);
            continue;
        };
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    let url = resolve_url(path, &headers)?;

    Ok(Template {
        name: String::new(),
        method: method.to_string(),
        url,
        headers,
        body: lines.rest().to_vec(),
    })
}

fn resolve_url(path: &str, headers: &HashMap<String, String>) -> Result<String, ParseError> {
    if path.starts_with("http") {
        return Ok(path.to_string());
    }

    let host = headers.get("Host").ok_or(ParseError::MissingHostHeader)?;

    Ok(format!("{}://{}{}", scheme_for(path), host, path))
}

// Only reached for paths that do not start with "http", so the plain-http
// branch never matches while the prefix check in resolve_url stays as is.
fn scheme_for(path: &str) -> &'static str {
    if path.starts_with("http://") {
        "http"
    } else {
        "https"
    }
}

enum Line<'a> {
    Terminated(&'a [u8]),
    Unterminated(&'a [u8]),
}

impl<'a> Line<'a> {
    fn bytes(&self) -> &'a [u8] {
        match self {
            Line::Terminated(b) | Line::Unterminated(b) => b,
        }
    }
}

/// Splits on `\n` while remembering how much of the input has been consumed,
/// so the body can be taken verbatim once the headers end.
struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
    line_no: usize,
}

impl<'a> Lines<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line_no: 0,
        }
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        self.line_no += 1;

        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos += end + 1;
                Some(Line::Terminated(&rest[..=end]))
            }
            None => {
                self.pos = self.data.len();
                Some(Line::Unterminated(rest))
            }
        }
    }
}
