//! Line-oriented record parser
//!
//! Input is split into lines; blank lines are skipped. Every other line is
//! decoded on its own, so a malformed line (invalid UTF-8 included) never
//! discards the lines around it. Records come out in file order, which is
//! not assumed to be time order.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use skirmish_core::ErrorPolicy;
use tracing::warn;

/// Decoded records, each with its 1-based source line, plus the errors of
/// lines that were skipped
#[derive(Debug)]
pub struct Parsed<T> {
    pub records: Vec<(usize, T)>,
    pub errors: Vec<Error>,
}

impl<T> Parsed<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Lazily decode each non-blank line, yielding its 1-based line number
///
/// Accepts text or raw bytes; a line that is not valid UTF-8 becomes a
/// `Error::Parse` for that line only.
pub fn parse_lines<'a, T, B>(input: &'a B) -> impl Iterator<Item = (usize, Result<T>)> + 'a
where
    T: DeserializeOwned + 'a,
    B: AsRef<[u8]> + ?Sized + 'a,
{
    input
        .as_ref()
        .split(|&byte| byte == b'\n')
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_ascii()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(number, line)| {
            let decoded = serde_json::from_slice(line).map_err(|source| Error::Parse {
                line: number,
                source,
            });
            (number, decoded)
        })
}

/// Decode a whole text
///
/// With `ErrorPolicy::Skip` every malformed line is logged and collected in
/// `Parsed::errors`; with `ErrorPolicy::Abort` the first one is returned.
pub fn parse<T, B>(input: &B, policy: ErrorPolicy) -> Result<Parsed<T>>
where
    T: DeserializeOwned,
    B: AsRef<[u8]> + ?Sized,
{
    let mut parsed = Parsed {
        records: Vec::new(),
        errors: Vec::new(),
    };

    for (line, decoded) in parse_lines(input) {
        match decoded {
            Ok(record) => parsed.records.push((line, record)),
            Err(e) => {
                if policy == ErrorPolicy::Abort {
                    return Err(e);
                }
                warn!(line, error = %e, "skipping malformed record");
                parsed.errors.push(e);
            }
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventKind, RawEventRecord};

    const LOG: &str = r#"
{"ts":0,"type":"entity_spawned","id":"e1","data":{"name":"Bob","team":"red","x":0,"y":0,"max_hp":100}}

{"ts":5,"type":"entity_died","id":"e1","data":{"killer_id":"e2"}}

"#;

    #[test]
    fn test_parse_skips_blank_lines() {
        let parsed: Parsed<RawEventRecord> = parse(LOG, ErrorPolicy::Skip).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.errors.is_empty());
        let (line, died) = &parsed.records[1];
        assert_eq!(*line, 4);
        assert_eq!(died.kind, EventKind::Died);
        assert_eq!(died.data.killer_id, "e2");
    }

    #[test]
    fn test_parse_empty_input() {
        let parsed: Parsed<RawEventRecord> = parse("\n  \n", ErrorPolicy::Skip).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_line_is_collected() {
        let text = concat!(
            "{\"ts\":0,\"type\":\"entity_spawned\",\"id\":\"a\"}\n",
            "{not json}\n",
            "{\"ts\":1,\"type\":\"entity_moved\",\"id\":\"a\",\"data\":{\"x\":1,\"y\":1}}\n",
        );

        let parsed: Parsed<RawEventRecord> = parse(text, ErrorPolicy::Skip).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert!(matches!(parsed.errors[0], Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_malformed_line_aborts() {
        let text = "{\"ts\":0,\"type\":\"entity_spawned\",\"id\":\"a\"}\n{\"ts\":\"soon\"}\n";
        let result: Result<Parsed<RawEventRecord>> = parse(text, ErrorPolicy::Abort);
        assert!(matches!(result, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_unknown_type_is_not_a_parse_error() {
        let text = "{\"ts\":0,\"type\":\"entity_healed\",\"id\":\"a\"}\r\n";
        let parsed: Parsed<RawEventRecord> = parse(text, ErrorPolicy::Abort).unwrap();
        assert_eq!(
            parsed.records[0].1.kind,
            EventKind::Unknown("entity_healed".to_string())
        );
    }

    #[test]
    fn test_parse_lines_reports_line_numbers() {
        let lines: Vec<usize> = parse_lines::<RawEventRecord, str>(LOG)
            .map(|(line, _)| line)
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_invalid_utf8_line_is_collected() {
        let mut input = b"{\"ts\":0,\"type\":\"entity_spawned\",\"id\":\"a\"}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"ts\":1,\"type\":\"entity_moved\",\"id\":\"a\"}\n");

        let parsed: Parsed<RawEventRecord> = parse(&input, ErrorPolicy::Skip).unwrap();
        let lines: Vec<usize> = parsed.records.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line(), Some(2));
    }
}
