//! Reads the newline-delimited JSON order file the customer driver
//! replays into the kitchen.

use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MalformedOrder, OrderSourceError};
use crate::order::{Order, Temp};

/// The on-disk shape of one order record. Any field beyond `id`/`temp`
/// is captured in `extra` and carried through to delivery untouched.
#[derive(Debug, Deserialize)]
struct RawOrderRecord {
    id: String,
    temp: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// The result of a read: the orders that parsed, in file order, plus a
/// record of every line that didn't.
#[derive(Debug, Default)]
pub struct OrderSourceResult {
    pub orders: Vec<Order>,
    pub malformed: Vec<MalformedOrder>,
}

/// Reads `path` as one JSON object per line. Blank lines are skipped
/// silently; a line that is present but fails to parse as a record, or
/// names an unrecognized `temp`, is skipped and recorded in
/// `malformed` rather than aborting the read — a single bad record in
/// an otherwise-large file shouldn't cost the whole run.
pub fn read_orders(path: impl AsRef<Path>) -> Result<OrderSourceResult, OrderSourceError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| OrderSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut result = OrderSourceResult::default();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| OrderSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_record(trimmed) {
            Ok(order) => result.orders.push(order),
            Err(reason) => {
                warn!("[ ORDER-SOURCE ] skipping line {line_number}: {reason}");
                result.malformed.push(MalformedOrder {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    Ok(result)
}

fn parse_record(line: &str) -> Result<Order, String> {
    let raw: RawOrderRecord = serde_json::from_str(line).map_err(|err| err.to_string())?;
    if raw.id.is_empty() {
        return Err("missing id".to_string());
    }
    let temp = Temp::parse(&raw.temp)
        .ok_or_else(|| format!("unrecognized temp {:?}", raw.temp))?;
    Ok(Order::new(raw.id, temp).with_extra(raw.extra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_orders(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_well_formed_records_in_order() {
        let file = write_orders(
            "{\"id\": \"a\", \"temp\": \"hot\", \"name\": \"Cheeseburger\"}\n\
             {\"id\": \"b\", \"temp\": \"cold\"}\n",
        );
        let result = read_orders(file.path()).unwrap();
        assert_eq!(result.malformed.len(), 0);
        assert_eq!(result.orders.len(), 2);
        assert_eq!(result.orders[0].id, "a");
        assert_eq!(result.orders[0].temp, Temp::Hot);
        assert_eq!(
            result.orders[0].extra.get("name").unwrap(),
            &Value::String("Cheeseburger".to_string())
        );
        assert_eq!(result.orders[1].id, "b");
    }

    #[test]
    fn skips_blank_lines() {
        let file = write_orders("{\"id\": \"a\", \"temp\": \"hot\"}\n\n\n");
        let result = read_orders(file.path()).unwrap();
        assert_eq!(result.orders.len(), 1);
    }

    #[test]
    fn records_malformed_json_without_aborting() {
        let file = write_orders(
            "{\"id\": \"a\", \"temp\": \"hot\"}\n\
             not json at all\n\
             {\"id\": \"b\", \"temp\": \"cold\"}\n",
        );
        let result = read_orders(file.path()).unwrap();
        assert_eq!(result.orders.len(), 2);
        assert_eq!(result.malformed.len(), 1);
        assert_eq!(result.malformed[0].line, 2);
    }

    #[test]
    fn records_unrecognized_temp() {
        let file = write_orders("{\"id\": \"a\", \"temp\": \"lukewarm\"}\n");
        let result = read_orders(file.path()).unwrap();
        assert_eq!(result.orders.len(), 0);
        assert_eq!(result.malformed.len(), 1);
        assert!(result.malformed[0].reason.contains("lukewarm"));
    }

    #[test]
    fn records_empty_id() {
        let file = write_orders("{\"id\": \"\", \"temp\": \"hot\"}\n");
        let result = read_orders(file.path()).unwrap();
        assert_eq!(result.orders.len(), 0);
        assert_eq!(result.malformed.len(), 1);
        assert!(result.malformed[0].reason.contains("missing id"));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            read_orders("/nonexistent/path/orders.jsonl"),
            Err(OrderSourceError::Io { .. })
        ));
    }
}
