pub mod file;
pub mod stdin;

use serde_json::Value;

/// JSON from `--input` when given, otherwise from piped stdin.
pub fn read_value(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(file::read_json_value(p)?)),
        None => stdin::read_stdin(),
    }
}
