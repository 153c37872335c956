use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Reads a whole file, or stdin when `path` is absent or `-`.
pub fn read_bytes(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path),
        _ => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

pub fn read_text(path: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| "Input must be valid UTF-8".into())
}
