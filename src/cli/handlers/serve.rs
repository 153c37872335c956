//! One JSON request per input line, one JSON response per output line.
//!
//! A line that is not a valid request still gets a reply with `operation`
//! and `error`. `operation` echoes the line's `operation` field when there
//! is one, and is `null` otherwise.

use crate::cli::{Context, args::ServeArgs};
use babel_books::{Request, WorkerHandle};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

pub fn handle(args: ServeArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let worker = WorkerHandle::spawn_with(ctx.worker(), args.preload)?;
    info!(preload = args.preload, "serving requests on stdin");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) => serde_json::to_string(&worker.call(request)?)?,
            Err(e) => {
                warn!(error = %e, "malformed request");
                rejected(&line, &e).to_string()
            }
        };
        writeln!(out, "{}", reply)?;
        out.flush()?;
    }
    Ok(())
}

fn rejected(line: &str, error: &serde_json::Error) -> Value {
    let operation = serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|value| value.get("operation").cloned())
        .unwrap_or(Value::Null);
    json!({
        "operation": operation,
        "error": format!("invalid request: {}", error),
    })
}
