//! `siteforge decode`

use std::fs::File;
use std::io::{self, Read};

use anyhow::{Context, Result};

use siteforge_progress::{LogStreamDecoder, PartialLog};

const CHUNK_SIZE: usize = 8 * 1024;

/// Stream-decode a wire log from a file or stdin, printing steps as they
/// complete. Truncated input yields every step that was fully received.
pub fn execute_decode_command(input: &str, json: bool) -> Result<()> {
    let mut reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(input).with_context(|| format!("Failed to open {input}"))?)
    };

    let mut decoder = LogStreamDecoder::new();
    let mut steps = Vec::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read {input}"))?;
        if n == 0 {
            break;
        }
        for step in decoder.push(&buf[..n])? {
            if !json {
                println!("{step}");
            }
            steps.push(step);
        }
    }
    steps.extend(decoder.finish()?);

    let partial = PartialLog {
        steps,
        is_complete: decoder.is_complete(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&partial)?);
    } else if partial.is_complete {
        println!("-- complete, {} steps", partial.steps.len());
    } else {
        println!("-- incomplete, {} steps recovered", partial.steps.len());
    }
    Ok(())
}
