use anyhow::Result;
use serde::Serialize;
use timeseed::{SearchResult, window::format_utc};

/// Machine-readable form of a search result.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Report {
    Found {
        attempts: u64,
        timestamp: i64,
        utc: String,
        plaintext: String,
    },
    NotFound {
        attempts: u64,
    },
    Interrupted {
        attempts: u64,
    },
}

impl From<&SearchResult> for Report {
    fn from(result: &SearchResult) -> Self {
        match result {
            SearchResult::Found {
                timestamp,
                plaintext,
                attempts,
            } => Report::Found {
                attempts: *attempts,
                timestamp: *timestamp,
                utc: format_utc(*timestamp),
                plaintext: String::from_utf8_lossy(plaintext).into_owned(),
            },
            SearchResult::NotFound { attempts } => Report::NotFound {
                attempts: *attempts,
            },
            SearchResult::Interrupted { attempts } => Report::Interrupted {
                attempts: *attempts,
            },
        }
    }
}

pub fn print_json(result: &SearchResult) -> Result<()> {
    println!("{}", serde_json::to_string(&Report::from(result))?);
    Ok(())
}

pub fn print_text(result: &SearchResult) {
    match result {
        SearchResult::Found {
            timestamp,
            plaintext,
            attempts,
        } => {
            println!();
            println!("SUCCESS! Found the key after {attempts} attempts");
            println!("Timestamp: {} UTC", format_utc(*timestamp));
            println!("Decrypted plaintext:");
            println!("{}", String::from_utf8_lossy(plaintext));
        }
        SearchResult::NotFound { attempts } => {
            println!("Failed to decrypt after {attempts} attempts");
        }
        SearchResult::Interrupted { attempts } => {
            println!("Interrupted after {attempts} attempts");
        }
    }
}
