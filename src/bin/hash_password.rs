//! Produce an Argon2id hash for a credential list entry
//!
//! Usage:
//!   teacher-report-hash-password --username admin --role admin
//!
//! The password is read from the first line of stdin. The output is one JSON
//! object ready to paste into USERS_FILE.

use clap::Parser;
use std::io::BufRead;

use teacher_report::auth::{hash_password, Role};

#[derive(Parser, Debug)]
#[command(name = "teacher-report-hash-password")]
#[command(about = "Hash a password for the teacher-report credential list")]
#[command(version)]
struct Args {
    /// Login name of the entry
    #[arg(long)]
    username: String,

    /// Role granted to the entry (viewer, admin)
    #[arg(long, default_value = "viewer")]
    role: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let role: Role = serde_json::from_value(serde_json::Value::String(args.role.clone()))
        .map_err(|_| anyhow::anyhow!("Unknown role '{}'", args.role))?;

    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("Empty password on stdin");
    }

    let hash = hash_password(password)?;
    let entry = serde_json::json!({
        "username": args.username,
        "passwordHash": hash,
        "role": role,
    });
    println!("{}", entry);
    Ok(())
}
