// The pass-through console: raw CAT lines in, raw replies out.
//
// A debugging aid, not a transfer path: no validation, no retry, and
// replies are printed verbatim -- including `?;` and partial data.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use ft991util_cat::Ft991;

/// How long to wait for a reply to a hand-typed command. Generous,
/// because some commands (e.g. memory tuning) answer slowly.
const PASSTHROUGH_TIMEOUT: Duration = Duration::from_secs(2);

/// Normalize one operator line into a CAT command.
///
/// Uppercases, appends the `;` terminator if missing, and returns
/// `None` for the `exit` request. Empty input yields an empty command
/// (the caller re-prompts).
fn prepare_line(input: &str) -> Option<String> {
    let line = input.trim().to_ascii_uppercase();
    if line == "EXIT" {
        return None;
    }
    if line.is_empty() {
        return Some(String::new());
    }
    if line.ends_with(';') {
        Some(line)
    } else {
        Some(format!("{line};"))
    }
}

/// Run the interactive console until the operator types `exit`.
pub async fn run(rig: &mut Ft991, dry_run: bool) -> Result<()> {
    println!("Entering pass-through mode. Type 'exit' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("CAT# ");
        std::io::stdout().flush()?;

        let Some(input) = lines.next_line().await? else {
            break; // EOF
        };
        let Some(command) = prepare_line(&input) else {
            break;
        };
        if command.is_empty() {
            continue;
        }

        if dry_run {
            println!("dry run: would send {command}");
            continue;
        }

        let reply = rig.raw_exchange(&command, PASSTHROUGH_TIMEOUT).await?;
        if !reply.is_empty() {
            println!("{reply}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_terminator() {
        assert_eq!(prepare_line("if"), Some("IF;".to_string()));
    }

    #[test]
    fn keeps_existing_terminator() {
        assert_eq!(prepare_line("FA014250000;"), Some("FA014250000;".to_string()));
    }

    #[test]
    fn uppercases_input() {
        assert_eq!(prepare_line("mc003;"), Some("MC003;".to_string()));
    }

    #[test]
    fn exit_in_any_case_leaves() {
        assert_eq!(prepare_line("exit"), None);
        assert_eq!(prepare_line("EXIT"), None);
        assert_eq!(prepare_line("  Exit  "), None);
    }

    #[test]
    fn empty_line_reprompts() {
        assert_eq!(prepare_line(""), Some(String::new()));
        assert_eq!(prepare_line("   "), Some(String::new()));
    }
}
