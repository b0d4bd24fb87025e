//! Line-driven interactive session over a single workflow.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use equalizer_agent::AgentClient;
use equalizer_core::{AgentIds, ClauseId};
use equalizer_workflow::{Step, Workflow};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{clipboard, display, export, run};

const HELP: &str = "\
  load <file>      load a PDF contract
  sample <file>    load a text file as contract text
  upload           upload the document and attach it to the scan
  scan             extract clauses
  equalize         analyze clause fairness
  email            draft the negotiation email
  show             show the current state
  expand <id>      show or hide the analysis of one clause
  export [path]    write the equalized contract
  copy             copy the email to the clipboard
  reset            start over
  status           show the status and session journal
  quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load(PathBuf),
    Sample(PathBuf),
    Upload,
    Scan,
    Equalize,
    Email,
    Show,
    Expand(ClauseId),
    Export(Option<PathBuf>),
    Copy,
    Reset,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let path = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage: {usage}"))
            } else {
                Ok(PathBuf::from(rest))
            }
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "load" => Self::Load(path("load <file>")?),
            "sample" => Self::Sample(path("sample <file>")?),
            "upload" => Self::Upload,
            "scan" => Self::Scan,
            "equalize" => Self::Equalize,
            "email" => Self::Email,
            "show" => Self::Show,
            "expand" => {
                let id = rest
                    .parse()
                    .map_err(|_| format!("usage: expand <id> (got {rest:?})"))?;
                Self::Expand(id)
            }
            "export" => Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "copy" => Self::Copy,
            "reset" => Self::Reset,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command {other:?}; try help")),
        };
        Ok(Some(command))
    }
}

pub async fn run_shell<A: AgentClient + ?Sized>(agent: &A, agents: AgentIds) -> anyhow::Result<()> {
    let mut wf = Workflow::new(agents);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        print!("equalizer> ");
        std::io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next_line().await.context("reading input")? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("  {e}");
                continue;
            }
        };
        match execute(&mut wf, agent, command).await {
            Ok(output) => print!("{output}"),
            Err(e) => println!("  error: {e:#}"),
        }
    }
    Ok(())
}

/// Apply one command and return what to print.
pub async fn execute<A: AgentClient + ?Sized>(
    wf: &mut Workflow,
    agent: &A,
    command: ShellCommand,
) -> anyhow::Result<String> {
    let step = match command {
        ShellCommand::Load(path) => run::load(wf, &path, false)?,
        ShellCommand::Sample(path) => run::load(wf, &path, true)?,
        ShellCommand::Upload => wf.attach_assets(agent).await,
        ShellCommand::Scan => wf.scan(agent).await,
        ShellCommand::Equalize => wf.equalize(agent).await,
        ShellCommand::Email => wf.generate_email(agent).await,
        ShellCommand::Show => return Ok(display::render(wf)),
        ShellCommand::Expand(id) => {
            if wf.analysis_for(id).is_none() {
                return Ok(format!("  no analysis for clause {id}\n"));
            }
            wf.toggle_expanded(id);
            return Ok(display::render(wf));
        }
        ShellCommand::Export(path) => {
            let written = export::write_export(wf, path.as_deref())?;
            return Ok(format!("  Wrote {}\n", written.display()));
        }
        ShellCommand::Copy => {
            let Some(text) = wf.email_text() else {
                return Ok("  No email drafted yet\n".to_string());
            };
            let copied = clipboard::copy(&text);
            wf.record_copy(copied);
            Step::Applied
        }
        ShellCommand::Reset => {
            wf.reset();
            return Ok("  Session cleared\n".to_string());
        }
        ShellCommand::Status => {
            let status = if wf.status().is_empty() { "idle" } else { wf.status() };
            return Ok(format!("  {status}\n{}", display::render_journal(wf.journal())));
        }
        ShellCommand::Help => return Ok(format!("{HELP}\n")),
        ShellCommand::Quit => return Ok(String::new()),
    };

    Ok(match step {
        Step::Applied if wf.clauses().is_empty() => format!("  {}\n", wf.status()),
        Step::Applied => display::render(wf),
        Step::Failed | Step::Blocked if wf.status().is_empty() => "  Nothing to do\n".to_string(),
        Step::Failed | Step::Blocked => format!("  {}\n", wf.status()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use equalizer_workflow::testing::{ScriptedAgent, equalize_ok, scan_ok};
    use equalizer_workflow::StageKind;

    #[test]
    fn parses_commands() {
        assert_eq!(ShellCommand::parse("   "), Ok(None));
        assert_eq!(ShellCommand::parse("SCAN"), Ok(Some(ShellCommand::Scan)));
        assert_eq!(
            ShellCommand::parse("load  My Lease.pdf "),
            Ok(Some(ShellCommand::Load(PathBuf::from("My Lease.pdf"))))
        );
        assert_eq!(ShellCommand::parse("expand 12"), Ok(Some(ShellCommand::Expand(12))));
        assert_eq!(ShellCommand::parse("export"), Ok(Some(ShellCommand::Export(None))));
        assert_eq!(
            ShellCommand::parse("export out.txt"),
            Ok(Some(ShellCommand::Export(Some(PathBuf::from("out.txt")))))
        );
        assert_eq!(ShellCommand::parse("exit"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ShellCommand::parse("load").is_err());
        assert!(ShellCommand::parse("expand two").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    #[tokio::test]
    async fn session_walkthrough() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("terms.txt");
        std::fs::write(&path, "1. Payment within 90 days.").unwrap();
        let agent = ScriptedAgent::new(vec![scan_ok(&[1]), equalize_ok(&[(1, "Payment", "Unfair")])]);
        let mut wf = Workflow::default();

        let out = execute(&mut wf, &agent, ShellCommand::Equalize).await.unwrap();
        assert_eq!(out, "  Please scan the contract first\n");

        let out = execute(&mut wf, &agent, ShellCommand::Sample(path)).await.unwrap();
        assert_eq!(out, "  File loaded: terms.txt\n");

        let out = execute(&mut wf, &agent, ShellCommand::Scan).await.unwrap();
        assert!(out.contains("── Clauses ──"));

        execute(&mut wf, &agent, ShellCommand::Equalize).await.unwrap();
        let out = execute(&mut wf, &agent, ShellCommand::Expand(1)).await.unwrap();
        assert!(out.contains("rewritten: Rewritten 1"));
        let out = execute(&mut wf, &agent, ShellCommand::Expand(1)).await.unwrap();
        assert!(!out.contains("rewritten:"));

        let target = tmp.path().join("out.txt");
        execute(&mut wf, &agent, ShellCommand::Export(Some(target.clone())))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(target).unwrap(), "PAYMENT: Rewritten 1");

        let out = execute(&mut wf, &agent, ShellCommand::Copy).await.unwrap();
        assert_eq!(out, "  No email drafted yet\n");

        let out = execute(&mut wf, &agent, ShellCommand::Reset).await.unwrap();
        assert_eq!(out, "  Session cleared\n");
        assert_eq!(wf.kind(), StageKind::Empty);
    }

    #[tokio::test]
    async fn expand_unknown_clause() {
        let agent = ScriptedAgent::new(vec![]);
        let mut wf = Workflow::default();
        let out = execute(&mut wf, &agent, ShellCommand::Expand(3)).await.unwrap();
        assert_eq!(out, "  no analysis for clause 3\n");
    }
}
