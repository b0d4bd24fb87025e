//! One-shot pipeline: ingest, scan, equalize, and draft the email.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use equalizer_agent::AgentClient;
use equalizer_core::AgentIds;
use equalizer_workflow::{Step, Workflow};

use crate::{clipboard, display, export};

#[derive(Debug, Default)]
pub struct RunOptions {
    pub sample_text: bool,
    pub upload: bool,
    pub export: Option<PathBuf>,
    pub copy_email: bool,
}

pub async fn run<A: AgentClient + ?Sized>(
    agent: &A,
    agents: AgentIds,
    file: &Path,
    options: &RunOptions,
) -> anyhow::Result<Workflow> {
    let mut wf = Workflow::new(agents);

    let step = load(&mut wf, file, options.sample_text)?;
    advance(&wf, step)?;

    if options.upload {
        let step = wf.attach_assets(agent).await;
        if step == Step::Failed {
            eprintln!("  {} (scanning the preview text instead)", wf.status());
        } else {
            eprintln!("  {}", wf.status());
        }
    }

    let step = wf.scan(agent).await;
    advance(&wf, step)?;
    let step = wf.equalize(agent).await;
    advance(&wf, step)?;
    let step = wf.generate_email(agent).await;
    advance(&wf, step)?;

    print!("{}", display::render(&wf));

    if let Some(path) = &options.export {
        let written = export::write_export(&wf, Some(path))?;
        eprintln!("  Wrote {}", written.display());
    }
    if options.copy_email
        && let Some(text) = wf.email_text()
    {
        let copied = clipboard::copy(&text);
        wf.record_copy(copied);
        eprintln!("  {}", wf.status());
    }
    Ok(wf)
}

/// Read a document from disk into the workflow, as a PDF or as plain text.
pub fn load(wf: &mut Workflow, file: &Path, sample_text: bool) -> anyhow::Result<Step> {
    if sample_text {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        Ok(wf.ingest_text(&name, &text))
    } else {
        let document = equalizer_ingest::read_document(file)
            .with_context(|| format!("reading {}", file.display()))?;
        Ok(wf.ingest(document))
    }
}

fn advance(wf: &Workflow, step: Step) -> anyhow::Result<()> {
    match step {
        Step::Applied => {
            eprintln!("  {}", wf.status());
            Ok(())
        }
        Step::Failed | Step::Blocked => bail!("{}", wf.status()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equalizer_agent::AgentError;
    use equalizer_core::AgentReply;
    use equalizer_workflow::StageKind;
    use equalizer_workflow::testing::{ScriptedAgent, email_ok, equalize_ok, scan_ok};

    fn contract(dir: &Path) -> PathBuf {
        let path = dir.join("terms.txt");
        std::fs::write(&path, "1. Payment within 90 days.\n2. Either party may terminate.").unwrap();
        path
    }

    #[tokio::test]
    async fn sample_text_runs_to_email() {
        let tmp = tempfile::TempDir::new().unwrap();
        let agent = ScriptedAgent::new(vec![
            scan_ok(&[1, 2]),
            equalize_ok(&[(1, "Payment", "Unfair"), (2, "Termination", "Fair")]),
            email_ok(),
        ]);
        let options = RunOptions {
            sample_text: true,
            export: Some(tmp.path().join("equalized.txt")),
            ..RunOptions::default()
        };

        let wf = run(&agent, AgentIds::default(), &contract(tmp.path()), &options)
            .await
            .unwrap();

        assert_eq!(wf.kind(), StageKind::EmailReady);
        let exported = std::fs::read_to_string(tmp.path().join("equalized.txt")).unwrap();
        assert_eq!(exported, "PAYMENT: Rewritten 1\n\nTERMINATION: Rewritten 2");
        assert!(agent.requests()[0].message.contains("Payment within 90 days."));
    }

    #[tokio::test]
    async fn pdf_check_applies_without_sample_flag() {
        let tmp = tempfile::TempDir::new().unwrap();
        let agent = ScriptedAgent::new(vec![]);
        let err = run(&agent, AgentIds::default(), &contract(tmp.path()), &RunOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please upload a PDF file under 10MB");
        assert!(agent.requests().is_empty());
    }

    #[tokio::test]
    async fn failed_stage_stops_the_run() {
        let tmp = tempfile::TempDir::new().unwrap();
        let agent = ScriptedAgent::new(vec![
            scan_ok(&[1]),
            Ok(AgentReply::failed("equalizer is overloaded")),
        ]);
        let options = RunOptions {
            sample_text: true,
            ..RunOptions::default()
        };

        let err = run(&agent, AgentIds::default(), &contract(tmp.path()), &options)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "equalizer is overloaded");
        assert_eq!(agent.requests().len(), 2);
    }

    #[tokio::test]
    async fn upload_failure_is_not_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let agent = ScriptedAgent::new(vec![
            scan_ok(&[1]),
            equalize_ok(&[(1, "Payment", "Fair")]),
            email_ok(),
        ])
        .with_upload(Err(AgentError::Server {
            status: 500,
            body: "boom".into(),
        }));
        let options = RunOptions {
            sample_text: true,
            upload: true,
            ..RunOptions::default()
        };

        let wf = run(&agent, AgentIds::default(), &contract(tmp.path()), &options)
            .await
            .unwrap();
        assert_eq!(wf.kind(), StageKind::EmailReady);
        assert!(agent.requests()[0].assets.is_empty());
    }

    #[tokio::test]
    async fn missing_file_has_context() {
        let tmp = tempfile::TempDir::new().unwrap();
        let agent = ScriptedAgent::new(vec![]);
        let err = run(
            &agent,
            AgentIds::default(),
            &tmp.path().join("absent.pdf"),
            &RunOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("reading "));
    }
}
