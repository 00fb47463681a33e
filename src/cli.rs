use crate::api::{ConsoleClient, SegmentApi};
use crate::dialog::{DialogHost, DialogProps, SegmentDialog};
use crate::i18n::Catalog;
use crate::model::{ClientConfig, CreatedSegment, Notice, NoticeKind, SegmentTarget};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "segment-studio",
    version,
    about = "Add a segment to a dataset document, interactively or from flags"
)]
pub struct Cli {
    /// Base URL of the console API
    #[arg(long, default_value = "http://localhost:5001/console/api")]
    pub base_url: String,

    /// Bearer token for the console API
    #[arg(long, env = "SEGMENT_STUDIO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value = "15s")]
    pub timeout: humantime::Duration,

    /// Dataset that owns the document
    #[arg(long)]
    pub dataset_id: String,

    /// Document the segment is added to
    #[arg(long)]
    pub document_id: String,

    /// Document form; `qa_model` authors question/answer segments
    #[arg(long, default_value = "text_model")]
    pub doc_form: String,

    /// JSON file overriding user-facing messages by id
    #[arg(long)]
    pub messages: Option<std::path::PathBuf>,

    /// Segment content (the question for `qa_model`); submits without the TUI
    #[arg(long)]
    pub content: Option<String>,

    /// Answer for `qa_model` segments
    #[arg(long)]
    pub answer: Option<String>,

    /// Keyword to attach; repeat for several, order is kept
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Extended data API to answer from (see --list-options)
    #[arg(long)]
    pub extended_data: Option<String>,

    /// Print the created segment as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary of the created segment and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// List the selectable extended data APIs and exit
    #[arg(long)]
    pub list_options: bool,
}

impl Cli {
    /// Any segment field given as a flag means the run is flag-driven.
    fn is_headless(&self) -> bool {
        self.content.is_some()
            || self.answer.is_some()
            || !self.keywords.is_empty()
            || self.extended_data.is_some()
            || self.json
            || self.text
            || self.list_options
    }
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        token: args.token.clone(),
        timeout: Duration::from(args.timeout),
        user_agent: format!("segment-studio/{}", env!("CARGO_PKG_VERSION")),
    }
}

pub fn build_props(args: &Cli) -> DialogProps {
    DialogProps {
        doc_form: args.doc_form.clone(),
        target: SegmentTarget {
            dataset_id: args.dataset_id.clone(),
            document_id: args.document_id.clone(),
        },
    }
}

pub fn load_catalog(args: &Cli) -> Result<Catalog> {
    match args.messages.as_deref() {
        Some(path) => Catalog::from_json_file(path),
        None => Ok(Catalog::default()),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    let catalog = load_catalog(&args)?;
    let client = ConsoleClient::new(&build_config(&args))?;

    if !args.is_headless() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, client, catalog).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            anyhow::bail!("built without TUI support; pass --content to submit headlessly");
        }
    }

    run_headless(args, client, catalog).await
}

/// Host for flag-driven runs: notifications go to stderr.
struct HeadlessHost {
    catalog: Catalog,
    out: mpsc::UnboundedSender<OutputLine>,
    created: Option<CreatedSegment>,
    failure: Option<String>,
}

impl DialogHost for HeadlessHost {
    fn notify(&mut self, notice: Notice) {
        let text = self.catalog.render(&notice);
        if notice.kind == NoticeKind::Error {
            self.failure = Some(text.clone());
        }
        let _ = self.out.send(OutputLine::Stderr(text));
    }

    fn on_save(&mut self, created: &CreatedSegment) {
        self.created = Some(created.clone());
    }

    fn on_cancel(&mut self) {
        tracing::debug!("headless dialog closed");
    }
}

async fn run_headless(args: Cli, client: ConsoleClient, catalog: Catalog) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let res = submit_from_args(&args, &client, catalog, &out_tx).await;
    drop(out_tx);
    let _ = out_handle.await;
    res
}

async fn submit_from_args<A: SegmentApi + ?Sized>(
    args: &Cli,
    api: &A,
    catalog: Catalog,
    out_tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<()> {
    let mut dialog = SegmentDialog::new(build_props(args));
    if let Err(e) = dialog.open(api).await {
        if args.list_options || args.extended_data.is_some() {
            return Err(anyhow::Error::new(e).context("failed to load extended data APIs"));
        }
        let _ = out_tx.send(OutputLine::Stderr(format!(
            "warning: could not load extended data APIs: {e}"
        )));
    }

    if args.list_options {
        if args.json {
            let out = serde_json::to_string_pretty(dialog.options())?;
            let _ = out_tx.send(OutputLine::Stdout(out));
        } else {
            for entry in dialog.options() {
                let _ = out_tx.send(OutputLine::Stdout(format!("{}\t{}", entry.value, entry.label)));
            }
        }
        return Ok(());
    }

    let store = dialog.store_mut();
    store.set_content(args.content.clone().unwrap_or_default());
    store.set_answer(args.answer.clone().unwrap_or_default());
    store.set_keywords(args.keywords.clone());
    if let Some(ext) = args.extended_data.as_deref() {
        if !dialog.select_option(ext) {
            anyhow::bail!("unknown extended data API '{ext}' (see --list-options)");
        }
    }

    let mut host = HeadlessHost {
        catalog,
        out: out_tx.clone(),
        created: None,
        failure: None,
    };
    dialog.submit(api, &mut host).await;

    if let Some(failure) = host.failure {
        anyhow::bail!(failure);
    }
    let created = host
        .created
        .context("submission finished without a result")?;
    let lines = if args.json {
        vec![serde_json::to_string_pretty(&created)?]
    } else {
        summary_lines(&created)
    };
    for line in lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    Ok(())
}

fn summary_lines(created: &CreatedSegment) -> Vec<String> {
    let seg = &created.data;
    let mut lines = vec![format!(
        "Segment {} added at {}",
        if seg.id.is_empty() { "-" } else { seg.id.as_str() },
        time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "now".into())
    )];
    if let Some(pos) = seg.position {
        lines.push(format!("Position: {pos}"));
    }
    if let (Some(words), Some(tokens)) = (seg.word_count, seg.tokens) {
        lines.push(format!("Words/Tokens: {words} / {tokens}"));
    }
    if !seg.keywords.is_empty() {
        lines.push(format!("Keywords: {}", seg.keywords.join(", ")));
    }
    lines
}
