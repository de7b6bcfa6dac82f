//! Ask command handler.
//!
//! Answers one question against the configured document index.

use clap::Args;
use std::path::PathBuf;
use yellow_core::{config::AppConfig, AppError, AppResult};
use yellow_knowledge::{build_handler, OperatingMode, QueryRequest, QueryResponse};

/// Ask a question about the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required_unless_present = "request")]
    pub question: Option<String>,

    /// Read a JSON request ({"question", "namespace", "collection", "index"}) from a file
    #[arg(long, conflicts_with = "question")]
    pub request: Option<PathBuf>,

    /// Operating mode (evidence, answer-only)
    #[arg(long, value_parser = parse_mode, env = "YELLOW_MODE")]
    pub mode: Option<OperatingMode>,

    /// Index namespace (defaults to the mode's namespace)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Index collection (defaults to the mode's collection)
    #[arg(long)]
    pub collection: Option<String>,

    /// Index name (defaults to the mode's index)
    #[arg(long)]
    pub index: Option<String>,

    /// Output the response as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_mode(s: &str) -> Result<OperatingMode, String> {
    OperatingMode::parse(s).ok_or_else(|| format!("unknown mode '{}' (evidence, answer-only)", s))
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        let request = self.build_request()?;
        let handler = build_handler(config, self.mode)?;
        let profile = handler.profile();
        tracing::debug!(
            mode = %profile.mode,
            index = %request.resolve(&profile.defaults),
            "Resolved query target"
        );

        let response = handler.handle(&request).await?;

        self.print(&response)
    }

    /// Assemble the request from a JSON file or flags; flags win over file fields.
    fn build_request(&self) -> AppResult<QueryRequest> {
        let mut request = match (&self.question, &self.request) {
            (Some(question), _) => QueryRequest::new(question.clone()),
            (None, Some(path)) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("Failed to read request file {:?}: {}", path, e))
                })?;
                serde_json::from_str(&contents)?
            }
            (None, None) => {
                return Err(AppError::Config("No question provided".to_string()));
            }
        };

        if let Some(ref namespace) = self.namespace {
            request.namespace = Some(namespace.clone());
        }
        if let Some(ref collection) = self.collection {
            request.collection = Some(collection.clone());
        }
        if let Some(ref index) = self.index {
            request.index = Some(index.clone());
        }

        Ok(request)
    }

    fn print(&self, response: &QueryResponse) -> AppResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(response)?);
            return Ok(());
        }

        match response.answer {
            Some(ref answer) => println!("{}", answer),
            None => eprintln!("No relevant documents found; no answer was generated."),
        }

        if let Some(ref documents) = response.documents {
            if !documents.is_empty() {
                println!();
                println!("Sources:");
                for (i, doc) in documents.iter().enumerate() {
                    println!(
                        "  [{}] {}/{}/{} (score {:.3})",
                        i + 1,
                        doc.document_path.namespace,
                        doc.document_path.collection,
                        doc.document_path.name,
                        doc.score
                    );
                }
            }
        }

        Ok(())
    }
}
