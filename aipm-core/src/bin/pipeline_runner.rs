use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use aipm_core::pipeline::{PipelineState, StepArtifact};
use aipm_core::stage::{AnalysisStage, DocumentStage, PromptStage};
use aipm_core::{AipmConfig, AnswerSet, DocumentKind, Requirement};
use aipm_llm_sdk::LlmClient;

#[derive(Parser)]
#[command(name = "pipeline-runner")]
#[command(about = "Run the requirement pipeline end to end for a free-text product idea")]
struct Args {
    /// The product idea to analyze
    #[arg(short, long)]
    requirement: String,

    /// Path to a JSON file with questionnaire answers (question id to
    /// answer); when omitted the document is generated from defaults
    #[arg(short, long)]
    answers: Option<PathBuf>,

    /// Document kind to generate: MRD or PRD. Defaults to the config
    /// file's [document] kind, else MRD
    #[arg(short, long)]
    document_kind: Option<String>,

    /// Path to configuration file; the default location is used (and
    /// seeded) when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match &args.config {
        Some(path) => AipmConfig::load_from(path)?,
        None => AipmConfig::load()?.0,
    };

    let document_kind: DocumentKind = args
        .document_kind
        .as_deref()
        .or_else(|| config.document_kind())
        .unwrap_or("MRD")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let chat_client = config.build_chat_client()?;
    if chat_client.check_availability().await {
        println!("Remote service is reachable (trace id: {})", chat_client.trace_id());
    } else {
        println!("Remote service is unreachable, stages will use local generators");
    }
    let client: Arc<dyn LlmClient> = Arc::new(chat_client);

    let answers: AnswerSet = match &args.answers {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => AnswerSet::new(),
    };

    let requirement = Requirement::new(&args.requirement);
    let mut state = PipelineState::new();
    let generation = state.generation();

    state.advance_from(generation, StepArtifact::Requirement(requirement.clone()))?;

    println!("\n== Step 2: 问卷 ==");
    let analysis = AnalysisStage::new(client.clone()).run(&requirement).await?;
    if let Err(problem) = analysis.artifact.validate() {
        tracing::warn!(%problem, "Generated question set is malformed");
    }
    println!("[{}] {}", analysis.provenance, analysis.artifact.analysis);
    for question in &analysis.artifact.questions {
        println!("- ({}) {}", question.category, question.question);
        if let Some(options) = &question.options {
            println!("  选项: {}", options.join(" / "));
        }
    }
    state.advance_from(
        generation,
        StepArtifact::Questionnaire {
            analysis,
            answers: answers.clone(),
        },
    )?;

    println!("\n== Step 3: {document_kind}文档 ==");
    let document = DocumentStage::new(client.clone())
        .run(&requirement, &answers, document_kind)
        .await?;
    println!(
        "[{}] v{}, {} 字",
        document.provenance, document.artifact.metadata.version, document.artifact.metadata.word_count
    );
    for section in &document.artifact.document {
        println!("\n# {}\n{}", section.title, section.content);
    }
    let generated_document = document.artifact.clone();
    state.advance_from(generation, StepArtifact::Document(document))?;

    println!("\n== Step 4: AI Coding 提示词 ==");
    let prompts = PromptStage::new(client).run(&generated_document).await?;
    println!(
        "[{}] 技术栈: {}, 预计周期: {}",
        prompts.provenance,
        prompts.artifact.tech_stack.join(", "),
        prompts.artifact.estimated_time
    );
    println!("\n{}", prompts.artifact.combined());
    state.advance_from(generation, StepArtifact::CodePrompts(prompts))?;

    if state.is_complete() {
        println!("\n== Step 5: 完成 ==");
    }

    Ok(())
}
