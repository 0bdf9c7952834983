//! Command Execution
//!
//! Shared runner for the task subcommands: validate the input, warn on
//! token risk, then execute the call through the retry executor, either
//! collecting a complete response or streaming fragments to the console.

use tracing::debug;

use crate::ai::{
    CompletionBackend, CompletionResponse, MessagesClient, RetryExecutor, StreamAccumulator,
    TaskRequest, TokenCounter, next_retry_event, text_delta, validate,
};
use crate::config::Config;
use crate::tasks::{self, TaskKind};
use crate::types::{QuillError, Result};

use super::output::Output;
use super::progress::ProgressIndicator;

/// Input for one task invocation
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub code: String,
    pub language: String,
    /// Target language, required for translation
    pub target_language: Option<String>,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Run one code task end to end
pub async fn run_task(config: &Config, kind: TaskKind, input: TaskInput) -> Result<()> {
    let out = Output::new();

    // Validation failures stop here; the call is never attempted
    let report = validate(&input.code, &input.language).into_result()?;
    if report.unrecognized_language {
        out.warning(&format!(
            "Language '{}' may not be fully supported",
            input.language
        ));
    }

    let request = build_request(kind, &input)?;

    // Advisory only: warn on truncation risk, then proceed
    let counter = TokenCounter::new();
    let outbound = format!("{}\n{}", request.prompt, input.code);
    if !counter.within_budget(&outbound, input.max_tokens) {
        out.warning(&format!(
            "Input is large (~{} tokens vs {} limit); the response may be truncated",
            counter.estimate(&outbound),
            input.max_tokens
        ));
    }

    let client = MessagesClient::new(&config.api)?;
    let executor = RetryExecutor::new(config.retry.policy());

    // Surface retry warnings as they happen; a lagged receiver skips the
    // gap instead of going silent
    let mut retry_events = executor.subscribe();
    let retry_logger = tokio::spawn(async move {
        while let Some(event) = next_retry_event(&mut retry_events).await {
            Output::new().warning(&format!(
                "Attempt {} failed, retrying in {}ms...",
                event.attempt,
                event.delay.as_millis()
            ));
        }
    });

    let mut progress = ProgressIndicator::new();
    progress.start(&format!("Running {}", kind.label()));

    let outcome = if input.stream {
        run_streaming(&client, &executor, &request, &mut progress, &out).await
    } else {
        run_complete(&client, &executor, &request, &mut progress, &out).await
    };

    progress.stop(None);
    retry_logger.abort();
    outcome
}

async fn run_complete(
    client: &MessagesClient,
    executor: &RetryExecutor,
    request: &TaskRequest,
    progress: &mut ProgressIndicator,
    out: &Output,
) -> Result<()> {
    let response = execute_completion(client, executor, request).await?;
    progress.stop(None);

    println!("{}", response.text);
    out.success(&format!(
        "Done ({} tokens: {} in, {} out)",
        response.usage.total(),
        response.usage.input_tokens,
        response.usage.output_tokens
    ));
    Ok(())
}

async fn run_streaming(
    client: &MessagesClient,
    executor: &RetryExecutor,
    request: &TaskRequest,
    progress: &mut ProgressIndicator,
    out: &Output,
) -> Result<()> {
    // Retry covers establishing the stream. Once fragments flow, a failure
    // surfaces with the partial output instead of restarting the call.
    let events = executor.run(|| client.stream(request)).await?;
    progress.stop(None);

    let mut accumulator = StreamAccumulator::new();
    accumulator.observe(|fragment: &str| Output::new().fragment(fragment));

    let accumulated = accumulator.collect_with(events, text_delta).await?;
    debug!(chars = accumulated.chars, "Stream complete");

    println!();
    out.success(&format!("Done ({} chars streamed)", accumulated.chars));
    Ok(())
}

/// Wrap one completion call in the retry executor
async fn execute_completion(
    backend: &dyn CompletionBackend,
    executor: &RetryExecutor,
    request: &TaskRequest,
) -> Result<CompletionResponse> {
    executor.run(|| backend.complete(request)).await
}

fn build_request(kind: TaskKind, input: &TaskInput) -> Result<TaskRequest> {
    let request = match kind {
        TaskKind::Complete => tasks::complete(&input.code, &input.language, input.max_tokens),
        TaskKind::GenerateTests => {
            tasks::generate_tests(&input.code, &input.language, input.max_tokens)
        }
        TaskKind::Translate => {
            let to = input.target_language.as_deref().ok_or_else(|| {
                QuillError::Validation("translation requires a target language".into())
            })?;
            tasks::translate(&input.code, &input.language, to, input.max_tokens)
        }
        TaskKind::Optimize => tasks::optimize(&input.code, &input.language, input.max_tokens),
        TaskKind::SecurityReview => {
            tasks::security_review(&input.code, &input.language, input.max_tokens)
        }
        TaskKind::Document => tasks::document(&input.code, &input.language, input.max_tokens),
    };
    Ok(request)
}
