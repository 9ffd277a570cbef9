//! Rendering of command results.

use super::commands::OutputFormat;
use herald::{DraftSummary, HeraldResult, JsonError, PublishOutcome, ThreadWithUnits};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> HeraldResult<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn print_texts(texts: impl IntoIterator<Item = (String, String, Option<String>)>) {
    for (order, text, external_id) in texts {
        println!("{:-<80}", "");
        match external_id {
            Some(id) => println!("[{}] posted as {}", order, id),
            None => println!("[{}] ({} chars)", order, text.chars().count()),
        }
        println!("{}", text);
    }
    println!("{:-<80}", "");
}

/// Print the result of a draft refresh.
pub fn print_summary(summary: &DraftSummary, format: OutputFormat) -> HeraldResult<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Human => {
            println!("Draft {} is {}", summary.draft_id, summary.status);
            println!("  Mode: {}", summary.mode);
            println!("  Units: {}", summary.unit_count);
            println!("  Link: {}", summary.url);
            Ok(())
        }
    }
}

/// Print a draft and its units.
pub fn print_thread(thread: &ThreadWithUnits, format: OutputFormat) -> HeraldResult<()> {
    match format {
        OutputFormat::Json => print_json(thread),
        OutputFormat::Human => {
            let draft = &thread.draft;
            println!("Draft {} ({})", draft.id, draft.platform);
            println!("  Content: {}", draft.content_id);
            println!("  Status: {}", draft.status);
            println!("  Mode: {}", draft.mode);
            println!("  Attempts: {}", draft.attempts);
            if let Some(root) = &draft.root_external_id {
                println!("  Root post: {}", root);
            }
            if let Some(published_at) = draft.published_at {
                println!("  Published: {}", published_at);
            }
            if let Some(error) = &draft.last_error {
                println!("  Last error: {}", error);
            }
            print_texts(thread.units.iter().map(|unit| {
                (unit.order.to_string(), unit.text.clone(), unit.external_id.clone())
            }));
            Ok(())
        }
    }
}

/// Print the outcome of a publish request.
pub fn print_outcome(outcome: &PublishOutcome, format: OutputFormat) -> HeraldResult<()> {
    if format == OutputFormat::Json {
        return print_json(outcome);
    }

    match outcome {
        PublishOutcome::DryRun {
            draft_id,
            status,
            mode,
            texts,
        } => {
            println!("Dry run for {} ({}, {} mode)", draft_id, status, mode);
            print_texts(
                texts
                    .iter()
                    .enumerate()
                    .map(|(index, text)| ((index + 1).to_string(), text.clone(), None)),
            );
        }
        PublishOutcome::AlreadyPublishing { draft_id } => {
            println!("Draft {} is already being published", draft_id);
        }
        PublishOutcome::AlreadyPublished {
            draft_id,
            root_external_id,
            ..
        } => {
            println!(
                "Draft {} was already published (root post {})",
                draft_id, root_external_id
            );
        }
        PublishOutcome::Published {
            draft_id,
            root_external_id,
            posted_units,
            ..
        } => {
            println!(
                "Published {} (root post {}, {} posts sent)",
                draft_id, root_external_id, posted_units
            );
        }
    }
    Ok(())
}
