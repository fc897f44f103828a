//! GENERATE command - Generate study material for a topic.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use edumate_core::StudyMaterial;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Study topic (multiple words are joined with spaces)
    #[arg(required = true)]
    pub topic: Vec<String>,

    /// Leave MCQ answers out of human-readable output
    #[arg(long)]
    pub hide_answers: bool,
}

/// Request body for generating study material.
#[derive(Serialize)]
struct GenerateRequest {
    topic: String,
}

/// Success envelope returned by the server.
#[derive(Debug, Deserialize)]
struct GenerateEnvelope {
    data: StudyMaterial,
}

/// Generated material plus how to display it.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StudySheet {
    material: StudyMaterial,
    #[serde(skip)]
    show_answers: bool,
}

impl StudySheet {
    fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!("{}", "Notes".green().bold()));
        for note in &self.material.notes {
            lines.push(format!("  • {}", note));
        }

        lines.push(String::new());
        lines.push(format!("{}", "Multiple-choice questions".green().bold()));
        for (i, mcq) in self.material.mcqs.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, mcq.question.bold()));
            for option in &mcq.options {
                lines.push(format!("       {}", option));
            }
            if self.show_answers {
                lines.push(format!("     {} {}", "Answer:".cyan(), mcq.answer));
            }
        }

        lines.push(String::new());
        lines.push(format!("{}", "Flashcards".green().bold()));
        for card in &self.material.flashcards {
            lines.push(format!("  {} {}", "Front:".cyan(), card.front));
            lines.push(format!("  {} {}", "Back:".cyan(), card.back));
            lines.push(String::new());
        }

        lines
    }
}

impl HumanReadable for StudySheet {
    fn print_human(&self) {
        for line in self.render() {
            println!("{}", line);
        }
    }
}

/// Execute the generate command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: GenerateArgs,
) -> Result<()> {
    let url = format!("{}/api/generate", base_url);
    let request_body = GenerateRequest {
        topic: args.topic.join(" "),
    };

    let envelope: GenerateEnvelope = make_request(client.post(&url).json(&request_body)).await?;

    let sheet = StudySheet {
        material: envelope.data,
        show_answers: !args.hide_answers,
    };
    output(&sheet, human)
}
