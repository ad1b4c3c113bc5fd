//! CLI REPL: run one screening over stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{Error, SessionError};
use crate::screening::{Prompt, QuestionPrompt, SessionManager, Turn};

fn render_prompt(prompt: &Prompt) -> String {
    let mut out = String::new();
    if let Some(ref rejection) = prompt.rejection {
        out.push_str(&format!("⚠️  {rejection}\n"));
    }
    out.push_str(&format!(
        "[{}/{}] {}\n{}: ",
        prompt.index + 1,
        prompt.total,
        prompt.text,
        prompt.field.label()
    ));
    out
}

fn render_question(question: &QuestionPrompt) -> String {
    let mut out = String::new();
    if let Some(ref rejection) = question.rejection {
        out.push_str(&format!("⚠️  {rejection}\n"));
    }
    out.push_str(&format!(
        "\n🧠 {}\n   {}\nYour answer: ",
        question.heading(),
        question.question
    ));
    out
}

/// Run a single screening session against `input`/`output`.
///
/// Returns `true` if a screening was saved.
pub async fn run_session<R, W>(
    manager: Arc<SessionManager>,
    input: R,
    mut output: W,
) -> Result<bool, Error>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (id, first) = manager.create().await;
    output
        .write_all("🤖 TalentScout - Hiring Assistant\nType `exit` at any time to leave.\n\n".as_bytes())
        .await?;
    if let Some(prompt) = first {
        output.write_all(render_prompt(&prompt).as_bytes()).await?;
    }
    output.flush().await?;

    let mut lines = input.lines();
    loop {
        let Some(line) = lines.next_line().await? else {
            // EOF before finishing
            manager.discard(id).await;
            return Ok(false);
        };

        let turn = match manager.submit(id, &line).await {
            Ok(turn) => turn,
            Err(SessionError::DuplicateCandidate) => {
                output
                    .write_all(
                        "\n🚫 This email or phone number has already been used for screening.\n"
                            .as_bytes(),
                    )
                    .await?;
                output.flush().await?;
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        match turn {
            Turn::Prompt(prompt) => {
                output.write_all(render_prompt(&prompt).as_bytes()).await?;
            }
            Turn::Question(question) => {
                output.write_all(render_question(&question).as_bytes()).await?;
            }
            Turn::InterviewFinished => {
                let status = manager.status(id).await?;
                let summary = format!("\n🎉 Screening complete!\n\n{}\n", status.profile.to_summary());
                output.write_all(summary.as_bytes()).await?;

                return match manager.finalize(id).await {
                    Ok(record) => {
                        tracing::info!(record_id = %record.id, "Screening saved from CLI");
                        output
                            .write_all("\n✅ Your responses have been saved. Thank you!\n".as_bytes())
                            .await?;
                        output.flush().await?;
                        Ok(true)
                    }
                    Err(SessionError::DuplicateCandidate) => {
                        output
                            .write_all(
                                "\n🚫 This candidate has already submitted their responses.\n"
                                    .as_bytes(),
                            )
                            .await?;
                        output.flush().await?;
                        Ok(false)
                    }
                    Err(e) => Err(e.into()),
                };
            }
            Turn::Exited => {
                output
                    .write_all("\n👋 Thanks for your time. Goodbye!\n".as_bytes())
                    .await?;
                output.flush().await?;
                return Ok(false);
            }
        }
        output.flush().await?;
    }
}

/// Run a screening on the process's stdin/stdout.
pub async fn run(manager: Arc<SessionManager>) -> Result<bool, Error> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(manager, stdin, tokio::io::stdout()).await
}
