//! Editing scripts: one step per line, replayed against the focused block.
//!
//! ```text
//! # comments and blank lines are skipped
//! set - first\n- second      replace the focused block's live text
//! key enter 14                a key-level command (enter, backspace, tab, up, down)
//! down                        any block event: update, new N, delete, up, down,
//!                             click N, multi KIND, single
//! ```

use anyhow::{Context, Result, bail};
use blockmark_engine::{BlockEvent, Cmd, Document, Patch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Command(Cmd),
    Event(BlockEvent),
}

pub fn parse(script: &str) -> Result<Vec<Step>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(n, line)| parse_step(line).with_context(|| format!("script line {}", n + 1)))
        .collect()
}

fn parse_step(line: &str) -> Result<Step> {
    if let Some(text) = line.strip_prefix("set ") {
        return Ok(Step::Command(Cmd::ReplaceText {
            text: text.replace("\\n", "\n"),
        }));
    }
    if let Some(key) = line.trim().strip_prefix("key ") {
        return parse_key(key);
    }
    Ok(Step::Event(line.trim().parse()?))
}

fn parse_key(key: &str) -> Result<Step> {
    let (name, caret) = match key.split_once(' ') {
        Some((name, caret)) => (name, caret.trim().parse::<usize>()?),
        None => bail!("key {key:?} needs a caret position"),
    };
    let cmd = match name {
        "enter" => Cmd::Enter { caret },
        "backspace" => Cmd::Backspace { caret },
        "tab" => Cmd::Tab { caret },
        "up" => Cmd::ArrowUp { caret },
        "down" => Cmd::ArrowDown { caret },
        other => bail!("unknown key {other:?}"),
    };
    Ok(Step::Command(cmd))
}

/// Runs every step against the document's focused block.
pub fn replay(doc: &mut Document, steps: Vec<Step>) -> Result<Vec<Patch>> {
    steps
        .into_iter()
        .map(|step| -> Result<Patch> {
            log::debug!("replay {step:?}");
            let patch = match step {
                Step::Command(cmd) => doc.apply(cmd)?,
                Step::Event(event) => {
                    let index = doc.focus().context("no focused block")?;
                    doc.dispatch(index, event)?
                }
            };
            Ok(patch)
        })
        .collect()
}
