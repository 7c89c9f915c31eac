//! Interactive status watch.
//!
//! Stands in for a mounted status view: the monitor polls on its interval,
//! `refresh` forces a check, and `hide`/`show` simulate the page losing and
//! regaining visibility.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::state::CliState;
use super::{CliError, render};
use crate::domain::{AlumniIdentity, Error, StatusSnapshot};

/// Watch `identity`'s status until `input` ends or reads `quit`.
///
/// Prints one line per completed check.
pub async fn watch<R, W>(
    state: &CliState,
    identity: AlumniIdentity,
    input: R,
    out: &mut W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let handle = state.monitor().spawn(identity);
    let mut updates = handle.subscribe();
    let mut last = updates
        .wait_for(StatusSnapshot::is_settled)
        .await
        .map_err(|error| {
            Error::internal(format!(
                "status monitor stopped before its first check: {error}"
            ))
        })?
        .clone();
    render::snapshot(out, &last)?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                if !current.loading && current != last {
                    render::snapshot(out, &current)?;
                    last = current;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "" => {}
                    "refresh" => handle.refresh(),
                    "hide" => handle.visibility_changed(false),
                    "show" => handle.visibility_changed(true),
                    "quit" => break,
                    other => writeln!(
                        out,
                        "unknown command {other:?}; expected refresh, hide, show or quit"
                    )?,
                }
            }
        }
    }

    debug!("status watch ending");
    handle.shutdown().await;
    Ok(())
}
