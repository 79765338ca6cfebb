//! Terminal game loop.
//!
//! Reads commands line by line and owns the opponent's think delay. The delay
//! runs as a spawned task that sends its ticket back over a channel; restart
//! aborts it, and a ticket that still slips through is discarded by the
//! session.

use std::time::Duration;
use tictactoe_core::{OpponentPolicy, TurnTicket};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::{Config, OutputFormat};
use crate::protocol::{Command, Update};
use crate::render::render_update;
use crate::session::{Reaction, Session};

/// Start the think delay for one opponent turn.
fn spawn_think_timer(
    delay: Duration,
    ticket: TurnTicket,
    tx: mpsc::UnboundedSender<TurnTicket>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(ticket);
    })
}

async fn write_update<W: AsyncWrite + Unpin>(
    output: &mut W,
    format: OutputFormat,
    update: &Update,
) -> anyhow::Result<()> {
    let mut text = match format {
        OutputFormat::Text => render_update(update),
        OutputFormat::Json => serde_json::to_string(update)?,
    };
    text.push('\n');
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Run a session until the user quits or input ends.
pub async fn run<P, R, W>(
    mut session: Session<P>,
    config: &Config,
    input: R,
    output: &mut W,
) -> anyhow::Result<Session<P>>
where
    P: OpponentPolicy,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let (tx, mut rx) = mpsc::unbounded_channel::<TurnTicket>();
    let mut pending: Option<JoinHandle<()>> = None;

    for update in session.greeting(config.think_ms) {
        write_update(output, config.output, &update).await?;
    }

    loop {
        let reaction = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => match line.parse::<Command>() {
                    Ok(command) => session.handle_command(command),
                    Err(e) => {
                        debug!(input = %line, "unparseable input");
                        Reaction::rejected(e.to_string())
                    }
                },
                None => {
                    info!("input closed");
                    break;
                }
            },
            Some(ticket) = rx.recv() => session.handle_think_elapsed(ticket),
        };

        if reaction.cancel_pending {
            if let Some(timer) = pending.take() {
                timer.abort();
            }
        }
        if let Some(ticket) = reaction.schedule {
            debug!(%ticket, delay_ms = config.think_ms, "opponent thinking");
            pending = Some(spawn_think_timer(config.think_delay(), ticket, tx.clone()));
        }

        for update in &reaction.updates {
            write_update(output, config.output, update).await?;
        }

        if reaction.quit {
            break;
        }
    }

    if let Some(timer) = pending.take() {
        timer.abort();
    }
    Ok(session)
}
