use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::oneshot;

/// Spoken output. Absence and failure both degrade to text-only replies.
#[async_trait]
pub trait VoiceOutput: Send {
    async fn speak(&mut self, text: &str) -> Result<()>;
    /// Cut off any in-flight speech. Called on interruption and at shutdown.
    async fn stop(&mut self) -> Result<()>;
}

/// Speaks through the OS `say` binary. A new utterance interrupts the
/// previous one; the child is reaped by a detached task.
pub struct SystemVoice {
    voice: Option<String>,
    active: Option<oneshot::Sender<()>>,
}

impl SystemVoice {
    pub fn new(voice: Option<String>) -> Self {
        Self { voice, active: None }
    }
}

#[async_trait]
impl VoiceOutput for SystemVoice {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if let Some(stop_tx) = self.active.take() {
            let _ = stop_tx.send(());
        }

        let mut cmd = Command::new("say");
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        let mut child = cmd.arg(text).kill_on_drop(true).spawn()?;

        let (stop_tx, mut stop_rx) = oneshot::channel();
        self.active = Some(stop_tx);

        tokio::spawn(async move {
            tokio::select! {
                _ = child.wait() => {}
                _ = &mut stop_rx => {
                    let _ = child.kill().await;
                }
            }
        });

        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.active.take() {
            let _ = stop_tx.send(());
        }
        Ok(())
    }
}
