use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Notify};

/// Encoding of a synthesized clip. Every shipped provider emits MP3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
}

#[derive(Debug)]
pub struct AudioClip {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("audio output disconnected")]
    Disconnected,
}

/// Where synthesized audio goes. `play` resolves when playback finishes
/// or is stopped; `stop` is idempotent and safe when nothing is playing.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn play(&self, clip: AudioClip) -> Result<(), PlaybackError>;
    fn stop(&self);
}

/// Commands delivered to the host, which owns the actual audio device.
#[derive(Debug)]
pub enum PlaybackCommand {
    Play {
        clip: AudioClip,
        /// The host signals here when the clip has finished playing.
        done: oneshot::Sender<()>,
    },
    Stop,
}

/// Hands clips to the host over a channel and waits for the per-clip
/// completion ack. `stop` forwards to the host and releases any play
/// call still waiting for its ack.
pub struct ChannelAudioOutput {
    tx: mpsc::UnboundedSender<PlaybackCommand>,
    cancel: Notify,
}

impl ChannelAudioOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlaybackCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                cancel: Notify::new(),
            },
            rx,
        )
    }
}

#[async_trait]
impl AudioOutput for ChannelAudioOutput {
    async fn play(&self, clip: AudioClip) -> Result<(), PlaybackError> {
        // Register for cancellation before the host can see the clip, so
        // a stop racing the send is never missed.
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(PlaybackCommand::Play {
                clip,
                done: done_tx,
            })
            .map_err(|_| PlaybackError::Disconnected)?;

        tokio::select! {
            // A dropped ack sender counts as finished; the host has
            // already moved on from the clip.
            _ = done_rx => Ok(()),
            _ = &mut cancelled => Ok(()),
        }
    }

    fn stop(&self) {
        let _ = self.tx.send(PlaybackCommand::Stop);
        self.cancel.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_play_resolves_on_host_ack() {
        let (output, mut rx) = ChannelAudioOutput::new();

        let play = tokio::spawn(async move {
            output
                .play(AudioClip {
                    audio: vec![1, 2, 3],
                    format: AudioFormat::Mp3,
                })
                .await
        });

        match rx.recv().await.unwrap() {
            PlaybackCommand::Play { clip, done } => {
                assert_eq!(clip.audio, vec![1, 2, 3]);
                done.send(()).unwrap();
            }
            other => panic!("unexpected command: {:?}", other),
        }

        play.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_stop_releases_pending_play() {
        let (output, mut rx) = ChannelAudioOutput::new();
        let output = std::sync::Arc::new(output);

        let player = output.clone();
        let play = tokio::spawn(async move {
            player
                .play(AudioClip {
                    audio: vec![0],
                    format: AudioFormat::Mp3,
                })
                .await
        });

        // Wait for the clip to arrive, then stop without acking it.
        let command = rx.recv().await.unwrap();
        assert!(matches!(command, PlaybackCommand::Play { .. }));
        output.stop();

        play.await.unwrap().unwrap();
        assert!(matches!(rx.recv().await, Some(PlaybackCommand::Stop)));
    }

    #[tokio::test]
    async fn test_play_fails_when_host_gone() {
        let (output, rx) = ChannelAudioOutput::new();
        drop(rx);

        let result = output
            .play(AudioClip {
                audio: Vec::new(),
                format: AudioFormat::Mp3,
            })
            .await;
        assert!(matches!(result, Err(PlaybackError::Disconnected)));
    }
}
