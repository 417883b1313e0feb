// src/exec/relay.rs

//! Copies the runner's output streams to our own stdout/stderr.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::ChildHandle;

/// Background copy tasks for one child's stdout/stderr.
#[derive(Debug, Default)]
pub struct OutputRelay {
    tasks: Vec<JoinHandle<()>>,
}

impl OutputRelay {
    /// Start relaying the child's streams to this process's stdout/stderr.
    pub fn attach(child: ChildHandle) -> Self {
        Self::attach_to(child, tokio::io::stdout(), tokio::io::stderr())
    }

    /// Start relaying into arbitrary writers.
    pub fn attach_to<O, E>(child: ChildHandle, out: O, err: E) -> Self
    where
        O: AsyncWrite + Send + Unpin + 'static,
        E: AsyncWrite + Send + Unpin + 'static,
    {
        let mut tasks = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout {
            tasks.push(spawn_copy("stdout", stdout, out));
        }
        if let Some(stderr) = child.stderr {
            tasks.push(spawn_copy("stderr", stderr, err));
        }
        Self { tasks }
    }

    /// Wait until both streams hit EOF.
    pub async fn finish(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "output relay task failed");
            }
        }
    }
}

fn spawn_copy<R, W>(stream: &'static str, mut reader: R, mut writer: W) -> JoinHandle<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(bytes) => debug!(stream, bytes, "relay finished"),
            Err(e) => warn!(stream, error = %e, "relay stopped early"),
        }
        if let Err(e) = writer.flush().await {
            warn!(stream, error = %e, "relay flush failed");
        }
    })
}
