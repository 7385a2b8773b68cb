//! Background chunk loading.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use blueprint_core::{ChunkPos, WorldError};
use crossbeam::channel::{self, Receiver, Sender};
use futures_channel::oneshot;

use crate::chunk_manager::ChunkManager;
use crate::generation::FlatGenerator;

/// Resolved once the requested chunk is resident.
pub type LoadReply = oneshot::Sender<Result<(), WorldError>>;

/// Work request sent to a loader thread.
#[derive(Debug)]
pub enum LoadRequest {
    /// Make a chunk resident and reply when done.
    Load(ChunkPos, LoadReply),
    /// Signal the worker thread to shut down.
    Shutdown,
}

/// Pool of threads that generate missing chunks into a [`ChunkManager`].
#[derive(Debug)]
pub struct ChunkLoader {
    request_tx: Sender<LoadRequest>,
    threads: Vec<JoinHandle<()>>,
}

impl ChunkLoader {
    /// Spawn `threads` workers (at least one) sharing a bounded queue.
    pub fn spawn(
        chunks: Arc<ChunkManager>,
        generator: FlatGenerator,
        threads: usize,
        max_pending: usize,
    ) -> Result<Self, WorldError> {
        let (request_tx, request_rx) = channel::bounded::<LoadRequest>(max_pending.max(1));

        let threads = (0..threads.max(1))
            .map(|index| {
                let chunks = Arc::clone(&chunks);
                let generator = generator.clone();
                let request_rx = request_rx.clone();
                thread::Builder::new()
                    .name(format!("chunk-loader-{index}"))
                    .spawn(move || Self::worker_loop(&chunks, &generator, &request_rx))
                    .map_err(|e| WorldError::Unavailable(format!("failed to spawn chunk loader: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            request_tx,
            threads,
        })
    }

    /// Blocks waiting for requests and processes them until shut down.
    fn worker_loop(chunks: &ChunkManager, generator: &FlatGenerator, request_rx: &Receiver<LoadRequest>) {
        loop {
            match request_rx.recv() {
                Ok(LoadRequest::Load(pos, reply)) => {
                    if !chunks.contains(pos) && chunks.insert_if_absent(generator.generate_chunk(pos)) {
                        tracing::trace!(?pos, "generated chunk");
                    }
                    // The requester may have stopped waiting.
                    let _ = reply.send(Ok(()));
                }
                Ok(LoadRequest::Shutdown) | Err(_) => return,
            }
        }
    }

    /// Queue a load. Blocks while the queue is full.
    pub fn request(&self, pos: ChunkPos) -> oneshot::Receiver<Result<(), WorldError>> {
        let (reply, rx) = oneshot::channel();
        if let Err(channel::SendError(LoadRequest::Load(_, reply))) =
            self.request_tx.send(LoadRequest::Load(pos, reply))
        {
            let _ = reply.send(Err(WorldError::Unavailable("chunk loader stopped".into())));
        }
        rx
    }

    /// Stop every worker and wait for them to finish.
    pub fn shutdown(&mut self) {
        for _ in &self.threads {
            let _ = self.request_tx.send(LoadRequest::Shutdown);
        }
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}

impl Drop for ChunkLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}
