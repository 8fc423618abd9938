use crate::assets::MissingAssetPolicy;
use crate::pipeline::{PageBuilder, PageOutcome};
use crate::source::ContentSource;
use crate::{Error, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Build(String, oneshot::Sender<Result<PageOutcome>>),
    Slugs(oneshot::Sender<Vec<String>>),
    Close(oneshot::Sender<()>),
}

fn worker_closed() -> Error {
    Error::Other("worker closed".into())
}

/// An async-friendly page builder backed by a dedicated worker thread.
///
/// The worker thread owns the content source and a [`PageBuilder`] and runs
/// the blocking pipeline for commands sent from async tasks. Blocking HTTP
/// clients must not be created or dropped inside an async runtime, so the
/// source is constructed on the worker as well.
#[derive(Clone)]
pub struct AsyncPageBuilder {
    cmd_tx: Sender<Command>,
}

impl AsyncPageBuilder {
    /// Spawn the worker, building the source on it with `make_source`.
    pub async fn spawn<S, F>(make_source: F, policy: MissingAssetPolicy) -> Result<Self>
    where
        S: ContentSource + 'static,
        F: FnOnce() -> Result<S> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let source = match make_source() {
                Ok(s) => s,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let builder = PageBuilder::with_policy(source, policy);
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Build(slug, resp) => {
                        let _ = resp.send(builder.build(&slug));
                    }
                    Command::Slugs(resp) => {
                        let _ = resp.send(builder.slugs());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            log::debug!("page builder worker exiting");
        });

        init_rx.await.map_err(|_| worker_closed())??;
        Ok(Self { cmd_tx })
    }

    /// Spawn a worker over the remote CMS source.
    #[cfg(feature = "graphql")]
    pub async fn connect(config: crate::PageConfig) -> Result<Self> {
        let policy = config.missing_asset_policy;
        Self::spawn(move || crate::graphql::GraphQlContentSource::new(&config), policy).await
    }

    pub async fn build(&self, slug: &str) -> Result<PageOutcome> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Build(slug.to_string(), tx))
            .map_err(|_| worker_closed())?;
        rx.await.map_err(|_| worker_closed())?
    }

    pub async fn slugs(&self) -> Result<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Slugs(tx))
            .map_err(|_| worker_closed())?;
        rx.await.map_err(|_| worker_closed())
    }

    /// Stop the worker. Clones of this handle fail afterwards.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Close(tx))
            .map_err(|_| worker_closed())?;
        rx.await.map_err(|_| worker_closed())
    }
}
