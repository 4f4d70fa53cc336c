use super::{get_connection, DbPool};
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::debug;
use quote_storage_core::errors::{DatabaseError, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs against the writer's dedicated connection.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedResult = Result<Box<dyn Any + Send + 'static>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<ErasedResult>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection,
    /// inside an `IMMEDIATE` transaction.
    ///
    /// Dropping the returned future before it resolves does not abort a job
    /// that the actor already picked up; the job commits or rolls back as a
    /// whole and its reply is discarded.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| DatabaseError::Internal("Writer actor has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            DatabaseError::Internal("Writer actor dropped the reply without a result".to_string())
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            DatabaseError::Internal("Unexpected writer actor result type".to_string()).into()
        })
    }
}

/// Spawns the single writer to the database.
///
/// The actor owns one pooled connection for its whole lifetime and runs jobs
/// serially on a dedicated OS thread, so blocking SQLite calls never occupy
/// an async worker. It stops once every [`WriteHandle`] is dropped.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = get_connection(pool)?;
    let (tx, mut rx) =
        mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<ErasedResult>)>(1024);

    std::thread::Builder::new()
        .name("quote-db-writer".to_string())
        .spawn(move || {
            while let Some((job, reply_tx)) = rx.blocking_recv() {
                let result: ErasedResult = conn
                    .immediate_transaction::<_, StorageError, _>(|c| {
                        job(c).map_err(StorageError::from)
                    })
                    .map_err(|e: StorageError| e.into());

                // The requester may have been cancelled.
                let _ = reply_tx.send(result);
            }
            debug!("Writer actor stopped");
        })
        .map_err(|e| {
            DatabaseError::Internal(format!("Failed to spawn writer thread: {}", e))
        })?;

    Ok(WriteHandle { tx })
}
