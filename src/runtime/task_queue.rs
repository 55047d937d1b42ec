use crate::config::TaskQueueConfig;
use crate::shared::errors::RuntimeError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed pool of named worker threads fed by a bounded channel.
#[derive(Debug)]
pub struct TaskQueue {
    sender: Option<SyncSender<Job>>,
    workers: Vec<JoinHandle<()>>,
    capacity: usize,
}

impl TaskQueue {
    pub fn start(config: &TaskQueueConfig) -> Result<Self, RuntimeError> {
        let (sender, receiver) = mpsc::sync_channel::<Job>(config.max_queue_size);
        let receiver = Arc::new(Mutex::new(receiver));
        let mut queue = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(config.max_threads),
            capacity: config.max_queue_size,
        };

        for index in 1..=config.max_threads {
            let name = format!("{}-{index}", config.name_prefix);
            let shared = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker_loop(shared))
                .map_err(|source| RuntimeError::SpawnWorker { name, source })?;
            queue.workers.push(handle);
        }
        Ok(queue)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Enqueues without blocking.
    pub fn submit(&self, job: Job) -> Result<(), RuntimeError> {
        let Some(sender) = &self.sender else {
            return Err(RuntimeError::QueueClosed);
        };
        sender.try_send(job).map_err(|err| match err {
            TrySendError::Full(_) => RuntimeError::QueueFull {
                capacity: self.capacity,
            },
            TrySendError::Disconnected(_) => RuntimeError::QueueClosed,
        })
    }

    /// Stops accepting work, runs what is queued, and joins the workers.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(receiver: Arc<Mutex<Receiver<Job>>>) {
    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => return,
        };
        let Ok(job) = next else {
            return;
        };
        // A panicking job must not take the worker down with it.
        let _ = panic::catch_unwind(AssertUnwindSafe(job));
    }
}
