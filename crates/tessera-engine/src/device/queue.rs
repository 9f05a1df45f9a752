use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::Device;

/// Work that must run on the thread owning the device.
pub type DeviceJob = Box<dyn FnOnce(&mut dyn Device) + Send + 'static>;

/// Hand-off queue for device work originating on other threads.
///
/// The owning thread keeps the `DeviceQueue` and calls [`drain`](Self::drain)
/// once per frame; any thread may hold a [`DeviceQueueHandle`].
pub struct DeviceQueue {
    tx: Sender<DeviceJob>,
    rx: Receiver<DeviceJob>,
}

/// Cloneable, `Send` submitter for a [`DeviceQueue`].
#[derive(Clone)]
pub struct DeviceQueueHandle {
    tx: Sender<DeviceJob>,
}

impl DeviceQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn handle(&self) -> DeviceQueueHandle {
        DeviceQueueHandle { tx: self.tx.clone() }
    }

    /// Runs every queued job against `device`, returning how many ran.
    pub fn drain(&self, device: &mut dyn Device) -> usize {
        let mut ran = 0;
        loop {
            match self.rx.try_recv() {
                Ok(job) => {
                    job(device);
                    ran += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if ran > 0 {
            log::trace!("device queue: ran {ran} job(s)");
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for DeviceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceQueueHandle {
    /// Queues `job` for the device thread. Returns `false` if the queue is gone.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce(&mut dyn Device) + Send + 'static,
    {
        self.tx.send(Box::new(job)).is_ok()
    }
}
