// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Background renders.  A shell that must stay responsive submits a
//! `RenderRequest` and gets a `RenderJob` back immediately; it can poll
//! the job between events, or block on it.  Dropping the job abandons
//! the render: the worker finishes, and its frame is thrown away.

use crossbeam::channel::{self, Receiver, TryRecvError};
use std::thread;

use camera::Camera;
use errors::RenderError;
use frame::{render_frame_threaded, Dimensions, Frame};
use histogram::Histogram;
use mandelbrot::Mandelbrot;

/// Everything one render needs, owned, so it can travel to a worker.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// The view.
    pub camera: Camera,
    /// Canvas size and sampling.
    pub dimensions: Dimensions,
    /// The escape-time evaluator.
    pub evaluator: Mandelbrot,
    /// The palette.
    pub histogram: Histogram,
    /// Worker threads for the divergence pass.
    pub threads: usize,
}

impl RenderRequest {
    /// A single-threaded request using the default evaluator.
    pub fn new(camera: Camera, dimensions: Dimensions, histogram: Histogram) -> RenderRequest {
        RenderRequest {
            camera,
            dimensions,
            evaluator: Mandelbrot::default(),
            histogram,
            threads: 1,
        }
    }

    /// Render on the calling thread.
    pub fn render(&self) -> Frame {
        render_frame_threaded(
            &self.camera,
            self.dimensions,
            &self.evaluator,
            &self.histogram,
            self.threads,
        )
    }
}

/// A handle on a render running in the background.
#[derive(Debug)]
pub struct RenderJob {
    receiver: Receiver<Frame>,
    collected: bool,
}

impl RenderJob {
    /// Start rendering `request` on its own thread.
    pub fn submit(request: RenderRequest) -> RenderJob {
        RenderJob::spawn(move || request.render())
    }

    fn spawn<F>(work: F) -> RenderJob
    where
        F: FnOnce() -> Frame + Send + 'static,
    {
        let (sender, receiver) = channel::bounded(1);
        thread::spawn(move || {
            let frame = work();
            if sender.send(frame).is_err() {
                debug!("render finished after its job was dropped");
            }
        });
        RenderJob {
            receiver,
            collected: false,
        }
    }

    /// Check on the render without blocking.  `Ok(None)` means it is
    /// still running.  The frame is handed out exactly once.
    pub fn poll(&mut self) -> Result<Option<Frame>, RenderError> {
        if self.collected {
            return Err(RenderError::Collected);
        }
        match self.receiver.try_recv() {
            Ok(frame) => {
                self.collected = true;
                Ok(Some(frame))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RenderError::WorkerLost),
        }
    }

    /// Block until the frame is ready.
    pub fn wait(self) -> Result<Frame, RenderError> {
        if self.collected {
            return Err(RenderError::Collected);
        }
        self.receiver.recv().map_err(|_| RenderError::WorkerLost)
    }
}
