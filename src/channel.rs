//! Bounded queues at the edges of the control loop.
//!
//! Interrupt handlers and network callbacks never touch the value store or
//! the storage backend; they only post into these queues. The controller
//! loop is the sole consumer. Synchronization is a critical section around a
//! fixed-size `heapless::Deque`, which keeps posting safe from interrupt
//! context.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Send failed: the queue is full. Carries the rejected value back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull<T>(pub T);

/// A bounded, interrupt-safe queue.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for producers. Several may share one queue.
    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    /// Handle for the (single) consumer.
    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Post a value, rejecting it if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), QueueFull<T>> {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .borrow_mut()
                .push_back(value)
                .map_err(QueueFull)
        })
    }

    /// Take the oldest queued value, if any.
    pub fn try_receive(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// Post a value, rejecting it if the queue is full.
    pub fn try_send(&self, value: T) -> Result<(), QueueFull<T>> {
        self.channel.try_send(value)
    }
}

/// Consumer handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    /// Take the oldest queued value, if any.
    pub fn try_receive(&self) -> Option<T> {
        self.channel.try_receive()
    }

    /// Drain the queue, handing every value to `f` in arrival order.
    pub fn drain(&self, mut f: impl FnMut(T)) {
        while let Some(value) = self.try_receive() {
            f(value);
        }
    }
}
