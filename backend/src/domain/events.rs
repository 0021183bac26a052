//! Process-wide fan-out of domain events to subscription streams.
//!
//! Delivery is best effort: no ordering guarantee across publishers and no
//! backpressure. Slow subscribers skip what they missed.

use futures_util::Stream;
use futures_util::stream;
use tokio::sync::broadcast;
use tracing::warn;

use super::Employee;

/// Buffered events per subscriber before older ones are dropped.
pub const EVENT_BUS_CAPACITY: usize = 64;

/// Events published by the employee service.
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeEvent {
    /// An employee record or its attendance changed.
    Updated(Box<Employee>),
    /// An employee was deleted; carries the deletion result.
    Deleted(bool),
}

/// In-memory broadcast channel.
///
/// # Examples
/// ```
/// use dynasty::domain::EventBus;
///
/// let bus: EventBus<u32> = EventBus::default();
/// let mut rx = bus.subscribe();
/// bus.publish(7);
/// assert_eq!(rx.try_recv().ok(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus<T> {
    sender: broadcast::Sender<T>,
}

impl<T> Default for EventBus<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new(EVENT_BUS_CAPACITY)
    }
}

impl<T> EventBus<T>
where
    T: Clone + Send + 'static,
{
    /// Create a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish `event`, returning how many subscribers will see it.
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: T) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Raw receiver for the next published events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    /// Stream of events published from now on. Lagging subscribers log a
    /// warning and continue with the oldest retained event.
    pub fn stream(&self) -> impl Stream<Item = T> + Send + 'static {
        stream::unfold(self.subscribe(), |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((event, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event subscriber lagged; dropping missed events");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}
