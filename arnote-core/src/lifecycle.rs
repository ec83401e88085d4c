//! Component lifecycle primitives.
//!
//! [`Mount`] gates asynchronous results on the owning component still being
//! alive. [`ReleaseHub`] is the top-level pointer-release dispatcher that
//! compositors subscribe to so a release outside their bounds still ends a
//! drag.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

/// Inbox for results of work started by a mounted component.
///
/// Dropping the `Mount` unmounts: every outstanding [`MountHandle`] then
/// discards what it is given.
#[derive(Debug)]
pub struct Mount<T> {
    inbox: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for Mount<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mount<T> {
    /// A freshly mounted component.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to give to a pending task.
    #[must_use]
    pub fn handle(&self) -> MountHandle<T> {
        MountHandle {
            inbox: Arc::downgrade(&self.inbox),
        }
    }

    /// Take every result delivered so far, oldest first.
    pub fn drain(&self) -> Vec<T> {
        let mut inbox = self.inbox.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *inbox)
    }

    /// Take only the newest result, dropping older ones.
    pub fn latest(&self) -> Option<T> {
        self.drain().pop()
    }
}

/// Sending side of a [`Mount`], held by asynchronous work.
#[derive(Debug)]
pub struct MountHandle<T> {
    inbox: Weak<Mutex<Vec<T>>>,
}

impl<T> Clone for MountHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inbox: self.inbox.clone(),
        }
    }
}

impl<T> MountHandle<T> {
    /// Whether the owning component is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inbox.strong_count() > 0
    }

    /// Hand a result to the component. Returns `false` and drops the value
    /// if it has been unmounted.
    pub fn deliver(&self, value: T) -> bool {
        let Some(inbox) = self.inbox.upgrade() else {
            tracing::debug!("discarding result for unmounted component");
            return false;
        };
        inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
        true
    }
}

type ReleaseListener = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: HashMap<u64, ReleaseListener>,
}

/// Top-level pointer-release dispatcher.
#[derive(Clone, Default)]
pub struct ReleaseHub {
    inner: Arc<RwLock<HubInner>>,
}

impl std::fmt::Debug for ReleaseHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ReleaseHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays registered while the returned guard
    /// lives.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ReleaseSubscription {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Box::new(listener));
        ReleaseSubscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// A pointer release happened somewhere in the window. Returns the number
    /// of listeners notified.
    pub fn dispatch_release(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        for listener in inner.listeners.values() {
            listener();
        }
        inner.listeners.len()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Guard for a [`ReleaseHub`] listener; unregisters on drop.
#[derive(Debug)]
pub struct ReleaseSubscription {
    id: u64,
    hub: Weak<RwLock<HubInner>>,
}

impl Drop for ReleaseSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.write()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ========================================================================
    // Mount
    // ========================================================================

    #[test]
    fn test_delivery_while_mounted() {
        let mount = Mount::new();
        let handle = mount.handle();
        assert!(handle.deliver(1));
        assert!(handle.clone().deliver(2));
        assert_eq!(mount.drain(), vec![1, 2]);
        assert!(mount.drain().is_empty());
    }

    #[test]
    fn test_delivery_after_unmount_is_discarded() {
        let mount = Mount::<String>::new();
        let handle = mount.handle();
        drop(mount);
        assert!(!handle.is_mounted());
        assert!(!handle.deliver("late".into()));
    }

    #[test]
    fn test_latest_keeps_newest() {
        let mount = Mount::new();
        let handle = mount.handle();
        handle.deliver("a");
        handle.deliver("b");
        assert_eq!(mount.latest(), Some("b"));
        assert_eq!(mount.latest(), None);
    }

    #[tokio::test]
    async fn test_delivery_from_task() {
        let mount = Mount::new();
        let handle = mount.handle();
        tokio::spawn(async move { handle.deliver(42) })
            .await
            .expect("task");
        assert_eq!(mount.latest(), Some(42));
    }

    // ========================================================================
    // ReleaseHub
    // ========================================================================

    #[test]
    fn test_release_reaches_subscribers() {
        let hub = ReleaseHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let _sub = hub.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hub.dispatch_release(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = ReleaseHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let sub = hub.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.dispatch_release(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = ReleaseHub::new();
        let sub = hub.subscribe(|| {});
        drop(hub);
        drop(sub);
    }
}
