pub const REVEAL_SELECTOR: &str = ".reveal, .project-card, .skill-chips span, .glass";
pub const PENDING_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "visible";

/// An element taking part in scroll reveal.
pub trait RevealTarget {
    fn mark_pending(&self);
    fn mark_visible(&self);
    fn is_visible(&self) -> bool;
}

/// The viewport watcher the targets are registered with.
pub trait Watcher<T> {
    fn watch(&self, target: &T);
    fn unwatch(&self, target: &T);
}

pub fn register<T: RevealTarget, W: Watcher<T>>(watcher: &W, targets: &[T]) {
    for target in targets {
        target.mark_pending();
        watcher.watch(target);
    }
}

/// Handles one intersection report. Returns `true` if the target was revealed
/// by this report.
pub fn handle_report<T: RevealTarget, W: Watcher<T>>(watcher: &W, target: &T, intersecting: bool) -> bool {
    if !intersecting {
        return false;
    }

    watcher.unwatch(target);
    if target.is_visible() {
        return false;
    }

    target.mark_visible();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeElement {
        id: usize,
        pending: Cell<bool>,
        visible_marks: Cell<u32>,
    }

    impl RevealTarget for FakeElement {
        fn mark_pending(&self) {
            self.pending.set(true);
        }

        fn mark_visible(&self) {
            self.visible_marks.set(self.visible_marks.get() + 1);
        }

        fn is_visible(&self) -> bool {
            self.visible_marks.get() > 0
        }
    }

    #[derive(Default)]
    struct FakeWatcher {
        watched: RefCell<Vec<usize>>,
    }

    impl Watcher<FakeElement> for FakeWatcher {
        fn watch(&self, target: &FakeElement) {
            self.watched.borrow_mut().push(target.id);
        }

        fn unwatch(&self, target: &FakeElement) {
            self.watched.borrow_mut().retain(|id| *id != target.id);
        }
    }

    fn elements(count: usize) -> Vec<FakeElement> {
        (0..count)
            .map(|id| FakeElement {
                id,
                ..FakeElement::default()
            })
            .collect()
    }

    #[test]
    fn registration_tags_and_watches_every_target() {
        let watcher = FakeWatcher::default();
        let targets = elements(3);

        register(&watcher, &targets);

        assert!(targets.iter().all(|target| target.pending.get()));
        assert_eq!(*watcher.watched.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn intersecting_target_is_revealed_and_unwatched() {
        let watcher = FakeWatcher::default();
        let targets = elements(2);
        register(&watcher, &targets);

        assert!(handle_report(&watcher, &targets[1], true));

        assert!(targets[1].is_visible());
        assert!(!targets[0].is_visible());
        assert_eq!(*watcher.watched.borrow(), vec![0]);
    }

    #[test]
    fn non_intersecting_report_changes_nothing() {
        let watcher = FakeWatcher::default();
        let targets = elements(1);
        register(&watcher, &targets);

        assert!(!handle_report(&watcher, &targets[0], false));

        assert!(!targets[0].is_visible());
        assert_eq!(*watcher.watched.borrow(), vec![0]);
    }

    #[test]
    fn repeated_report_does_not_reveal_twice() {
        let watcher = FakeWatcher::default();
        let targets = elements(1);
        register(&watcher, &targets);

        assert!(handle_report(&watcher, &targets[0], true));
        assert!(!handle_report(&watcher, &targets[0], true));

        assert_eq!(targets[0].visible_marks.get(), 1);
        assert!(watcher.watched.borrow().is_empty());
    }
}
