use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Decides which items to enqueue next. Gets the item being expanded and everything queued so
/// far.
pub type Collector<'a, T> = Box<dyn Fn(&T, &HashSet<T>) -> HashSet<T> + 'a>;
/// Decides which visited items belong in the result.
pub type Decider<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// A breadth-first walk over some graph, usually edges. The collector expands every dequeued
/// item, even ones the decider rejects, so the decider only filters what's returned.
pub struct BfsWalker<'a, T> {
    collector: Collector<'a, T>,
    decider: Decider<'a, T>,
}

impl<'a, T: Clone + Eq + Hash> BfsWalker<'a, T> {
    pub fn new<C: Fn(&T, &HashSet<T>) -> HashSet<T> + 'a>(collector: C) -> BfsWalker<'a, T> {
        BfsWalker::with_decider(collector, |_| true)
    }

    pub fn with_decider<C, D>(collector: C, decider: D) -> BfsWalker<'a, T>
    where
        C: Fn(&T, &HashSet<T>) -> HashSet<T> + 'a,
        D: Fn(&T) -> bool + 'a,
    {
        BfsWalker {
            collector: Box::new(collector),
            decider: Box::new(decider),
        }
    }

    pub fn collect(&self, start: T) -> HashSet<T> {
        let mut result = HashSet::new();
        let mut queued = HashSet::new();
        let mut queue = VecDeque::new();
        queued.insert(start.clone());
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if (self.decider)(&current) {
                result.insert(current.clone());
            }
            // Even if the collector hands back something already seen, never revisit it
            for next in (self.collector)(&current, &queued) {
                if queued.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;

    // 1 -> 2 -> 3 -> 1, and 3 -> 4. 5 is unreachable.
    fn graph() -> HashMap<usize, Vec<usize>> {
        let mut g = HashMap::new();
        g.insert(1, vec![2]);
        g.insert(2, vec![3]);
        g.insert(3, vec![1, 4]);
        g.insert(4, vec![]);
        g.insert(5, vec![1]);
        g
    }

    #[test]
    fn cycles_terminate() {
        let g = graph();
        let calls = Cell::new(0);
        // Deliberately ignores the queued set
        let walker = BfsWalker::new(|x: &usize, _: &HashSet<usize>| {
            calls.set(calls.get() + 1);
            g[x].iter().cloned().collect()
        });
        let found = walker.collect(1);
        assert_eq!(found, vec![1, 2, 3, 4].into_iter().collect());
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn decider_only_filters_the_result() {
        let g = graph();
        let calls = Cell::new(0);
        let walker = BfsWalker::with_decider(
            |x: &usize, _: &HashSet<usize>| {
                calls.set(calls.get() + 1);
                g[x].iter().cloned().collect()
            },
            |_| false,
        );
        assert!(walker.collect(1).is_empty());
        assert_eq!(calls.get(), 4);

        let evens = BfsWalker::with_decider(
            |x: &usize, _: &HashSet<usize>| g[x].iter().cloned().collect(),
            |x| x % 2 == 0,
        );
        assert_eq!(evens.collect(1), vec![2, 4].into_iter().collect());
    }

    #[test]
    fn collector_sees_what_is_queued() {
        let g = graph();
        let walker = BfsWalker::new(|x: &usize, queued: &HashSet<usize>| {
            assert!(queued.contains(x));
            g[x].iter().filter(|y| !queued.contains(y)).cloned().collect()
        });
        assert_eq!(walker.collect(5).len(), 5);
    }
}
