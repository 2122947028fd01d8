use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Requests from the input layer, applied at the start of the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    FieldGoal,
    Reset,
    SpawnOne,
    SpawnMany(usize),
    SpawnJousters,
}

/// Shared queue between input producers and the simulation frame.
///
/// Cloning hands out another producer for the same queue.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Command>> {
        // Keep accepting commands after a producer panicked holding the lock
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn push(&self, command: Command) {
        self.lock().push_back(command);
    }

    /// Everything queued so far, oldest first
    pub fn drain(&self) -> Vec<Command> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_drain_preserves_order() {
        let queue = CommandQueue::new();
        queue.push(Command::FieldGoal);
        queue.push(Command::MoveLeft);
        queue.push(Command::SpawnMany(100));

        assert_eq!(
            queue.drain(),
            vec![Command::FieldGoal, Command::MoveLeft, Command::SpawnMany(100)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_producers_on_other_threads() {
        let queue = CommandQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let producer = queue.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        producer.push(Command::SpawnOne);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.len(), 100);
        assert!(queue.drain().iter().all(|c| *c == Command::SpawnOne));
    }

    #[test]
    fn test_poisoned_queue_still_usable() {
        let queue = CommandQueue::new();
        let producer = queue.clone();
        let _ = thread::spawn(move || {
            let _guard = producer.inner.lock().unwrap();
            panic!("input thread died");
        })
        .join();

        queue.push(Command::Reset);
        assert_eq!(queue.drain(), vec![Command::Reset]);
    }
}
