use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

pub type Task = Box<dyn FnOnce()>;

// Dropping the returned handle cancels the task if it has not fired yet.
pub trait Scheduler: Clone + 'static {
    type Handle: 'static;

    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle;
}

struct PendingTask {
    id: u64,
    due: u64,
    task: Task,
}

#[derive(Default)]
struct Timeline {
    now: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    timeline: Rc<RefCell<Timeline>>,
}

pub struct ManualHandle {
    id: u64,
    timeline: Weak<RefCell<Timeline>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        let Some(timeline) = self.timeline.upgrade() else {
            return;
        };

        // The removed task may own other handles, so it is dropped only
        // after the timeline borrow is released.
        let removed = {
            let mut timeline = timeline.borrow_mut();
            timeline
                .pending
                .iter()
                .position(|pending| pending.id == self.id)
                .map(|index| timeline.pending.swap_remove(index))
        };
        drop(removed);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.timeline.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending.len()
    }

    pub fn advance(&self, delta_ms: u64) {
        let target = self.now().saturating_add(delta_ms);

        loop {
            let next = {
                let mut timeline = self.timeline.borrow_mut();
                let index = timeline
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.id))
                    .map(|(index, _)| index);

                index.map(|index| {
                    let pending = timeline.pending.swap_remove(index);
                    timeline.now = pending.due;
                    pending
                })
            };

            match next {
                Some(pending) => (pending.task)(),
                None => break,
            }
        }

        self.timeline.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, task: Task) -> ManualHandle {
        let mut timeline = self.timeline.borrow_mut();
        let id = timeline.next_id;
        timeline.next_id += 1;
        let due = timeline.now.saturating_add(u64::from(delay_ms));
        timeline.pending.push(PendingTask { id, due, task });

        ManualHandle {
            id,
            timeline: Rc::downgrade(&self.timeline),
        }
    }
}

pub struct Debounced<S: Scheduler> {
    scheduler: S,
    wait_ms: u32,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler> Debounced<S> {
    pub fn new(scheduler: S, wait_ms: u32) -> Self {
        Self {
            scheduler,
            wait_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn call(&self, task: impl FnOnce() + 'static) {
        let handle = self.scheduler.schedule(self.wait_ms, Box::new(task));
        let previous = self.pending.replace(Some(handle));
        drop(previous);
    }
}

struct LoopState<S: Scheduler> {
    scheduler: S,
    slot: RefCell<Option<S::Handle>>,
    step: RefCell<Box<dyn FnMut() -> Option<u32>>>,
    running: Cell<bool>,
}

pub struct ScheduledLoop<S: Scheduler> {
    state: Rc<LoopState<S>>,
}

impl<S: Scheduler> ScheduledLoop<S> {
    pub fn start(
        scheduler: S,
        initial_delay_ms: u32,
        step: impl FnMut() -> Option<u32> + 'static,
    ) -> Self {
        let state = Rc::new(LoopState {
            scheduler,
            slot: RefCell::new(None),
            step: RefCell::new(Box::new(step)),
            running: Cell::new(true),
        });
        arm(&state, initial_delay_ms);

        Self { state }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    pub fn cancel(&self) {
        self.state.running.set(false);
        let pending = self.state.slot.take();
        drop(pending);
    }
}

impl<S: Scheduler> Drop for ScheduledLoop<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn arm<S: Scheduler>(state: &Rc<LoopState<S>>, delay_ms: u32) {
    let weak = Rc::downgrade(state);
    let handle = state.scheduler.schedule(
        delay_ms,
        Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if !state.running.get() {
                return;
            }

            let next = {
                let mut step = state.step.borrow_mut();
                (&mut *step)()
            };
            match next {
                Some(delay_ms) if state.running.get() => arm(&state, delay_ms),
                Some(_) => {}
                None => state.running.set(false),
            }
        }),
    );

    let previous = state.slot.replace(Some(handle));
    drop(previous);
}
