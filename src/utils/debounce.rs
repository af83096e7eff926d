// ============================================================================
// DEBOUNCE - Temporizador de un solo disparo cancelable
// ============================================================================
// En el navegador se usa gloo_timers (Timeout se cancela al hacer drop).
// En tests se usa ManualScheduler, que avanza el tiempo a mano.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle de una tarea programada. Hacer drop cancela la tarea.
pub struct TimerHandle {
    _guard: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<G: Any>(guard: G) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle;
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct BrowserScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(gloo_timers::callback::Timeout::new(delay_ms, task))
    }
}

struct CancelOnDrop(Rc<Cell<bool>>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

struct PendingTask {
    id: u64,
    due_ms: u64,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler determinista: nada se ejecuta hasta llamar a `advance`
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    /// Tareas vivas (no canceladas) aún por ejecutar
    pub fn pending_count(&self) -> usize {
        self.clock
            .borrow()
            .pending
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Avanzar el reloj ejecutando en orden las tareas que vencen
    pub fn advance(&self, ms: u64) {
        let target = self.clock.borrow().now_ms + ms;
        loop {
            // La tarea se saca del RefCell antes de ejecutarla: puede reprogramar
            let next = {
                let mut clock = self.clock.borrow_mut();
                clock.pending.retain(|t| !t.cancelled.get());
                let due = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(idx, _)| idx);
                match due {
                    Some(idx) => {
                        let task = clock.pending.remove(idx);
                        clock.now_ms = task.due_ms;
                        Some(task)
                    }
                    None => {
                        clock.now_ms = target;
                        None
                    }
                }
            };
            match next {
                Some(task) => (task.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due_ms = clock.now_ms + u64::from(delay_ms);
        clock.pending.push(PendingTask {
            id,
            due_ms,
            cancelled: cancelled.clone(),
            task,
        });
        TimerHandle::new(CancelOnDrop(cancelled))
    }
}

/// Debouncer: solo el último valor dentro del periodo de silencio se confirma
pub struct Debouncer<T: 'static> {
    scheduler: Rc<dyn Scheduler>,
    quiet_period_ms: u32,
    pending: Rc<RefCell<Option<T>>>,
    handle: RefCell<Option<TimerHandle>>,
    on_commit: Rc<dyn Fn(T)>,
}

impl<T: 'static> Debouncer<T> {
    pub fn new<F>(scheduler: Rc<dyn Scheduler>, quiet_period_ms: u32, on_commit: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        Self {
            scheduler,
            quiet_period_ms,
            pending: Rc::new(RefCell::new(None)),
            handle: RefCell::new(None),
            on_commit: Rc::new(on_commit),
        }
    }

    /// Registrar un valor y reiniciar el temporizador
    pub fn call(&self, value: T) {
        *self.pending.borrow_mut() = Some(value);

        let pending = self.pending.clone();
        let on_commit = self.on_commit.clone();
        let handle = self.scheduler.schedule(
            self.quiet_period_ms,
            Box::new(move || {
                let value = pending.borrow_mut().take();
                if let Some(value) = value {
                    on_commit(value);
                }
            }),
        );

        // Reemplazar el handle cancela el temporizador anterior
        let previous = self.handle.borrow_mut().replace(handle);
        drop(previous);
    }

    /// Descartar el valor pendiente sin confirmarlo
    pub fn cancel(&self) {
        let previous = self.handle.borrow_mut().take();
        drop(previous);
        self.pending.borrow_mut().take();
    }

    /// Confirmar ya el valor pendiente, si lo hay
    pub fn flush(&self) {
        let previous = self.handle.borrow_mut().take();
        drop(previous);
        let value = self.pending.borrow_mut().take();
        if let Some(value) = value {
            (self.on_commit)(value);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_debouncer(
        scheduler: &ManualScheduler,
        quiet_ms: u32,
    ) -> (Debouncer<String>, Rc<RefCell<Vec<String>>>) {
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = commits.clone();
        let debouncer = Debouncer::new(Rc::new(scheduler.clone()), quiet_ms, move |v: String| {
            sink.borrow_mut().push(v)
        });
        (debouncer, commits)
    }

    #[test]
    fn test_only_last_value_commits() {
        let scheduler = ManualScheduler::new();
        let (debouncer, commits) = recording_debouncer(&scheduler, 500);

        for text in ["a", "ac", "acm", "acme"] {
            debouncer.call(text.to_string());
            scheduler.advance(100);
        }
        assert!(commits.borrow().is_empty());

        scheduler.advance(500);
        assert_eq!(*commits.borrow(), vec!["acme".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_timer_restarts_on_each_call() {
        let scheduler = ManualScheduler::new();
        let (debouncer, commits) = recording_debouncer(&scheduler, 500);

        debouncer.call("x".to_string());
        scheduler.advance(499);
        debouncer.call("xy".to_string());
        scheduler.advance(499);
        assert!(commits.borrow().is_empty());
        scheduler.advance(1);
        assert_eq!(*commits.borrow(), vec!["xy".to_string()]);
    }

    #[test]
    fn test_cancel_and_flush() {
        let scheduler = ManualScheduler::new();
        let (debouncer, commits) = recording_debouncer(&scheduler, 300);

        debouncer.call("dropped".to_string());
        debouncer.cancel();
        scheduler.advance(1_000);
        assert!(commits.borrow().is_empty());
        assert_eq!(scheduler.pending_count(), 0);

        debouncer.call("now".to_string());
        debouncer.flush();
        assert_eq!(*commits.borrow(), vec!["now".to_string()]);
        scheduler.advance(1_000);
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn test_separate_quiet_periods_commit_separately() {
        let scheduler = ManualScheduler::new();
        let (debouncer, commits) = recording_debouncer(&scheduler, 200);

        debouncer.call("first".to_string());
        scheduler.advance(250);
        debouncer.call("second".to_string());
        scheduler.advance(250);
        assert_eq!(
            *commits.borrow(),
            vec!["first".to_string(), "second".to_string()]
        );
    }
}
