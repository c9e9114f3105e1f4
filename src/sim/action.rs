//! Timed action sequencer
//!
//! An `Action` is an immutable program built from a few primitives (delay,
//! fade, scale, call) and two combinators: `then` runs actions back to back,
//! `together` runs them side by side. Programs are cheap to clone and can be
//! attached to any number of targets; each attachment gets its own
//! `RunningAction` that is advanced by the frame clock.

use std::fmt;
use std::rc::Rc;

/// Visual attributes an action can animate
pub trait Animatable {
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
    fn scale(&self) -> f32;
    fn set_scale(&mut self, scale: f32);
}

/// One-shot side effect on the target
pub type Callback<T> = Rc<dyn Fn(&mut T)>;

/// An action program
pub enum Action<T> {
    /// Wait, no visible effect
    Delay(f32),
    /// Interpolate opacity from its current value to `opacity`
    FadeTo { duration: f32, opacity: f32 },
    /// Interpolate scale from its current value to `start * factor`
    ScaleBy { duration: f32, factor: f32 },
    /// Invoke a callback once, taking no time
    Call(Callback<T>),
    /// Run the first action, then the second
    Sequence(Box<Action<T>>, Box<Action<T>>),
    /// Run both actions at once
    Parallel(Box<Action<T>>, Box<Action<T>>),
}

impl<T> Action<T> {
    pub fn delay(duration: f32) -> Self {
        Action::Delay(duration)
    }

    pub fn fade_out(duration: f32) -> Self {
        Action::FadeTo {
            duration,
            opacity: 0.0,
        }
    }

    pub fn fade_in(duration: f32) -> Self {
        Action::FadeTo {
            duration,
            opacity: 1.0,
        }
    }

    pub fn scale_by(duration: f32, factor: f32) -> Self {
        Action::ScaleBy { duration, factor }
    }

    pub fn call(f: impl Fn(&mut T) + 'static) -> Self {
        Action::Call(Rc::new(f))
    }

    /// Call `f(target, arg)` once
    pub fn call_with<A>(f: fn(&mut T, A), arg: A) -> Self
    where
        A: Clone + 'static,
        T: 'static,
    {
        Action::Call(Rc::new(move |target: &mut T| f(target, arg.clone())))
    }

    /// Sequential composition: `self` then `next`
    pub fn then(self, next: Action<T>) -> Self {
        Action::Sequence(Box::new(self), Box::new(next))
    }

    /// Parallel composition: `self` together with `other`
    pub fn together(self, other: Action<T>) -> Self {
        Action::Parallel(Box::new(self), Box::new(other))
    }

    /// Total running time in seconds
    pub fn duration(&self) -> f32 {
        match self {
            Action::Delay(d) => *d,
            Action::FadeTo { duration, .. } | Action::ScaleBy { duration, .. } => *duration,
            Action::Call(_) => 0.0,
            Action::Sequence(a, b) => a.duration() + b.duration(),
            Action::Parallel(a, b) => a.duration().max(b.duration()),
        }
    }
}

// Manual impls: deriving would require `T: Clone` / `T: Debug`
impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        match self {
            Action::Delay(d) => Action::Delay(*d),
            Action::FadeTo { duration, opacity } => Action::FadeTo {
                duration: *duration,
                opacity: *opacity,
            },
            Action::ScaleBy { duration, factor } => Action::ScaleBy {
                duration: *duration,
                factor: *factor,
            },
            Action::Call(f) => Action::Call(Rc::clone(f)),
            Action::Sequence(a, b) => Action::Sequence(a.clone(), b.clone()),
            Action::Parallel(a, b) => Action::Parallel(a.clone(), b.clone()),
        }
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Delay(d) => write!(f, "Delay({d})"),
            Action::FadeTo { duration, opacity } => write!(f, "FadeTo({duration}, {opacity})"),
            Action::ScaleBy { duration, factor } => write!(f, "ScaleBy({duration}, {factor})"),
            Action::Call(_) => write!(f, "Call"),
            Action::Sequence(a, b) => write!(f, "({a:?} then {b:?})"),
            Action::Parallel(a, b) => write!(f, "({a:?} together {b:?})"),
        }
    }
}

/// Lifecycle of a running action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Pending,
    Running,
    Resolved,
}

enum NodeKind<T> {
    Delay { duration: f32 },
    Fade { duration: f32, to: f32, from: f32 },
    Scale { duration: f32, factor: f32, from: f32 },
    Call(Callback<T>),
    Sequence(Box<Node<T>>, Box<Node<T>>),
    Parallel(Box<Node<T>>, Box<Node<T>>),
}

struct Node<T> {
    state: ActionState,
    elapsed: f32,
    kind: NodeKind<T>,
}

/// Accumulated frame times may fall short of a duration by rounding
const TIMER_EPSILON: f32 = 1e-4;

/// Advance a timer; returns interpolation progress and, once finished, the
/// unused part of `dt`
#[inline]
fn tick_timer(elapsed: &mut f32, duration: f32, dt: f32) -> (f32, Option<f32>) {
    *elapsed += dt;
    if *elapsed >= duration - TIMER_EPSILON {
        (1.0, Some((*elapsed - duration).max(0.0)))
    } else {
        (*elapsed / duration, None)
    }
}

impl<T: Animatable> Node<T> {
    fn build(action: &Action<T>) -> Self {
        let kind = match action {
            Action::Delay(duration) => NodeKind::Delay {
                duration: *duration,
            },
            Action::FadeTo { duration, opacity } => NodeKind::Fade {
                duration: *duration,
                to: *opacity,
                from: 0.0,
            },
            Action::ScaleBy { duration, factor } => NodeKind::Scale {
                duration: *duration,
                factor: *factor,
                from: 1.0,
            },
            Action::Call(f) => NodeKind::Call(Rc::clone(f)),
            Action::Sequence(a, b) => {
                NodeKind::Sequence(Box::new(Node::build(a)), Box::new(Node::build(b)))
            }
            Action::Parallel(a, b) => {
                NodeKind::Parallel(Box::new(Node::build(a)), Box::new(Node::build(b)))
            }
        };
        Self {
            state: ActionState::Pending,
            elapsed: 0.0,
            kind,
        }
    }

    /// Advance by `dt`. Returns the leftover time once resolved.
    fn advance(&mut self, dt: f32, target: &mut T) -> Option<f32> {
        let Node {
            state,
            elapsed,
            kind,
        } = self;

        if *state == ActionState::Resolved {
            return Some(dt);
        }
        if *state == ActionState::Pending {
            // Interpolations start from whatever the target looks like now
            match kind {
                NodeKind::Fade { from, .. } => *from = target.opacity(),
                NodeKind::Scale { from, .. } => *from = target.scale(),
                _ => {}
            }
            *state = ActionState::Running;
        }

        let leftover = match kind {
            NodeKind::Delay { duration } => tick_timer(elapsed, *duration, dt).1,
            NodeKind::Fade { duration, to, from } => {
                let (t, done) = tick_timer(elapsed, *duration, dt);
                target.set_opacity(*from + (*to - *from) * t);
                done
            }
            NodeKind::Scale {
                duration,
                factor,
                from,
            } => {
                let (t, done) = tick_timer(elapsed, *duration, dt);
                let end = *from * *factor;
                target.set_scale(*from + (end - *from) * t);
                done
            }
            NodeKind::Call(f) => {
                f(target);
                Some(dt)
            }
            NodeKind::Sequence(first, second) => match first.advance(dt, target) {
                Some(rest) => second.advance(rest, target),
                None => None,
            },
            NodeKind::Parallel(a, b) => {
                let ra = a.advance(dt, target);
                let rb = b.advance(dt, target);
                match (ra, rb) {
                    (Some(x), Some(y)) => Some(x.min(y)),
                    _ => None,
                }
            }
        };

        if leftover.is_some() {
            *state = ActionState::Resolved;
        }
        leftover
    }
}

/// A program instance bound to one target
pub struct RunningAction<T> {
    root: Node<T>,
}

impl<T: Animatable> RunningAction<T> {
    pub fn new(action: &Action<T>) -> Self {
        Self {
            root: Node::build(action),
        }
    }

    /// Advance the program by `dt` seconds
    pub fn step(&mut self, dt: f32, target: &mut T) -> ActionState {
        self.root.advance(dt, target);
        self.root.state
    }

    pub fn state(&self) -> ActionState {
        self.root.state
    }

    pub fn is_done(&self) -> bool {
        self.root.state == ActionState::Resolved
    }
}

impl<T> fmt::Debug for RunningAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningAction")
            .field("state", &self.root.state)
            .field("elapsed", &self.root.elapsed)
            .finish()
    }
}
