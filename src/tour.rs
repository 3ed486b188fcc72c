use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Steps and triggers
// ---------------------------------------------------------------------------

/// Fixed linear onboarding sequence. `Completed` is terminal and
/// non-restartable except through an explicit `restart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStep {
    Welcome,
    ProfileLink,
    AddBankAccount,
    VideoTutorial,
    DashboardStats,
    DashboardTable,
    Completion,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user acknowledged the current tooltip.
    Advance,
    /// The user finished the real action the step asks for
    /// (submitting the bank-account form).
    ActionDone,
    /// The user bailed out of the tour.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Profile,
}

/// Side effects the driver must execute on a transition. The engine itself
/// never navigates or persists anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Navigate(Route),
    /// Poll (bounded) until the named pane exists before showing the step.
    AwaitTarget(&'static str),
    /// Persist `onboarding_completed = true`. A persistence failure is
    /// reported to the user but does not undo the local transition.
    PersistCompletion,
}

pub struct StepContent {
    pub title: &'static str,
    pub body: &'static str,
    pub target: Option<&'static str>,
}

/// Explicit transition table: current step × trigger → next step.
/// Anything not listed is a no-op.
fn next_step(step: TourStep, trigger: Trigger) -> Option<TourStep> {
    use TourStep::*;
    match (step, trigger) {
        (Completed, _) => None,
        (_, Trigger::Skip) => Some(Completed),
        (Welcome, Trigger::Advance) => Some(ProfileLink),
        (ProfileLink, Trigger::Advance) => Some(AddBankAccount),
        // Viewing the tooltip is not enough here; the form must be submitted.
        (AddBankAccount, Trigger::ActionDone) => Some(VideoTutorial),
        (VideoTutorial, Trigger::Advance) => Some(DashboardStats),
        (DashboardStats, Trigger::Advance) => Some(DashboardTable),
        (DashboardTable, Trigger::Advance) => Some(Completion),
        (Completion, Trigger::Advance) => Some(Completed),
        _ => None,
    }
}

fn effects_on_enter(step: TourStep) -> Vec<Effect> {
    use TourStep::*;
    match step {
        Welcome | VideoTutorial | Completion => vec![],
        ProfileLink => vec![Effect::AwaitTarget("profile-link")],
        // The form only exists on the profile page, so the engine navigates
        // there itself instead of waiting for the user to find it.
        AddBankAccount => vec![
            Effect::Navigate(Route::Profile),
            Effect::AwaitTarget("account-form"),
        ],
        DashboardStats => vec![
            Effect::Navigate(Route::Dashboard),
            Effect::AwaitTarget("stats-panel"),
        ],
        DashboardTable => vec![Effect::AwaitTarget("receipts-table")],
        Completed => vec![Effect::PersistCompletion],
    }
}

pub fn step_content(step: TourStep) -> Option<StepContent> {
    use TourStep::*;
    let content = match step {
        Welcome => StepContent {
            title: "¡Bienvenido a Ya Quedó!",
            body: "Te mostraremos cómo validar tus comprobantes de pago en unos pocos pasos.",
            target: None,
        },
        ProfileLink => StepContent {
            title: "Tu perfil",
            body: "Desde aquí administras tu negocio y tus cuentas de recaudo.",
            target: Some("profile-link"),
        },
        AddBankAccount => StepContent {
            title: "Agrega una cuenta de recaudo",
            body: "Registra la cuenta donde recibes pagos. Completa el formulario para continuar.",
            target: Some("account-form"),
        },
        VideoTutorial => StepContent {
            title: "Video tutorial",
            body: "Cuando quieras profundizar, el video tutorial está en el menú de ayuda.",
            target: None,
        },
        DashboardStats => StepContent {
            title: "Tus estadísticas",
            body: "Aquí ves el total de comprobantes, cuántos son válidos y el valor recaudado.",
            target: Some("stats-panel"),
        },
        DashboardTable => StepContent {
            title: "Tus comprobantes",
            body: "Cada pago llega a esta tabla con su estado de validación.",
            target: Some("receipts-table"),
        },
        Completion => StepContent {
            title: "¡Listo!",
            body: "Eso es todo. Puedes repetir este recorrido desde el menú de ayuda.",
            target: None,
        },
        Completed => return None,
    };
    Some(content)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TourEngine {
    step: TourStep,
}

impl TourEngine {
    pub fn new() -> Self {
        Self { step: TourStep::Welcome }
    }

    pub fn step(&self) -> TourStep {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step == TourStep::Completed
    }

    /// Re-enter the sequence from the first step. The persisted completion
    /// flag is untouched until the user reaches the end again.
    pub fn restart(&mut self) {
        self.step = TourStep::Welcome;
    }

    /// Apply a trigger. Returns the effects the driver must run for the step
    /// just entered; an unlisted combination returns no effects and leaves
    /// the step unchanged.
    pub fn handle(&mut self, trigger: Trigger) -> Vec<Effect> {
        match next_step(self.step, trigger) {
            Some(next) => {
                self.step = next;
                effects_on_enter(next)
            }
            None => vec![],
        }
    }
}

impl Default for TourEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Bounded polling
// ---------------------------------------------------------------------------

/// Poll `probe` every `interval` until it returns true or `timeout` elapses.
/// Replaces the unbounded interval the step targets were originally watched
/// with: a target that never appears fails the wait instead of spinning
/// forever.
pub fn poll_until<F: FnMut() -> bool>(mut probe: F, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if probe() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_walkthrough_in_order() {
        let mut tour = TourEngine::new();
        assert_eq!(tour.step(), TourStep::Welcome);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::ProfileLink);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::AddBankAccount);
        tour.handle(Trigger::ActionDone);
        assert_eq!(tour.step(), TourStep::VideoTutorial);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::DashboardStats);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::DashboardTable);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::Completion);
        let effects = tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::Completed);
        assert!(tour.is_finished());
        assert_eq!(effects, vec![Effect::PersistCompletion]);
    }

    #[test]
    fn test_bank_account_step_requires_real_action() {
        let mut tour = TourEngine::new();
        tour.handle(Trigger::Advance);
        tour.handle(Trigger::Advance);
        assert_eq!(tour.step(), TourStep::AddBankAccount);
        // Acknowledging the tooltip is not enough.
        let effects = tour.handle(Trigger::Advance);
        assert!(effects.is_empty());
        assert_eq!(tour.step(), TourStep::AddBankAccount);
        tour.handle(Trigger::ActionDone);
        assert_eq!(tour.step(), TourStep::VideoTutorial);
    }

    #[test]
    fn test_action_done_only_applies_to_its_step() {
        let mut tour = TourEngine::new();
        let effects = tour.handle(Trigger::ActionDone);
        assert!(effects.is_empty());
        assert_eq!(tour.step(), TourStep::Welcome);
    }

    #[test]
    fn test_skip_from_any_step_completes_and_persists() {
        let mut tour = TourEngine::new();
        tour.handle(Trigger::Advance);
        let effects = tour.handle(Trigger::Skip);
        assert!(tour.is_finished());
        assert_eq!(effects, vec![Effect::PersistCompletion]);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut tour = TourEngine::new();
        tour.handle(Trigger::Skip);
        assert!(tour.is_finished());
        assert!(tour.handle(Trigger::Advance).is_empty());
        assert!(tour.handle(Trigger::Skip).is_empty());
        assert!(tour.is_finished());
    }

    #[test]
    fn test_restart_reenters_from_welcome() {
        let mut tour = TourEngine::new();
        tour.handle(Trigger::Skip);
        assert!(tour.is_finished());
        tour.restart();
        assert_eq!(tour.step(), TourStep::Welcome);
        assert!(!tour.is_finished());
    }

    #[test]
    fn test_route_coupled_steps_navigate_first() {
        let mut tour = TourEngine::new();
        tour.handle(Trigger::Advance);
        let effects = tour.handle(Trigger::Advance); // enter AddBankAccount
        assert_eq!(
            effects,
            vec![
                Effect::Navigate(Route::Profile),
                Effect::AwaitTarget("account-form"),
            ]
        );
        tour.handle(Trigger::ActionDone);
        let effects = tour.handle(Trigger::Advance); // enter DashboardStats
        assert_eq!(
            effects,
            vec![
                Effect::Navigate(Route::Dashboard),
                Effect::AwaitTarget("stats-panel"),
            ]
        );
    }

    #[test]
    fn test_every_active_step_has_content() {
        use TourStep::*;
        for step in [
            Welcome,
            ProfileLink,
            AddBankAccount,
            VideoTutorial,
            DashboardStats,
            DashboardTable,
            Completion,
        ] {
            assert!(step_content(step).is_some(), "missing content for {step:?}");
        }
        assert!(step_content(Completed).is_none());
    }

    #[test]
    fn test_poll_until_succeeds_once_probe_passes() {
        let mut calls = 0;
        let ok = poll_until(
            || {
                calls += 1;
                calls >= 3
            },
            Duration::from_secs(1),
            Duration::from_millis(1),
        );
        assert!(ok);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_poll_until_times_out() {
        let ok = poll_until(
            || false,
            Duration::from_millis(10),
            Duration::from_millis(2),
        );
        assert!(!ok);
    }
}
