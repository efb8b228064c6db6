//! Install/update prompt coordination.
//!
//! An action/effect reducer over [`PromptState`]: platform signals and user
//! gestures come in as [`PromptAction`]s, state transitions happen here, and
//! side effects the shell must execute (invoking the platform install
//! prompt, starting a cache run, activating a waiting update, showing a
//! notice) come back as [`PromptEffect`]s.

/// Opaque install-token holder with explicit replace/take semantics.
///
/// Holding the token in an owned optional slot (instead of a raw nullable)
/// prevents double consumption: `take` transfers ownership to exactly one
/// prompt invocation, and a fresh platform signal overwrites any unconsumed
/// token.
#[derive(Debug)]
pub struct InstallPromptSlot<T> {
    token: Option<T>,
}

impl<T> Default for InstallPromptSlot<T> {
    fn default() -> Self {
        Self { token: None }
    }
}

impl<T> InstallPromptSlot<T> {
    /// Stores a new token, returning any unconsumed previous one.
    pub fn replace(&mut self, token: T) -> Option<T> {
        self.token.replace(token)
    }

    /// Consumes the held token.
    pub fn take(&mut self) -> Option<T> {
        self.token.take()
    }

    /// Whether a token is currently held.
    pub fn is_held(&self) -> bool {
        self.token.is_some()
    }
}

/// Environment snapshot computed by the caller at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveContext {
    /// Whether the app is running in installed/standalone mode.
    pub standalone: bool,
    /// Current connectivity snapshot.
    pub online: bool,
    /// Whether the resource set is already fully cached.
    pub already_cached: bool,
}

/// User-facing notices the coordinator can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptNotice {
    /// Saving resources needs connectivity.
    GoOnline,
    /// The resource set is already saved.
    AlreadyCached,
    /// No install token is held; point at the browser's own affordance.
    ManualInstall,
}

impl PromptNotice {
    /// User-facing message for this notice.
    pub const fn message(self) -> &'static str {
        match self {
            Self::GoOnline => "Connect to the internet to save resources for offline use.",
            Self::AlreadyCached => "Resources are already saved for offline use.",
            Self::ManualInstall => {
                "Use your browser's install option to add this app to your home screen."
            }
        }
    }
}

/// Actions accepted by [`reduce_prompts`].
#[derive(Debug, PartialEq, Eq)]
pub enum PromptAction<T> {
    /// The platform signalled installability; the adapter has already
    /// suppressed the default prompt and extracted the capability token.
    InstallSignal {
        /// Opaque platform install-prompt token.
        token: T,
    },
    /// The user triggered the save/install gesture.
    SaveRequested {
        /// Environment snapshot at gesture time.
        context: SaveContext,
    },
    /// The platform resolved a previously invoked install prompt.
    InstallChoiceResolved {
        /// Whether the user accepted installation.
        accepted: bool,
    },
    /// The service-worker layer reported a new version waiting.
    UpdateAvailable,
    /// The user asked to apply the waiting update.
    ApplyUpdate,
    /// The user dismissed the update prompt.
    DismissUpdate,
    /// The transient notice timer elapsed.
    ClearNotice,
}

/// Side effects emitted by [`reduce_prompts`] for the shell to execute.
#[derive(Debug, PartialEq, Eq)]
pub enum PromptEffect<T> {
    /// Invoke the platform install prompt with the consumed token and feed
    /// the choice back as [`PromptAction::InstallChoiceResolved`].
    InvokeInstallPrompt {
        /// Consumed install-prompt token.
        token: T,
    },
    /// Start an offline resource caching run.
    BeginResourceCaching,
    /// Activate the waiting service worker and reload.
    ActivateUpdate,
    /// Show (and schedule auto-clear for) a transient notice.
    ShowNotice {
        /// Notice to display.
        notice: PromptNotice,
    },
}

/// Coordinator state for the install and update prompts.
#[derive(Debug)]
pub struct PromptState<T> {
    install_slot: InstallPromptSlot<T>,
    /// Whether the install prompt UI is currently shown.
    pub install_prompt_visible: bool,
    /// Whether an install prompt was accepted; hides the prompt permanently.
    pub install_consumed: bool,
    /// Whether the update prompt UI is currently shown.
    pub update_prompt_visible: bool,
    /// Whether a waiting update was already activated.
    pub update_applied: bool,
    /// Currently displayed transient notice, if any.
    pub notice: Option<PromptNotice>,
}

impl<T> Default for PromptState<T> {
    fn default() -> Self {
        Self {
            install_slot: InstallPromptSlot::default(),
            install_prompt_visible: false,
            install_consumed: false,
            update_prompt_visible: false,
            update_applied: false,
            notice: None,
        }
    }
}

impl<T> PromptState<T> {
    /// Whether an install token is currently held.
    pub fn token_held(&self) -> bool {
        self.install_slot.is_held()
    }
}

fn show_notice<T>(state: &mut PromptState<T>, effects: &mut Vec<PromptEffect<T>>, notice: PromptNotice) {
    state.notice = Some(notice);
    effects.push(PromptEffect::ShowNotice { notice });
}

/// Applies a [`PromptAction`] to the prompt state and collects the side
/// effects the shell must execute.
pub fn reduce_prompts<T>(
    state: &mut PromptState<T>,
    action: PromptAction<T>,
) -> Vec<PromptEffect<T>> {
    let mut effects = Vec::new();
    match action {
        PromptAction::InstallSignal { token } => {
            // A fresh signal overwrites any unconsumed token.
            state.install_slot.replace(token);
            if !state.install_consumed {
                state.install_prompt_visible = true;
            }
        }
        PromptAction::SaveRequested { context } => {
            if context.standalone {
                if !context.online {
                    show_notice(state, &mut effects, PromptNotice::GoOnline);
                } else if context.already_cached {
                    show_notice(state, &mut effects, PromptNotice::AlreadyCached);
                } else {
                    effects.push(PromptEffect::BeginResourceCaching);
                }
            } else if let Some(token) = state.install_slot.take() {
                effects.push(PromptEffect::InvokeInstallPrompt { token });
            } else {
                show_notice(state, &mut effects, PromptNotice::ManualInstall);
            }
        }
        PromptAction::InstallChoiceResolved { accepted } => {
            // The token was consumed at invocation time either way.
            if accepted {
                state.install_consumed = true;
                state.install_prompt_visible = false;
            } else {
                state.install_prompt_visible = true;
            }
        }
        PromptAction::UpdateAvailable => {
            if !state.update_applied {
                state.update_prompt_visible = true;
            }
        }
        PromptAction::ApplyUpdate => {
            if state.update_prompt_visible {
                state.update_prompt_visible = false;
                state.update_applied = true;
                effects.push(PromptEffect::ActivateUpdate);
            }
        }
        PromptAction::DismissUpdate => {
            state.update_prompt_visible = false;
        }
        PromptAction::ClearNotice => {
            state.notice = None;
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type State = PromptState<u32>;

    fn browser_context() -> SaveContext {
        SaveContext {
            standalone: false,
            online: true,
            already_cached: false,
        }
    }

    #[test]
    fn install_signal_captures_token_and_shows_prompt() {
        let mut state = State::default();
        let effects = reduce_prompts(&mut state, PromptAction::InstallSignal { token: 1 });
        assert_eq!(effects, Vec::new());
        assert!(state.token_held());
        assert!(state.install_prompt_visible);
    }

    #[test]
    fn new_signal_overwrites_unconsumed_token() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 1 });
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 2 });

        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: browser_context(),
            },
        );
        assert_eq!(effects, vec![PromptEffect::InvokeInstallPrompt { token: 2 }]);
    }

    #[test]
    fn save_with_token_consumes_it_exactly_once() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 7 });

        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: browser_context(),
            },
        );
        assert_eq!(effects, vec![PromptEffect::InvokeInstallPrompt { token: 7 }]);
        assert!(!state.token_held());

        // A second save without a fresh signal points at the manual path.
        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: browser_context(),
            },
        );
        assert_eq!(
            effects,
            vec![PromptEffect::ShowNotice {
                notice: PromptNotice::ManualInstall,
            }]
        );
        assert_eq!(state.notice, Some(PromptNotice::ManualInstall));
    }

    #[test]
    fn acceptance_hides_the_prompt_permanently() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 1 });
        reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: browser_context(),
            },
        );
        reduce_prompts(&mut state, PromptAction::InstallChoiceResolved { accepted: true });
        assert!(state.install_consumed);
        assert!(!state.install_prompt_visible);
        assert!(!state.token_held());

        // Even a fresh signal no longer shows the prompt.
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 9 });
        assert!(!state.install_prompt_visible);
    }

    #[test]
    fn decline_keeps_the_prompt_visible_with_the_token_cleared() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::InstallSignal { token: 1 });
        reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: browser_context(),
            },
        );
        reduce_prompts(
            &mut state,
            PromptAction::InstallChoiceResolved { accepted: false },
        );
        assert!(!state.install_consumed);
        assert!(state.install_prompt_visible);
        assert!(!state.token_held());
    }

    #[test]
    fn standalone_save_delegates_to_caching_when_online() {
        let mut state = State::default();
        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: SaveContext {
                    standalone: true,
                    online: true,
                    already_cached: false,
                },
            },
        );
        assert_eq!(effects, vec![PromptEffect::BeginResourceCaching]);
    }

    #[test]
    fn standalone_save_offline_raises_the_go_online_notice() {
        let mut state = State::default();
        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: SaveContext {
                    standalone: true,
                    online: false,
                    already_cached: false,
                },
            },
        );
        assert_eq!(
            effects,
            vec![PromptEffect::ShowNotice {
                notice: PromptNotice::GoOnline,
            }]
        );
        assert_eq!(state.notice, Some(PromptNotice::GoOnline));
    }

    #[test]
    fn standalone_save_when_already_cached_raises_that_notice() {
        let mut state = State::default();
        let effects = reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: SaveContext {
                    standalone: true,
                    online: true,
                    already_cached: true,
                },
            },
        );
        assert_eq!(
            effects,
            vec![PromptEffect::ShowNotice {
                notice: PromptNotice::AlreadyCached,
            }]
        );
    }

    #[test]
    fn update_prompt_applies_exactly_once() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::UpdateAvailable);
        assert!(state.update_prompt_visible);

        let effects = reduce_prompts(&mut state, PromptAction::ApplyUpdate);
        assert_eq!(effects, vec![PromptEffect::ActivateUpdate]);
        assert!(!state.update_prompt_visible);
        assert!(state.update_applied);

        // Idempotent once hidden.
        assert_eq!(reduce_prompts(&mut state, PromptAction::ApplyUpdate), Vec::new());
        assert_eq!(reduce_prompts(&mut state, PromptAction::DismissUpdate), Vec::new());

        // A late availability signal does not resurface an applied update.
        reduce_prompts(&mut state, PromptAction::UpdateAvailable);
        assert!(!state.update_prompt_visible);
    }

    #[test]
    fn update_dismiss_hides_without_applying() {
        let mut state = State::default();
        reduce_prompts(&mut state, PromptAction::UpdateAvailable);
        assert_eq!(reduce_prompts(&mut state, PromptAction::DismissUpdate), Vec::new());
        assert!(!state.update_prompt_visible);
        assert!(!state.update_applied);

        // Apply after dismiss is a no-op until the prompt is surfaced again.
        assert_eq!(reduce_prompts(&mut state, PromptAction::ApplyUpdate), Vec::new());
        reduce_prompts(&mut state, PromptAction::UpdateAvailable);
        assert!(state.update_prompt_visible);
    }

    #[test]
    fn clear_notice_removes_the_displayed_notice() {
        let mut state = State::default();
        reduce_prompts(
            &mut state,
            PromptAction::SaveRequested {
                context: SaveContext {
                    standalone: true,
                    online: false,
                    already_cached: false,
                },
            },
        );
        assert!(state.notice.is_some());
        reduce_prompts(&mut state, PromptAction::ClearNotice);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn notice_messages_are_user_facing() {
        assert!(PromptNotice::GoOnline.message().contains("internet"));
        assert!(PromptNotice::AlreadyCached.message().contains("already"));
        assert!(PromptNotice::ManualInstall.message().contains("install"));
    }
}
