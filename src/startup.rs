use slint::ComponentHandle;
use std::time::Duration;

use crate::preview::DismissGuard;
use crate::ui::SharedController;

/// What a focus change of the popover window means for the popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTransition {
    Opened,
    Dismissed,
    Kept,
}

fn focus_transition(focused: bool, guard: &DismissGuard) -> FocusTransition {
    if focused {
        FocusTransition::Opened
    } else if guard.is_suppressed() {
        FocusTransition::Kept
    } else {
        FocusTransition::Dismissed
    }
}

fn apply_transition(
    ui: slint::Weak<crate::PopoverWindow>,
    controller: SharedController,
    transition: FocusTransition,
) {
    // Deferred so the controller is never borrowed from inside a window event.
    slint::Timer::single_shot(Duration::ZERO, move || match transition {
        FocusTransition::Opened => {
            log::debug!("Popover focused, reloading");
            controller.borrow_mut().popover_opened();
        }
        FocusTransition::Dismissed => {
            log::debug!("Popover lost focus, dismissing");
            controller.borrow_mut().popover_closed();
            if let Some(ui) = ui.upgrade() {
                ui.window().set_minimized(true);
            }
        }
        FocusTransition::Kept => log::debug!("Popover lost focus to the preview, keeping it"),
    });
}

/// Treats window focus as the popover's open/close lifecycle.
///
/// Gaining focus reloads the grid. Losing it dismisses the popover unless the
/// preview window holds the dismiss guard.
pub fn configure_popover_window(
    app: &crate::PopoverWindow,
    controller: SharedController,
    guard: DismissGuard,
) {
    use i_slint_backend_winit::WinitWindowAccessor;
    use i_slint_backend_winit::{EventResult, winit::event::WindowEvent};

    let ui_handle = app.as_weak();
    app.window().on_winit_window_event(move |_window, event| {
        if let WindowEvent::Focused(focused) = event {
            let transition = focus_transition(*focused, &guard);
            apply_transition(ui_handle.clone(), controller.clone(), transition);
        }
        EventResult::Propagate
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_loss_dismisses_unless_guarded() {
        let guard = DismissGuard::new();
        assert_eq!(focus_transition(true, &guard), FocusTransition::Opened);
        assert_eq!(focus_transition(false, &guard), FocusTransition::Dismissed);

        guard.suppress();
        assert_eq!(focus_transition(false, &guard), FocusTransition::Kept);
        assert_eq!(focus_transition(true, &guard), FocusTransition::Opened);
    }
}
