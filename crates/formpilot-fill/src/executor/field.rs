//! Pending → Filling → Verifying → {Success | RolledBack} for one field.

use tracing::{debug, warn};

use formpilot_detect::check_fillable;
use formpilot_protocols::{
    ElementId, FieldMapping, FieldPort, FillFeedback, FillOutcome, FillState, FillTarget,
    InputEvent, PortError,
};

/// Events a user typing a value would produce, in order.
const WRITE_EVENTS: [InputEvent; 5] = [
    InputEvent::KeyDown,
    InputEvent::KeyUp,
    InputEvent::Input,
    InputEvent::Change,
    InputEvent::Blur,
];

pub fn fill_field<P>(port: &mut P, mapping: &FieldMapping, show_feedback: bool) -> FillOutcome
where
    P: FieldPort + ?Sized,
{
    let element = mapping.element;
    let field_type = mapping.field_type;
    let outcome = |state: FillState, detail: Option<String>| FillOutcome {
        element,
        target: FillTarget::Field(field_type),
        state,
        detail,
    };

    debug!("{} {}: {:?}", field_type, element, FillState::Filling);
    if let Err(reason) = check_fillable(&*port, element) {
        debug!("{} {} skipped: {}", field_type, element, reason);
        return outcome(FillState::Skipped, Some(reason.to_string()));
    }
    if mapping.value.trim().is_empty() {
        debug!("{} {} skipped: no profile value", field_type, element);
        return outcome(FillState::Skipped, Some("no profile value".to_string()));
    }

    let original = port.value(element).unwrap_or_default();
    if let Err(e) = write(port, element, &mapping.value) {
        warn!("Writing {} {} failed: {}", field_type, element, e);
        restore(port, element, &original);
        feedback(port, element, FillFeedback::Failure, show_feedback);
        return outcome(
            FillState::Failed,
            Some(format!("Failed to fill {} field: {}", field_type, e)),
        );
    }

    debug!("{} {}: {:?}", field_type, element, FillState::Verifying);
    if verify(&*port, element, &mapping.value) {
        feedback(port, element, FillFeedback::Success, show_feedback);
        debug!("{} {}: {:?}", field_type, element, FillState::Success);
        outcome(FillState::Success, None)
    } else {
        warn!(
            "{} {} did not keep the written value; rolling back",
            field_type, element
        );
        restore(port, element, &original);
        feedback(port, element, FillFeedback::Failure, show_feedback);
        outcome(
            FillState::RolledBack,
            Some(format!("Failed to fill {} field", field_type)),
        )
    }
}

fn write<P>(port: &mut P, element: ElementId, value: &str) -> Result<(), PortError>
where
    P: FieldPort + ?Sized,
{
    port.focus(element)?;
    port.set_value(element, "")?;
    port.set_value(element, value)?;
    for event in WRITE_EVENTS {
        port.dispatch(element, event)?;
    }
    port.blur(element)
}

/// The element reports exactly the intended value. Selects are the one
/// exception: a case-insensitive match on the chosen option's value or on
/// its visible text also counts, since profiles store the text ("New York")
/// while the element reports the option value ("NY").
fn verify<P>(port: &P, element: ElementId, intended: &str) -> bool
where
    P: FieldPort + ?Sized,
{
    if port.value(element).as_deref() == Some(intended) {
        return true;
    }
    port.tag_name(element).as_deref() == Some("select")
        && (port
            .value(element)
            .is_some_and(|v| v.eq_ignore_ascii_case(intended))
            || port
                .selected_text(element)
                .is_some_and(|t| t.eq_ignore_ascii_case(intended)))
}

fn restore<P>(port: &mut P, element: ElementId, original: &str)
where
    P: FieldPort + ?Sized,
{
    let restored = port
        .set_value(element, original)
        .and_then(|_| port.dispatch(element, InputEvent::Input))
        .and_then(|_| port.dispatch(element, InputEvent::Change));
    if let Err(e) = restored {
        warn!("Could not restore {} to its original value: {}", element, e);
    }
}

pub(super) fn feedback<P>(port: &mut P, element: ElementId, kind: FillFeedback, enabled: bool)
where
    P: FieldPort + ?Sized,
{
    if !enabled {
        return;
    }
    if let Err(e) = port.show_feedback(element, kind) {
        debug!("Feedback on {} failed: {}", element, e);
    }
}
