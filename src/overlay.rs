use halo_core::{CheckResult, MicStatus};
use web_sys as web;

use crate::constants::{DIAGNOSTICS_ID, HINT_SELECTOR};

/// Fill the diagnostics panel, if the page has one.
pub fn render_diagnostics(document: &web::Document, checks: &[CheckResult]) {
    let Some(el) = document.get_element_by_id(DIAGNOSTICS_ID) else {
        return;
    };
    let rows: String = checks
        .iter()
        .map(|c| {
            let (class, mark) = if c.pass { ("pass", "✔") } else { ("fail", "✖") };
            format!(
                "<div class='check {class}'><b>{mark} {}</b> <span>{}</span></div>",
                c.name, c.details
            )
        })
        .collect();
    el.set_inner_html(&rows);
}

fn hint(document: &web::Document) -> Option<web::Element> {
    document.query_selector(HINT_SELECTOR).ok().flatten()
}

pub fn hide_hint(document: &web::Document) {
    if let Some(el) = hint(document) {
        _ = el.class_list().add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

pub fn set_hint_text(document: &web::Document, text: &str) {
    if let Some(el) = hint(document) {
        _ = el.class_list().remove_1("hidden");
        _ = el.set_attribute("style", "");
        el.set_inner_html(text);
    }
}

/// Reflect the mic negotiation outcome in the hint line.
pub fn update_mic_status(document: &web::Document, status: MicStatus) {
    match status {
        MicStatus::Granted => hide_hint(document),
        MicStatus::Requested => set_hint_text(document, "Waiting for microphone permission…"),
        MicStatus::Denied => set_hint_text(document, "Microphone blocked. Showing idle animation."),
        MicStatus::Unavailable => {
            set_hint_text(document, "No microphone available. Showing idle animation.")
        }
        MicStatus::Idle => set_hint_text(document, "Click to enable the microphone."),
        MicStatus::Released => set_hint_text(document, "Microphone released. Showing idle animation."),
    }
}
