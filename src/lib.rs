#![cfg(target_arch = "wasm32")]
use halo_core::diagnostics::all_passed;
use halo_core::{run_self_checks, Capabilities, HaloConfig, HaloScene};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod frame;
mod overlay;
mod render;

use audio::MicSlot;
use constants::CANVAS_ID;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    dom::add_window_listener("resize", move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    });
}

fn wire_mic(canvas: &web::HtmlCanvasElement, mic: &Rc<RefCell<MicSlot>>, auto_start: bool) {
    if auto_start {
        audio::request(mic.clone());
    } else if let Some(doc) = dom::window_document() {
        overlay::update_mic_status(&doc, mic.borrow().status);
    }

    // Click starts the mic when auto-start is off, or resumes a suspended context.
    let mic_click = mic.clone();
    dom::add_click_listener(canvas.as_ref(), move || audio::request(mic_click.clone()));

    let mic_hide = mic.clone();
    dom::add_window_listener("pagehide", move || mic_hide.borrow_mut().release());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("halo-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let config = HaloConfig::default();
    let auto_start = config.auto_start_mic;
    let scene = HaloScene::new(config);

    let gpu = if dom::has_webgpu(&window) {
        frame::init_gpu(&canvas, &scene).await
    } else {
        None
    };
    let caps = Capabilities {
        render_context: gpu.is_some(),
        mic_api: dom::has_media_devices(&window),
    };
    let checks = run_self_checks(caps);
    overlay::render_diagnostics(&document, &checks);
    log::info!(
        "[diagnostics] {}/{} checks passed",
        checks.iter().filter(|c| c.pass).count(),
        checks.len()
    );

    if gpu.is_none() {
        log::error!("[gpu] rendering context unavailable; halo disabled");
        return Ok(());
    }
    if !all_passed(&checks) {
        log::warn!("[diagnostics] continuing with failed checks");
    }

    let mic = Rc::new(RefCell::new(MicSlot::default()));
    if caps.mic_api {
        wire_mic(&canvas, &mic, auto_start);
    } else {
        log::warn!("[mic] no getUserMedia; running idle animation");
        mic.borrow_mut().status = halo_core::MicStatus::Unavailable;
        overlay::update_mic_status(&document, halo_core::MicStatus::Unavailable);
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        scene,
        canvas,
        mic,
        gpu,
    )));
    frame::start_loop(frame_ctx);
    Ok(())
}
