use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn add_click_listener(target: &web::EventTarget, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn add_window_listener(event: &str, mut handler: impl FnMut() + 'static) {
    if let Some(w) = web::window() {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = w.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

fn has_property(obj: &wasm_bindgen::JsValue, name: &str) -> bool {
    js_sys::Reflect::get(obj, &name.into())
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

pub fn has_webgpu(window: &web::Window) -> bool {
    has_property(window.navigator().as_ref(), "gpu")
}

pub fn has_media_devices(window: &web::Window) -> bool {
    let nav = window.navigator();
    has_property(nav.as_ref(), "mediaDevices")
        && nav
            .media_devices()
            .map(|md| has_property(md.as_ref(), "getUserMedia"))
            .unwrap_or(false)
}
