use halo_core::{FrameAudio, HaloScene, InstanceBuffer};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::audio::MicSlot;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::render;

pub struct FrameContext<'a> {
    pub scene: HaloScene,
    pub canvas: web::HtmlCanvasElement,
    pub mic: Rc<RefCell<MicSlot>>,
    pub gpu: Option<render::GpuState<'a>>,

    pub ring: InstanceBuffer,
    pub swarm: InstanceBuffer,
    pub spectrum: Vec<f32>,
    pub waveform: Vec<f32>,

    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        scene: HaloScene,
        canvas: web::HtmlCanvasElement,
        mic: Rc<RefCell<MicSlot>>,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        let ring = InstanceBuffer::with_len(scene.ring_instance_count());
        let swarm = InstanceBuffer::with_len(scene.swarm_instance_count());
        Self {
            scene,
            canvas,
            mic,
            gpu,
            ring,
            swarm,
            spectrum: Vec::new(),
            waveform: Vec::new(),
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        let live = self
            .mic
            .borrow_mut()
            .read(&mut self.spectrum, &mut self.waveform);
        let audio = if live {
            FrameAudio {
                spectrum: Some(&self.spectrum),
                waveform: Some(&self.waveform),
            }
        } else {
            FrameAudio::default()
        };

        let out = self
            .scene
            .frame(dt, audio, &mut self.ring, &mut self.swarm);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(&out, &self.ring, &self.swarm) {
                log::error!("[gpu] render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    scene: &HaloScene,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, scene).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
