use std::cell::RefCell;
use std::rc::Rc;

use halo_core::loudness::{frequency_bytes_to_unit, time_domain_bytes_to_signed};
use halo_core::{HaloError, MicStatus, ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::{dom, overlay};

/// Live microphone graph: stream -> source -> analyser (never routed to the
/// speakers).
pub struct MicInput {
    ctx: web::AudioContext,
    stream: web::MediaStream,
    analyser: web::AnalyserNode,
    _source: web::MediaStreamAudioSourceNode,
    freq_bytes: Vec<u8>,
    time_bytes: Vec<u8>,
}

impl MicInput {
    pub async fn open() -> Result<Self, HaloError> {
        let window = web::window().ok_or_else(|| HaloError::MicUnavailable("no window".into()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| HaloError::MicUnavailable(format!("{e:?}")))?;

        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| HaloError::MicUnavailable(format!("{e:?}")))?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(classify_rejection)?
            .dyn_into()
            .map_err(|e| HaloError::MicUnavailable(format!("{e:?}")))?;

        let ctx = match web::AudioContext::new() {
            Ok(c) => c,
            Err(e) => {
                stop_tracks(&stream);
                return Err(HaloError::MicUnavailable(format!("{e:?}")));
            }
        };
        match build_graph(&ctx, &stream) {
            Ok((source, analyser)) => {
                let bins = analyser.frequency_bin_count() as usize;
                let samples = analyser.fft_size() as usize;
                Ok(Self {
                    ctx,
                    stream,
                    analyser,
                    _source: source,
                    freq_bytes: vec![0; bins],
                    time_bytes: vec![128; samples],
                })
            }
            Err(e) => {
                stop_tracks(&stream);
                _ = ctx.close();
                Err(HaloError::MicUnavailable(format!("{e:?}")))
            }
        }
    }

    /// Copy the analyser's current frame into normalized buffers.
    pub fn read(&mut self, spectrum: &mut Vec<f32>, waveform: &mut Vec<f32>) {
        self.analyser.get_byte_frequency_data(&mut self.freq_bytes);
        self.analyser.get_byte_time_domain_data(&mut self.time_bytes);
        frequency_bytes_to_unit(&self.freq_bytes, spectrum);
        time_domain_bytes_to_signed(&self.time_bytes, waveform);
    }

    pub fn is_suspended(&self) -> bool {
        self.ctx.state() == web::AudioContextState::Suspended
    }

    pub fn resume(&self) {
        _ = self.ctx.resume();
    }

    pub fn release(self) {
        stop_tracks(&self.stream);
        _ = self.ctx.close();
        log::info!("[mic] released");
    }
}

fn build_graph(
    ctx: &web::AudioContext,
    stream: &web::MediaStream,
) -> Result<(web::MediaStreamAudioSourceNode, web::AnalyserNode), JsValue> {
    let source = ctx.create_media_stream_source(stream)?;
    let analyser = ctx.create_analyser()?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE as u32);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING as f64);
    source.connect_with_audio_node(&analyser)?;
    _ = ctx.resume();
    Ok((source, analyser))
}

fn stop_tracks(stream: &web::MediaStream) {
    for t in stream.get_tracks().iter() {
        if let Ok(track) = t.dyn_into::<web::MediaStreamTrack>() {
            track.stop();
        }
    }
}

fn classify_rejection(err: JsValue) -> HaloError {
    let name = js_sys::Reflect::get(&err, &"name".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    match name.as_str() {
        "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
            HaloError::MicDenied(name)
        }
        _ => HaloError::MicUnavailable(format!("{err:?}")),
    }
}

/// Negotiation state plus the live input once granted.
#[derive(Default)]
pub struct MicSlot {
    pub status: MicStatus,
    pub input: Option<MicInput>,
}

impl MicSlot {
    /// Fill `spectrum`/`waveform` when live; returns false otherwise.
    pub fn read(&mut self, spectrum: &mut Vec<f32>, waveform: &mut Vec<f32>) -> bool {
        match &mut self.input {
            Some(input) => {
                input.read(spectrum, waveform);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self) {
        if let Some(input) = self.input.take() {
            input.release();
        }
        self.status = self.status.after_release();
    }
}

/// Start the one-time mic negotiation, or resume a suspended context.
/// Every outcome other than idle is final; the user is never re-prompted.
pub fn request(slot: Rc<RefCell<MicSlot>>) {
    {
        let s = slot.borrow();
        if s.status == MicStatus::Granted {
            if let Some(input) = s.input.as_ref().filter(|i| i.is_suspended()) {
                log::info!("[mic] resuming suspended audio context");
                input.resume();
            }
        }
        if !s.status.may_request() {
            return;
        }
    }
    slot.borrow_mut().status = MicStatus::Requested;
    if let Some(doc) = dom::window_document() {
        overlay::update_mic_status(&doc, MicStatus::Requested);
    }

    spawn_local(async move {
        let status = match MicInput::open().await {
            Ok(input) => {
                let mut s = slot.borrow_mut();
                if s.status != MicStatus::Requested {
                    // page was hidden while the prompt was open
                    input.release();
                    return;
                }
                log::info!("[mic] granted");
                s.input = Some(input);
                s.status = MicStatus::Granted;
                MicStatus::Granted
            }
            Err(e) => {
                log::warn!("[mic] {e}; falling back to idle animation");
                let status = e.mic_status();
                slot.borrow_mut().status = status;
                status
            }
        };
        if let Some(doc) = dom::window_document() {
            overlay::update_mic_status(&doc, status);
        }
    });
}
