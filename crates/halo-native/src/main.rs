use std::time::Instant;

use clap::Parser;
use halo_core::{
    run_self_checks, Capabilities, CheckResult, FrameAudio, FrameOutput, HaloConfig, HaloScene,
    InstanceBuffer, MicStatus,
};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

mod cli;
mod mic;
mod render;

use cli::Args;
use mic::MicCapture;
use render::GpuState;

// Clamp long stalls (window drag, debugger) so timers stay sane.
const MAX_FRAME_DT_SEC: f32 = 0.1;

struct App {
    scene: HaloScene,
    ring: InstanceBuffer,
    swarm: InstanceBuffer,
    mic: Option<MicCapture>,
    last_frame: Instant,
}

impl App {
    fn new(config: HaloConfig) -> Self {
        let use_mic = config.auto_start_mic;
        let scene = HaloScene::new(config);
        let ring = InstanceBuffer::with_len(scene.ring_instance_count());
        let swarm = InstanceBuffer::with_len(scene.swarm_instance_count());
        let (mic, status) = if use_mic {
            match MicCapture::open() {
                Ok(m) => (Some(m), MicStatus::Granted),
                Err(e) => {
                    log::warn!("[mic] {e}; falling back to idle animation");
                    (None, e.mic_status())
                }
            }
        } else {
            (None, MicStatus::Idle)
        };
        log::info!("[mic] status: {}", status.label());
        Self {
            scene,
            ring,
            swarm,
            mic,
            last_frame: Instant::now(),
        }
    }

    fn tick(&mut self) -> FrameOutput {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_frame = now;
        let audio: FrameAudio<'_> = self
            .mic
            .as_mut()
            .map(MicCapture::read)
            .unwrap_or_default();
        self.scene.frame(dt, audio, &mut self.ring, &mut self.swarm)
    }
}

fn report(checks: &[CheckResult]) {
    for c in checks {
        if c.pass {
            log::info!("[diagnostics] PASS {}: {}", c.name, c.details);
        } else {
            log::error!("[diagnostics] FAIL {}: {}", c.name, c.details);
        }
    }
}

fn mic_api_present() -> bool {
    use cpal::traits::HostTrait;
    cpal::default_host().default_input_device().is_some()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.to_config();

    if args.diagnostics {
        let checks = run_self_checks(Capabilities {
            render_context: pollster::block_on(probe_adapter()),
            mic_api: mic_api_present(),
        });
        for c in &checks {
            println!("{} {}: {}", if c.pass { "PASS" } else { "FAIL" }, c.name, c.details);
        }
        return Ok(());
    }

    let mut app = App::new(config);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Halo (native)")
        .build(&event_loop)?;

    let gpu = pollster::block_on(GpuState::new(&window, &app.scene));
    report(&run_self_checks(Capabilities {
        render_context: gpu.is_ok(),
        mic_api: mic_api_present(),
    }));
    let mut state = match gpu {
        Ok(s) => s,
        Err(e) => {
            log::error!("[gpu] rendering context unavailable: {e:?}");
            return Ok(());
        }
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let out = app.tick();
            match state.render(&out, &app.ring, &app.swarm) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.resize(state.window.inner_size())
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("[gpu] frame skipped: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}

async fn probe_adapter() -> bool {
    wgpu::Instance::default()
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .is_some()
}
