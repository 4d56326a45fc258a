//! SDL2 window, input, and frame timing for the interactive viewer.
//!
//! None of this is needed by the renderer itself. The window presents the
//! engine's ARGB8888 buffer through a streaming texture, and [`InputState`]
//! turns key and mouse events into an [`Intent`].

use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::motion::Intent;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

const TURN_SPEED: f32 = 1.0;
const MOVE_SPEED: f32 = 3.0;
const LIFT_SPEED: f32 = 2.0;
const FPS_REPORT_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
    Input,
    /// The window contents were lost (uncovered, restored) and need repainting.
    Redraw,
}

impl WindowEvent {
    fn priority(self) -> u8 {
        match self {
            WindowEvent::None => 0,
            WindowEvent::Redraw => 1,
            WindowEvent::Input => 2,
            WindowEvent::Resize(..) => 3,
            WindowEvent::Quit => 4,
        }
    }

    /// Combine two events of one poll, keeping the one that matters more.
    /// Later resizes replace earlier ones.
    pub fn merge(self, next: WindowEvent) -> WindowEvent {
        if next.priority() >= self.priority() {
            next
        } else {
            self
        }
    }
}

/// Translate one SDL event, updating `input` for key and mouse events.
pub fn translate_event(event: Event, input: &mut InputState) -> WindowEvent {
    match event {
        Event::Quit { .. }
        | Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => WindowEvent::Quit,
        Event::Window { win_event, .. } => match win_event {
            sdl2::event::WindowEvent::Resized(w, h) => {
                WindowEvent::Resize(w.max(0) as u32, h.max(0) as u32)
            }
            sdl2::event::WindowEvent::Exposed | sdl2::event::WindowEvent::Restored => {
                WindowEvent::Redraw
            }
            _ => WindowEvent::None,
        },
        Event::KeyDown {
            keycode: Some(key), ..
        } if input.set_key(key, true) => WindowEvent::Input,
        Event::KeyUp {
            keycode: Some(key), ..
        } if input.set_key(key, false) => WindowEvent::Input,
        Event::MouseButtonDown {
            mouse_btn: MouseButton::Left,
            x,
            y,
            ..
        } => {
            input.start_drag(x, y);
            WindowEvent::Input
        }
        Event::MouseButtonUp {
            mouse_btn: MouseButton::Left,
            ..
        } => {
            input.end_drag();
            WindowEvent::Input
        }
        Event::MouseMotion { x, y, .. } if input.drag_origin.is_some() => {
            input.drag_position = (x, y);
            WindowEvent::Input
        }
        _ => WindowEvent::None,
    }
}

/// Held keys and mouse drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub back: bool,
    pub lift: bool,
    pub sink: bool,
    pub look_up: bool,
    pub look_down: bool,
    /// Position where the current mouse drag started.
    pub drag_origin: Option<(i32, i32)>,
    pub drag_position: (i32, i32),
}

impl InputState {
    /// Update key state. Returns false for keys with no binding.
    pub fn set_key(&mut self, keycode: Keycode, pressed: bool) -> bool {
        let slot = match keycode {
            Keycode::Left | Keycode::A => &mut self.turn_left,
            Keycode::Right | Keycode::D => &mut self.turn_right,
            Keycode::Up | Keycode::W => &mut self.forward,
            Keycode::Down | Keycode::S => &mut self.back,
            Keycode::R => &mut self.lift,
            Keycode::F => &mut self.sink,
            Keycode::E => &mut self.look_up,
            Keycode::Q => &mut self.look_down,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn start_drag(&mut self, x: i32, y: i32) {
        self.drag_origin = Some((x, y));
        self.drag_position = (x, y);
    }

    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    /// Build the frame intent. Keys win over the mouse on each axis.
    ///
    /// A mouse drag flies forward, turns by horizontal drag distance, and
    /// climbs by vertical drag distance, both relative to the surface size.
    pub fn intent(&self, surface_width: u32, surface_height: u32) -> Intent {
        let axis = |pos: bool, neg: bool, speed: f32| match (pos, neg) {
            (true, false) => speed,
            (false, true) => -speed,
            _ => 0.0,
        };

        let mut intent = Intent {
            strafe_turn: axis(self.turn_left, self.turn_right, TURN_SPEED),
            move_axis: axis(self.forward, self.back, MOVE_SPEED),
            lift_axis: axis(self.lift, self.sink, LIFT_SPEED),
            pitch_up: self.look_up,
            pitch_down: self.look_down,
        };

        if let Some((ox, oy)) = self.drag_origin {
            let (x, y) = self.drag_position;
            if intent.move_axis == 0.0 {
                intent.move_axis = MOVE_SPEED;
            }
            if intent.strafe_turn == 0.0 {
                intent.strafe_turn = (ox - x) as f32 / surface_width.max(1) as f32 * 2.0;
            }
            if intent.lift_axis == 0.0 {
                intent.lift_axis = (oy - y) as f32 / surface_height.max(1) as f32 * 10.0;
            }
        }

        intent
    }
}

/// Milliseconds elapsed between frames.
pub struct FrameClock {
    previous_frame_time: u64,
}

impl FrameClock {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Forget idle time so the next delta starts from now.
    pub fn restart(&mut self, window: &Window) {
        self.previous_frame_time = window.timer().ticks64();
    }

    /// Returns the time elapsed since the last call in milliseconds.
    pub fn delta_ms(&mut self, window: &Window) -> f32 {
        let current_time = window.timer().ticks64();
        let delta_time = current_time.saturating_sub(self.previous_frame_time);
        self.previous_frame_time = current_time;
        delta_time as f32
    }
}

/// Counts presented frames and logs the rate periodically.
pub struct FpsCounter {
    frames: u32,
    window_start: u64,
}

impl FpsCounter {
    pub fn new(now_ms: u64) -> Self {
        Self {
            frames: 0,
            window_start: now_ms,
        }
    }

    /// Record a frame. Returns the new rate when a report interval has passed.
    pub fn frame(&mut self, now_ms: u64) -> Option<f32> {
        self.frames += 1;
        let elapsed = now_ms.saturating_sub(self.window_start);
        if elapsed < FPS_REPORT_INTERVAL_MS {
            return None;
        }
        let fps = self.frames as f32 * 1000.0 / elapsed as f32;
        self.frames = 0;
        self.window_start = now_ms;
        info!("{fps:.1} fps");
        Some(fps)
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    /// Drain pending events into `input`.
    ///
    /// With `wait` set, blocks until at least one event arrives. The summary
    /// ranks quit over resize over input over redraw.
    pub fn poll_events(&mut self, input: &mut InputState, wait: bool) -> WindowEvent {
        let first = if wait {
            Some(self.event_pump.wait_event())
        } else {
            None
        };
        let events: Vec<Event> = first
            .into_iter()
            .chain(self.event_pump.poll_iter())
            .collect();

        let mut summary = WindowEvent::None;
        for event in events {
            summary = summary.merge(translate_event(event, input));
            if summary == WindowEvent::Quit {
                break;
            }
        }
        summary
    }

    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        if width == 0 || height == 0 {
            return Ok(());
        }
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(err) = self.canvas.window_mut().set_title(title) {
            warn!("failed to set window title: {err}");
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
