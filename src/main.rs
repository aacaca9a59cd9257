//! Endless Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use endless_runner::consts::FIRST_FRAME_DT;
    use endless_runner::renderer::{RenderState, Vertex, shapes};
    use endless_runner::sim::{Rect, SeededRng, UniformSource};
    use endless_runner::{Color, GameLoop, Host, Palette, Settings};

    /// Browser host: canvas rendering, DOM overlay, pointer state
    struct WebHost {
        render_state: Option<RenderState>,
        vertices: Vec<Vertex>,
        overlay: Vec<(String, Rect)>,
        palette: Palette,
        tile_height: f32,
        /// Canvas size in CSS pixels (game coordinates)
        width: u32,
        height: u32,
        dt: f32,
        pointer_down: bool,
        pointer_x: f32,
        clicked: bool,
        rng: SeededRng,
    }

    impl WebHost {
        fn new(settings: &Settings, seed: u64, width: u32, height: u32) -> Self {
            Self {
                render_state: None,
                vertices: Vec::new(),
                overlay: Vec::new(),
                palette: settings.palette,
                tile_height: settings.background_tile_height,
                width,
                height,
                dt: FIRST_FRAME_DT,
                pointer_down: false,
                pointer_x: 0.0,
                clicked: false,
                rng: SeededRng::new(seed),
            }
        }

        /// Start of a click/tap
        fn pointer_pressed(&mut self, x: f32) {
            self.pointer_down = true;
            self.pointer_x = x;
            self.clicked = true;
        }

        fn pointer_moved(&mut self, x: f32) {
            self.pointer_x = x;
        }

        fn pointer_released(&mut self) {
            self.pointer_down = false;
        }

        /// Submit the recorded geometry and sync the DOM overlay
        fn present(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            self.vertices.clear();
            self.update_overlay();
            self.overlay.clear();
        }

        /// Show/hide the game-over lines and position them in their boxes
        fn update_overlay(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("overlay") {
                let class = if self.overlay.is_empty() { "hidden" } else { "" };
                let _ = el.set_attribute("class", class);
            }

            for (i, (line, text_box)) in self.overlay.iter().enumerate() {
                let Some(el) = document
                    .get_element_by_id(&format!("overlay-line-{}", i))
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                el.set_text_content(Some(line));
                let style = el.style();
                let _ = style.set_property("left", &format!("{}px", text_box.x()));
                let _ = style.set_property("bottom", &format!("{}px", text_box.y()));
                let _ = style.set_property("width", &format!("{}px", text_box.width()));
                let _ = style.set_property("height", &format!("{}px", text_box.height()));
            }
        }
    }

    impl Host for WebHost {
        fn elapsed_seconds(&self) -> f32 {
            self.dt
        }

        fn screen_width(&self) -> u32 {
            self.width
        }

        fn screen_height(&self) -> u32 {
            self.height
        }

        fn is_pointer_down(&self) -> bool {
            self.pointer_down
        }

        fn pointer_x(&self) -> f32 {
            self.pointer_x
        }

        fn just_clicked(&self) -> bool {
            self.clicked
        }

        fn uniform_random(&mut self, min: f32, max: f32) -> f32 {
            self.rng.uniform(min, max)
        }

        fn draw_rect(&mut self, rect: Rect, color: Color) {
            self.vertices.extend(shapes::rect(&rect, color));
        }

        fn draw_scrolling_background(&mut self, offset1: f32, offset2: f32) {
            self.vertices.extend(shapes::scrolling_background(
                [offset1, offset2],
                self.width as f32,
                self.tile_height,
                self.palette.background,
            ));
        }

        fn draw_centered_text(&mut self, line: &str, text_box: Rect) {
            self.overlay.push((line.to_string(), text_box));
        }

        fn end_frame(&mut self) {
            self.clicked = false;
        }
    }

    /// Game instance holding all state
    struct Game {
        game: GameLoop,
        host: WebHost,
        settings: Settings,
        last_time: f64,
    }

    impl Game {
        /// Advance and draw one frame
        fn frame(&mut self, time: f64, canvas: &HtmlCanvasElement) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                FIRST_FRAME_DT
            };
            self.last_time = time;
            self.host.dt = self.settings.clamp_frame_dt(dt);

            self.sync_canvas_size(canvas);
            self.game.frame(&mut self.host);
            self.host.present();
        }

        /// Track CSS size changes (rotation, window resize)
        fn sync_canvas_size(&mut self, canvas: &HtmlCanvasElement) {
            let client_w = canvas.client_width().max(1) as u32;
            let client_h = canvas.client_height().max(1) as u32;
            if client_w == self.host.width && client_h == self.host.height {
                return;
            }

            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            self.host.width = client_w;
            self.host.height = client_h;
            if let Some(ref mut render_state) = self.host.render_state {
                render_state.resize(width, height, (client_w as f32, client_h as f32));
            }
            log::info!("Canvas resized to {}x{}", client_w, client_h);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();

        let settings = Settings::load();
        let level = settings
            .as_ref()
            .ok()
            .and_then(|s| s.log_level_filter().ok())
            .and_then(|l| l.to_level())
            .unwrap_or(log::Level::Info);
        console_log::init_with_level(level).expect("Failed to init logger");
        let settings = settings.unwrap_or_else(|e| {
            log::warn!("Ignoring settings: {}", e);
            Settings::default()
        });

        log::info!("Endless Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1) as u32;
        let client_h = canvas.client_height().max(1) as u32;
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (client_w as f32, client_h as f32),
            settings.palette.clear,
        )
        .await;

        let mut host = WebHost::new(&settings, seed, client_w, client_h);
        host.render_state = Some(render_state);

        let game = Rc::new(RefCell::new(Game {
            game: GameLoop::new(client_w, &settings),
            host,
            settings,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game, canvas);

        log::info!("Endless Runner running!");
    }

    /// Pointer X in canvas CSS pixels for a touch event
    fn touch_x(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<f32> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(touch.client_x() as f32 - rect.left() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - click edge plus pointer position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .host
                    .pointer_pressed(event.offset_x() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - only matters while the button is held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().host.pointer_moved(event.offset_x() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().host.pointer_released();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (tap)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    game.borrow_mut().host.pointer_pressed(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    game.borrow_mut().host.pointer_moved(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel - released once no fingers remain
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().host.pointer_released();
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, time: f64) {
        game.borrow_mut().frame(time, &canvas);
        request_animation_frame(game, canvas);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use endless_runner::Settings;
    use endless_runner::headless::run_autopilot;

    let settings = Settings::load();
    let level = settings
        .as_ref()
        .ok()
        .and_then(|s| s.log_level_filter().ok())
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    let settings = settings.unwrap_or_else(|e| {
        log::warn!("Ignoring settings: {}", e);
        Settings::default()
    });

    log::info!("Endless Runner (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let seed = settings.seed_or(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    );
    log::info!("Running headless autopilot session with seed: {}", seed);

    // Two minutes at 60 Hz on a phone-sized portrait screen
    let summary = run_autopilot(&settings, seed, 720, 1280, 1.0 / 60.0, 120 * 60);
    match serde_json::to_string(&summary) {
        Ok(json) => log::info!("Session summary: {}", json),
        Err(e) => log::warn!("Could not encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
