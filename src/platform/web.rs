//! Browser wiring: frame driver, pointer events, timers and DOM nodes
//!
//! Every registration is owned by a handle that unregisters on drop, so
//! dropping a [`Page`] stops all animation before anything else is touched.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::{FrameClock, canvas_pixel_size, css_particle_style, cursor_css_transform};
use crate::consts::CURSOR_HOVER_SELECTOR;
use crate::display_mode::{DisplayModeGuard, PageStyle};
use crate::error::InitError;
use crate::renderer::StarRenderer;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{
    CssSpawner, CursorState, ParticleId, ParticleScene, SceneConfig, SceneRng, Viewport,
    entropy_seed, seeded,
};

/// Hero canvas (required); its `data-settings` attribute holds the settings JSON
pub const HERO_CANVAS_ID: &str = "hero-canvas";
/// Section backdrops (zero or more)
pub const SUBTLE_CANVAS_SELECTOR: &str = "canvas.subtle-stars";
/// Container for CSS shooting stars (optional)
pub const CSS_STARS_ID: &str = "css-stars";
pub const CSS_STAR_CLASS: &str = "css-star";
/// Custom cursor dot (optional)
pub const CURSOR_ID: &str = "custom-cursor";

fn window() -> Result<Window, InitError> {
    web_sys::window().ok_or(InitError::NoWindow)
}

/// Seconds on the page's monotonic clock
fn now_seconds(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now() / 1000.0)
        .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
}

fn viewport(window: &Window) -> Viewport {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width as f32, height as f32)
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

/// Settings from the element's `data-settings` attribute, else defaults.
/// A `data-quality` attribute overrides the preset.
pub fn read_settings(element: &Element) -> Settings {
    let mut settings = match element.get_attribute("data-settings") {
        Some(json) => Settings::from_json_or_default(&json),
        None => Settings::default(),
    };
    if let Some(quality) = element.get_attribute("data-quality") {
        match QualityPreset::from_str(&quality) {
            Some(preset) => settings.quality = preset,
            None => log::warn!("Unknown quality preset {:?}", quality),
        }
    }
    settings
}

fn canvas_by_id(document: &Document, id: &str) -> Result<HtmlCanvasElement, InitError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| InitError::MissingElement(format!("#{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| InitError::NotACanvas(format!("#{id}")))
}

fn canvases_by_selector(document: &Document, selector: &str) -> Result<Vec<HtmlCanvasElement>, InitError> {
    let nodes = document.query_selector_all(selector)?;
    let mut canvases = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            match node.dyn_into::<HtmlCanvasElement>() {
                Ok(canvas) => canvases.push(canvas),
                Err(_) => log::warn!("{} matched a non-canvas element", selector),
            }
        }
    }
    Ok(canvases)
}

// ============================================================================
// Display mode
// ============================================================================

/// Body and root element inline styles
pub struct WebPageStyle {
    body: Option<HtmlElement>,
    root: Option<HtmlElement>,
}

impl WebPageStyle {
    pub fn new(document: &Document) -> Self {
        Self {
            body: document.body(),
            root: document
                .document_element()
                .and_then(|e| e.dyn_into::<HtmlElement>().ok()),
        }
    }
}

fn set_style(element: Option<&HtmlElement>, property: &str, value: &str) {
    let Some(element) = element else {
        return;
    };
    let style = element.style();
    let result = if value.is_empty() {
        style.remove_property(property).map(|_| ())
    } else {
        style.set_property(property, value)
    };
    if let Err(e) = result {
        log::warn!("Failed to set {}: {:?}", property, e);
    }
}

impl PageStyle for WebPageStyle {
    fn set_body_cursor(&mut self, value: &str) {
        set_style(self.body.as_ref(), "cursor", value);
    }

    fn set_scroll_behavior(&mut self, value: &str) {
        set_style(self.root.as_ref(), "scroll-behavior", value);
    }
}

// ============================================================================
// Registrations
// ============================================================================

/// DOM event listener, removed on drop
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        mut handler: impl FnMut(&web_sys::Event) + 'static,
    ) -> Result<Self, InitError> {
        let callback = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| handler(&event));
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// `setInterval` registration, cleared on drop
pub struct Interval {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(window: &Window, period_ms: i32, handler: impl FnMut() + 'static) -> Result<Self, InitError> {
        let callback = Closure::<dyn FnMut()>::new(handler);
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            window: window.clone(),
            handle,
            _callback: callback,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` loop, cancelled on drop
pub struct FrameLoop {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    pub fn start(window: &Window, mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, InitError> {
        let handle = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        // Weak so the closure does not keep itself alive
        let next: Weak<RefCell<Option<FrameCallback>>> = Rc::downgrade(&callback);
        let next_handle = handle.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            on_frame(time);
            let Some(callback) = next.upgrade() else {
                return;
            };
            if let Some(cb) = callback.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            handle.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }

        Ok(Self {
            window: window.clone(),
            handle,
            callback,
        })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

// ============================================================================
// Star layers (one per canvas)
// ============================================================================

/// A particle scene bound to its canvas and GPU surface
pub struct StarLayer {
    canvas: HtmlCanvasElement,
    scene: ParticleScene,
    renderer: StarRenderer,
}

impl StarLayer {
    async fn new(
        instance: &wgpu::Instance,
        adapter: &wgpu::Adapter,
        canvas: HtmlCanvasElement,
        surface: Option<wgpu::Surface<'static>>,
        scene: ParticleScene,
        dpr: f64,
    ) -> Result<Self, InitError> {
        let (width, height) = canvas_pixel_size(canvas.client_width(), canvas.client_height(), dpr);
        canvas.set_width(width);
        canvas.set_height(height);

        let surface = match surface {
            Some(surface) => surface,
            None => instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?,
        };
        let renderer = StarRenderer::new(surface, adapter, width, height).await?;
        Ok(Self {
            canvas,
            scene,
            renderer,
        })
    }

    fn frame(&mut self, dt: f32) {
        self.scene.tick(dt);
        self.renderer.render_or_recover(&self.scene.frame());
    }

    fn fit_to_canvas(&mut self, dpr: f64) {
        let (width, height) =
            canvas_pixel_size(self.canvas.client_width(), self.canvas.client_height(), dpr);
        if (width, height) != self.renderer.size {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.renderer.resize(width, height);
        }
    }
}

// ============================================================================
// CSS shooting stars
// ============================================================================

struct CssStarState {
    window: Window,
    document: Document,
    container: Element,
    spawner: CssSpawner<SceneRng>,
    /// Live DOM node and its removal timeout, per particle
    nodes: HashMap<ParticleId, (Element, i32)>,
}

impl CssStarState {
    fn spawn(state: &Rc<RefCell<Self>>) {
        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        let now = now_seconds(&st.window);
        let particle = st.spawner.spawn(now);

        let node = match st.document.create_element("div") {
            Ok(node) => node,
            Err(e) => {
                log::warn!("Failed to create CSS star: {:?}", e);
                st.spawner.expire(particle.id);
                return;
            }
        };
        node.set_class_name(CSS_STAR_CLASS);
        let _ = node.set_attribute("style", &css_particle_style(&particle));
        if let Err(e) = st.container.append_child(&node) {
            log::warn!("Failed to attach CSS star: {:?}", e);
            st.spawner.expire(particle.id);
            return;
        }

        // Each particle schedules its own removal
        let weak = Rc::downgrade(state);
        let id = particle.id;
        let remove = Closure::once_into_js(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().expire(id);
            }
        });
        let timeout_ms = (particle.lifetime * 1000.0).round() as i32;
        match st
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), timeout_ms)
        {
            Ok(handle) => {
                st.nodes.insert(id, (node, handle));
            }
            Err(e) => {
                log::warn!("Failed to schedule CSS star removal: {:?}", e);
                node.remove();
                st.spawner.expire(id);
            }
        }
    }

    fn expire(&mut self, id: ParticleId) {
        self.spawner.expire(id);
        if let Some((node, _)) = self.nodes.remove(&id) {
            node.remove();
        }
    }
}

/// Timer-driven CSS star emitter, independent of the frame loop
pub struct CssStarLayer {
    _interval: Interval,
    state: Rc<RefCell<CssStarState>>,
}

impl CssStarLayer {
    fn start(
        window: &Window,
        document: &Document,
        container: Element,
        settings: &Settings,
        rng: SceneRng,
    ) -> Result<Self, InitError> {
        let config = settings.spawner_config();
        let state = Rc::new(RefCell::new(CssStarState {
            window: window.clone(),
            document: document.clone(),
            container,
            spawner: CssSpawner::new(config, rng, now_seconds(window)),
            nodes: HashMap::new(),
        }));

        let tick_state = state.clone();
        let interval = Interval::new(window, (config.period * 1000.0).round() as i32, move || {
            CssStarState::spawn(&tick_state);
        })?;
        log::info!(
            "CSS stars every {}s, at most {} on screen",
            config.period,
            config.max_active()
        );

        Ok(Self {
            _interval: interval,
            state,
        })
    }
}

impl Drop for CssStarLayer {
    fn drop(&mut self) {
        let mut guard = self.state.borrow_mut();
        let st = &mut *guard;
        for (_, (node, handle)) in st.nodes.drain() {
            st.window.clear_timeout_with_handle(handle);
            node.remove();
        }
        st.spawner.clear();
    }
}

// ============================================================================
// Page
// ============================================================================

/// Everything mounted on the page. Dropping it unmounts.
pub struct Page {
    // Fields drop in order: stop the frame driver and timers first
    _frame_loop: FrameLoop,
    _listeners: Vec<EventListener>,
    _css_stars: Option<CssStarLayer>,
    _layers: Rc<RefCell<Vec<StarLayer>>>,
    _display: DisplayModeGuard<WebPageStyle>,
}

impl Page {
    pub async fn mount() -> Result<Self, InitError> {
        let window = window()?;
        let document = window.document().ok_or(InitError::NoDocument)?;

        let hero_canvas = canvas_by_id(&document, HERO_CANVAS_ID)?;
        let mut settings = read_settings(&hero_canvas);
        if prefers_reduced_motion(&window) {
            settings.reduced_motion = true;
        }

        let cursor_element = if settings.custom_cursor {
            document
                .get_element_by_id(CURSOR_ID)
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        } else {
            None
        };
        // Released by drop on every exit path below
        let display = DisplayModeGuard::acquire(WebPageStyle::new(&document), cursor_element.is_some());

        let seed = entropy_seed();
        let mut rng = seeded(seed);
        log::info!(
            "Mounting with seed {} ({} quality, {} hero stars, {} shooting stars)",
            seed,
            settings.quality.as_str(),
            settings.effective_hero_star_count(),
            settings.effective_shooting_stars()
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let hero_surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(hero_canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&hero_surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let dpr = window.device_pixel_ratio();
        let mut layers = Vec::new();
        let hero_scene = ParticleScene::new(SceneConfig::hero_from_settings(&settings), &mut rng);
        layers.push(StarLayer::new(&instance, &adapter, hero_canvas, Some(hero_surface), hero_scene, dpr).await?);
        for canvas in canvases_by_selector(&document, SUBTLE_CANVAS_SELECTOR)? {
            let scene = ParticleScene::new(SceneConfig::subtle_from_settings(&settings), &mut rng);
            layers.push(StarLayer::new(&instance, &adapter, canvas, None, scene, dpr).await?);
        }
        log::info!("{} star layers mounted", layers.len());
        let layers = Rc::new(RefCell::new(layers));

        let mut listeners = Vec::new();
        let cursor = Rc::new(RefCell::new(CursorState::default()));

        // Pointer: field tilt and cursor position
        {
            let layers = layers.clone();
            let cursor = cursor.clone();
            let cursor_element = cursor_element.clone();
            let win = window.clone();
            listeners.push(EventListener::new(&document, "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = (event.client_x() as f32, event.client_y() as f32);
                let vp = viewport(&win);
                for layer in layers.borrow_mut().iter_mut() {
                    layer.scene.on_pointer_move(x, y, vp);
                }
                if let Some(el) = &cursor_element {
                    let mut state = cursor.borrow_mut();
                    state.on_move(x, y);
                    set_style(Some(el), "transform", &cursor_css_transform(state.transform()));
                }
            })?);
        }

        if let Some(el) = cursor_element {
            {
                let cursor = cursor.clone();
                let el = el.clone();
                listeners.push(EventListener::new(&document, "mouseover", move |event| {
                    let interactive = event
                        .target()
                        .and_then(|t| t.dyn_into::<Element>().ok())
                        .map(|t| t.matches(CURSOR_HOVER_SELECTOR).unwrap_or(false))
                        .unwrap_or(false);
                    let mut state = cursor.borrow_mut();
                    state.on_over(interactive);
                    set_style(Some(&el), "transform", &cursor_css_transform(state.transform()));
                })?);
            }
            listeners.push(EventListener::new(&document, "mouseout", move |_| {
                let mut state = cursor.borrow_mut();
                state.on_out();
                set_style(Some(&el), "transform", &cursor_css_transform(state.transform()));
            })?);
        }

        {
            let layers = layers.clone();
            let win = window.clone();
            listeners.push(EventListener::new(&window, "resize", move |_| {
                let dpr = win.device_pixel_ratio();
                for layer in layers.borrow_mut().iter_mut() {
                    layer.fit_to_canvas(dpr);
                }
            })?);
        }

        let css_stars = match document.get_element_by_id(CSS_STARS_ID) {
            Some(container) if settings.css_stars_enabled() => Some(CssStarLayer::start(
                &window,
                &document,
                container,
                &settings,
                seeded(seed.wrapping_add(1)),
            )?),
            Some(_) => {
                log::info!("CSS stars disabled");
                None
            }
            None => None,
        };

        let frame_loop = {
            let layers = layers.clone();
            let mut clock = FrameClock::new();
            FrameLoop::start(&window, move |time| {
                let dt = clock.delta(time);
                for layer in layers.borrow_mut().iter_mut() {
                    layer.frame(dt);
                }
            })?
        };

        Ok(Self {
            _frame_loop: frame_loop,
            _listeners: listeners,
            _css_stars: css_stars,
            _layers: layers,
            _display: display,
        })
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        log::info!("Unmounting");
    }
}
