//! Birthday Bash entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, PointerEvent};

    use birthday_bash::audio::WebAudio;
    use birthday_bash::platform::{BrowserClock, Clock};
    use birthday_bash::sim::Viewport;
    use birthday_bash::ui::{self, Press, markup};
    use birthday_bash::{Action, ActiveStage, Experience, Settings};

    /// App instance holding all state
    struct App {
        experience: Experience<WebAudio>,
        clock: BrowserClock,
        root: Element,
        rendered_revision: Option<u64>,
        canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
        /// Active drag and the page offset its points are relative to
        press: Option<(Press, Vec2)>,
        last_pointer: Vec2,
        /// The current press moved far enough to not count as a click
        suppress_click: bool,
    }

    impl App {
        fn dispatch(&mut self, action: Action) {
            let now = self.clock.now_ms();
            self.experience.handle(action, now);
        }

        /// Rebuild stage markup if needed, then apply per-frame updates
        fn render(&mut self) {
            let revision = self.experience.revision();
            if self.rendered_revision != Some(revision) {
                self.root.set_inner_html(&markup::render(&self.experience));
                self.rendered_revision = Some(revision);
                self.canvas = find_canvas();
            }

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                for (id, style) in markup::live_styles(&self.experience) {
                    if let Some(el) = document.get_element_by_id(id) {
                        let _ = el.set_attribute("style", &style);
                    }
                }
            }

            if let (ActiveStage::Room(room), Some((canvas, ctx))) =
                (self.experience.active(), &self.canvas)
            {
                let result = ui::canvas::draw_room(
                    ctx,
                    canvas.width() as f64,
                    canvas.height() as f64,
                    room.balloons(),
                    room.pops(),
                );
                if let Err(e) = result {
                    log::error!("Canvas draw failed: {:?}", e);
                }
            }
        }

        fn frame(&mut self) {
            let now = self.clock.now_ms();
            self.experience.frame(now);
            self.render();
        }
    }

    fn find_canvas() -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas: HtmlCanvasElement = web_sys::window()?
            .document()?
            .get_element_by_id(markup::ROOM_CANVAS_ID)?
            .dyn_into()
            .ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some((canvas, ctx))
    }

    fn viewport() -> Viewport {
        let window = web_sys::window().expect("no window");
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        Viewport::new(width as f32, height as f32)
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }

    /// Pointer position relative to an element's top-left corner
    fn local_point(el: &Element, event: &MouseEvent) -> (Vec2, Vec2) {
        let rect = el.get_bounding_client_rect();
        let offset = Vec2::new(rect.left() as f32, rect.top() as f32);
        let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        (client - offset, offset)
    }

    /// Closest ancestor (or self) of the event target carrying `attr`
    fn target_with(event: &web_sys::Event, attr: &str) -> Option<(Element, String)> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let el = target.closest(&format!("[{}]", attr)).ok()??;
        let value = el.get_attribute(attr)?;
        Some((el, value))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Birthday Bash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let root = document.get_element_by_id("app").expect("no #app element");

        let mut settings = Settings::load();
        if prefers_reduced_motion() {
            settings.reduced_motion = true;
        }

        let clock = BrowserClock::new();
        let seed = js_sys::Date::now() as u64;
        let experience = Experience::new(settings, WebAudio::new(), viewport(), seed, clock.now_ms());
        log::info!("Experience initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            experience,
            clock,
            root: root.clone(),
            rendered_revision: None,
            canvas: None,
            press: None,
            last_pointer: Vec2::ZERO,
            suppress_click: false,
        }));

        setup_input_handlers(&root, app.clone());
        setup_resize(app.clone());

        app.borrow_mut().render();
        request_animation_frame(app);

        log::info!("Birthday Bash running!");
    }

    fn setup_input_handlers(root: &Element, app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Clicks, delegated through data-action
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some((el, name)) = target_with(&event, "data-action") else {
                    return;
                };
                let mut a = app.borrow_mut();
                if std::mem::take(&mut a.suppress_click) {
                    return;
                }
                let (point, _) = local_point(&el, &event);
                let arg = el.get_attribute("data-arg");
                if let Some(action) = ui::click_action(&name, arg.as_deref(), point) {
                    a.dispatch(action);
                }
            });
            let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Press starts a drag on data-press elements
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let Some((el, name)) = target_with(&event, "data-press") else {
                    return;
                };
                let (point, offset) = local_point(&el, &event);
                let Some(press) = Press::from_name(&name, point) else {
                    return;
                };
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.press = Some((press, offset));
                a.last_pointer = point;
                a.suppress_click = false;
                if let Some(action) = press.begin() {
                    a.dispatch(action);
                }
            });
            let _ = root
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Moves and releases are tracked on the window so a drag survives leaving the element
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                let Some((press, offset)) = a.press else {
                    return;
                };
                let point = Vec2::new(event.client_x() as f32, event.client_y() as f32) - offset;
                if point.distance(press.origin()) > ui::CLICK_SLOP {
                    a.suppress_click = true;
                }
                let action = press.moved(point, a.last_pointer);
                a.last_pointer = point;
                a.dispatch(action);
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["pointerup", "pointercancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut a = app.borrow_mut();
                if let Some((press, _)) = a.press.take() {
                    if let Some(action) = press.end() {
                        a.dispatch(action);
                    }
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            a.experience.set_viewport(viewport());
            // Canvas dimensions are part of the markup
            a.rendered_revision = None;
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Birthday Bash (native) starting...");
    log::info!("Native mode runs a headless walkthrough - build for wasm32 for the real thing");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = birthday_bash::Settings::load(path.as_deref());

    match walkthrough::run(settings) {
        Ok(()) => println!("✓ Walkthrough reached the final message"),
        Err(e) => {
            log::error!("Walkthrough failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted pass through every stage on a virtual clock
#[cfg(not(target_arch = "wasm32"))]
mod walkthrough {
    use glam::Vec2;

    use birthday_bash::audio::SilentBackend;
    use birthday_bash::platform::{Clock, ManualClock};
    use birthday_bash::sim::{FinalePhase, Stage, Viewport};
    use birthday_bash::{Action, ActiveStage, Experience, Settings};

    /// One display frame at 60 Hz
    const FRAME_MS: f64 = 16.0;
    /// Give up on any single wait after this long (virtual time)
    const WAIT_LIMIT_MS: f64 = 120_000.0;

    struct Run {
        exp: Experience<SilentBackend>,
        clock: ManualClock,
    }

    impl Run {
        fn act(&mut self, action: Action) {
            let now = self.clock.advance(FRAME_MS);
            self.exp.handle(action, now);
            self.exp.frame(now);
        }

        fn wait_until(
            &mut self,
            what: &str,
            done: impl Fn(&Experience<SilentBackend>) -> bool,
        ) -> Result<(), String> {
            let deadline = self.clock.now_ms() + WAIT_LIMIT_MS;
            while !done(&self.exp) {
                if self.clock.now_ms() > deadline {
                    return Err(format!("timed out waiting for {what}"));
                }
                let now = self.clock.advance(FRAME_MS);
                self.exp.frame(now);
            }
            log::info!("{} at {:.0} ms", what, self.clock.now_ms());
            Ok(())
        }
    }

    pub fn run(settings: Settings) -> Result<(), String> {
        let clock = ManualClock::new(0.0);
        let exp = Experience::new(settings, SilentBackend::new(), Viewport::default(), 7, 0.0);
        let mut run = Run { exp, clock };

        // Intro
        run.wait_until("choice buttons", |e| {
            matches!(e.active(), ActiveStage::Intro(i) if i.buttons_visible())
        })?;
        run.act(Action::ShowSongCard);
        run.act(Action::ToggleSong);
        run.wait_until("balloon room", |e| e.stage() == Stage::BalloonGame)?;

        // Balloon room: pop whatever is on screen until the reward shows
        let deadline = run.clock.now_ms() + WAIT_LIMIT_MS;
        loop {
            let (reward, target) = match run.exp.active() {
                ActiveStage::Room(room) => {
                    (room.reward_visible(), room.balloons().first().map(|b| b.id))
                }
                _ => return Err("left the balloon room early".to_string()),
            };
            if reward {
                break;
            }
            if run.clock.now_ms() > deadline {
                return Err("timed out popping balloons".to_string());
            }
            match target {
                Some(id) => run.act(Action::PopBalloon(id)),
                None => run.act(Action::PressRoom(Vec2::ZERO)),
            }
        }
        run.act(Action::ContinueRoom);

        // Cake
        for i in 0..birthday_bash::consts::CANDLE_COUNT {
            run.act(Action::LightCandle(i));
        }
        run.act(Action::TapCake(Vec2::new(50.0, 50.0)));
        run.act(Action::PointerDown(Vec2::new(400.0, 200.0)));
        run.act(Action::PointerMove(Vec2::new(400.0, 320.0)));
        run.act(Action::PointerMove(Vec2::new(400.0, 460.0)));
        run.act(Action::PointerUp);
        run.wait_until("gallery", |e| e.stage() == Stage::Gallery)?;

        // Gallery
        run.act(Action::ProceedTimeline);
        run.act(Action::FlipPhoto);
        run.act(Action::PlaySong(0));
        run.act(Action::ContinueGallery);

        // Finale
        if run.exp.stage() != Stage::FinalMessage {
            return Err("gallery did not complete".to_string());
        }
        let postcards = run.exp.settings().content.postcards.len();
        for i in 0..postcards {
            run.act(Action::FlipPostcard(i));
        }
        run.act(Action::OpenHeartGame);
        run.act(Action::DragHeart(Vec2::new(40.0, -25.0)));
        run.act(Action::CatchHeart);

        match run.exp.active() {
            ActiveStage::Finale(f) if f.phase() == FinalePhase::Final => Ok(()),
            _ => Err("heart was not caught".to_string()),
        }
    }
}
