//! DOM presenter for the signal board.
//!
//! Builds the board markup once, forwards clicks and key presses to the game
//! as [`Intent`]s and redraws from [`Snapshot`]s. Time is driven by a
//! `requestAnimationFrame` loop calling [`Game::tick`].

mod console;
mod feedback;

pub use console::init as init_logging;
pub use feedback::WebFeedback;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::error::{Error, Result};
use crate::game::{Game, Intent, PhaseKind, Snapshot};
use crate::signal::{RngSignals, Signal};

type WebGame = Game<WebFeedback, RngSignals<StdRng>>;

const STYLES: &str = "
#sd-app { font-family: 'Fira Code', monospace; color: #e8e8ff; background: #0b0b1e; max-width: 520px; margin: 24px auto; padding: 18px 22px; border-radius: 18px; box-shadow: 0 0 32px 0 rgba(80,80,255,0.25); text-align: center; }
#sd-app [hidden] { display: none !important; }
.sd-scores { display: flex; justify-content: space-around; margin-bottom: 12px; }
.sd-scores span { display: block; font-size: 22px; color: #ffd166; }
.sd-signals { display: grid; grid-template-columns: 1fr 1fr; gap: 14px; margin: 18px 0; }
.sd-signal { height: 110px; border: none; border-radius: 16px; opacity: 0.55; cursor: pointer; transition: opacity 0.12s, transform 0.12s; }
.sd-signal.flash { opacity: 1; transform: scale(1.05); box-shadow: 0 0 24px 4px rgba(255,255,255,0.55); }
.sd-signal:disabled { cursor: not-allowed; }
.sd-difficulty button { margin: 4px; padding: 8px 16px; border: none; border-radius: 6px; color: #fff; font-weight: bold; cursor: pointer; }
.sd-difficulty button.selected { outline: 3px solid #fff; }
.sd-controls button { margin: 4px; padding: 8px 18px; border-radius: 6px; border: 1px solid #333; background: #222244; color: #fff; cursor: pointer; }
.sd-progress { height: 8px; background: #222; border-radius: 4px; overflow: hidden; margin-top: 10px; }
.sd-progress-fill { height: 100%; background: #66d9ef; transition: width 0.15s; }
#sd-celebration { font-size: 26px; color: #ffd166; margin: 8px 0; }
";

/// Handles to every element the renderer touches.
struct View {
    score: Element,
    high_score: Element,
    streak: Element,
    message: Element,
    level_info: Element,
    difficulty_panel: Element,
    difficulty_buttons: Vec<(Difficulty, Element)>,
    signal_buttons: Vec<(Signal, Element)>,
    start: Element,
    pause: Element,
    reset: Element,
    progress: Element,
    progress_fill: Element,
    progress_text: Element,
    celebration: Element,
}

struct App {
    game: WebGame,
    view: View,
    last_drawn: Option<Snapshot>,
}

impl App {
    fn redraw(&mut self) {
        let snap = self.game.snapshot();
        if self.last_drawn.as_ref() != Some(&snap) {
            self.view.render(&snap);
            self.last_drawn = Some(snap);
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Build the board inside `<body>` and start the frame loop. Mounting twice is a no-op.
pub fn mount(config: GameConfig) -> Result<()> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or(Error::NoWindow)?;
    let doc = win.document().ok_or(Error::NoDocument)?;

    install_styles(&doc)?;
    let view = build_view(&doc)?;
    wire_listeners(&doc, &view)?;

    let feedback = WebFeedback::new(config.storage_key.clone());
    let game = Game::with_config(config, feedback, RngSignals::new(StdRng::from_entropy()));
    let mut app = App {
        game,
        view,
        last_drawn: None,
    };
    app.redraw();
    APP.with(|cell| cell.replace(Some(app)));

    start_frame_loop();
    log::info!("signal board mounted");
    Ok(())
}

/// Route an intent to the mounted game and redraw.
pub fn dispatch_intent(intent: Intent) -> Result<()> {
    let now = crate::performance_now();
    APP.with(|cell| match cell.borrow_mut().as_mut() {
        Some(app) => {
            app.game.dispatch(intent, now);
            app.redraw();
            Ok(())
        }
        None => Err(Error::NotMounted),
    })
}

pub fn snapshot() -> Option<Snapshot> {
    APP.with(|cell| cell.borrow().as_ref().map(|app| app.game.snapshot()))
}

/// Keyboard shortcuts: `1`-`4` press signals, space pauses, enter starts a game.
fn key_intent(key: &str, game_active: bool) -> Option<Intent> {
    match key {
        "1" | "2" | "3" | "4" => key
            .parse::<usize>()
            .ok()
            .and_then(|n| Signal::ALL.get(n - 1))
            .map(|&signal| Intent::ClickSignal(signal)),
        " " => Some(Intent::TogglePause),
        "Enter" if !game_active => Some(Intent::Start),
        _ => None,
    }
}

fn install_styles(doc: &Document) -> Result<()> {
    if doc.get_element_by_id("sd-styles").is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id("sd-styles");
    style.set_text_content(Some(STYLES));
    match doc.head() {
        Some(head) => head.append_child(&style)?,
        None => doc.body().ok_or(Error::NoDocument)?.append_child(&style)?,
    };
    Ok(())
}

fn child(
    doc: &Document,
    parent: &Element,
    tag: &str,
    id: Option<&str>,
    class: &str,
) -> Result<Element> {
    let el = doc.create_element(tag)?;
    if let Some(id) = id {
        el.set_id(id);
    }
    if !class.is_empty() {
        el.set_class_name(class);
    }
    parent.append_child(&el)?;
    Ok(el)
}

fn build_view(doc: &Document) -> Result<View> {
    let body = doc.body().ok_or(Error::NoDocument)?;
    // Reuse a host element if the page provides one.
    let root = match doc.get_element_by_id("sd-app") {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id("sd-app");
            body.append_child(&el)?;
            el
        }
    };

    let celebration = child(doc, &root, "div", Some("sd-celebration"), "")?;
    celebration.set_text_content(Some("Milestone reached!"));
    child(doc, &root, "h1", None, "")?.set_text_content(Some("Alien Signal Decoder"));

    let scores = child(doc, &root, "div", None, "sd-scores")?;
    let score_cell = |label: &str, id: &str| -> Result<Element> {
        let cell = child(doc, &scores, "div", None, "")?;
        cell.set_text_content(Some(label));
        let value = child(doc, &cell, "span", Some(id), "")?;
        value.set_text_content(Some("0"));
        Ok(value)
    };
    let score = score_cell("Score", "sd-score")?;
    let high_score = score_cell("High score", "sd-high-score")?;
    let streak = score_cell("Streak", "sd-streak")?;

    let difficulty_panel = child(doc, &root, "div", Some("sd-difficulty"), "sd-difficulty")?;
    child(doc, &difficulty_panel, "h3", None, "")?.set_text_content(Some("Choose difficulty"));
    let mut difficulty_buttons = Vec::with_capacity(Difficulty::ALL.len());
    for difficulty in Difficulty::ALL {
        let btn = child(doc, &difficulty_panel, "button", None, "")?;
        btn.set_text_content(Some(difficulty.label()));
        btn.set_attribute("data-difficulty", difficulty.name())?;
        btn.set_attribute("style", &format!("background:{};", difficulty.color()))?;
        difficulty_buttons.push((difficulty, btn));
    }

    let message = child(doc, &root, "p", Some("sd-message"), "")?;
    let level_info = child(doc, &root, "p", Some("sd-level"), "")?;

    let board = child(doc, &root, "div", None, "sd-signals")?;
    let mut signal_buttons = Vec::with_capacity(Signal::ALL.len());
    for signal in Signal::ALL {
        let id = format!("sd-{}", signal.name());
        let btn = child(doc, &board, "button", Some(id.as_str()), "sd-signal")?;
        btn.set_attribute("style", &format!("background:{};", signal.color()))?;
        btn.set_attribute("aria-label", signal.name())?;
        signal_buttons.push((signal, btn));
    }

    let controls = child(doc, &root, "div", None, "sd-controls")?;
    let start = child(doc, &controls, "button", Some("sd-start"), "")?;
    start.set_text_content(Some("Start game"));
    let pause = child(doc, &controls, "button", Some("sd-pause"), "")?;
    let reset = child(doc, &controls, "button", Some("sd-reset"), "")?;
    reset.set_text_content(Some("Restart"));

    let progress = child(doc, &root, "div", Some("sd-progress"), "")?;
    let bar = child(doc, &progress, "div", None, "sd-progress")?;
    let progress_fill = child(doc, &bar, "div", None, "sd-progress-fill")?;
    let progress_text = child(doc, &progress, "span", None, "")?;

    Ok(View {
        score,
        high_score,
        streak,
        message,
        level_info,
        difficulty_panel,
        difficulty_buttons,
        signal_buttons,
        start,
        pause,
        reset,
        progress,
        progress_fill,
        progress_text,
        celebration,
    })
}

fn on_click(target: &Element, intent: Intent) -> Result<()> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        if let Err(err) = dispatch_intent(intent) {
            log::warn!("{err}");
        }
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_listeners(doc: &Document, view: &View) -> Result<()> {
    for (difficulty, btn) in &view.difficulty_buttons {
        on_click(btn, Intent::SelectDifficulty(*difficulty))?;
    }
    for (signal, btn) in &view.signal_buttons {
        on_click(btn, Intent::ClickSignal(*signal))?;
    }
    on_click(&view.start, Intent::Start)?;
    on_click(&view.pause, Intent::TogglePause)?;
    on_click(&view.reset, Intent::Reset)?;

    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let active = APP.with(|cell| {
            cell.borrow()
                .as_ref()
                .is_some_and(|app| app.game.is_active())
        });
        if let Some(intent) = key_intent(&evt.key(), active) {
            evt.prevent_default();
            if let Err(err) = dispatch_intent(intent) {
                log::warn!("{err}");
            }
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        // Same clock as intents; the frame timestamp can trail an input event.
        let now = crate::performance_now();
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                app.game.tick(now);
                app.redraw();
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.toggle_attribute_with_force("hidden", hidden);
}

fn set_disabled(el: &Element, disabled: bool) {
    let _ = el.toggle_attribute_with_force("disabled", disabled);
}

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

impl View {
    fn render(&self, snap: &Snapshot) {
        self.score.set_text_content(Some(&snap.score.to_string()));
        self.high_score.set_text_content(Some(&snap.high_score.to_string()));
        self.streak.set_text_content(Some(&snap.streak.to_string()));
        self.message.set_text_content(Some(&snap.message));
        set_hidden(&self.celebration, !snap.celebrating);

        let active = snap.game_active();
        set_hidden(&self.difficulty_panel, active);
        for (difficulty, btn) in &self.difficulty_buttons {
            set_class(btn, "selected", *difficulty == snap.difficulty);
        }

        set_hidden(&self.level_info, !active);
        self.level_info.set_text_content(Some(&format!(
            "Level: {} | Difficulty: {}",
            snap.level,
            snap.difficulty.label()
        )));

        for (signal, btn) in &self.signal_buttons {
            set_class(btn, "flash", snap.flashing_signal == Some(*signal));
            set_disabled(btn, !snap.accepts_input());
        }

        set_hidden(&self.start, active);
        set_hidden(&self.pause, !active);
        set_hidden(&self.reset, !active);
        set_disabled(&self.pause, !snap.can_toggle_pause());
        let pause_label = if snap.phase == PhaseKind::Paused { "Resume" } else { "Pause" };
        self.pause.set_text_content(Some(pause_label));

        set_hidden(&self.progress, !active);
        let _ = self.progress_fill.set_attribute(
            "style",
            &format!("width:{:.0}%;", snap.progress * 100.0),
        );
        self.progress_text
            .set_text_content(Some(&format!("{}/{}", snap.input_len, snap.sequence_len)));
    }
}
