//! Browser front end: one canvas, one typing overlay, a keydown listener and a
//! `requestAnimationFrame` loop driving [`App::tick`]. Everything visual lives here;
//! the gameplay itself is in [`crate::game`].

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, window};

use crate::config::{GameConfig, Params};
use crate::game::{FeedbackKind, GamePhase};
use crate::screen::{App, InputOutcome, Screen};
use crate::store::{Language, LocalStorage, MemoryStorage, Storage};

const CANVAS_W: u32 = 800;
const CANVAS_H: u32 = 480;

/// localStorage when the browser grants it, otherwise an in-memory fallback.
enum BrowserStorage {
    Local(LocalStorage),
    Memory(MemoryStorage),
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Local(s) => s.get(key),
            Self::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self {
            Self::Local(s) => s.set(key, value),
            Self::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match self {
            Self::Local(s) => s.remove(key),
            Self::Memory(s) => s.remove(key),
        }
    }
}

struct WebState {
    app: App<BrowserStorage>,
    ctx: CanvasRenderingContext2d,
    typing: String,
    last_ts: Option<f64>,
}

thread_local! {
    static WEB_STATE: RefCell<Option<WebState>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("pa-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("pa-canvas");
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        c.set_attribute("style", "position:fixed; left:50%; top:45%; transform:translate(-50%,-50%); border-radius:18px; border:2px solid #222; z-index:20;").ok();
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_align("center");

    if doc.get_element_by_id("pa-typing").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("pa-typing");
        div.set_attribute("style", "position:fixed; bottom:60px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:22px; padding:4px 12px; background:rgba(0,0,0,0.35); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:30;").ok();
        body.append_child(&div)?;
    }

    let storage = match LocalStorage::open() {
        Some(local) => BrowserStorage::Local(local),
        None => {
            warn!("localStorage unavailable, progress will not be saved");
            BrowserStorage::Memory(MemoryStorage::new())
        }
    };
    let app = App::new(storage, GameConfig::default(), StdRng::from_entropy());
    WEB_STATE.with(|s| {
        *s.borrow_mut() = Some(WebState {
            app,
            ctx,
            typing: String::new(),
            last_ts: None,
        });
    });

    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        WEB_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                on_key(state, &evt);
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    start_loop();
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        WEB_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                frame(state, ts);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(state: &mut WebState, ts: f64) {
    let dt = state
        .last_ts
        .map(|last| (ts - last).clamp(0.0, Params::MAX_FRAME_MS))
        .unwrap_or(0.0);
    state.last_ts = Some(ts);
    state.app.tick(dt);
    render(state);
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("pa-typing"))
    {
        el.set_text_content(Some(&state.typing));
    }
}

fn typing_screen(screen: Screen) -> bool {
    matches!(screen, Screen::Game | Screen::Practice | Screen::Review)
}

fn on_key(state: &mut WebState, evt: &KeyboardEvent) {
    let key = evt.key();
    let screen = state.app.screen();
    if typing_screen(screen) {
        match key.as_str() {
            "Escape" if state.typing.is_empty() => {
                if screen == Screen::Game {
                    state.app.abandon_level();
                } else {
                    state.app.open_menu();
                }
            }
            "Escape" => state.typing.clear(),
            "Backspace" => {
                state.typing.pop();
            }
            "Enter" => {
                let typed = std::mem::take(&mut state.typing);
                if matches!(state.app.submit(&typed), InputOutcome::Ignored) && !typed.is_empty() {
                    state.typing = typed;
                }
            }
            " " if screen == Screen::Game => {
                if let Some(session) = state.app.session_mut() {
                    if session.state().is_paused {
                        session.resume();
                    } else {
                        session.pause();
                    }
                }
            }
            "?" if screen != Screen::Game => {
                state.app.reveal_answer();
            }
            k if k.chars().count() == 1 => {
                if let Some(c) = k.chars().next() {
                    if c.is_alphabetic() || matches!(c, '1'..='5') {
                        state.typing.extend(c.to_lowercase());
                    }
                }
            }
            _ => {}
        }
        evt.prevent_default();
        return;
    }

    let result = match (screen, key.as_str()) {
        (Screen::Menu, "Enter") => {
            state.app.open_level_select();
            Ok(())
        }
        (Screen::Menu, "p") => {
            state.app.open_practice();
            Ok(())
        }
        (Screen::Menu, "r") => state.app.open_review(),
        (Screen::Menu, "s") => {
            state.app.open_performance();
            Ok(())
        }
        (Screen::Menu, "l") => {
            let next = match state.app.language() {
                Language::En => Language::ZhTw,
                Language::ZhTw => Language::En,
            };
            state.app.set_language(next);
            Ok(())
        }
        (Screen::LevelSelect, k) if k.len() == 1 && k.as_bytes()[0].is_ascii_digit() => {
            let level = u32::from(k.as_bytes()[0] - b'0');
            state.app.start_level(level)
        }
        (Screen::Results, "Enter") => state.app.continue_next(),
        (Screen::Results, "r") => state.app.replay(),
        (Screen::Results, "Escape") => {
            state.app.results_to_menu();
            Ok(())
        }
        (Screen::Performance, "c") => {
            state.app.clear_records();
            Ok(())
        }
        (_, "Escape") => {
            state.app.open_menu();
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        warn!("{}", err);
    }
}

// --- Rendering ----------------------------------------------------------------

fn text(ctx: &CanvasRenderingContext2d, s: &str, x: f64, y: f64, font: &str, color: &str) {
    ctx.set_font(font);
    ctx.set_fill_style_str(color);
    let _ = ctx.fill_text(s, x, y);
}

fn render(state: &WebState) {
    let ctx = &state.ctx;
    let (w, h) = (CANVAS_W as f64, CANVAS_H as f64);
    ctx.set_fill_style_str("#8ecae6");
    ctx.fill_rect(0.0, 0.0, w, h);

    let app = &state.app;
    let language = app.language();
    match app.screen() {
        Screen::Menu => {
            text(ctx, "PINYIN AIR FORCE", w / 2.0, 140.0, "bold 44px sans-serif", "#023047");
            text(ctx, "Defend your castle by typing pinyin! 🏰", w / 2.0, 190.0, "20px sans-serif", "#023047");
            let lines = [
                "Enter: start playing",
                "P: practice mode",
                "R: review incorrect words",
                "S: performance",
                "L: language",
            ];
            for (i, line) in lines.iter().enumerate() {
                text(ctx, line, w / 2.0, 250.0 + i as f64 * 32.0, "20px sans-serif", "#fb8500");
            }
        }
        Screen::LevelSelect => {
            text(ctx, "Choose Level", w / 2.0, 70.0, "bold 34px sans-serif", "#023047");
            for (i, (level, locked, stars)) in app.level_overview().into_iter().enumerate() {
                let line = format!(
                    "{} {}. {}  {} chars · {}s · {} at once  {}",
                    level.sticker,
                    level.level,
                    level.title(language),
                    level.character_count,
                    level.speed,
                    level.simultaneous_characters,
                    if locked { "🔒".to_string() } else { "⭐".repeat(stars as usize) }
                );
                let color = if locked { "#6b6b6b" } else { "#023047" };
                text(ctx, &line, w / 2.0, 140.0 + i as f64 * 60.0, "22px sans-serif", color);
            }
        }
        Screen::Game => render_game(state, w, h),
        Screen::Results => {
            if let Some(result) = app.result() {
                text(ctx, "Level Complete!", w / 2.0, 120.0, "bold 40px sans-serif", "#023047");
                text(ctx, &"⭐".repeat(result.stars as usize), w / 2.0, 190.0, "40px sans-serif", "#ffb703");
                let summary = format!("Score {} · Accuracy {:.0}%", result.score, result.accuracy);
                text(ctx, &summary, w / 2.0, 250.0, "24px sans-serif", "#023047");
                text(ctx, "Enter: continue · R: replay · Esc: menu", w / 2.0, 320.0, "18px sans-serif", "#fb8500");
            }
        }
        Screen::Practice => {
            if let Some(p) = app.practice() {
                let header = format!("Practice Mode 📚  {} words", p.progress());
                let current = p.current().map(|c| (c.character.as_str(), c.pinyin.as_str()));
                render_drill(ctx, w, &header, current, p.answer_shown());
            }
        }
        Screen::Review => {
            if let Some(r) = app.review() {
                let (pos, len) = r.position();
                let header = format!("Review {} / {} · accuracy {:.1}%", pos, len, r.accuracy());
                let current = r.current().map(|c| (c.character.as_str(), c.pinyin.as_str()));
                render_drill(ctx, w, &header, current, r.answer_shown());
            }
        }
        Screen::Performance => {
            text(ctx, "Performance", w / 2.0, 60.0, "bold 34px sans-serif", "#023047");
            let records = app.top_records();
            if records.is_empty() {
                text(ctx, "No records yet. Start playing! 🎮", w / 2.0, 200.0, "22px sans-serif", "#023047");
            }
            for (i, r) in records.iter().enumerate() {
                let line = format!(
                    "#{}  Lv{}  {} pts  {:.0}%  {}  {}",
                    i + 1,
                    r.level,
                    r.score,
                    r.accuracy,
                    "⭐".repeat(r.stars as usize),
                    r.date.format("%Y-%m-%d")
                );
                text(ctx, &line, w / 2.0, 110.0 + i as f64 * 34.0, "18px sans-serif", "#023047");
            }
        }
    }

    if let Some(notice) = app.notice() {
        text(ctx, notice, w / 2.0, h - 20.0, "18px sans-serif", "#d00000");
    }
}

fn render_drill(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    header: &str,
    current: Option<(&str, &str)>,
    show_answer: bool,
) {
    text(ctx, header, w / 2.0, 50.0, "bold 24px sans-serif", "#023047");
    if let Some((hanzi, pinyin)) = current {
        ctx.set_fill_style_str("#ffb703");
        ctx.begin_path();
        let _ = ctx.arc(w / 2.0, 220.0, 90.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        text(ctx, hanzi, w / 2.0, 250.0, "96px 'Noto Serif SC', serif", "#ffffff");
        if show_answer {
            text(ctx, pinyin, w / 2.0, 360.0, "bold 32px sans-serif", "#023047");
        }
    }
    text(ctx, "Enter: submit · ?: show answer · Esc: back", w / 2.0, 420.0, "16px sans-serif", "#fb8500");
}

fn render_game(state: &WebState, w: f64, h: f64) {
    let ctx = &state.ctx;
    let Some(session) = state.app.session() else {
        return;
    };
    let level = session.level();
    text(ctx, "🏰", 40.0, h / 2.0 + 20.0, "56px sans-serif", "#000000");

    const BALLOON_COLORS: [&str; 6] = ["#f87171", "#60a5fa", "#4ade80", "#facc15", "#c084fc", "#f472b6"];
    for c in session.characters() {
        let x = c.x_position / 100.0 * w;
        let y = c.y_position / 100.0 * h;
        ctx.set_fill_style_str(BALLOON_COLORS[c.character.id as usize % BALLOON_COLORS.len()]);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 34.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        text(ctx, &c.character.character, x, y + 14.0, "40px 'Noto Serif SC', serif", "#ffffff");
    }

    let (correct, total) = session.progress();
    let header = format!(
        "Lv{} {}   Score {}   {}{}   {}/{}",
        level.level,
        level.title(state.app.language()),
        session.score(),
        "♥".repeat(session.lives() as usize),
        "♡".repeat((Params::START_LIVES.saturating_sub(session.lives())) as usize),
        correct,
        total
    );
    text(ctx, &header, w / 2.0, 30.0, "20px sans-serif", "#023047");

    if let Some(hint) = session.hint() {
        text(ctx, &hint, w / 2.0, h - 40.0, "16px sans-serif", "#023047");
    }
    if let Some(fb) = session.feedback() {
        let color = match fb.kind {
            FeedbackKind::Success => "#2a9d8f",
            FeedbackKind::Error => "#d00000",
        };
        text(ctx, &format!("{} {}", fb.emoji, fb.message), w - 120.0, h / 2.0, "bold 24px sans-serif", color);
    }
    if session.state().is_paused && session.phase() == GamePhase::Active {
        text(ctx, "Paused (space to resume)", w / 2.0, h / 2.0, "bold 30px sans-serif", "#023047");
    }
}
