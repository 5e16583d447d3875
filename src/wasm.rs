#![cfg(target_arch = "wasm32")]

use crate::{
    CAT_PAW_GIF, ConfettiBurst, CountUp, FloodColor, NarrationFrame, NarrationOutput,
    NarrationPlan, Narrator, PlaybackError, QuestionBank, Quiz, QuizConfig, SelectionEffect,
    SoundCue, Star, VoiceInfo, bounded, celebration_plan, generate_starfield, percentage,
    pick_voice, starfield_style,
};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Object, Promise, Reflect};
use leptos::leptos_dom::helpers::{IntervalHandle, TimeoutHandle};
use leptos::*;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

#[derive(Clone, PartialEq)]
enum Overlay {
    ColorFlood(FloodColor),
    Starfield(Vec<Star>),
}

fn describe(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            Reflect::get(error, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", error))
}

fn media_error(sound: SoundCue, error: &JsValue) -> PlaybackError {
    PlaybackError::Media {
        path: sound.path().to_string(),
        message: describe(error),
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

fn speech_synthesis() -> Result<SpeechSynthesis, PlaybackError> {
    leptos::window()
        .speech_synthesis()
        .map_err(|_| PlaybackError::SpeechUnavailable)
}

fn preferred_voice(synth: &SpeechSynthesis, lang: &str) -> Option<SpeechSynthesisVoice> {
    let voices: Vec<SpeechSynthesisVoice> = synth
        .get_voices()
        .iter()
        .filter_map(|voice| voice.dyn_into::<SpeechSynthesisVoice>().ok())
        .collect();
    let infos: Vec<VoiceInfo> = voices
        .iter()
        .map(|voice| VoiceInfo {
            name: voice.name(),
            lang: voice.lang(),
        })
        .collect();

    pick_voice(&infos, lang).and_then(|index| voices.into_iter().nth(index))
}

/// Waits for `voiceschanged` when no voices are loaded yet. Some browsers
/// never fire it, so the wait gives up after `timeout` and speech goes ahead
/// with the default voice.
async fn voices_ready(synth: &SpeechSynthesis, timeout: Duration) -> Result<(), PlaybackError> {
    if synth.get_voices().length() > 0 {
        return Ok(());
    }

    let ready = Promise::new(&mut |resolve, _reject| {
        synth.set_onvoiceschanged(Some(&resolve));
    });
    let outcome = bounded(JsFuture::from(ready), TimeoutFuture::new(millis(timeout))).await;
    synth.set_onvoiceschanged(None);

    match outcome {
        Some(result) => result
            .map(|_| ())
            .map_err(|error| PlaybackError::Speech(describe(&error))),
        None => {
            log::warn!(
                "no voices announced after {} ms, using the default voice",
                millis(timeout)
            );
            Ok(())
        }
    }
}

async fn start_audio(audio: &HtmlAudioElement, sound: SoundCue) -> Result<(), PlaybackError> {
    let started = audio.play().map_err(|error| media_error(sound, &error))?;
    JsFuture::from(started)
        .await
        .map(|_| ())
        .map_err(|error| media_error(sound, &error))
}

/// Plays `sound` without tracking it. Failures are only logged.
fn play_once(sound: SoundCue) {
    spawn_local(async move {
        let result = match HtmlAudioElement::new_with_src(sound.path()) {
            Ok(audio) => start_audio(&audio, sound).await,
            Err(error) => Err(media_error(sound, &error)),
        };

        if let Err(error) = result {
            log::warn!("{}", error);
        }
    });
}

fn confetti_available() -> Option<js_sys::Function> {
    let global = js_sys::global();
    let confetti = Reflect::get(&global, &JsValue::from_str("confetti")).ok()?;
    if confetti.is_undefined() {
        return None;
    }

    confetti.dyn_into::<js_sys::Function>().ok()
}

fn fire_confetti(confetti: &js_sys::Function, burst: &ConfettiBurst) -> Result<(), PlaybackError> {
    let options = Object::new();
    let origin = Object::new();
    let colors: Array = burst
        .colors
        .iter()
        .map(|color| JsValue::from_str(color))
        .collect();

    let fields: [(&Object, &str, JsValue); 7] = [
        (&origin, "x", JsValue::from(burst.origin.0)),
        (&origin, "y", JsValue::from(burst.origin.1)),
        (&options, "particleCount", JsValue::from(burst.particle_count)),
        (&options, "spread", JsValue::from(burst.spread)),
        (&options, "angle", JsValue::from(burst.angle)),
        (&options, "origin", origin.clone().into()),
        (&options, "colors", colors.into()),
    ];
    for (target, key, value) in fields {
        Reflect::set(target, &JsValue::from_str(key), &value)
            .map_err(|error| PlaybackError::Confetti(describe(&error)))?;
    }

    confetti
        .call1(&JsValue::NULL, &options)
        .map(|_| ())
        .map_err(|error| PlaybackError::Confetti(describe(&error)))
}

/// Cheer sound plus the confetti schedule. Fire and forget.
fn celebrate() {
    play_once(SoundCue::Cheer);

    let Some(confetti) = confetti_available() else {
        log::warn!("{}", PlaybackError::ConfettiUnavailable);
        return;
    };

    for (delay, burst) in celebration_plan() {
        let confetti = confetti.clone();
        let fire = move || {
            if let Err(error) = fire_confetti(&confetti, &burst) {
                log::warn!("{}", error);
            }
        };

        if delay.is_zero() {
            fire();
        } else {
            set_timeout(fire, delay);
        }
    }
}

/// Narration output backed by Web Speech, audio elements and timers.
/// Frames are published through a Leptos signal.
struct WebNarration {
    config: QuizConfig,
    set_frame: WriteSignal<NarrationFrame>,
    audio: RefCell<Option<HtmlAudioElement>>,
}

impl WebNarration {
    fn new(config: QuizConfig, set_frame: WriteSignal<NarrationFrame>) -> Self {
        Self {
            config,
            set_frame,
            audio: RefCell::new(None),
        }
    }

    fn stop_audio(&self) {
        if let Some(audio) = self.audio.borrow_mut().take() {
            let _ = audio.pause();
            audio.set_current_time(0.0);
        }
    }
}

impl NarrationOutput for WebNarration {
    async fn speak(&self, text: &str) -> Result<(), PlaybackError> {
        let synth = speech_synthesis()?;
        synth.cancel();
        voices_ready(&synth, self.config.voices_timeout()).await?;

        let utterance = SpeechSynthesisUtterance::new_with_text(text)
            .map_err(|error| PlaybackError::Speech(describe(&error)))?;
        utterance.set_rate(self.config.speech_rate);
        if let Some(voice) = preferred_voice(&synth, &self.config.preferred_voice_lang) {
            utterance.set_voice(Some(&voice));
        }

        let finished = Promise::new(&mut |resolve, reject| {
            utterance.set_onend(Some(&resolve));
            utterance.set_onerror(Some(&reject));
        });
        synth.speak(&utterance);

        let outcome = JsFuture::from(finished).await;
        utterance.set_onend(None);
        utterance.set_onerror(None);

        outcome
            .map(|_| ())
            .map_err(|error| PlaybackError::Speech(describe(&error)))
    }

    async fn play(&self, sound: SoundCue) -> Result<(), PlaybackError> {
        let audio =
            HtmlAudioElement::new_with_src(sound.path()).map_err(|error| media_error(sound, &error))?;
        let finished = Promise::new(&mut |resolve, reject| {
            audio.set_onended(Some(&resolve));
            audio.set_onerror(Some(&reject));
        });

        self.stop_audio();
        self.audio.replace(Some(audio.clone()));

        start_audio(&audio, sound).await?;
        JsFuture::from(finished)
            .await
            .map(|_| ())
            .map_err(|error| media_error(sound, &error))
    }

    async fn wait(&self, duration: Duration) {
        TimeoutFuture::new(millis(duration)).await;
    }

    fn silence(&self) {
        if let Ok(synth) = speech_synthesis() {
            synth.cancel();
        }
        self.stop_audio();
    }

    fn show(&self, frame: NarrationFrame) {
        self.set_frame.set(frame);
    }
}

#[component]
fn ProgressBar(#[prop(into)] segments: Signal<Vec<bool>>) -> impl IntoView {
    view! {
        <div class="progress-bar">
            {move || {
                segments
                    .get()
                    .into_iter()
                    .map(|active| {
                        let class = if active {
                            "progress-segment active"
                        } else {
                            "progress-segment"
                        };
                        view! { <div class=class></div> }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn OptionButton(
    text: String,
    #[prop(into)] selected: Signal<bool>,
    #[prop(into)] highlighted: Signal<bool>,
    on_click: Callback<()>,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=move || {
                let mut class = String::from("option");
                if selected.get() {
                    class.push_str(" selected");
                }
                if highlighted.get() {
                    class.push_str(" highlighted");
                }
                class
            }
            aria-pressed=move || selected.get().to_string()
            on:click=move |_| on_click.call(())
        >
            <span class="option-body">{text}</span>
        </button>
    }
}

#[component]
fn QuestionCard(
    quiz: RwSignal<Quiz>,
    frame: ReadSignal<NarrationFrame>,
    on_select: Callback<(u32, String)>,
) -> impl IntoView {
    let question = create_memo(move |_| quiz.with(|quiz| quiz.current_question().clone()));

    view! {
        <section class="question-card">
            <div class="prompt-area">
                <p class="prompt">{move || question.with(|question| question.prompt.clone())}</p>
            </div>
            <div class="options-list">
                {move || {
                    let current = question.get();
                    let id = current.id;

                    current
                        .options
                        .into_iter()
                        .enumerate()
                        .map(|(index, option)| {
                            let selected = Signal::derive({
                                let option = option.clone();
                                move || quiz.with(|quiz| quiz.answer_for(id) == Some(option.as_str()))
                            });
                            let highlighted =
                                Signal::derive(move || frame.get().highlight == Some(index));
                            let on_click = Callback::new({
                                let option = option.clone();
                                move |_| on_select.call((id, option.clone()))
                            });

                            view! {
                                <OptionButton
                                    text=option
                                    selected=selected
                                    highlighted=highlighted
                                    on_click=on_click
                                />
                            }
                        })
                        .collect_view()
                }}
            </div>
        </section>
    }
}

#[component]
fn ResultCard(
    score: usize,
    total: usize,
    count_up: Duration,
    on_restart: Callback<()>,
) -> impl IntoView {
    let target = percentage(score, total);
    let count = CountUp::new(target, count_up);
    let (shown, set_shown) = create_signal(0u32);

    let handle_slot: Rc<Cell<Option<IntervalHandle>>> = Rc::default();
    let started = js_sys::Date::now();
    let tick = {
        let handle_slot = Rc::clone(&handle_slot);
        move || {
            let elapsed = Duration::from_secs_f64(((js_sys::Date::now() - started) / 1000.0).max(0.0));
            set_shown.set(count.value_at(elapsed));
            if count.is_done(elapsed) {
                if let Some(handle) = handle_slot.take() {
                    handle.clear();
                }
            }
        }
    };

    match set_interval_with_handle(tick, Duration::from_millis(16)) {
        Ok(handle) => {
            handle_slot.set(Some(handle));
            on_cleanup(move || {
                if let Some(handle) = handle_slot.take() {
                    handle.clear();
                }
            });
        }
        Err(error) => {
            log::warn!("count-up animation unavailable: {}", describe(&error));
            set_shown.set(target);
        }
    }

    celebrate();

    view! {
        <section class="result-card">
            <div class="result-pill">"Keep Learning!"</div>
            <h2 class="result-title">"Your Final score is"</h2>
            <div class="result-score">
                <span class="result-value">{move || shown.get().to_string()}</span>
                <span class="result-unit">"%"</span>
            </div>
            <button class="btn btn-primary" type="button" on:click=move |_| on_restart.call(())>
                "Start Again"
            </button>
        </section>
    }
}

#[component]
fn App(bank: QuestionBank) -> impl IntoView {
    let config = store_value(QuizConfig::default());
    let quiz = create_rw_signal(Quiz::new(bank));
    let (frame, set_frame) = create_signal(NarrationFrame::idle());
    let overlay = create_rw_signal::<Option<Overlay>>(None);
    let overlay_timer: Rc<Cell<Option<TimeoutHandle>>> = Rc::default();

    let position = create_memo(move |_| {
        quiz.with(|quiz| (quiz.current_index(), quiz.result_visible()))
    });
    let finished = create_memo(move |_| position.get().1);

    let narrator = Rc::new(RefCell::new(Narrator::new(Rc::new(WebNarration::new(
        config.get_value(),
        set_frame,
    )))));

    {
        let narrator = Rc::clone(&narrator);
        create_effect(move |_| {
            let (_, result_visible) = position.get();
            let mut narrator = narrator.borrow_mut();

            if result_visible {
                narrator.cancel();
                return;
            }

            let plan = quiz.with_untracked(|quiz| {
                config.with_value(|config| NarrationPlan::for_question(quiz.current_question(), config))
            });
            let session = narrator.begin(plan);
            spawn_local(session.task);
        });
    }

    on_cleanup({
        let narrator = Rc::clone(&narrator);
        move || narrator.borrow_mut().cancel()
    });

    let clear_overlay = {
        let overlay_timer = Rc::clone(&overlay_timer);

        Rc::new(move || {
            if let Some(handle) = overlay_timer.take() {
                handle.clear();
            }
            overlay.set(None);
        })
    };

    let show_overlay = {
        let overlay_timer = Rc::clone(&overlay_timer);
        let clear_overlay = Rc::clone(&clear_overlay);

        Rc::new(move |next: Overlay, finishes_quiz: bool| {
            clear_overlay();
            overlay.set(Some(next));

            let dismiss = move || {
                overlay.set(None);
                if finishes_quiz {
                    quiz.update(|quiz| {
                        quiz.finish();
                    });
                }
            };

            match set_timeout_with_handle(dismiss, config.with_value(QuizConfig::overlay_duration)) {
                Ok(handle) => overlay_timer.set(Some(handle)),
                Err(error) => {
                    log::warn!("overlay timer unavailable: {}", describe(&error));
                    overlay.set(None);
                    if finishes_quiz {
                        quiz.update(|quiz| {
                            quiz.finish();
                        });
                    }
                }
            }
        })
    };

    let choose_option = {
        let show_overlay = Rc::clone(&show_overlay);

        Callback::new(move |(question_id, option): (u32, String)| {
            let effect = quiz
                .try_update(|quiz| quiz.select_option(question_id, &option))
                .flatten();

            match effect {
                Some(SelectionEffect::Sound(sound)) => play_once(sound),
                Some(SelectionEffect::ColorFlood(color)) => {
                    show_overlay(Overlay::ColorFlood(color), false);
                }
                Some(effect @ SelectionEffect::Starfield) => {
                    let mut rng = rand::rngs::StdRng::from_entropy();
                    let stars = generate_starfield(&mut rng, config.with_value(|config| config.star_count));
                    show_overlay(Overlay::Starfield(stars), effect.finishes_quiz());
                }
                None => {}
            }
        })
    };

    let restart = {
        let clear_overlay = Rc::clone(&clear_overlay);

        Callback::new(move |_| {
            clear_overlay();
            quiz.update(Quiz::restart);
        })
    };

    let go_back = move |_| {
        quiz.update(|quiz| {
            quiz.go_back();
        });
    };

    let advance = move |_| {
        quiz.update(|quiz| {
            quiz.advance();
        });
    };

    view! {
        <main class="page">
            <div class="quiz-shell">
                <Show
                    when=move || finished.get()
                    fallback=move || {
                        view! {
                            <div class="quiz-panel">
                                <header class="page-header">
                                    <h1 class="headline">"Test Your Knowledge"</h1>
                                    <p class="lede">"Answer all questions to see your results"</p>
                                </header>
                                <ProgressBar segments=Signal::derive(move || quiz.with(Quiz::progress)) />
                                <QuestionCard quiz=quiz frame=frame on_select=choose_option />
                                <div class="nav-row">
                                    <button
                                        class="nav-btn"
                                        type="button"
                                        aria-label="Previous question"
                                        disabled=move || !quiz.with(Quiz::can_go_back)
                                        on:click=go_back
                                    >
                                        "‹"
                                    </button>
                                    <button
                                        class="nav-btn nav-forward"
                                        type="button"
                                        aria-label="Next question"
                                        disabled=move || !quiz.with(Quiz::can_advance)
                                        on:click=advance
                                    >
                                        "›"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                >
                    {move || {
                        let (score, total) = quiz.with_untracked(|quiz| (quiz.score(), quiz.total()));
                        view! {
                            <ResultCard
                                score=score
                                total=total
                                count_up=config.with_value(QuizConfig::count_up_duration)
                                on_restart=restart
                            />
                        }
                    }}
                </Show>
            </div>

            <div class="paw-corner">
                <div class="speech-bubble">"Best of Luck!"</div>
                <img class="paw" src=CAT_PAW_GIF alt="Paw" width="100" height="100" />
            </div>

            {move || {
                frame
                    .get()
                    .popup
                    .map(|image| {
                        view! {
                            <div class="popup-overlay">
                                <img class="popup-image" src=image.path() alt=image.alt_text() />
                            </div>
                        }
                    })
            }}

            {move || {
                overlay
                    .get()
                    .map(|current| match current {
                        Overlay::ColorFlood(color) => {
                            view! {
                                <div
                                    class="color-flood"
                                    style=color.overlay_style()
                                ></div>
                            }
                            .into_view()
                        }
                        Overlay::Starfield(stars) => {
                            view! {
                                <div class="starfield" style=starfield_style()>
                                    {stars
                                        .into_iter()
                                        .map(|star| view! { <span class="star" style=star.style()></span> })
                                        .collect_view()}
                                </div>
                            }
                            .into_view()
                        }
                    })
            }}
        </main>
    }
}

#[component]
fn LoadError(message: String) -> impl IntoView {
    view! {
        <main class="page">
            <section class="error-card">
                <p class="eyebrow">"Question bank error"</p>
                <p class="error-body">{message}</p>
            </section>
        </main>
    }
}

/// Installs logging and mounts the quiz on the document body.
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    match QuestionBank::builtin() {
        Ok(bank) => {
            log::info!("loaded {} questions", bank.len());
            mount_to_body(move || view! { <App bank=bank /> });
        }
        Err(error) => {
            log::error!("failed to load question bank: {}", error);
            let message = error.to_string();
            mount_to_body(move || view! { <LoadError message=message /> });
        }
    }
}
